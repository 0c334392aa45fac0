//! Scene-to-render adaptation for basis curves.
//!
//! - [`BasisCurvesAdapter`] - Variability probing and per-frame updates
//! - [`ValueCache`] / [`CacheEntry`] - Render values by cache path
//! - [`AttributeReader`] / [`MemoryStage`] - Attribute resolution seam
//! - [`RenderIndex`] / [`RenderIndexProxy`] - Render prim registration
//! - [`tokens`] - Curve basis/type/wrap remapping
//! - [`motion`] - Motion sample ordering

pub mod basis_curves;
pub mod index;
pub mod motion;
pub mod primvar;
pub mod reader;
pub mod settings;
pub mod stage;
pub mod tokens;
pub mod topology;
pub mod value_cache;
pub mod variability;

pub use basis_curves::{
    BasisCurvesAdapter, Fetched, Phase, PrimAdapter, UniformCurveFields, DEFAULT_WIDTH,
};
pub use index::{InsertedRprim, RenderIndex, RenderIndexProxy, RprimType, ShaderBinding};
pub use motion::{is_backward, MotionSamples};
pub use primvar::{PrimvarDescriptor, PrimvarSet};
pub use reader::{attr, read_as, AttributeReader};
pub use settings::AdapterSettings;
pub use stage::MemoryStage;
pub use tokens::{remap, CurveBasis, CurveType, CurveWrap, RemapDomain};
pub use topology::BasisCurvesTopology;
pub use value_cache::{CacheEntry, ValueCache};
pub use variability::{VariabilityRecord, VaryingTag};
