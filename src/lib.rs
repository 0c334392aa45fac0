//! # Curves Imaging
//!
//! Change-tracked adaptation of time-sampled basis curves into render-ready
//! values.
//!
//! A host traversal populates each curves prim once, probes which of its
//! channels vary over time, then asks for a subset of channels every frame.
//! The adapter reads only what was asked for, remaps curve enumerations,
//! applies fallbacks for optional data and writes into a shared per-path
//! cache. The returned dirty mask tells the host which cached channels are
//! valid for the frame.
//!
//! ## Modules
//!
//! - [`util`] - Errors, math re-exports, logging setup
//! - [`core`] - Paths, time codes, values, dirty bits, path tables
//! - [`imaging`] - The basis curves adapter and its collaborators
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use curves_imaging::prelude::*;
//!
//! let cache = Arc::new(ValueCache::new());
//! let adapter = BasisCurvesAdapter::new(stage, Arc::clone(&cache));
//! let index = RenderIndexProxy::accepting_all();
//!
//! let path = PrimPath::new("/World/groom")?;
//! if let Some(cache_path) = adapter.populate(&path, &index) {
//!     adapter.probe_variability(&path, DirtyBits::ALL_CURVES);
//!     let valid = adapter.update_frame(&path, &cache_path, TimeCode::Time(1.0), DirtyBits::ALL_CURVES);
//! }
//! ```

pub mod util;
pub mod core;
pub mod imaging;

pub use util::{Error, Result};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::util::{Error, Result};
    pub use crate::core::{DirtyBits, Interpolation, PrimPath, TimeCode, Value};
    pub use crate::imaging::{
        AdapterSettings, AttributeReader, BasisCurvesAdapter, BasisCurvesTopology, MemoryStage,
        PrimAdapter, RenderIndex, RenderIndexProxy, ValueCache,
    };
}
