//! Render index seam.
//!
//! `populate` registers each adapted prim with the render index. The index
//! itself belongs to the render engine; [`RenderIndexProxy`] is a recording
//! implementation for hosts that collect insertions and replay them later.

use std::fmt;

use parking_lot::Mutex;

use crate::core::PrimPath;

/// Render primitive types an adapter may insert.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RprimType {
    BasisCurves,
    Mesh,
    Points,
}

impl RprimType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BasisCurves => "basisCurves",
            Self::Mesh => "mesh",
            Self::Points => "points",
        }
    }
}

impl fmt::Display for RprimType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Material bound to a render prim, if any.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ShaderBinding {
    pub material: Option<PrimPath>,
}

impl ShaderBinding {
    pub fn new(material: Option<PrimPath>) -> Self {
        Self { material }
    }

    /// Check if no material is bound.
    pub fn is_unbound(&self) -> bool {
        self.material.is_none()
    }
}

/// Receiver of render prim insertions.
pub trait RenderIndex: Send + Sync {
    /// Whether the engine can draw this prim type at all.
    fn is_rprim_type_supported(&self, rprim_type: RprimType) -> bool;

    /// Register a render prim under `cache_path`.
    fn insert_rprim(&self, rprim_type: RprimType, cache_path: &PrimPath, binding: &ShaderBinding);
}

/// One recorded insertion.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InsertedRprim {
    pub rprim_type: RprimType,
    pub cache_path: PrimPath,
    pub binding: ShaderBinding,
}

/// Render index that records insertions in order.
pub struct RenderIndexProxy {
    supported: Vec<RprimType>,
    inserted: Mutex<Vec<InsertedRprim>>,
}

impl RenderIndexProxy {
    /// Proxy accepting the given prim types.
    pub fn new(supported: impl Into<Vec<RprimType>>) -> Self {
        Self {
            supported: supported.into(),
            inserted: Mutex::new(Vec::new()),
        }
    }

    /// Proxy accepting every prim type.
    pub fn accepting_all() -> Self {
        Self::new(vec![RprimType::BasisCurves, RprimType::Mesh, RprimType::Points])
    }

    /// Snapshot of the insertions so far.
    pub fn inserted(&self) -> Vec<InsertedRprim> {
        self.inserted.lock().clone()
    }

    /// Take and clear the recorded insertions.
    pub fn drain(&self) -> Vec<InsertedRprim> {
        std::mem::take(&mut *self.inserted.lock())
    }

    pub fn len(&self) -> usize {
        self.inserted.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl RenderIndex for RenderIndexProxy {
    fn is_rprim_type_supported(&self, rprim_type: RprimType) -> bool {
        self.supported.contains(&rprim_type)
    }

    fn insert_rprim(&self, rprim_type: RprimType, cache_path: &PrimPath, binding: &ShaderBinding) {
        self.inserted.lock().push(InsertedRprim {
            rprim_type,
            cache_path: cache_path.clone(),
            binding: binding.clone(),
        });
    }
}
