//! Attribute resolution seam.
//!
//! The adapter never resolves scene description itself. It asks an
//! [`AttributeReader`] for a value at a time, or whether an attribute might
//! vary over time. [`super::stage::MemoryStage`] is the in-memory
//! implementation.

use crate::core::{FromValue, PrimPath, TimeCode, Value};

/// Attribute names read by the curves adapter.
pub mod attr {
    pub const POINTS: &str = "points";
    pub const CURVE_VERTEX_COUNTS: &str = "curveVertexCounts";
    pub const WIDTHS: &str = "widths";
    pub const NORMALS: &str = "normals";
    pub const TRANSFORM: &str = "xformOp:transform";
    pub const VISIBILITY: &str = "visibility";
    pub const DISPLAY_COLOR: &str = "primvars:displayColor";
    pub const DISPLAY_COLOR_INTERPOLATION: &str = "primvars:displayColor:interpolation";
    pub const MATERIAL_BINDING: &str = "material:binding";
}

/// Typed attribute access.
///
/// Implementations must be usable from several worker threads at once.
pub trait AttributeReader: Send + Sync {
    /// Value of `attribute` on `path` at `time`, or `None` if it is not
    /// authored (or blocked) there.
    fn read(&self, path: &PrimPath, attribute: &str, time: TimeCode) -> Option<Value>;

    /// Whether `attribute` on `path` may take different values over time.
    fn is_time_varying(&self, path: &PrimPath, attribute: &str) -> bool;
}

impl<R: AttributeReader + ?Sized> AttributeReader for std::sync::Arc<R> {
    fn read(&self, path: &PrimPath, attribute: &str, time: TimeCode) -> Option<Value> {
        (**self).read(path, attribute, time)
    }

    fn is_time_varying(&self, path: &PrimPath, attribute: &str) -> bool {
        (**self).is_time_varying(path, attribute)
    }
}

/// Read and convert. A value of the wrong type is logged and treated as
/// missing.
pub fn read_as<T: FromValue>(
    reader: &dyn AttributeReader,
    path: &PrimPath,
    attribute: &str,
    time: TimeCode,
) -> Option<T> {
    let value = reader.read(path, attribute, time)?;
    match T::try_from_value(attribute, value) {
        Ok(v) => Some(v),
        Err(err) => {
            tracing::error!(prim = %path, "{}", err);
            None
        }
    }
}
