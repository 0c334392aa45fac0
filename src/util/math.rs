//! Math type re-exports.

pub use glam::{Mat4, Vec3};
