//! Core layer - fundamental scene and cache types.
//!
//! This module provides:
//! - [`PrimPath`] - Hierarchical prim/cache path
//! - [`TimeCode`] / [`Interpolation`] - Sample addressing and primvar scope
//! - [`Value`] / [`FromValue`] - Typed attribute values
//! - [`DirtyBits`] - Per-channel change flags
//! - [`PathTable`] - Path-keyed table with per-path locking

mod path;
mod sample;
mod value;
mod dirty;
mod cache;

pub use path::{PrimPath, SEPARATOR};
pub use sample::{TimeCode, Interpolation};
pub use value::{Value, FromValue};
pub use dirty::DirtyBits;
pub use cache::{PathTable, Shared};
