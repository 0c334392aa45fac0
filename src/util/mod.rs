//! Utility types and functions.
//!
//! - [`Error`] / [`Result`] - Error handling
//! - Math type re-exports from glam
//! - [`logging`] - tracing subscriber setup for hosts

mod error;
mod math;
pub mod logging;

pub use error::*;
pub use math::*;
