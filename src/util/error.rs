//! Error types for the imaging adapter.

use thiserror::Error;

/// Main error type.
#[derive(Error, Debug)]
pub enum Error {
    /// Enumerated token outside its lookup table
    #[error("Unknown curve {domain} '{token}'")]
    UnknownToken { domain: &'static str, token: String },

    /// Malformed prim path
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// Attribute holds a different type than requested
    #[error("Type mismatch for '{attribute}': expected {expected}, got {actual}")]
    TypeMismatch {
        attribute: String,
        expected: String,
        actual: String,
    },

    /// Render index cannot hold this prim type
    #[error("Unsupported prim type: {0}")]
    UnsupportedPrimType(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Settings (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an "other" error from a string.
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }

    /// Create an invalid path error.
    pub fn invalid_path(msg: impl Into<String>) -> Self {
        Self::InvalidPath(msg.into())
    }
}

/// Result type alias.
pub type Result<T> = std::result::Result<T, Error>;
