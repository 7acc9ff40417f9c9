//! Error types for sketch construction.
//!
//! Only configuration can fail. Per-frame work never errors: a surface
//! that is not sized yet is "not ready" and the frame is skipped.

use thiserror::Error;

/// Root error type for everything in `sketch-core`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SketchError {
    /// A spring parameter is not a finite, strictly positive number.
    #[error("invalid spring {field}: {value} (must be finite and > 0)")]
    InvalidSpring { field: &'static str, value: f64 },

    /// Mask configuration rejected at construction.
    #[error("invalid mask configuration: {0}")]
    InvalidMask(String),

    /// A configuration document could not be parsed.
    #[error("config error: {0}")]
    Config(String),
}

pub type SketchResult<T> = Result<T, SketchError>;

impl From<serde_json::Error> for SketchError {
    fn from(err: serde_json::Error) -> Self {
        SketchError::Config(err.to_string())
    }
}
