//! Core Error Types
//!
//! The minimal error set shared across the workspace. The LLM crate and the
//! application crate define their own richer error enums and convert from
//! this one where needed.

use thiserror::Error;

/// Core error type for the Interview Prep workspace.
#[derive(Error, Debug)]
pub enum CoreError {
    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Result type alias for core errors
pub type CoreResult<T> = Result<T, CoreError>;

impl CoreError {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}
