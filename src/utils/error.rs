//! Error Handling
//!
//! Unified error types for the application.
//! Uses thiserror for ergonomic error definitions.

use interview_prep_core::CoreError;
use interview_prep_llm::{ErrorCategory, LlmError};
use thiserror::Error;

/// Application-wide error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// The LLM backend failed; the caller may try again later
    #[error("Service temporarily unavailable: {0}")]
    ServiceUnavailable(String),
}

/// Result type alias for application errors
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Whether retrying the request later could succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, AppError::ServiceUnavailable(_))
    }
}

/// Configuration problems stay configuration problems; every other LLM
/// failure surfaces as a transient outage.
impl From<LlmError> for AppError {
    fn from(err: LlmError) -> Self {
        match err.category() {
            ErrorCategory::Configuration => AppError::Config(err.to_string()),
            _ => AppError::ServiceUnavailable(err.to_string()),
        }
    }
}

impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Io(e) => AppError::Io(e),
            CoreError::Serialization(e) => AppError::Serialization(e),
            CoreError::Validation(msg) => AppError::Validation(msg),
        }
    }
}
