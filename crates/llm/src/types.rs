//! LLM Types
//!
//! Provider configuration, the structured response shape, and the error
//! taxonomy shared by every client.

use std::str::FromStr;
use std::time::Duration;

use interview_prep_core::ProxyConfig;
use serde::{Deserialize, Serialize};

/// A decoded JSON object returned by a structured-output call.
pub type StructuredResponse = serde_json::Map<String, serde_json::Value>;

/// Supported LLM provider types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderType {
    OpenAI,
    Anthropic,
}

impl ProviderType {
    /// Model used when the configuration does not name one.
    pub fn default_model(&self) -> &'static str {
        match self {
            ProviderType::OpenAI => "gpt-4-turbo-preview",
            ProviderType::Anthropic => "claude-3-5-sonnet-20241022",
        }
    }
}

impl std::fmt::Display for ProviderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderType::OpenAI => write!(f, "openai"),
            ProviderType::Anthropic => write!(f, "anthropic"),
        }
    }
}

impl FromStr for ProviderType {
    type Err = LlmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(ProviderType::OpenAI),
            "anthropic" => Ok(ProviderType::Anthropic),
            other => Err(LlmError::Configuration {
                message: format!("Unsupported LLM provider: {}", other),
            }),
        }
    }
}

/// Configuration for one vendor backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// The provider type
    pub provider: ProviderType,
    /// Bearer credential; never serialized
    #[serde(skip_serializing, default)]
    pub api_key: Option<String>,
    /// Base URL override (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Model name to use
    pub model: String,
    /// Per-request timeout, in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Upper bound on in-flight requests to this vendor
    #[serde(default = "default_max_concurrent_requests")]
    pub max_concurrent_requests: usize,
    /// Outbound proxy, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxy: Option<ProxyConfig>,
}

fn default_request_timeout_secs() -> u64 {
    60
}

fn default_max_concurrent_requests() -> usize {
    4
}

impl ProviderConfig {
    /// Configuration with defaults for `provider` and no credential.
    pub fn new(provider: ProviderType) -> Self {
        Self {
            provider,
            api_key: None,
            base_url: None,
            model: provider.default_model().to_string(),
            request_timeout_secs: default_request_timeout_secs(),
            max_concurrent_requests: default_max_concurrent_requests(),
            proxy: None,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Returns the configured key, or a configuration error when it is
    /// missing or blank.
    pub fn require_api_key(&self) -> LlmResult<&str> {
        match self.api_key.as_deref().map(str::trim) {
            Some(key) if !key.is_empty() => Ok(key),
            _ => Err(crate::provider::missing_api_key_error(
                &self.provider.to_string(),
            )),
        }
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self::new(ProviderType::OpenAI)
    }
}

/// Coarse error classes used by callers to pick a user-facing response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Unknown mode, unknown provider, missing credential. Never retried.
    Configuration,
    /// The vendor could not be reached or refused the request.
    Transport,
    /// The vendor answered with something that is not the requested JSON.
    Response,
    /// The decoded JSON does not fit the typed record.
    Validation,
}

/// Error types for LLM operations
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LlmError {
    /// Unknown mode or provider, or a missing credential
    Configuration { message: String },
    /// Authentication failed (invalid API key)
    AuthenticationFailed { message: String },
    /// Rate limit exceeded
    RateLimited {
        message: String,
        retry_after: Option<u32>,
    },
    /// Model not found or not available
    ModelNotFound { model: String },
    /// Invalid request (bad parameters)
    InvalidRequest { message: String },
    /// Server error from the provider
    ServerError {
        message: String,
        status: Option<u16>,
    },
    /// Network/connection error
    NetworkError { message: String },
    /// The request did not finish within the configured timeout
    Timeout { message: String },
    /// Vendor content is not valid JSON or does not match the schema
    ResponseError { message: String },
    /// Decoded JSON failed strict typed construction
    Validation { message: String },
}

impl LlmError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn response(message: impl Into<String>) -> Self {
        Self::ResponseError {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Classify the error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            LlmError::Configuration { .. } => ErrorCategory::Configuration,
            LlmError::ResponseError { .. } => ErrorCategory::Response,
            LlmError::Validation { .. } => ErrorCategory::Validation,
            LlmError::AuthenticationFailed { .. }
            | LlmError::RateLimited { .. }
            | LlmError::ModelNotFound { .. }
            | LlmError::InvalidRequest { .. }
            | LlmError::ServerError { .. }
            | LlmError::NetworkError { .. }
            | LlmError::Timeout { .. } => ErrorCategory::Transport,
        }
    }
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            LlmError::Timeout {
                message: err.to_string(),
            }
        } else {
            LlmError::NetworkError {
                message: err.to_string(),
            }
        }
    }
}

impl std::fmt::Display for LlmError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LlmError::Configuration { message } => {
                write!(f, "Configuration error: {}", message)
            }
            LlmError::AuthenticationFailed { message } => {
                write!(f, "Authentication failed: {}", message)
            }
            LlmError::RateLimited { message, .. } => {
                write!(f, "Rate limited: {}", message)
            }
            LlmError::ModelNotFound { model } => {
                write!(f, "Model not found: {}", model)
            }
            LlmError::InvalidRequest { message } => {
                write!(f, "Invalid request: {}", message)
            }
            LlmError::ServerError { message, status } => {
                if let Some(s) = status {
                    write!(f, "Server error ({}): {}", s, message)
                } else {
                    write!(f, "Server error: {}", message)
                }
            }
            LlmError::NetworkError { message } => {
                write!(f, "Network error: {}", message)
            }
            LlmError::Timeout { message } => {
                write!(f, "Request timed out: {}", message)
            }
            LlmError::ResponseError { message } => {
                write!(f, "Invalid LLM response: {}", message)
            }
            LlmError::Validation { message } => {
                write!(f, "Validation error: {}", message)
            }
        }
    }
}

impl std::error::Error for LlmError {}

/// Result type for LLM operations
pub type LlmResult<T> = Result<T, LlmError>;
