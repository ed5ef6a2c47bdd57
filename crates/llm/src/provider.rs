//! Structured-Output Client Trait
//!
//! Defines the single capability every backend exposes: turn a prompt and a
//! JSON Schema into a decoded JSON object.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, RETRY_AFTER};
use tokio::sync::{Semaphore, SemaphorePermit};

use super::types::{LlmError, LlmResult, StructuredResponse};

/// Trait that all structured-output clients must implement.
///
/// Implementations are stateless per call. Vendor clients make one HTTP
/// request per call (two when a fallback path is taken); the stub makes none.
#[async_trait]
pub trait StructuredClient: Send + Sync {
    /// Returns the client name for identification.
    fn name(&self) -> &'static str;

    /// Returns the model being used.
    fn model(&self) -> &str;

    /// Generate a JSON object matching `response_schema`.
    ///
    /// # Arguments
    /// * `prompt` - Natural-language instruction
    /// * `response_schema` - JSON Schema the output must follow
    /// * `temperature` - Sampling temperature in [0, 1]
    /// * `max_tokens` - Output token budget
    async fn generate_structured(
        &self,
        prompt: &str,
        response_schema: &serde_json::Value,
        temperature: f32,
        max_tokens: u32,
    ) -> LlmResult<StructuredResponse>;
}

/// Bounds the number of requests in flight to one vendor.
#[derive(Debug)]
pub struct RequestLimiter {
    semaphore: Semaphore,
}

impl RequestLimiter {
    /// A limiter with `max_in_flight` slots (at least one).
    pub fn new(max_in_flight: usize) -> Self {
        Self {
            semaphore: Semaphore::new(max_in_flight.max(1)),
        }
    }

    /// Wait for a free slot. The slot is released when the permit drops.
    pub async fn acquire(&self) -> LlmResult<SemaphorePermit<'_>> {
        self.semaphore.acquire().await.map_err(|_| LlmError::NetworkError {
            message: "request limiter closed".to_string(),
        })
    }

    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }
}

/// Helper function to create an error for a missing API key
pub fn missing_api_key_error(provider: &str) -> LlmError {
    LlmError::Configuration {
        message: format!("API key not configured for {}", provider),
    }
}

/// Seconds from a `retry-after` header. HTTP-date values are ignored.
pub fn retry_after_secs(headers: &HeaderMap) -> Option<u32> {
    headers
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse()
        .ok()
}

/// Helper function to parse HTTP error status codes
pub fn parse_http_error(
    status: u16,
    body: &str,
    provider: &str,
    retry_after: Option<u32>,
) -> LlmError {
    match status {
        401 => LlmError::AuthenticationFailed {
            message: format!("{}: Invalid API key", provider),
        },
        403 => LlmError::AuthenticationFailed {
            message: format!("{}: Access denied", provider),
        },
        404 => LlmError::ModelNotFound {
            model: body.to_string(),
        },
        408 => LlmError::Timeout {
            message: format!("{}: {}", provider, body),
        },
        429 => LlmError::RateLimited {
            message: body.to_string(),
            retry_after,
        },
        400 | 422 => LlmError::InvalidRequest {
            message: body.to_string(),
        },
        500..=599 => LlmError::ServerError {
            message: body.to_string(),
            status: Some(status),
        },
        _ => LlmError::ServerError {
            message: format!("HTTP {}: {}", status, body),
            status: Some(status),
        },
    }
}
