//! Anthropic Claude Provider
//!
//! Claude has no schema-constrained mode, so the schema is appended to the
//! prompt and the reply text is decoded with the fenced-JSON extractor.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::debug;

use super::provider::{parse_http_error, retry_after_secs, RequestLimiter, StructuredClient};
use super::types::{LlmError, LlmResult, ProviderConfig, StructuredResponse};
use crate::http_client::build_http_client;
use crate::json_extract::parse_structured;

/// Default Anthropic API endpoint
const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";

/// Current API version
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Anthropic Claude provider
pub struct AnthropicProvider {
    config: ProviderConfig,
    client: reqwest::Client,
    limiter: RequestLimiter,
}

impl AnthropicProvider {
    /// Create a provider. Fails when no API key is configured.
    pub fn new(config: ProviderConfig) -> LlmResult<Self> {
        config.require_api_key()?;
        let client = build_http_client(config.proxy.as_ref(), config.request_timeout())?;
        let limiter = RequestLimiter::new(config.max_concurrent_requests);
        Ok(Self {
            config,
            client,
            limiter,
        })
    }

    /// Get the API base URL
    fn base_url(&self) -> &str {
        self.config.base_url.as_deref().unwrap_or(ANTHROPIC_API_URL)
    }
}

#[async_trait]
impl StructuredClient for AnthropicProvider {
    fn name(&self) -> &'static str {
        "anthropic"
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    async fn generate_structured(
        &self,
        prompt: &str,
        response_schema: &Value,
        temperature: f32,
        max_tokens: u32,
    ) -> LlmResult<StructuredResponse> {
        let api_key = self.config.require_api_key()?;
        let body = build_request_body(
            &self.config.model,
            prompt,
            response_schema,
            temperature,
            max_tokens,
        );

        let _permit = self.limiter.acquire().await?;
        debug!(model = %self.config.model, url = %self.base_url(), "anthropic messages request");

        let response = self
            .client
            .post(self.base_url())
            .header("x-api-key", api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(LlmError::from)?;

        let status = response.status().as_u16();
        let retry_after = retry_after_secs(response.headers());
        let body_text = response.text().await.map_err(LlmError::from)?;

        if status != 200 {
            return Err(parse_http_error(status, &body_text, "anthropic", retry_after));
        }

        let claude_response: ClaudeResponse = serde_json::from_str(&body_text)
            .map_err(|e| LlmError::response(format!("Failed to parse response: {}", e)))?;

        parse_structured(&claude_response.text())
    }
}

fn build_request_body(
    model: &str,
    prompt: &str,
    schema: &Value,
    temperature: f32,
    max_tokens: u32,
) -> Value {
    json!({
        "model": model,
        "max_tokens": max_tokens,
        "temperature": temperature,
        "messages": [
            {
                "role": "user",
                "content": format!(
                    "{}\n\nRespond with valid JSON matching this schema: {}",
                    prompt, schema
                ),
            }
        ],
    })
}

/// Claude API response format
#[derive(Debug, Deserialize)]
struct ClaudeResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

impl ClaudeResponse {
    /// Concatenated text of all text blocks.
    fn text(&self) -> String {
        self.content
            .iter()
            .filter_map(|block| match block {
                ContentBlock::Text { text } => Some(text.as_str()),
                ContentBlock::Other => None,
            })
            .collect()
    }
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentBlock {
    Text {
        text: String,
    },
    #[serde(other)]
    Other,
}
