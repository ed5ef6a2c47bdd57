//! OpenAI Provider
//!
//! Structured output against the Chat Completions API. The first request asks
//! for schema-constrained output; when the vendor will not honour the schema
//! the call is repeated in plain JSON mode with the schema spelled out in the
//! system message.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use super::provider::{parse_http_error, retry_after_secs, RequestLimiter, StructuredClient};
use super::types::{LlmError, LlmResult, ProviderConfig, StructuredResponse};
use crate::http_client::build_http_client;
use crate::json_extract::{parse_json_object, parse_structured};

/// Default OpenAI API endpoint
const OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";

const SYSTEM_PROMPT: &str =
    "You are a helpful AI assistant. Always respond with valid JSON matching the requested schema.";

const JSON_ONLY_SUFFIX: &str = "Respond with valid JSON only, no other text.";

/// Outcome of the schema-aware request.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaAttempt {
    /// The vendor returned an object under the schema.
    Parsed(StructuredResponse),
    /// The vendor declined the schema-aware path; the reason is logged.
    NeedsFallback(String),
}

/// OpenAI provider
pub struct OpenAIProvider {
    config: ProviderConfig,
    client: reqwest::Client,
    limiter: RequestLimiter,
}

impl OpenAIProvider {
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
        self.config.base_url.as_deref().unwrap_or(OPENAI_API_URL)
    }

    /// First step: request schema-constrained output.
    pub async fn try_schema_aware(
        &self,
        prompt: &str,
        response_schema: &Value,
        temperature: f32,
        max_tokens: u32,
    ) -> LlmResult<SchemaAttempt> {
        let body = build_schema_request(
            &self.config.model,
            prompt,
            response_schema,
            temperature,
            max_tokens,
        );
        let message = match self.post_chat(&body).await {
            Ok(message) => message,
            Err(LlmError::InvalidRequest { message }) => {
                return Ok(SchemaAttempt::NeedsFallback(format!(
                    "schema-aware request rejected: {}",
                    message
                )))
            }
            Err(err) => return Err(err),
        };

        if let Some(refusal) = message.refusal.filter(|r| !r.trim().is_empty()) {
            return Ok(SchemaAttempt::NeedsFallback(format!("refusal: {}", refusal)));
        }
        let content = message.content.unwrap_or_default();
        if content.trim().is_empty() {
            return Ok(SchemaAttempt::NeedsFallback("empty content".to_string()));
        }
        match parse_json_object(&content) {
            Ok(map) => Ok(SchemaAttempt::Parsed(map)),
            Err(err) => Ok(SchemaAttempt::NeedsFallback(err.to_string())),
        }
    }

    /// Second step: plain JSON mode with the schema embedded in the prompt.
    pub async fn generate_fallback(
        &self,
        prompt: &str,
        response_schema: &Value,
        temperature: f32,
        max_tokens: u32,
    ) -> LlmResult<StructuredResponse> {
        let body = build_fallback_request(
            &self.config.model,
            prompt,
            response_schema,
            temperature,
            max_tokens,
        );
        let message = self.post_chat(&body).await?;
        parse_structured(message.content.as_deref().unwrap_or_default())
    }

    async fn post_chat(&self, body: &Value) -> LlmResult<ResponseMessage> {
        let api_key = self.config.require_api_key()?;
        let _permit = self.limiter.acquire().await?;
        debug!(model = %self.config.model, url = %self.base_url(), "openai chat completion");

        let response = self
            .client
            .post(self.base_url())
            .header("Authorization", format!("Bearer {}", api_key))
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(LlmError::from)?;

        let status = response.status().as_u16();
        let retry_after = retry_after_secs(response.headers());
        let body_text = response.text().await.map_err(LlmError::from)?;

        if status != 200 {
            return Err(parse_http_error(status, &body_text, "openai", retry_after));
        }

        let chat: ChatResponse = serde_json::from_str(&body_text)
            .map_err(|e| LlmError::response(format!("Failed to parse response: {}", e)))?;
        chat.choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .ok_or_else(|| LlmError::response("response contained no choices"))
    }
}

#[async_trait]
impl StructuredClient for OpenAIProvider {
    fn name(&self) -> &'static str {
        "openai"
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
        match self
            .try_schema_aware(prompt, response_schema, temperature, max_tokens)
            .await?
        {
            SchemaAttempt::Parsed(map) => Ok(map),
            SchemaAttempt::NeedsFallback(reason) => {
                warn!(reason = %reason, "schema-aware output unavailable, falling back to JSON mode");
                self.generate_fallback(prompt, response_schema, temperature, max_tokens)
                    .await
            }
        }
    }
}

/// `json_schema.name` must match `^[a-zA-Z0-9_-]+$`.
fn schema_name(schema: &Value) -> &str {
    schema
        .get("title")
        .and_then(Value::as_str)
        .filter(|t| {
            !t.is_empty()
                && t.len() <= 64
                && t.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        })
        .unwrap_or("structured_response")
}

fn build_schema_request(
    model: &str,
    prompt: &str,
    schema: &Value,
    temperature: f32,
    max_tokens: u32,
) -> Value {
    json!({
        "model": model,
        "messages": [
            {"role": "system", "content": SYSTEM_PROMPT},
            {"role": "user", "content": prompt},
        ],
        "temperature": temperature,
        "max_tokens": max_tokens,
        "response_format": {
            "type": "json_schema",
            "json_schema": {
                "name": schema_name(schema),
                "schema": schema,
                "strict": false,
            },
        },
    })
}

fn build_fallback_request(
    model: &str,
    prompt: &str,
    schema: &Value,
    temperature: f32,
    max_tokens: u32,
) -> Value {
    let schema_text = serde_json::to_string_pretty(schema).unwrap_or_else(|_| schema.to_string());
    json!({
        "model": model,
        "messages": [
            {
                "role": "system",
                "content": format!(
                    "{}\n\nRespond with JSON matching this schema:\n{}",
                    SYSTEM_PROMPT, schema_text
                ),
            },
            {"role": "user", "content": format!("{}\n\n{}", prompt, JSON_ONLY_SUFFIX)},
        ],
        "temperature": temperature,
        "max_tokens": max_tokens,
        "response_format": {"type": "json_object"},
    })
}

/// OpenAI API response format
#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ResponseMessage>,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
    #[serde(default)]
    refusal: Option<String>,
}
