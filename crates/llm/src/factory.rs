//! Client Selection
//!
//! Builds the process-wide structured client from settings.

use std::sync::Arc;

use tracing::info;

use super::anthropic::AnthropicProvider;
use super::openai::OpenAIProvider;
use super::provider::StructuredClient;
use super::stub::StubClient;
use super::types::{LlmResult, ProviderConfig, ProviderType};

/// Inputs for [`create_client`].
#[derive(Debug, Clone)]
pub struct ClientSettings {
    /// Provider name; `openai` or `anthropic`, case-insensitive.
    pub provider: String,
    /// When set, the offline stub is used regardless of `provider`.
    pub use_stub: bool,
    pub openai: ProviderConfig,
    pub anthropic: ProviderConfig,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            provider: ProviderType::OpenAI.to_string(),
            use_stub: false,
            openai: ProviderConfig::new(ProviderType::OpenAI),
            anthropic: ProviderConfig::new(ProviderType::Anthropic),
        }
    }
}

/// Create the client named by `settings`.
///
/// An unknown provider name or a missing credential fails here, before any
/// call is made.
pub fn create_client(settings: &ClientSettings) -> LlmResult<Arc<dyn StructuredClient>> {
    if settings.use_stub {
        info!("using stub LLM client");
        return Ok(Arc::new(StubClient::new()));
    }

    let client: Arc<dyn StructuredClient> = match settings.provider.parse::<ProviderType>()? {
        ProviderType::OpenAI => Arc::new(OpenAIProvider::new(settings.openai.clone())?),
        ProviderType::Anthropic => Arc::new(AnthropicProvider::new(settings.anthropic.clone())?),
    };
    info!(provider = client.name(), model = client.model(), "LLM client ready");
    Ok(client)
}
