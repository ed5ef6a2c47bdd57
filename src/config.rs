//! Settings
//!
//! LLM backend settings read from an optional JSON file and then overridden
//! by environment variables. Credentials may be read from the file but are
//! never written back out.

use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use interview_prep_core::ProxyConfig;
use interview_prep_llm::{ClientSettings, ProviderConfig, ProviderType, RetryPolicy};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::utils::error::{AppError, AppResult};

/// Application settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// `openai` or `anthropic`
    pub llm_provider: String,
    /// Serve canned responses instead of calling a vendor
    pub use_stub_llm: bool,
    #[serde(skip_serializing)]
    pub openai_api_key: Option<String>,
    #[serde(skip_serializing)]
    pub anthropic_api_key: Option<String>,
    pub openai_model: String,
    pub anthropic_model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub openai_base_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anthropic_base_url: Option<String>,
    /// Per-request timeout for vendor calls, in seconds
    pub request_timeout_secs: u64,
    /// In-flight request cap per vendor
    pub max_concurrent_requests: usize,
    /// Total calls per operation, including the first
    pub retry_attempts: u32,
    /// Wait after the first failure, in milliseconds; doubles afterwards
    pub retry_base_delay_ms: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxy: Option<ProxyConfig>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            llm_provider: ProviderType::OpenAI.to_string(),
            use_stub_llm: false,
            openai_api_key: None,
            anthropic_api_key: None,
            openai_model: ProviderType::OpenAI.default_model().to_string(),
            anthropic_model: ProviderType::Anthropic.default_model().to_string(),
            openai_base_url: None,
            anthropic_base_url: None,
            request_timeout_secs: 60,
            max_concurrent_requests: 4,
            retry_attempts: 3,
            retry_base_delay_ms: 1000,
            proxy: None,
        }
    }
}

impl Settings {
    /// Load settings from `path` (or the default config file when `None`),
    /// apply environment overrides and validate.
    ///
    /// An explicit path must exist; the default file is optional. `force_stub`
    /// turns on the stub client before validation, so it wins over any
    /// provider name.
    pub fn load(path: Option<&Path>, force_stub: bool) -> AppResult<Self> {
        Self::load_with(path, force_stub, |key| std::env::var(key).ok())
    }

    /// [`Settings::load`] with an explicit variable lookup.
    pub fn load_with<F>(path: Option<&Path>, force_stub: bool, lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let default_path = crate::utils::paths::config_path()?;
                if default_path.exists() {
                    Self::from_file(&default_path)?
                } else {
                    Self::default()
                }
            }
        };
        settings.apply_env(lookup)?;
        if force_stub {
            settings.use_stub_llm = true;
        }
        settings.validate().map_err(AppError::validation)?;
        Ok(settings)
    }

    /// Read settings from a JSON file. Missing fields take their defaults.
    pub fn from_file(path: &Path) -> AppResult<Self> {
        debug!(path = %path.display(), "loading settings");
        let content = fs::read_to_string(path)?;
        let settings: Settings = serde_json::from_str(&content)?;
        Ok(settings)
    }

    /// Save settings as pretty JSON. Credentials are omitted.
    pub fn save(&self, path: &Path) -> AppResult<()> {
        self.validate().map_err(AppError::validation)?;
        if let Some(parent) = path.parent() {
            crate::utils::paths::ensure_dir(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Override fields from variables returned by `lookup`.
    ///
    /// Unset variables leave the field untouched; unparsable values are a
    /// configuration error.
    pub fn apply_env<F>(&mut self, lookup: F) -> AppResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(v) = lookup("LLM_PROVIDER") {
            self.llm_provider = v;
        }
        if let Some(v) = lookup("USE_STUB_LLM") {
            self.use_stub_llm = parse_bool("USE_STUB_LLM", &v)?;
        }
        if let Some(v) = lookup("OPENAI_API_KEY") {
            self.openai_api_key = Some(v);
        }
        if let Some(v) = lookup("ANTHROPIC_API_KEY") {
            self.anthropic_api_key = Some(v);
        }
        if let Some(v) = lookup("OPENAI_MODEL") {
            self.openai_model = v;
        }
        if let Some(v) = lookup("ANTHROPIC_MODEL") {
            self.anthropic_model = v;
        }
        if let Some(v) = lookup("OPENAI_BASE_URL") {
            self.openai_base_url = Some(v);
        }
        if let Some(v) = lookup("ANTHROPIC_BASE_URL") {
            self.anthropic_base_url = Some(v);
        }
        if let Some(v) = lookup("LLM_TIMEOUT_SECS") {
            self.request_timeout_secs = parse_number("LLM_TIMEOUT_SECS", &v)?;
        }
        if let Some(v) = lookup("LLM_MAX_CONCURRENCY") {
            self.max_concurrent_requests = parse_number("LLM_MAX_CONCURRENCY", &v)?;
        }
        if let Some(v) = lookup("LLM_RETRY_ATTEMPTS") {
            self.retry_attempts = parse_number("LLM_RETRY_ATTEMPTS", &v)?;
        }
        if let Some(v) = lookup("LLM_RETRY_BASE_DELAY_MS") {
            self.retry_base_delay_ms = parse_number("LLM_RETRY_BASE_DELAY_MS", &v)?;
        }
        Ok(())
    }

    /// Validate the settings
    pub fn validate(&self) -> Result<(), String> {
        if self.request_timeout_secs == 0 {
            return Err("request_timeout_secs must be greater than 0".to_string());
        }
        if self.max_concurrent_requests == 0 {
            return Err("max_concurrent_requests must be greater than 0".to_string());
        }
        if self.retry_attempts == 0 {
            return Err("retry_attempts must be at least 1".to_string());
        }
        if !self.use_stub_llm {
            ProviderType::from_str(&self.llm_provider).map_err(|e| e.to_string())?;
        }
        Ok(())
    }

    fn provider_config(
        &self,
        provider: ProviderType,
        api_key: &Option<String>,
        model: &str,
        base_url: &Option<String>,
    ) -> ProviderConfig {
        ProviderConfig {
            api_key: api_key.clone(),
            model: model.to_string(),
            base_url: base_url.clone(),
            request_timeout_secs: self.request_timeout_secs,
            max_concurrent_requests: self.max_concurrent_requests,
            proxy: self.proxy.clone(),
            ..ProviderConfig::new(provider)
        }
    }

    /// Inputs for the LLM client factory.
    pub fn client_settings(&self) -> ClientSettings {
        ClientSettings {
            provider: self.llm_provider.clone(),
            use_stub: self.use_stub_llm,
            openai: self.provider_config(
                ProviderType::OpenAI,
                &self.openai_api_key,
                &self.openai_model,
                &self.openai_base_url,
            ),
            anthropic: self.provider_config(
                ProviderType::Anthropic,
                &self.anthropic_api_key,
                &self.anthropic_model,
                &self.anthropic_base_url,
            ),
        }
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.retry_attempts,
            Duration::from_millis(self.retry_base_delay_ms),
        )
    }
}

fn parse_bool(key: &str, value: &str) -> AppResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(AppError::config(format!(
            "{} must be a boolean, got '{}'",
            key, other
        ))),
    }
}

fn parse_number<T: FromStr>(key: &str, value: &str) -> AppResult<T> {
    value
        .trim()
        .parse()
        .map_err(|_| AppError::config(format!("{} must be a number, got '{}'", key, value)))
}
