//! Application State
//!
//! Services shared by every request, built once from settings.

use std::sync::Arc;

use interview_prep_llm::{create_client, InterviewCoach, StructuredClient};
use tracing::info;

use crate::config::Settings;
use crate::services::session::SessionService;
use crate::utils::error::AppResult;

/// Application state
#[derive(Debug, Clone)]
pub struct AppState {
    settings: Arc<Settings>,
    coach: InterviewCoach,
    sessions: SessionService,
}

impl AppState {
    /// Build the LLM client and the services on top of it.
    ///
    /// Fails when the provider is unknown or its credential is missing.
    pub fn from_settings(settings: Settings) -> AppResult<Self> {
        let client = create_client(&settings.client_settings())?;
        info!(
            client = client.name(),
            model = client.model(),
            retry_attempts = settings.retry_attempts,
            "application state initialized"
        );
        Ok(Self::with_client(settings, client))
    }

    /// Build the state around an existing client.
    pub fn with_client(settings: Settings, client: Arc<dyn StructuredClient>) -> Self {
        let coach = InterviewCoach::new(client, settings.retry_policy());
        let sessions = SessionService::new(coach.clone());
        Self {
            settings: Arc::new(settings),
            coach,
            sessions,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn coach(&self) -> &InterviewCoach {
        &self.coach
    }

    pub fn sessions(&self) -> &SessionService {
        &self.sessions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::AppError;

    #[test]
    fn test_stub_state() {
        let settings = Settings {
            use_stub_llm: true,
            ..Default::default()
        };
        let state = AppState::from_settings(settings).unwrap();
        assert_eq!(state.coach().client().name(), "stub");
        assert_eq!(state.coach().retry_policy().attempts, 3);
    }

    #[test]
    fn test_missing_key_is_config_error() {
        let settings = Settings {
            llm_provider: "anthropic".to_string(),
            ..Default::default()
        };
        let err = AppState::from_settings(settings).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }
}
