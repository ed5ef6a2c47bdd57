//! Coaching Operations
//!
//! One async method per mode. Each builds its prompt, calls the client
//! through the retry wrapper, checks the reply against the mode's schema and
//! then builds the typed record.

mod evaluate_answer;
mod generate_questions;
mod reconcile_session;
mod story_structure;
mod suggest_changes;
mod suggest_plan;

use std::sync::Arc;

use tracing::debug;

pub use evaluate_answer::build_evaluate_answer_prompt;
pub use generate_questions::build_generate_questions_prompt;
pub use reconcile_session::build_reconcile_session_prompt;
pub use story_structure::build_story_structure_prompt;
pub use suggest_changes::{build_suggest_changes_prompt, PlanRevisionRequest};
pub use suggest_plan::build_suggest_plan_prompt;

use crate::modes::{mode, ModeName};
use crate::provider::StructuredClient;
use crate::retry::{with_retry, RetryPolicy};
use crate::schemas::{from_structured, ResponseRecord};
use crate::types::{LlmError, LlmResult};

/// Sampling temperature per operation. Fixed; not configurable per call.
pub mod temperature {
    pub const SUGGEST_PLAN: f32 = 0.7;
    pub const SUGGEST_PLAN_CHANGES: f32 = 0.7;
    pub const GENERATE_QUESTIONS: f32 = 0.8;
    pub const EVALUATE_ANSWER: f32 = 0.5;
    pub const RECONCILE_SESSION: f32 = 0.6;
    pub const GENERATE_STORY_STRUCTURE: f32 = 0.7;
}

/// Entry point for the coaching operations.
#[derive(Clone)]
pub struct InterviewCoach {
    client: Arc<dyn StructuredClient>,
    retry: RetryPolicy,
}

impl InterviewCoach {
    pub fn new(client: Arc<dyn StructuredClient>, retry: RetryPolicy) -> Self {
        Self { client, retry }
    }

    /// A coach that makes exactly one call per operation.
    pub fn without_retry(client: Arc<dyn StructuredClient>) -> Self {
        Self::new(client, RetryPolicy::none())
    }

    pub fn client(&self) -> &Arc<dyn StructuredClient> {
        &self.client
    }

    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Call the client for `name` and build the record.
    ///
    /// Transport failures and schema mismatches are retried; a record that
    /// fails typed construction is not.
    async fn run_mode<T: ResponseRecord>(
        &self,
        name: ModeName,
        prompt: String,
        temperature: f32,
    ) -> LlmResult<T> {
        let mode = mode(name);
        let client = &self.client;
        let prompt = prompt.as_str();
        debug!(
            mode = mode.name,
            client = client.name(),
            prompt_chars = prompt.len(),
            "running LLM mode"
        );

        let response = with_retry(&self.retry, || async move {
            let response = client
                .generate_structured(prompt, &mode.response_schema, temperature, mode.max_tokens)
                .await?;
            mode.validate_response(&response)?;
            Ok::<_, LlmError>(response)
        })
        .await?;

        from_structured(response)
    }
}

impl std::fmt::Debug for InterviewCoach {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InterviewCoach")
            .field("client", &self.client.name())
            .field("retry", &self.retry)
            .finish()
    }
}
