use std::fmt::Write;

use interview_prep_core::AttemptRecord;

use super::{temperature, InterviewCoach};
use crate::modes::ModeName;
use crate::schemas::ReconcileSessionResponse;
use crate::types::LlmResult;

pub fn build_reconcile_session_prompt(question_attempts: &[AttemptRecord]) -> String {
    let mut attempts_text = String::from("\n\nQuestion Attempts:\n");
    for (i, attempt) in question_attempts.iter().enumerate() {
        let score = attempt
            .score
            .map(|s| s.to_string())
            .unwrap_or_else(|| "N/A".to_string());
        let _ = write!(
            attempts_text,
            "\n{}. Question: {}\n   Answer: {}\n   Score: {}\n",
            i + 1,
            attempt.question,
            attempt.answer,
            score
        );
    }

    format!(
        "You are an expert interview coach. Reconcile a study session by analyzing all question attempts.

{attempts_text}

For each question, provide:
1. The question text (max 30 words)
2. Number of attempts made
3. Best score achieved (1-10)
4. Best answer anchors (key points from the best attempt, max 3 words for name, max 50 words for anchor)

This summary will be used to track progress and plan future study sessions.

Respond with a JSON object matching the required schema."
    )
}

impl InterviewCoach {
    /// Summarize every attempt of a session per distinct question.
    pub async fn reconcile_session(
        &self,
        question_attempts: &[AttemptRecord],
    ) -> LlmResult<ReconcileSessionResponse> {
        let prompt = build_reconcile_session_prompt(question_attempts);
        self.run_mode(
            ModeName::ReconcileSession,
            prompt,
            temperature::RECONCILE_SESSION,
        )
        .await
    }
}
