use std::fmt::Write;

use interview_prep_core::PreviousQuestion;

use super::{temperature, InterviewCoach};
use crate::modes::ModeName;
use crate::schemas::GenerateQuestionsResponse;
use crate::types::LlmResult;

pub fn build_generate_questions_prompt(
    topic_name: &str,
    topic_description: &str,
    previously_asked: Option<&[PreviousQuestion]>,
) -> String {
    let mut previous_text = String::new();
    if let Some(previous) = previously_asked.filter(|p| !p.is_empty()) {
        previous_text.push_str("\n\nPreviously Asked Questions:\n");
        for q in previous {
            let rating = q
                .rating
                .map(|r| r.to_string())
                .unwrap_or_else(|| "N/A".to_string());
            let _ = writeln!(previous_text, "- {} (Rating: {})", q.question, rating);
        }
    }

    format!(
        "You are an expert interview coach. Generate interview questions for practice.

Topic: {topic_name}
Description: {topic_description}{previous_text}

Generate a mix of questions that:
1. Cover different aspects of the topic
2. Vary in difficulty (easy, medium, hard)
3. Include both new questions and questions to redo (if previous attempts were weak)
4. Focus on areas that need more practice

For questions marked as \"redo\", include the reason (weak_answer, incomplete, time_pressure, or high_value).

Respond with a JSON object matching the required schema."
    )
}

impl InterviewCoach {
    /// Generate practice questions for a topic, taking earlier ratings into
    /// account.
    pub async fn generate_questions(
        &self,
        topic_name: &str,
        topic_description: &str,
        previously_asked: Option<&[PreviousQuestion]>,
    ) -> LlmResult<GenerateQuestionsResponse> {
        let prompt =
            build_generate_questions_prompt(topic_name, topic_description, previously_asked);
        self.run_mode(
            ModeName::GenerateQuestions,
            prompt,
            temperature::GENERATE_QUESTIONS,
        )
        .await
    }
}
