use super::{temperature, InterviewCoach};
use crate::modes::ModeName;
use crate::schemas::EvaluateAnswerResponse;
use crate::types::LlmResult;

pub fn build_evaluate_answer_prompt(
    question: &str,
    answer: &str,
    question_context: Option<&str>,
) -> String {
    let context_text = question_context
        .filter(|c| !c.is_empty())
        .map(|c| format!("\n\nQuestion Context: {}", c))
        .unwrap_or_default();

    format!(
        "You are an expert interview coach. Evaluate the following interview answer.

Question: {question}{context_text}

User's Answer:
{answer}

Evaluate this answer and provide:
1. A score from 1-10 (1 = very bad, 10 = very good)
2. 0-3 positive feedback points (what they did well, max 30 words each)
3. 0-3 improvement areas (what could be better, max 30 words each)
4. Answer anchors (key points that should be covered, max 3 words for name, max 50 words for anchor)

Be constructive and specific. Focus on helping the user improve.

Respond with a JSON object matching the required schema."
    )
}

impl InterviewCoach {
    /// Score an answer and explain what a strong answer covers.
    pub async fn evaluate_answer(
        &self,
        question: &str,
        answer: &str,
        question_context: Option<&str>,
    ) -> LlmResult<EvaluateAnswerResponse> {
        let prompt = build_evaluate_answer_prompt(question, answer, question_context);
        self.run_mode(ModeName::EvaluateAnswer, prompt, temperature::EVALUATE_ANSWER)
            .await
    }
}
