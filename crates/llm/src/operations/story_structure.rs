use super::{temperature, InterviewCoach};
use crate::modes::ModeName;
use crate::schemas::GenerateStoryStructureResponse;
use crate::types::LlmResult;

pub fn build_story_structure_prompt(question: &str, topic_context: Option<&str>) -> String {
    let context_text = match topic_context {
        Some(context) if !context.is_empty() => format!("\n\nTopic context: {}", context),
        _ => String::new(),
    };

    format!(
        "You are an expert interview coach. Generate a structured story outline to help the user answer this interview question using the STAR method (Situation, Task, Action, Result) or similar framework.

Question: {question}{context_text}

Provide a clear, editable outline that the user can fill in with their own experiences. Include section headers and bullet points for key points to cover. Keep it concise but comprehensive (max 500 words).

Respond with a JSON object with a single field \"structure_text\" containing the full outline."
    )
}

impl InterviewCoach {
    pub async fn generate_story_structure(
        &self,
        question: &str,
        topic_context: Option<&str>,
    ) -> LlmResult<GenerateStoryStructureResponse> {
        let prompt = build_story_structure_prompt(question, topic_context);
        self.run_mode(
            ModeName::GenerateStoryStructure,
            prompt,
            temperature::GENERATE_STORY_STRUCTURE,
        )
        .await
    }
}
