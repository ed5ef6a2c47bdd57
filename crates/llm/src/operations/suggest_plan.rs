use super::{temperature, InterviewCoach};
use crate::modes::ModeName;
use crate::schemas::SuggestPlanResponse;
use crate::types::LlmResult;

pub fn build_suggest_plan_prompt(role: &str, user_context: &str) -> String {
    format!(
        "You are an expert interview coach. Create a personalized study plan for interview preparation.

User's Target Role: {role}

User Context:
{user_context}

Based on this information, create a structured study plan that:
1. Breaks down the interview preparation into key topics/categories
2. Allocates appropriate daily study time for each topic
3. Prioritizes topics based on importance and user's weaknesses
4. Sets realistic time horizons
5. Provides clear expected outcomes for each topic

Consider:
- The specific requirements of the role
- Areas where the user may need more practice
- Balanced time allocation across all topics
- Realistic daily time commitments

Respond with a JSON object matching the required schema."
    )
}

impl InterviewCoach {
    /// Draft a study plan for `role` from the user's self-description.
    pub async fn suggest_plan(&self, role: &str, user_context: &str) -> LlmResult<SuggestPlanResponse> {
        let prompt = build_suggest_plan_prompt(role, user_context);
        self.run_mode(ModeName::SuggestPlan, prompt, temperature::SUGGEST_PLAN)
            .await
    }
}
