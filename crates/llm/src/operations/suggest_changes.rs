use serde_json::Value;

use super::{temperature, InterviewCoach};
use crate::modes::ModeName;
use crate::schemas::SuggestPlanResponse;
use crate::types::LlmResult;

/// Inputs for revising an existing plan.
#[derive(Debug, Clone, Copy)]
pub struct PlanRevisionRequest<'a> {
    pub current_plan: &'a Value,
    pub role: &'a str,
    pub user_context: &'a str,
    pub current_progress: Option<&'a Value>,
    pub user_feedback: Option<&'a [Value]>,
}

fn render(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

pub fn build_suggest_changes_prompt(request: &PlanRevisionRequest<'_>) -> String {
    let progress_text = match request.current_progress {
        Some(progress) if !is_empty(progress) => format!("\n\nCurrent Progress:\n{}", render(progress)),
        _ => String::new(),
    };
    let feedback_text = match request.user_feedback {
        Some(feedback) if !feedback.is_empty() => format!(
            "\n\nUser Feedback:\n{}",
            render(&Value::Array(feedback.to_vec()))
        ),
        _ => String::new(),
    };

    format!(
        "You are an expert interview coach. Analyze the current study plan and suggest improvements.

User's Target Role: {role}

Current Plan:
{plan}

User Context:
{context}{progress_text}{feedback_text}

Based on the current plan, user progress, and feedback, suggest an updated plan that:
1. Adjusts time allocation based on progress (spend more time on weak areas, less on mastered topics)
2. Re-prioritizes topics if needed
3. Maintains realistic daily time commitments
4. Addresses any user feedback or concerns
5. Explains the rationale for changes

Respond with a JSON object matching the required schema.",
        role = request.role,
        plan = render(request.current_plan),
        context = request.user_context,
    )
}

/// Empty objects and nulls count as "no progress supplied".
fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Object(map) => map.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

impl InterviewCoach {
    /// Revise an existing plan in light of progress and feedback.
    pub async fn suggest_plan_changes(
        &self,
        current_plan: &Value,
        role: &str,
        user_context: &str,
        current_progress: Option<&Value>,
        user_feedback: Option<&[Value]>,
    ) -> LlmResult<SuggestPlanResponse> {
        let prompt = build_suggest_changes_prompt(&PlanRevisionRequest {
            current_plan,
            role,
            user_context,
            current_progress,
            user_feedback,
        });
        self.run_mode(
            ModeName::SuggestPlanChanges,
            prompt,
            temperature::SUGGEST_PLAN_CHANGES,
        )
        .await
    }
}
