//! Typed Response Records
//!
//! The shapes each mode must produce. Their JSON Schemas (derived with
//! `schemars`) are what the mode registry hands to the clients, and decoded
//! responses are turned back into these records with [`from_structured`].

use interview_prep_core::is_valid_rating;
use schemars::JsonSchema;
use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Number, Value};

use crate::types::{LlmError, LlmResult, StructuredResponse};

/// Maximum number of feedback items in either evaluation list.
pub const MAX_FEEDBACK_ITEMS: usize = 3;

/// A record a mode produces.
pub trait ResponseRecord: Serialize + DeserializeOwned + JsonSchema {
    /// Name used in error messages.
    const RECORD_NAME: &'static str;

    /// Check invariants serde cannot express.
    fn validate(&self) -> Result<(), String> {
        Ok(())
    }
}

// ============================================================================
// Whole numbers
// ============================================================================

/// Integer value of a JSON number, accepting integral floats such as `7.0`.
fn whole_number(n: &Number) -> Option<i64> {
    n.as_i64().or_else(|| {
        n.as_f64()
            .filter(|f| f.is_finite() && f.fract() == 0.0)
            .filter(|f| *f >= i64::MIN as f64 && *f <= i64::MAX as f64)
            .map(|f| f as i64)
    })
}

/// JSON Schema treats `7.0` as an integer, so integer fields accept it too.
fn deserialize_whole<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<i64>,
{
    let n = Number::deserialize(deserializer)?;
    whole_number(&n)
        .and_then(|v| T::try_from(v).ok())
        .ok_or_else(|| D::Error::custom(format!("expected a whole number in range, got {}", n)))
}

fn deserialize_optional_whole<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Number>::deserialize(deserializer)? {
        None => Ok(None),
        Some(n) => whole_number(&n)
            .map(Some)
            .ok_or_else(|| D::Error::custom(format!("expected a whole number, got {}", n))),
    }
}

// ============================================================================
// Plans
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PlanOverview {
    pub target_role: String,
    #[serde(deserialize_with = "deserialize_whole")]
    pub total_daily_minutes: u32,
    #[serde(deserialize_with = "deserialize_whole")]
    pub time_horizon_weeks: u32,
    /// At most 60 words.
    pub rationale: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PlanTopic {
    /// At most 3 words.
    pub name: String,
    /// At most 20 words.
    pub description: String,
    /// Rank; 1 is the highest priority.
    #[schemars(range(min = 1))]
    #[serde(deserialize_with = "deserialize_whole")]
    pub priority: u32,
    #[serde(deserialize_with = "deserialize_whole")]
    pub daily_study_minutes: u32,
    /// At most 15 words.
    pub expected_outcome: String,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_optional_whole"
    )]
    pub topic_id: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SuggestPlanResponse {
    pub plan_overview: PlanOverview,
    /// Order is significant and preserved.
    pub plan_topics: Vec<PlanTopic>,
}

impl ResponseRecord for SuggestPlanResponse {
    const RECORD_NAME: &'static str = "SuggestPlanResponse";

    fn validate(&self) -> Result<(), String> {
        match self.plan_topics.iter().find(|t| t.priority == 0) {
            Some(topic) => Err(format!(
                "topic '{}' has priority 0; priorities start at 1",
                topic.name
            )),
            None => Ok(()),
        }
    }
}

// ============================================================================
// Questions
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum QuestionStatus {
    New,
    Redo,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum RedoReason {
    WeakAnswer,
    Incomplete,
    TimePressure,
    HighValue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct QuestionSchema {
    /// At most 30 words.
    pub question: String,
    pub status: QuestionStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redo_reason: Option<RedoReason>,
    pub difficulty: Difficulty,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct GenerateQuestionsResponse {
    pub questions: Vec<QuestionSchema>,
}

impl ResponseRecord for GenerateQuestionsResponse {
    const RECORD_NAME: &'static str = "GenerateQuestionsResponse";
}

// ============================================================================
// Evaluation
// ============================================================================

/// A short named key point an answer should cover.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Anchor {
    /// At most 3 words.
    pub name: String,
    /// At most 50 words.
    pub anchor: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct EvaluateAnswerResponse {
    #[schemars(range(min = 1, max = 10))]
    #[serde(deserialize_with = "deserialize_whole")]
    pub score: u8,
    #[schemars(length(max = 3))]
    pub positive_feedback: Vec<String>,
    #[schemars(length(max = 3))]
    pub improvement_areas: Vec<String>,
    pub anchors: Vec<Anchor>,
}

impl ResponseRecord for EvaluateAnswerResponse {
    const RECORD_NAME: &'static str = "EvaluateAnswerResponse";

    fn validate(&self) -> Result<(), String> {
        if !is_valid_rating(self.score) {
            return Err(format!("score {} is outside 1-10", self.score));
        }
        if self.positive_feedback.len() > MAX_FEEDBACK_ITEMS {
            return Err(format!(
                "{} positive feedback items (max {})",
                self.positive_feedback.len(),
                MAX_FEEDBACK_ITEMS
            ));
        }
        if self.improvement_areas.len() > MAX_FEEDBACK_ITEMS {
            return Err(format!(
                "{} improvement areas (max {})",
                self.improvement_areas.len(),
                MAX_FEEDBACK_ITEMS
            ));
        }
        Ok(())
    }
}

// ============================================================================
// Session reconciliation
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct QuestionAttemptSummary {
    pub question: String,
    #[serde(deserialize_with = "deserialize_whole")]
    pub attempts: u32,
    #[schemars(range(min = 1, max = 10))]
    #[serde(deserialize_with = "deserialize_whole")]
    pub best_score: u8,
    pub best_anchors: Vec<Anchor>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ReconcileSessionResponse {
    pub question_attempts: Vec<QuestionAttemptSummary>,
}

impl ReconcileSessionResponse {
    /// Integer mean of the best scores, or `None` when nothing was summarized.
    pub fn average_best_score(&self) -> Option<u8> {
        if self.question_attempts.is_empty() {
            return None;
        }
        let total: u32 = self
            .question_attempts
            .iter()
            .map(|qa| u32::from(qa.best_score))
            .sum();
        u8::try_from(total / self.question_attempts.len() as u32).ok()
    }
}

impl ResponseRecord for ReconcileSessionResponse {
    const RECORD_NAME: &'static str = "ReconcileSessionResponse";

    fn validate(&self) -> Result<(), String> {
        match self
            .question_attempts
            .iter()
            .find(|qa| !is_valid_rating(qa.best_score))
        {
            Some(qa) => Err(format!(
                "best_score {} for '{}' is outside 1-10",
                qa.best_score, qa.question
            )),
            None => Ok(()),
        }
    }
}

// ============================================================================
// Story structure
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct GenerateStoryStructureResponse {
    pub structure_text: String,
}

impl ResponseRecord for GenerateStoryStructureResponse {
    const RECORD_NAME: &'static str = "GenerateStoryStructureResponse";
}

// ============================================================================
// Conversion
// ============================================================================

/// Strictly build a typed record from a decoded response.
///
/// Missing required fields and wrong types fail; unknown fields are ignored.
pub fn from_structured<T: ResponseRecord>(response: StructuredResponse) -> LlmResult<T> {
    let record: T = serde_json::from_value(Value::Object(response))
        .map_err(|e| LlmError::validation(format!("{}: {}", T::RECORD_NAME, e)))?;
    record
        .validate()
        .map_err(|e| LlmError::validation(format!("{}: {}", T::RECORD_NAME, e)))?;
    Ok(record)
}

/// Serialize a record back to the response mapping.
pub fn to_structured<T: Serialize>(record: &T) -> LlmResult<StructuredResponse> {
    match serde_json::to_value(record) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(LlmError::validation("record did not serialize to an object")),
        Err(e) => Err(LlmError::validation(e.to_string())),
    }
}

/// JSON Schema for a record, as a plain JSON value.
pub fn schema_value<T: JsonSchema>() -> Value {
    schemars::schema_for!(T).to_value()
}
