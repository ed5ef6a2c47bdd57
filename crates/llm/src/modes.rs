//! Mode Registry
//!
//! Static catalog of the named LLM operations. Each mode fixes the output
//! schema and the token budget; the catalog is built once per process and is
//! read-only afterwards.

use std::str::FromStr;
use std::sync::OnceLock;

use jsonschema::Validator;
use serde_json::Value;

use crate::schemas::{
    schema_value, EvaluateAnswerResponse, GenerateQuestionsResponse,
    GenerateStoryStructureResponse, ReconcileSessionResponse, SuggestPlanResponse,
};
use crate::types::{LlmError, LlmResult, StructuredResponse};

/// The six modes, in catalog order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModeName {
    SuggestPlan,
    SuggestPlanChanges,
    GenerateQuestions,
    EvaluateAnswer,
    ReconcileSession,
    GenerateStoryStructure,
}

impl ModeName {
    pub const ALL: [ModeName; 6] = [
        ModeName::SuggestPlan,
        ModeName::SuggestPlanChanges,
        ModeName::GenerateQuestions,
        ModeName::EvaluateAnswer,
        ModeName::ReconcileSession,
        ModeName::GenerateStoryStructure,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ModeName::SuggestPlan => "suggest_plan",
            ModeName::SuggestPlanChanges => "suggest_plan_changes",
            ModeName::GenerateQuestions => "generate_questions",
            ModeName::EvaluateAnswer => "evaluate_answer",
            ModeName::ReconcileSession => "reconcile_session",
            ModeName::GenerateStoryStructure => "generate_story_structure",
        }
    }

    fn index(&self) -> usize {
        match self {
            ModeName::SuggestPlan => 0,
            ModeName::SuggestPlanChanges => 1,
            ModeName::GenerateQuestions => 2,
            ModeName::EvaluateAnswer => 3,
            ModeName::ReconcileSession => 4,
            ModeName::GenerateStoryStructure => 5,
        }
    }
}

impl std::fmt::Display for ModeName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModeName {
    type Err = LlmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ModeName::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| LlmError::configuration(format!("Unknown LLM mode: {}", s)))
    }
}

/// A named LLM operation with its output schema and token budget.
#[derive(Debug)]
pub struct Mode {
    pub name: &'static str,
    pub response_schema: Value,
    pub max_tokens: u32,
    /// Compiled once with the catalog; a compile error is kept for reporting.
    validator: Result<Validator, String>,
}

impl Mode {
    /// Check a decoded response against this mode's schema.
    ///
    /// A mismatch is an `LlmError::ResponseError`, so it is retried like any
    /// other malformed vendor reply.
    pub fn validate_response(&self, response: &StructuredResponse) -> LlmResult<()> {
        let validator = self.validator.as_ref().map_err(|e| {
            LlmError::configuration(format!("mode {} has an invalid schema: {}", self.name, e))
        })?;
        let instance = Value::Object(response.clone());
        let errors: Vec<String> = validator
            .iter_errors(&instance)
            .map(|e| e.to_string())
            .collect();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(LlmError::response(format!(
                "{} response does not match schema: {}",
                self.name,
                errors.join("; ")
            )))
        }
    }
}

fn build_catalog() -> Vec<Mode> {
    ModeName::ALL
        .into_iter()
        .map(|name| {
            let (response_schema, max_tokens) = match name {
                ModeName::SuggestPlan | ModeName::SuggestPlanChanges => {
                    (schema_value::<SuggestPlanResponse>(), 2000)
                }
                ModeName::GenerateQuestions => (schema_value::<GenerateQuestionsResponse>(), 3000),
                ModeName::EvaluateAnswer => (schema_value::<EvaluateAnswerResponse>(), 2000),
                ModeName::ReconcileSession => (schema_value::<ReconcileSessionResponse>(), 4000),
                ModeName::GenerateStoryStructure => {
                    (schema_value::<GenerateStoryStructureResponse>(), 2000)
                }
            };
            let validator =
                jsonschema::validator_for(&response_schema).map_err(|e| e.to_string());
            Mode {
                name: name.as_str(),
                response_schema,
                max_tokens,
                validator,
            }
        })
        .collect()
}

fn catalog() -> &'static [Mode] {
    static CATALOG: OnceLock<Vec<Mode>> = OnceLock::new();
    CATALOG.get_or_init(build_catalog)
}

/// Look up a mode that is referenced statically.
pub fn mode(name: ModeName) -> &'static Mode {
    &catalog()[name.index()]
}

/// Look up a mode by its wire name. Unknown names are a configuration error.
pub fn get_mode(name: &str) -> LlmResult<&'static Mode> {
    let name: ModeName = name.parse()?;
    Ok(mode(name))
}

/// All modes, in catalog order.
pub fn all_modes() -> &'static [Mode] {
    catalog()
}
