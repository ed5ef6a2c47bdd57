//! Study Records
//!
//! Plain records handed from the study flow to the LLM operations: questions
//! asked earlier in a topic (with the rating they received) and the raw
//! answer attempts collected during one session.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Lowest rating/score on the 1-10 scale.
pub const MIN_RATING: u8 = 1;

/// Highest rating/score on the 1-10 scale.
pub const MAX_RATING: u8 = 10;

/// A question that was already asked for a topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreviousQuestion {
    pub question: String,
    /// Best rating the user got on it, if the question was ever scored.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<u8>,
}

impl PreviousQuestion {
    pub fn new(question: impl Into<String>, rating: Option<u8>) -> Self {
        Self {
            question: question.into(),
            rating,
        }
    }
}

/// One answer given during a study session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttemptRecord {
    pub question: String,
    pub answer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<u8>,
}

impl AttemptRecord {
    pub fn new(question: impl Into<String>, answer: impl Into<String>, score: Option<u8>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
            score,
        }
    }

    /// Rejects blank questions and scores off the 1-10 scale.
    pub fn validate(&self) -> CoreResult<()> {
        if self.question.trim().is_empty() {
            return Err(CoreError::validation("attempt has an empty question"));
        }
        match self.score {
            Some(score) if !is_valid_rating(score) => Err(CoreError::validation(format!(
                "score {} for '{}' is outside {}-{}",
                score, self.question, MIN_RATING, MAX_RATING
            ))),
            _ => Ok(()),
        }
    }
}

/// Returns true when `value` lies on the 1-10 rating scale.
pub fn is_valid_rating(value: u8) -> bool {
    (MIN_RATING..=MAX_RATING).contains(&value)
}
