//! Study Session Models
//!
//! A timed study session on one plan topic, and the per-topic progress it
//! feeds when it ends.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A study session on one topic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudySession {
    pub id: i64,
    pub topic_id: i64,
    /// Planned length, in minutes
    pub planned_duration: u32,
    pub start_time: DateTime<Utc>,
    /// Set when the session is ended
    pub end_time: Option<DateTime<Utc>>,
}

impl StudySession {
    /// Start a session now.
    pub fn start(id: i64, topic_id: i64, planned_duration: u32) -> Self {
        Self {
            id,
            topic_id,
            planned_duration,
            start_time: Utc::now(),
            end_time: None,
        }
    }

    pub fn is_ended(&self) -> bool {
        self.end_time.is_some()
    }
}

/// Accumulated progress on one topic
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicProgress {
    pub topic_id: i64,
    /// Mean best score of the last reconciled session, on the 1-10 scale
    pub strength_rating: Option<u8>,
    /// Total study time, in minutes
    pub total_time_spent: u32,
}

impl TopicProgress {
    pub fn new(topic_id: i64) -> Self {
        Self {
            topic_id,
            strength_rating: None,
            total_time_spent: 0,
        }
    }
}
