//! Session Service
//!
//! Ends study sessions: closes the session, asks the coach to reconcile its
//! attempts and folds the result into the topic's progress.

use chrono::Utc;
use interview_prep_core::AttemptRecord;
use interview_prep_llm::{InterviewCoach, ReconcileSessionResponse};
use serde::Serialize;
use tracing::{info, warn};

use crate::models::session::{StudySession, TopicProgress};
use crate::utils::error::{AppError, AppResult};

/// Result of ending a session
#[derive(Debug, Clone, Serialize)]
pub struct SessionOutcome {
    pub session: StudySession,
    pub progress: TopicProgress,
    /// Absent when there were no attempts or reconciliation failed
    pub summary: Option<ReconcileSessionResponse>,
}

/// Service for ending study sessions
#[derive(Debug, Clone)]
pub struct SessionService {
    coach: InterviewCoach,
}

impl SessionService {
    pub fn new(coach: InterviewCoach) -> Self {
        Self { coach }
    }

    /// End `session` and update the topic's progress.
    ///
    /// A reconciliation failure is logged and does not fail the call: the
    /// session still ends and study time is still recorded, only the summary
    /// and the strength rating update are skipped.
    pub async fn end_session(
        &self,
        mut session: StudySession,
        attempts: &[AttemptRecord],
        progress: Option<TopicProgress>,
    ) -> AppResult<SessionOutcome> {
        if session.is_ended() {
            return Err(AppError::validation(format!(
                "session {} has already ended",
                session.id
            )));
        }
        if let Some(p) = &progress {
            if p.topic_id != session.topic_id {
                return Err(AppError::validation(format!(
                    "progress is for topic {}, session {} is on topic {}",
                    p.topic_id, session.id, session.topic_id
                )));
            }
        }
        for attempt in attempts {
            attempt.validate()?;
        }

        session.end_time = Some(Utc::now());

        let summary = if attempts.is_empty() {
            None
        } else {
            match self.coach.reconcile_session(attempts).await {
                Ok(summary) => Some(summary),
                Err(err) => {
                    warn!(
                        session_id = session.id,
                        error = %err,
                        "session reconciliation failed; ending session without summary"
                    );
                    None
                }
            }
        };
        let strength = summary
            .as_ref()
            .and_then(ReconcileSessionResponse::average_best_score);

        let progress = match progress {
            None => TopicProgress {
                topic_id: session.topic_id,
                strength_rating: strength,
                total_time_spent: session.planned_duration,
            },
            Some(mut p) => {
                if strength.is_some() {
                    p.strength_rating = strength;
                }
                p.total_time_spent = p.total_time_spent.saturating_add(session.planned_duration);
                p
            }
        };

        info!(
            session_id = session.id,
            topic_id = session.topic_id,
            attempts = attempts.len(),
            strength_rating = ?progress.strength_rating,
            "study session ended"
        );

        Ok(SessionOutcome {
            session,
            progress,
            summary,
        })
    }
}
