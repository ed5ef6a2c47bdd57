//! Study Session Integration Tests

use interview_prep::models::{StudySession, TopicProgress};
use interview_prep::{AppState, Settings};
use interview_prep_core::AttemptRecord;

fn stub_state() -> AppState {
    AppState::from_settings(Settings {
        use_stub_llm: true,
        ..Default::default()
    })
    .unwrap()
}

#[tokio::test]
async fn test_two_sessions_accumulate_time() {
    let state = stub_state();
    let attempts = vec![AttemptRecord::new("Explain BFS.", "Queue.", Some(6))];

    let first = state
        .sessions()
        .end_session(StudySession::start(1, 42, 30), &attempts, None)
        .await
        .unwrap();
    assert_eq!(first.progress.total_time_spent, 30);
    assert_eq!(first.progress.strength_rating, Some(7));

    let second = state
        .sessions()
        .end_session(StudySession::start(2, 42, 25), &[], Some(first.progress))
        .await
        .unwrap();
    assert_eq!(second.progress.total_time_spent, 55);
    assert_eq!(second.progress.strength_rating, Some(7));
    assert!(second.summary.is_none());
}

#[tokio::test]
async fn test_end_time_not_before_start_time() {
    let state = stub_state();
    let session = StudySession::start(3, 1, 10);
    let outcome = state
        .sessions()
        .end_session(session, &[], Some(TopicProgress::new(1)))
        .await
        .unwrap();
    let end = outcome.session.end_time.unwrap();
    assert!(end >= outcome.session.start_time);
    assert_eq!(outcome.progress.strength_rating, None);
    assert_eq!(outcome.progress.total_time_spent, 10);
}

#[tokio::test]
async fn test_outcome_serializes_for_callers() {
    let state = stub_state();
    let attempts = vec![AttemptRecord::new("q", "a", Some(5))];
    let outcome = state
        .sessions()
        .end_session(StudySession::start(4, 2, 15), &attempts, None)
        .await
        .unwrap();
    let json = serde_json::to_value(&outcome).unwrap();
    assert_eq!(json["progress"]["topic_id"], 2);
    assert_eq!(json["summary"]["question_attempts"].as_array().unwrap().len(), 2);
}
