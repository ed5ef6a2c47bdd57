//! Coaching Flow Integration Tests
//!
//! Every operation end to end with the stub client selected through settings.

use interview_prep::{AppError, AppState, Settings};
use interview_prep_core::{AttemptRecord, PreviousQuestion};
use interview_prep_llm::{
    all_modes, classify_schema, get_mode, Difficulty, QuestionStatus, RedoReason,
};
use serde_json::json;

fn stub_state() -> AppState {
    let settings = Settings {
        use_stub_llm: true,
        ..Default::default()
    };
    AppState::from_settings(settings).unwrap()
}

// ============================================================================
// Operations
// ============================================================================

#[tokio::test]
async fn test_suggest_plan_with_stub() {
    let state = stub_state();
    let plan = state
        .coach()
        .suggest_plan("Software Engineer", "Three years of backend work.")
        .await
        .unwrap();

    assert_eq!(plan.plan_overview.target_role, "Software Engineer");
    assert_eq!(plan.plan_overview.total_daily_minutes, 120);
    assert_eq!(plan.plan_topics.len(), 4);
    let total: u32 = plan.plan_topics.iter().map(|t| t.daily_study_minutes).sum();
    assert_eq!(total, 120);
    assert!(plan.plan_topics.iter().all(|t| t.priority >= 1));
}

#[tokio::test]
async fn test_suggest_plan_changes_with_stub() {
    let state = stub_state();
    let current = json!({"plan_topics": [{"name": "Algorithms", "priority": 1}]});
    let progress = json!({"Algorithms": {"strength_rating": 9}});
    let feedback = vec![json!({"comment": "more system design"})];

    let plan = state
        .coach()
        .suggest_plan_changes(
            &current,
            "Software Engineer",
            "ctx",
            Some(&progress),
            Some(feedback.as_slice()),
        )
        .await
        .unwrap();
    assert_eq!(plan.plan_topics[2].name, "System Design");
}

#[tokio::test]
async fn test_generate_questions_with_stub() {
    let state = stub_state();
    let previous = vec![PreviousQuestion::new("Design an LRU cache.", Some(3))];

    let result = state
        .coach()
        .generate_questions("Data Structures", "Core structures", Some(previous.as_slice()))
        .await
        .unwrap();

    let difficulties: Vec<_> = result.questions.iter().map(|q| q.difficulty).collect();
    assert_eq!(
        difficulties,
        vec![Difficulty::Easy, Difficulty::Medium, Difficulty::Hard]
    );
    let redo = &result.questions[2];
    assert_eq!(redo.status, QuestionStatus::Redo);
    assert_eq!(redo.redo_reason, Some(RedoReason::WeakAnswer));
    assert!(result.questions[0].redo_reason.is_none());
}

#[tokio::test]
async fn test_evaluate_answer_with_stub() {
    let state = stub_state();
    let eval = state
        .coach()
        .evaluate_answer(
            "Explain the difference between an array and a linked list.",
            "Arrays are contiguous.",
            Some("Data Structures, easy"),
        )
        .await
        .unwrap();

    assert_eq!(eval.score, 7);
    assert_eq!(eval.positive_feedback.len(), 2);
    assert_eq!(eval.improvement_areas.len(), 2);
    assert_eq!(eval.anchors.len(), 2);
    assert_eq!(eval.anchors[0].name, "Core concept");
}

#[tokio::test]
async fn test_reconcile_session_with_stub() {
    let state = stub_state();
    let attempts = vec![
        AttemptRecord::new("q1", "a1", Some(8)),
        AttemptRecord::new("q2", "a2", None),
    ];
    let summary = state.coach().reconcile_session(&attempts).await.unwrap();
    assert_eq!(summary.question_attempts.len(), 2);
    assert!(summary
        .question_attempts
        .iter()
        .all(|qa| (1..=10).contains(&qa.best_score)));
}

#[tokio::test]
async fn test_story_structure_with_stub() {
    let state = stub_state();
    let story = state
        .coach()
        .generate_story_structure("Tell me about a time you disagreed with a teammate.", None)
        .await
        .unwrap();
    assert!(story.structure_text.contains("Situation"));
    assert!(story.structure_text.contains("Result"));
}

// ============================================================================
// Registry and selection
// ============================================================================

#[test]
fn test_every_mode_has_a_stub_fixture() {
    for mode in all_modes() {
        assert!(
            classify_schema(&mode.response_schema).is_some(),
            "no fixture for {}",
            mode.name
        );
    }
}

#[test]
fn test_unknown_mode_maps_to_config_error() {
    let err: AppError = get_mode("summarize").unwrap_err().into();
    assert!(matches!(err, AppError::Config(_)));
}

#[test]
fn test_unknown_provider_fails_at_startup() {
    let settings = Settings {
        llm_provider: "cohere".to_string(),
        openai_api_key: Some("sk-test".to_string()),
        ..Default::default()
    };
    let err = AppState::from_settings(settings).unwrap_err();
    assert!(matches!(err, AppError::Config(_)));
    assert!(err.to_string().contains("cohere"));
}

#[test]
fn test_vendor_selected_when_stub_disabled() {
    let settings = Settings {
        llm_provider: "Anthropic".to_string(),
        anthropic_api_key: Some("ak-test".to_string()),
        ..Default::default()
    };
    let state = AppState::from_settings(settings).unwrap();
    assert_eq!(state.coach().client().name(), "anthropic");
    assert_eq!(state.coach().client().model(), "claude-3-5-sonnet-20241022");
}
