//! Stub Client
//!
//! Deterministic offline client used for development and tests. It never
//! performs I/O; the fixture it returns is picked from the shape of the
//! requested schema.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

use super::provider::StructuredClient;
use super::types::{LlmResult, StructuredResponse};

/// Which canned response a schema maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StubFixture {
    Plan,
    Questions,
    Evaluation,
    Reconciliation,
    Story,
}

/// Classify a schema by its top-level `properties` keys.
///
/// Precedence: `plan_overview`, `questions`, `score` together with
/// `positive_feedback`, `question_attempts`, `structure_text`.
pub fn classify_schema(schema: &Value) -> Option<StubFixture> {
    let props = schema.get("properties")?.as_object()?;
    if props.contains_key("plan_overview") {
        Some(StubFixture::Plan)
    } else if props.contains_key("questions") {
        Some(StubFixture::Questions)
    } else if props.contains_key("score") && props.contains_key("positive_feedback") {
        Some(StubFixture::Evaluation)
    } else if props.contains_key("question_attempts") {
        Some(StubFixture::Reconciliation)
    } else if props.contains_key("structure_text") {
        Some(StubFixture::Story)
    } else {
        None
    }
}

impl StubFixture {
    /// The canned response for this fixture.
    pub fn response(&self) -> StructuredResponse {
        let value = match self {
            StubFixture::Plan => plan_fixture(),
            StubFixture::Questions => questions_fixture(),
            StubFixture::Evaluation => evaluation_fixture(),
            StubFixture::Reconciliation => reconciliation_fixture(),
            StubFixture::Story => story_fixture(),
        };
        match value {
            Value::Object(map) => map,
            _ => StructuredResponse::new(),
        }
    }
}

fn plan_fixture() -> Value {
    json!({
        "plan_overview": {
            "target_role": "Software Engineer",
            "total_daily_minutes": 120,
            "time_horizon_weeks": 8,
            "rationale": "Balanced preparation across core technical fundamentals and behavioral skills, weighted toward algorithms where interviews concentrate."
        },
        "plan_topics": [
            {
                "name": "Data Structures",
                "description": "Arrays, linked lists, trees, graphs, hash tables and their trade-offs.",
                "priority": 1,
                "daily_study_minutes": 30,
                "expected_outcome": "Choose the right structure for common interview problems."
            },
            {
                "name": "Algorithms",
                "description": "Sorting, searching, dynamic programming, greedy methods and graph traversal.",
                "priority": 2,
                "daily_study_minutes": 40,
                "expected_outcome": "Solve medium problems within time limits."
            },
            {
                "name": "System Design",
                "description": "Scalability, caching, storage choices and service boundaries.",
                "priority": 3,
                "daily_study_minutes": 30,
                "expected_outcome": "Sketch and defend a scalable design."
            },
            {
                "name": "Behavioral Questions",
                "description": "Structured stories about teamwork, conflict, ownership and impact.",
                "priority": 4,
                "daily_study_minutes": 20,
                "expected_outcome": "Tell concise STAR stories with clear results."
            }
        ]
    })
}

fn questions_fixture() -> Value {
    json!({
        "questions": [
            {
                "question": "Explain the difference between an array and a linked list.",
                "status": "new",
                "difficulty": "easy"
            },
            {
                "question": "How would you detect a cycle in a linked list?",
                "status": "new",
                "difficulty": "medium"
            },
            {
                "question": "Design an LRU cache with O(1) get and put operations.",
                "status": "redo",
                "redo_reason": "weak_answer",
                "difficulty": "hard"
            }
        ]
    })
}

fn evaluation_fixture() -> Value {
    json!({
        "score": 7,
        "positive_feedback": [
            "Clear explanation of the core idea",
            "Good use of a concrete example"
        ],
        "improvement_areas": [
            "Discuss time and space complexity",
            "Mention edge cases such as empty input"
        ],
        "anchors": [
            {
                "name": "Core concept",
                "anchor": "State the defining property of the structure and how it drives the operations it supports."
            },
            {
                "name": "Trade-offs",
                "anchor": "Compare access, insertion and memory costs against the main alternative."
            }
        ]
    })
}

fn reconciliation_fixture() -> Value {
    json!({
        "question_attempts": [
            {
                "question": "Explain the difference between an array and a linked list.",
                "attempts": 2,
                "best_score": 8,
                "best_anchors": [
                    {
                        "name": "Core concept",
                        "anchor": "Contiguous memory versus node pointers determines access cost."
                    }
                ]
            },
            {
                "question": "How would you detect a cycle in a linked list?",
                "attempts": 1,
                "best_score": 6,
                "best_anchors": [
                    {
                        "name": "Two pointers",
                        "anchor": "Fast and slow pointers meet inside a cycle."
                    }
                ]
            }
        ]
    })
}

fn story_fixture() -> Value {
    json!({
        "structure_text": "Situation: Set the scene with the team, project and stakes.\nTask: State what you were responsible for.\nAction: Walk through the specific steps you took and why.\nResult: Quantify the outcome and what you learned."
    })
}

/// Offline client returning canned responses.
#[derive(Debug, Default)]
pub struct StubClient {
    calls: AtomicUsize,
}

impl StubClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `generate_structured` calls served so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StructuredClient for StubClient {
    fn name(&self) -> &'static str {
        "stub"
    }

    fn model(&self) -> &str {
        "stub"
    }

    async fn generate_structured(
        &self,
        _prompt: &str,
        response_schema: &Value,
        _temperature: f32,
        _max_tokens: u32,
    ) -> LlmResult<StructuredResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let fixture = classify_schema(response_schema);
        debug!(?fixture, "stub client serving fixture");
        Ok(fixture.map(|f| f.response()).unwrap_or_default())
    }
}
