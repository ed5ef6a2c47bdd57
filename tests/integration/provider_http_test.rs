//! Vendor Client Integration Tests
//!
//! Runs the OpenAI and Anthropic clients against a local axum server that
//! replays scripted vendor replies and records what it was sent.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};

use interview_prep_llm::{
    AnthropicProvider, InterviewCoach, LlmError, OpenAIProvider, ProviderConfig, ProviderType,
    RetryPolicy, SchemaAttempt, StructuredClient,
};

// ============================================================================
// Mock vendor
// ============================================================================

#[derive(Clone, Default)]
struct MockVendor {
    replies: Arc<Mutex<VecDeque<(StatusCode, Value)>>>,
    requests: Arc<Mutex<Vec<(HeaderMap, Value)>>>,
    delay: Option<Duration>,
    in_flight: Arc<AtomicUsize>,
    peak_in_flight: Arc<AtomicUsize>,
}

impl MockVendor {
    fn scripted(replies: Vec<(StatusCode, Value)>) -> Self {
        Self {
            replies: Arc::new(Mutex::new(replies.into())),
            ..Default::default()
        }
    }

    fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    fn requests(&self) -> Vec<(HeaderMap, Value)> {
        self.requests.lock().unwrap().clone()
    }
}

async fn handle(
    State(mock): State<MockVendor>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, HeaderMap, Json<Value>) {
    let now = mock.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
    mock.peak_in_flight.fetch_max(now, Ordering::SeqCst);
    mock.requests.lock().unwrap().push((headers, body));
    if let Some(delay) = mock.delay {
        tokio::time::sleep(delay).await;
    }
    let reply = mock
        .replies
        .lock()
        .unwrap()
        .pop_front()
        .unwrap_or((StatusCode::INTERNAL_SERVER_ERROR, json!({"error": "no reply scripted"})));
    mock.in_flight.fetch_sub(1, Ordering::SeqCst);
    let mut reply_headers = HeaderMap::new();
    if reply.0 == StatusCode::TOO_MANY_REQUESTS {
        reply_headers.insert("retry-after", HeaderValue::from_static("7"));
    }
    (reply.0, reply_headers, Json(reply.1))
}

/// Serve `mock` on an ephemeral port and return the endpoint URL.
async fn serve(mock: MockVendor, path: &str) -> String {
    let router = Router::new().route(path, post(handle)).with_state(mock);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}{}", addr, path)
}

fn openai_reply(content: &str) -> (StatusCode, Value) {
    (
        StatusCode::OK,
        json!({"choices": [{"message": {"role": "assistant", "content": content}}]}),
    )
}

fn anthropic_reply(text: &str) -> (StatusCode, Value) {
    (
        StatusCode::OK,
        json!({"content": [{"type": "text", "text": text}], "stop_reason": "end_turn"}),
    )
}

fn story_schema() -> Value {
    interview_prep_llm::get_mode("generate_story_structure")
        .unwrap()
        .response_schema
        .clone()
}

async fn openai(mock: MockVendor) -> OpenAIProvider {
    let url = serve(mock, "/v1/chat/completions").await;
    let config = ProviderConfig {
        base_url: Some(url),
        request_timeout_secs: 1,
        ..ProviderConfig::new(ProviderType::OpenAI).with_api_key("sk-test")
    };
    OpenAIProvider::new(config).unwrap()
}

async fn anthropic(mock: MockVendor, max_concurrent_requests: usize) -> AnthropicProvider {
    let url = serve(mock, "/v1/messages").await;
    let config = ProviderConfig {
        base_url: Some(url),
        request_timeout_secs: 5,
        max_concurrent_requests,
        ..ProviderConfig::new(ProviderType::Anthropic).with_api_key("ak-test")
    };
    AnthropicProvider::new(config).unwrap()
}

// ============================================================================
// OpenAI
// ============================================================================

#[tokio::test]
async fn test_openai_schema_aware_success() {
    let mock = MockVendor::scripted(vec![openai_reply(r#"{"structure_text": "STAR"}"#)]);
    let provider = openai(mock.clone()).await;

    let map = provider
        .generate_structured("outline", &story_schema(), 0.7, 2000)
        .await
        .unwrap();
    assert_eq!(map["structure_text"], "STAR");

    let requests = mock.requests();
    assert_eq!(requests.len(), 1);
    let (headers, body) = &requests[0];
    assert_eq!(headers["authorization"], "Bearer sk-test");
    assert_eq!(body["response_format"]["type"], "json_schema");
    assert_eq!(body["max_tokens"], 2000);
}

#[tokio::test]
async fn test_openai_falls_back_when_schema_rejected() {
    let mock = MockVendor::scripted(vec![
        (
            StatusCode::BAD_REQUEST,
            json!({"error": {"message": "response_format json_schema is not supported"}}),
        ),
        openai_reply("```json\n{\"structure_text\": \"fallback\"}\n```"),
    ]);
    let provider = openai(mock.clone()).await;

    let map = provider
        .generate_structured("outline", &story_schema(), 0.7, 2000)
        .await
        .unwrap();
    assert_eq!(map["structure_text"], "fallback");

    let requests = mock.requests();
    assert_eq!(requests.len(), 2);
    let fallback = &requests[1].1;
    assert_eq!(fallback["response_format"]["type"], "json_object");
    let user = fallback["messages"][1]["content"].as_str().unwrap();
    assert!(user.ends_with("Respond with valid JSON only, no other text."));
}

#[tokio::test]
async fn test_openai_refusal_needs_fallback() {
    let mock = MockVendor::scripted(vec![(
        StatusCode::OK,
        json!({"choices": [{"message": {"content": null, "refusal": "I can't help with that."}}]}),
    )]);
    let provider = openai(mock).await;

    let attempt = provider
        .try_schema_aware("outline", &story_schema(), 0.7, 2000)
        .await
        .unwrap();
    assert!(matches!(attempt, SchemaAttempt::NeedsFallback(reason) if reason.contains("refusal")));
}

#[tokio::test]
async fn test_openai_auth_error_is_not_masked_by_fallback() {
    let mock = MockVendor::scripted(vec![(
        StatusCode::UNAUTHORIZED,
        json!({"error": {"message": "Incorrect API key provided"}}),
    )]);
    let provider = openai(mock.clone()).await;

    let err = provider
        .generate_structured("outline", &story_schema(), 0.7, 2000)
        .await
        .unwrap_err();
    assert!(matches!(err, LlmError::AuthenticationFailed { .. }));
    assert_eq!(mock.requests().len(), 1);
}

#[tokio::test]
async fn test_openai_fallback_with_invalid_json_is_response_error() {
    let mock = MockVendor::scripted(vec![
        (StatusCode::UNPROCESSABLE_ENTITY, json!({"error": "bad schema"})),
        openai_reply("Sure! Here is your outline."),
    ]);
    let provider = openai(mock).await;

    let err = provider
        .generate_structured("outline", &story_schema(), 0.7, 2000)
        .await
        .unwrap_err();
    assert!(matches!(err, LlmError::ResponseError { .. }));
}

#[tokio::test]
async fn test_openai_request_timeout() {
    let mock = MockVendor::scripted(vec![openai_reply(r#"{"structure_text": "late"}"#)])
        .with_delay(Duration::from_secs(3));
    let provider = openai(mock).await;

    let err = provider
        .generate_structured("outline", &story_schema(), 0.7, 2000)
        .await
        .unwrap_err();
    assert!(matches!(err, LlmError::Timeout { .. }), "{err}");
}

// ============================================================================
// Anthropic
// ============================================================================

#[tokio::test]
async fn test_anthropic_fenced_reply() {
    let mock = MockVendor::scripted(vec![anthropic_reply(
        "Here you go:\n```json\n{\"structure_text\": \"S-T-A-R\"}\n```",
    )]);
    let provider = anthropic(mock.clone(), 4).await;

    let map = provider
        .generate_structured("outline", &story_schema(), 0.7, 2000)
        .await
        .unwrap();
    assert_eq!(map["structure_text"], "S-T-A-R");

    let (headers, body) = &mock.requests()[0];
    assert_eq!(headers["x-api-key"], "ak-test");
    assert_eq!(headers["anthropic-version"], "2023-06-01");
    let content = body["messages"][0]["content"].as_str().unwrap();
    assert!(content.starts_with("outline\n\nRespond with valid JSON matching this schema: "));
}

#[tokio::test]
async fn test_anthropic_non_json_reply_is_response_error() {
    let mock = MockVendor::scripted(vec![anthropic_reply("I would rather not.")]);
    let provider = anthropic(mock, 4).await;

    let err = provider
        .generate_structured("outline", &story_schema(), 0.7, 2000)
        .await
        .unwrap_err();
    assert!(matches!(err, LlmError::ResponseError { .. }));
}

#[tokio::test]
async fn test_anthropic_rate_limit() {
    let mock = MockVendor::scripted(vec![(
        StatusCode::TOO_MANY_REQUESTS,
        json!({"type": "error", "error": {"type": "rate_limit_error"}}),
    )]);
    let provider = anthropic(mock, 4).await;

    let err = provider
        .generate_structured("outline", &story_schema(), 0.7, 2000)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        LlmError::RateLimited {
            retry_after: Some(7),
            ..
        }
    ));
}

#[tokio::test]
async fn test_concurrent_requests_are_bounded() {
    let replies = (0..3)
        .map(|_| anthropic_reply(r#"{"structure_text": "ok"}"#))
        .collect();
    let mock = MockVendor::scripted(replies).with_delay(Duration::from_millis(50));
    let provider = anthropic(mock.clone(), 1).await;
    let schema = story_schema();

    let (a, b, c) = tokio::join!(
        provider.generate_structured("one", &schema, 0.7, 100),
        provider.generate_structured("two", &schema, 0.7, 100),
        provider.generate_structured("three", &schema, 0.7, 100),
    );
    assert!(a.is_ok() && b.is_ok() && c.is_ok());
    assert_eq!(mock.requests().len(), 3);
    assert_eq!(mock.peak_in_flight.load(Ordering::SeqCst), 1);
}

// ============================================================================
// Coach over a vendor
// ============================================================================

#[tokio::test]
async fn test_coach_retries_server_errors() {
    let mock = MockVendor::scripted(vec![
        (StatusCode::SERVICE_UNAVAILABLE, json!({"error": "overloaded"})),
        anthropic_reply(r#"{"structure_text": "second time lucky"}"#),
    ]);
    let provider = anthropic(mock.clone(), 4).await;
    let coach = InterviewCoach::new(
        Arc::new(provider),
        RetryPolicy::new(3, Duration::from_millis(10)),
    );

    let story = coach
        .generate_story_structure("Tell me about a failure.", None)
        .await
        .unwrap();
    assert_eq!(story.structure_text, "second time lucky");
    assert_eq!(mock.requests().len(), 2);
}

#[tokio::test]
async fn test_coach_gives_up_after_policy_attempts() {
    let mock = MockVendor::scripted(vec![
        anthropic_reply("not json"),
        anthropic_reply(r#"{"wrong": "shape"}"#),
    ]);
    let provider = anthropic(mock.clone(), 4).await;
    let coach = InterviewCoach::new(
        Arc::new(provider),
        RetryPolicy::new(2, Duration::from_millis(10)),
    );

    let err = coach
        .generate_story_structure("Tell me about a failure.", None)
        .await
        .unwrap_err();
    // last failure is the schema mismatch
    assert!(matches!(err, LlmError::ResponseError { .. }));
    assert!(err.to_string().contains("structure_text"));
    assert_eq!(mock.requests().len(), 2);
}
