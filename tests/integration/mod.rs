//! Integration Tests Module
//!
//! End-to-end flows through the public API: the coaching operations against
//! the offline stub, the study session flow, and the vendor clients against a
//! local mock HTTP endpoint.

// Coaching operations through AppState and the stub client
mod coach_flow_test;

// Ending study sessions and updating topic progress
mod session_flow_test;

// OpenAI and Anthropic clients against a mock vendor endpoint
mod provider_http_test;
