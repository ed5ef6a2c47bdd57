//! Interview Prep LLM
//!
//! Structured-output orchestration for the interview coach:
//! - Mode registry: named operations with their output schema and token budget
//! - Structured clients: OpenAI (schema-aware with JSON-mode fallback),
//!   Anthropic (schema embedded in the prompt) and an offline stub
//! - Retry wrapper with exponential backoff
//! - The coaching operations built on top of them

pub mod anthropic;
pub mod factory;
pub mod http_client;
pub mod json_extract;
pub mod modes;
pub mod openai;
pub mod operations;
pub mod provider;
pub mod retry;
pub mod schemas;
pub mod stub;
pub mod types;

// Re-export main types
pub use anthropic::AnthropicProvider;
pub use factory::{create_client, ClientSettings};
pub use http_client::build_http_client;
pub use modes::{all_modes, get_mode, mode, Mode, ModeName};
pub use openai::{OpenAIProvider, SchemaAttempt};
pub use operations::{InterviewCoach, PlanRevisionRequest};
pub use provider::{RequestLimiter, StructuredClient};
pub use retry::{with_retry, RetryPolicy};
pub use schemas::*;
pub use stub::{classify_schema, StubClient, StubFixture};
pub use types::*;
