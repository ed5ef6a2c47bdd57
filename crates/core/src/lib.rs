//! Interview Prep Core
//!
//! Foundational types shared by the Interview Prep workspace. This crate has
//! no dependency on the LLM layer or on the application crate.
//!
//! ## Module Organization
//!
//! - `error` - Core error types (`CoreError`, `CoreResult`)
//! - `proxy` - Outbound proxy settings used when building HTTP clients
//! - `study` - Records describing prior questions and answer attempts

pub mod error;
pub mod proxy;
pub mod study;

// ── Error Types ────────────────────────────────────────────────────────
pub use error::{CoreError, CoreResult};

// ── Proxy Types ────────────────────────────────────────────────────────
pub use proxy::{ProxyConfig, ProxyProtocol};

// ── Study Records ──────────────────────────────────────────────────────
pub use study::{is_valid_rating, AttemptRecord, PreviousQuestion, MAX_RATING, MIN_RATING};
