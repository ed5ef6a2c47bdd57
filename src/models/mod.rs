//! Data Models

pub mod session;

pub use session::{StudySession, TopicProgress};
