//! Services

pub mod session;

pub use session::{SessionOutcome, SessionService};
