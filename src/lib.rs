//! Interview Prep
//!
//! Application layer of the interview coach: settings, application state,
//! the study session flow and the command line front end. The LLM work lives
//! in `interview-prep-llm`.

pub mod config;
pub mod models;
pub mod services;
pub mod state;
pub mod utils;

pub use config::Settings;
pub use state::AppState;
pub use utils::error::{AppError, AppResult};
