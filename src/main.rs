//! Interview Prep - command line front end
//!
//! Usage:
//!   interview-prep suggest-plan --role "Backend Engineer" --context "..."
//!   interview-prep generate-questions --topic Algorithms --description "..."
//!   interview-prep evaluate --question "..." --answer "..."
//!   interview-prep story --question "Tell me about a conflict"
//!   interview-prep modes
//!   interview-prep --help

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{json, Value};

use interview_prep::{AppState, Settings};
use interview_prep_core::{AttemptRecord, PreviousQuestion};
use interview_prep_llm::all_modes;

/// Interview Prep - LLM-backed study planning and answer coaching
#[derive(Parser)]
#[command(name = "interview-prep", version, about, long_about = None)]
struct Cli {
    /// Settings file (default: ~/.interview-prep/config.json)
    #[arg(long, env = "INTERVIEW_PREP_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Use the offline stub instead of a vendor
    #[arg(long, global = true)]
    stub: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Draft a study plan for a target role
    SuggestPlan {
        #[arg(long)]
        role: String,
        /// Free-text background about the candidate
        #[arg(long)]
        context: String,
    },

    /// Revise an existing plan (JSON files) using progress and feedback
    SuggestChanges {
        /// Current plan, as JSON
        #[arg(long)]
        plan: PathBuf,
        #[arg(long)]
        role: String,
        #[arg(long)]
        context: String,
        /// Progress per topic, as JSON
        #[arg(long)]
        progress: Option<PathBuf>,
        /// List of feedback items, as JSON
        #[arg(long)]
        feedback: Option<PathBuf>,
    },

    /// Generate practice questions for a topic
    GenerateQuestions {
        #[arg(long)]
        topic: String,
        #[arg(long)]
        description: String,
        /// Previously asked questions with ratings, as JSON
        #[arg(long)]
        previous: Option<PathBuf>,
    },

    /// Score an answer
    Evaluate {
        #[arg(long)]
        question: String,
        #[arg(long)]
        answer: String,
        /// Topic, difficulty or other context for the question
        #[arg(long)]
        context: Option<String>,
    },

    /// Summarize a session's attempts (JSON list of question/answer/score)
    Reconcile {
        #[arg(long)]
        attempts: PathBuf,
    },

    /// Outline a STAR story for a behavioral question
    Story {
        #[arg(long)]
        question: String,
        #[arg(long)]
        context: Option<String>,
    },

    /// List the LLM modes and their token budgets
    Modes,
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries the JSON result
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    if let Commands::Modes = cli.command {
        let modes: Vec<Value> = all_modes()
            .iter()
            .map(|m| json!({"name": m.name, "max_tokens": m.max_tokens}))
            .collect();
        return print_json(&modes);
    }

    let settings = Settings::load(cli.config.as_deref(), cli.stub)?;
    let state = AppState::from_settings(settings)?;
    let coach = state.coach();

    match cli.command {
        Commands::SuggestPlan { role, context } => {
            print_json(&coach.suggest_plan(&role, &context).await?)?;
        }
        Commands::SuggestChanges {
            plan,
            role,
            context,
            progress,
            feedback,
        } => {
            let plan: Value = read_json(&plan)?;
            let progress: Option<Value> = progress.as_deref().map(read_json).transpose()?;
            let feedback: Option<Vec<Value>> = feedback.as_deref().map(read_json).transpose()?;
            let revised = coach
                .suggest_plan_changes(
                    &plan,
                    &role,
                    &context,
                    progress.as_ref(),
                    feedback.as_deref(),
                )
                .await?;
            print_json(&revised)?;
        }
        Commands::GenerateQuestions {
            topic,
            description,
            previous,
        } => {
            let previous: Option<Vec<PreviousQuestion>> =
                previous.as_deref().map(read_json).transpose()?;
            let questions = coach
                .generate_questions(&topic, &description, previous.as_deref())
                .await?;
            print_json(&questions)?;
        }
        Commands::Evaluate {
            question,
            answer,
            context,
        } => {
            let evaluation = coach
                .evaluate_answer(&question, &answer, context.as_deref())
                .await?;
            print_json(&evaluation)?;
        }
        Commands::Reconcile { attempts } => {
            let attempts: Vec<AttemptRecord> = read_json(&attempts)?;
            print_json(&coach.reconcile_session(&attempts).await?)?;
        }
        Commands::Story { question, context } => {
            let story = coach
                .generate_story_structure(&question, context.as_deref())
                .await?;
            print_json(&story)?;
        }
        Commands::Modes => {}
    }

    Ok(())
}
