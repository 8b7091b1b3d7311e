//! Runs a spoken-style interview in the terminal: each question is printed,
//! each typed line is the answer.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use interview_api::config::SessionConfig;
use interview_api::session::console::{ConsoleRecognizer, ConsoleSpeech};
use interview_api::session::{parse_questions, SessionController};

#[derive(Debug, Parser)]
#[command(about = "Run an interview session in the terminal")]
struct Args {
    /// File with one generated question per line.
    #[arg(long)]
    questions: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = SessionConfig::from_env()?;

    // Logs go to stderr so they do not interleave with the interview itself.
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("interview_api=warn")),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let raw = tokio::fs::read_to_string(&args.questions)
        .await
        .with_context(|| format!("Failed to read questions from {}", args.questions.display()))?;
    let questions = parse_questions(&raw)?;

    let recognizer = Arc::new(ConsoleRecognizer::from_stdin(config.silence_timeout));
    let controller = SessionController::new(questions, Arc::new(ConsoleSpeech), recognizer, config)?;

    let state = controller.run().await?;

    println!("\nInterview completed");
    for (question, response) in state.questions().iter().zip(state.responses()) {
        println!("\n{question}\n  Your answer: {response}");
    }

    Ok(())
}
