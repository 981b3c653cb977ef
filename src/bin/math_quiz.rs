// Terminal multiplication quiz: prompts each row of the question table, type q to stop
use std::io;
use std::path::PathBuf;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use vector_remote::quiz::{self, DEFAULT_QUESTIONS_PATH, ScoreMode};

#[derive(Debug, Parser)]
#[command(version, about = "Administer a multiplication quiz from a CSV table")]
struct QuizArgs {
    /// Question table (term1,term2,answer)
    #[arg(short = 'q', long = "questions", default_value = DEFAULT_QUESTIONS_PATH)]
    questions: PathBuf,

    /// Replace the score file instead of appending to it
    #[arg(long)]
    overwrite: bool,

    /// File to record "participant: score" in
    #[arg(requires = "participant")]
    score_file: Option<PathBuf>,

    /// Participant identifier written next to the score
    participant: Option<String>,
}

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // Logs go to stderr so stdout is just the quiz
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let args = QuizArgs::parse();

    let questions = quiz::read_questions(&args.questions)?;
    info!("Loaded {} questions from {}", questions.len(), args.questions.display());

    let outcome = quiz::run_quiz(&questions, io::stdin().lock(), io::stdout().lock())?;

    if let (Some(path), Some(participant)) = (&args.score_file, &args.participant) {
        let mode = if args.overwrite {
            ScoreMode::Overwrite
        } else {
            ScoreMode::Append
        };
        quiz::record_score(path, participant, outcome.score, mode)?;
        println!("Score written to {}", path.display());
    }
    Ok(())
}
