// Writes a fresh multiplication question table
use std::path::PathBuf;

use clap::Parser;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::info;
use tracing_subscriber::EnvFilter;

use vector_remote::quiz::{self, DEFAULT_QUESTION_COUNT, DEFAULT_QUESTIONS_PATH};

#[derive(Debug, Parser)]
#[command(version, about = "Generate random multiplication questions into a CSV table")]
struct GenerateArgs {
    /// Output table, overwritten if it exists
    #[arg(short = 'o', long = "out", default_value = DEFAULT_QUESTIONS_PATH)]
    out: PathBuf,

    /// Number of questions
    #[arg(short = 'n', long = "count", default_value_t = DEFAULT_QUESTION_COUNT)]
    count: usize,

    /// Seed for a reproducible table
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = GenerateArgs::parse();

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let questions = quiz::generate(&mut rng, args.count);
    quiz::write_questions(&args.out, &questions)?;

    info!("Wrote {} questions to {}", questions.len(), args.out.display());
    Ok(())
}
