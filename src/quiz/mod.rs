// Multiplication-fact quiz
//
// Provides:
// - CSV question tables (read/write)
// - Random question generation
// - Interactive quiz session and score recording

mod generate;
mod session;
mod table;

pub use generate::{DEFAULT_QUESTION_COUNT, TERM1_RANGE, TERM2_RANGE, generate};
pub use session::{QUIT_ANSWER, QuizOutcome, ScoreMode, record_score, run_quiz};
pub use table::{Question, read_questions, write_questions};

/// Default question table location
pub const DEFAULT_QUESTIONS_PATH: &str = "questions.csv";

/// Error types for quiz files
#[derive(Debug, thiserror::Error)]
pub enum QuizError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Product of {term1} * {term2} does not fit in 64 bits")]
    Overflow { term1: i64, term2: i64 },
}

pub type Result<T> = std::result::Result<T, QuizError>;
