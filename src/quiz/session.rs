// Interactive quiz session and score file

use std::fs::OpenOptions;
use std::io::{self, BufRead, Write};
use std::path::Path;

use tracing::{debug, info};

use super::Result;
use super::table::Question;

/// Typing this instead of an answer ends the quiz
pub const QUIT_ANSWER: &str = "q";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct QuizOutcome {
    pub score: u32,
    /// Rows that got an integer answer
    pub answered: usize,
    /// Stopped by the quit answer or end of input
    pub quit_early: bool,
}

/// Ask every question in order, reading answers from `input`
///
/// Non-integer answers are rejected and the quiz moves on to the next row.
pub fn run_quiz<R: BufRead, W: Write>(
    questions: &[Question],
    mut input: R,
    mut output: W,
) -> io::Result<QuizOutcome> {
    let mut outcome = QuizOutcome::default();
    let mut line = String::new();

    for question in questions {
        write!(output, "{} * {} = ", question.term1, question.term2)?;
        output.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            debug!("Input closed, ending quiz");
            writeln!(output)?;
            outcome.quit_early = true;
            break;
        }
        let answer = line.trim();

        match answer.parse::<i64>() {
            Ok(value) => {
                outcome.answered += 1;
                if question.product() == Some(value) {
                    writeln!(output, "Correct!")?;
                    outcome.score += 1;
                } else {
                    writeln!(output, "Incorrect")?;
                }
            }
            Err(_) if answer == QUIT_ANSWER => {
                outcome.quit_early = true;
                break;
            }
            Err(_) => writeln!(output, "Please input an integer")?,
        }
        writeln!(output, "Current Score: {}", outcome.score)?;
    }

    info!(
        "Quiz finished: score {} after {} answers{}",
        outcome.score,
        outcome.answered,
        if outcome.quit_early { " (quit early)" } else { "" }
    );
    Ok(outcome)
}

/// How the score file is opened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScoreMode {
    #[default]
    Append,
    Overwrite,
}

/// Write `participant: score` as one line of the score file
pub fn record_score(
    path: impl AsRef<Path>,
    participant: &str,
    score: u32,
    mode: ScoreMode,
) -> Result<()> {
    let path = path.as_ref();
    let mut options = OpenOptions::new();
    match mode {
        ScoreMode::Append => options.append(true).create(true),
        ScoreMode::Overwrite => options.write(true).create(true).truncate(true),
    };
    let mut file = options.open(path)?;
    writeln!(file, "{}: {}", participant, score)?;
    debug!("Recorded {}: {} in {}", participant, score, path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows() -> Vec<Question> {
        vec![
            Question {
                term1: 3,
                term2: 7,
                answer: 21,
            },
            Question {
                term1: 4,
                term2: 6,
                answer: 20,
            },
        ]
    }

    fn quiz(questions: &[Question], answers: &str) -> (QuizOutcome, String) {
        let mut out = Vec::new();
        let outcome = run_quiz(questions, answers.as_bytes(), &mut out).unwrap();
        (outcome, String::from_utf8(out).unwrap())
    }

    #[test]
    fn one_right_one_wrong() {
        let (outcome, out) = quiz(&rows(), "21\n20\n");
        assert_eq!(outcome.score, 1);
        assert_eq!(outcome.answered, 2);
        assert!(!outcome.quit_early);
        assert_eq!(
            out,
            "3 * 7 = Correct!\nCurrent Score: 1\n4 * 6 = Incorrect\nCurrent Score: 1\n"
        );
    }

    #[test]
    fn quit_stops_immediately() {
        let (outcome, out) = quiz(&rows(), "q\n24\n");
        assert_eq!(outcome.score, 0);
        assert_eq!(outcome.answered, 0);
        assert!(outcome.quit_early);
        assert_eq!(out, "3 * 7 = ");

        let (outcome, _) = quiz(&rows(), "21\nq\n");
        assert_eq!(outcome.score, 1);
        assert!(outcome.quit_early);
    }

    #[test]
    fn non_integer_moves_on() {
        let (outcome, out) = quiz(&rows(), "twenty\n 24 \n");
        assert_eq!(outcome.score, 1);
        assert_eq!(outcome.answered, 1);
        assert!(out.contains("Please input an integer\nCurrent Score: 0\n"));
    }

    #[test]
    fn overflowing_row_is_never_correct() {
        let huge = [Question {
            term1: 5_000_000_000,
            term2: 5_000_000_000,
            answer: 1,
        }];
        let (outcome, out) = quiz(&huge, "1\n");
        assert_eq!(outcome.score, 0);
        assert_eq!(outcome.answered, 1);
        assert!(out.ends_with("Incorrect\nCurrent Score: 0\n"));
    }

    #[test]
    fn end_of_input_ends_quiz() {
        let (outcome, _) = quiz(&rows(), "21\n");
        assert_eq!(outcome.score, 1);
        assert!(outcome.quit_early);
    }

    #[test]
    fn scores_append_by_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scores.txt");
        record_score(&path, "p01", 12, ScoreMode::Append).unwrap();
        record_score(&path, "p02", 7, ScoreMode::Append).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "p01: 12\np02: 7\n");

        record_score(&path, "p03", 3, ScoreMode::Overwrite).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "p03: 3\n");
    }
}
