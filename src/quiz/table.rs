// Question tables: CSV with header `term1,term2,answer`

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{QuizError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub term1: i64,
    pub term2: i64,
    /// Product as stored in the table
    pub answer: i64,
}

impl Question {
    /// Terms are narrower than the stored columns, so the product always fits
    pub fn new(term1: i32, term2: i32) -> Self {
        let (term1, term2) = (i64::from(term1), i64::from(term2));
        Self {
            term1,
            term2,
            answer: term1 * term2,
        }
    }

    /// The true product, regardless of what the table says
    ///
    /// `None` when the product does not fit in an `i64`.
    pub fn product(&self) -> Option<i64> {
        self.term1.checked_mul(self.term2)
    }

    pub fn is_consistent(&self) -> bool {
        self.product() == Some(self.answer)
    }
}

/// Load every question from a CSV file
pub fn read_questions(path: impl AsRef<Path>) -> Result<Vec<Question>> {
    let path = path.as_ref();
    debug!("Reading questions from {}", path.display());
    read_questions_from(File::open(path)?)
}

pub(crate) fn read_questions_from<R: Read>(reader: R) -> Result<Vec<Question>> {
    let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut questions = Vec::new();
    for record in csv_reader.deserialize() {
        let question: Question = record?;
        let Some(product) = question.product() else {
            return Err(QuizError::Overflow {
                term1: question.term1,
                term2: question.term2,
            });
        };
        if question.answer != product {
            warn!(
                "Row {} * {} lists answer {}, grading against {}",
                question.term1, question.term2, question.answer, product
            );
        }
        questions.push(question);
    }
    Ok(questions)
}

/// Write questions to a CSV file, replacing it
pub fn write_questions(path: impl AsRef<Path>, questions: &[Question]) -> Result<()> {
    let path = path.as_ref();
    debug!("Writing {} questions to {}", questions.len(), path.display());
    write_questions_to(File::create(path)?, questions)
}

pub(crate) fn write_questions_to<W: Write>(writer: W, questions: &[Question]) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for question in questions {
        csv_writer.serialize(question)?;
    }
    csv_writer.flush()?;
    Ok(())
}
