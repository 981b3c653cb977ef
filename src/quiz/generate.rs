// Random multiplication questions: a single digit times a two digit number

use std::ops::RangeInclusive;

use rand::Rng;

use super::table::Question;

pub const TERM1_RANGE: RangeInclusive<i32> = 1..=8;
pub const TERM2_RANGE: RangeInclusive<i32> = 10..=99;

pub const DEFAULT_QUESTION_COUNT: usize = 700;

/// Draw `count` questions, each term picked independently with replacement
pub fn generate<R: Rng>(rng: &mut R, count: usize) -> Vec<Question> {
    (0..count)
        .map(|_| Question::new(rng.gen_range(TERM1_RANGE), rng.gen_range(TERM2_RANGE)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn terms_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(42);
        let questions = generate(&mut rng, DEFAULT_QUESTION_COUNT);
        assert_eq!(questions.len(), 700);
        for q in &questions {
            let (term1, term2) = (q.term1 as i32, q.term2 as i32);
            assert!(TERM1_RANGE.contains(&term1), "term1 {} out of range", q.term1);
            assert!(TERM2_RANGE.contains(&term2), "term2 {} out of range", q.term2);
            assert_eq!(q.answer, q.term1 * q.term2);
        }
    }

    #[test]
    fn same_seed_same_questions() {
        let a = generate(&mut StdRng::seed_from_u64(1), 20);
        let b = generate(&mut StdRng::seed_from_u64(1), 20);
        assert_eq!(a, b);
    }

    #[test]
    fn zero_count_is_empty() {
        assert!(generate(&mut StdRng::seed_from_u64(0), 0).is_empty());
    }
}
