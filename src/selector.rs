use rand::seq::SliceRandom;
use rand::Rng;

use crate::bank::{Difficulty, QuestionBank, QuestionRecord};
use crate::error::ConfigError;

/// Number of questions in one session
pub const MAX_QUESTIONS: usize = 10;

/// Build the ordered question sequence for a session.
///
/// Every question in the chosen categories whose difficulty matches (or is
/// unset) is pooled, shuffled with Fisher-Yates and cut to `MAX_QUESTIONS`.
pub fn select<'a, I, R>(
    bank: &QuestionBank,
    difficulty: Difficulty,
    categories: I,
    rng: &mut R,
) -> Result<Vec<QuestionRecord>, ConfigError>
where
    I: IntoIterator<Item = &'a str>,
    R: Rng + ?Sized,
{
    let mut pool = Vec::new();
    for category in categories {
        let questions = bank
            .get(category)
            .ok_or_else(|| ConfigError::UnknownCategory(category.to_string()))?;
        pool.extend(questions.iter().filter(|q| q.matches(difficulty)).cloned());
    }

    if pool.is_empty() {
        return Err(ConfigError::NoQuestions);
    }

    pool.shuffle(rng);
    pool.truncate(MAX_QUESTIONS);
    Ok(pool)
}
