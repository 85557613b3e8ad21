use rand::seq::SliceRandom;
use rand::Rng;

use super::{missing, AnswerCheck, Question};
use crate::services::catalog::CatalogError;
use crate::tutor::types::{DifficultyTier, Mode};

const OPERAND_RANGE: std::ops::RangeInclusive<i64> = 2..=9;

pub fn table_of(item_id: &str) -> Option<i64> {
    item_id
        .strip_prefix(Mode::Arithmetic.item_prefix())
        .and_then(|n| n.parse::<i64>().ok())
        .filter(|n| OPERAND_RANGE.contains(n))
}

pub fn build<R: Rng + ?Sized>(
    item_id: &str,
    tier: DifficultyTier,
    rng: &mut R,
) -> Result<Question, CatalogError> {
    let a = table_of(item_id).ok_or_else(|| missing(item_id))?;
    let b = rng.gen_range(OPERAND_RANGE);
    Ok(with_operand(item_id, a, b, tier, rng))
}

/// Question for the fixed fact `a × b`.
pub fn with_operand<R: Rng + ?Sized>(
    item_id: &str,
    a: i64,
    b: i64,
    tier: DifficultyTier,
    rng: &mut R,
) -> Question {
    let answer = a * b;
    let expected = answer.to_string();

    let offsets: [i64; 4] = match tier {
        DifficultyTier::Harder => {
            return Question::free_text(
                item_id,
                format!("Compute {a} × {b}"),
                AnswerCheck::Exact(expected.clone()),
                expected,
            );
        }
        DifficultyTier::Easier => [0, 1, -1, 2],
        DifficultyTier::Standard => [0, 2, -2, 3],
    };

    let mut options: Vec<String> = offsets.iter().map(|d| (answer + d).to_string()).collect();
    options.shuffle(rng);
    Question::multiple_choice(item_id, format!("How much is {a} × {b}?"), options, expected)
}
