use rand::seq::SliceRandom;
use rand::Rng;

use super::{missing, push_distinct, AnswerCheck, Question};
use crate::services::catalog::CatalogError;
use crate::tutor::types::{DifficultyTier, Mode};

const MAX_MISSPELLINGS: usize = 2;
const MASKED_VOWELS: [char; 4] = ['y', 'ý', 'i', 'í'];

/// Multiple choice is graded exactly, so picking the capitalized option is a
/// miss even though free-text answers ignore case.
pub fn build<R: Rng + ?Sized>(
    item_id: &str,
    tier: DifficultyTier,
    rng: &mut R,
) -> Result<Question, CatalogError> {
    let word = item_id
        .strip_prefix(Mode::Spelling.item_prefix())
        .filter(|w| !w.trim().is_empty())
        .ok_or_else(|| missing(item_id))?;

    if tier == DifficultyTier::Harder {
        return Ok(Question::free_text(
            item_id,
            format!("Fill in: {}", mask(word)),
            AnswerCheck::CaseInsensitive(word.to_string()),
            word.to_string(),
        ));
    }

    let mut options = vec![word.to_string()];
    for variant in misspellings(word).into_iter().take(MAX_MISSPELLINGS) {
        push_distinct(&mut options, variant);
    }
    push_distinct(&mut options, capitalize(word));
    options.shuffle(rng);

    Ok(Question::multiple_choice(
        item_id,
        "Pick the correctly spelled word:".to_string(),
        options,
        word.to_string(),
    ))
}

/// Blanks the first occurrence of each of `y`, `ý`, `i`, `í`.
pub fn mask(word: &str) -> String {
    MASKED_VOWELS
        .iter()
        .fold(word.to_string(), |acc, vowel| acc.replacen(*vowel, "_", 1))
}

/// Single-letter hard/soft vowel swaps, distinct and different from `word`.
pub fn misspellings(word: &str) -> Vec<String> {
    let chars: Vec<char> = word.chars().collect();
    let mut out = Vec::new();
    for (idx, c) in chars.iter().enumerate() {
        let Some(swapped) = counterpart(*c) else {
            continue;
        };
        let mut variant = chars.clone();
        variant[idx] = swapped;
        let variant: String = variant.into_iter().collect();
        if variant != word {
            push_distinct(&mut out, variant);
        }
    }
    out
}

fn counterpart(c: char) -> Option<char> {
    match c {
        'y' => Some('i'),
        'i' => Some('y'),
        'ý' => Some('í'),
        'í' => Some('ý'),
        'Y' => Some('I'),
        'I' => Some('Y'),
        'Ý' => Some('Í'),
        'Í' => Some('Ý'),
        _ => None,
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
