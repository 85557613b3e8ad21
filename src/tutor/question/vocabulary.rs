use rand::seq::SliceRandom;
use rand::Rng;

use super::{missing, push_distinct, AnswerCheck, Question};
use crate::services::catalog::{CatalogError, ContentCatalog};
use crate::tutor::types::{DifficultyTier, Mode};

const SAMPLED_DISTRACTORS: usize = 3;

pub fn build<R: Rng + ?Sized>(
    catalog: &dyn ContentCatalog,
    item_id: &str,
    tier: DifficultyTier,
    rng: &mut R,
) -> Result<Question, CatalogError> {
    let word = item_id
        .strip_prefix(Mode::Vocabulary.item_prefix())
        .ok_or_else(|| missing(item_id))?;
    let translation = catalog
        .translation_for(word)
        .ok_or_else(|| missing(item_id))?;

    let (prompt, distractors) = match tier {
        DifficultyTier::Harder => {
            return Ok(Question::free_text(
                item_id,
                format!("Translate to Czech: '{word}'"),
                AnswerCheck::CaseInsensitive(translation.clone()),
                translation,
            ));
        }
        DifficultyTier::Easier => (
            format!("What does '{word}' mean in Czech?"),
            placeholder_distractors(&translation),
        ),
        DifficultyTier::Standard => (
            format!("Pick the right translation: '{word}'"),
            sample_distractors(catalog, &translation, rng),
        ),
    };

    let mut options = vec![translation.clone()];
    for distractor in distractors {
        if distractor != translation {
            push_distinct(&mut options, distractor);
        }
    }
    options.shuffle(rng);

    Ok(Question::multiple_choice(item_id, prompt, options, translation))
}

fn placeholder_distractors(translation: &str) -> Vec<String> {
    let stem: String = translation.chars().take(2).collect();
    vec!["??".to_string(), format!("{stem}…"), "-".to_string()]
}

/// Up to three other distinct catalog translations, drawn uniformly.
fn sample_distractors<R: Rng + ?Sized>(
    catalog: &dyn ContentCatalog,
    translation: &str,
    rng: &mut R,
) -> Vec<String> {
    let mut pool = Vec::new();
    for other in catalog.translations() {
        if !other.is_empty() && other != translation {
            push_distinct(&mut pool, other);
        }
    }
    pool.choose_multiple(rng, SAMPLED_DISTRACTORS)
        .cloned()
        .collect()
}
