//! Gradable question synthesis for the three practice modes.
//!
//! Each mode module turns an item id plus a difficulty tier into a
//! [`Question`]. Item ids that cannot be resolved surface as
//! [`CatalogError::MissingCatalogEntry`] inside the builders and degrade to a
//! placeholder question at the [`QuestionGenerator`] boundary.

pub mod arithmetic;
pub mod spelling;
pub mod vocabulary;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::services::catalog::{CatalogError, ContentCatalog};
use crate::tutor::types::{DifficultyTier, Mode};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AnswerKind {
    MultipleChoice,
    FreeText,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "expected", rename_all = "camelCase")]
pub enum AnswerCheck {
    /// Trimmed input must equal the expected text exactly.
    Exact(String),
    /// Trimmed, lowercased input must equal the lowercased expected text.
    CaseInsensitive(String),
    /// Rejects every answer. Only issued for placeholder questions.
    Unanswerable,
}

impl AnswerCheck {
    pub fn accepts(&self, value: &str) -> bool {
        match self {
            Self::Exact(expected) => value.trim() == expected,
            Self::CaseInsensitive(expected) => normalize(value) == normalize(expected),
            Self::Unanswerable => false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub prompt_text: String,
    pub answer_kind: AnswerKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
    pub expected_answer: String,
    pub check: AnswerCheck,
    pub item_id: String,
    #[serde(default)]
    pub is_placeholder: bool,
}

impl Question {
    pub fn multiple_choice(
        item_id: &str,
        prompt_text: String,
        options: Vec<String>,
        expected_answer: String,
    ) -> Self {
        Self {
            prompt_text,
            answer_kind: AnswerKind::MultipleChoice,
            options,
            check: AnswerCheck::Exact(expected_answer.clone()),
            expected_answer,
            item_id: item_id.to_string(),
            is_placeholder: false,
        }
    }

    pub fn free_text(item_id: &str, prompt_text: String, check: AnswerCheck, expected_answer: String) -> Self {
        Self {
            prompt_text,
            answer_kind: AnswerKind::FreeText,
            options: Vec::new(),
            expected_answer,
            check,
            item_id: item_id.to_string(),
            is_placeholder: false,
        }
    }

    /// Stand-in for an item the catalog cannot resolve. It can never be
    /// answered correctly; hosts may check `is_placeholder` to skip it.
    pub fn placeholder(item_id: &str) -> Self {
        Self {
            prompt_text: "?".to_string(),
            answer_kind: AnswerKind::FreeText,
            options: Vec::new(),
            expected_answer: String::new(),
            check: AnswerCheck::Unanswerable,
            item_id: item_id.to_string(),
            is_placeholder: true,
        }
    }

    pub fn is_correct(&self, value: &str) -> bool {
        self.check.accepts(value)
    }
}

pub struct QuestionGenerator<'a> {
    catalog: &'a dyn ContentCatalog,
}

impl<'a> QuestionGenerator<'a> {
    pub fn new(catalog: &'a dyn ContentCatalog) -> Self {
        Self { catalog }
    }

    pub fn generate<R: Rng + ?Sized>(
        &self,
        mode: Mode,
        item_id: &str,
        tier: DifficultyTier,
        rng: &mut R,
    ) -> Question {
        // Items carry their own mode; cross-mode history can put an `en-` item
        // into an arithmetic session.
        let mode = Mode::of_item(item_id).unwrap_or(mode);
        let built = match mode {
            Mode::Arithmetic => arithmetic::build(item_id, tier, rng),
            Mode::Spelling => spelling::build(item_id, tier, rng),
            Mode::Vocabulary => vocabulary::build(self.catalog, item_id, tier, rng),
        };

        match built {
            Ok(question) => question,
            Err(err) => {
                tracing::warn!(
                    mode = mode.as_str(),
                    item_id,
                    error = %err,
                    "issuing placeholder question"
                );
                Question::placeholder(item_id)
            }
        }
    }
}

pub(crate) fn missing(item_id: &str) -> CatalogError {
    CatalogError::MissingCatalogEntry(item_id.to_string())
}

/// Appends `candidate` unless it is already present.
pub(crate) fn push_distinct(options: &mut Vec<String>, candidate: String) {
    if !options.contains(&candidate) {
        options.push(candidate);
    }
}

fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::catalog::WordLists;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_answer_checks() {
        assert!(AnswerCheck::Exact("42".into()).accepts(" 42 "));
        assert!(!AnswerCheck::Exact("42".into()).accepts("7*6"));
        assert!(AnswerCheck::CaseInsensitive("Kočka".into()).accepts("  kočka"));
        assert!(!AnswerCheck::Unanswerable.accepts(""));
        assert!(!AnswerCheck::Unanswerable.accepts("?"));
    }

    #[test]
    fn test_unknown_items_become_placeholders() {
        let lists = WordLists::default();
        let generator = QuestionGenerator::new(&lists);
        let mut rng = ChaCha8Rng::seed_from_u64(7);

        for (mode, item) in [
            (Mode::Arithmetic, "mult-x"),
            (Mode::Arithmetic, "mult-12"),
            (Mode::Arithmetic, "seven"),
            (Mode::Spelling, "vyj-"),
            (Mode::Vocabulary, "en-horse"),
        ] {
            let q = generator.generate(mode, item, DifficultyTier::Standard, &mut rng);
            assert!(q.is_placeholder, "{item} should be a placeholder");
            assert_eq!(q.item_id, item);
            assert!(!q.is_correct(""));
        }
    }

    #[test]
    fn test_builder_follows_item_prefix() {
        let lists = WordLists::default();
        let generator = QuestionGenerator::new(&lists);
        let mut rng = ChaCha8Rng::seed_from_u64(8);

        let q = generator.generate(Mode::Arithmetic, "en-cat", DifficultyTier::Harder, &mut rng);
        assert!(!q.is_placeholder);
        assert_eq!(q.expected_answer, "kočka");
        assert!(q.is_correct("Kočka"));

        let q = generator.generate(Mode::Vocabulary, "vyj-být", DifficultyTier::Harder, &mut rng);
        assert!(!q.is_placeholder);
        assert_eq!(q.prompt_text, "Fill in: b_t");
    }

    #[test]
    fn test_question_serializes_camel_case() {
        let q = Question::multiple_choice("mult-2", "2 × 3?".into(), vec!["6".into()], "6".into());
        let json = serde_json::to_value(&q).unwrap();
        assert_eq!(json["answerKind"], "multipleChoice");
        assert_eq!(json["check"]["kind"], "exact");
        assert_eq!(json["itemId"], "mult-2");
    }
}
