use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::tutor::types::Mode;

const DEFAULT_POOL_LIMIT: usize = 30;
const MULTIPLICATION_TABLES: std::ops::RangeInclusive<u32> = 2..=9;

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("missing catalog entry: {0}")]
    MissingCatalogEntry(String),
    #[error("word lists read failed: {0}")]
    Load(#[from] std::io::Error),
    #[error("word lists parse failed: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Read-only source of practice content.
pub trait ContentCatalog: Send + Sync {
    /// Candidate item ids for a mode, in catalog order.
    fn pool_for(&self, mode: Mode) -> Vec<String>;

    fn translation_for(&self, word: &str) -> Option<String>;

    /// Every known translation, used as a distractor source.
    fn translations(&self) -> Vec<String>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnglishWord {
    pub en: String,
    pub cs: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawWordLists {
    vyjmenovana: Vec<serde_json::Value>,
    english: Vec<RawEnglishWord>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawEnglishWord {
    en: Option<String>,
    cs: Option<String>,
}

/// Spelling and vocabulary word lists backing the catalog.
#[derive(Debug, Clone, Serialize)]
pub struct WordLists {
    pub vyjmenovana: Vec<String>,
    pub english: Vec<EnglishWord>,
    #[serde(skip)]
    pool_limit: usize,
}

impl WordLists {
    pub fn new(vyjmenovana: Vec<String>, english: Vec<EnglishWord>) -> Self {
        Self {
            vyjmenovana,
            english,
            pool_limit: DEFAULT_POOL_LIMIT,
        }
    }

    pub fn with_pool_limit(mut self, limit: usize) -> Self {
        self.pool_limit = limit;
        self
    }

    /// Parses the lists document. Blank words and entries without an English
    /// word are dropped; a missing translation falls back to the word itself.
    pub fn from_json_str(raw: &str) -> Result<Self, CatalogError> {
        let parsed: RawWordLists = serde_json::from_str(raw)?;

        let vyjmenovana = parsed
            .vyjmenovana
            .into_iter()
            .filter_map(|value| match value {
                serde_json::Value::String(s) => Some(s),
                serde_json::Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let english = parsed
            .english
            .into_iter()
            .filter_map(|entry| {
                let en = entry.en?.trim().to_string();
                if en.is_empty() {
                    return None;
                }
                let cs = entry
                    .cs
                    .map(|cs| cs.trim().to_string())
                    .filter(|cs| !cs.is_empty())
                    .unwrap_or_else(|| en.clone());
                Some(EnglishWord { en, cs })
            })
            .collect();

        Ok(Self::new(vyjmenovana, english))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }
}

impl Default for WordLists {
    fn default() -> Self {
        Self::new(
            ["být", "bydlet", "myslivec", "obyvatel"]
                .iter()
                .map(|w| w.to_string())
                .collect(),
            vec![
                EnglishWord { en: "cat".into(), cs: "kočka".into() },
                EnglishWord { en: "dog".into(), cs: "pes".into() },
            ],
        )
    }
}

impl ContentCatalog for WordLists {
    fn pool_for(&self, mode: Mode) -> Vec<String> {
        match mode {
            Mode::Arithmetic => MULTIPLICATION_TABLES
                .map(|n| mode.item_id(&n.to_string()))
                .collect(),
            Mode::Spelling => self
                .vyjmenovana
                .iter()
                .take(self.pool_limit)
                .map(|w| mode.item_id(w))
                .collect(),
            Mode::Vocabulary => self
                .english
                .iter()
                .take(self.pool_limit)
                .map(|w| mode.item_id(&w.en))
                .collect(),
        }
    }

    fn translation_for(&self, word: &str) -> Option<String> {
        self.english
            .iter()
            .find(|w| w.en == word)
            .map(|w| w.cs.clone())
    }

    fn translations(&self) -> Vec<String> {
        self.english.iter().map(|w| w.cs.clone()).collect()
    }
}
