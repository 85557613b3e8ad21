#![allow(dead_code)]

use std::sync::Arc;

use practice_tutor::core::MemoryEventSink;
use practice_tutor::services::{EnglishWord, WordLists};
use practice_tutor::tutor::{AnswerEvent, Mode, TutorConfig, TutorEngine, MS_PER_DAY};

pub const NOW: i64 = 1_700_000_000_000;

pub fn sample_lists() -> WordLists {
    let english = [
        ("cat", "kočka"),
        ("dog", "pes"),
        ("sun", "slunce"),
        ("tree", "strom"),
        ("house", "dům"),
        ("apple", "jablko"),
    ]
    .iter()
    .map(|(en, cs)| EnglishWord {
        en: en.to_string(),
        cs: cs.to_string(),
    })
    .collect();
    let spelling = ["být", "bydlet", "myslivec", "obyvatel", "nabýt", "přibýt"]
        .iter()
        .map(|w| w.to_string())
        .collect();
    WordLists::new(spelling, english)
}

pub fn test_engine(seed: u64) -> (TutorEngine, Arc<MemoryEventSink>) {
    let sink = Arc::new(MemoryEventSink::new());
    let engine = TutorEngine::with_seed(
        TutorConfig::default(),
        Arc::new(sample_lists()),
        sink.clone(),
        seed,
    )
    .expect("default config is valid");
    (engine, sink)
}

pub fn answer(mode: Mode, item: &str, correct: bool, days_ago: f64) -> AnswerEvent {
    AnswerEvent {
        mode,
        item_id: item.to_string(),
        correct,
        timestamp: NOW - (days_ago * MS_PER_DAY) as i64,
    }
}

/// `seen` answers for `item`, the first `ok` of them correct, all `days_ago`.
pub fn repeated(mode: Mode, item: &str, seen: usize, ok: usize, days_ago: f64) -> Vec<AnswerEvent> {
    (0..seen)
        .map(|i| answer(mode, item, i < ok, days_ago))
        .collect()
}
