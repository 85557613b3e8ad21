use std::collections::BTreeMap;

use crate::tutor::types::{AnswerEvent, ItemStat, Mode};

pub type StatKey = (Mode, String);
pub type ItemStats = BTreeMap<StatKey, ItemStat>;

pub struct EventHistoryAnalyzer;

impl EventHistoryAnalyzer {
    /// Folds a history window into per `(mode, item)` counters in one pass.
    pub fn analyze(events: &[AnswerEvent]) -> ItemStats {
        let mut stats = ItemStats::new();
        for event in events {
            let stat = stats
                .entry((event.mode, event.item_id.clone()))
                .or_default();
            stat.seen += 1;
            if event.correct {
                stat.ok += 1;
            }
            stat.last_seen_at = stat.last_seen_at.max(event.timestamp);
        }
        stats
    }

    /// Keeps the `limit` most recent events, oldest first.
    pub fn recent_window(events: &[AnswerEvent], limit: usize) -> Vec<AnswerEvent> {
        let mut window = events.to_vec();
        if window.len() > limit {
            window.sort_by_key(|e| e.timestamp);
            let excess = window.len() - limit;
            window.drain(..excess);
        }
        window
    }
}
