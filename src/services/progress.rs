use std::collections::{BTreeMap, VecDeque};

use chrono::{DateTime, NaiveDate, Utc};
use parking_lot::RwLock;
use serde::Serialize;

use crate::core::event_sink::{EventSink, SinkError};
use crate::tutor::types::{AnswerEvent, Mode};

const RECENT_CAPACITY: usize = 20;
const UNSEEN_MASTERY: f64 = 0.3;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Tally {
    pub seen: u32,
    pub ok: u32,
}

impl Tally {
    fn add(&mut self, correct: bool) {
        self.seen += 1;
        if correct {
            self.ok += 1;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MasteryBand {
    Starting,
    Consolidating,
    Flying,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ModeProgress {
    pub seen: u32,
    pub ok: u32,
    /// Consecutive correct answers, reset by a wrong one.
    pub streak: u32,
}

impl ModeProgress {
    pub fn mastery(&self) -> f64 {
        if self.seen == 0 {
            return UNSEEN_MASTERY;
        }
        f64::from(self.ok) / f64::from(self.seen)
    }

    pub fn mastery_band(&self) -> MasteryBand {
        let percent = (self.mastery() * 100.0).round();
        if percent < 40.0 {
            MasteryBand::Starting
        } else if percent < 75.0 {
            MasteryBand::Consolidating
        } else {
            MasteryBand::Flying
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressSummary {
    pub totals: Tally,
    pub per_mode: BTreeMap<Mode, ModeProgress>,
    pub daily: BTreeMap<NaiveDate, Tally>,
    pub recent: VecDeque<AnswerEvent>,
}

impl ProgressSummary {
    pub fn apply(&mut self, event: &AnswerEvent) {
        self.totals.add(event.correct);

        let mode = self.per_mode.entry(event.mode).or_default();
        mode.seen += 1;
        if event.correct {
            mode.ok += 1;
            mode.streak += 1;
        } else {
            mode.streak = 0;
        }

        if let Some(day) = DateTime::<Utc>::from_timestamp_millis(event.timestamp) {
            self.daily.entry(day.date_naive()).or_default().add(event.correct);
        }

        self.recent.push_back(event.clone());
        while self.recent.len() > RECENT_CAPACITY {
            self.recent.pop_front();
        }
    }

    pub fn mode(&self, mode: Mode) -> ModeProgress {
        self.per_mode.get(&mode).copied().unwrap_or_default()
    }

    pub fn day(&self, day: NaiveDate) -> Tally {
        self.daily.get(&day).copied().unwrap_or_default()
    }
}

/// Event sink that folds answers into a running [`ProgressSummary`].
#[derive(Debug, Default)]
pub struct ProgressTracker {
    summary: RwLock<ProgressSummary>,
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_history(events: &[AnswerEvent]) -> Self {
        let tracker = Self::new();
        {
            let mut summary = tracker.summary.write();
            for event in events {
                summary.apply(event);
            }
        }
        tracker
    }

    pub fn snapshot(&self) -> ProgressSummary {
        self.summary.read().clone()
    }
}

impl EventSink for ProgressTracker {
    fn record(&self, event: AnswerEvent) -> Result<(), SinkError> {
        self.summary.write().apply(&event);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DAY_MS: i64 = 86_400_000;
    const BASE: i64 = 1_700_006_400_000;

    fn event(mode: Mode, correct: bool, ts: i64) -> AnswerEvent {
        AnswerEvent {
            mode,
            item_id: format!("{}x", mode.item_prefix()),
            correct,
            timestamp: ts,
        }
    }

    #[test]
    fn test_streak_resets_on_miss() {
        let tracker = ProgressTracker::new();
        for correct in [true, true, false, true] {
            tracker.record(event(Mode::Arithmetic, correct, BASE)).unwrap();
        }
        let math = tracker.snapshot().mode(Mode::Arithmetic);
        assert_eq!((math.seen, math.ok, math.streak), (4, 3, 1));
    }

    #[test]
    fn test_daily_and_totals() {
        let tracker = ProgressTracker::from_history(&[
            event(Mode::Arithmetic, true, BASE),
            event(Mode::Spelling, false, BASE + 1_000),
            event(Mode::Vocabulary, true, BASE + DAY_MS),
        ]);
        let summary = tracker.snapshot();
        assert_eq!(summary.totals, Tally { seen: 3, ok: 2 });
        assert_eq!(summary.daily.len(), 2);
        let first_day = DateTime::<Utc>::from_timestamp_millis(BASE).unwrap().date_naive();
        assert_eq!(summary.day(first_day), Tally { seen: 2, ok: 1 });
    }

    #[test]
    fn test_recent_ring_buffer() {
        let tracker = ProgressTracker::new();
        for i in 0..25 {
            tracker.record(event(Mode::Spelling, true, BASE + i)).unwrap();
        }
        let recent = tracker.snapshot().recent;
        assert_eq!(recent.len(), 20);
        assert_eq!(recent.front().map(|e| e.timestamp), Some(BASE + 5));
    }

    #[test]
    fn test_mastery_bands() {
        assert_eq!(ModeProgress::default().mastery_band(), MasteryBand::Starting);
        let mid = ModeProgress { seen: 10, ok: 5, streak: 0 };
        assert_eq!(mid.mastery_band(), MasteryBand::Consolidating);
        let high = ModeProgress { seen: 4, ok: 3, streak: 3 };
        assert_eq!(high.mastery_band(), MasteryBand::Flying);
    }
}
