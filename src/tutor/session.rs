use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::event_sink::EventSink;
use crate::tutor::config::SessionConfig;
use crate::tutor::difficulty::DifficultyAdapter;
use crate::tutor::question::{Question, QuestionGenerator};
use crate::tutor::types::{AnswerEvent, DifficultyTier, Mode, RecommendationPlan, SessionSummary};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SessionPhase {
    Idle,
    InProgress,
    Complete,
    Abandoned,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("invalid plan: {0}")]
    InvalidPlan(String),
    #[error("invalid session state: {0}")]
    InvalidSessionState(String),
    #[error("answer for question {submitted} rejected, session is at question {current}")]
    StaleAnswer { submitted: usize, current: usize },
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerOutcome {
    pub correct: bool,
    pub solution_text: String,
    pub session_complete: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<SessionSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_question: Option<Question>,
    pub difficulty_tier: DifficultyTier,
}

pub fn xp_gained(config: &SessionConfig, total_correct: u32) -> u32 {
    config.xp_base + total_correct * config.xp_per_correct
}

/// One practice run over a fixed item list: `Idle → InProgress → Complete`,
/// with `abandon` reachable from any phase.
#[derive(Debug)]
pub struct QuizSession {
    id: Uuid,
    mode: Mode,
    items: Vec<String>,
    current_index: usize,
    total_correct: u32,
    difficulty_tier: DifficultyTier,
    started_at: Option<DateTime<Utc>>,
    phase: SessionPhase,
    current_question: Option<Question>,
    config: SessionConfig,
    adapter: DifficultyAdapter,
}

impl QuizSession {
    pub fn new(config: SessionConfig, adapter: DifficultyAdapter) -> Self {
        Self {
            id: Uuid::new_v4(),
            mode: Mode::Arithmetic,
            items: Vec::new(),
            current_index: 0,
            total_correct: 0,
            difficulty_tier: DifficultyTier::Standard,
            started_at: None,
            phase: SessionPhase::Idle,
            current_question: None,
            config,
            adapter,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn total_correct(&self) -> u32 {
        self.total_correct
    }

    pub fn difficulty_tier(&self) -> DifficultyTier {
        self.difficulty_tier
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.current_question.as_ref()
    }

    pub fn start<R: Rng + ?Sized>(
        &mut self,
        plan: RecommendationPlan,
        generator: &QuestionGenerator<'_>,
        rng: &mut R,
    ) -> Result<Question, SessionError> {
        if self.phase != SessionPhase::Idle {
            return Err(SessionError::InvalidSessionState(format!(
                "start requires an idle session, found {:?}",
                self.phase
            )));
        }
        let mut items = plan.items;
        items.truncate(self.config.max_items);
        if items.is_empty() {
            return Err(SessionError::InvalidPlan("plan has no items".to_string()));
        }

        self.mode = plan.mode;
        self.items = items;
        self.current_index = 0;
        self.total_correct = 0;
        self.difficulty_tier = DifficultyTier::Standard;
        self.started_at = Some(Utc::now());
        self.phase = SessionPhase::InProgress;

        let question = self.issue_question(generator, rng);
        tracing::info!(
            session_id = %self.id,
            mode = self.mode.as_str(),
            items = self.items.len(),
            "practice session started"
        );
        Ok(question)
    }

    /// Grades the outstanding question only if it is still question `index`.
    pub fn submit_answer_at<R: Rng + ?Sized>(
        &mut self,
        index: usize,
        value: &str,
        generator: &QuestionGenerator<'_>,
        sink: &dyn EventSink,
        rng: &mut R,
    ) -> Result<AnswerOutcome, SessionError> {
        if self.phase == SessionPhase::InProgress && index != self.current_index {
            tracing::warn!(
                session_id = %self.id,
                submitted = index,
                current = self.current_index,
                "rejecting answer for an already graded question"
            );
            return Err(SessionError::StaleAnswer {
                submitted: index,
                current: self.current_index,
            });
        }
        self.submit_answer(value, generator, sink, rng)
    }

    pub fn submit_answer<R: Rng + ?Sized>(
        &mut self,
        value: &str,
        generator: &QuestionGenerator<'_>,
        sink: &dyn EventSink,
        rng: &mut R,
    ) -> Result<AnswerOutcome, SessionError> {
        if self.phase != SessionPhase::InProgress {
            return Err(SessionError::InvalidSessionState(format!(
                "cannot answer in {:?} session",
                self.phase
            )));
        }
        let question = self.current_question.take().ok_or_else(|| {
            SessionError::InvalidSessionState("no outstanding question".to_string())
        })?;

        let correct = question.is_correct(value);
        let event = AnswerEvent {
            mode: Mode::of_item(&question.item_id).unwrap_or(self.mode),
            item_id: question.item_id.clone(),
            correct,
            timestamp: Utc::now().timestamp_millis(),
        };
        if let Err(err) = sink.record(event) {
            tracing::warn!(session_id = %self.id, error = %err, "answer event dropped");
        }

        if correct {
            self.total_correct += 1;
        }
        self.current_index += 1;

        if self.config.adapt_every > 0 && self.current_index % self.config.adapt_every == 0 {
            let tier = self.adapter.adapt(self.total_correct, self.current_index as u32);
            if tier != self.difficulty_tier {
                tracing::debug!(
                    session_id = %self.id,
                    from = self.difficulty_tier.as_str(),
                    to = tier.as_str(),
                    "difficulty adjusted"
                );
            }
            self.difficulty_tier = tier;
        }

        if self.current_index >= self.items.len() {
            self.phase = SessionPhase::Complete;
            let summary = self.summary();
            tracing::info!(
                session_id = %self.id,
                total_correct = summary.total_correct,
                total = summary.total,
                xp = summary.xp_gained,
                "practice session complete"
            );
            return Ok(AnswerOutcome {
                correct,
                solution_text: question.expected_answer,
                session_complete: true,
                summary: Some(summary),
                next_question: None,
                difficulty_tier: self.difficulty_tier,
            });
        }

        let next = self.issue_question(generator, rng);
        Ok(AnswerOutcome {
            correct,
            solution_text: question.expected_answer,
            session_complete: false,
            summary: None,
            next_question: Some(next),
            difficulty_tier: self.difficulty_tier,
        })
    }

    pub fn abandon(&mut self) {
        if self.phase == SessionPhase::InProgress {
            tracing::info!(
                session_id = %self.id,
                answered = self.current_index,
                "practice session abandoned"
            );
        }
        self.phase = SessionPhase::Abandoned;
        self.current_question = None;
        self.items.clear();
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            total_correct: self.total_correct,
            total: self.items.len() as u32,
            xp_gained: xp_gained(&self.config, self.total_correct),
        }
    }

    fn issue_question<R: Rng + ?Sized>(
        &mut self,
        generator: &QuestionGenerator<'_>,
        rng: &mut R,
    ) -> Question {
        let item_id = &self.items[self.current_index];
        let question = generator.generate(self.mode, item_id, self.difficulty_tier, rng);
        self.current_question = Some(question.clone());
        question
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::event_sink::{MemoryEventSink, SinkError};
    use crate::services::catalog::WordLists;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    struct FailingSink;

    impl EventSink for FailingSink {
        fn record(&self, _event: AnswerEvent) -> Result<(), SinkError> {
            Err(SinkError::Transient("store offline".into()))
        }
    }

    fn new_session() -> QuizSession {
        QuizSession::new(SessionConfig::default(), DifficultyAdapter::default())
    }

    fn plan(n: usize) -> RecommendationPlan {
        RecommendationPlan::new(
            Mode::Arithmetic,
            (0..n).map(|i| format!("mult-{}", 2 + i % 8)).collect(),
        )
    }

    #[test]
    fn test_xp_formula() {
        assert_eq!(xp_gained(&SessionConfig::default(), 3), 28);
        assert_eq!(xp_gained(&SessionConfig::default(), 0), 10);
    }

    #[test]
    fn test_empty_plan_rejected() {
        let lists = WordLists::default();
        let generator = QuestionGenerator::new(&lists);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut session = new_session();
        let err = session
            .start(RecommendationPlan::new(Mode::Arithmetic, vec![]), &generator, &mut rng)
            .unwrap_err();
        assert!(matches!(err, SessionError::InvalidPlan(_)));
        assert_eq!(session.phase(), SessionPhase::Idle);
    }

    #[test]
    fn test_zero_item_budget_rejects_plan() {
        let lists = WordLists::default();
        let generator = QuestionGenerator::new(&lists);
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let config = SessionConfig {
            max_items: 0,
            ..SessionConfig::default()
        };
        let mut session = QuizSession::new(config, DifficultyAdapter::default());
        let err = session.start(plan(1), &generator, &mut rng).unwrap_err();
        assert!(matches!(err, SessionError::InvalidPlan(_)));
        assert_eq!(session.phase(), SessionPhase::Idle);
        assert!(session.current_question().is_none());
    }

    #[test]
    fn test_cross_mode_item_logged_under_its_own_mode() {
        let lists = WordLists::default();
        let generator = QuestionGenerator::new(&lists);
        let sink = MemoryEventSink::new();
        let mut rng = ChaCha8Rng::seed_from_u64(10);
        let mut session = new_session();
        let plan = RecommendationPlan::new(Mode::Arithmetic, vec!["en-cat".into(), "mult-3".into()]);
        let question = session.start(plan, &generator, &mut rng).unwrap();
        assert!(!question.is_placeholder);

        let outcome = session
            .submit_answer("kočka", &generator, &sink, &mut rng)
            .unwrap();
        assert!(outcome.correct);
        let events = sink.events();
        assert_eq!(events[0].mode, Mode::Vocabulary);
        assert_eq!(events[0].item_id, "en-cat");
    }

    #[test]
    fn test_submit_before_start_fails_without_state_change() {
        let lists = WordLists::default();
        let generator = QuestionGenerator::new(&lists);
        let sink = MemoryEventSink::new();
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let mut session = new_session();
        let err = session.submit_answer("4", &generator, &sink, &mut rng).unwrap_err();
        assert!(matches!(err, SessionError::InvalidSessionState(_)));
        assert_eq!(session.phase(), SessionPhase::Idle);
        assert!(sink.events().is_empty());
    }

    #[test]
    fn test_plan_truncated_to_five() {
        let lists = WordLists::default();
        let generator = QuestionGenerator::new(&lists);
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut session = new_session();
        session.start(plan(8), &generator, &mut rng).unwrap();
        assert_eq!(session.items().len(), 5);
        assert_eq!(session.phase(), SessionPhase::InProgress);
        assert_eq!(session.difficulty_tier(), DifficultyTier::Standard);
    }

    #[test]
    fn test_all_correct_run_completes_and_gets_harder() {
        let lists = WordLists::default();
        let generator = QuestionGenerator::new(&lists);
        let sink = MemoryEventSink::new();
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let mut session = new_session();
        let mut question = session.start(plan(5), &generator, &mut rng).unwrap();

        for answered in 1..=5 {
            let outcome = session
                .submit_answer(&question.expected_answer.clone(), &generator, &sink, &mut rng)
                .unwrap();
            assert!(outcome.correct);
            if answered == 2 {
                assert_eq!(outcome.difficulty_tier, DifficultyTier::Harder);
            }
            if answered < 5 {
                assert!(!outcome.session_complete);
                question = outcome.next_question.unwrap();
            } else {
                assert!(outcome.session_complete);
                let summary = outcome.summary.unwrap();
                assert_eq!(summary.total_correct, 5);
                assert_eq!(summary.total, 5);
                assert_eq!(summary.xp_gained, 40);
            }
        }
        assert_eq!(session.phase(), SessionPhase::Complete);
        assert_eq!(sink.events().len(), 5);
        assert!(session.submit_answer("1", &generator, &sink, &mut rng).is_err());
    }

    #[test]
    fn test_wrong_answers_make_it_easier() {
        let lists = WordLists::default();
        let generator = QuestionGenerator::new(&lists);
        let sink = MemoryEventSink::new();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut session = new_session();
        session.start(plan(5), &generator, &mut rng).unwrap();

        let first = session.submit_answer("nope", &generator, &sink, &mut rng).unwrap();
        assert_eq!(first.difficulty_tier, DifficultyTier::Standard);
        let second = session.submit_answer("nope", &generator, &sink, &mut rng).unwrap();
        assert_eq!(second.difficulty_tier, DifficultyTier::Easier);
        assert_eq!(
            second.next_question.unwrap().options.len(),
            4,
            "easier arithmetic stays multiple choice"
        );
    }

    #[test]
    fn test_sink_failure_does_not_block_progress() {
        let lists = WordLists::default();
        let generator = QuestionGenerator::new(&lists);
        let mut rng = ChaCha8Rng::seed_from_u64(6);
        let mut session = new_session();
        let q = session.start(plan(2), &generator, &mut rng).unwrap();
        let outcome = session
            .submit_answer(&q.expected_answer.clone(), &generator, &FailingSink, &mut rng)
            .unwrap();
        assert!(outcome.correct);
        assert_eq!(session.current_index(), 1);
    }

    #[test]
    fn test_stale_answer_guard() {
        let lists = WordLists::default();
        let generator = QuestionGenerator::new(&lists);
        let sink = MemoryEventSink::new();
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut session = new_session();
        session.start(plan(3), &generator, &mut rng).unwrap();
        session.submit_answer_at(0, "1", &generator, &sink, &mut rng).unwrap();
        let err = session
            .submit_answer_at(0, "1", &generator, &sink, &mut rng)
            .unwrap_err();
        assert_eq!(err, SessionError::StaleAnswer { submitted: 0, current: 1 });
        assert_eq!(session.current_index(), 1);
        assert_eq!(sink.events().len(), 1);
    }

    #[test]
    fn test_abandon_from_any_phase() {
        let lists = WordLists::default();
        let generator = QuestionGenerator::new(&lists);
        let sink = MemoryEventSink::new();
        let mut rng = ChaCha8Rng::seed_from_u64(8);

        let mut idle = new_session();
        idle.abandon();
        assert_eq!(idle.phase(), SessionPhase::Abandoned);

        let mut running = new_session();
        running.start(plan(3), &generator, &mut rng).unwrap();
        running.abandon();
        assert_eq!(running.phase(), SessionPhase::Abandoned);
        assert!(running.current_question().is_none());
        assert!(running.submit_answer("1", &generator, &sink, &mut rng).is_err());
        assert!(running.start(plan(3), &generator, &mut rng).is_err());
    }
}
