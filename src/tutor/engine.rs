use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use parking_lot::Mutex;
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use uuid::Uuid;

use crate::core::event_sink::EventSink;
use crate::services::catalog::ContentCatalog;
use crate::tutor::config::{ConfigError, TutorConfig};
use crate::tutor::difficulty::DifficultyAdapter;
use crate::tutor::history::EventHistoryAnalyzer;
use crate::tutor::question::{Question, QuestionGenerator};
use crate::tutor::recommend::{self, RecommendationSelector};
use crate::tutor::session::{AnswerOutcome, QuizSession, SessionError, SessionPhase};
use crate::tutor::types::{AnswerEvent, Mode, RecommendationPlan};

pub type SessionHandle = Uuid;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionStart {
    pub session_handle: SessionHandle,
    pub first_question: Question,
    pub total_questions: usize,
}

/// Engine generator handed out one draw at a time, so the lock is never held
/// across a sink write.
struct SharedRng<'a>(&'a Mutex<ChaCha8Rng>);

impl RngCore for SharedRng<'_> {
    fn next_u32(&mut self) -> u32 {
        self.0.lock().next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.0.lock().next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.0.lock().fill_bytes(dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.0.lock().try_fill_bytes(dest)
    }
}

type SessionSlot = Arc<Mutex<QuizSession>>;

/// Host-facing entry point: recommendations plus the sessions it started.
///
/// Randomness comes from one seedable generator so a fixed seed replays the
/// same plans and questions. The session table lock only covers lookups;
/// grading, the sink write and question generation run under the session's
/// own lock.
pub struct TutorEngine {
    config: TutorConfig,
    catalog: Arc<dyn ContentCatalog>,
    sink: Arc<dyn EventSink>,
    selector: RecommendationSelector,
    rng: Mutex<ChaCha8Rng>,
    sessions: Mutex<HashMap<SessionHandle, SessionSlot>>,
}

impl TutorEngine {
    pub fn new(
        config: TutorConfig,
        catalog: Arc<dyn ContentCatalog>,
        sink: Arc<dyn EventSink>,
    ) -> Result<Self, ConfigError> {
        Self::with_rng(config, catalog, sink, ChaCha8Rng::from_entropy())
    }

    pub fn with_seed(
        config: TutorConfig,
        catalog: Arc<dyn ContentCatalog>,
        sink: Arc<dyn EventSink>,
        seed: u64,
    ) -> Result<Self, ConfigError> {
        Self::with_rng(config, catalog, sink, ChaCha8Rng::seed_from_u64(seed))
    }

    fn with_rng(
        config: TutorConfig,
        catalog: Arc<dyn ContentCatalog>,
        sink: Arc<dyn EventSink>,
        rng: ChaCha8Rng,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let selector = RecommendationSelector::new(config.recommendation.clone());
        Ok(Self {
            config,
            catalog,
            sink,
            selector,
            rng: Mutex::new(rng),
            sessions: Mutex::new(HashMap::new()),
        })
    }

    pub fn config(&self) -> &TutorConfig {
        &self.config
    }

    pub fn reseed(&self, seed: u64) {
        *self.rng.lock() = ChaCha8Rng::seed_from_u64(seed);
    }

    pub fn compute_recommendation(&self, mode: Mode, history: &[AnswerEvent]) -> RecommendationPlan {
        let pool = self.catalog.pool_for(mode);
        self.compute_recommendation_at(mode, history, &pool, Utc::now().timestamp_millis())
    }

    /// Recommendation against an explicit pool and clock.
    pub fn compute_recommendation_at(
        &self,
        mode: Mode,
        history: &[AnswerEvent],
        pool: &[String],
        now_ms: i64,
    ) -> RecommendationPlan {
        let window =
            EventHistoryAnalyzer::recent_window(history, self.config.recommendation.history_window);
        let stats = EventHistoryAnalyzer::analyze(&window);
        self.selector
            .select(&stats, mode, pool, now_ms, &mut SharedRng(&self.rng))
    }

    pub fn plan_for_item(&self, mode: Mode, item: &str) -> RecommendationPlan {
        let pool = self.catalog.pool_for(mode);
        recommend::plan_for_item(mode, item, &pool, &mut SharedRng(&self.rng))
    }

    pub fn start_session(&self, plan: RecommendationPlan) -> Result<SessionStart, SessionError> {
        let mut session = QuizSession::new(
            self.config.session.clone(),
            DifficultyAdapter::new(&self.config.difficulty),
        );
        let generator = QuestionGenerator::new(self.catalog.as_ref());
        let first_question = session.start(plan, &generator, &mut SharedRng(&self.rng))?;

        let session_handle = session.id();
        let total_questions = session.items().len();
        self.sessions
            .lock()
            .insert(session_handle, Arc::new(Mutex::new(session)));
        Ok(SessionStart {
            session_handle,
            first_question,
            total_questions,
        })
    }

    pub fn submit_answer(
        &self,
        handle: SessionHandle,
        value: &str,
    ) -> Result<AnswerOutcome, SessionError> {
        self.with_session(handle, |session, generator, sink, rng| {
            session.submit_answer(value, generator, sink, rng)
        })
    }

    /// Like [`Self::submit_answer`], but rejects an answer aimed at a
    /// question the session has already moved past.
    pub fn submit_answer_at(
        &self,
        handle: SessionHandle,
        question_index: usize,
        value: &str,
    ) -> Result<AnswerOutcome, SessionError> {
        self.with_session(handle, |session, generator, sink, rng| {
            session.submit_answer_at(question_index, value, generator, sink, rng)
        })
    }

    pub fn abandon(&self, handle: SessionHandle) {
        let slot = self.sessions.lock().remove(&handle);
        match slot {
            Some(slot) => slot.lock().abandon(),
            None => tracing::debug!(session_id = %handle, "abandon for unknown session"),
        }
    }

    pub fn active_sessions(&self) -> usize {
        self.sessions.lock().len()
    }

    fn with_session<F>(&self, handle: SessionHandle, f: F) -> Result<AnswerOutcome, SessionError>
    where
        F: FnOnce(
            &mut QuizSession,
            &QuestionGenerator<'_>,
            &dyn EventSink,
            &mut SharedRng<'_>,
        ) -> Result<AnswerOutcome, SessionError>,
    {
        let slot = self.sessions.lock().get(&handle).cloned().ok_or_else(|| {
            SessionError::InvalidSessionState(format!("no active session {handle}"))
        })?;

        let generator = QuestionGenerator::new(self.catalog.as_ref());
        let mut session = slot.lock();
        let outcome = f(
            &mut *session,
            &generator,
            self.sink.as_ref(),
            &mut SharedRng(&self.rng),
        )?;

        if session.phase() == SessionPhase::Complete {
            self.sessions.lock().remove(&handle);
        }
        Ok(outcome)
    }
}
