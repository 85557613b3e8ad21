//! Adaptive practice engine for a children's tutor.
//!
//! Picks the next exercises from past answers, runs five-question sessions
//! whose difficulty follows the learner's accuracy, and synthesizes gradable
//! questions for multiplication facts, spelling words and vocabulary.
//! Storage, authentication and transport belong to the host.

pub mod config;
pub mod core;
pub mod logging;
pub mod services;
pub mod tutor;

pub use tutor::{
    AnswerEvent, AnswerOutcome, DifficultyTier, Mode, Question, RecommendationPlan,
    SessionError, SessionSummary, TutorConfig, TutorEngine,
};
