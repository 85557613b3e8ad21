pub mod config;
pub mod difficulty;
pub mod engine;
pub mod history;
pub mod question;
pub mod recommend;
pub mod session;
pub mod types;

pub use config::{ConfigError, TutorConfig};
pub use difficulty::DifficultyAdapter;
pub use engine::{SessionHandle, SessionStart, TutorEngine};
pub use history::EventHistoryAnalyzer;
pub use question::{AnswerCheck, AnswerKind, Question, QuestionGenerator};
pub use recommend::{plan_for_item, CandidatePools, RecommendationSelector};
pub use session::{AnswerOutcome, QuizSession, SessionError, SessionPhase};
pub use types::*;
