pub mod catalog;
pub mod progress;

pub use catalog::{CatalogError, ContentCatalog, EnglishWord, WordLists};
pub use progress::{MasteryBand, ModeProgress, ProgressSummary, ProgressTracker};
