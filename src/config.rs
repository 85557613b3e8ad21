use std::path::PathBuf;

use crate::tutor::types::Mode;

const DEFAULT_LOG_DIR: &str = "./logs";
const DEFAULT_LOG_FILE: &str = "tutor.log";

#[derive(Debug, Clone)]
pub struct Config {
    pub log_level: String,
    /// Mirror logs into a daily rolling file under `log_dir`.
    pub file_logs: bool,
    pub log_dir: PathBuf,
    pub log_file: String,
    pub mode: Mode,
    pub lists_path: Option<PathBuf>,
    pub history_path: Option<PathBuf>,
    pub tutor_config_path: Option<PathBuf>,
    pub seed: Option<u64>,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; unparseable values fall back
    /// to defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let log_level = non_empty("RUST_LOG").unwrap_or_else(|| "info".to_string());

        let file_logs = non_empty("TUTOR_FILE_LOGS")
            .map(|value| matches!(value.trim(), "1" | "true"))
            .unwrap_or(false);

        let mode = non_empty("TUTOR_MODE")
            .and_then(|value| Mode::parse(&value))
            .unwrap_or(Mode::Arithmetic);

        let seed = non_empty("TUTOR_SEED").and_then(|value| value.trim().parse::<u64>().ok());

        Self {
            log_level,
            file_logs,
            log_dir: non_empty("TUTOR_LOG_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_DIR)),
            log_file: non_empty("TUTOR_LOG_FILE").unwrap_or_else(|| DEFAULT_LOG_FILE.to_string()),
            mode,
            lists_path: non_empty("TUTOR_LISTS_PATH").map(PathBuf::from),
            history_path: non_empty("TUTOR_HISTORY_PATH").map(PathBuf::from),
            tutor_config_path: non_empty("TUTOR_CONFIG_PATH").map(PathBuf::from),
            seed,
        }
    }
}
