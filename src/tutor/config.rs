use std::path::Path;

use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("config read failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("config parse failed: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RecommendationConfig {
    pub history_window: usize,
    pub weak_min_seen: u32,
    pub weak_accuracy_below: f64,
    pub reinforce_accuracy_min: f64,
    pub reinforce_min_days: f64,
    pub reinforce_max_days: f64,
    pub weak_quota: usize,
    pub reinforce_quota: usize,
    pub novel_quota: usize,
    pub plan_size: usize,
    pub rationale_examples: usize,
}

impl Default for RecommendationConfig {
    fn default() -> Self {
        Self {
            history_window: 200,
            weak_min_seen: 3,
            weak_accuracy_below: 0.6,
            reinforce_accuracy_min: 0.7,
            reinforce_min_days: 2.0,
            reinforce_max_days: 5.0,
            weak_quota: 2,
            reinforce_quota: 2,
            novel_quota: 1,
            plan_size: 5,
            rationale_examples: 2,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionConfig {
    pub max_items: usize,
    pub adapt_every: usize,
    pub xp_base: u32,
    pub xp_per_correct: u32,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_items: 5,
            adapt_every: 2,
            xp_base: 10,
            xp_per_correct: 6,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DifficultyConfig {
    pub harder_above: f64,
    pub easier_below: f64,
}

impl Default for DifficultyConfig {
    fn default() -> Self {
        Self {
            harder_above: 0.8,
            easier_below: 0.5,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TutorConfig {
    pub recommendation: RecommendationConfig,
    pub session: SessionConfig,
    pub difficulty: DifficultyConfig,
}

impl TutorConfig {
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(val) = env_parse("TUTOR_HISTORY_WINDOW") {
            config.recommendation.history_window = val;
        }
        if let Some(val) = env_parse("TUTOR_WEAK_MIN_SEEN") {
            config.recommendation.weak_min_seen = val;
        }
        if let Some(val) = env_parse("TUTOR_WEAK_ACCURACY_BELOW") {
            config.recommendation.weak_accuracy_below = val;
        }
        if let Some(val) = env_parse("TUTOR_REINFORCE_ACCURACY_MIN") {
            config.recommendation.reinforce_accuracy_min = val;
        }
        if let Some(val) = env_parse("TUTOR_REINFORCE_MIN_DAYS") {
            config.recommendation.reinforce_min_days = val;
        }
        if let Some(val) = env_parse("TUTOR_REINFORCE_MAX_DAYS") {
            config.recommendation.reinforce_max_days = val;
        }
        if let Some(val) = env_parse("TUTOR_PLAN_SIZE") {
            config.recommendation.plan_size = val;
        }
        if let Some(val) = env_parse("TUTOR_SESSION_MAX_ITEMS") {
            config.session.max_items = val;
        }
        if let Some(val) = env_parse("TUTOR_XP_BASE") {
            config.session.xp_base = val;
        }
        if let Some(val) = env_parse("TUTOR_XP_PER_CORRECT") {
            config.session.xp_per_correct = val;
        }

        if let Err(err) = config.validate() {
            tracing::warn!(error = %err, "invalid TUTOR_* overrides, using defaults");
            return Self::default();
        }
        config
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let rec = &self.recommendation;
        if rec.plan_size == 0 {
            return Err(ConfigError::Validation("plan_size must be positive".into()));
        }
        if rec.history_window == 0 {
            return Err(ConfigError::Validation("history_window must be positive".into()));
        }
        if rec.reinforce_min_days > rec.reinforce_max_days {
            return Err(ConfigError::Validation(format!(
                "reinforce window is empty: [{}, {}]",
                rec.reinforce_min_days, rec.reinforce_max_days
            )));
        }
        for (name, value) in [
            ("weak_accuracy_below", rec.weak_accuracy_below),
            ("reinforce_accuracy_min", rec.reinforce_accuracy_min),
            ("harder_above", self.difficulty.harder_above),
            ("easier_below", self.difficulty.easier_below),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::Validation(format!("{name} out of [0, 1]: {value}")));
            }
        }
        if self.difficulty.easier_below > self.difficulty.harder_above {
            return Err(ConfigError::Validation(
                "easier_below must not exceed harder_above".into(),
            ));
        }
        if self.session.max_items == 0 || self.session.adapt_every == 0 {
            return Err(ConfigError::Validation(
                "max_items and adapt_every must be positive".into(),
            ));
        }
        Ok(())
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|value| value.trim().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = TutorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.recommendation.plan_size, 5);
        assert_eq!(config.session.xp_base, 10);
        assert_eq!(config.session.xp_per_correct, 6);
    }

    #[test]
    fn test_empty_reinforce_window_rejected() {
        let mut config = TutorConfig::default();
        config.recommendation.reinforce_min_days = 6.0;
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: TutorConfig =
            serde_json::from_str(r#"{"session":{"xpBase":20}}"#).unwrap();
        assert_eq!(config.session.xp_base, 20);
        assert_eq!(config.session.xp_per_correct, 6);
        assert_eq!(config.recommendation.weak_min_seen, 3);
    }

    #[test]
    fn test_from_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tutor.json");
        std::fs::write(&path, r#"{"difficulty":{"harderAbove":0.9}}"#).unwrap();
        let config = TutorConfig::from_json_file(&path).unwrap();
        assert!((config.difficulty.harder_above - 0.9).abs() < 1e-9);

        std::fs::write(&path, r#"{"difficulty":{"harderAbove":0.1}}"#).unwrap();
        assert!(TutorConfig::from_json_file(&path).is_err());
    }
}
