use crate::tutor::config::DifficultyConfig;
use crate::tutor::types::DifficultyTier;

#[derive(Debug, Clone)]
pub struct DifficultyAdapter {
    harder_above: f64,
    easier_below: f64,
}

impl DifficultyAdapter {
    pub fn new(config: &DifficultyConfig) -> Self {
        Self {
            harder_above: config.harder_above,
            easier_below: config.easier_below,
        }
    }

    /// Tier for a rolling accuracy of `total_correct / answered`.
    pub fn adapt(&self, total_correct: u32, answered: u32) -> DifficultyTier {
        if answered == 0 {
            return DifficultyTier::Standard;
        }
        let ratio = f64::from(total_correct) / f64::from(answered);
        if ratio > self.harder_above {
            DifficultyTier::Harder
        } else if ratio < self.easier_below {
            DifficultyTier::Easier
        } else {
            DifficultyTier::Standard
        }
    }
}

impl Default for DifficultyAdapter {
    fn default() -> Self {
        Self::new(&DifficultyConfig::default())
    }
}
