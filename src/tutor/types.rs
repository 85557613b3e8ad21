use serde::{Deserialize, Serialize};

pub const MS_PER_DAY: f64 = 86_400_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Mode {
    #[serde(rename = "math")]
    Arithmetic,
    #[serde(rename = "czech")]
    Spelling,
    #[serde(rename = "english")]
    Vocabulary,
}

impl Mode {
    pub const ALL: [Mode; 3] = [Mode::Arithmetic, Mode::Spelling, Mode::Vocabulary];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Arithmetic => "math",
            Self::Spelling => "czech",
            Self::Vocabulary => "english",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "math" | "arithmetic" => Some(Self::Arithmetic),
            "czech" | "spelling" => Some(Self::Spelling),
            "english" | "vocabulary" => Some(Self::Vocabulary),
            _ => None,
        }
    }

    /// Prefix every item id of this mode carries.
    pub fn item_prefix(&self) -> &'static str {
        match self {
            Self::Arithmetic => "mult-",
            Self::Spelling => "vyj-",
            Self::Vocabulary => "en-",
        }
    }

    /// Mode named by an item id's prefix, if it has one.
    pub fn of_item(item_id: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|mode| item_id.starts_with(mode.item_prefix()))
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Arithmetic => "multiplication tables",
            Self::Spelling => "spelling words",
            Self::Vocabulary => "vocabulary",
        }
    }

    pub fn item_id(&self, key: &str) -> String {
        format!("{}{}", self.item_prefix(), key)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[derive(Default)]
pub enum DifficultyTier {
    Easier,
    #[default]
    Standard,
    Harder,
}

impl DifficultyTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Easier => "easier",
            Self::Standard => "standard",
            Self::Harder => "harder",
        }
    }
}

/// One graded answer. Handed to the event sink and never retained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerEvent {
    pub mode: Mode,
    pub item_id: String,
    pub correct: bool,
    /// Unix epoch milliseconds.
    pub timestamp: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemStat {
    pub seen: u32,
    pub ok: u32,
    pub last_seen_at: i64,
}

impl ItemStat {
    pub fn accuracy(&self) -> f64 {
        if self.seen == 0 {
            return 0.0;
        }
        f64::from(self.ok) / f64::from(self.seen)
    }

    pub fn days_since_last_seen(&self, now_ms: i64) -> f64 {
        (now_ms - self.last_seen_at) as f64 / MS_PER_DAY
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationPlan {
    pub mode: Mode,
    pub items: Vec<String>,
    pub rationale: String,
}

impl RecommendationPlan {
    pub fn new(mode: Mode, items: Vec<String>) -> Self {
        Self {
            mode,
            items,
            rationale: String::new(),
        }
    }

    /// Short headline for the plan, naming the first two items.
    pub fn mission_text(&self) -> String {
        let highlights = self
            .items
            .iter()
            .take(2)
            .map(|item| item_label(item))
            .collect::<Vec<_>>()
            .join(" and ");
        format!(
            "Today {} tasks: {} – {}.",
            self.items.len(),
            self.mode.display_name(),
            highlights
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub total_correct: u32,
    pub total: u32,
    pub xp_gained: u32,
}

/// Human-facing label for an item id: `mult-7` → `×7`, `vyj-být` → `být`, `en-cat` → `cat`.
pub fn item_label(item_id: &str) -> String {
    if let Some(rest) = item_id.strip_prefix(Mode::Arithmetic.item_prefix()) {
        return format!("×{rest}");
    }
    for mode in [Mode::Spelling, Mode::Vocabulary] {
        if let Some(rest) = item_id.strip_prefix(mode.item_prefix()) {
            return rest.to_string();
        }
    }
    item_id.to_string()
}
