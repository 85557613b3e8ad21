use rand::seq::SliceRandom;
use rand::Rng;

use crate::tutor::config::RecommendationConfig;
use crate::tutor::history::ItemStats;
use crate::tutor::types::{item_label, ItemStat, Mode, RecommendationPlan};

const PLAN_FOR_ITEM_EXTRAS: usize = 4;

/// Items bucketed by past performance, in stat-map order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidatePools {
    pub weak: Vec<String>,
    pub reinforce: Vec<String>,
    pub novel: Vec<String>,
}

pub struct RecommendationSelector {
    config: RecommendationConfig,
}

impl RecommendationSelector {
    pub fn new(config: RecommendationConfig) -> Self {
        Self { config }
    }

    pub fn is_weak(&self, stat: &ItemStat) -> bool {
        stat.seen >= self.config.weak_min_seen && stat.accuracy() < self.config.weak_accuracy_below
    }

    pub fn is_reinforce(&self, stat: &ItemStat, now_ms: i64) -> bool {
        let days = stat.days_since_last_seen(now_ms);
        stat.accuracy() >= self.config.reinforce_accuracy_min
            && days >= self.config.reinforce_min_days
            && days <= self.config.reinforce_max_days
    }

    /// Weak and reinforce buckets draw on every mode in `stats`; novel items
    /// come only from the target mode's pool.
    pub fn classify(
        &self,
        stats: &ItemStats,
        mode: Mode,
        pool: &[String],
        now_ms: i64,
    ) -> CandidatePools {
        let mut pools = CandidatePools::default();

        for ((_, item_id), stat) in stats {
            if self.is_weak(stat) {
                pools.weak.push(item_id.clone());
            } else if self.is_reinforce(stat, now_ms) {
                pools.reinforce.push(item_id.clone());
            }
        }

        for item_id in pool {
            let key = (mode, item_id.clone());
            if !stats.contains_key(&key) && !pools.novel.contains(item_id) {
                pools.novel.push(item_id.clone());
            }
        }

        pools
    }

    pub fn select<R: Rng + ?Sized>(
        &self,
        stats: &ItemStats,
        mode: Mode,
        pool: &[String],
        now_ms: i64,
        rng: &mut R,
    ) -> RecommendationPlan {
        let pools = self.classify(stats, mode, pool, now_ms);
        let size = self.config.plan_size;

        let mut items: Vec<String> = Vec::with_capacity(size);
        for (bucket, quota) in [
            (&pools.weak, self.config.weak_quota),
            (&pools.reinforce, self.config.reinforce_quota),
            (&pools.novel, self.config.novel_quota),
        ] {
            for item in bucket.choose_multiple(rng, quota) {
                if !items.contains(item) {
                    items.push(item.clone());
                }
            }
        }

        if items.len() < size {
            let mut padding: Vec<&String> = Vec::new();
            for item in pool {
                if !items.contains(item) && !padding.contains(&item) {
                    padding.push(item);
                }
            }
            padding.shuffle(rng);
            let missing = size - items.len();
            items.extend(padding.into_iter().take(missing).cloned());
        }
        items.truncate(size);

        tracing::debug!(
            mode = mode.as_str(),
            weak = pools.weak.len(),
            reinforce = pools.reinforce.len(),
            novel = pools.novel.len(),
            selected = items.len(),
            "recommendation composed"
        );

        RecommendationPlan {
            mode,
            items,
            rationale: self.rationale(&pools),
        }
    }

    pub fn rationale(&self, pools: &CandidatePools) -> String {
        let examples = self.config.rationale_examples;
        let mut parts = Vec::new();
        for (bucket, lead) in [
            (&pools.weak, "you had trouble lately with"),
            (&pools.reinforce, "let's reinforce"),
            (&pools.novel, "something new"),
        ] {
            if bucket.is_empty() {
                continue;
            }
            let names = bucket
                .iter()
                .take(examples)
                .map(|item| item_label(item))
                .collect::<Vec<_>>()
                .join(", ");
            parts.push(format!("{lead}: {names}"));
        }
        parts.join("; ")
    }
}

impl Default for RecommendationSelector {
    fn default() -> Self {
        Self::new(RecommendationConfig::default())
    }
}

/// Plan that starts with `item` followed by up to four other pool items in
/// random order.
pub fn plan_for_item<R: Rng + ?Sized>(
    mode: Mode,
    item: &str,
    pool: &[String],
    rng: &mut R,
) -> RecommendationPlan {
    let mut others: Vec<&String> = pool.iter().filter(|other| *other != item).collect();
    others.shuffle(rng);
    let mut items = vec![item.to_string()];
    for other in others {
        if items.len() > PLAN_FOR_ITEM_EXTRAS {
            break;
        }
        if !items.contains(other) {
            items.push(other.clone());
        }
    }
    RecommendationPlan {
        mode,
        items,
        rationale: format!("practice {}", item_label(item)),
    }
}
