//! The one ordering used by every ranking.
//!
//! Counts sort descending. Equal counts fall back to the key: text keys
//! compare case-insensitively first and then exactly, floors numerically.
//! Because the key order is total, results never depend on hash iteration.

use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::hash::Hash;

/// One entry of a ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedBucket<K> {
    pub key: K,
    pub count: u64,
}

/// Tie-break order for ranking keys.
pub trait RankKey {
    fn rank_cmp(&self, other: &Self) -> Ordering;
}

impl RankKey for String {
    fn rank_cmp(&self, other: &Self) -> Ordering {
        self.to_lowercase()
            .cmp(&other.to_lowercase())
            .then_with(|| self.cmp(other))
    }
}

impl RankKey for i64 {
    fn rank_cmp(&self, other: &Self) -> Ordering {
        self.cmp(other)
    }
}

/// Order `counts` by count descending then key, keeping at most `top`.
#[must_use]
pub fn rank<K>(counts: HashMap<K, u64>, top: Option<usize>) -> Vec<RankedBucket<K>>
where
    K: RankKey + Eq + Hash,
{
    let mut buckets: Vec<RankedBucket<K>> = counts
        .into_iter()
        .map(|(key, count)| RankedBucket { key, count })
        .collect();
    buckets.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.key.rank_cmp(&b.key)));
    if let Some(n) = top {
        buckets.truncate(n);
    }
    buckets
}
