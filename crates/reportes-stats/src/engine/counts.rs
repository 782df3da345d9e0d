//! Plain counts and rankings. Every ticket participates, dated or not.

use std::collections::{BTreeMap, HashMap};

use super::TicketSet;
use crate::names;
use crate::rank::{RankedBucket, rank};

impl TicketSet {
    #[must_use]
    pub fn total(&self) -> usize {
        self.len()
    }

    /// Count per literal status string. Unknown literals get their own key.
    #[must_use]
    pub fn status_breakdown(&self) -> BTreeMap<String, u64> {
        let mut breakdown = BTreeMap::new();
        for entry in self.iter() {
            *breakdown.entry(entry.ticket.status.clone()).or_insert(0) += 1;
        }
        breakdown
    }

    /// Offices with the most tickets.
    #[must_use]
    pub fn top_offices(&self, n: usize) -> Vec<RankedBucket<String>> {
        let mut counts: HashMap<String, u64> = HashMap::new();
        for entry in self.iter() {
            *counts.entry(entry.ticket.office.clone()).or_insert(0) += 1;
        }
        rank(counts, Some(n))
    }

    /// Floors with the most tickets.
    #[must_use]
    pub fn top_floors(&self, n: usize) -> Vec<RankedBucket<i64>> {
        let mut counts: HashMap<i64, u64> = HashMap::new();
        for entry in self.iter() {
            *counts.entry(entry.ticket.floor).or_insert(0) += 1;
        }
        rank(counts, Some(n))
    }

    /// One credit per listed name per ticket with a non-empty `resolved_by`.
    #[must_use]
    pub fn credit_tally(&self) -> HashMap<String, u64> {
        tally(self.iter().map(|e| e.ticket.resolved_by.as_str()))
    }

    /// Credit tally ranked, keeping `n` names.
    #[must_use]
    pub fn top_resolvers(&self, n: usize) -> Vec<RankedBucket<String>> {
        rank(self.credit_tally(), Some(n))
    }
}

pub(crate) fn tally<'a>(fields: impl Iterator<Item = &'a str>) -> HashMap<String, u64> {
    let mut counts = HashMap::new();
    for field in fields {
        for name in names::split_names(field) {
            *counts.entry(name).or_insert(0) += 1;
        }
    }
    counts
}
