//! Frequency tables: outcome → observed count
//!
//! Built in one pass over an ensemble's final values or a text's letters.
//! Outcomes are kept in a `BTreeMap`, so iteration is always in ascending
//! outcome order, which is the order the KS statistic needs.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::probability::DiscreteDistribution;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrequencyTable<K: Ord> {
    counts: BTreeMap<K, u64>,
    total: u64,
}

impl<K: Ord> Default for FrequencyTable<K> {
    fn default() -> Self {
        Self {
            counts: BTreeMap::new(),
            total: 0,
        }
    }
}

impl<K: Ord + Copy> FrequencyTable<K> {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn record(&mut self, outcome: K) {
        *self.counts.entry(outcome).or_insert(0) += 1;
        self.total += 1;
    }

    /// Observed count, zero for unseen outcomes.
    #[inline]
    pub fn count(&self, outcome: K) -> u64 {
        self.counts.get(&outcome).copied().unwrap_or(0)
    }

    #[inline]
    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Distinct observed outcomes, ascending.
    pub fn outcomes(&self) -> Vec<K> {
        self.counts.keys().copied().collect()
    }

    /// `(outcome, count)` pairs, ascending by outcome.
    pub fn iter(&self) -> impl Iterator<Item = (K, u64)> + '_ {
        self.counts.iter().map(|(&k, &c)| (k, c))
    }

    /// Observed share of `outcome`; zero for an empty table.
    pub fn proportion(&self, outcome: K) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.count(outcome) as f64 / self.total as f64
        }
    }

    pub fn min_outcome(&self) -> Option<K> {
        self.counts.keys().next().copied()
    }

    pub fn max_outcome(&self) -> Option<K> {
        self.counts.keys().next_back().copied()
    }
}

impl<K: Ord + Copy> FromIterator<K> for FrequencyTable<K> {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        let mut table = Self::new();
        for k in iter {
            table.record(k);
        }
        table
    }
}

/// Theoretical probability of each listed outcome.
pub fn tabulate<D, I>(dist: &D, outcomes: I) -> BTreeMap<i64, f64>
where
    D: DiscreteDistribution + ?Sized,
    I: IntoIterator<Item = i64>,
{
    outcomes.into_iter().map(|k| (k, dist.pmf(k))).collect()
}
