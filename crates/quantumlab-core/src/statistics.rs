//! Running outcome statistics.
//!
//! [`StatisticsAggregator`] counts categorical outcomes over repeated trials
//! and reports empirical frequencies. State persists across calls until
//! [`StatisticsAggregator::reset`] is called; nothing resets it implicitly.

use std::collections::HashMap;
use std::hash::Hash;

use serde::Serialize;

/// Counts per category plus the running total.
#[derive(Debug, Clone)]
pub struct StatisticsAggregator<K> {
    counts: HashMap<K, u64>,
    /// Categories in first-seen order, for stable reporting.
    order: Vec<K>,
    total: u64,
}

impl<K> Default for StatisticsAggregator<K> {
    fn default() -> Self {
        Self {
            counts: HashMap::new(),
            order: Vec::new(),
            total: 0,
        }
    }
}

impl<K: Eq + Hash + Copy> StatisticsAggregator<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one occurrence of `category`.
    pub fn record(&mut self, category: K) {
        self.record_n(category, 1);
    }

    /// Count `n` occurrences of `category`. Count and total move together.
    pub fn record_n(&mut self, category: K, n: u64) {
        if n == 0 {
            return;
        }
        match self.counts.get_mut(&category) {
            Some(count) => *count += n,
            None => {
                self.counts.insert(category, n);
                self.order.push(category);
            }
        }
        self.total += n;
    }

    pub fn count(&self, category: K) -> u64 {
        self.counts.get(&category).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    /// `count / total`, or `None` before anything was recorded.
    pub fn frequency(&self, category: K) -> Option<f64> {
        if self.total == 0 {
            return None;
        }
        Some(self.count(category) as f64 / self.total as f64)
    }

    /// Frequency scaled to 0–100.
    pub fn percentage(&self, category: K) -> Option<f64> {
        self.frequency(category).map(|f| f * 100.0)
    }

    /// Binomial standard error `sqrt(f(1−f)/n)` of the frequency estimate.
    pub fn standard_error(&self, category: K) -> Option<f64> {
        let f = self.frequency(category)?;
        Some((f * (1.0 - f) / self.total as f64).sqrt())
    }

    /// Categories in the order they were first recorded.
    pub fn categories(&self) -> &[K] {
        &self.order
    }

    /// Clear every count and the total.
    pub fn reset(&mut self) {
        self.counts.clear();
        self.order.clear();
        self.total = 0;
    }

    pub fn snapshot(&self) -> StatisticsSnapshot<K> {
        let entries = self
            .order
            .iter()
            .map(|&category| {
                let count = self.count(category);
                CategoryCount {
                    category,
                    count,
                    frequency: count as f64 / self.total as f64,
                }
            })
            .collect();
        StatisticsSnapshot {
            total: self.total,
            entries,
        }
    }
}

impl<K: Eq + Hash + Copy> Extend<K> for StatisticsAggregator<K> {
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for category in iter {
            self.record(category);
        }
    }
}

/// One row of a [`StatisticsSnapshot`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryCount<K> {
    pub category: K,
    pub count: u64,
    pub frequency: f64,
}

/// Immutable copy of the counters at one point in time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatisticsSnapshot<K> {
    pub total: u64,
    pub entries: Vec<CategoryCount<K>>,
}

impl<K: PartialEq> StatisticsSnapshot<K> {
    pub fn frequency(&self, category: &K) -> Option<f64> {
        if self.total == 0 {
            return None;
        }
        Some(
            self.entries
                .iter()
                .find(|e| &e.category == category)
                .map_or(0.0, |e| e.frequency),
        )
    }
}
