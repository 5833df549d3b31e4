//! Bounded metric history
//!
//! Fixed-capacity FIFO series for each tracked metric. All series are
//! appended together on every recorded sample so they stay index-aligned,
//! and the oldest entry is evicted once a series is full.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};

use crate::models::MetricSample;

/// Number of samples retained per series
pub const HISTORY_CAPACITY: usize = 100;

/// Fixed-capacity, insertion-ordered sequence that evicts its oldest entry on overflow
#[derive(Debug, Clone)]
pub struct BoundedSeries<T> {
    items: VecDeque<T>,
    capacity: usize,
}

impl<T> BoundedSeries<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            items: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append an item, returning the evicted oldest item if the series was full
    pub fn push(&mut self, item: T) -> Option<T> {
        if self.capacity == 0 {
            return Some(item);
        }

        let evicted = if self.items.len() >= self.capacity {
            self.items.pop_front()
        } else {
            None
        };
        self.items.push_back(item);
        evicted
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn last(&self) -> Option<&T> {
        self.items.back()
    }

    /// The most recent `n` items, oldest first
    pub fn tail(&self, n: usize) -> impl Iterator<Item = &T> {
        self.items.iter().skip(self.items.len().saturating_sub(n))
    }
}

impl<T: Clone> BoundedSeries<T> {
    /// Consistent copy of the series, oldest first
    pub fn to_vec(&self) -> Vec<T> {
        self.items.iter().cloned().collect()
    }
}

impl<T> Extend<T> for BoundedSeries<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for item in iter {
            self.push(item);
        }
    }
}

/// Index-aligned history of every tracked series
#[derive(Debug, Clone)]
pub struct MetricHistory {
    pub timestamps: BoundedSeries<DateTime<Utc>>,
    pub operations_rate: BoundedSeries<f64>,
    pub cache_hit_rate: BoundedSeries<f64>,
    pub confidence_score: BoundedSeries<f64>,
    pub axiom_usage: BoundedSeries<u64>,
}

impl MetricHistory {
    pub fn new() -> Self {
        Self::with_capacity(HISTORY_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            timestamps: BoundedSeries::new(capacity),
            operations_rate: BoundedSeries::new(capacity),
            cache_hit_rate: BoundedSeries::new(capacity),
            confidence_score: BoundedSeries::new(capacity),
            axiom_usage: BoundedSeries::new(capacity),
        }
    }

    /// Record a sample into every series, deriving confidence and axiom usage
    pub fn record(&mut self, sample: &MetricSample) {
        // Derive first so every series is pushed or none is
        let confidence = sample.confidence();
        let axiom_usage = sample.axiom_usage();

        self.timestamps.push(sample.timestamp);
        self.operations_rate.push(sample.operations_rate);
        self.cache_hit_rate.push(sample.cache_hit_rate);
        self.confidence_score.push(confidence);
        self.axiom_usage.push(axiom_usage);
    }

    /// Number of retained samples
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// True when every series holds the same number of entries
    pub fn is_aligned(&self) -> bool {
        let len = self.timestamps.len();
        self.operations_rate.len() == len
            && self.cache_hit_rate.len() == len
            && self.confidence_score.len() == len
            && self.axiom_usage.len() == len
    }

    pub fn latest_timestamp(&self) -> Option<DateTime<Utc>> {
        self.timestamps.last().copied()
    }
}

impl Default for MetricHistory {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::sample_with;

    #[test]
    fn test_series_evicts_oldest() {
        let mut series = BoundedSeries::new(3);
        assert_eq!(series.push(1), None);
        assert_eq!(series.push(2), None);
        assert_eq!(series.push(3), None);
        assert_eq!(series.push(4), Some(1));
        assert_eq!(series.to_vec(), vec![2, 3, 4]);
    }

    #[test]
    fn test_series_tail() {
        let mut series = BoundedSeries::new(10);
        series.extend(0..8);
        let tail: Vec<_> = series.tail(3).copied().collect();
        assert_eq!(tail, vec![5, 6, 7]);

        let all: Vec<_> = series.tail(20).copied().collect();
        assert_eq!(all.len(), 8);
    }

    #[test]
    fn test_history_never_exceeds_capacity() {
        let mut history = MetricHistory::new();
        for i in 0..250 {
            history.record(&sample_with(i as f64, 0.8));
        }

        assert_eq!(history.len(), HISTORY_CAPACITY);
        assert!(history.is_aligned());

        // Only the most recent 100 remain, in chronological order
        let rates = history.operations_rate.to_vec();
        let expected: Vec<f64> = (150..250).map(|i| i as f64).collect();
        assert_eq!(rates, expected);
    }

    #[test]
    fn test_101st_sample_evicts_exactly_the_oldest() {
        let mut history = MetricHistory::new();
        for i in 0..100 {
            history.record(&sample_with(i as f64, 0.8));
        }
        let before = history.operations_rate.to_vec();

        history.record(&sample_with(100.0, 0.8));
        let after = history.operations_rate.to_vec();

        assert_eq!(after.len(), 100);
        assert_eq!(&after[..99], &before[1..]);
        assert_eq!(after[99], 100.0);
    }

    #[test]
    fn test_record_derives_values() {
        let mut history = MetricHistory::new();
        history.record(&sample_with(60_000.0, 0.5));

        assert!((history.confidence_score.last().copied().unwrap() - 0.6).abs() < 1e-9);
        assert_eq!(history.axiom_usage.last().copied(), Some(1_000));
        assert!(history.latest_timestamp().is_some());
    }

    #[test]
    fn test_record_with_saturated_axiom_usage_stays_aligned() {
        let mut history = MetricHistory::new();
        let mut sample = sample_with(60_000.0, 0.8);
        sample.physics_axiom_count = u64::MAX;
        sample.ai_axiom_count = 1;

        history.record(&sample_with(60_000.0, 0.8));
        history.record(&sample);

        assert_eq!(history.len(), 2);
        assert!(history.is_aligned());
        assert_eq!(history.axiom_usage.last().copied(), Some(u64::MAX));
    }
}
