//! Synthetic demo samples

use std::sync::Mutex;

use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{async_trait, MetricsSource};
use crate::error::Result;
use crate::models::MetricSample;

/// Generates plausible metric values when no live system is attached.
/// Values are for demonstration only.
pub struct SyntheticSource {
    rng: Mutex<StdRng>,
}

impl SyntheticSource {
    /// Deterministic generator for reproducible runs
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    pub fn from_entropy() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    fn generate(rng: &mut StdRng) -> MetricSample {
        let timestamp = Utc::now();
        MetricSample {
            operations_rate: rng.gen_range(50_000.0..150_000.0),
            cache_hit_rate: rng.gen_range(0.75..0.95),
            total_operations: (timestamp.timestamp_millis() % 1_000_000).unsigned_abs(),
            physics_axiom_count: rng.gen_range(100..1_000),
            ai_axiom_count: rng.gen_range(200..2_000),
            reasoning_count: rng.gen_range(10..100),
            uncertainty_ack_count: rng.gen_range(0..20),
            timestamp,
        }
    }
}

#[async_trait]
impl MetricsSource for SyntheticSource {
    async fn sample(&self) -> Result<MetricSample> {
        let mut rng = self
            .rng
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        Ok(Self::generate(&mut rng))
    }

    fn name(&self) -> &'static str {
        "synthetic"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_values_within_ranges() {
        let source = SyntheticSource::seeded(7);
        for _ in 0..200 {
            let s = source.sample().await.unwrap();
            assert!((50_000.0..150_000.0).contains(&s.operations_rate));
            assert!((0.75..0.95).contains(&s.cache_hit_rate));
            assert!(s.total_operations < 1_000_000);
            assert!((100..1_000).contains(&s.physics_axiom_count));
            assert!((200..2_000).contains(&s.ai_axiom_count));
            assert!((10..100).contains(&s.reasoning_count));
            assert!(s.uncertainty_ack_count < 20);
        }
    }

    #[tokio::test]
    async fn test_same_seed_same_sequence() {
        let a = SyntheticSource::seeded(42);
        let b = SyntheticSource::seeded(42);

        for _ in 0..10 {
            let sa = a.sample().await.unwrap();
            let sb = b.sample().await.unwrap();
            assert_eq!(sa.operations_rate, sb.operations_rate);
            assert_eq!(sa.cache_hit_rate, sb.cache_hit_rate);
            assert_eq!(sa.ai_axiom_count, sb.ai_axiom_count);
        }
    }
}
