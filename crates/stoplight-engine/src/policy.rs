//! Cycle duration policies.
//!
//! A [`CyclePolicy`] decides how long each phase lasts. The cycler owns
//! the transition rule (always [`Phase::toggled`](stoplight_core::Phase::toggled));
//! the policy only supplies durations, and is moved onto the cycle thread
//! when the loop starts.

use std::time::Duration;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::config::CycleConfig;

/// Source of per-cycle durations.
///
/// Called once before the first cycle and once after every transition.
/// Implementations run on the cycle thread and may keep mutable state
/// (an RNG, a script) across calls.
pub trait CyclePolicy: Send + 'static {
    /// Human-readable name, used in log output.
    fn name(&self) -> &str;

    /// Duration of the next cycle.
    fn next_cycle_duration(&mut self) -> Duration;
}

/// Uniformly random durations in `[min, max)` at millisecond resolution.
///
/// The ChaCha8 RNG is seeded once at construction, so successive cycles
/// draw from one stream rather than from correlated per-cycle seeds. A
/// fixed seed yields an identical duration sequence.
#[derive(Debug)]
pub struct RandomInterval {
    min_ms: u64,
    max_ms: u64,
    rng: ChaCha8Rng,
}

impl RandomInterval {
    /// Build from a config's `min_cycle`, `max_cycle` and `seed`.
    ///
    /// The config is expected to have passed
    /// [`validate()`](CycleConfig::validate).
    pub fn from_config(config: &CycleConfig) -> Self {
        let seed = config.seed.unwrap_or_else(|| rand::rng().random());
        Self::with_seed(config.min_cycle, config.max_cycle, seed)
    }

    /// Build with an explicit range and seed.
    ///
    /// Sub-millisecond parts of the bounds are truncated. An empty range
    /// degenerates to always returning `min`.
    pub fn with_seed(min: Duration, max: Duration, seed: u64) -> Self {
        let min_ms = millis(min);
        Self {
            min_ms,
            max_ms: millis(max).max(min_ms),
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}

/// Whole milliseconds in `d`, saturating at `u64::MAX`.
pub(crate) fn millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

impl CyclePolicy for RandomInterval {
    fn name(&self) -> &str {
        "random_interval"
    }

    fn next_cycle_duration(&mut self) -> Duration {
        if self.max_ms <= self.min_ms {
            return Duration::from_millis(self.min_ms);
        }
        Duration::from_millis(self.rng.random_range(self.min_ms..self.max_ms))
    }
}

/// Every cycle lasts the same duration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FixedInterval(pub Duration);

impl CyclePolicy for FixedInterval {
    fn name(&self) -> &str {
        "fixed_interval"
    }

    fn next_cycle_duration(&mut self) -> Duration {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn fixed_interval_is_constant() {
        let mut p = FixedInterval(Duration::from_millis(25));
        for _ in 0..10 {
            assert_eq!(p.next_cycle_duration(), Duration::from_millis(25));
        }
        assert_eq!(p.name(), "fixed_interval");
    }

    #[test]
    fn same_seed_same_sequence() {
        let min = Duration::from_millis(4000);
        let max = Duration::from_millis(6000);
        let mut a = RandomInterval::with_seed(min, max, 42);
        let mut b = RandomInterval::with_seed(min, max, 42);
        let seq_a: Vec<_> = (0..32).map(|_| a.next_cycle_duration()).collect();
        let seq_b: Vec<_> = (0..32).map(|_| b.next_cycle_duration()).collect();
        assert_eq!(seq_a, seq_b);
    }

    #[test]
    fn durations_are_redrawn_each_cycle() {
        let mut p = RandomInterval::with_seed(
            Duration::from_millis(4000),
            Duration::from_millis(6000),
            7,
        );
        let draws: Vec<_> = (0..32).map(|_| p.next_cycle_duration()).collect();
        let first = draws[0];
        assert!(
            draws.iter().any(|&d| d != first),
            "32 draws from a 2000-value range were all {first:?}"
        );
    }

    #[test]
    fn from_config_uses_seed() {
        let config = CycleConfig {
            seed: Some(99),
            ..CycleConfig::default()
        };
        let mut a = RandomInterval::from_config(&config);
        let mut b = RandomInterval::with_seed(config.min_cycle, config.max_cycle, 99);
        for _ in 0..8 {
            assert_eq!(a.next_cycle_duration(), b.next_cycle_duration());
        }
    }

    #[test]
    fn millis_saturates() {
        assert_eq!(millis(Duration::from_millis(1500)), 1500);
        assert_eq!(millis(Duration::MAX), u64::MAX);
    }

    #[test]
    fn degenerate_range_returns_min() {
        let d = Duration::from_millis(10);
        let mut p = RandomInterval::with_seed(d, d, 1);
        assert_eq!(p.next_cycle_duration(), d);
    }

    proptest! {
        #[test]
        fn draws_stay_in_half_open_range(
            min_ms in 1u64..10_000,
            span_ms in 1u64..10_000,
            seed in any::<u64>(),
        ) {
            let min = Duration::from_millis(min_ms);
            let max = Duration::from_millis(min_ms + span_ms);
            let mut p = RandomInterval::with_seed(min, max, seed);
            for _ in 0..64 {
                let d = p.next_cycle_duration();
                prop_assert!(d >= min, "{:?} below {:?}", d, min);
                prop_assert!(d < max, "{:?} not below {:?}", d, max);
            }
        }
    }
}
