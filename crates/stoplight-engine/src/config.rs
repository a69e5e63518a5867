//! Cycler configuration, validation, and error types.
//!
//! [`CycleConfig`] is the input for constructing a
//! [`PhaseCycler`](crate::PhaseCycler). [`validate()`](CycleConfig::validate)
//! checks its invariants before any thread or RNG is created.

use std::error::Error;
use std::fmt;
use std::time::Duration;

use stoplight_core::Phase;

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected during [`CycleConfig::validate()`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// `min_cycle` is zero.
    ZeroCycle,
    /// `max_cycle` is not strictly greater than `min_cycle`.
    InvertedRange {
        /// Configured lower bound.
        min: Duration,
        /// Configured upper bound.
        max: Duration,
    },
    /// `poll_quantum` is zero or not shorter than `min_cycle`.
    InvalidQuantum {
        /// Configured quantum.
        quantum: Duration,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroCycle => write!(f, "min_cycle must be non-zero"),
            Self::InvertedRange { min, max } => {
                write!(f, "max_cycle {max:?} must exceed min_cycle {min:?}")
            }
            Self::InvalidQuantum { quantum } => {
                write!(
                    f,
                    "poll_quantum {quantum:?} must be non-zero and shorter than min_cycle"
                )
            }
        }
    }
}

impl Error for ConfigError {}

// ── CycleConfig ────────────────────────────────────────────────────

/// Configuration for a [`PhaseCycler`](crate::PhaseCycler).
///
/// Each cycle lasts a duration drawn uniformly from
/// `[min_cycle, max_cycle)`. The background loop wakes every
/// `poll_quantum` to check whether the current cycle has elapsed, so a
/// transition lands at most one quantum (plus scheduler latency) after
/// its target.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CycleConfig {
    /// Phase before the first transition. Default: `Red`.
    pub initial_phase: Phase,
    /// Shortest cycle duration (inclusive). Default: 4000 ms.
    pub min_cycle: Duration,
    /// Longest cycle duration (exclusive). Default: 6000 ms.
    pub max_cycle: Duration,
    /// Sleep between loop iterations. Default: 1 ms.
    pub poll_quantum: Duration,
    /// RNG seed for reproducible cycle durations. `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for CycleConfig {
    fn default() -> Self {
        Self {
            initial_phase: Phase::Red,
            min_cycle: Duration::from_millis(4000),
            max_cycle: Duration::from_millis(6000),
            poll_quantum: Duration::from_millis(1),
            seed: None,
        }
    }
}

impl CycleConfig {
    /// Default configuration with a custom cycle range.
    pub fn with_range(min_cycle: Duration, max_cycle: Duration) -> Self {
        Self {
            min_cycle,
            max_cycle,
            ..Self::default()
        }
    }

    /// Validate all invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        // 1. Cycles must take time.
        if self.min_cycle.is_zero() {
            return Err(ConfigError::ZeroCycle);
        }
        // 2. Non-empty half-open range.
        if self.max_cycle <= self.min_cycle {
            return Err(ConfigError::InvertedRange {
                min: self.min_cycle,
                max: self.max_cycle,
            });
        }
        // 3. Quantum must be finer than the shortest cycle.
        if self.poll_quantum.is_zero() || self.poll_quantum >= self.min_cycle {
            return Err(ConfigError::InvalidQuantum {
                quantum: self.poll_quantum,
            });
        }
        Ok(())
    }
}
