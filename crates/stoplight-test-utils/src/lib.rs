//! Test utilities and mock policies for Stoplight development.
//!
//! Provides [`ScriptedPolicy`], a deterministic [`CyclePolicy`] that
//! replays a fixed list of durations, plus fast configurations that keep
//! timing tests in the tens of milliseconds.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use stoplight_core::Phase;
use stoplight_engine::{CycleConfig, CyclePolicy, PhaseCycler};

/// Lower bound of [`fast_config`], in milliseconds.
pub const FAST_MIN_MS: u64 = 40;
/// Upper bound (exclusive) of [`fast_config`], in milliseconds.
pub const FAST_MAX_MS: u64 = 60;

/// Scheduler allowance added to upper bounds in timing assertions.
///
/// Covers one poll quantum plus wake-up latency on loaded CI runners.
pub const TIMING_SLACK: Duration = Duration::from_millis(50);

/// A config cycling every 40-60 ms with a fixed seed.
pub fn fast_config() -> CycleConfig {
    CycleConfig {
        seed: Some(42),
        ..CycleConfig::with_range(
            Duration::from_millis(FAST_MIN_MS),
            Duration::from_millis(FAST_MAX_MS),
        )
    }
}

/// A started cycler on [`fast_config`].
pub fn started_fast_cycler() -> PhaseCycler {
    let cycler = PhaseCycler::new(fast_config()).expect("fast config is valid");
    cycler.start().expect("fresh cycler starts");
    cycler
}

/// Policy that replays `durations` in order, wrapping around at the end.
///
/// The shared draw counter lets a test observe how many cycles the loop
/// has scheduled, even after the policy has moved onto the cycle thread.
pub struct ScriptedPolicy {
    durations: Vec<Duration>,
    draws: Arc<AtomicUsize>,
}

impl ScriptedPolicy {
    /// # Panics
    ///
    /// Panics if `durations` is empty.
    pub fn new(durations: Vec<Duration>) -> Self {
        assert!(!durations.is_empty(), "ScriptedPolicy needs at least one duration");
        Self {
            durations,
            draws: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Convenience constructor from milliseconds.
    pub fn from_millis(ms: &[u64]) -> Self {
        Self::new(ms.iter().copied().map(Duration::from_millis).collect())
    }

    /// Handle to the number of durations drawn so far.
    pub fn draw_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.draws)
    }
}

impl CyclePolicy for ScriptedPolicy {
    fn name(&self) -> &str {
        "scripted"
    }

    fn next_cycle_duration(&mut self) -> Duration {
        let i = self.draws.fetch_add(1, Ordering::Relaxed);
        self.durations[i % self.durations.len()]
    }
}

/// Consume `n` transitions, failing if any takes longer than `per_transition`.
pub fn collect_transitions(
    cycler: &PhaseCycler,
    n: usize,
    per_transition: Duration,
) -> Vec<Phase> {
    (0..n)
        .map(|i| {
            cycler
                .next_transition_timeout(per_transition)
                .unwrap_or_else(|e| panic!("transition {i} of {n}: {e}"))
        })
        .collect()
}
