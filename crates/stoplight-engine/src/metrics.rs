//! Transition metrics for the phase cycler.
//!
//! [`CycleMetrics`] is updated by the cycle thread inside the same
//! critical section that publishes a transition, so a snapshot read via
//! [`PhaseCycler::metrics`](crate::PhaseCycler::metrics) always agrees
//! with the phase read alongside it.

use std::time::Duration;

/// Cumulative transition counters and interval extremes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CycleMetrics {
    /// Number of phase transitions published.
    pub transitions: u64,
    /// Measured time between the two most recent transitions (or between
    /// loop start and the first transition).
    pub last_interval: Option<Duration>,
    /// Shortest measured interval so far.
    pub shortest_interval: Option<Duration>,
    /// Longest measured interval so far.
    pub longest_interval: Option<Duration>,
    /// Target duration drawn from the policy for the cycle in progress.
    pub current_target: Option<Duration>,
}

impl CycleMetrics {
    /// Record a published transition that ended a cycle of `interval`.
    pub(crate) fn record_transition(&mut self, interval: Duration) {
        self.transitions += 1;
        self.last_interval = Some(interval);
        self.shortest_interval = Some(self.shortest_interval.map_or(interval, |s| s.min(interval)));
        self.longest_interval = Some(self.longest_interval.map_or(interval, |l| l.max(interval)));
    }
}
