//! User-facing [`PhaseCycler`] API and its start/shutdown lifecycle.
//!
//! ```text
//! Consumer Thread(s)                 Cycle Thread
//!     |                                  |
//!     |                                  | park_timeout(quantum)
//!     |                                  | elapsed >= target?
//!     |                                  |   lock phase
//!     |                                  |   phase = phase.toggled()
//!     |<--queue.send(phase)--------------|   queue.send(phase)
//!     | wait_for_phase(target):          |   unlock phase
//!     |   drop unclaimed backlog         |   target = policy.next()
//!     |   queue.receive() until target   |
//!     |                                  |
//!     |--current_phase()---> lock phase  |
//! ```

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use stoplight_core::{Phase, StartError, WaitError};

use crate::config::{ConfigError, CycleConfig};
use crate::cycle_thread::{CycleThreadState, Signal};
use crate::metrics::CycleMetrics;
use crate::policy::{millis, CyclePolicy, RandomInterval};

// ── ShutdownReport ───────────────────────────────────────────────

/// Report from [`PhaseCycler::shutdown`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShutdownReport {
    /// Total time spent in the shutdown sequence.
    pub total_ms: u64,
    /// Whether the cycle thread was joined without panicking.
    pub loop_joined: bool,
    /// Transitions published over the cycler's lifetime.
    pub transitions: u64,
}

// ── Lifecycle ────────────────────────────────────────────────────

enum Lifecycle {
    /// Constructed; the policy waits to be moved onto the cycle thread.
    Idle(Box<dyn CyclePolicy>),
    Running(JoinHandle<()>),
    Stopped,
}

// ── PhaseCycler ──────────────────────────────────────────────────

/// A traffic light that flips between [`Phase::Red`] and [`Phase::Green`]
/// on a background thread.
///
/// Every transition is published into an internal blocking queue;
/// [`wait_for_phase`](Self::wait_for_phase) consumes that queue until it
/// sees the requested phase. Share the cycler between threads with
/// `Arc<PhaseCycler>`.
///
/// Each published transition is delivered to exactly one waiter. Waiters
/// that all await the same phase are safe together. Waiters awaiting
/// *different* phases at the same time are not: one may consume and
/// discard the value another needed.
///
/// Transitions published while nobody is waiting stay buffered, in
/// order, for [`next_transition`](Self::next_transition). Phase waits
/// drop that backlog on entry.
pub struct PhaseCycler {
    signal: Arc<Signal>,
    shutdown_flag: Arc<AtomicBool>,
    lifecycle: Mutex<Lifecycle>,
    config: CycleConfig,
}

// Compile-time assertion: PhaseCycler must be Send + Sync.
const _: fn() = || {
    fn assert<T: Send + Sync>() {}
    assert::<PhaseCycler>();
};

impl PhaseCycler {
    /// Create a cycler whose cycle durations are drawn by
    /// [`RandomInterval`] from the config's range.
    ///
    /// Nothing runs until [`start`](Self::start).
    pub fn new(config: CycleConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let policy = RandomInterval::from_config(&config);
        Ok(Self::build(config, Box::new(policy)))
    }

    /// Create a cycler driven by a custom duration policy.
    ///
    /// The config's `min_cycle`/`max_cycle`/`seed` are still validated
    /// but only `initial_phase` and `poll_quantum` are used.
    pub fn with_policy(
        config: CycleConfig,
        policy: impl CyclePolicy,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::build(config, Box::new(policy)))
    }

    fn build(config: CycleConfig, policy: Box<dyn CyclePolicy>) -> Self {
        Self {
            signal: Arc::new(Signal::new(config.initial_phase)),
            shutdown_flag: Arc::new(AtomicBool::new(false)),
            lifecycle: Mutex::new(Lifecycle::Idle(policy)),
            config,
        }
    }

    fn lock_lifecycle(&self) -> MutexGuard<'_, Lifecycle> {
        self.lifecycle.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Spawn the cycle thread and return immediately.
    ///
    /// # Errors
    ///
    /// - [`StartError::AlreadyRunning`] if the loop was already started.
    /// - [`StartError::ShutDown`] after [`shutdown`](Self::shutdown).
    /// - [`StartError::ThreadSpawnFailed`] if the OS refused the thread.
    ///   The policy is lost with the closure, so the cycler is shut down.
    pub fn start(&self) -> Result<(), StartError> {
        let mut lifecycle = self.lock_lifecycle();
        let policy = match std::mem::replace(&mut *lifecycle, Lifecycle::Stopped) {
            Lifecycle::Idle(policy) => policy,
            Lifecycle::Running(handle) => {
                *lifecycle = Lifecycle::Running(handle);
                return Err(StartError::AlreadyRunning);
            }
            Lifecycle::Stopped => return Err(StartError::ShutDown),
        };

        let state = CycleThreadState::new(
            Arc::clone(&self.signal),
            policy,
            Arc::clone(&self.shutdown_flag),
            self.config.poll_quantum,
        );
        let spawned = thread::Builder::new()
            .name("stoplight-cycle".into())
            .spawn(move || state.run());

        match spawned {
            Ok(handle) => {
                *lifecycle = Lifecycle::Running(handle);
                Ok(())
            }
            Err(e) => {
                self.shutdown_flag.store(true, Ordering::Release);
                self.signal.queue().close();
                tracing::warn!(error = %e, "failed to spawn cycle thread");
                Err(StartError::ThreadSpawnFailed {
                    reason: e.to_string(),
                })
            }
        }
    }

    /// Whether the cycle thread is running.
    pub fn is_running(&self) -> bool {
        matches!(*self.lock_lifecycle(), Lifecycle::Running(_))
    }

    /// Current phase. Never blocks on the queue.
    ///
    /// After a wait returns phase `P`, this reports `P` or a later phase.
    pub fn current_phase(&self) -> Phase {
        self.signal.phase()
    }

    /// Snapshot of the transition metrics.
    pub fn metrics(&self) -> CycleMetrics {
        self.signal.metrics()
    }

    /// Number of published transitions not yet consumed by any waiter.
    pub fn pending_transitions(&self) -> usize {
        self.signal.queue().len()
    }

    /// The validated configuration.
    pub fn config(&self) -> &CycleConfig {
        &self.config
    }

    /// Consume the oldest unconsumed transition, blocking until one is
    /// published.
    ///
    /// # Errors
    ///
    /// [`WaitError::ShutDown`] once the cycler has shut down and every
    /// buffered transition has been consumed.
    pub fn next_transition(&self) -> Result<Phase, WaitError> {
        Ok(self.signal.queue().receive()?)
    }

    /// Like [`next_transition`](Self::next_transition), bounded by `timeout`.
    ///
    /// # Errors
    ///
    /// [`WaitError::Timeout`] if nothing was published in time,
    /// [`WaitError::ShutDown`] as for `next_transition`.
    pub fn next_transition_timeout(&self, timeout: Duration) -> Result<Phase, WaitError> {
        Ok(self.signal.queue().receive_timeout(timeout)?)
    }

    /// Block until the light transitions to `target`.
    ///
    /// Transitions published before the call and not claimed by another
    /// blocked waiter are dropped on entry, so this waits for a transition
    /// published after it was called. Calling it with the current phase
    /// waits for the *next* transition into that phase. Blocks forever if
    /// the cycler is never started and never shut down.
    ///
    /// # Errors
    ///
    /// [`WaitError::ShutDown`] if the cycler shuts down while waiting.
    pub fn wait_for_phase(&self, target: Phase) -> Result<(), WaitError> {
        self.discard_stale(target);
        loop {
            let phase = self.next_transition()?;
            if phase == target {
                self.observed(phase);
                return Ok(());
            }
        }
    }

    /// Like [`wait_for_phase`](Self::wait_for_phase), bounded by `timeout`
    /// across all the values it discards.
    ///
    /// # Errors
    ///
    /// [`WaitError::Timeout`] if `target` was not reached in time,
    /// [`WaitError::ShutDown`] as for `wait_for_phase`.
    pub fn wait_for_phase_timeout(&self, target: Phase, timeout: Duration) -> Result<(), WaitError> {
        let Some(deadline) = Instant::now().checked_add(timeout) else {
            return self.wait_for_phase(target);
        };
        self.discard_stale(target);
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            let phase = self.next_transition_timeout(remaining)?;
            if phase == target {
                self.observed(phase);
                return Ok(());
            }
        }
    }

    /// Block until the light turns green.
    pub fn wait_for_green(&self) -> Result<(), WaitError> {
        self.wait_for_phase(Phase::Green)
    }

    fn discard_stale(&self, target: Phase) {
        let (phase, dropped) = self.signal.discard_stale();
        if dropped > 0 {
            tracing::debug!(%phase, %target, dropped, "waiter dropped stale transitions");
        }
    }

    fn observed(&self, phase: Phase) {
        tracing::debug!(thread = ?thread::current().id(), %phase, "waiter observed phase");
    }

    /// Stop the cycle thread and release every blocked waiter.
    ///
    /// Sets the shutdown flag, unparks the cycle thread (so it wakes from
    /// its quantum park immediately), joins it, then closes the queue.
    /// [`next_transition`](Self::next_transition) callers drain any
    /// buffered transitions and then get [`WaitError::ShutDown`].
    /// Idempotent; a second call returns `total_ms: 0` and
    /// `loop_joined: true` with the lifetime transition count.
    pub fn shutdown(&self) -> ShutdownReport {
        let start = Instant::now();
        let prev = std::mem::replace(&mut *self.lock_lifecycle(), Lifecycle::Stopped);
        if matches!(prev, Lifecycle::Stopped) {
            return ShutdownReport {
                total_ms: 0,
                loop_joined: true,
                transitions: self.signal.metrics().transitions,
            };
        }

        self.shutdown_flag.store(true, Ordering::Release);
        let loop_joined = match prev {
            Lifecycle::Running(handle) => {
                handle.thread().unpark();
                handle.join().is_ok()
            }
            _ => true,
        };
        self.signal.queue().close();

        let report = ShutdownReport {
            total_ms: millis(start.elapsed()),
            loop_joined,
            transitions: self.signal.metrics().transitions,
        };
        tracing::info!(
            total_ms = report.total_ms,
            transitions = report.transitions,
            loop_joined,
            "cycler shut down"
        );
        report
    }
}

impl Drop for PhaseCycler {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl fmt::Debug for PhaseCycler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PhaseCycler")
            .field("phase", &self.current_phase())
            .field("running", &self.is_running())
            .field("pending", &self.pending_transitions())
            .field("config", &self.config)
            .finish()
    }
}
