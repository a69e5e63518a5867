//! Cycle loop and the shared signal state it publishes into.
//!
//! The cycle thread owns the [`CyclePolicy`] exclusively (moved in via
//! `thread::spawn`). It shares a [`Signal`] with the cycler: the phase
//! field and the transition queue. The phase lock is held across the
//! queue send, so the phase a consumer receives is never newer than the
//! phase `current_phase()` reports afterwards.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread;
use std::time::{Duration, Instant};

use stoplight_core::Phase;
use stoplight_queue::BlockingQueue;

use crate::metrics::CycleMetrics;
use crate::policy::{millis, CyclePolicy};

/// Phase field plus the metrics that describe how it got there.
struct PhaseState {
    phase: Phase,
    metrics: CycleMetrics,
}

/// State shared between the cycler handle and the cycle thread.
///
/// Lock order: `state` before the queue's internal lock. Only
/// [`publish`](Self::publish) takes both.
pub(crate) struct Signal {
    state: Mutex<PhaseState>,
    queue: BlockingQueue<Phase>,
}

impl Signal {
    pub fn new(initial: Phase) -> Self {
        Self {
            state: Mutex::new(PhaseState {
                phase: initial,
                metrics: CycleMetrics::default(),
            }),
            queue: BlockingQueue::new(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, PhaseState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn phase(&self) -> Phase {
        self.lock().phase
    }

    pub fn metrics(&self) -> CycleMetrics {
        self.lock().metrics.clone()
    }

    pub fn queue(&self) -> &BlockingQueue<Phase> {
        &self.queue
    }

    /// Drop buffered transitions that no blocked receiver has claimed.
    ///
    /// Runs under the phase lock, so a transition published concurrently
    /// lands after the drop and is kept. Returns the current phase and
    /// the number dropped.
    pub fn discard_stale(&self) -> (Phase, usize) {
        let state = self.lock();
        (state.phase, self.queue.discard_unclaimed())
    }

    fn set_target(&self, target: Duration) {
        self.lock().metrics.current_target = Some(target);
    }

    /// Flip the phase, record the finished cycle, and send the new phase,
    /// all inside one critical section. Returns the new phase.
    fn publish(&self, interval: Duration, next_target: Duration) -> Phase {
        let mut state = self.lock();
        let next = state.phase.toggled();
        state.phase = next;
        state.metrics.record_transition(interval);
        state.metrics.current_target = Some(next_target);
        self.queue.send(next);
        next
    }
}

/// State held by the cycle thread's main loop.
pub(crate) struct CycleThreadState {
    signal: Arc<Signal>,
    policy: Box<dyn CyclePolicy>,
    shutdown_flag: Arc<AtomicBool>,
    poll_quantum: Duration,
}

impl CycleThreadState {
    pub fn new(
        signal: Arc<Signal>,
        policy: Box<dyn CyclePolicy>,
        shutdown_flag: Arc<AtomicBool>,
        poll_quantum: Duration,
    ) -> Self {
        Self {
            signal,
            policy,
            shutdown_flag,
            poll_quantum,
        }
    }

    /// Main cycle loop. Runs until `shutdown_flag` is set.
    ///
    /// Parks for one quantum per iteration instead of sleeping, so
    /// `unpark()` from the shutdown path wakes it immediately.
    pub fn run(mut self) {
        let mut target = self.policy.next_cycle_duration();
        self.signal.set_target(target);
        let mut last_transition = Instant::now();

        tracing::info!(
            policy = self.policy.name(),
            phase = %self.signal.phase(),
            first_ms = millis(target),
            "cycle loop started"
        );

        loop {
            thread::park_timeout(self.poll_quantum);

            if self.shutdown_flag.load(Ordering::Acquire) {
                break;
            }

            let now = Instant::now();
            let interval = now.duration_since(last_transition);
            if interval < target {
                continue;
            }

            target = self.policy.next_cycle_duration();
            let phase = self.signal.publish(interval, target);
            last_transition = now;

            tracing::debug!(
                %phase,
                interval_ms = millis(interval),
                next_ms = millis(target),
                "phase transition"
            );
        }

        tracing::info!(
            transitions = self.signal.metrics().transitions,
            "cycle loop stopped"
        );
    }
}
