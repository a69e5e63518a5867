//! Mutex/condvar blocking queue with FIFO removal.
//!
//! [`BlockingQueue`] is unbounded: [`send`](BlockingQueue::send) never
//! blocks beyond its critical section and never fails. Retrieval suspends
//! on a "non-empty or closed" predicate, so a woken receiver never sees an
//! empty buffer and spurious wakeups simply re-check.

use std::collections::VecDeque;
use std::fmt;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use stoplight_core::{RecvError, RecvTimeoutError, TryRecvError};

/// Buffer and close flag, always accessed under the queue mutex.
struct QueueState<T> {
    items: VecDeque<T>,
    closed: bool,
    /// Receivers currently parked in a blocking receive.
    waiting: usize,
}

impl<T> QueueState<T> {
    fn is_idle(&self) -> bool {
        self.items.is_empty() && !self.closed
    }
}

/// An unbounded FIFO queue whose receive operations block until an item
/// exists.
///
/// Every `send` wakes exactly one blocked receiver. Which receiver wakes
/// is unspecified. Values sent by one thread are received in the order
/// they were sent; concurrent senders are ordered by lock acquisition.
///
/// [`close`](Self::close) is the cancellation signal: it wakes every
/// receiver, and once the buffer is drained receivers get
/// [`RecvError::Closed`] instead of blocking.
pub struct BlockingQueue<T> {
    state: Mutex<QueueState<T>>,
    available: Condvar,
}

// Compile-time assertion: BlockingQueue must be Send + Sync for Send payloads.
const _: fn() = || {
    fn assert<T: Send + Sync>() {}
    assert::<BlockingQueue<stoplight_core::Phase>>();
};

impl<T> Default for BlockingQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> BlockingQueue<T> {
    /// Create an empty, open queue.
    pub fn new() -> Self {
        Self {
            state: Mutex::new(QueueState {
                items: VecDeque::new(),
                closed: false,
                waiting: 0,
            }),
            available: Condvar::new(),
        }
    }

    // No operation can leave the buffer half-updated, so a poisoned lock
    // still guards consistent state.
    fn lock(&self) -> MutexGuard<'_, QueueState<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append `value` and wake one blocked receiver.
    ///
    /// Sending to a closed queue still buffers the value; receivers drain
    /// it before reporting `Closed`.
    pub fn send(&self, value: T) {
        let mut state = self.lock();
        state.items.push_back(value);
        tracing::trace!(len = state.items.len(), "item sent");
        drop(state);
        self.available.notify_one();
    }

    /// Remove and return the oldest item, blocking until one exists.
    ///
    /// Blocks forever on an open, empty queue that never receives a send.
    ///
    /// # Errors
    ///
    /// [`RecvError::Closed`] if the queue is closed and empty.
    pub fn receive(&self) -> Result<T, RecvError> {
        let mut state = self.lock();
        state.waiting += 1;
        let mut state = self
            .available
            .wait_while(state, |s| s.is_idle())
            .unwrap_or_else(PoisonError::into_inner);
        state.waiting -= 1;
        let item = state.items.pop_front().ok_or(RecvError::Closed)?;
        tracing::trace!(len = state.items.len(), "item received");
        Ok(item)
    }

    /// Like [`receive`](Self::receive), but gives up after `timeout`.
    ///
    /// The deadline is fixed on entry; spurious wakeups do not extend it.
    ///
    /// # Errors
    ///
    /// [`RecvTimeoutError::Timeout`] if nothing arrived in time,
    /// [`RecvTimeoutError::Closed`] if the queue is closed and empty.
    pub fn receive_timeout(&self, timeout: Duration) -> Result<T, RecvTimeoutError> {
        let mut state = self.lock();
        state.waiting += 1;
        let (mut state, _) = self
            .available
            .wait_timeout_while(state, timeout, |s| s.is_idle())
            .unwrap_or_else(PoisonError::into_inner);
        state.waiting -= 1;
        match state.items.pop_front() {
            Some(item) => {
                tracing::trace!(len = state.items.len(), "item received");
                Ok(item)
            }
            None if state.closed => Err(RecvTimeoutError::Closed),
            None => Err(RecvTimeoutError::Timeout),
        }
    }

    /// Remove and return the oldest item without blocking.
    ///
    /// # Errors
    ///
    /// [`TryRecvError::Empty`] if nothing is buffered on an open queue,
    /// [`TryRecvError::Closed`] if the queue is closed and empty.
    pub fn try_receive(&self) -> Result<T, TryRecvError> {
        let mut state = self.lock();
        match state.items.pop_front() {
            Some(item) => Ok(item),
            None if state.closed => Err(TryRecvError::Closed),
            None => Err(TryRecvError::Empty),
        }
    }

    /// Drop buffered items that no blocked receiver will claim. Returns
    /// how many were dropped.
    ///
    /// Receivers parked in [`receive`](Self::receive) or
    /// [`receive_timeout`](Self::receive_timeout) take items from the
    /// front, one each, so the oldest `waiting` items are kept and the
    /// rest are dropped. With nobody waiting this empties the buffer.
    pub fn discard_unclaimed(&self) -> usize {
        let mut state = self.lock();
        let keep = state.waiting;
        let dropped = state.items.len().saturating_sub(keep);
        state.items.truncate(keep);
        if dropped > 0 {
            tracing::trace!(dropped, kept = state.items.len(), "unclaimed items dropped");
        }
        dropped
    }

    /// Close the queue and wake every blocked receiver. Idempotent.
    pub fn close(&self) {
        let mut state = self.lock();
        if state.closed {
            return;
        }
        state.closed = true;
        tracing::trace!(pending = state.items.len(), "queue closed");
        drop(state);
        self.available.notify_all();
    }

    /// Whether [`close`](Self::close) has been called.
    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    /// Number of buffered items.
    pub fn len(&self) -> usize {
        self.lock().items.len()
    }

    /// Whether the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.lock().items.is_empty()
    }
}

impl<T> fmt::Debug for BlockingQueue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.lock();
        f.debug_struct("BlockingQueue")
            .field("len", &state.items.len())
            .field("closed", &state.closed)
            .finish()
    }
}
