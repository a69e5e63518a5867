//! Error types for the Stoplight workspace.
//!
//! Organized by subsystem: queue receive errors, cycler wait errors, and
//! cycler lifecycle errors. Configuration errors live next to the config
//! struct in `stoplight-engine`.

use std::error::Error;
use std::fmt;

// ── Queue ────────────────────────────────────────────────────────

/// Error from a blocking receive on a closed queue.
///
/// Only returned once the queue is both closed and drained; buffered items
/// are always delivered first.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecvError {
    /// The queue was closed and holds no more items.
    Closed,
}

impl fmt::Display for RecvError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Closed => write!(f, "queue closed and empty"),
        }
    }
}

impl Error for RecvError {}

/// Error from a receive with a deadline.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecvTimeoutError {
    /// No item arrived before the timeout elapsed.
    Timeout,
    /// The queue was closed and holds no more items.
    Closed,
}

impl fmt::Display for RecvTimeoutError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout => write!(f, "timed out waiting for an item"),
            Self::Closed => write!(f, "queue closed and empty"),
        }
    }
}

impl Error for RecvTimeoutError {}

impl From<RecvError> for RecvTimeoutError {
    fn from(e: RecvError) -> Self {
        match e {
            RecvError::Closed => Self::Closed,
        }
    }
}

/// Error from a non-blocking receive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TryRecvError {
    /// The queue is currently empty.
    Empty,
    /// The queue was closed and holds no more items.
    Closed,
}

impl fmt::Display for TryRecvError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "queue empty"),
            Self::Closed => write!(f, "queue closed and empty"),
        }
    }
}

impl Error for TryRecvError {}

// ── Cycler ───────────────────────────────────────────────────────

/// Error from waiting on a phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WaitError {
    /// The target phase was not observed before the timeout elapsed.
    Timeout,
    /// The cycler shut down while the caller was waiting.
    ShutDown,
}

impl fmt::Display for WaitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout => write!(f, "timed out waiting for phase"),
            Self::ShutDown => write!(f, "cycler has shut down"),
        }
    }
}

impl Error for WaitError {}

impl From<RecvError> for WaitError {
    fn from(e: RecvError) -> Self {
        match e {
            RecvError::Closed => Self::ShutDown,
        }
    }
}

impl From<RecvTimeoutError> for WaitError {
    fn from(e: RecvTimeoutError) -> Self {
        match e {
            RecvTimeoutError::Timeout => Self::Timeout,
            RecvTimeoutError::Closed => Self::ShutDown,
        }
    }
}

/// Error starting the background cycle loop.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StartError {
    /// The loop is already running; a second loop is never spawned.
    AlreadyRunning,
    /// The cycler was shut down and cannot be restarted.
    ShutDown,
    /// The OS refused to spawn the loop thread.
    ThreadSpawnFailed {
        /// Description of the spawn failure.
        reason: String,
    },
}

impl fmt::Display for StartError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AlreadyRunning => write!(f, "cycle loop already running"),
            Self::ShutDown => write!(f, "cycler has shut down"),
            Self::ThreadSpawnFailed { reason } => {
                write!(f, "cycle thread spawn failed: {reason}")
            }
        }
    }
}

impl Error for StartError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recv_errors_convert_to_wait_errors() {
        assert_eq!(WaitError::from(RecvError::Closed), WaitError::ShutDown);
        assert_eq!(
            WaitError::from(RecvTimeoutError::Timeout),
            WaitError::Timeout
        );
        assert_eq!(
            WaitError::from(RecvTimeoutError::Closed),
            WaitError::ShutDown
        );
        assert_eq!(
            RecvTimeoutError::from(RecvError::Closed),
            RecvTimeoutError::Closed
        );
    }

    #[test]
    fn display_messages() {
        assert_eq!(RecvError::Closed.to_string(), "queue closed and empty");
        assert_eq!(TryRecvError::Empty.to_string(), "queue empty");
        assert_eq!(WaitError::ShutDown.to_string(), "cycler has shut down");
        let e = StartError::ThreadSpawnFailed {
            reason: "out of threads".into(),
        };
        assert_eq!(e.to_string(), "cycle thread spawn failed: out of threads");
    }
}
