//! Core types for the Stoplight workspace.
//!
//! This is the leaf crate with zero internal dependencies. It defines the
//! [`Phase`] value carried between threads and the error types returned by
//! the blocking queue and the phase cycler.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod phase;

pub use error::{RecvError, RecvTimeoutError, StartError, TryRecvError, WaitError};
pub use phase::Phase;
