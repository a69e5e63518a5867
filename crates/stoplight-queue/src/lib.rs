//! Blocking hand-off queue for the Stoplight workspace.
//!
//! [`BlockingQueue`] moves values from a producer thread to any number of
//! consumer threads. Consumers suspend on a condition variable until an
//! item exists, so nothing polls.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod queue;

pub use queue::BlockingQueue;
