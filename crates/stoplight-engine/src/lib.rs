//! Phase cycling engine for Stoplight.
//!
//! Provides [`PhaseCycler`], which runs a background thread that flips a
//! [`Phase`](stoplight_core::Phase) at randomized intervals and publishes
//! every transition through a [`BlockingQueue`](stoplight_queue::BlockingQueue).
//! Any thread may block until a given phase is reached.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod cycler;
pub(crate) mod cycle_thread;
pub mod metrics;
pub mod policy;

pub use config::{ConfigError, CycleConfig};
pub use cycler::{PhaseCycler, ShutdownReport};
pub use metrics::CycleMetrics;
pub use policy::{CyclePolicy, FixedInterval, RandomInterval};
