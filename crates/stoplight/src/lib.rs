//! Stoplight: a blocking message queue driving a background traffic-light
//! phase cycler.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all Stoplight sub-crates. For most users, adding `stoplight` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use std::time::Duration;
//! use stoplight::prelude::*;
//!
//! let config = CycleConfig::with_range(Duration::from_millis(20), Duration::from_millis(30));
//! let light = PhaseCycler::new(config).unwrap();
//! assert_eq!(light.current_phase(), Phase::Red);
//!
//! light.start().unwrap();
//! light.wait_for_phase(Phase::Green).unwrap();
//!
//! let report = light.shutdown();
//! assert!(report.transitions >= 1);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `stoplight-core` | `Phase` and error enums |
//! | [`queue`] | `stoplight-queue` | `BlockingQueue` |
//! | [`engine`] | `stoplight-engine` | `PhaseCycler`, config, policies, metrics |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types and errors (`stoplight-core`).
pub use stoplight_core as types;

/// Blocking hand-off queue (`stoplight-queue`).
///
/// [`queue::BlockingQueue`] is usable on its own for any `Send` payload.
pub use stoplight_queue as queue;

/// Phase cycling engine (`stoplight-engine`).
///
/// [`engine::PhaseCycler`] runs the background loop;
/// [`engine::CyclePolicy`] is the extension point for cycle durations.
pub use stoplight_engine as engine;

/// Common imports for typical Stoplight usage.
///
/// ```rust
/// use stoplight::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use stoplight_core::Phase;

    // Errors
    pub use stoplight_core::{RecvError, RecvTimeoutError, StartError, TryRecvError, WaitError};

    // Queue
    pub use stoplight_queue::BlockingQueue;

    // Engine
    pub use stoplight_engine::{
        ConfigError, CycleConfig, CycleMetrics, CyclePolicy, FixedInterval, PhaseCycler,
        RandomInterval, ShutdownReport,
    };
}
