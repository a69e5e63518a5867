//! Benchmark profiles and helpers for the Stoplight workspace.
//!
//! - [`hot_config`]: a cycler that transitions every few milliseconds
//! - [`ping_pong`]: round trips between two threads over two queues

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use stoplight_engine::{CycleConfig, FixedInterval, PhaseCycler};
use stoplight_queue::BlockingQueue;

/// Config for [`hot_cycler`]; only its 1 ms poll quantum matters.
pub fn hot_config() -> CycleConfig {
    CycleConfig {
        seed: Some(7),
        ..CycleConfig::with_range(Duration::from_millis(2), Duration::from_millis(3))
    }
}

/// A started cycler that transitions every `every`.
///
/// # Panics
///
/// Panics if the cycle thread cannot be spawned.
pub fn hot_cycler(every: Duration) -> PhaseCycler {
    let cycler = PhaseCycler::with_policy(hot_config(), FixedInterval(every))
        .expect("hot config is valid");
    cycler.start().expect("cycle thread spawns");
    cycler
}

/// Bounce `rounds` values between the caller and an echo thread.
///
/// Each round is one `send` and one blocking `receive` on each side.
/// Returns the sum of echoed values so the work cannot be optimized out.
pub fn ping_pong(rounds: u64) -> u64 {
    let ping = Arc::new(BlockingQueue::new());
    let pong = Arc::new(BlockingQueue::new());

    let echo = {
        let ping = Arc::clone(&ping);
        let pong = Arc::clone(&pong);
        thread::spawn(move || {
            while let Ok(v) = ping.receive() {
                pong.send(v);
            }
        })
    };

    let mut sum = 0u64;
    for i in 0..rounds {
        ping.send(i);
        sum += pong.receive().unwrap_or(0);
    }
    ping.close();
    let _ = echo.join();
    sum
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ping_pong_echoes_every_value() {
        assert_eq!(ping_pong(100), (0..100).sum::<u64>());
    }

    #[test]
    fn hot_cycler_transitions() {
        let cycler = hot_cycler(Duration::from_millis(2));
        cycler.next_transition_timeout(Duration::from_secs(2)).unwrap();
        cycler.shutdown();
    }
}
