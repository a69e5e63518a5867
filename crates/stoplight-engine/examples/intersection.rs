//! Stoplight intersection: vehicles queue at one light and cross on green.
//!
//! Demonstrates:
//!   1. Building a `CycleConfig` and a `PhaseCycler`
//!   2. Starting the cycle thread once
//!   3. Polling `current_phase()` for display
//!   4. Blocking vehicle threads in `wait_for_green()`
//!   5. Shutting down and reading the report
//!
//! Run with:
//!   STOPLIGHT_LOG=debug cargo run --example intersection

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use stoplight_core::Phase;
use stoplight_engine::{CycleConfig, PhaseCycler};
use tracing_subscriber::EnvFilter;

// ─── Scenario parameters ────────────────────────────────────────

const VEHICLES: usize = 5;
const MIN_CYCLE_MS: u64 = 400;
const MAX_CYCLE_MS: u64 = 600;
const ARRIVAL_GAP_MS: u64 = 150;

fn init_logging() {
    let filter = EnvFilter::try_from_env("STOPLIGHT_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_thread_names(true)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() {
    init_logging();

    // ─── 1. Light ───────────────────────────────────────────────

    let config = CycleConfig::with_range(
        Duration::from_millis(MIN_CYCLE_MS),
        Duration::from_millis(MAX_CYCLE_MS),
    );
    let light = match PhaseCycler::new(config) {
        Ok(light) => Arc::new(light),
        Err(e) => {
            eprintln!("invalid light config: {e}");
            std::process::exit(1);
        }
    };

    // ─── 2. Start ───────────────────────────────────────────────

    if let Err(e) = light.start() {
        eprintln!("light failed to start: {e}");
        std::process::exit(1);
    }
    println!("light starts {}", light.current_phase());

    // ─── 3/4. Vehicles ──────────────────────────────────────────

    let vehicles: Vec<_> = (0..VEHICLES)
        .map(|id| {
            let light = Arc::clone(&light);
            thread::Builder::new()
                .name(format!("vehicle-{id}"))
                .spawn(move || {
                    thread::sleep(Duration::from_millis(ARRIVAL_GAP_MS * id as u64));
                    let seen = light.current_phase();
                    println!("vehicle {id} arrives, light is {seen}");
                    match light.wait_for_phase_timeout(Phase::Green, Duration::from_secs(10)) {
                        Ok(()) => println!("vehicle {id} crosses"),
                        Err(e) => println!("vehicle {id} gives up: {e}"),
                    }
                })
        })
        .collect::<Result<_, _>>()
        .unwrap_or_else(|e| {
            eprintln!("failed to spawn vehicle thread: {e}");
            std::process::exit(1);
        });

    for v in vehicles {
        let name = v.thread().name().unwrap_or("vehicle").to_owned();
        if v.join().is_err() {
            eprintln!("{name} panicked");
        }
    }

    // ─── 5. Shutdown ────────────────────────────────────────────

    let metrics = light.metrics();
    let report = light.shutdown();
    println!(
        "light ran {} transitions (shortest {:?}, longest {:?}), shutdown took {}ms",
        report.transitions, metrics.shortest_interval, metrics.longest_interval, report.total_ms
    );
}
