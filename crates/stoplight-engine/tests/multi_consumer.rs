//! Several consumers waiting for the same phase all get released.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use stoplight_core::{Phase, WaitError};
use stoplight_test_utils::started_fast_cycler;

const CONSUMERS: usize = 6;

#[test]
fn all_green_waiters_return() {
    let cycler = Arc::new(started_fast_cycler());
    let (tx, rx) = crossbeam_channel::unbounded();

    let handles: Vec<_> = (0..CONSUMERS)
        .map(|id| {
            let cycler = Arc::clone(&cycler);
            let tx = tx.clone();
            thread::Builder::new()
                .name(format!("consumer-{id}"))
                .spawn(move || {
                    let result = cycler.wait_for_phase_timeout(Phase::Green, Duration::from_secs(10));
                    tx.send((id, result)).unwrap();
                })
                .unwrap()
        })
        .collect();
    drop(tx);

    let mut released = vec![false; CONSUMERS];
    for _ in 0..CONSUMERS {
        let (id, result) = rx
            .recv_timeout(Duration::from_secs(15))
            .expect("a consumer never reported back");
        assert_eq!(result, Ok(()), "consumer {id}");
        released[id] = true;
    }
    assert!(released.iter().all(|&r| r));

    for h in handles {
        h.join().unwrap();
    }

    // Each waiter consumed its own Green, so at least that many Red->Green
    // transitions were published.
    assert!(cycler.metrics().transitions >= (2 * CONSUMERS - 1) as u64);
}

#[test]
fn shutdown_releases_every_waiter() {
    let cycler = Arc::new(
        stoplight_engine::PhaseCycler::new(stoplight_engine::CycleConfig::default()).unwrap(),
    );
    cycler.start().unwrap();

    let handles: Vec<_> = (0..CONSUMERS)
        .map(|_| {
            let cycler = Arc::clone(&cycler);
            thread::spawn(move || cycler.wait_for_green())
        })
        .collect();

    thread::sleep(Duration::from_millis(50));
    let report = cycler.shutdown();
    assert!(report.loop_joined);

    for h in handles {
        assert_eq!(h.join().unwrap(), Err(WaitError::ShutDown));
    }
}
