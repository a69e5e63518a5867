//! Cross-thread hand-off tests for `BlockingQueue`.
//!
//! Checks that values are neither lost nor duplicated, whether drained
//! by one consumer after the fact or by several consumers racing a live
//! producer.

use std::collections::HashSet;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use proptest::prelude::*;
use stoplight_core::TryRecvError;
use stoplight_queue::BlockingQueue;

proptest! {
    #[test]
    fn single_consumer_receives_every_value_once(values in prop::collection::vec(any::<u32>(), 0..256)) {
        let q = BlockingQueue::new();
        for &v in &values {
            q.send(v);
        }

        let mut received = Vec::with_capacity(values.len());
        for _ in 0..values.len() {
            received.push(q.receive().unwrap());
        }

        // FIFO: same values, same order, nothing left behind.
        prop_assert_eq!(received, values);
        prop_assert_eq!(q.try_receive(), Err(TryRecvError::Empty));
    }
}

#[test]
fn concurrent_consumers_partition_the_stream() {
    const ITEMS: u64 = 10_000;
    const CONSUMERS: usize = 4;

    let q: Arc<BlockingQueue<Option<u64>>> = Arc::new(BlockingQueue::new());
    let (done_tx, done_rx) = crossbeam_channel::unbounded();

    let consumers: Vec<_> = (0..CONSUMERS)
        .map(|_| {
            let q = Arc::clone(&q);
            let done_tx = done_tx.clone();
            thread::spawn(move || {
                let mut seen = Vec::new();
                // `None` is the per-consumer stop marker.
                while let Some(v) = q.receive().unwrap() {
                    seen.push(v);
                }
                done_tx.send(seen).unwrap();
            })
        })
        .collect();
    drop(done_tx);

    let producer_q = Arc::clone(&q);
    let producer = thread::spawn(move || {
        for i in 0..ITEMS {
            producer_q.send(Some(i));
        }
        for _ in 0..CONSUMERS {
            producer_q.send(None);
        }
    });

    let mut all = HashSet::new();
    let mut total = 0usize;
    for _ in 0..CONSUMERS {
        let seen = done_rx
            .recv_timeout(Duration::from_secs(10))
            .expect("consumer did not finish within 10s");
        // Each consumer observes a strictly increasing subsequence.
        assert!(seen.windows(2).all(|w| w[0] < w[1]));
        total += seen.len();
        all.extend(seen);
    }

    producer.join().unwrap();
    for c in consumers {
        c.join().unwrap();
    }

    assert_eq!(total, ITEMS as usize, "a value was duplicated or dropped");
    assert_eq!(all.len(), ITEMS as usize);
}

#[test]
fn each_send_releases_one_waiter() {
    let q: Arc<BlockingQueue<u32>> = Arc::new(BlockingQueue::new());
    let (tx, rx) = crossbeam_channel::unbounded();

    let waiters: Vec<_> = (0..3)
        .map(|_| {
            let q = Arc::clone(&q);
            let tx = tx.clone();
            thread::spawn(move || {
                let v = q.receive();
                tx.send(v).unwrap();
            })
        })
        .collect();

    thread::sleep(Duration::from_millis(50));
    q.send(1);

    // Exactly one waiter returns with the value.
    assert_eq!(rx.recv_timeout(Duration::from_secs(5)), Ok(Ok(1)));
    assert!(rx.recv_timeout(Duration::from_millis(100)).is_err());

    // Release the rest.
    q.close();
    for w in waiters {
        w.join().unwrap();
    }
    assert_eq!(rx.try_iter().count(), 2);
}
