//! Criterion micro-benchmarks for reads against a live `PhaseCycler`.

use std::hint::black_box;
use std::time::Duration;

use criterion::{criterion_group, criterion_main, Criterion};
use stoplight_bench::hot_cycler;

/// Benchmark: `current_phase()` while the cycle thread publishes every 2 ms.
fn bench_current_phase_under_cycling(c: &mut Criterion) {
    let cycler = hot_cycler(Duration::from_millis(2));

    c.bench_function("current_phase_under_cycling", |b| {
        b.iter(|| black_box(cycler.current_phase()));
    });

    cycler.shutdown();
}

/// Benchmark: `metrics()` snapshot while cycling.
fn bench_metrics_snapshot(c: &mut Criterion) {
    let cycler = hot_cycler(Duration::from_millis(2));

    c.bench_function("metrics_snapshot", |b| {
        b.iter(|| black_box(cycler.metrics()));
    });

    cycler.shutdown();
}

criterion_group!(benches, bench_current_phase_under_cycling, bench_metrics_snapshot);
criterion_main!(benches);
