//! Registry Benchmarks
//!
//! Measures the cost of admitting holders into a registry and of rejecting
//! requests against a saturated one.
//!
//! Run with: `cargo bench -p seatbook-core`

#![allow(missing_docs)] // Benchmarks don't need extensive docs
#![allow(clippy::expect_used)] // Benchmarks can use expect for setup

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use seatbook_core::registry::ReservationRegistry;

/// Fill an empty registry to capacity
fn benchmark_fill(c: &mut Criterion) {
    let mut group = c.benchmark_group("registry_fill");

    for capacity in [2_u32, 180, 850] {
        group.throughput(Throughput::Elements(u64::from(capacity)));
        group.bench_function(format!("capacity_{capacity}"), |b| {
            b.iter_batched(
                || ReservationRegistry::new(capacity).expect("non-zero capacity"),
                |mut seats| {
                    for holder in 0..capacity {
                        black_box(seats.reserve(holder));
                    }
                    seats
                },
                BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

/// Reject against a saturated registry
fn benchmark_rejection(c: &mut Criterion) {
    let mut group = c.benchmark_group("registry_rejection");
    group.throughput(Throughput::Elements(1));

    let mut seats = ReservationRegistry::new(180).expect("non-zero capacity");
    for holder in 0..180_u32 {
        seats.reserve(holder);
    }

    group.bench_function("full", |b| {
        b.iter(|| black_box(seats.reserve(black_box(999))));
    });

    group.finish();
}

criterion_group!(benches, benchmark_fill, benchmark_rejection);
criterion_main!(benches);
