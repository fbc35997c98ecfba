//! Benchmarks for ripple-cells
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ripple_cells::{cloned, ComputedCell, DependencyTracker, ReactiveCell};

// =============================================================================
// CELL BENCHMARKS
// =============================================================================

fn bench_cell_create(c: &mut Criterion) {
    let tracker = DependencyTracker::new();
    c.bench_function("cell_create", |b| {
        b.iter(|| black_box(ReactiveCell::new(&tracker, 0i32)))
    });
}

fn bench_cell_get_untracked(c: &mut Criterion) {
    let tracker = DependencyTracker::new();
    let cell = ReactiveCell::new(&tracker, 42i32);
    c.bench_function("cell_get_untracked", |b| b.iter(|| black_box(cell.get())));
}

fn bench_cell_set_no_subscribers(c: &mut Criterion) {
    let tracker = DependencyTracker::new();
    let cell = ReactiveCell::new(&tracker, 0i32);
    c.bench_function("cell_set_no_subscribers", |b| {
        b.iter(|| cell.set(black_box(42)))
    });
}

// =============================================================================
// COMPUTED BENCHMARKS
// =============================================================================

fn bench_computed_read(c: &mut Criterion) {
    let tracker = DependencyTracker::new();
    let cell = ReactiveCell::new(&tracker, 42i32);
    let doubled = ComputedCell::new(&tracker, cloned!(cell => move || cell.get() * 2), |_| {});

    c.bench_function("computed_read", |b| b.iter(|| black_box(doubled.read())));
}

fn bench_write_triggers_recompute(c: &mut Criterion) {
    let tracker = DependencyTracker::new();
    let cell = ReactiveCell::new(&tracker, 0i32);
    let doubled = ComputedCell::new(
        &tracker,
        cloned!(cell => move || cell.get() * 2),
        |v| {
            black_box(v);
        },
    );
    let _ = doubled.read();

    let mut i = 0i32;
    c.bench_function("write_triggers_recompute", |b| {
        b.iter(|| {
            cell.set(i);
            i += 1;
        })
    });
}

fn bench_write_fan_out(c: &mut Criterion) {
    let mut group = c.benchmark_group("write_fan_out");

    for count in [10, 100, 500] {
        group.bench_with_input(BenchmarkId::new("subscribers", count), &count, |b, &count| {
            let tracker = DependencyTracker::new();
            let cell = ReactiveCell::new(&tracker, 0i32);

            let computeds: Vec<_> = (0..count)
                .map(|_| {
                    let computed = ComputedCell::new(
                        &tracker,
                        cloned!(cell => move || cell.get()),
                        |v| {
                            black_box(v);
                        },
                    );
                    let _ = computed.read();
                    computed
                })
                .collect();

            let mut i = 0i32;
            b.iter(|| {
                cell.set(i);
                i += 1;
            });

            drop(computeds);
        });
    }

    group.finish();
}

fn bench_recompute_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("recompute_chain");

    for depth in [1, 5, 10, 20] {
        group.bench_with_input(BenchmarkId::new("depth", depth), &depth, |b, &depth| {
            let tracker = DependencyTracker::new();
            let cell = ReactiveCell::new(&tracker, 1i32);

            let mut current =
                ComputedCell::new(&tracker, cloned!(cell => move || cell.get() + 1), |_| {});

            for _ in 1..depth {
                let prev = current.clone();
                current = ComputedCell::new(&tracker, move || prev.read() + 1, |_| {});
            }

            b.iter(|| {
                cell.set(black_box(1));
                black_box(current.read())
            })
        });
    }

    group.finish();
}

// =============================================================================
// STRESS TESTS
// =============================================================================

fn bench_many_cells(c: &mut Criterion) {
    let mut group = c.benchmark_group("many_cells");

    for count in [100, 1000, 10000] {
        group.bench_with_input(BenchmarkId::new("create", count), &count, |b, &count| {
            let tracker = DependencyTracker::new();
            b.iter(|| {
                let cells: Vec<_> = (0..count).map(|i| ReactiveCell::new(&tracker, i)).collect();
                black_box(cells)
            })
        });
    }

    group.finish();
}

// =============================================================================
// CRITERION SETUP
// =============================================================================

criterion_group!(
    cell_benches,
    bench_cell_create,
    bench_cell_get_untracked,
    bench_cell_set_no_subscribers,
);

criterion_group!(
    computed_benches,
    bench_computed_read,
    bench_write_triggers_recompute,
    bench_write_fan_out,
    bench_recompute_chain,
);

criterion_group!(stress_benches, bench_many_cells);

criterion_main!(cell_benches, computed_benches, stress_benches);
