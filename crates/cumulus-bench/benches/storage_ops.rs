//! Criterion benchmarks for `StepStorage` save and load paths.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use cumulus_core::{Grid, Step};
use cumulus_test_utils::{ramp, temp_storage};

fn bench_save_snapshot(c: &mut Criterion) {
    let grid = Grid::new(75, 75).unwrap();
    let mut storage = temp_storage(grid);
    let array = ramp(grid, 0.0);
    let mut step = 0u64;

    c.bench_function("save_snapshot_75x75", |b| {
        b.iter(|| {
            storage.save(&array, Step(step), "qc").unwrap();
            step += 1;
        });
    });
}

fn bench_append_series_90(c: &mut Criterion) {
    let mut storage = temp_storage(Grid::new(2, 2).unwrap());
    for i in 0..90u64 {
        storage.save(i as f64, Step(i), "surf_precip").unwrap();
    }

    // Every iteration rewrites the 91-element series in place.
    c.bench_function("append_series_at_90", |b| {
        b.iter(|| {
            storage.save(0.0, Step(90), "surf_precip").unwrap();
            black_box(());
        });
    });
}

fn bench_load_snapshot(c: &mut Criterion) {
    let grid = Grid::new(75, 75).unwrap();
    let mut storage = temp_storage(grid);
    storage.save(&ramp(grid, 0.0), Step(0), "qc").unwrap();

    c.bench_function("load_snapshot_75x75", |b| {
        b.iter(|| {
            let a = storage.load("qc", Some(Step(0))).unwrap();
            black_box(&a);
        });
    });
}

criterion_group!(
    benches,
    bench_save_snapshot,
    bench_append_series_90,
    bench_load_snapshot
);
criterion_main!(benches);
