//! Criterion micro-benchmarks for the `.npy` array codec.

use std::hint::black_box;
use std::io::Cursor;

use criterion::{criterion_group, criterion_main, Criterion};
use cumulus_core::{FieldArray, Grid, Precision};
use cumulus_store::codec::{decode_array, encode_array};
use cumulus_test_utils::ramp;

/// A 75x75 snapshot, the reference grid.
fn make_snapshot() -> FieldArray {
    ramp(Grid::new(75, 75).unwrap(), 0.5)
}

/// A 75x75x32 size spectrum.
fn make_spectrum() -> FieldArray {
    let values = (0..75 * 75 * 32).map(|i| i as f64 * 1e-3).collect();
    FieldArray::new(&[75, 75, 32], values).unwrap()
}

fn bench_encode_snapshot_f32(c: &mut Criterion) {
    let array = make_snapshot();

    c.bench_function("encode_snapshot_75x75_f32", |b| {
        b.iter(|| {
            let mut buf = Vec::with_capacity(32 * 1024);
            encode_array(&mut buf, &array, Precision::F32).unwrap();
            black_box(&buf);
        });
    });
}

fn bench_encode_spectrum_f64(c: &mut Criterion) {
    let array = make_spectrum();

    c.bench_function("encode_spectrum_75x75x32_f64", |b| {
        b.iter(|| {
            let mut buf = Vec::with_capacity(2 * 1024 * 1024);
            encode_array(&mut buf, &array, Precision::F64).unwrap();
            black_box(&buf);
        });
    });
}

fn bench_decode_snapshot_f32(c: &mut Criterion) {
    let array = make_snapshot();

    // Pre-encode into a buffer.
    let mut encoded = Vec::new();
    encode_array(&mut encoded, &array, Precision::F32).unwrap();

    c.bench_function("decode_snapshot_75x75_f32", |b| {
        b.iter(|| {
            let mut cursor = Cursor::new(encoded.as_slice());
            let decoded = decode_array(&mut cursor).unwrap();
            black_box(&decoded);
        });
    });
}

criterion_group!(
    benches,
    bench_encode_snapshot_f32,
    bench_encode_spectrum_f64,
    bench_decode_snapshot_f32
);
criterion_main!(benches);
