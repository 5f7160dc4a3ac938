//! Benchmarks for insertion, nearest-entry, and segment queries.

use std::hint::black_box;

use binindex::{Bins2, Bins3};
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

/// Division counts to benchmark against.
const DIVISIONS: [usize; 3] = [8, 32, 128];

/// Number of entries inserted per index.
const ENTRIES: usize = 10_000;

/// Deterministic, well-spread fractions in `[0, 1)`.
fn fraction(i: usize, step: f64) -> f64 {
    (i as f64 * step).fract()
}

/// A populated 2D index over the unit square.
fn populated_2d(ndiv: usize) -> Bins2 {
    let mut bins = Bins2::new([0.0, 0.0], [1.0, 1.0], ndiv).expect("valid box");
    for i in 0..ENTRIES {
        bins.insert([fraction(i, 0.618_034), fraction(i, 0.414_214)], i)
            .expect("in range");
    }
    bins
}

/// A populated 3D index over the unit cube.
fn populated_3d(ndiv: usize) -> Bins3 {
    let mut bins = Bins3::new([0.0; 3], [1.0; 3], ndiv).expect("valid box");
    for i in 0..ENTRIES {
        let p = [
            fraction(i, 0.618_034),
            fraction(i, 0.414_214),
            fraction(i, 0.732_051),
        ];
        bins.insert(p, i).expect("in range");
    }
    bins
}

/// Benchmark filling an index from scratch.
fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert");
    for ndiv in DIVISIONS {
        group.bench_function(BenchmarkId::new("2d", ndiv), |b| {
            b.iter(|| populated_2d(black_box(ndiv)))
        });
        group.bench_function(BenchmarkId::new("3d", ndiv), |b| {
            b.iter(|| populated_3d(black_box(ndiv)))
        });
    }
    group.finish();
}

/// Benchmark single-bin nearest lookups.
fn bench_nearest(c: &mut Criterion) {
    let mut group = c.benchmark_group("nearest");
    for ndiv in DIVISIONS {
        let bins2 = populated_2d(ndiv);
        let bins3 = populated_3d(ndiv);
        group.bench_function(BenchmarkId::new("2d", ndiv), |b| {
            b.iter(|| bins2.find_nearest(black_box([0.37, 0.81])))
        });
        group.bench_function(BenchmarkId::new("3d", ndiv), |b| {
            b.iter(|| bins3.find_nearest(black_box([0.37, 0.81, 0.52])))
        });
    }
    group.finish();
}

/// Benchmark segment proximity queries across the whole box.
fn bench_segment(c: &mut Criterion) {
    let mut group = c.benchmark_group("segment");
    for ndiv in DIVISIONS {
        let bins2 = populated_2d(ndiv);
        let bins3 = populated_3d(ndiv);
        group.bench_function(BenchmarkId::new("2d", ndiv), |b| {
            b.iter(|| {
                bins2.find_along_segment(black_box([0.0, 0.1]), black_box([1.0, 0.9]), 0.01)
            })
        });
        group.bench_function(BenchmarkId::new("3d", ndiv), |b| {
            b.iter(|| {
                bins3.find_along_segment(
                    black_box([0.0, 0.1, 0.2]),
                    black_box([1.0, 0.9, 0.8]),
                    0.01,
                )
            })
        });
    }
    group.finish();
}

#[allow(missing_docs, clippy::missing_docs_in_private_items)]
mod bench_defs {
    use super::*;
    criterion_group!(benches, bench_insert, bench_nearest, bench_segment);
}

pub use bench_defs::benches;
criterion_main!(benches);
