//! Criterion benchmarks for the incremental cutter.
//! Focus sizes: directions in {5, 10, 25, 50} (twice as many rows), 3D.
//! Results: by default under target/criterion; to store under data/bench, run:
//!   CARGO_TARGET_DIR=data/bench cargo bench -p approxve

use approxve::api::{symmetric_rows, BasisScanLp, IncrementalCutter, Problem, SymmetricRowsParams};
use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};

fn problem(directions: usize, eps: f64, seed: u64) -> Problem {
    let params = SymmetricRowsParams {
        directions,
        ..SymmetricRowsParams::default()
    };
    let rows = symmetric_rows(&params, seed).expect("valid params");
    Problem::prepare(rows, eps, &BasisScanLp).expect("bounded sample")
}

fn bench_cutter(c: &mut Criterion) {
    let mut group = c.benchmark_group("cutter");
    for &m in &[5usize, 10, 25, 50] {
        group.bench_with_input(BenchmarkId::new("run_eps_1e-2", m), &m, |b, &m| {
            b.iter_batched(
                || problem(m, 1e-2, 41),
                |p| {
                    let _mesh = IncrementalCutter::new(&p).unwrap().run().unwrap();
                },
                BatchSize::SmallInput,
            )
        });
        group.bench_with_input(BenchmarkId::new("run_eps_1e-6", m), &m, |b, &m| {
            b.iter_batched(
                || problem(m, 1e-6, 42),
                |p| {
                    let _mesh = IncrementalCutter::new(&p).unwrap().run().unwrap();
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, bench_cutter);
criterion_main!(benches);
