//! Print vertex/face counts of both enumerators on a few random polytopes.
//!
//! Usage:
//!   cargo run -p approxve --example random_polytopes -- 3
//!   cargo run -p approxve --example random_polytopes -- 2

use approxve::api::{
    cross_check, BasisScanLp, IncrementalCutter, Problem, ReferenceEnumerator,
    SymmetricRowsParams, SymmetricRowsSampler,
};

fn main() {
    let dim: usize = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(3);
    let params = SymmetricRowsParams {
        dim,
        directions: 12,
        ..SymmetricRowsParams::default()
    };
    let mut sampler = match SymmetricRowsSampler::new(params, 2025) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("usage: random_polytopes [2|3] ({e})");
            return;
        }
    };
    for i in 0..5 {
        let (seed, rows) = sampler.next_sample().unwrap();
        let p = Problem::prepare(rows, 1e-3, &BasisScanLp).unwrap();
        let mesh = IncrementalCutter::new(&p).unwrap().run().unwrap();
        let reference = ReferenceEnumerator::new(&p).unwrap().run();
        let check = cross_check(&mesh, &reference, 1e-6);
        println!(
            "sample {i} (seed {seed}): V={} F={} | nodes={} facets={} | agree={}",
            mesh.vertices.len(),
            mesh.valid_faces().count(),
            reference.nodes.len(),
            reference.facets.len(),
            check.agrees()
        );
    }
}
