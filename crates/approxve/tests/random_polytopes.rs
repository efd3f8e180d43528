//! Structural properties of both enumerators on random symmetric polytopes.

use approxve::api::{
    cross_check, symmetric_rows, BasisScanLp, IncrementalCutter, JitterCfg, Problem,
    ReferenceEnumerator, SymmetricRowsParams,
};
use proptest::prelude::*;

fn sample(dim: usize, directions: usize, seed: u64, eps: f64) -> Problem {
    let params = SymmetricRowsParams {
        dim,
        directions,
        ..SymmetricRowsParams::default()
    };
    let rows = symmetric_rows(&params, seed).unwrap();
    Problem::prepare(rows, eps, &BasisScanLp).unwrap()
}

fn within_band(p: &Problem, x: &nalgebra::DVector<f64>) -> bool {
    p.rows().iter().all(|r| r.dot(x) <= 1.0 + p.eps() + 1e-9)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn cutter_keeps_mesh_consistent(
        dim in 2usize..=3,
        directions in 3usize..10,
        seed in any::<u64>(),
        eps in prop::sample::select(vec![0.05, 1e-3]),
    ) {
        let p = sample(dim, directions, seed, eps);
        let mut c = IncrementalCutter::new(&p).unwrap();
        while c.step().unwrap() {
            prop_assert!(c.mesh().check().is_ok());
        }
        let out = c.run().unwrap();
        prop_assert_eq!(out.components, 1);
        prop_assert!(out.valid_faces().count() >= dim + 1);
        prop_assert!(out.vertices.iter().all(|x| within_band(&p, x)));
    }

    #[test]
    fn reference_nodes_stay_within_band(
        dim in 2usize..=3,
        directions in 3usize..8,
        seed in any::<u64>(),
    ) {
        let p = sample(dim, directions, seed, 1e-2);
        let out = ReferenceEnumerator::new(&p).unwrap().run();
        prop_assert!(out.nodes.len() >= dim + 1);
        prop_assert!(out.nodes.iter().all(|x| within_band(&p, x)));
        prop_assert!(out.facets.iter().all(|f| f.nodes.len() >= dim));
    }

    #[test]
    fn enumerators_agree_for_small_eps(
        dim in 2usize..=3,
        directions in 3usize..10,
        seed in any::<u64>(),
        eps in prop::sample::select(vec![1e-3, 1e-6]),
    ) {
        let p = sample(dim, directions, seed, eps);
        let mesh = IncrementalCutter::new(&p).unwrap().run().unwrap();
        let reference = ReferenceEnumerator::new(&p).unwrap().run();
        let check = cross_check(&mesh, &reference, 1e-6);
        prop_assert!(check.agrees(), "{:?}", check);
    }

    #[test]
    fn jitter_is_reproducible(seed in any::<u64>(), jitter_seed in any::<u64>()) {
        let p = sample(3, 6, seed, 0.05);
        let cfg = JitterCfg { sign: 0.5, crossing: 0.5, seed: jitter_seed };
        let a = IncrementalCutter::with_cfg(&p, &cfg).unwrap().run().unwrap();
        let b = IncrementalCutter::with_cfg(&p, &cfg).unwrap().run().unwrap();
        prop_assert_eq!(a, b);
    }
}
