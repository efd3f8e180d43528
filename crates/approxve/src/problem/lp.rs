//! Linear-program oracle used to synthesize the bounding row.
//!
//! The preprocessing only needs `min c·x  s.t.  a_k·x <= 1`, which always has
//! the origin as a feasible point. `BasisScanLp` answers that exactly in low
//! dimension by brute force:
//! - unbounded iff some extreme ray `d` of the recession cone `{A d <= 0}`
//!   has `c·d < 0` (extreme rays are generalized cross products of `n-1` rows);
//! - otherwise the optimum is attained at a basic feasible point (`n` tight rows).
//!
//! Complexity: O(C(m, n) · m). Callers cap `m` (see `cfg::LP_ROW_CAP`).

use nalgebra::DVector;

use super::util::{combinations, generalized_cross, solve_rows};
use crate::cfg::LP_FEAS_EPS;

/// Result of `min c·x s.t. a_k·x <= 1`.
#[derive(Clone, Debug, PartialEq)]
pub enum LpOutcome {
    Optimal { value: f64, point: DVector<f64> },
    Unbounded,
    Infeasible,
}

/// Black-box LP capability consumed by `Problem::prepare`.
pub trait LpOracle {
    /// Minimise `objective · x` subject to `row · x <= 1` for every row.
    fn minimize(&self, objective: &DVector<f64>, constraints: &[DVector<f64>]) -> LpOutcome;
}

/// Exact brute-force oracle for small dimension (n = 2, 3).
#[derive(Clone, Copy, Debug, Default)]
pub struct BasisScanLp;

impl LpOracle for BasisScanLp {
    fn minimize(&self, objective: &DVector<f64>, constraints: &[DVector<f64>]) -> LpOutcome {
        let n = objective.len();
        if n == 0 || constraints.iter().any(|a| a.len() != n) {
            return LpOutcome::Infeasible;
        }
        if has_descending_ray(objective, constraints) {
            return LpOutcome::Unbounded;
        }
        let idxs: Vec<usize> = (0..constraints.len()).collect();
        let ones = DVector::from_element(n, 1.0);
        let mut best: Option<(f64, DVector<f64>)> = None;
        for comb in combinations(&idxs, n) {
            let rows: Vec<&DVector<f64>> = comb.iter().map(|&k| &constraints[k]).collect();
            let Some(x) = solve_rows(&rows, &ones) else {
                continue;
            };
            let feasible = constraints
                .iter()
                .all(|a| a.dot(&x) <= 1.0 + LP_FEAS_EPS * (1.0 + a.norm() * x.norm()));
            if !feasible {
                continue;
            }
            let val = objective.dot(&x);
            if best.as_ref().map_or(true, |(v, _)| val < *v) {
                best = Some((val, x));
            }
        }
        match best {
            Some((value, point)) => LpOutcome::Optimal { value, point },
            None => LpOutcome::Infeasible,
        }
    }
}

fn has_descending_ray(objective: &DVector<f64>, constraints: &[DVector<f64>]) -> bool {
    let n = objective.len();
    if n == 1 {
        // cone is {d : a d <= 0}; rays are +1 and -1
        return [1.0, -1.0].into_iter().any(|d| {
            constraints.iter().all(|a| a[0] * d <= 0.0) && objective[0] * d < 0.0
        });
    }
    // rays of the cone only depend on row directions
    let units: Vec<DVector<f64>> = constraints
        .iter()
        .filter(|a| a.norm() > 0.0)
        .map(|a| a.normalize())
        .collect();
    let slope = LP_FEAS_EPS * objective.norm();
    let idxs: Vec<usize> = (0..units.len()).collect();
    for comb in combinations(&idxs, n - 1) {
        let rows: Vec<&DVector<f64>> = comb.iter().map(|&k| &units[k]).collect();
        let d = generalized_cross(&rows, n);
        let norm = d.norm();
        if norm <= LP_FEAS_EPS {
            continue;
        }
        let d = d / norm;
        for dir in [d.clone(), -d] {
            let in_cone = units.iter().all(|a| a.dot(&dir) <= LP_FEAS_EPS);
            if in_cone && objective.dot(&dir) < -slope {
                return true;
            }
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::dvector;

    fn cube_rows() -> Vec<DVector<f64>> {
        let mut rows = Vec::new();
        for i in 0..3 {
            let mut e = DVector::zeros(3);
            e[i] = 1.0;
            rows.push(e.clone());
            rows.push(-e);
        }
        rows
    }

    #[test]
    fn cube_minimum_at_corner() {
        let c = dvector![1.0, 1.0, 1.0];
        match BasisScanLp.minimize(&c, &cube_rows()) {
            LpOutcome::Optimal { value, point } => {
                assert!((value + 3.0).abs() < 1e-9);
                assert!((point - dvector![-1.0, -1.0, -1.0]).norm() < 1e-9);
            }
            other => panic!("expected optimum, got {other:?}"),
        }
    }

    #[test]
    fn open_box_is_unbounded_below() {
        // x <= 1, y <= 1, -y <= 1 : x can go to -inf
        let rows = vec![dvector![1.0, 0.0], dvector![0.0, 1.0], dvector![0.0, -1.0]];
        assert_eq!(
            BasisScanLp.minimize(&dvector![1.0, 0.0], &rows),
            LpOutcome::Unbounded
        );
        // but maximising x (min -x) is bounded
        match BasisScanLp.minimize(&dvector![-1.0, 0.0], &rows) {
            LpOutcome::Optimal { value, .. } => assert!((value + 1.0).abs() < 1e-9),
            other => panic!("expected optimum, got {other:?}"),
        }
    }

    #[test]
    fn large_cube_is_bounded() {
        let rows: Vec<DVector<f64>> = cube_rows().into_iter().map(|r| r * 1e-4).collect();
        match BasisScanLp.minimize(&dvector![1e-4, 1e-4, 1e-4], &rows) {
            LpOutcome::Optimal { value, point } => {
                assert!((value + 3.0).abs() < 1e-9);
                assert!((point - dvector![-1e4, -1e4, -1e4]).norm() < 1e-5);
            }
            other => panic!("expected optimum, got {other:?}"),
        }
        let open: Vec<DVector<f64>> = rows[..5].to_vec();
        assert_eq!(
            BasisScanLp.minimize(&dvector![0.0, 0.0, 1e-4], &open),
            LpOutcome::Unbounded
        );
    }
}
