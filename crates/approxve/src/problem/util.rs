//! Small linear-algebra helpers shared by preprocessing and initialization.

use nalgebra::{DMatrix, DVector};

use crate::cfg::RANK_EPS;

/// k-combinations of items (lexicographic).
pub(crate) fn combinations<T: Copy>(items: &[T], k: usize) -> Vec<Vec<T>> {
    let n = items.len();
    if k > n || k == 0 {
        return Vec::new();
    }
    let mut idxs: Vec<usize> = (0..k).collect();
    let mut out = Vec::new();
    loop {
        out.push(idxs.iter().map(|&i| items[i]).collect());
        // advance the rightmost index that still has room
        let Some(i) = (0..k).rev().find(|&i| idxs[i] != i + n - k) else {
            break;
        };
        idxs[i] += 1;
        for j in i + 1..k {
            idxs[j] = idxs[j - 1] + 1;
        }
    }
    out
}

/// Stack row vectors into a dense matrix (one row per vector).
pub(crate) fn stack_rows(rows: &[&DVector<f64>], cols: usize) -> DMatrix<f64> {
    DMatrix::from_fn(rows.len(), cols, |r, c| rows[r][c])
}

/// Numerical rank of the stacked rows.
///
/// Rows are normalised first, so the rank does not depend on their scale.
pub(crate) fn rank_of(rows: &[&DVector<f64>], cols: usize) -> usize {
    let unit: Vec<DVector<f64>> = rows
        .iter()
        .filter(|r| r.norm() > 0.0)
        .map(|r| r.normalize())
        .collect();
    if unit.is_empty() {
        return 0;
    }
    let unit: Vec<&DVector<f64>> = unit.iter().collect();
    stack_rows(&unit, cols).rank(RANK_EPS)
}

/// Solve `M x = rhs` for a square system given by its rows; `None` if singular.
///
/// Singularity is judged against the Hadamard bound `Π ‖row‖`, which makes
/// the test invariant under scaling of individual rows.
pub(crate) fn solve_rows(rows: &[&DVector<f64>], rhs: &DVector<f64>) -> Option<DVector<f64>> {
    let n = rhs.len();
    if rows.len() != n {
        return None;
    }
    let m = stack_rows(rows, n);
    let bound: f64 = rows.iter().map(|r| r.norm()).product();
    let det = m.determinant().abs();
    if det.is_nan() || det <= RANK_EPS * bound {
        return None;
    }
    m.lu().solve(rhs)
}

/// Generalized cross product of `n-1` vectors in R^n (cofactor expansion).
///
/// The result is orthogonal to every input; it vanishes iff the inputs are
/// linearly dependent.
pub(crate) fn generalized_cross(rows: &[&DVector<f64>], n: usize) -> DVector<f64> {
    debug_assert_eq!(rows.len() + 1, n);
    let mut out = DVector::zeros(n);
    for col in 0..n {
        let minor = DMatrix::from_fn(n - 1, n - 1, |r, c| {
            let src = if c < col { c } else { c + 1 };
            rows[r][src]
        });
        let det = if n == 1 { 1.0 } else { minor.determinant() };
        // sign chosen so that (e1, e2) -> e3 in R^3
        let sign = if (col + n - 1) % 2 == 0 { 1.0 } else { -1.0 };
        out[col] = sign * det;
    }
    out
}
