//! Problem instances: inequality matrix `a_i·x <= 1`, tolerance ε, dimension.
//!
//! Purpose
//! - Hold the input both enumerators consume: rows `a_i` (dimension 2 or 3)
//!   and the band width ε.
//! - Provide the preprocessing step that turns an arbitrary bounded H-rep into
//!   one whose first `dim+1` rows describe a simplex strictly containing the
//!   polytope (row reordering + a synthesized bounding row).
//!
//! Why this design
//! - The core algorithms only see a validated `Problem`; every precondition
//!   failure is reported here as a `ProblemError`, before any mesh exists.
//! - The LP needed for the bounding row is a trait (`LpOracle`) so callers can
//!   plug in a real solver; `BasisScanLp` is exact for n <= 3.
//!
//! Code cross-refs: `cutter::IncrementalCutter::new`, `ddm::ReferenceEnumerator::new`.

pub mod lp;
pub mod sample;
pub(crate) mod util;

use std::fmt;

use nalgebra::DVector;

use crate::cfg::LP_ROW_CAP;
pub use lp::{BasisScanLp, LpOracle, LpOutcome};
use util::{rank_of, solve_rows};

/// Precondition failures detected before the core algorithms run.
#[derive(Debug, Clone, PartialEq)]
pub enum ProblemError {
    Dimension { dim: usize },
    TooFewRows { rows: usize, required: usize },
    RaggedRow { row: usize, len: usize, dim: usize },
    NonFinite { row: usize },
    InvalidEps { eps: f64 },
    RankDeficient { rank: usize, dim: usize },
    Unbounded,
    Infeasible,
    SingularSimplex { corner: usize },
}

impl fmt::Display for ProblemError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dimension { dim } => write!(f, "dimension must be 2 or 3, got {dim}"),
            Self::TooFewRows { rows, required } => {
                write!(f, "matrix invalid: {rows} rows, at least {required} expected")
            }
            Self::RaggedRow { row, len, dim } => {
                write!(f, "row {row} has {len} entries, expected {dim}")
            }
            Self::NonFinite { row } => write!(f, "row {row} has a non-finite entry"),
            Self::InvalidEps { eps } => write!(f, "eps must be finite and > 0, got {eps}"),
            Self::RankDeficient { rank, dim } => {
                write!(f, "matrix invalid: rank {rank}, full rank {dim} expected")
            }
            Self::Unbounded => write!(f, "polytope is unbounded"),
            Self::Infeasible => write!(f, "bounding-row LP reported infeasibility"),
            Self::SingularSimplex { corner } => {
                write!(f, "initial simplex is singular at corner {corner}")
            }
        }
    }
}

impl std::error::Error for ProblemError {}

/// Validated inequality system `a_i·x <= 1` with band width ε.
///
/// Invariants:
/// - `dim ∈ {2, 3}`, every row has `dim` finite entries, `rows.len() >= dim+1`.
/// - `eps > 0`.
/// - Rows `0..=dim` are *assumed* to bound a simplex containing the polytope;
///   `prepare` establishes this, `new` trusts the caller.
#[derive(Clone, Debug)]
pub struct Problem {
    rows: Vec<DVector<f64>>,
    eps: f64,
    dim: usize,
}

impl Problem {
    /// Wrap an already-preprocessed matrix.
    pub fn new(rows: Vec<DVector<f64>>, eps: f64) -> Result<Self, ProblemError> {
        let dim = check_shape(&rows, eps)?;
        Ok(Self { rows, eps, dim })
    }

    /// Convenience constructor from plain nested vectors.
    pub fn from_rows(rows: &[Vec<f64>], eps: f64) -> Result<Self, ProblemError> {
        Self::new(rows.iter().map(|r| DVector::from_column_slice(r)).collect(), eps)
    }

    /// Preprocess an arbitrary bounded H-rep.
    ///
    /// Steps
    /// - check shape and full column rank;
    /// - move the lexicographically first linearly independent `dim`-tuple of
    ///   rows to the front (remaining rows keep their order);
    /// - minimise `c·x` with `c = Σ_{k<dim} a_k` over the first `LP_ROW_CAP`
    ///   rows and append the bounding row `c / (opt - 1)`;
    /// - swap the bounding row into position `dim`.
    pub fn prepare<O: LpOracle>(
        rows: Vec<DVector<f64>>,
        eps: f64,
        oracle: &O,
    ) -> Result<Self, ProblemError> {
        let dim = check_shape(&rows, eps)?;
        let all: Vec<&DVector<f64>> = rows.iter().collect();
        let rank = rank_of(&all, dim);
        if rank != dim {
            return Err(ProblemError::RankDeficient { rank, dim });
        }
        let lead = first_independent(&rows, dim).ok_or(ProblemError::RankDeficient { rank, dim })?;
        let mut ordered: Vec<DVector<f64>> = lead.iter().map(|&k| rows[k].clone()).collect();
        ordered.extend(
            rows.iter()
                .enumerate()
                .filter(|(k, _)| !lead.contains(k))
                .map(|(_, r)| r.clone()),
        );

        let objective = ordered[..dim]
            .iter()
            .fold(DVector::zeros(dim), |acc, r| acc + r);
        let cap = ordered.len().min(LP_ROW_CAP);
        let value = match oracle.minimize(&objective, &ordered[..cap]) {
            LpOutcome::Optimal { value, .. } => value,
            LpOutcome::Unbounded => return Err(ProblemError::Unbounded),
            LpOutcome::Infeasible => return Err(ProblemError::Infeasible),
        };
        // origin is feasible, so value <= 0 and the divisor is <= -1
        let bounding = objective / (value - 1.0);
        tracing::debug!(value, dim, rows = ordered.len(), "bounding row synthesized");
        ordered.push(bounding);
        let last = ordered.len() - 1;
        ordered.swap(dim, last);
        Ok(Self {
            rows: ordered,
            eps,
            dim,
        })
    }

    #[inline]
    pub fn rows(&self) -> &[DVector<f64>] {
        &self.rows
    }
    #[inline]
    pub fn row(&self, i: usize) -> &DVector<f64> {
        &self.rows[i]
    }
    #[inline]
    pub fn len(&self) -> usize {
        self.rows.len()
    }
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
    #[inline]
    pub fn eps(&self) -> f64 {
        self.eps
    }
    #[inline]
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Same rows, different band width (used by ε sweeps).
    pub fn with_eps(&self, eps: f64) -> Result<Self, ProblemError> {
        Self::new(self.rows.clone(), eps)
    }

    /// Corners of the padded initial simplex.
    ///
    /// Corner `i` solves the first `dim+1` rows without row `i`, each set to
    /// `1 + ε/2`, so the simplex strictly contains the polytope.
    pub fn simplex_corners(&self) -> Result<Vec<DVector<f64>>, ProblemError> {
        let rhs = DVector::from_element(self.dim, 1.0 + self.eps / 2.0);
        (0..=self.dim)
            .map(|i| {
                let sel: Vec<&DVector<f64>> = self.rows[..=self.dim]
                    .iter()
                    .enumerate()
                    .filter(|(k, _)| *k != i)
                    .map(|(_, r)| r)
                    .collect();
                solve_rows(&sel, &rhs).ok_or(ProblemError::SingularSimplex { corner: i })
            })
            .collect()
    }
}

fn check_shape(rows: &[DVector<f64>], eps: f64) -> Result<usize, ProblemError> {
    if !(eps.is_finite() && eps > 0.0) {
        return Err(ProblemError::InvalidEps { eps });
    }
    let dim = rows.first().map(|r| r.len()).unwrap_or(0);
    if !(2..=3).contains(&dim) {
        return Err(ProblemError::Dimension { dim });
    }
    for (k, r) in rows.iter().enumerate() {
        if r.len() != dim {
            return Err(ProblemError::RaggedRow {
                row: k,
                len: r.len(),
                dim,
            });
        }
        if r.iter().any(|x| !x.is_finite()) {
            return Err(ProblemError::NonFinite { row: k });
        }
    }
    if rows.len() < dim + 1 {
        return Err(ProblemError::TooFewRows {
            rows: rows.len(),
            required: dim + 1,
        });
    }
    Ok(dim)
}

/// Lexicographically first `dim`-tuple of linearly independent rows.
///
/// Searched as nested prefixes so rank-deficient prefixes are pruned early.
fn first_independent(rows: &[DVector<f64>], dim: usize) -> Option<Vec<usize>> {
    fn extend(rows: &[DVector<f64>], dim: usize, picked: &mut Vec<usize>) -> bool {
        if picked.len() == dim {
            return true;
        }
        let start = picked.last().map_or(0, |&k| k + 1);
        for k in start..rows.len() {
            picked.push(k);
            let sel: Vec<&DVector<f64>> = picked.iter().map(|&j| &rows[j]).collect();
            if rank_of(&sel, dim) == picked.len() && extend(rows, dim, picked) {
                return true;
            }
            picked.pop();
        }
        false
    }
    let mut picked = Vec::with_capacity(dim);
    extend(rows, dim, &mut picked).then_some(picked)
}

#[cfg(test)]
mod tests;
