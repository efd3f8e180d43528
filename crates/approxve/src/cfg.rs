//! Tolerances and run configuration.
//!
//! Policy
//! - Numeric tolerances that are not part of the problem statement are fixed
//!   constants (no "tolerance juggling" at call sites).
//! - The ε of the ε-band belongs to the problem (`Problem::eps`), not here.
//! - Jitter is opt-in and seeded; the default configuration is deterministic
//!   and perturbation-free.

/// Singular-value / pivot threshold for rank checks and small linear solves.
pub(crate) const RANK_EPS: f64 = 1e-10;
/// Feasibility slack for the built-in LP oracle.
pub(crate) const LP_FEAS_EPS: f64 = 1e-9;
/// Only this many leading rows enter the bounding-row LP.
pub const LP_ROW_CAP: usize = 20;
/// The reference enumerator warns once its node count exceeds this many
/// nodes per input row.
pub const NODE_GROWTH_WARN: usize = 64;

/// Sign/crossing jitter magnitudes.
///
/// Both magnitudes are fractions `k` of ε: each evaluation draws an offset
/// uniformly from `[-k·ε/2, k·ε/2]`. `k = 0` disables the perturbation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct JitterCfg {
    /// Perturbs the two classification thresholds `1` and `1+ε`.
    pub sign: f64,
    /// Perturbs the crossing level `1+ε/2` used when inserting vertices.
    pub crossing: f64,
    pub seed: u64,
}

impl Default for JitterCfg {
    fn default() -> Self {
        Self {
            sign: 0.0,
            crossing: 0.0,
            seed: 0,
        }
    }
}
