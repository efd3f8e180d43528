//! Reproducible random inputs: centrally symmetric random half-spaces.
//!
//! Every direction `d` (uniform on the sphere) with radius `r` contributes the
//! pair of rows `±d / r`, so any sample with at least `dim` independent
//! directions is bounded and contains the origin.

use std::fmt;

use nalgebra::DVector;
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

#[derive(Debug, Clone, PartialEq)]
pub enum SampleError {
    InvalidParams { reason: String },
}

impl fmt::Display for SampleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidParams { reason } => write!(f, "invalid sampler params: {reason}"),
        }
    }
}

impl std::error::Error for SampleError {}

#[derive(Clone, Debug, PartialEq)]
pub struct SymmetricRowsParams {
    pub dim: usize,
    pub directions: usize,
    pub radius_min: f64,
    pub radius_max: f64,
}

impl SymmetricRowsParams {
    fn validate(&self) -> Result<(), SampleError> {
        let invalid = |reason: &str| {
            Err(SampleError::InvalidParams {
                reason: reason.to_owned(),
            })
        };
        if !(2..=3).contains(&self.dim) {
            return invalid("dim must be 2 or 3");
        }
        if self.directions < self.dim {
            return invalid("need at least `dim` directions");
        }
        if !(self.radius_min.is_finite() && self.radius_max.is_finite()) {
            return invalid("radius bounds must be finite");
        }
        if self.radius_min <= 0.0 || self.radius_min > self.radius_max {
            return invalid("0 < radius_min <= radius_max required");
        }
        Ok(())
    }
}

impl Default for SymmetricRowsParams {
    fn default() -> Self {
        Self {
            dim: 3,
            directions: 10,
            radius_min: 0.8,
            radius_max: 1.2,
        }
    }
}

/// Rows for one seed.
pub fn symmetric_rows(
    params: &SymmetricRowsParams,
    seed: u64,
) -> Result<Vec<DVector<f64>>, SampleError> {
    params.validate()?;
    let mut rng = StdRng::seed_from_u64(seed);
    let mut rows = Vec::with_capacity(2 * params.directions);
    for _ in 0..params.directions {
        let dir = sample_unit_vector(&mut rng, params.dim);
        let radius = if params.radius_max > params.radius_min {
            rng.gen_range(params.radius_min..params.radius_max)
        } else {
            params.radius_min
        };
        let row = dir / radius;
        rows.push(row.clone());
        rows.push(-row);
    }
    Ok(rows)
}

/// Stream of samples; each carries the seed that regenerates it.
pub struct SymmetricRowsSampler {
    params: SymmetricRowsParams,
    master: StdRng,
}

impl SymmetricRowsSampler {
    pub fn new(params: SymmetricRowsParams, seed: u64) -> Result<Self, SampleError> {
        params.validate()?;
        Ok(Self {
            params,
            master: StdRng::seed_from_u64(seed),
        })
    }

    pub fn params(&self) -> &SymmetricRowsParams {
        &self.params
    }

    /// Next `(seed, rows)` pair.
    pub fn next_sample(&mut self) -> Result<(u64, Vec<DVector<f64>>), SampleError> {
        let seed = self.master.next_u64();
        Ok((seed, symmetric_rows(&self.params, seed)?))
    }
}

fn sample_unit_vector(rng: &mut StdRng, dim: usize) -> DVector<f64> {
    loop {
        let v = DVector::from_fn(dim, |_, _| rng.gen_range(-1.0..=1.0));
        let norm = v.norm();
        // rejection keeps the direction uniform on the sphere
        if norm > 1e-12 && norm <= 1.0 {
            return v / norm;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_come_in_symmetric_pairs() {
        let params = SymmetricRowsParams::default();
        let rows = symmetric_rows(&params, 5).unwrap();
        assert_eq!(rows.len(), 20);
        for pair in rows.chunks(2) {
            assert!((&pair[0] + &pair[1]).norm() < 1e-15);
            let r = 1.0 / pair[0].norm();
            assert!((0.8..=1.2).contains(&r));
        }
        assert_eq!(rows, symmetric_rows(&params, 5).unwrap());
    }

    #[test]
    fn sampler_replays_by_seed() {
        let params = SymmetricRowsParams {
            dim: 2,
            directions: 4,
            ..SymmetricRowsParams::default()
        };
        let mut s = SymmetricRowsSampler::new(params.clone(), 1).unwrap();
        let (seed, rows) = s.next_sample().unwrap();
        assert_eq!(rows, symmetric_rows(&params, seed).unwrap());
        assert!(rows.iter().all(|r| r.len() == 2));
    }

    #[test]
    fn invalid_params_are_rejected() {
        let bad = SymmetricRowsParams {
            directions: 2,
            ..SymmetricRowsParams::default()
        };
        assert!(matches!(
            symmetric_rows(&bad, 0),
            Err(SampleError::InvalidParams { .. })
        ));
        let bad = SymmetricRowsParams {
            radius_min: 0.0,
            ..SymmetricRowsParams::default()
        };
        assert!(SymmetricRowsSampler::new(bad, 0).is_err());
    }
}
