//! Optional randomized perturbation of the band limits and crossing points.
//!
//! With `k1 = sign` and `k2 = crossing`, every threshold `1 + c` becomes
//! `1 + c + k·ε·(1/2 - r)` with `r` uniform in `[0, 1)`. Zero factors leave
//! the algorithm deterministic and draw nothing.

use std::fmt;

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

use crate::cfg::JitterCfg;

pub struct Jitter {
    sign: f64,
    crossing: f64,
    rng: Box<dyn RngCore + Send>,
}

impl Jitter {
    /// Seeded `StdRng`, reproducible for a given `JitterCfg`.
    pub fn from_cfg(cfg: &JitterCfg) -> Self {
        Self::with_rng(cfg.sign, cfg.crossing, StdRng::seed_from_u64(cfg.seed))
    }

    /// Any randomness source (tests inject fixed streams).
    pub fn with_rng<R: RngCore + Send + 'static>(sign: f64, crossing: f64, rng: R) -> Self {
        Self {
            sign,
            crossing,
            rng: Box::new(rng),
        }
    }

    /// No perturbation at all.
    pub fn disabled() -> Self {
        Self::from_cfg(&JitterCfg::default())
    }

    pub fn is_disabled(&self) -> bool {
        self.sign == 0.0 && self.crossing == 0.0
    }

    #[inline]
    pub fn sign_offset(&mut self, eps: f64) -> f64 {
        offset(self.sign, eps, &mut self.rng)
    }

    #[inline]
    pub fn crossing_offset(&mut self, eps: f64) -> f64 {
        offset(self.crossing, eps, &mut self.rng)
    }
}

fn offset(k: f64, eps: f64, rng: &mut impl Rng) -> f64 {
    if k == 0.0 {
        return 0.0;
    }
    k * eps * (0.5 - rng.gen::<f64>())
}

impl Default for Jitter {
    fn default() -> Self {
        Self::disabled()
    }
}

impl fmt::Debug for Jitter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Jitter")
            .field("sign", &self.sign)
            .field("crossing", &self.crossing)
            .finish_non_exhaustive()
    }
}
