//! ε-approximate vertex enumeration for 2D and 3D polytopes.
//!
//! Input is an H-representation `a_i·x <= 1` (origin strictly inside) and a
//! band width ε > 0. Two enumerators consume the same preprocessed `Problem`:
//! - `cutter::IncrementalCutter` maintains a half-edge boundary mesh and cuts
//!   it with one half-space per step, keeping vertices inside the ε-band;
//! - `ddm::ReferenceEnumerator` follows the same rules on incidence sets only
//!   and serves as an independent check (`verify`).
//!
//! API Policy
//! - The curated surface lives in `api`; module paths may move.

pub mod api;
pub mod cfg;
pub mod cutter;
pub mod ddm;
pub mod mesh;
pub mod problem;
pub mod verify;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use cfg::JitterCfg;
pub use cutter::{enumerate, CutterError, IncrementalCutter};
pub use problem::{Problem, ProblemError};

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::cfg::JitterCfg;
    pub use crate::cutter::{enumerate, IncrementalCutter, StepTimings};
    pub use crate::ddm::{ReferenceEnumerator, ReferenceOutput};
    pub use crate::mesh::{HalfEdgeMesh, PolyMesh};
    pub use crate::problem::{BasisScanLp, LpOracle, Problem};
    pub use crate::verify::{cross_check, subset_test};
    pub use nalgebra::DVector;
}
