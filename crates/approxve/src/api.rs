//! Curated API surface (UNSTABLE).
//!
//! Prefer these re-exports over deep module paths; internal layout may change.

// Input and preprocessing
pub use crate::problem::sample::{symmetric_rows, SymmetricRowsParams, SymmetricRowsSampler};
pub use crate::problem::{BasisScanLp, LpOracle, LpOutcome, Problem, ProblemError};
// Half-edge mesh
pub use crate::mesh::{
    EdgeRemoval, FaceId, HalfEdgeId, HalfEdgeMesh, HeType, MeshError, MeshStats, PolyMesh, Sign,
    VertexId,
};
// Enumerators
pub use crate::cfg::JitterCfg;
pub use crate::cutter::{enumerate, CutterError, IncrementalCutter, Jitter, StepTimings};
pub use crate::ddm::{Facet, ReferenceEnumerator, ReferenceOutput};
// Cross-validation
pub use crate::verify::{cross_check, subset_test, CrossCheck, SubsetReport};
