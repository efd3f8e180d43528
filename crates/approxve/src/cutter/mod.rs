//! Incremental cutter: ε-approximate vertex enumeration on a half-edge mesh.
//!
//! Purpose
//! - Start from the padded simplex of the first `dim+1` rows and intersect
//!   the current approximation with one more half-space per step.
//! - Vertices within the ε-band `1 <= a·x <= 1+ε` of the new hyperplane are
//!   kept as they are; only vertices strictly beyond it are cut off.
//!
//! Step outline (see `cut`)
//! 1. classify every vertex against row `iter` (`-`, `0`, `+`);
//! 2. type every half-edge by its endpoint signs;
//! 3. split every `-+` edge at the level `1+ε/2` (new vertex classified `0`);
//! 4. in every valid face walk `+0 ... 0+` runs and close them with diagonals;
//! 5. delete every edge incident to a `+` vertex, then collapse 2-gons.
//!
//! Why this design
//! - Faces of the approximation are never triangulated; cuts only add the
//!   diagonals that separate kept from discarded parts of a face.
//! - Vertices in the band are not snapped onto the new hyperplane, which keeps
//!   the vertex count low at the price of an ε-sized error.
//!
//! Code cross-refs: `mesh` (surgery), `ddm` (reference enumerator, same input).

mod cut;
pub mod jitter;

use std::time::{Duration, Instant};

use nalgebra::DVector;

use crate::cfg::JitterCfg;
use crate::mesh::{HalfEdgeMesh, HeType, MeshError, PolyMesh, Sign, VertexId};
use crate::problem::{BasisScanLp, Problem, ProblemError};
pub use jitter::Jitter;

/// Failures of an incremental run.
#[derive(Debug, Clone, PartialEq)]
pub enum CutterError {
    Problem(ProblemError),
    Mesh(MeshError),
}

impl std::fmt::Display for CutterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Problem(e) => write!(f, "problem: {e}"),
            Self::Mesh(e) => write!(f, "mesh: {e}"),
        }
    }
}

impl std::error::Error for CutterError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Problem(e) => Some(e),
            Self::Mesh(e) => Some(e),
        }
    }
}

impl From<ProblemError> for CutterError {
    fn from(e: ProblemError) -> Self {
        Self::Problem(e)
    }
}

impl From<MeshError> for CutterError {
    fn from(e: MeshError) -> Self {
        Self::Mesh(e)
    }
}

/// Preprocesses `rows` with the built-in LP and runs the cutter to completion.
pub fn enumerate(
    rows: Vec<DVector<f64>>,
    eps: f64,
    jitter: &JitterCfg,
) -> Result<PolyMesh, CutterError> {
    let problem = Problem::prepare(rows, eps, &BasisScanLp)?;
    IncrementalCutter::with_cfg(&problem, jitter)?.run()
}

/// Accumulated wall-clock time per phase.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StepTimings {
    pub classify: Duration,
    pub types: Duration,
    pub insert: Duration,
    pub cut: Duration,
    pub total: Duration,
}

/// State of one incremental enumeration.
#[derive(Debug)]
pub struct IncrementalCutter {
    problem: Problem,
    mesh: HalfEdgeMesh,
    iter: usize,
    jitter: Jitter,
    timings: StepTimings,
}

impl IncrementalCutter {
    /// Mesh of the padded simplex; the next step processes row `dim+1`.
    pub fn new(problem: &Problem) -> Result<Self, CutterError> {
        Self::with_jitter(problem, Jitter::disabled())
    }

    pub fn with_cfg(problem: &Problem, cfg: &JitterCfg) -> Result<Self, CutterError> {
        Self::with_jitter(problem, Jitter::from_cfg(cfg))
    }

    pub fn with_jitter(problem: &Problem, jitter: Jitter) -> Result<Self, CutterError> {
        let mesh = HalfEdgeMesh::simplex(problem.simplex_corners()?)?;
        tracing::debug!(
            dim = problem.dim(),
            rows = problem.len(),
            eps = problem.eps(),
            jitter = !jitter.is_disabled(),
            "cutter initialized"
        );
        Ok(Self {
            problem: problem.clone(),
            mesh,
            iter: problem.dim() + 1,
            jitter,
            timings: StepTimings::default(),
        })
    }

    #[inline]
    pub fn mesh(&self) -> &HalfEdgeMesh {
        &self.mesh
    }
    #[inline]
    pub fn problem(&self) -> &Problem {
        &self.problem
    }
    /// Index of the next row to process.
    #[inline]
    pub fn iter(&self) -> usize {
        self.iter
    }
    #[inline]
    pub fn timings(&self) -> StepTimings {
        self.timings
    }
    #[inline]
    pub fn is_done(&self) -> bool {
        self.iter >= self.problem.len()
    }
    pub fn into_mesh(self) -> HalfEdgeMesh {
        self.mesh
    }

    /// Processes row `iter`; `Ok(false)` once all rows are consumed.
    pub fn step(&mut self) -> Result<bool, CutterError> {
        if self.is_done() {
            return Ok(false);
        }
        let start = Instant::now();

        let t = Instant::now();
        let (neg, zero, pos) = self.set_signs();
        self.timings.classify += t.elapsed();

        let t = Instant::now();
        self.set_types();
        self.timings.types += t.elapsed();

        let t = Instant::now();
        let inserted = self.add_crossing_vertices()?;
        self.timings.insert += t.elapsed();

        let t = Instant::now();
        if pos > 0 {
            self.cut()?;
        }
        self.timings.cut += t.elapsed();

        self.timings.total += start.elapsed();
        tracing::debug!(
            iter = self.iter,
            neg,
            zero,
            pos,
            inserted,
            vertices = self.mesh.vertex_count(),
            edges = self.mesh.edge_count(),
            faces = self.mesh.face_count(),
            "step"
        );
        self.iter += 1;
        Ok(true)
    }

    /// Runs all remaining steps, renumbers vertices and labels components.
    pub fn run(&mut self) -> Result<PolyMesh, CutterError> {
        while self.step()? {}
        self.mesh.renumber_vertices();
        self.mesh.find_components()?;
        let stats = self.mesh.stats()?;
        tracing::info!(
            vertices = stats.vertices,
            edges = stats.edges,
            faces = stats.faces,
            valid_faces = stats.valid_faces,
            components = stats.components,
            bridges = stats.bridges,
            secs = self.timings.total.as_secs_f64(),
            "incremental cutter done"
        );
        Ok(self.mesh.to_poly_mesh()?)
    }

    /// Classifies every vertex against row `iter`; returns `(-, 0, +)` counts.
    fn set_signs(&mut self) -> (usize, usize, usize) {
        let hp = self.problem.row(self.iter).clone();
        let eps = self.problem.eps();
        let mut counts = (0, 0, 0);
        for v in self.mesh.vertex_ids().collect::<Vec<VertexId>>() {
            let res = hp.dot(&self.mesh[v].point);
            let lower = 1.0 + self.jitter.sign_offset(eps);
            // the upper threshold is only drawn for vertices not already below
            let sign = if res < lower {
                Sign::Neg
            } else {
                Sign::classify(res, lower, 1.0 + eps + self.jitter.sign_offset(eps))
            };
            match sign {
                Sign::Neg => counts.0 += 1,
                Sign::Zero => counts.1 += 1,
                Sign::Pos => counts.2 += 1,
            }
            self.mesh.set_sign(v, sign);
        }
        counts
    }

    fn set_types(&mut self) {
        for h in self.mesh.edges().collect::<Vec<_>>() {
            let kind = HeType::new(
                self.mesh[self.mesh.origin(h)].sign,
                self.mesh[self.mesh.target(h)].sign,
            );
            self.mesh.set_kind(h, kind);
        }
    }

    /// Splits every `-+` edge at `1+ε/2`; returns the number of new vertices.
    fn add_crossing_vertices(&mut self) -> Result<usize, CutterError> {
        let hp = self.problem.row(self.iter).clone();
        let eps = self.problem.eps();
        let mut inserted = 0;
        for main in self.mesh.edges().collect::<Vec<_>>() {
            let h = match self.mesh[main].kind {
                HeType::NEG_POS => main,
                HeType::POS_NEG => self.mesh.twin(main),
                _ => continue,
            };
            let u = &self.mesh[self.mesh.origin(h)].point;
            let w = &self.mesh[self.mesh.target(h)].point;
            let hw = hp.dot(w);
            let d = u - w;
            let hd = hp.dot(&d);
            let level = 1.0 + eps / 2.0 + self.jitter.crossing_offset(eps);
            let point = d * ((level - hw) / hd) + w;

            let (uv, vw) = self.mesh.split_edge(h, point)?;
            let v = self.mesh.origin(vw);
            self.mesh.set_sign(v, Sign::Zero);
            self.mesh.set_kind(uv, HeType::NEG_ZERO);
            self.mesh.set_kind(vw, HeType::ZERO_POS);
            inserted += 1;
        }
        Ok(inserted)
    }
}

#[cfg(test)]
mod tests;
