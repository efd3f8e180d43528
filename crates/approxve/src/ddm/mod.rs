//! Reference enumerator: approximate double description on incidence sets.
//!
//! Purpose
//! - Independent check for the incremental cutter. It consumes the same
//!   `Problem`, uses the same band classification and the same crossing
//!   level, but keeps no mesh: adjacency of a `-`/`+` node pair is decided
//!   purely from the facets both nodes lie on.
//!
//! Rules
//! - a node created while processing row `k` lies on row `k` and on every
//!   facet its two parents share;
//! - a `-` node `u` and a `+` node `w` are joined when they share at least
//!   `dim-1` facets (an edge of the current approximation);
//! - nodes in the band gain the current facet; `+` nodes are deleted;
//! - after the last row, facets with fewer than `dim` nodes are dropped.
//!
//! Non-adjacent pairs may pass the `dim-1` test once facets accumulate
//! degenerate incidences; such pairs create extra nodes. With a wide band this
//! happens often and the node count can grow far beyond the vertex count of the
//! cutter mesh (`verify::cross_check` then reports a count mismatch). Growth
//! past `cfg::NODE_GROWTH_WARN` nodes per row is logged once per run.

use std::collections::BTreeSet;
use std::time::{Duration, Instant};

use nalgebra::DVector;

use crate::cfg::NODE_GROWTH_WARN;
use crate::mesh::Sign;
use crate::problem::{Problem, ProblemError};

/// Node of the reference enumerator.
#[derive(Clone, Debug)]
pub struct Node {
    pub point: DVector<f64>,
    pub sign: Sign,
    /// Row indices of the facets the node lies on.
    pub incidence: BTreeSet<usize>,
    pub index: usize,
}

/// Facet (row) with the nodes lying on it, filled by `finish`.
#[derive(Clone, Debug, PartialEq)]
pub struct Facet {
    pub row: usize,
    pub nodes: Vec<usize>,
}

/// Result of a complete reference run.
#[derive(Clone, Debug, PartialEq)]
pub struct ReferenceOutput {
    pub dim: usize,
    pub nodes: Vec<DVector<f64>>,
    pub facets: Vec<Facet>,
    pub elapsed: Duration,
}

#[derive(Clone, Debug)]
pub struct ReferenceEnumerator {
    problem: Problem,
    nodes: Vec<Node>,
    iter: usize,
    elapsed: Duration,
    peak_nodes: usize,
    growth_warned: bool,
}

impl ReferenceEnumerator {
    /// Nodes at the padded simplex corners; corner `i` lies on rows `0..=dim` except `i`.
    pub fn new(problem: &Problem) -> Result<Self, ProblemError> {
        let dim = problem.dim();
        let nodes = problem
            .simplex_corners()?
            .into_iter()
            .enumerate()
            .map(|(i, point)| Node {
                point,
                sign: Sign::Zero,
                incidence: (0..=dim).filter(|&k| k != i).collect(),
                index: i,
            })
            .collect();
        Ok(Self {
            problem: problem.clone(),
            nodes,
            iter: dim + 1,
            elapsed: Duration::ZERO,
            peak_nodes: dim + 1,
            growth_warned: false,
        })
    }

    #[inline]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }
    #[inline]
    pub fn iter(&self) -> usize {
        self.iter
    }
    /// Largest node count seen after any step.
    #[inline]
    pub fn peak_nodes(&self) -> usize {
        self.peak_nodes
    }

    /// Processes row `iter`; `false` once all rows are consumed.
    pub fn step(&mut self) -> bool {
        if self.iter >= self.problem.len() {
            return false;
        }
        let start = Instant::now();
        let row = self.iter;
        let hp = self.problem.row(row);
        let eps = self.problem.eps();
        for n in &mut self.nodes {
            n.sign = Sign::classify(hp.dot(&n.point), 1.0, 1.0 + eps);
        }

        let shared_min = self.problem.dim() - 1;
        let level = 1.0 + eps / 2.0;
        let mut fresh = Vec::new();
        for w in self.nodes.iter().filter(|n| n.sign == Sign::Pos) {
            for u in self.nodes.iter().filter(|n| n.sign == Sign::Neg) {
                let common: BTreeSet<usize> =
                    u.incidence.intersection(&w.incidence).copied().collect();
                if common.len() < shared_min {
                    continue;
                }
                let hw = hp.dot(&w.point);
                let d = &u.point - &w.point;
                let hd = hp.dot(&d);
                let point = d * ((level - hw) / hd) + &w.point;
                let mut incidence = common;
                incidence.insert(row);
                fresh.push(Node {
                    point,
                    sign: Sign::Zero,
                    incidence,
                    index: 0,
                });
            }
        }
        let created = fresh.len();
        for n in self.nodes.iter_mut().filter(|n| n.sign == Sign::Zero) {
            n.incidence.insert(row);
        }
        self.nodes.retain(|n| n.sign != Sign::Pos);
        self.nodes.extend(fresh);

        self.elapsed += start.elapsed();
        self.peak_nodes = self.peak_nodes.max(self.nodes.len());
        tracing::debug!(iter = row, created, nodes = self.nodes.len(), "reference step");
        if !self.growth_warned && growth_exceeded(self.nodes.len(), self.problem.len()) {
            self.growth_warned = true;
            tracing::warn!(
                iter = row,
                nodes = self.nodes.len(),
                rows = self.problem.len(),
                "reference node count is growing fast; consider a smaller eps"
            );
        }
        self.iter += 1;
        true
    }

    /// Runs all remaining rows and collects the output.
    ///
    /// Node growth is not bounded: wide bands on inputs with many rows can
    /// make a run very slow (see the module docs).
    pub fn run(&mut self) -> ReferenceOutput {
        while self.step() {}
        let out = self.finish();
        tracing::info!(
            nodes = out.nodes.len(),
            facets = out.facets.len(),
            secs = out.elapsed.as_secs_f64(),
            "reference enumerator done"
        );
        out
    }

    /// Renumbers nodes densely and lists the nodes of each facet.
    pub fn finish(&mut self) -> ReferenceOutput {
        for (k, n) in self.nodes.iter_mut().enumerate() {
            n.index = k;
        }
        let dim = self.problem.dim();
        let facets = (0..self.iter)
            .map(|row| Facet {
                row,
                nodes: self
                    .nodes
                    .iter()
                    .filter(|n| n.incidence.contains(&row))
                    .map(|n| n.index)
                    .collect(),
            })
            .filter(|f| f.nodes.len() >= dim)
            .collect();
        ReferenceOutput {
            dim,
            nodes: self.nodes.iter().map(|n| n.point.clone()).collect(),
            facets,
            elapsed: self.elapsed,
        }
    }
}

fn growth_exceeded(nodes: usize, rows: usize) -> bool {
    nodes > NODE_GROWTH_WARN * rows
}
