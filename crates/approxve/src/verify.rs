//! Cross-validation of the two enumerators.
//!
//! The outputs are compared as point sets: both enumerators place new
//! vertices with the same interpolation formula, so on non-degenerate inputs
//! the sets coincide up to rounding. A tolerance absorbs rounding and the
//! occasional extra node of the reference enumerator.

use nalgebra::DVector;

use crate::ddm::ReferenceOutput;
use crate::mesh::PolyMesh;

/// Distance bookkeeping for `a ⊆ b` up to `tol`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SubsetReport {
    /// Points of `a` with no point of `b` within `tol`.
    pub unmatched: usize,
    /// Largest nearest-neighbour distance from `a` into `b`.
    pub max_distance: f64,
}

impl SubsetReport {
    #[inline]
    pub fn holds(&self) -> bool {
        self.unmatched == 0
    }
}

/// Tests whether every point of `a` has a point of `b` within `tol`.
pub fn subset_test(a: &[DVector<f64>], b: &[DVector<f64>], tol: f64) -> SubsetReport {
    let mut report = SubsetReport::default();
    for p in a {
        let nearest = b
            .iter()
            .map(|q| (p - q).norm())
            .fold(f64::INFINITY, f64::min);
        if nearest > tol {
            report.unmatched += 1;
        }
        report.max_distance = report.max_distance.max(nearest);
    }
    report
}

/// Summary of comparing a cutter mesh with a reference run.
#[derive(Clone, Debug, PartialEq)]
pub struct CrossCheck {
    pub mesh_vertices: usize,
    pub reference_nodes: usize,
    pub mesh_faces: usize,
    pub reference_facets: usize,
    /// mesh ⊆ reference
    pub forward: SubsetReport,
    /// reference ⊆ mesh
    pub backward: SubsetReport,
}

impl CrossCheck {
    pub fn counts_agree(&self) -> bool {
        self.mesh_vertices == self.reference_nodes
    }
    /// Same counts and mutual inclusion within the tolerance.
    pub fn agrees(&self) -> bool {
        self.counts_agree() && self.forward.holds() && self.backward.holds()
    }
}

pub fn cross_check(mesh: &PolyMesh, reference: &ReferenceOutput, tol: f64) -> CrossCheck {
    let check = CrossCheck {
        mesh_vertices: mesh.vertices.len(),
        reference_nodes: reference.nodes.len(),
        mesh_faces: mesh.valid_faces().count(),
        reference_facets: reference.facets.len(),
        forward: subset_test(&mesh.vertices, &reference.nodes, tol),
        backward: subset_test(&reference.nodes, &mesh.vertices, tol),
    };
    if !check.agrees() {
        tracing::warn!(
            mesh = check.mesh_vertices,
            reference = check.reference_nodes,
            unmatched_mesh = check.forward.unmatched,
            unmatched_reference = check.backward.unmatched,
            "enumerators disagree"
        );
    }
    check
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cutter::IncrementalCutter;
    use crate::ddm::ReferenceEnumerator;
    use crate::problem::{BasisScanLp, Problem};
    use nalgebra::dvector;

    #[test]
    fn subset_counts_far_points() {
        let a = vec![dvector![0.0, 0.0], dvector![1.0, 0.0]];
        let b = vec![dvector![0.0, 1e-12]];
        let r = subset_test(&a, &b, 1e-9);
        assert_eq!(r.unmatched, 1);
        assert!((r.max_distance - 1.0).abs() < 1e-9);
        assert!(subset_test(&b, &a, 1e-9).holds());
        assert!(subset_test(&[], &b, 1e-9).holds());
    }

    #[test]
    fn truncated_cube_both_enumerators_agree() {
        let mut rows = Vec::new();
        for i in 0..3 {
            let mut e = DVector::zeros(3);
            e[i] = 1.0;
            rows.push(e.clone());
            rows.push(-e);
        }
        rows.push(dvector![0.4, 0.4, 0.4]);
        let p = Problem::prepare(rows, 0.1, &BasisScanLp).unwrap();
        let mesh = IncrementalCutter::new(&p).unwrap().run().unwrap();
        let reference = ReferenceEnumerator::new(&p).unwrap().run();
        let check = cross_check(&mesh, &reference, 1e-7);
        assert!(check.agrees(), "{check:?}");
        assert_eq!(check.mesh_vertices, 10);
        assert_eq!((check.mesh_faces, check.reference_facets), (7, 7));
    }
}
