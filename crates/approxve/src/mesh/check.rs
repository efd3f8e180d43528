//! Structural consistency check.
//!
//! Order matters: dangling relations are reported first so the remaining
//! checks can index freely.

use std::collections::BTreeSet;

use super::types::{FaceId, VertexId};
use super::{HalfEdgeMesh, MeshError};

impl HalfEdgeMesh {
    /// Verifies every structural invariant of the mesh.
    ///
    /// - every relation of a live half-edge points to a live entity;
    /// - `prev`/`next` are mutually inverse, `twin` is an involution without
    ///   fixed points and `main` is shared by both halves;
    /// - every face loop carries that face, every vertex rotation leaves that vertex;
    /// - faces and vertices referenced by half-edges are exactly the live ones;
    /// - `V - E + F == 2 * components`.
    pub fn check(&self) -> Result<(), MeshError> {
        self.check_links()?;
        self.check_halfedge_coupling()?;
        self.check_face_coupling()?;
        self.check_vertex_coupling()?;
        self.check_referenced_sets()?;
        self.check_euler()
    }

    fn check_links(&self) -> Result<(), MeshError> {
        for h in self.halfedge_ids() {
            let he = &self[h];
            let links = [
                ("twin", self.halfedge(he.twin).is_some()),
                ("next", self.halfedge(he.next).is_some()),
                ("prev", self.halfedge(he.prev).is_some()),
                ("main", self.halfedge(he.main).is_some()),
                ("origin", self.vertex(he.origin).is_some()),
                ("face", self.face(he.face).is_some()),
            ];
            if let Some((link, _)) = links.iter().find(|(_, ok)| !ok) {
                return Err(MeshError::BrokenLink { halfedge: h, link: *link });
            }
        }
        for v in self.vertex_ids() {
            if let Some(h) = self[v].halfedge {
                self.require_halfedge(h)
                    .map_err(|_| MeshError::VertexCoupling(v))?;
            }
        }
        for f in self.face_ids() {
            match self[f].halfedge {
                Some(h) if self.halfedge(h).is_some() => {}
                _ => return Err(MeshError::FaceCoupling(f)),
            }
        }
        Ok(())
    }

    fn check_halfedge_coupling(&self) -> Result<(), MeshError> {
        for h in self.halfedge_ids() {
            let he = &self[h];
            let fail = |relation| Err(MeshError::HalfEdgeCoupling { halfedge: h, relation });
            if self[he.next].prev != h {
                return fail("next.prev");
            }
            if self[he.prev].next != h {
                return fail("prev.next");
            }
            if he.twin == h || self[he.twin].twin != h {
                return fail("twin");
            }
            if (he.main != h && he.main != he.twin) || self[he.twin].main != he.main {
                return fail("main");
            }
        }
        Ok(())
    }

    fn check_face_coupling(&self) -> Result<(), MeshError> {
        for f in self.face_ids() {
            let start = self[f].halfedge.ok_or(MeshError::FaceCoupling(f))?;
            if self.face_loop(start)?.into_iter().any(|h| self.face_of(h) != f) {
                return Err(MeshError::FaceCoupling(f));
            }
        }
        Ok(())
    }

    fn check_vertex_coupling(&self) -> Result<(), MeshError> {
        for v in self.vertex_ids() {
            let Some(start) = self[v].halfedge else {
                continue;
            };
            if self.vertex_star(start)?.into_iter().any(|h| self.origin(h) != v) {
                return Err(MeshError::VertexCoupling(v));
            }
        }
        Ok(())
    }

    fn check_referenced_sets(&self) -> Result<(), MeshError> {
        let faces: BTreeSet<FaceId> = self.halfedge_ids().map(|h| self.face_of(h)).collect();
        if !faces.iter().copied().eq(self.face_ids()) {
            return Err(MeshError::FaceLinks);
        }
        let verts: BTreeSet<VertexId> = self.halfedge_ids().map(|h| self.origin(h)).collect();
        if !verts.iter().copied().eq(self.vertex_ids()) {
            return Err(MeshError::VertexLinks);
        }
        Ok(())
    }

    fn check_euler(&self) -> Result<(), MeshError> {
        let components = self.count_components()?;
        let (v, e, f) = (self.vertex_count(), self.edge_count(), self.face_count());
        if v + f != e + 2 * components {
            return Err(MeshError::Euler {
                vertices: v,
                edges: e,
                faces: f,
                components,
            });
        }
        Ok(())
    }
}
