//! Local edits: split an edge, split a face, remove an edge.
//!
//! Each operation keeps the mesh consistent (see `check`) provided its
//! preconditions hold. Handles passed in are validated; everything reached
//! from them is trusted.

use nalgebra::DVector;

use super::types::{FaceId, HalfEdgeId, VertexId};
use super::{HalfEdgeMesh, MeshError};

/// What `remove_edge` did to the faces on both sides of the edge.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EdgeRemoval {
    /// Distinct faces: `absorbed` was merged into `survivor`.
    MergeFaces { survivor: FaceId, absorbed: FaceId },
    /// The edge was the whole boundary of `face` (both endpoints dangling).
    RemoveIsolatedFace { face: FaceId },
    /// A bridge inside `face`; one side of it now forms a new face.
    SplitFace { face: FaceId },
    /// A dangling edge inside one face: no face change.
    NoOp,
}

impl HalfEdgeMesh {
    /// Inserts a vertex at `point` in the middle of the edge `uw`.
    ///
    /// Returns `(uv, vw)`: `vw` is `uw` itself (its origin moves to `v`), `uv`
    /// is new and lies on the same face. Twins are updated symmetrically.
    pub fn split_edge(
        &mut self,
        uw: HalfEdgeId,
        point: DVector<f64>,
    ) -> Result<(HalfEdgeId, HalfEdgeId), MeshError> {
        self.require_halfedge(uw)?;
        let wu = self.twin(uw);
        let u = self.origin(uw);
        let (f_uw, f_wu) = (self.face_of(uw), self.face_of(wu));

        let v = self.add_vertex(point);
        let (uv, vu) = self.add_edge(u, v, f_uw, f_wu);
        let (vw, wv) = (uw, wu);
        self[vw].origin = v;
        self[v].halfedge = Some(vw);

        if self.prev(uw) == wu {
            // u had degree one
            self.link(vu, uv);
        } else {
            let (before, after) = (self.prev(uw), self.next(wu));
            self.link(before, uv);
            self.link(vu, after);
        }
        self.link(uv, vw);
        self.link(wv, vu);
        Ok((uv, vw))
    }

    /// Adds the diagonal `origin(he1) -> origin(he2)` across their common face.
    ///
    /// The loop starting at `he2` moves to the returned new face. Returns
    /// `Ok(None)` without touching the mesh when the diagonal would duplicate
    /// an existing edge or connect a vertex to itself.
    pub fn split_face(
        &mut self,
        he1: HalfEdgeId,
        he2: HalfEdgeId,
    ) -> Result<Option<FaceId>, MeshError> {
        self.require_halfedge(he1)?;
        self.require_halfedge(he2)?;
        if self.twin(he1) == he2 || self.next(he2) == he1 || self.next(he1) == he2 {
            return Ok(None);
        }
        let (u, w) = (self.origin(he1), self.origin(he2));
        if u == w {
            return Ok(None);
        }
        let f1 = self.face_of(he1);
        let f2 = self.add_face(true);
        let (uw, wu) = self.add_edge(u, w, f2, f1);
        let (p1, p2) = (self.prev(he1), self.prev(he2));
        self.link(p1, uw);
        self.link(uw, he2);
        self.link(p2, wu);
        self.link(wu, he1);

        let limit = self.walk_limit();
        let mut h = he2;
        for _ in 0..limit {
            if h == uw {
                tracing::trace!(%he1, %he2, face = %f2, "face split");
                return Ok(Some(f2));
            }
            self[h].face = f2;
            h = self.next(h);
        }
        Err(MeshError::WalkOverrun { start: he2, limit })
    }

    /// Moves every half-edge of `absorbed` onto `survivor` and deletes `absorbed`.
    ///
    /// `survivor` stays valid only if both faces were valid.
    pub(crate) fn merge_faces(
        &mut self,
        survivor: FaceId,
        absorbed: FaceId,
    ) -> Result<(), MeshError> {
        let start = self[absorbed]
            .halfedge
            .ok_or(MeshError::FaceCoupling(absorbed))?;
        for h in self.face_loop(start)? {
            self[h].face = survivor;
        }
        let valid = self[absorbed].valid;
        self[survivor].valid &= valid;
        self[survivor].halfedge = None;
        self.drop_face(absorbed);
        Ok(())
    }

    /// Which face change removing `h` entails (no mutation).
    pub fn classify_removal(&self, h: HalfEdgeId) -> Result<EdgeRemoval, MeshError> {
        self.require_halfedge(h)?;
        let t = self.twin(h);
        let (f1, f2) = (self.face_of(h), self.face_of(t));
        let (op, tp) = (self.prev(h), self.prev(t));
        Ok(if f1 != f2 {
            EdgeRemoval::MergeFaces {
                survivor: f2,
                absorbed: f1,
            }
        } else if tp == h && op == t {
            EdgeRemoval::RemoveIsolatedFace { face: f1 }
        } else if op != t && tp != h {
            EdgeRemoval::SplitFace { face: f1 }
        } else {
            EdgeRemoval::NoOp
        })
    }

    /// Deletes the edge `h` (both halves) and repairs faces and endpoints.
    ///
    /// Dangling endpoints (no other incident edge) are deleted with it.
    pub fn remove_edge(&mut self, h: HalfEdgeId) -> Result<EdgeRemoval, MeshError> {
        let outcome = self.classify_removal(h)?;
        let t = self.twin(h);
        let (o, e): (VertexId, VertexId) = (self.origin(h), self.origin(t));
        let (on, op) = (self.next(t), self.prev(h));
        let (tn, tp) = (self.next(h), self.prev(t));
        let mut f1 = self.face_of(h);
        let f2 = self.face_of(t);

        match outcome {
            EdgeRemoval::MergeFaces { survivor, absorbed } => {
                self.merge_faces(survivor, absorbed)?;
                f1 = survivor;
            }
            EdgeRemoval::RemoveIsolatedFace { face } => self.drop_face(face),
            EdgeRemoval::SplitFace { face } => {
                let valid = self[face].valid;
                let created = self.add_face(valid);
                let limit = self.walk_limit();
                let mut g = on;
                let mut steps = 0;
                loop {
                    self[g].face = created;
                    if g == op {
                        break;
                    }
                    g = self.next(g);
                    steps += 1;
                    if steps > limit {
                        return Err(MeshError::WalkOverrun { start: on, limit });
                    }
                }
                f1 = created;
            }
            EdgeRemoval::NoOp => {}
        }

        if tp == h {
            self.drop_vertex(e);
        } else {
            self.link(tp, tn);
            self[f2].halfedge = Some(tp);
            self[e].halfedge = Some(tn);
        }
        if op == t {
            self.drop_vertex(o);
        } else {
            self.link(op, on);
            self[f1].halfedge = Some(op);
            self[o].halfedge = Some(on);
        }
        self.drop_edge(h);
        tracing::trace!(%h, ?outcome, "edge removed");
        Ok(outcome)
    }

    /// Removes every edge whose two halves lie on the same face.
    pub fn remove_bridges(&mut self) -> Result<usize, MeshError> {
        let mut removed = 0;
        for h in self.edges().collect::<Vec<_>>() {
            if self.halfedge(h).is_none() {
                continue;
            }
            if self.face_of(h) == self.face_of(self.twin(h)) {
                self.remove_edge(h)?;
                removed += 1;
            }
        }
        Ok(removed)
    }
}
