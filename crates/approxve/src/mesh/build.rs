//! Allocation primitives and the initial simplex.

use nalgebra::DVector;

use super::types::{Face, FaceId, HalfEdge, HalfEdgeId, HeType, Sign, Vertex, VertexId};
use super::{HalfEdgeMesh, MeshError};

/// Edges of the tetrahedron: (origin, target, face of the forward half, face of the twin).
const TETRA_EDGES: [(usize, usize, usize, usize); 6] = [
    (0, 1, 3, 2),
    (1, 2, 3, 0),
    (2, 0, 3, 1),
    (1, 3, 0, 2),
    (3, 2, 0, 1),
    (0, 3, 2, 1),
];

/// Edges of the triangle; face 1 is the invalid outside.
const TRIANGLE_EDGES: [(usize, usize, usize, usize); 3] = [(0, 1, 0, 1), (1, 2, 0, 1), (2, 0, 0, 1)];

impl HalfEdgeMesh {
    fn empty(dim: usize) -> Self {
        Self {
            dim,
            vertices: Vec::new(),
            halfedges: Vec::new(),
            faces: Vec::new(),
            live_vertices: 0,
            live_halfedges: 0,
            live_faces: 0,
            components: Vec::new(),
        }
    }

    /// Boundary of the simplex spanned by `corners` (3 points in 2D, 4 in 3D).
    ///
    /// Face `i` is the facet opposite corner `i`; in 2D an extra invalid face
    /// stands for the outside. The result is consistent but carries no signs.
    pub fn simplex(corners: Vec<DVector<f64>>) -> Result<Self, MeshError> {
        let dim = corners.first().map_or(0, |c| c.len());
        let (edges, face_count): (&[(usize, usize, usize, usize)], usize) = match dim {
            2 => (&TRIANGLE_EDGES, 2),
            3 => (&TETRA_EDGES, 4),
            _ => return Err(MeshError::Dimension { dim }),
        };
        if corners.len() != dim + 1 {
            return Err(MeshError::CornerCount {
                expected: dim + 1,
                got: corners.len(),
            });
        }
        if let Some(c) = corners.iter().find(|c| c.len() != dim) {
            return Err(MeshError::Dimension { dim: c.len() });
        }

        let mut mesh = Self::empty(dim);
        let vs: Vec<VertexId> = corners.into_iter().map(|p| mesh.add_vertex(p)).collect();
        let fs: Vec<FaceId> = (0..face_count)
            .map(|k| mesh.add_face(!(dim == 2 && k == 1)))
            .collect();
        for &(o, t, f1, f2) in edges {
            mesh.add_edge(vs[o], vs[t], fs[f1], fs[f2]);
        }

        // h -> g whenever both lie on the same face and g leaves where h ends
        let hs: Vec<HalfEdgeId> = mesh.halfedge_ids().collect();
        for &h in &hs {
            let (face, end) = (mesh.face_of(h), mesh.target(h));
            if let Some(&g) = hs
                .iter()
                .find(|&&g| g != h && mesh.face_of(g) == face && mesh.origin(g) == end)
            {
                mesh.link(h, g);
            }
        }
        for h in mesh.edges().collect::<Vec<_>>() {
            let t = mesh.twin(h);
            let (o, e) = (mesh.origin(h), mesh.origin(t));
            mesh[o].halfedge = Some(h);
            mesh[e].halfedge = Some(t);
            let (fh, ft) = (mesh.face_of(h), mesh.face_of(t));
            mesh[fh].halfedge = Some(h);
            mesh[ft].halfedge = Some(t);
        }
        tracing::trace!(dim, "simplex mesh built");
        Ok(mesh)
    }

    pub(crate) fn add_vertex(&mut self, point: DVector<f64>) -> VertexId {
        let id = VertexId(self.vertices.len());
        self.vertices.push(Some(Vertex {
            point,
            sign: Sign::Zero,
            halfedge: None,
            index: id.0,
        }));
        self.live_vertices += 1;
        id
    }

    pub(crate) fn add_face(&mut self, valid: bool) -> FaceId {
        let id = FaceId(self.faces.len());
        self.faces.push(Some(Face {
            halfedge: None,
            component: 0,
            valid,
        }));
        self.live_faces += 1;
        id
    }

    /// New twin pair `origin -> target` (on `face`) and back (on `twin_face`).
    ///
    /// Both halves start as self-loops in `next`/`prev`; the caller links them.
    /// Endpoints and faces are re-pointed at the new halves.
    pub(crate) fn add_edge(
        &mut self,
        origin: VertexId,
        target: VertexId,
        face: FaceId,
        twin_face: FaceId,
    ) -> (HalfEdgeId, HalfEdgeId) {
        let h1 = HalfEdgeId(self.halfedges.len());
        let h2 = HalfEdgeId(h1.0 + 1);
        let half = |id: HalfEdgeId, twin: HalfEdgeId, origin: VertexId, face: FaceId| HalfEdge {
            origin,
            face,
            twin,
            next: id,
            prev: id,
            main: h1,
            kind: HeType::ZERO_ZERO,
        };
        self.halfedges.push(Some(half(h1, h2, origin, face)));
        self.halfedges.push(Some(half(h2, h1, target, twin_face)));
        self.live_halfedges += 2;
        self[origin].halfedge = Some(h1);
        self[target].halfedge = Some(h2);
        self[face].halfedge = Some(h1);
        self[twin_face].halfedge = Some(h2);
        (h1, h2)
    }

    /// `a.next = b`, `b.prev = a`.
    #[inline]
    pub(crate) fn link(&mut self, a: HalfEdgeId, b: HalfEdgeId) {
        self[a].next = b;
        self[b].prev = a;
    }

    pub(crate) fn drop_vertex(&mut self, v: VertexId) {
        if self.vertices[v.0].take().is_some() {
            self.live_vertices -= 1;
        }
    }

    pub(crate) fn drop_face(&mut self, f: FaceId) {
        if self.faces[f.0].take().is_some() {
            self.live_faces -= 1;
        }
    }

    /// Removes `h` and its twin from the arena (no relinking).
    pub(crate) fn drop_edge(&mut self, h: HalfEdgeId) {
        let t = self.twin(h);
        for x in [h, t] {
            if self.halfedges[x.0].take().is_some() {
                self.live_halfedges -= 1;
            }
        }
    }

    pub fn set_sign(&mut self, v: VertexId, sign: Sign) {
        self[v].sign = sign;
    }

    /// Sets the type of `h` and the mirrored type of its twin.
    pub fn set_kind(&mut self, h: HalfEdgeId, kind: HeType) {
        let t = self.twin(h);
        self[h].kind = kind;
        self[t].kind = kind.mirrored();
    }
}
