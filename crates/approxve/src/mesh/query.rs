//! Read-mostly queries: loops, degrees, components, dense export.

use std::collections::VecDeque;

use super::types::{FaceId, HalfEdgeId, VertexId};
use super::{HalfEdgeMesh, MeshError, MeshStats, PolyMesh};

impl HalfEdgeMesh {
    /// Half-edges of the face loop through `start`, following `next`.
    pub fn face_loop(&self, start: HalfEdgeId) -> Result<Vec<HalfEdgeId>, MeshError> {
        self.require_halfedge(start)?;
        self.bounded_walk(start, |m, h| m.next(h))
    }

    /// Outgoing half-edges around `origin(start)`, following `twin -> next`.
    pub fn vertex_star(&self, start: HalfEdgeId) -> Result<Vec<HalfEdgeId>, MeshError> {
        self.require_halfedge(start)?;
        self.bounded_walk(start, |m, h| m.next(m.twin(h)))
    }

    fn bounded_walk(
        &self,
        start: HalfEdgeId,
        step: impl Fn(&Self, HalfEdgeId) -> HalfEdgeId,
    ) -> Result<Vec<HalfEdgeId>, MeshError> {
        let limit = self.walk_limit();
        let mut out = vec![start];
        let mut h = step(self, start);
        while h != start {
            if out.len() >= limit {
                return Err(MeshError::WalkOverrun { start, limit });
            }
            out.push(h);
            h = step(self, h);
        }
        Ok(out)
    }

    /// Vertex loop of `f` in boundary order.
    pub fn face_vertices(&self, f: FaceId) -> Result<Vec<VertexId>, MeshError> {
        self.require_face(f)?;
        let start = self[f].halfedge.ok_or(MeshError::FaceCoupling(f))?;
        Ok(self
            .face_loop(start)?
            .into_iter()
            .map(|h| self.origin(h))
            .collect())
    }

    /// Faces around `v` in rotation order.
    pub fn vertex_faces(&self, v: VertexId) -> Result<Vec<FaceId>, MeshError> {
        self.require_vertex(v)?;
        let Some(start) = self[v].halfedge else {
            return Ok(Vec::new());
        };
        Ok(self
            .vertex_star(start)?
            .into_iter()
            .map(|h| self.face_of(h))
            .collect())
    }

    /// Live vertices with exactly `degree` incident edges.
    ///
    /// Degree 0 means "no outgoing half-edge". For `degree > 0` the rotation
    /// `twin -> next` must return to the start after exactly `degree` steps
    /// (and not earlier).
    pub fn vertices_of_degree(&self, degree: usize) -> Vec<VertexId> {
        self.vertex_ids()
            .filter(|&v| match self[v].halfedge {
                None => degree == 0,
                Some(h0) => {
                    degree > 0 && self.returns_after(h0, degree, |m, h| m.next(m.twin(h)))
                }
            })
            .collect()
    }

    /// Live faces whose boundary loop has exactly `degree` half-edges.
    pub fn faces_of_degree(&self, degree: usize) -> Vec<FaceId> {
        self.face_ids()
            .filter(|&f| match self[f].halfedge {
                None => degree == 0,
                Some(h0) => degree > 0 && self.returns_after(h0, degree, |m, h| m.next(h)),
            })
            .collect()
    }

    fn returns_after(
        &self,
        start: HalfEdgeId,
        steps: usize,
        step: impl Fn(&Self, HalfEdgeId) -> HalfEdgeId,
    ) -> bool {
        let mut h = start;
        for k in 1..=steps {
            h = step(self, h);
            if h == start {
                return k == steps;
            }
        }
        false
    }

    /// Main half-edges of edges with the same face on both sides.
    pub fn bridges(&self) -> Vec<HalfEdgeId> {
        self.edges()
            .filter(|&h| self.face_of(h) == self.face_of(self.twin(h)))
            .collect()
    }

    /// Labels faces with 1-based components (BFS across twins, faces in
    /// creation order) and stores one representative half-edge per component.
    pub fn find_components(&mut self) -> Result<usize, MeshError> {
        let (labels, reps) = self.component_labels()?;
        for f in self.face_ids().collect::<Vec<_>>() {
            self[f].component = labels[f.0];
        }
        self.components = reps;
        tracing::debug!(components = self.components.len(), "components labelled");
        Ok(self.components.len())
    }

    /// Component count without touching stored labels.
    pub fn count_components(&self) -> Result<usize, MeshError> {
        Ok(self.component_labels()?.1.len())
    }

    /// Representatives from the last `find_components`.
    pub fn component_halfedges(&self) -> &[HalfEdgeId] {
        &self.components
    }

    /// Number of components from the last `find_components`.
    pub fn number_of_components(&self) -> usize {
        self.components.len()
    }

    /// Faces labelled `component` by the last `find_components`.
    pub fn faces_of_component(&self, component: usize) -> Vec<FaceId> {
        self.face_ids()
            .filter(|&f| self[f].component == component)
            .collect()
    }

    pub fn size_of_component(&self, component: usize) -> usize {
        self.faces_of_component(component).len()
    }

    fn component_labels(&self) -> Result<(Vec<usize>, Vec<HalfEdgeId>), MeshError> {
        let mut labels = vec![0usize; self.faces.len()];
        let mut reps = Vec::new();
        let mut queue = VecDeque::new();
        for f in self.face_ids() {
            if labels[f.0] != 0 {
                continue;
            }
            let rep = self[f].halfedge.ok_or(MeshError::FaceCoupling(f))?;
            reps.push(rep);
            let label = reps.len();
            labels[f.0] = label;
            queue.push_back(f);
            while let Some(g) = queue.pop_front() {
                let start = self[g].halfedge.ok_or(MeshError::FaceCoupling(g))?;
                for h in self.face_loop(start)? {
                    let nb = self.face_of(self.twin(h));
                    if labels[nb.0] == 0 {
                        labels[nb.0] = label;
                        queue.push_back(nb);
                    }
                }
            }
        }
        Ok((labels, reps))
    }

    /// Dense output indices `0..V` in creation order.
    pub fn renumber_vertices(&mut self) {
        for (k, v) in self.vertex_ids().collect::<Vec<_>>().into_iter().enumerate() {
            self[v].index = k;
        }
    }

    /// Export copy with dense vertex indices (creation order).
    pub fn to_poly_mesh(&self) -> Result<PolyMesh, MeshError> {
        let mut dense = vec![usize::MAX; self.vertices.len()];
        let mut vertices = Vec::with_capacity(self.live_vertices);
        for (k, v) in self.vertex_ids().enumerate() {
            dense[v.0] = k;
            vertices.push(self[v].point.clone());
        }
        let mut faces = Vec::with_capacity(self.live_faces);
        let mut face_valid = Vec::with_capacity(self.live_faces);
        let mut face_components = Vec::with_capacity(self.live_faces);
        for f in self.face_ids() {
            faces.push(
                self.face_vertices(f)?
                    .into_iter()
                    .map(|v| dense[v.0])
                    .collect(),
            );
            face_valid.push(self[f].valid);
            face_components.push(self[f].component);
        }
        Ok(PolyMesh {
            dim: self.dim,
            vertices,
            faces,
            face_valid,
            face_components,
            components: self.components.len(),
            edges: self.edge_count(),
        })
    }

    pub fn stats(&self) -> Result<MeshStats, MeshError> {
        let low = |d: usize| self.vertices_of_degree(d).len();
        let low_f = |d: usize| self.faces_of_degree(d).len();
        Ok(MeshStats {
            vertices: self.live_vertices,
            edges: self.edge_count(),
            faces: self.live_faces,
            valid_faces: self.face_ids().filter(|&f| self[f].valid).count(),
            components: self.count_components()?,
            bridges: self.bridges().len(),
            low_degree_vertices: [low(0), low(1), low(2)],
            low_degree_faces: [low_f(0), low_f(1), low_f(2)],
        })
    }
}
