//! Half-edge boundary mesh of a 2D or 3D polytope (arena storage, typed handles).
//!
//! Purpose
//! - Represent the current approximation as vertices, paired half-edges and
//!   faces with O(1) local surgery: split an edge, split a face, remove an edge.
//! - Expose the queries the cutter and the exporters need (components, degree
//!   filters, per-face vertex loops) plus a full consistency check.
//!
//! Why this design
//! - Entities live in `Vec<Option<_>>` slots addressed by `VertexId`,
//!   `HalfEdgeId` and `FaceId`. Removal empties a slot; slots are never reused,
//!   so slot order equals creation order and iteration is deterministic.
//! - Relations are plain handles; `mesh[h].next` reads like the pointer
//!   version without shared ownership.
//! - Indexing a dead handle panics like slice indexing. Public surgery entry
//!   points validate their arguments and report `MeshError` instead.
//! - Every traversal is bounded by the live half-edge count; a corrupted
//!   structure yields `MeshError::WalkOverrun` instead of hanging.
//!
//! Conventions
//! - Each face is a closed `next` loop; `prev` is its inverse.
//! - `twin(twin(h)) == h`; `main` is the same member for both halves.
//! - 2D meshes carry an invalid face standing for the outside of the polygon.
//!
//! Code cross-refs: `cutter` (all surgery), `export` in the CLI (`PolyMesh`).

mod build;
mod check;
mod query;
mod surgery;
pub mod types;

use std::fmt;
use std::ops::{Index, IndexMut};

use nalgebra::DVector;

pub use surgery::EdgeRemoval;
pub use types::{Face, FaceId, HalfEdge, HalfEdgeId, HeType, Sign, Vertex, VertexId};

/// Structural failures of the mesh.
#[derive(Debug, Clone, PartialEq)]
pub enum MeshError {
    Dimension { dim: usize },
    CornerCount { expected: usize, got: usize },
    DeadVertex(VertexId),
    DeadHalfEdge(HalfEdgeId),
    DeadFace(FaceId),
    /// A relation points to an entity that is not live.
    BrokenLink { halfedge: HalfEdgeId, link: &'static str },
    HalfEdgeCoupling { halfedge: HalfEdgeId, relation: &'static str },
    FaceCoupling(FaceId),
    VertexCoupling(VertexId),
    /// Faces referenced by half-edges differ from the live faces.
    FaceLinks,
    /// Vertices referenced by half-edges differ from the live vertices.
    VertexLinks,
    Euler {
        vertices: usize,
        edges: usize,
        faces: usize,
        components: usize,
    },
    WalkOverrun { start: HalfEdgeId, limit: usize },
}

impl fmt::Display for MeshError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dimension { dim } => write!(f, "mesh dimension must be 2 or 3, got {dim}"),
            Self::CornerCount { expected, got } => {
                write!(f, "simplex needs {expected} corners, got {got}")
            }
            Self::DeadVertex(v) => write!(f, "{v} is not a live vertex"),
            Self::DeadHalfEdge(h) => write!(f, "{h} is not a live half-edge"),
            Self::DeadFace(x) => write!(f, "{x} is not a live face"),
            Self::BrokenLink { halfedge, link } => {
                write!(f, "{halfedge}: {link} points to a removed entity")
            }
            Self::HalfEdgeCoupling { halfedge, relation } => {
                write!(f, "half-edge coupling broken at {halfedge} ({relation})")
            }
            Self::FaceCoupling(x) => write!(f, "face coupling broken at {x}"),
            Self::VertexCoupling(v) => write!(f, "vertex coupling broken at {v}"),
            Self::FaceLinks => write!(f, "faces referenced by half-edges differ from live faces"),
            Self::VertexLinks => {
                write!(f, "vertices referenced by half-edges differ from live vertices")
            }
            Self::Euler {
                vertices,
                edges,
                faces,
                components,
            } => write!(
                f,
                "Euler characteristic violated: V={vertices} E={edges} F={faces} components={components}"
            ),
            Self::WalkOverrun { start, limit } => {
                write!(f, "walk from {start} exceeded {limit} steps")
            }
        }
    }
}

impl std::error::Error for MeshError {}

/// Arena-backed half-edge mesh.
#[derive(Clone, Debug)]
pub struct HalfEdgeMesh {
    dim: usize,
    vertices: Vec<Option<Vertex>>,
    halfedges: Vec<Option<HalfEdge>>,
    faces: Vec<Option<Face>>,
    live_vertices: usize,
    live_halfedges: usize,
    live_faces: usize,
    /// One representative half-edge per component, set by `find_components`.
    components: Vec<HalfEdgeId>,
}

/// Dense, export-ready copy of the mesh.
#[derive(Clone, Debug, PartialEq)]
pub struct PolyMesh {
    pub dim: usize,
    pub vertices: Vec<DVector<f64>>,
    /// Vertex indices per face, in boundary order.
    pub faces: Vec<Vec<usize>>,
    pub face_valid: Vec<bool>,
    /// 1-based component of each face (0 if components were never computed).
    pub face_components: Vec<usize>,
    pub components: usize,
    pub edges: usize,
}

impl PolyMesh {
    /// Faces with geometry (drops the 2D outside face).
    pub fn valid_faces(&self) -> impl Iterator<Item = &Vec<usize>> + '_ {
        self.faces
            .iter()
            .zip(&self.face_valid)
            .filter_map(|(f, &ok)| ok.then_some(f))
    }
}

/// Summary counts used for logging and reports.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MeshStats {
    pub vertices: usize,
    pub edges: usize,
    pub faces: usize,
    pub valid_faces: usize,
    pub components: usize,
    pub bridges: usize,
    /// Vertices of degree 0, 1, 2.
    pub low_degree_vertices: [usize; 3],
    /// Faces of degree 0, 1, 2.
    pub low_degree_faces: [usize; 3],
}

impl HalfEdgeMesh {
    #[inline]
    pub fn dim(&self) -> usize {
        self.dim
    }
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.live_vertices
    }
    #[inline]
    pub fn halfedge_count(&self) -> usize {
        self.live_halfedges
    }
    /// Undirected edges.
    #[inline]
    pub fn edge_count(&self) -> usize {
        self.live_halfedges / 2
    }
    #[inline]
    pub fn face_count(&self) -> usize {
        self.live_faces
    }

    pub fn vertex(&self, v: VertexId) -> Option<&Vertex> {
        self.vertices.get(v.0).and_then(Option::as_ref)
    }
    pub fn halfedge(&self, h: HalfEdgeId) -> Option<&HalfEdge> {
        self.halfedges.get(h.0).and_then(Option::as_ref)
    }
    pub fn face(&self, f: FaceId) -> Option<&Face> {
        self.faces.get(f.0).and_then(Option::as_ref)
    }

    /// Live vertices in creation order.
    pub fn vertex_ids(&self) -> impl Iterator<Item = VertexId> + '_ {
        live_slots(&self.vertices).map(VertexId)
    }
    /// Live half-edges in creation order.
    pub fn halfedge_ids(&self) -> impl Iterator<Item = HalfEdgeId> + '_ {
        live_slots(&self.halfedges).map(HalfEdgeId)
    }
    /// Live faces in creation order.
    pub fn face_ids(&self) -> impl Iterator<Item = FaceId> + '_ {
        live_slots(&self.faces).map(FaceId)
    }
    /// The `main` half-edge of every undirected edge, in creation order.
    pub fn edges(&self) -> impl Iterator<Item = HalfEdgeId> + '_ {
        self.halfedge_ids().filter(|&h| self[h].main == h)
    }

    #[inline]
    pub fn next(&self, h: HalfEdgeId) -> HalfEdgeId {
        self[h].next
    }
    #[inline]
    pub fn prev(&self, h: HalfEdgeId) -> HalfEdgeId {
        self[h].prev
    }
    #[inline]
    pub fn twin(&self, h: HalfEdgeId) -> HalfEdgeId {
        self[h].twin
    }
    #[inline]
    pub fn origin(&self, h: HalfEdgeId) -> VertexId {
        self[h].origin
    }
    #[inline]
    pub fn target(&self, h: HalfEdgeId) -> VertexId {
        self[self[h].twin].origin
    }
    #[inline]
    pub fn face_of(&self, h: HalfEdgeId) -> FaceId {
        self[h].face
    }

    /// Upper bound on the length of any loop in the current mesh.
    #[inline]
    pub(crate) fn walk_limit(&self) -> usize {
        self.live_halfedges + 1
    }

    pub(crate) fn require_vertex(&self, v: VertexId) -> Result<(), MeshError> {
        self.vertex(v).map(|_| ()).ok_or(MeshError::DeadVertex(v))
    }
    pub(crate) fn require_halfedge(&self, h: HalfEdgeId) -> Result<(), MeshError> {
        self.halfedge(h).map(|_| ()).ok_or(MeshError::DeadHalfEdge(h))
    }
    pub(crate) fn require_face(&self, f: FaceId) -> Result<(), MeshError> {
        self.face(f).map(|_| ()).ok_or(MeshError::DeadFace(f))
    }
}

fn live_slots<T>(slots: &[Option<T>]) -> impl Iterator<Item = usize> + '_ {
    slots
        .iter()
        .enumerate()
        .filter_map(|(i, s)| s.as_ref().map(|_| i))
}

macro_rules! arena_index {
    ($id:ty, $out:ty, $field:ident, $what:literal) => {
        impl Index<$id> for HalfEdgeMesh {
            type Output = $out;
            #[track_caller]
            fn index(&self, id: $id) -> &$out {
                match self.$field.get(id.0) {
                    Some(Some(x)) => x,
                    _ => panic!(concat!("dead ", $what, " handle {}"), id),
                }
            }
        }
        impl IndexMut<$id> for HalfEdgeMesh {
            #[track_caller]
            fn index_mut(&mut self, id: $id) -> &mut $out {
                match self.$field.get_mut(id.0) {
                    Some(Some(x)) => x,
                    _ => panic!(concat!("dead ", $what, " handle {}"), id),
                }
            }
        }
    };
}

arena_index!(VertexId, Vertex, vertices, "vertex");
arena_index!(HalfEdgeId, HalfEdge, halfedges, "half-edge");
arena_index!(FaceId, Face, faces, "face");
