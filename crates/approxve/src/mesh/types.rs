//! Handles, signs and the three mesh records.

use std::fmt;

use nalgebra::DVector;

macro_rules! handle {
    ($name:ident, $tag:literal) => {
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub usize);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($tag, "({})"), self.0)
            }
        }
    };
}

handle!(VertexId, "v");
handle!(HalfEdgeId, "h");
handle!(FaceId, "f");

/// Position of a point relative to the ε-band of the current hyperplane.
///
/// Codes follow the ordering used for half-edge types: `Zero=0, Neg=1, Pos=2`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Sign {
    #[default]
    Zero,
    Neg,
    Pos,
}

impl Sign {
    #[inline]
    pub const fn code(self) -> u8 {
        match self {
            Sign::Zero => 0,
            Sign::Neg => 1,
            Sign::Pos => 2,
        }
    }

    /// `Neg` below `lower`, `Pos` above `upper`, `Zero` in between (inclusive).
    #[inline]
    pub fn classify(value: f64, lower: f64, upper: f64) -> Sign {
        if value < lower {
            Sign::Neg
        } else if value > upper {
            Sign::Pos
        } else {
            Sign::Zero
        }
    }
}

impl fmt::Display for Sign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Sign::Zero => "0",
            Sign::Neg => "-",
            Sign::Pos => "+",
        };
        f.write_str(s)
    }
}

/// Ordered pair (origin sign, target sign) of a half-edge; 9 codes `3·o + t`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct HeType {
    pub origin: Sign,
    pub target: Sign,
}

impl HeType {
    pub const ZERO_ZERO: HeType = HeType::new(Sign::Zero, Sign::Zero);
    pub const ZERO_NEG: HeType = HeType::new(Sign::Zero, Sign::Neg);
    pub const ZERO_POS: HeType = HeType::new(Sign::Zero, Sign::Pos);
    pub const NEG_ZERO: HeType = HeType::new(Sign::Neg, Sign::Zero);
    pub const NEG_NEG: HeType = HeType::new(Sign::Neg, Sign::Neg);
    pub const NEG_POS: HeType = HeType::new(Sign::Neg, Sign::Pos);
    pub const POS_ZERO: HeType = HeType::new(Sign::Pos, Sign::Zero);
    pub const POS_NEG: HeType = HeType::new(Sign::Pos, Sign::Neg);
    pub const POS_POS: HeType = HeType::new(Sign::Pos, Sign::Pos);

    #[inline]
    pub const fn new(origin: Sign, target: Sign) -> Self {
        Self { origin, target }
    }
    #[inline]
    pub const fn code(self) -> u8 {
        3 * self.origin.code() + self.target.code()
    }
    /// Type seen from the twin.
    #[inline]
    pub const fn mirrored(self) -> Self {
        Self::new(self.target, self.origin)
    }
    /// Strictly mixed (no zero endpoint): the edge crosses the whole band.
    #[inline]
    pub fn is_crossing(self) -> bool {
        self == Self::NEG_POS || self == Self::POS_NEG
    }
}

impl fmt::Display for HeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.origin, self.target)
    }
}

/// Mesh vertex.
#[derive(Clone, Debug)]
pub struct Vertex {
    pub point: DVector<f64>,
    pub sign: Sign,
    /// Any outgoing half-edge; `None` only transiently during surgery.
    pub halfedge: Option<HalfEdgeId>,
    /// Dense output index, valid after `HalfEdgeMesh::renumber_vertices`.
    pub index: usize,
}

/// Directed arc; always paired with its twin.
#[derive(Clone, Copy, Debug)]
pub struct HalfEdge {
    pub origin: VertexId,
    pub face: FaceId,
    pub twin: HalfEdgeId,
    pub next: HalfEdgeId,
    pub prev: HalfEdgeId,
    /// Identifies the undirected edge once per pair (self or twin).
    pub main: HalfEdgeId,
    pub kind: HeType,
}

/// Boundary loop of half-edges.
#[derive(Clone, Copy, Debug)]
pub struct Face {
    pub halfedge: Option<HalfEdgeId>,
    /// 1-based component index after `find_components`; 0 = unvisited.
    pub component: usize,
    /// Invalid faces are logical outer faces without geometry (2D outside).
    pub valid: bool,
}
