//! Face cutting and removal of the discarded part.

use crate::mesh::{HalfEdgeId, HeType, MeshError, Sign};

use super::{CutterError, IncrementalCutter};

impl IncrementalCutter {
    /// Closes every `+0 ... 0+` run with diagonals, then deletes the `+` side.
    ///
    /// Walking a valid face from a `+0` half-edge, each `0+` half-edge found
    /// is joined to the current `+0` position by a diagonal, and the next
    /// `+0` is joined back, until the walk returns to the starting `+0`.
    /// Afterwards every edge at a `+` vertex is removed, and faces left with
    /// two edges are collapsed.
    pub(super) fn cut(&mut self) -> Result<(), CutterError> {
        let mesh = &self.mesh;
        let mut out_cuts: Vec<HalfEdgeId> = mesh
            .halfedge_ids()
            .filter(|&h| mesh[h].kind == HeType::POS_ZERO && mesh[mesh.face_of(h)].valid)
            .collect();

        while let Some(&he) = out_cuts.first() {
            self.close_face_from(he, &mut out_cuts)?;
        }

        for v in self.mesh.vertex_ids().collect::<Vec<_>>() {
            if self.mesh.vertex(v).map_or(true, |x| x.sign != Sign::Pos) {
                continue;
            }
            while let Some(h) = self.mesh.vertex(v).and_then(|x| x.halfedge) {
                self.mesh.remove_edge(h)?;
            }
        }

        for f in self.mesh.faces_of_degree(2) {
            if let Some(h) = self.mesh.face(f).and_then(|x| x.halfedge) {
                self.mesh.remove_edge(h)?;
            }
        }
        Ok(())
    }

    /// One face walk starting at the `+0` half-edge `he`.
    ///
    /// Every `+0` met on the way (including `he`) leaves `out_cuts`.
    fn close_face_from(
        &mut self,
        he: HalfEdgeId,
        out_cuts: &mut Vec<HalfEdgeId>,
    ) -> Result<(), CutterError> {
        let mesh = &mut self.mesh;
        let mut steps = 0usize;
        let mut tick = |limit: usize| {
            steps += 1;
            if steps > 2 * limit {
                Err(MeshError::WalkOverrun { start: he, limit })
            } else {
                Ok(())
            }
        };

        let mut ho = mesh.next(he);
        loop {
            let mut hi = ho;
            while mesh[hi].kind != HeType::ZERO_POS {
                tick(mesh.walk_limit())?;
                hi = mesh.next(hi);
            }
            mesh.split_face(hi, ho)?;

            ho = mesh.next(hi);
            while mesh[ho].kind != HeType::POS_ZERO {
                tick(mesh.walk_limit())?;
                ho = mesh.next(ho);
            }
            if let Some(k) = out_cuts.iter().position(|&x| x == ho) {
                out_cuts.remove(k);
            }
            if ho == he {
                return Ok(());
            }
            ho = mesh.next(ho);
            mesh.split_face(ho, hi)?;
        }
    }
}
