//! File formats for enumeration results.
//!
//! - OFF for the cutter mesh: `OFF`, a blank line, `V F E`, one vertex per
//!   line (z = 0 for planar meshes), then one line per valid face with a
//!   trailing RGBA colour. Component 1 is grey; every other component gets a
//!   colour drawn from an RNG seeded with its index, so colours are stable
//!   across runs.
//! - JSON for the reference enumerator.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use approxve::prelude::{PolyMesh, ReferenceOutput};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;

const ALPHA: f64 = 0.2;
const GREY: f64 = 0.4;

pub fn write_off<W: Write>(mesh: &PolyMesh, mut w: W) -> std::io::Result<()> {
    let valid = mesh.face_valid.iter().filter(|&&v| v).count();
    write!(w, "OFF\n\n")?;
    writeln!(w, "{} {} {}", mesh.vertices.len(), valid, mesh.edges)?;
    for p in &mesh.vertices {
        let z = if mesh.dim == 3 { p[2] } else { 0.0 };
        writeln!(w, "{} {} {}", p[0], p[1], z)?;
    }
    for (i, face) in mesh.faces.iter().enumerate() {
        if !mesh.face_valid[i] {
            continue;
        }
        write!(w, "{} ", face.len())?;
        for idx in face {
            write!(w, "{idx} ")?;
        }
        let [r, g, b] = face_colour(mesh.face_components[i]);
        writeln!(w, " {r} {g} {b} {ALPHA}")?;
    }
    Ok(())
}

fn face_colour(component: usize) -> [f64; 3] {
    if component > 1 {
        let mut rng = StdRng::seed_from_u64(component as u64);
        [rng.gen(), rng.gen(), rng.gen()]
    } else {
        [GREY; 3]
    }
}

pub fn save_off(path: &Path, mesh: &PolyMesh) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut w = BufWriter::new(file);
    write_off(mesh, &mut w).with_context(|| format!("writing {}", path.display()))?;
    w.flush()?;
    Ok(())
}

#[derive(Serialize)]
struct FacetDoc<'a> {
    row: usize,
    nodes: &'a [usize],
}

#[derive(Serialize)]
struct ReferenceDoc<'a> {
    dim: usize,
    elapsed_secs: f64,
    nodes: Vec<&'a [f64]>,
    facets: Vec<FacetDoc<'a>>,
}

pub fn reference_json(out: &ReferenceOutput) -> serde_json::Result<serde_json::Value> {
    let doc = ReferenceDoc {
        dim: out.dim,
        elapsed_secs: out.elapsed.as_secs_f64(),
        nodes: out.nodes.iter().map(|p| p.as_slice()).collect(),
        facets: out
            .facets
            .iter()
            .map(|f| FacetDoc {
                row: f.row,
                nodes: &f.nodes,
            })
            .collect(),
    };
    serde_json::to_value(doc)
}

pub fn save_reference(path: &Path, out: &ReferenceOutput) -> Result<()> {
    let bytes = serde_json::to_vec_pretty(&reference_json(out)?)?;
    std::fs::write(path, bytes).with_context(|| format!("writing {}", path.display()))
}
