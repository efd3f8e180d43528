use super::*;
use crate::problem::BasisScanLp;
use nalgebra::{dvector, DVector};

const EPS: f64 = 0.1;

fn tetra_rows() -> Vec<DVector<f64>> {
    vec![
        dvector![-1.0, 0.0, 0.0],
        dvector![0.0, -1.0, 0.0],
        dvector![0.0, 0.0, -1.0],
        dvector![1.0, 1.0, 1.0],
    ]
}

fn with_row(extra: DVector<f64>) -> Problem {
    let mut rows = tetra_rows();
    rows.push(extra);
    Problem::new(rows, EPS).unwrap()
}

fn cube() -> Problem {
    let mut rows = Vec::new();
    for i in 0..3 {
        let mut e = DVector::zeros(3);
        e[i] = 1.0;
        rows.push(e.clone());
        rows.push(-e);
    }
    Problem::prepare(rows, EPS, &BasisScanLp).unwrap()
}

/// Steps one row at a time, checking the mesh after each step.
fn run_checked(cutter: &mut IncrementalCutter) -> PolyMesh {
    cutter.mesh().check().unwrap();
    while cutter.step().unwrap() {
        cutter.mesh().check().unwrap();
    }
    cutter.run().unwrap()
}

#[test]
fn simplex_only_problem_needs_no_step() {
    let p = Problem::new(tetra_rows(), EPS).unwrap();
    let mut c = IncrementalCutter::new(&p).unwrap();
    assert_eq!(c.iter(), 4);
    assert!(c.is_done());
    assert!(!c.step().unwrap());
    let out = c.run().unwrap();
    assert_eq!(out.vertices.len(), 4);
    assert_eq!(out.faces.len(), 4);
    assert_eq!(out.components, 1);
}

#[test]
fn truncating_one_corner() {
    // corner 0 sits at x = 3·1.05 and is the only one beyond 0.5·x <= 1
    let p = with_row(dvector![0.5, 0.0, 0.0]);
    let mut c = IncrementalCutter::new(&p).unwrap();
    let out = run_checked(&mut c);
    assert_eq!(out.vertices.len(), 6);
    assert_eq!(out.edges, 9);
    assert_eq!(out.faces.len(), 5);
    let cap: Vec<&Vec<usize>> = out.faces.iter().filter(|f| f.len() == 3).collect();
    assert_eq!(cap.len(), 2);
    // new vertices sit on the crossing level 1 + eps/2
    let on_level = out
        .vertices
        .iter()
        .filter(|x| (0.5 * x[0] - (1.0 + EPS / 2.0)).abs() < 1e-12)
        .count();
    assert_eq!(on_level, 3);
}

#[test]
fn band_vertex_is_kept() {
    // corner 0 evaluates to exactly 1.05 on this row
    let p = with_row(dvector![1.0 / 3.0, 0.0, 0.0]);
    let corners = p.simplex_corners().unwrap();
    let mut c = IncrementalCutter::new(&p).unwrap();
    let out = run_checked(&mut c);
    assert_eq!(out.vertices.len(), 4);
    assert_eq!(out.faces.len(), 4);
    assert!((&out.vertices[0] - &corners[0]).norm() < 1e-12);
}

#[test]
fn band_boundaries_classify_as_zero() {
    let p = with_row(dvector![1.0, 0.0, 0.0]);
    let mut c = IncrementalCutter::new(&p).unwrap();
    let ids: Vec<VertexId> = c.mesh.vertex_ids().collect();
    let xs = [1.0, 1.0 + EPS, 0.5, 2.0];
    for (&v, &x) in ids.iter().zip(&xs) {
        c.mesh[v].point = dvector![x, 0.0, 0.0];
    }
    assert_eq!(c.set_signs(), (1, 2, 1));
    let signs: Vec<Sign> = ids.iter().map(|&v| c.mesh()[v].sign).collect();
    assert_eq!(signs, vec![Sign::Zero, Sign::Zero, Sign::Neg, Sign::Pos]);
}

#[test]
fn redundant_row_changes_nothing() {
    let p = with_row(dvector![0.1, 0.0, 0.0]);
    let mut c = IncrementalCutter::new(&p).unwrap();
    let out = run_checked(&mut c);
    assert_eq!(out.vertices.len(), 4);
    assert_eq!(out.edges, 6);
}

#[test]
fn triangle_truncation_in_2d() {
    let p = Problem::from_rows(
        &[
            vec![-1.0, 0.0],
            vec![0.0, -1.0],
            vec![1.0, 1.0],
            vec![1.0, 0.0],
        ],
        EPS,
    )
    .unwrap();
    let mut c = IncrementalCutter::new(&p).unwrap();
    let out = run_checked(&mut c);
    assert_eq!(out.vertices.len(), 4);
    assert_eq!(out.edges, 4);
    assert_eq!(out.faces.len(), 2);
    let valid: Vec<&Vec<usize>> = out.valid_faces().collect();
    assert_eq!(valid.len(), 1);
    assert_eq!(valid[0].len(), 4);
    let cut = out
        .vertices
        .iter()
        .filter(|x| (x[0] - 1.05).abs() < 1e-12)
        .count();
    assert_eq!(cut, 2);
}

#[test]
fn cube_has_eight_vertices_and_six_faces() {
    let p = cube();
    let mut c = IncrementalCutter::new(&p).unwrap();
    let out = run_checked(&mut c);
    assert_eq!(out.vertices.len(), 8);
    assert_eq!(out.faces.len(), 6);
    assert!(out.faces.iter().all(|f| f.len() == 4));
    for x in &out.vertices {
        assert!(x.iter().all(|&t| (t.abs() - 1.05).abs() < 1e-9), "{x}");
    }
    let t = c.timings();
    assert!(t.total >= t.cut);
}

#[test]
fn jittered_cube_stays_within_band() {
    let p = cube();
    let cfg = JitterCfg {
        sign: 0.5,
        crossing: 0.5,
        seed: 11,
    };
    let mut a = IncrementalCutter::with_cfg(&p, &cfg).unwrap();
    let out = run_checked(&mut a);
    assert_eq!(out.vertices.len(), 8);
    assert_eq!(out.faces.len(), 6);
    for x in &out.vertices {
        for r in p.rows() {
            assert!(r.dot(x) <= 1.0 + EPS);
        }
    }
    let mut b = IncrementalCutter::with_cfg(&p, &cfg).unwrap();
    assert_eq!(b.run().unwrap(), out);
}

#[test]
fn unprepared_singular_simplex_is_an_error() {
    let p = Problem::from_rows(&[vec![1.0, 0.0], vec![2.0, 0.0], vec![-1.0, -1.0]], EPS).unwrap();
    assert!(matches!(
        IncrementalCutter::new(&p),
        Err(CutterError::Problem(ProblemError::SingularSimplex { .. }))
    ));
}
