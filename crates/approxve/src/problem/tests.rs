use super::*;
use nalgebra::dvector;

fn cube_rows() -> Vec<DVector<f64>> {
    vec![
        dvector![1.0, 0.0, 0.0],
        dvector![-1.0, 0.0, 0.0],
        dvector![0.0, 1.0, 0.0],
        dvector![0.0, -1.0, 0.0],
        dvector![0.0, 0.0, 1.0],
        dvector![0.0, 0.0, -1.0],
    ]
}

#[test]
fn shape_errors_are_reported() {
    assert_eq!(
        Problem::from_rows(&[vec![1.0, 0.0], vec![0.0, 1.0]], 0.1).unwrap_err(),
        ProblemError::TooFewRows {
            rows: 2,
            required: 3
        }
    );
    assert_eq!(
        Problem::from_rows(&vec![vec![1.0; 4]; 6], 0.1).unwrap_err(),
        ProblemError::Dimension { dim: 4 }
    );
    assert!(matches!(
        Problem::from_rows(&[vec![1.0, 0.0], vec![0.0, 1.0, 2.0], vec![1.0, 1.0]], 0.1),
        Err(ProblemError::RaggedRow { row: 1, .. })
    ));
    assert!(matches!(
        Problem::from_rows(&[vec![1.0, 0.0], vec![0.0, 1.0], vec![-1.0, -1.0]], 0.0),
        Err(ProblemError::InvalidEps { .. })
    ));
    assert!(matches!(
        Problem::from_rows(&[vec![1.0, 0.0], vec![f64::NAN, 1.0], vec![-1.0, -1.0]], 0.1),
        Err(ProblemError::NonFinite { row: 1 })
    ));
}

#[test]
fn prepare_rejects_rank_deficient() {
    // every normal lies in the xy-plane
    let rows = vec![
        dvector![1.0, 0.0, 0.0],
        dvector![0.0, 1.0, 0.0],
        dvector![-1.0, -1.0, 0.0],
        dvector![1.0, 1.0, 0.0],
    ];
    assert_eq!(
        Problem::prepare(rows, 0.1, &BasisScanLp).unwrap_err(),
        ProblemError::RankDeficient { rank: 2, dim: 3 }
    );
}

#[test]
fn prepare_rejects_unbounded() {
    // half-plane strip: -1 <= y <= 1, x <= 1
    let rows = vec![dvector![1.0, 0.0], dvector![0.0, 1.0], dvector![0.0, -1.0]];
    assert_eq!(
        Problem::prepare(rows, 0.1, &BasisScanLp).unwrap_err(),
        ProblemError::Unbounded
    );
}

#[test]
fn prepare_cube_orders_rows_and_adds_bounding_row() {
    let p = Problem::prepare(cube_rows(), 0.1, &BasisScanLp).unwrap();
    assert_eq!(p.dim(), 3);
    assert_eq!(p.len(), 7);
    // leading rows: +x, +y, +z (first independent triple)
    assert_eq!(p.row(0), &dvector![1.0, 0.0, 0.0]);
    assert_eq!(p.row(1), &dvector![0.0, 1.0, 0.0]);
    assert_eq!(p.row(2), &dvector![0.0, 0.0, 1.0]);
    // bounding row: (1,1,1) / (-3 - 1)
    assert!((p.row(3) - dvector![-0.25, -0.25, -0.25]).norm() < 1e-12);
    // the displaced row moved to the end
    assert_eq!(p.row(6), &dvector![-1.0, 0.0, 0.0]);
}

#[test]
fn simplex_strictly_contains_cube() {
    let p = Problem::prepare(cube_rows(), 0.1, &BasisScanLp).unwrap();
    let corners = p.simplex_corners().unwrap();
    assert_eq!(corners.len(), 4);
    // each corner is tight (at 1+eps/2) on the three rows that define it
    let level = 1.0 + p.eps() / 2.0;
    for (i, c) in corners.iter().enumerate() {
        for k in (0..=3).filter(|&k| k != i) {
            assert!((p.row(k).dot(c) - level).abs() < 1e-9);
        }
    }
    // every cube vertex satisfies the simplex rows with slack
    for sx in [-1.0, 1.0] {
        for sy in [-1.0, 1.0] {
            for sz in [-1.0, 1.0] {
                let v = dvector![sx, sy, sz];
                for k in 0..=3 {
                    assert!(p.row(k).dot(&v) <= 1.0);
                }
            }
        }
    }
}

#[test]
fn large_cube_prepares_like_unit_cube() {
    // half-width 1e4
    let rows: Vec<DVector<f64>> = cube_rows().into_iter().map(|r| r * 1e-4).collect();
    let p = Problem::prepare(rows, 0.1, &BasisScanLp).unwrap();
    assert_eq!(p.len(), 7);
    assert!((p.row(3) - dvector![-2.5e-5, -2.5e-5, -2.5e-5]).norm() < 1e-15);
    let corners = p.simplex_corners().unwrap();
    let level = 1.0 + p.eps() / 2.0;
    for (i, c) in corners.iter().enumerate() {
        for k in (0..=3).filter(|&k| k != i) {
            assert!((p.row(k).dot(c) - level).abs() < 1e-9);
        }
    }
}

#[test]
fn prepare_square_in_2d() {
    let rows = vec![
        dvector![1.0, 0.0],
        dvector![-1.0, 0.0],
        dvector![0.0, 1.0],
        dvector![0.0, -1.0],
    ];
    let p = Problem::prepare(rows, 0.05, &BasisScanLp).unwrap();
    assert_eq!(p.len(), 5);
    assert_eq!(p.row(0), &dvector![1.0, 0.0]);
    assert_eq!(p.row(1), &dvector![0.0, 1.0]);
    // (1,1) / (-2 - 1)
    assert!((p.row(2) - dvector![-1.0 / 3.0, -1.0 / 3.0]).norm() < 1e-12);
    assert_eq!(p.simplex_corners().unwrap().len(), 3);
}

#[test]
fn singular_simplex_is_reported() {
    // rows 0 and 1 are parallel: corner 2 has no solution
    let p = Problem::from_rows(
        &[vec![1.0, 0.0], vec![2.0, 0.0], vec![-1.0, -1.0]],
        0.1,
    )
    .unwrap();
    assert_eq!(
        p.simplex_corners().unwrap_err(),
        ProblemError::SingularSimplex { corner: 2 }
    );
}

#[test]
fn with_eps_keeps_rows() {
    let p = Problem::prepare(cube_rows(), 0.1, &BasisScanLp).unwrap();
    let q = p.with_eps(0.01).unwrap();
    assert_eq!(q.rows(), p.rows());
    assert!((q.eps() - 0.01).abs() < 1e-15);
}
