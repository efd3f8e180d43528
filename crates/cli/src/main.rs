mod export;
mod io;
mod provenance;

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{Context, Result};
use approxve::api::{symmetric_rows, SymmetricRowsParams};
use approxve::prelude::*;
use clap::{Parser, Subcommand, ValueEnum};
use polars::prelude::*;
use serde_json::json;
use tracing_subscriber::fmt::SubscriberBuilder;

use provenance::{write_sidecar, Payload};

#[derive(Parser)]
#[command(name = "approxve-cli")]
#[command(about = "Approximate vertex enumeration of 2D/3D polytopes")]
struct Cmd {
    #[command(subcommand)]
    action: Action,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Algo {
    /// Incremental cutter on a half-edge mesh
    Mesh,
    /// Reference double-description enumerator
    Ddm,
    /// Both, cross-checked
    Both,
}

#[derive(Subcommand)]
enum Action {
    /// Enumerate the vertices of `{x : A x <= 1}` for a CSV matrix `A`
    Run {
        #[arg(long)]
        input: PathBuf,
        #[arg(long, default_value_t = 1e-3)]
        eps: f64,
        #[arg(long, value_enum, default_value_t = Algo::Both)]
        algo: Algo,
        /// Output stem; writes `<out>.off` and/or `<out>.json`
        #[arg(long)]
        out: PathBuf,
        #[arg(long, default_value_t = 0.0)]
        sign_jitter: f64,
        #[arg(long, default_value_t = 0.0)]
        crossing_jitter: f64,
        #[arg(long, default_value_t = 0)]
        seed: u64,
        /// Point-set tolerance for the cross-check
        #[arg(long, default_value_t = 1e-7)]
        tol: f64,
    },
    /// Time both algorithms over eps = 10^(-j/4), j < steps
    Sweep {
        #[arg(long)]
        input: PathBuf,
        #[arg(long, default_value_t = 12)]
        steps: u32,
        #[arg(long)]
        out: PathBuf,
        #[arg(long, default_value_t = 1e-7)]
        tol: f64,
    },
    /// Write a random centrally symmetric matrix as CSV
    Sample {
        #[arg(long, default_value_t = 3)]
        dim: usize,
        #[arg(long, default_value_t = 10)]
        directions: usize,
        #[arg(long, default_value_t = 0)]
        seed: u64,
        #[arg(long)]
        out: PathBuf,
    },
    /// Print a small provenance JSON block
    Report,
}

fn main() -> Result<()> {
    SubscriberBuilder::default().with_target(false).init();
    let cmd = Cmd::parse();
    match cmd.action {
        Action::Run {
            input,
            eps,
            algo,
            out,
            sign_jitter,
            crossing_jitter,
            seed,
            tol,
        } => {
            let jitter = JitterCfg {
                sign: sign_jitter,
                crossing: crossing_jitter,
                seed,
            };
            run(&input, eps, algo, &out, &jitter, tol)
        }
        Action::Sweep {
            input,
            steps,
            out,
            tol,
        } => sweep(&input, steps, &out, tol),
        Action::Sample {
            dim,
            directions,
            seed,
            out,
        } => sample(dim, directions, seed, &out),
        Action::Report => report(),
    }
}

fn load_problem(input: &Path, eps: f64) -> Result<Problem> {
    let rows = io::load_matrix(input)?;
    Problem::prepare(rows, eps, &BasisScanLp)
        .with_context(|| format!("preprocessing {}", input.display()))
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
    }
    Ok(())
}

fn run(input: &Path, eps: f64, algo: Algo, out: &Path, jitter: &JitterCfg, tol: f64) -> Result<()> {
    tracing::info!(input = %input.display(), eps, ?algo, out = %out.display(), "run");
    let problem = load_problem(input, eps)?;
    ensure_parent(out)?;

    let mut params = json!({
        "input": input.to_string_lossy(),
        "eps": eps,
        "algo": format!("{algo:?}").to_lowercase(),
        "rows": problem.len(),
        "dim": problem.dim(),
        "sign_jitter": jitter.sign,
        "crossing_jitter": jitter.crossing,
        "seed": jitter.seed,
    });

    let mesh = if algo != Algo::Ddm {
        let mut cutter =
            IncrementalCutter::with_cfg(&problem, jitter).context("incremental cutter")?;
        let mesh = cutter.run().context("incremental cutter")?;
        let stats = cutter.mesh().stats().context("mesh statistics")?;
        params["mesh"] = json!({
            "vertices": stats.vertices,
            "edges": stats.edges,
            "faces": stats.faces,
            "valid_faces": stats.valid_faces,
            "components": stats.components,
            "bridges": stats.bridges,
            "low_degree_vertices": stats.low_degree_vertices,
            "low_degree_faces": stats.low_degree_faces,
        });
        Some(mesh)
    } else {
        None
    };
    let reference = if algo != Algo::Mesh {
        Some(ReferenceEnumerator::new(&problem)?.run())
    } else {
        None
    };

    let mut outputs = Vec::new();
    if let Some(mesh) = &mesh {
        let path = out.with_extension("off");
        export::save_off(&path, mesh)?;
        outputs.push(path);
    }
    if let Some(reference) = &reference {
        let path = out.with_extension("json");
        export::save_reference(&path, reference)?;
        outputs.push(path);
    }
    if let (Some(mesh), Some(reference)) = (&mesh, &reference) {
        let check = cross_check(mesh, reference, tol);
        tracing::info!(
            vertices = check.mesh_vertices,
            nodes = check.reference_nodes,
            agree = check.agrees(),
            max_distance = check.forward.max_distance.max(check.backward.max_distance),
            "cross-check"
        );
        params["agree"] = json!(check.agrees());
    }

    let mut outputs = outputs.into_iter();
    if let Some(primary) = outputs.next() {
        let payload = outputs.fold(Payload::new(params), Payload::with_output);
        write_sidecar(&primary, payload)?;
    }
    Ok(())
}

/// `10^(-j/4)` for `j < steps`.
fn sweep_eps(steps: u32) -> Vec<f64> {
    (0..steps).map(|j| 10f64.powf(-(j as f64) / 4.0)).collect()
}

fn sweep(input: &Path, steps: u32, out: &Path, tol: f64) -> Result<()> {
    tracing::info!(input = %input.display(), steps, out = %out.display(), "sweep");
    let rows = io::load_matrix(input)?;
    let eps_values = sweep_eps(steps);
    let mut time_ga = Vec::with_capacity(eps_values.len());
    let mut time_addm = Vec::with_capacity(eps_values.len());
    let mut vertices_ga = Vec::with_capacity(eps_values.len());
    let mut nodes_addm = Vec::with_capacity(eps_values.len());
    let mut agree = Vec::with_capacity(eps_values.len());

    for &eps in &eps_values {
        let problem = Problem::prepare(rows.clone(), eps, &BasisScanLp)
            .with_context(|| format!("preprocessing {} at eps {eps}", input.display()))?;

        let start = Instant::now();
        let mesh = IncrementalCutter::new(&problem)
            .and_then(|mut c| c.run())
            .with_context(|| format!("incremental cutter at eps {eps}"))?;
        let t_ga = start.elapsed().as_secs_f64();

        let reference = ReferenceEnumerator::new(&problem)?.run();
        let check = cross_check(&mesh, &reference, tol);
        tracing::info!(
            eps,
            time_ga = t_ga,
            time_addm = reference.elapsed.as_secs_f64(),
            agree = check.agrees(),
            "sweep point"
        );

        time_ga.push(t_ga);
        time_addm.push(reference.elapsed.as_secs_f64());
        vertices_ga.push(check.mesh_vertices as u64);
        nodes_addm.push(check.reference_nodes as u64);
        agree.push(check.agrees());
    }

    let mut df = df!(
        "eps" => &eps_values,
        "time_ga" => time_ga,
        "time_addm" => time_addm,
        "vertices_ga" => vertices_ga,
        "nodes_addm" => nodes_addm,
        "agree" => agree,
    )?;
    ensure_parent(out)?;
    io::write_csv(out, &mut df, true)?;
    write_sidecar(
        out,
        Payload::new(json!({
            "input": input.to_string_lossy(),
            "steps": steps,
            "tol": tol,
        })),
    )?;
    Ok(())
}

fn sample(dim: usize, directions: usize, seed: u64, out: &Path) -> Result<()> {
    let params = SymmetricRowsParams {
        dim,
        directions,
        ..SymmetricRowsParams::default()
    };
    let rows = symmetric_rows(&params, seed).context("sampling rows")?;
    ensure_parent(out)?;
    io::save_matrix(out, &rows)?;
    tracing::info!(rows = rows.len(), dim, seed, out = %out.display(), "sample written");
    write_sidecar(
        out,
        Payload::new(json!({
            "dim": dim,
            "directions": directions,
            "radius_min": params.radius_min,
            "radius_max": params.radius_max,
            "seed": seed,
        })),
    )?;
    Ok(())
}

fn report() -> Result<()> {
    let doc = provenance::document(json!({}), &[]);
    println!("{}", serde_json::to_string_pretty(&doc)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const CUBE: &str = "1,0,0\n-1,0,0\n0,1,0\n0,-1,0\n0,0,1\n0,0,-1\n";

    #[test]
    fn sweep_eps_is_quarter_decades() {
        let e = sweep_eps(5);
        assert_eq!(e.len(), 5);
        assert_eq!(e[0], 1.0);
        assert!((e[4] - 0.1).abs() < 1e-15);
        assert!(e.windows(2).all(|w| w[1] < w[0]));
    }

    #[test]
    fn run_both_writes_off_json_and_sidecar() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("cube.csv");
        fs::write(&input, CUBE).unwrap();
        let out = dir.path().join("out").join("cube");
        run(&input, 0.01, Algo::Both, &out, &JitterCfg::default(), 1e-7).unwrap();

        let off = fs::read_to_string(dir.path().join("out/cube.off")).unwrap();
        assert!(off.starts_with("OFF\n\n8 6 12\n"), "{off}");
        let json: serde_json::Value =
            serde_json::from_slice(&fs::read(dir.path().join("out/cube.json")).unwrap()).unwrap();
        assert_eq!(json["nodes"].as_array().unwrap().len(), 8);
        let prov: serde_json::Value = serde_json::from_slice(
            &fs::read(dir.path().join("out/cube.provenance.json")).unwrap(),
        )
        .unwrap();
        assert_eq!(prov["params"]["agree"], true);
        let stats = &prov["params"]["mesh"];
        assert_eq!(stats["vertices"], 8);
        assert_eq!(stats["valid_faces"], 6);
        assert_eq!(stats["components"], 1);
        assert_eq!(stats["bridges"], 0);
        assert_eq!(prov["outputs"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn sample_then_sweep() {
        let dir = tempdir().unwrap();
        let matrix = dir.path().join("sample.csv");
        sample(3, 6, 7, &matrix).unwrap();
        assert_eq!(io::load_matrix(&matrix).unwrap().len(), 12);

        let table = dir.path().join("sweep.csv");
        sweep(&matrix, 3, &table, 1e-6).unwrap();
        let text = fs::read_to_string(&table).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("eps,time_ga,time_addm,vertices_ga,nodes_addm,agree")
        );
        assert_eq!(lines.count(), 3);
        assert!(dir.path().join("sweep.provenance.json").exists());
    }

    #[test]
    fn missing_input_is_reported() {
        let dir = tempdir().unwrap();
        let err = run(
            &dir.path().join("nope.csv"),
            0.1,
            Algo::Mesh,
            &dir.path().join("x"),
            &JitterCfg::default(),
            1e-7,
        )
        .unwrap_err();
        assert!(format!("{err:#}").contains("nope.csv"));
    }
}
