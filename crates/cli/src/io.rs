//! Matrix input and table output through polars.

use std::fs::File;
use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use approxve::prelude::DVector;
use polars::prelude::*;

/// Headerless, comma-separated matrix: one inequality row `a_i` per line.
pub fn load_matrix(path: &Path) -> Result<Vec<DVector<f64>>> {
    let df = LazyCsvReader::new(path)
        .with_has_header(false)
        .finish()
        .with_context(|| format!("opening {}", path.display()))?
        .collect()
        .with_context(|| format!("parsing {}", path.display()))?;
    let (height, width) = df.shape();
    if height == 0 || width == 0 {
        bail!("{} holds no matrix", path.display());
    }
    let mut rows = vec![DVector::zeros(width); height];
    for (j, col) in df.get_columns().iter().enumerate() {
        let col = col
            .cast(&DataType::Float64)
            .with_context(|| format!("column {j} is not numeric"))?;
        for (i, v) in col.f64()?.into_iter().enumerate() {
            rows[i][j] = v.ok_or_else(|| anyhow!("missing entry at row {i}, column {j}"))?;
        }
    }
    tracing::info!(rows = height, cols = width, "matrix loaded");
    Ok(rows)
}

/// Writes rows as a headerless CSV readable by `load_matrix`.
pub fn save_matrix(path: &Path, rows: &[DVector<f64>]) -> Result<()> {
    let width = rows.first().map_or(0, |r| r.len());
    let columns: Vec<Series> = (0..width)
        .map(|j| {
            let values: Vec<f64> = rows.iter().map(|r| r[j]).collect();
            Series::new(format!("column_{}", j + 1).into(), values)
        })
        .collect();
    let mut df = DataFrame::new(columns)?;
    write_csv(path, &mut df, false)
}

pub fn write_csv(path: &Path, df: &mut DataFrame, header: bool) -> Result<()> {
    let mut file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    CsvWriter::new(&mut file)
        .include_header(header)
        .finish(df)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}
