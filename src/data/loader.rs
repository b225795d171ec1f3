use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::de::DeserializeOwned;

use super::model::{Datasets, FactorLoadingMatrix, SimulationRun, TrafficWeatherRecord};
use crate::error::LoadError;

/// Merged weather + traffic observations.
pub const TRAFFIC_FILE: &str = "final_merged_dataset.csv";
/// Monte Carlo output, one row per run.
pub const SIMULATION_FILE: &str = "simulation_results.csv";
/// Factor loadings; first column is the variable name.
pub const FACTORS_FILE: &str = "factor_analysis_loadings.csv";

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load all three dashboard tables from `dir`.
///
/// All or nothing: the first file that is missing or does not parse aborts
/// the load and is named in the returned error.
pub fn load_datasets(dir: &Path) -> Result<Datasets, LoadError> {
    let traffic = load_one(dir, TRAFFIC_FILE, |p| {
        load_records(p, TrafficWeatherRecord::validate)
    })?;
    let simulation = load_one(dir, SIMULATION_FILE, |p| {
        load_records(p, SimulationRun::validate)
    })?;
    let factors = load_one(dir, FACTORS_FILE, load_factor_matrix)?;

    log::info!(
        "Loaded {} traffic records, {} simulation runs, {} variables x {} factors from {}",
        traffic.len(),
        simulation.len(),
        factors.variables().len(),
        factors.factors().len(),
        dir.display()
    );

    Ok(Datasets {
        traffic,
        simulation,
        factors,
    })
}

/// Run one file loader and fold its error into [`LoadError`].
fn load_one<T>(
    dir: &Path,
    file: &'static str,
    load: impl FnOnce(&Path) -> Result<T>,
) -> Result<T, LoadError> {
    let path = dir.join(file);
    log::debug!("Reading {}", path.display());
    load(&path).map_err(|e| LoadError::MissingInputFile {
        file,
        path: path.clone(),
        reason: format!("{e:#}"),
    })
}

// ---------------------------------------------------------------------------
// Record tables (traffic, simulation)
// ---------------------------------------------------------------------------

/// Deserialize every row of a headed CSV into `T` and validate it.
/// Columns not named by `T` are ignored.
fn load_records<T: DeserializeOwned>(
    path: &Path,
    validate: impl Fn(&T) -> std::result::Result<(), String>,
) -> Result<Vec<T>> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let mut rows = Vec::new();

    for (row_no, result) in reader.deserialize::<T>().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        if let Err(msg) = validate(&record) {
            bail!("CSV row {row_no}: {msg}");
        }
        rows.push(record);
    }

    Ok(rows)
}

// ---------------------------------------------------------------------------
// Factor loadings
// ---------------------------------------------------------------------------

/// CSV layout: header row whose first cell names the index (often blank)
/// and whose remaining cells are factor names. Each data row holds the
/// variable name followed by one float per factor. Empty cells are errors.
fn load_factor_matrix(path: &Path) -> Result<FactorLoadingMatrix> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let headers = reader.headers().context("reading CSV headers")?.clone();

    if headers.len() < 2 {
        bail!("expected an index column and at least one factor column");
    }
    let factors: Vec<String> = headers.iter().skip(1).map(|h| h.trim().to_string()).collect();

    let mut variables = Vec::new();
    let mut loadings = Vec::new();

    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        let name = record
            .get(0)
            .with_context(|| format!("CSV row {row_no}: missing variable name"))?;

        let row = record
            .iter()
            .skip(1)
            .zip(&factors)
            .map(|(cell, factor)| parse_loading(cell, row_no, factor))
            .collect::<Result<Vec<f64>>>()?;

        variables.push(name.trim().to_string());
        loadings.push(row);
    }

    FactorLoadingMatrix::new(variables, factors, loadings).map_err(anyhow::Error::msg)
}

fn parse_loading(cell: &str, row: usize, factor: &str) -> Result<f64> {
    let tok = cell.trim();
    if tok.is_empty() {
        bail!("CSV row {row}, {factor}: missing loading");
    }
    let value = tok
        .parse::<f64>()
        .with_context(|| format!("CSV row {row}, {factor}: '{tok}' is not a number"))?;
    if !value.is_finite() {
        bail!("CSV row {row}, {factor}: loading {value} is not finite");
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &Path, name: &str, body: &str) {
        fs::write(dir.join(name), body).unwrap();
    }

    #[test]
    fn factor_matrix_uses_first_column_as_index() {
        let tmp = TempDir::new().unwrap();
        write(
            tmp.path(),
            FACTORS_FILE,
            ",Factor1,Factor2\nrain_mm,0.91,-0.05\navg_speed_kmh,-0.12,0.88\n",
        );
        let m = load_factor_matrix(&tmp.path().join(FACTORS_FILE)).unwrap();
        assert_eq!(m.factors(), ["Factor1", "Factor2"]);
        assert_eq!(m.variables(), ["rain_mm", "avg_speed_kmh"]);
        assert_eq!(m.rows()[1], vec![-0.12, 0.88]);
    }

    #[test]
    fn factor_matrix_rejects_empty_cell() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), FACTORS_FILE, ",Factor1,Factor2\nrain_mm,0.91,\n");
        let err = load_factor_matrix(&tmp.path().join(FACTORS_FILE)).unwrap_err();
        assert!(format!("{err:#}").contains("missing loading"));
    }

    #[test]
    fn factor_matrix_rejects_short_row() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), FACTORS_FILE, ",Factor1,Factor2\nrain_mm,0.91\n");
        assert!(load_factor_matrix(&tmp.path().join(FACTORS_FILE)).is_err());
    }

    #[test]
    fn traffic_ignores_extra_columns() {
        let tmp = TempDir::new().unwrap();
        write(
            tmp.path(),
            TRAFFIC_FILE,
            "timestamp,rain_mm,avg_speed_kmh,congestion_level,weather_condition,accident_count,vehicle_count,visibility_km\n\
             2024-01-01 08:00,2.5,41.0,Medium,Rain,1,320,8.0\n",
        );
        let rows: Vec<TrafficWeatherRecord> =
            load_records(&tmp.path().join(TRAFFIC_FILE), TrafficWeatherRecord::validate).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].weather_condition, "Rain");
        assert_eq!(rows[0].vehicle_count, 320);
    }

    #[test]
    fn simulation_rejects_risk_above_one() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), SIMULATION_FILE, "congestion_risk\n0.2\n1.5\n");
        let err = load_records::<SimulationRun>(
            &tmp.path().join(SIMULATION_FILE),
            SimulationRun::validate,
        )
        .unwrap_err();
        assert!(format!("{err:#}").contains("CSV row 1"));
    }
}
