use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// TrafficWeatherRecord – one row of the merged weather/traffic dataset
// ---------------------------------------------------------------------------

/// A single observation from `final_merged_dataset.csv`.
///
/// Only the columns the dashboard reads are declared here; any other column
/// in the file is ignored during deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrafficWeatherRecord {
    /// Rainfall in millimetres.
    pub rain_mm: f64,
    /// Average traffic speed in km/h.
    pub avg_speed_kmh: f64,
    /// Categorical congestion label, kept as text.
    pub congestion_level: String,
    /// Categorical weather label, kept as text.
    pub weather_condition: String,
    pub accident_count: u32,
    pub vehicle_count: u32,
}

impl TrafficWeatherRecord {
    /// Check the non-negativity invariant of the float columns.
    /// Integer columns are unsigned and need no check.
    pub fn validate(&self) -> Result<(), String> {
        for (name, value) in [("rain_mm", self.rain_mm), ("avg_speed_kmh", self.avg_speed_kmh)] {
            if !value.is_finite() || value < 0.0 {
                return Err(format!("{name} = {value} is not a non-negative number"));
            }
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// SimulationRun – one Monte Carlo trial
// ---------------------------------------------------------------------------

/// One row of `simulation_results.csv`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationRun {
    /// Simulated congestion risk in `[0, 1]`.
    pub congestion_risk: f64,
}

impl SimulationRun {
    pub fn validate(&self) -> Result<(), String> {
        let r = self.congestion_risk;
        if !(0.0..=1.0).contains(&r) {
            return Err(format!("congestion_risk = {r} is outside [0, 1]"));
        }
        Ok(())
    }

    /// The derived `risk_category` column.
    pub fn risk_category(&self) -> RiskCategory {
        RiskCategory::classify(self.congestion_risk)
    }
}

// ---------------------------------------------------------------------------
// RiskCategory – fixed three-way bucketing of congestion risk
// ---------------------------------------------------------------------------

/// Upper edge of the `Low` bucket (inclusive).
pub const LOW_UPPER: f64 = 0.4;
/// Upper edge of the `Medium` bucket (inclusive).
pub const MEDIUM_UPPER: f64 = 0.7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum RiskCategory {
    Low,
    Medium,
    High,
}

impl RiskCategory {
    pub const ALL: [RiskCategory; 3] = [RiskCategory::Low, RiskCategory::Medium, RiskCategory::High];

    /// Bucket a risk value: `[0, 0.4]` → Low, `(0.4, 0.7]` → Medium,
    /// `(0.7, 1.0]` → High.
    ///
    /// Loaded runs are validated to lie in `[0, 1]`; anything above 0.7 is
    /// High and anything at or below 0.4 is Low.
    pub fn classify(risk: f64) -> Self {
        if risk <= LOW_UPPER {
            RiskCategory::Low
        } else if risk <= MEDIUM_UPPER {
            RiskCategory::Medium
        } else {
            RiskCategory::High
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RiskCategory::Low => "Low",
            RiskCategory::Medium => "Medium",
            RiskCategory::High => "High",
        }
    }
}

impl fmt::Display for RiskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.label())
    }
}

// ---------------------------------------------------------------------------
// FactorLoadingMatrix – dense variables × factors grid
// ---------------------------------------------------------------------------

/// Factor loadings indexed by variable name (rows) and factor name (columns).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FactorLoadingMatrix {
    variables: Vec<String>,
    factors: Vec<String>,
    /// Row-major; `loadings[row][col]`.
    loadings: Vec<Vec<f64>>,
}

impl FactorLoadingMatrix {
    /// Build a matrix, rejecting ragged rows.
    pub fn new(
        variables: Vec<String>,
        factors: Vec<String>,
        loadings: Vec<Vec<f64>>,
    ) -> Result<Self, String> {
        if variables.len() != loadings.len() {
            return Err(format!(
                "{} variable names but {} rows of loadings",
                variables.len(),
                loadings.len()
            ));
        }
        for (name, row) in variables.iter().zip(&loadings) {
            if row.len() != factors.len() {
                return Err(format!(
                    "variable '{name}' has {} loadings, expected {}",
                    row.len(),
                    factors.len()
                ));
            }
        }
        Ok(FactorLoadingMatrix {
            variables,
            factors,
            loadings,
        })
    }

    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    pub fn factors(&self) -> &[String] {
        &self.factors
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.loadings
    }

    /// Column index of a factor by name.
    pub fn factor_index(&self, factor: &str) -> Option<usize> {
        self.factors.iter().position(|f| f == factor)
    }

    /// All loadings of one factor, in variable order.
    pub fn column(&self, col: usize) -> impl Iterator<Item = f64> + '_ {
        self.loadings.iter().map(move |row| row[col])
    }
}

// ---------------------------------------------------------------------------
// Datasets – the three loaded tables
// ---------------------------------------------------------------------------

/// Everything the dashboard needs. Immutable once loaded.
#[derive(Debug, Clone)]
pub struct Datasets {
    pub traffic: Vec<TrafficWeatherRecord>,
    pub simulation: Vec<SimulationRun>,
    pub factors: FactorLoadingMatrix,
}

impl Datasets {
    /// The first `n` traffic records (fewer if the table is shorter).
    pub fn preview(&self, n: usize) -> &[TrafficWeatherRecord] {
        &self.traffic[..n.min(self.traffic.len())]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_boundaries_are_right_closed() {
        assert_eq!(RiskCategory::classify(0.0), RiskCategory::Low);
        assert_eq!(RiskCategory::classify(0.4), RiskCategory::Low);
        assert_eq!(RiskCategory::classify(0.400_001), RiskCategory::Medium);
        assert_eq!(RiskCategory::classify(0.7), RiskCategory::Medium);
        assert_eq!(RiskCategory::classify(0.700_001), RiskCategory::High);
        assert_eq!(RiskCategory::classify(1.0), RiskCategory::High);
    }

    #[test]
    fn simulation_run_rejects_out_of_range() {
        assert!(SimulationRun { congestion_risk: 0.5 }.validate().is_ok());
        assert!(SimulationRun { congestion_risk: -0.1 }.validate().is_err());
        assert!(SimulationRun { congestion_risk: 1.2 }.validate().is_err());
        assert!(SimulationRun { congestion_risk: f64::NAN }.validate().is_err());
    }

    #[test]
    fn traffic_record_rejects_negative_rain() {
        let rec = TrafficWeatherRecord {
            rain_mm: -1.0,
            avg_speed_kmh: 40.0,
            congestion_level: "Low".into(),
            weather_condition: "Clear".into(),
            accident_count: 0,
            vehicle_count: 10,
        };
        assert!(rec.validate().is_err());
    }

    #[test]
    fn ragged_matrix_is_rejected() {
        let res = FactorLoadingMatrix::new(
            vec!["rain_mm".into(), "avg_speed_kmh".into()],
            vec!["Factor1".into(), "Factor2".into()],
            vec![vec![0.9, 0.1], vec![0.2]],
        );
        assert!(res.is_err());
    }

    #[test]
    fn preview_is_clamped_to_table_length() {
        let ds = Datasets {
            traffic: Vec::new(),
            simulation: Vec::new(),
            factors: FactorLoadingMatrix::new(Vec::new(), Vec::new(), Vec::new()).unwrap(),
        };
        assert!(ds.preview(5).is_empty());
    }
}
