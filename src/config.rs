use std::path::PathBuf;

use crate::data::aggregate::{DEFAULT_HISTOGRAM_BINS, HIGH_RISK_THRESHOLD};

/// Number of traffic rows shown in the overview preview.
pub const DEFAULT_PREVIEW_ROWS: usize = 5;

/// Startup configuration, supplied once and never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    /// Directory holding the three input CSV files.
    pub data_dir: PathBuf,
    /// Risk above which a simulation run counts as high congestion.
    pub high_risk_threshold: f64,
    pub histogram_bins: usize,
    pub preview_rows: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            high_risk_threshold: HIGH_RISK_THRESHOLD,
            histogram_bins: DEFAULT_HISTOGRAM_BINS,
            preview_rows: DEFAULT_PREVIEW_ROWS,
        }
    }
}

impl DashboardConfig {
    /// Default settings reading from `data_dir`.
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Default::default()
        }
    }
}
