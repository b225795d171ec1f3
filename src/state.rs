use crate::config::DashboardConfig;
use crate::data::loader::load_datasets;
use crate::data::model::Datasets;
use crate::error::LoadError;

// ---------------------------------------------------------------------------
// Dashboard context
// ---------------------------------------------------------------------------

/// Loaded tables plus the configuration they were loaded with.
///
/// Created once at startup and passed by reference to every pane. There is
/// no reload: a fresh context means a fresh load.
#[derive(Debug)]
pub struct DashboardContext {
    config: DashboardConfig,
    datasets: Datasets,
}

impl DashboardContext {
    /// Load all input tables from `config.data_dir`.
    pub fn open(config: DashboardConfig) -> Result<Self, LoadError> {
        let datasets = load_datasets(&config.data_dir)?;
        if datasets.traffic.is_empty() {
            log::warn!("Traffic table is empty; overview averages are undefined");
        }
        if datasets.simulation.is_empty() {
            log::warn!("Simulation table is empty; risk statistics are undefined");
        }
        Ok(Self::from_parts(config, datasets))
    }

    /// Wrap tables that were already loaded.
    pub fn from_parts(config: DashboardConfig, datasets: Datasets) -> Self {
        Self { config, datasets }
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn datasets(&self) -> &Datasets {
        &self.datasets
    }
}
