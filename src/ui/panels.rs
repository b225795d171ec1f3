use std::collections::BTreeMap;

use serde::Serialize;

use crate::data::aggregate::{
    self, BoxStats, CdfPoint, Contribution, FactorStrength, HistogramBin, RiskBuckets,
    TrafficSummary,
};
use crate::data::model::{FactorLoadingMatrix, TrafficWeatherRecord};
use crate::state::DashboardContext;

use super::Pane;

/// What one pane displays, independent of how it is drawn.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "pane", rename_all = "snake_case")]
pub enum PaneReport {
    Overview(OverviewReport),
    Simulation(SimulationReport),
    Factors(FactorReport),
}

impl PaneReport {
    pub fn pane(&self) -> Pane {
        match self {
            PaneReport::Overview(_) => Pane::Overview,
            PaneReport::Simulation(_) => Pane::Simulation,
            PaneReport::Factors(_) => Pane::Factors,
        }
    }
}

// ---------------------------------------------------------------------------
// Data overview
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct OverviewReport {
    pub title: &'static str,
    /// First rows of the merged dataset.
    pub preview: Vec<TrafficWeatherRecord>,
    /// `None` when the table is empty.
    pub summary: Option<TrafficSummary>,
    /// Rainfall vs. speed, keyed by congestion level.
    pub rain_vs_speed: BTreeMap<String, Vec<[f64; 2]>>,
    pub accidents_by_weather: Vec<BoxStats>,
}

pub fn overview(ctx: &DashboardContext) -> OverviewReport {
    let data = ctx.datasets();
    OverviewReport {
        title: Pane::Overview.title(),
        preview: data.preview(ctx.config().preview_rows).to_vec(),
        summary: aggregate::summarize_traffic(&data.traffic),
        rain_vs_speed: aggregate::rain_speed_by_congestion(&data.traffic),
        accidents_by_weather: aggregate::accidents_by_weather(&data.traffic),
    }
}

// ---------------------------------------------------------------------------
// Monte Carlo simulation
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct SimulationReport {
    pub title: &'static str,
    pub runs: usize,
    pub threshold: f64,
    /// Percentage of runs strictly above `threshold`.
    pub high_risk_probability: Option<f64>,
    pub average_risk: Option<f64>,
    pub histogram: Vec<HistogramBin>,
    pub buckets: RiskBuckets,
    pub cdf: Vec<CdfPoint>,
}

pub fn simulation(ctx: &DashboardContext) -> SimulationReport {
    let runs = &ctx.datasets().simulation;
    let cfg = ctx.config();
    let risks: Vec<f64> = runs.iter().map(|r| r.congestion_risk).collect();

    SimulationReport {
        title: Pane::Simulation.title(),
        runs: runs.len(),
        threshold: cfg.high_risk_threshold,
        high_risk_probability: aggregate::threshold_probability(runs, cfg.high_risk_threshold),
        average_risk: aggregate::mean_risk(runs),
        histogram: aggregate::histogram(&risks, cfg.histogram_bins),
        buckets: aggregate::bucket_counts(runs),
        cdf: aggregate::empirical_cdf(runs),
    }
}

// ---------------------------------------------------------------------------
// Factor analysis
// ---------------------------------------------------------------------------

/// Reading guide shown beneath the loadings heatmap.
pub const INTERPRETATION_GUIDE: [&str; 3] = [
    "Factor 1: likely represents 'Weather Severity' (high loadings on rain/wind).",
    "Factor 2: likely represents 'Traffic Flow' (high loadings on speed/vehicle count).",
    "Factor 3: likely represents 'Risk Factor' (high loadings on accidents/visibility).",
];

#[derive(Debug, Clone, Serialize)]
pub struct FactorContributions {
    pub factor: String,
    /// Ascending by loading.
    pub contributions: Vec<Contribution>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FactorReport {
    pub title: &'static str,
    /// Heatmap data.
    pub loadings: FactorLoadingMatrix,
    /// Strongest factor first.
    pub ranking: Vec<FactorStrength>,
    /// One entry per factor, in column order.
    pub contributions: Vec<FactorContributions>,
    pub guide: Vec<&'static str>,
}

pub fn factors(ctx: &DashboardContext) -> FactorReport {
    let matrix = &ctx.datasets().factors;
    let contributions = matrix
        .factors()
        .iter()
        .filter_map(|factor| {
            aggregate::factor_contributions(matrix, factor).map(|contributions| {
                FactorContributions {
                    factor: factor.clone(),
                    contributions,
                }
            })
        })
        .collect();

    FactorReport {
        title: Pane::Factors.title(),
        loadings: matrix.clone(),
        ranking: aggregate::rank_factors(matrix),
        contributions,
        guide: INTERPRETATION_GUIDE.to_vec(),
    }
}
