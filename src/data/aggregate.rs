//! Descriptive statistics over the loaded tables.
//!
//! Every function here is pure: no I/O, no randomness, no hidden state.
//! Functions whose result is undefined for empty input return `Option`.

use std::collections::BTreeMap;

use serde::Serialize;

use super::model::{FactorLoadingMatrix, RiskCategory, SimulationRun, TrafficWeatherRecord};

/// Risk above which a run counts as high congestion.
pub const HIGH_RISK_THRESHOLD: f64 = 0.7;

/// Default number of histogram bins for the risk distribution.
pub const DEFAULT_HISTOGRAM_BINS: usize = 50;

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, n) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}

// ---------------------------------------------------------------------------
// Traffic summary
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrafficSummary {
    pub count: usize,
    pub mean_speed_kmh: f64,
    pub mean_rain_mm: f64,
}

/// Record count plus mean speed and mean rainfall. `None` for an empty table.
pub fn summarize_traffic(records: &[TrafficWeatherRecord]) -> Option<TrafficSummary> {
    Some(TrafficSummary {
        count: records.len(),
        mean_speed_kmh: mean(records.iter().map(|r| r.avg_speed_kmh))?,
        mean_rain_mm: mean(records.iter().map(|r| r.rain_mm))?,
    })
}

/// (rain, speed) points grouped by congestion level, for a scatter chart.
pub fn rain_speed_by_congestion(records: &[TrafficWeatherRecord]) -> BTreeMap<String, Vec<[f64; 2]>> {
    let mut groups: BTreeMap<String, Vec<[f64; 2]>> = BTreeMap::new();
    for r in records {
        groups
            .entry(r.congestion_level.clone())
            .or_default()
            .push([r.rain_mm, r.avg_speed_kmh]);
    }
    groups
}

// ---------------------------------------------------------------------------
// Five-number summaries (box plots)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxStats {
    pub group: String,
    pub count: usize,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

/// Percentile of sorted values using linear interpolation (NumPy default).
fn percentile(sorted: &[f64], p: f64) -> f64 {
    let n = sorted.len();
    if n == 1 {
        return sorted[0];
    }
    let rank = (p / 100.0) * (n - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = (rank.ceil() as usize).min(n - 1);
    let frac = rank - lower as f64;
    sorted[lower] * (1.0 - frac) + sorted[upper] * frac
}

fn box_stats(group: String, mut values: Vec<f64>) -> BoxStats {
    values.sort_by(f64::total_cmp);
    BoxStats {
        group,
        count: values.len(),
        min: values[0],
        q1: percentile(&values, 25.0),
        median: percentile(&values, 50.0),
        q3: percentile(&values, 75.0),
        max: values[values.len() - 1],
    }
}

/// Accident count distribution per weather condition, groups in sorted order.
pub fn accidents_by_weather(records: &[TrafficWeatherRecord]) -> Vec<BoxStats> {
    let mut groups: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for r in records {
        groups
            .entry(r.weather_condition.as_str())
            .or_default()
            .push(r.accident_count as f64);
    }
    // Every group holds at least one value by construction.
    groups
        .into_iter()
        .map(|(name, values)| box_stats(name.to_string(), values))
        .collect()
}

// ---------------------------------------------------------------------------
// Simulation statistics
// ---------------------------------------------------------------------------

/// Percentage of runs whose risk is strictly greater than `threshold`.
pub fn threshold_probability(runs: &[SimulationRun], threshold: f64) -> Option<f64> {
    if runs.is_empty() {
        return None;
    }
    let above = runs.iter().filter(|r| r.congestion_risk > threshold).count();
    Some(above as f64 * 100.0 / runs.len() as f64)
}

pub fn mean_risk(runs: &[SimulationRun]) -> Option<f64> {
    mean(runs.iter().map(|r| r.congestion_risk))
}

/// The derived `risk_category` column, in row order.
pub fn categorize(runs: &[SimulationRun]) -> Vec<RiskCategory> {
    runs.iter().map(SimulationRun::risk_category).collect()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RiskBuckets {
    pub low: usize,
    pub medium: usize,
    pub high: usize,
}

impl RiskBuckets {
    pub fn get(&self, category: RiskCategory) -> usize {
        match category {
            RiskCategory::Low => self.low,
            RiskCategory::Medium => self.medium,
            RiskCategory::High => self.high,
        }
    }

    pub fn total(&self) -> usize {
        self.low + self.medium + self.high
    }
}

pub fn bucket_counts(runs: &[SimulationRun]) -> RiskBuckets {
    let mut buckets = RiskBuckets::default();
    for category in categorize(runs) {
        match category {
            RiskCategory::Low => buckets.low += 1,
            RiskCategory::Medium => buckets.medium += 1,
            RiskCategory::High => buckets.high += 1,
        }
    }
    buckets
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CdfPoint {
    pub value: f64,
    /// `rank / n`, rank counted from zero.
    pub fraction: f64,
}

/// Sorted risk values paired with their rank fraction.
pub fn empirical_cdf(runs: &[SimulationRun]) -> Vec<CdfPoint> {
    let mut values: Vec<f64> = runs.iter().map(|r| r.congestion_risk).collect();
    values.sort_by(f64::total_cmp);
    let n = values.len() as f64;
    values
        .into_iter()
        .enumerate()
        .map(|(i, value)| CdfPoint {
            value,
            fraction: i as f64 / n,
        })
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Equal-width histogram over `[min, max]`.
///
/// Bins are left-closed; the last bin also includes `max`. A zero-width
/// range collapses to a single bin. Empty input or `bins == 0` gives no bins.
pub fn histogram(values: &[f64], bins: usize) -> Vec<HistogramBin> {
    if values.is_empty() || bins == 0 {
        return Vec::new();
    }
    let min = values.iter().copied().fold(f64::INFINITY, f64::min);
    let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;
    if range.abs() < f64::EPSILON {
        return vec![HistogramBin {
            lower: min,
            upper: max,
            count: values.len(),
        }];
    }

    let width = range / bins as f64;
    let mut out: Vec<HistogramBin> = (0..bins)
        .map(|i| HistogramBin {
            lower: min + i as f64 * width,
            upper: if i + 1 == bins { max } else { min + (i + 1) as f64 * width },
            count: 0,
        })
        .collect();
    for &v in values {
        let idx = (((v - min) / width) as usize).min(bins - 1);
        out[idx].count += 1;
    }
    out
}

// ---------------------------------------------------------------------------
// Factor analysis
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FactorStrength {
    pub factor: String,
    /// Mean absolute loading across all variables.
    pub strength: f64,
}

/// Mean absolute loading of each factor, in column order.
/// A matrix without variables gives a strength of 0 for every factor.
pub fn factor_strength(matrix: &FactorLoadingMatrix) -> Vec<FactorStrength> {
    matrix
        .factors()
        .iter()
        .enumerate()
        .map(|(col, factor)| FactorStrength {
            factor: factor.clone(),
            strength: mean(matrix.column(col).map(f64::abs)).unwrap_or(0.0),
        })
        .collect()
}

/// Factor strengths, strongest first. Ties keep column order.
pub fn rank_factors(matrix: &FactorLoadingMatrix) -> Vec<FactorStrength> {
    let mut ranked = factor_strength(matrix);
    ranked.sort_by(|a, b| b.strength.total_cmp(&a.strength));
    ranked
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Contribution {
    pub variable: String,
    pub loading: f64,
}

/// Variables of one factor sorted by loading, ascending.
/// `None` if the factor does not exist.
pub fn factor_contributions(matrix: &FactorLoadingMatrix, factor: &str) -> Option<Vec<Contribution>> {
    let col = matrix.factor_index(factor)?;
    let mut rows: Vec<Contribution> = matrix
        .variables()
        .iter()
        .zip(matrix.column(col))
        .map(|(variable, loading)| Contribution {
            variable: variable.clone(),
            loading,
        })
        .collect();
    rows.sort_by(|a, b| a.loading.total_cmp(&b.loading));
    Some(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn runs(values: &[f64]) -> Vec<SimulationRun> {
        values
            .iter()
            .map(|&congestion_risk| SimulationRun { congestion_risk })
            .collect()
    }

    fn record(rain: f64, speed: f64, level: &str, weather: &str, accidents: u32) -> TrafficWeatherRecord {
        TrafficWeatherRecord {
            rain_mm: rain,
            avg_speed_kmh: speed,
            congestion_level: level.into(),
            weather_condition: weather.into(),
            accident_count: accidents,
            vehicle_count: 100,
        }
    }

    fn matrix() -> FactorLoadingMatrix {
        FactorLoadingMatrix::new(
            vec!["rain_mm".into(), "avg_speed_kmh".into(), "accident_count".into()],
            vec!["Factor1".into(), "Factor2".into(), "Factor3".into()],
            vec![
                vec![0.9, -0.1, 0.0],
                vec![-0.3, 0.8, 0.0],
                vec![0.3, 0.1, 0.0],
            ],
        )
        .unwrap()
    }

    #[test]
    fn concrete_scenario() {
        let r = runs(&[0.1, 0.5, 0.75, 0.9, 0.3]);
        assert_eq!(threshold_probability(&r, HIGH_RISK_THRESHOLD), Some(40.0));
        assert_eq!(
            bucket_counts(&r),
            RiskBuckets {
                low: 2,
                medium: 1,
                high: 2
            }
        );
        assert_eq!(
            categorize(&r),
            vec![
                RiskCategory::Low,
                RiskCategory::Medium,
                RiskCategory::High,
                RiskCategory::High,
                RiskCategory::Low
            ]
        );
    }

    #[test]
    fn threshold_is_strictly_greater() {
        let r = runs(&[0.7, 0.7, 0.71]);
        let p = threshold_probability(&r, 0.7).unwrap();
        assert!((p - 100.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn threshold_probability_is_monotone() {
        let r = runs(&[0.05, 0.2, 0.35, 0.41, 0.6, 0.7, 0.72, 0.88, 0.99]);
        let mut prev = f64::INFINITY;
        for step in 0..=100 {
            let t = step as f64 / 100.0;
            let p = threshold_probability(&r, t).unwrap();
            assert!(p <= prev, "not monotone at t = {t}");
            prev = p;
        }
        assert_eq!(threshold_probability(&r, 0.99), Some(0.0));
        assert_eq!(threshold_probability(&r, 1.0), Some(0.0));
        assert_eq!(threshold_probability(&r, 0.04), Some(100.0));
    }

    #[test]
    fn empty_inputs_are_undefined() {
        assert_eq!(threshold_probability(&[], 0.7), None);
        assert_eq!(mean_risk(&[]), None);
        assert_eq!(summarize_traffic(&[]), None);
        assert!(empirical_cdf(&[]).is_empty());
        assert!(histogram(&[], 10).is_empty());
    }

    #[test]
    fn mean_speed_lies_within_range() {
        let recs = vec![
            record(0.0, 62.0, "Low", "Clear", 0),
            record(4.5, 38.5, "High", "Rain", 2),
            record(1.2, 51.0, "Medium", "Cloudy", 1),
            record(9.8, 24.0, "High", "Storm", 4),
        ];
        let s = summarize_traffic(&recs).unwrap();
        assert_eq!(s.count, 4);
        assert!(s.mean_speed_kmh >= 24.0 && s.mean_speed_kmh <= 62.0);
        assert!((s.mean_speed_kmh - 43.875).abs() < 1e-9);
        assert!((s.mean_rain_mm - 3.875).abs() < 1e-9);
    }

    #[test]
    fn buckets_partition_all_rows() {
        let r = runs(&[0.0, 0.4, 0.41, 0.7, 0.700_1, 1.0, 0.2, 0.55]);
        let b = bucket_counts(&r);
        assert_eq!(b.total(), r.len());
        assert_eq!(b.get(RiskCategory::Low), 3);
        assert_eq!(b.get(RiskCategory::Medium), 3);
        assert_eq!(b.get(RiskCategory::High), 2);
    }

    #[test]
    fn cdf_is_sorted_and_ends_below_one() {
        let r = runs(&[0.9, 0.1, 0.5, 0.3]);
        let cdf = empirical_cdf(&r);
        assert_eq!(cdf.len(), 4);
        assert_eq!(cdf[0], CdfPoint { value: 0.1, fraction: 0.0 });
        assert!(cdf.windows(2).all(|w| w[0].value <= w[1].value && w[0].fraction <= w[1].fraction));
        assert_eq!(cdf[3].value, 0.9);
        assert!((cdf[3].fraction - 0.75).abs() < 1e-12);
    }

    #[test]
    fn histogram_counts_every_value() {
        let values = [0.0, 0.1, 0.25, 0.5, 0.5, 0.99, 1.0];
        let h = histogram(&values, 4);
        assert_eq!(h.len(), 4);
        assert_eq!(h.iter().map(|b| b.count).sum::<usize>(), values.len());
        assert_eq!(h[0].count, 2);
        assert_eq!(h[1].count, 1);
        assert_eq!(h[2].count, 2);
        // max lands in the last, right-closed bin
        assert_eq!(h[3].count, 2);
        assert_eq!(h[3].upper, 1.0);
    }

    #[test]
    fn histogram_of_constant_values_is_one_bin() {
        let h = histogram(&[0.5, 0.5, 0.5], 50);
        assert_eq!(h.len(), 1);
        assert_eq!(h[0].count, 3);
    }

    #[test]
    fn factor_strength_is_mean_absolute_loading() {
        let s = factor_strength(&matrix());
        assert_eq!(s.len(), 3);
        assert!((s[0].strength - 0.5).abs() < 1e-12);
        assert!((s[1].strength - (1.0 / 3.0)).abs() < 1e-12);
        assert_eq!(s[2].strength, 0.0);
        assert!(s.iter().all(|f| f.strength >= 0.0));
    }

    #[test]
    fn rank_factors_strongest_first() {
        let ranked = rank_factors(&matrix());
        let names: Vec<&str> = ranked.iter().map(|f| f.factor.as_str()).collect();
        assert_eq!(names, ["Factor1", "Factor2", "Factor3"]);
    }

    #[test]
    fn contributions_sorted_ascending() {
        let c = factor_contributions(&matrix(), "Factor1").unwrap();
        let names: Vec<&str> = c.iter().map(|c| c.variable.as_str()).collect();
        assert_eq!(names, ["avg_speed_kmh", "accident_count", "rain_mm"]);
        assert!(factor_contributions(&matrix(), "Factor9").is_none());
    }

    #[test]
    fn accidents_box_stats_per_weather() {
        let recs = vec![
            record(5.0, 30.0, "High", "Rain", 1),
            record(6.0, 28.0, "High", "Rain", 3),
            record(7.0, 25.0, "High", "Rain", 2),
            record(8.0, 22.0, "High", "Rain", 4),
            record(0.0, 60.0, "Low", "Clear", 0),
        ];
        let stats = accidents_by_weather(&recs);
        assert_eq!(stats.len(), 2);
        assert_eq!(stats[0].group, "Clear");
        assert_eq!(stats[0].median, 0.0);
        let rain = &stats[1];
        assert_eq!(rain.count, 4);
        assert_eq!(rain.min, 1.0);
        assert_eq!(rain.max, 4.0);
        assert!((rain.q1 - 1.75).abs() < 1e-12);
        assert!((rain.median - 2.5).abs() < 1e-12);
        assert!((rain.q3 - 3.25).abs() < 1e-12);
    }

    #[test]
    fn scatter_groups_by_congestion_level() {
        let recs = vec![
            record(1.0, 50.0, "Low", "Clear", 0),
            record(3.0, 35.0, "High", "Rain", 1),
            record(0.5, 55.0, "Low", "Clear", 0),
        ];
        let groups = rain_speed_by_congestion(&recs);
        assert_eq!(groups.keys().collect::<Vec<_>>(), ["High", "Low"]);
        assert_eq!(groups["Low"], vec![[1.0, 50.0], [0.5, 55.0]]);
    }
}
