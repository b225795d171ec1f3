use std::fmt::{self, Display, Formatter};

use crate::data::model::RiskCategory;

use super::panels::{FactorReport, OverviewReport, PaneReport, SimulationReport};

// ---------------------------------------------------------------------------
// Plain-text rendering of pane reports
// ---------------------------------------------------------------------------

/// Widest histogram bar, in characters.
const BAR_WIDTH: usize = 40;

fn heading(f: &mut Formatter<'_>, title: &str) -> fmt::Result {
    writeln!(f, "== {title} ==")
}

fn or_na(value: Option<f64>, fmt_value: impl Fn(f64) -> String) -> String {
    value.map(fmt_value).unwrap_or_else(|| "n/a".to_string())
}

impl Display for PaneReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            PaneReport::Overview(r) => Display::fmt(r, f),
            PaneReport::Simulation(r) => Display::fmt(r, f),
            PaneReport::Factors(r) => Display::fmt(r, f),
        }
    }
}

impl Display for OverviewReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        heading(f, self.title)?;

        writeln!(
            f,
            "{:>8} {:>10} {:>12} {:>12} {:>10} {:>9}",
            "rain_mm", "speed_kmh", "congestion", "weather", "accidents", "vehicles"
        )?;
        for r in &self.preview {
            writeln!(
                f,
                "{:>8.1} {:>10.1} {:>12} {:>12} {:>10} {:>9}",
                r.rain_mm,
                r.avg_speed_kmh,
                r.congestion_level,
                r.weather_condition,
                r.accident_count,
                r.vehicle_count
            )?;
        }
        writeln!(f)?;

        let count = self.summary.as_ref().map_or(0, |s| s.count);
        writeln!(f, "Total Records:     {count}")?;
        writeln!(
            f,
            "Avg Traffic Speed: {}",
            or_na(self.summary.as_ref().map(|s| s.mean_speed_kmh), |v| format!("{v:.1} km/h"))
        )?;
        writeln!(
            f,
            "Avg Rainfall:      {}",
            or_na(self.summary.as_ref().map(|s| s.mean_rain_mm), |v| format!("{v:.1} mm"))
        )?;
        writeln!(f)?;

        writeln!(f, "Rain vs. speed by congestion level:")?;
        for (level, points) in &self.rain_vs_speed {
            writeln!(f, "  {level}: {} points", points.len())?;
        }
        writeln!(f)?;

        writeln!(f, "Accidents by weather condition (min / q1 / median / q3 / max):")?;
        for b in &self.accidents_by_weather {
            writeln!(
                f,
                "  {:<12} n={:<6} {:.1} / {:.1} / {:.1} / {:.1} / {:.1}",
                b.group, b.count, b.min, b.q1, b.median, b.q3, b.max
            )?;
        }
        Ok(())
    }
}

impl Display for SimulationReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        heading(f, self.title)?;
        writeln!(f, "Runs: {}", self.runs)?;
        writeln!(
            f,
            "High Congestion Probability (>{:.0}%): {}",
            self.threshold * 100.0,
            or_na(self.high_risk_probability, |v| format!("{v:.2}%"))
        )?;
        writeln!(
            f,
            "Average Risk Score: {}",
            or_na(self.average_risk, |v| format!("{v:.2}"))
        )?;
        writeln!(f)?;

        writeln!(f, "Risk categories:")?;
        for category in RiskCategory::ALL {
            writeln!(f, "  {:<7} {}", category, self.buckets.get(category))?;
        }
        writeln!(f)?;

        writeln!(f, "Risk distribution ({} bins):", self.histogram.len())?;
        let peak = self.histogram.iter().map(|b| b.count).max().unwrap_or(0);
        for bin in self.histogram.iter().filter(|b| b.count > 0) {
            let bar = bin.count * BAR_WIDTH / peak.max(1);
            let marker = if bin.lower <= self.threshold && self.threshold < bin.upper {
                " <- threshold"
            } else {
                ""
            };
            writeln!(
                f,
                "  [{:.3}, {:.3}) {:>6} {}{marker}",
                bin.lower,
                bin.upper,
                bin.count,
                "#".repeat(bar.max(1))
            )?;
        }

        if let (Some(first), Some(last)) = (self.cdf.first(), self.cdf.last()) {
            writeln!(f)?;
            writeln!(
                f,
                "Empirical CDF: {} steps from ({:.3}, {:.3}) to ({:.3}, {:.3})",
                self.cdf.len(),
                first.value,
                first.fraction,
                last.value,
                last.fraction
            )?;
        }
        Ok(())
    }
}

impl Display for FactorReport {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        heading(f, self.title)?;

        let name_width = self
            .loadings
            .variables()
            .iter()
            .map(|v| v.len())
            .max()
            .unwrap_or(0)
            .max(8);

        write!(f, "{:<name_width$}", "")?;
        for factor in self.loadings.factors() {
            write!(f, " {factor:>10}")?;
        }
        writeln!(f)?;
        for (variable, row) in self.loadings.variables().iter().zip(self.loadings.rows()) {
            write!(f, "{variable:<name_width$}")?;
            for value in row {
                write!(f, " {value:>10.3}")?;
            }
            writeln!(f)?;
        }
        writeln!(f)?;

        writeln!(f, "Factor strength (mean |loading|):")?;
        for s in &self.ranking {
            writeln!(f, "  {:<12} {:.3}", s.factor, s.strength)?;
        }
        writeln!(f)?;

        for c in &self.contributions {
            writeln!(f, "{} contributions:", c.factor)?;
            for item in &c.contributions {
                writeln!(f, "  {:<name_width$} {:>7.3}", item.variable, item.loading)?;
            }
        }
        writeln!(f)?;

        writeln!(f, "Interpretation guide:")?;
        for line in &self.guide {
            writeln!(f, "  * {line}")?;
        }
        Ok(())
    }
}
