//! Navigation panes.
//!
//! [`Pane`] is the single source of truth for pane identity: the CLI value
//! name, the display title and the render function all hang off the enum.

pub mod panels;
pub mod text;

use clap::ValueEnum;
use serde::Serialize;

use crate::state::DashboardContext;
pub use panels::PaneReport;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Pane {
    /// Merged weather + traffic dataset.
    Overview,
    /// Monte Carlo congestion-risk results.
    Simulation,
    /// Factor loadings and their interpretation.
    Factors,
}

impl Pane {
    /// Menu order.
    pub const ALL: [Pane; 3] = [Pane::Overview, Pane::Simulation, Pane::Factors];

    pub fn title(self) -> &'static str {
        match self {
            Pane::Overview => "Data Overview",
            Pane::Simulation => "Monte Carlo Simulation",
            Pane::Factors => "Factor Analysis",
        }
    }

    /// Compute everything this pane shows from the loaded tables.
    pub fn render(self, ctx: &DashboardContext) -> PaneReport {
        log::debug!("Rendering pane '{}'", self.title());
        match self {
            Pane::Overview => PaneReport::Overview(panels::overview(ctx)),
            Pane::Simulation => PaneReport::Simulation(panels::simulation(ctx)),
            Pane::Factors => PaneReport::Factors(panels::factors(ctx)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_pane_has_distinct_title_and_cli_name() {
        let titles: std::collections::HashSet<_> = Pane::ALL.iter().map(|p| p.title()).collect();
        assert_eq!(titles.len(), Pane::ALL.len());

        for pane in Pane::ALL {
            let name = pane.to_possible_value().unwrap();
            assert_eq!(Pane::from_str(name.get_name(), false), Ok(pane));
        }
    }

    #[test]
    fn unknown_pane_name_is_rejected() {
        assert!(Pane::from_str("bmi factor analysis", true).is_err());
    }
}
