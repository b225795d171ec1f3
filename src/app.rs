use std::io::Write;

use anyhow::{Context, Result};
use clap::ValueEnum;

use crate::config::DashboardConfig;
use crate::error::LoadError;
use crate::state::DashboardContext;
use crate::ui::{Pane, PaneReport};

/// How pane reports are written out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    /// One JSON array holding every selected pane.
    Json,
}

// ---------------------------------------------------------------------------
// Dashboard application
// ---------------------------------------------------------------------------

pub struct DashboardApp {
    pub ctx: DashboardContext,
}

impl DashboardApp {
    /// Load the input tables. Nothing can be shown if this fails.
    pub fn new(config: DashboardConfig) -> Result<Self, LoadError> {
        Ok(Self {
            ctx: DashboardContext::open(config)?,
        })
    }

    /// Reports for the given panes; every pane when `panes` is empty.
    pub fn render(&self, panes: &[Pane]) -> Vec<PaneReport> {
        let panes = if panes.is_empty() { &Pane::ALL[..] } else { panes };
        panes.iter().map(|pane| pane.render(&self.ctx)).collect()
    }

    pub fn write(&self, out: &mut impl Write, panes: &[Pane], format: OutputFormat) -> Result<()> {
        let reports = self.render(panes);
        match format {
            OutputFormat::Text => {
                for (i, report) in reports.iter().enumerate() {
                    if i > 0 {
                        writeln!(out)?;
                    }
                    write!(out, "{report}")?;
                }
            }
            OutputFormat::Json => {
                serde_json::to_writer_pretty(&mut *out, &reports)
                    .context("serializing pane reports")?;
                writeln!(out)?;
            }
        }
        out.flush().context("flushing output")?;
        Ok(())
    }
}
