use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use traffic_dashboard::app::{DashboardApp, OutputFormat};
use traffic_dashboard::config::{DEFAULT_PREVIEW_ROWS, DashboardConfig};
use traffic_dashboard::data::aggregate::{DEFAULT_HISTOGRAM_BINS, HIGH_RISK_THRESHOLD};
use traffic_dashboard::ui::Pane;

#[derive(Parser)]
#[command(name = "traffic-dashboard")]
#[command(about = "Weather impact on urban traffic: analysis & prediction dashboard", long_about = None)]
struct Cli {
    /// Directory containing the three input CSV files
    #[arg(long, value_name = "DIR", env = "TRAFFIC_DASHBOARD_DATA_DIR", default_value = ".")]
    data_dir: PathBuf,

    /// Pane to show (repeatable; all panes when omitted)
    #[arg(short, long, value_enum)]
    pane: Vec<Pane>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Number of bins in the risk histogram
    #[arg(long, default_value_t = DEFAULT_HISTOGRAM_BINS)]
    bins: usize,

    /// Number of rows in the dataset preview
    #[arg(long, default_value_t = DEFAULT_PREVIEW_ROWS)]
    preview: usize,
}

fn main() -> anyhow::Result<ExitCode> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = DashboardConfig {
        data_dir: cli.data_dir,
        high_risk_threshold: HIGH_RISK_THRESHOLD,
        histogram_bins: cli.bins,
        preview_rows: cli.preview,
    };

    let app = match DashboardApp::new(config) {
        Ok(app) => app,
        Err(e) => {
            log::error!("{e}");
            log::error!(
                "Could not load '{}'. Run the analysis that produces the CSV files first.",
                e.file()
            );
            return Ok(ExitCode::FAILURE);
        }
    };

    let stdout = io::stdout();
    app.write(&mut stdout.lock(), &cli.pane, cli.format)?;
    Ok(ExitCode::SUCCESS)
}
