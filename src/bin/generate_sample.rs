use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;

use traffic_dashboard::data::loader::{FACTORS_FILE, SIMULATION_FILE, TRAFFIC_FILE};

/// Write a consistent set of the three dashboard input files.
#[derive(Parser)]
#[command(name = "generate_sample")]
struct Cli {
    /// Output directory (created if missing)
    #[arg(long, value_name = "DIR", default_value = ".")]
    out_dir: PathBuf,

    /// Number of weather/traffic observations
    #[arg(long, default_value_t = 500)]
    records: usize,

    /// Number of Monte Carlo runs
    #[arg(long, default_value_t = 10_000)]
    runs: usize,

    #[arg(long, default_value_t = 42)]
    seed: u64,
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[(self.next_u64() % items.len() as u64) as usize]
    }
}

/// Merged row as the upstream pipeline writes it, including columns the
/// dashboard ignores.
#[derive(Serialize)]
struct MergedRow {
    hour: usize,
    weather_condition: &'static str,
    rain_mm: f64,
    wind_speed_kmh: f64,
    visibility_km: f64,
    avg_speed_kmh: f64,
    vehicle_count: u32,
    accident_count: u32,
    congestion_level: &'static str,
}

/// Mean rainfall (mm) per weather condition.
const WEATHER: [(&str, f64); 5] = [
    ("Clear", 0.0),
    ("Cloudy", 0.5),
    ("Rain", 6.0),
    ("Heavy Rain", 18.0),
    ("Storm", 30.0),
];

fn traffic_rows(n: usize, rng: &mut SimpleRng) -> Vec<MergedRow> {
    let names: Vec<&'static str> = WEATHER.iter().map(|(name, _)| *name).collect();
    (0..n)
        .map(|i| {
            let weather = rng.pick(&names);
            let base_rain = WEATHER
                .iter()
                .find(|(name, _)| *name == weather)
                .map_or(0.0, |(_, r)| *r);

            let rain = (base_rain + rng.gauss(0.0, 1.0 + base_rain * 0.2)).max(0.0);
            let wind = (10.0 + rain * 0.8 + rng.gauss(0.0, 4.0)).max(0.0);
            let visibility = (10.0 - rain * 0.25 + rng.gauss(0.0, 0.8)).clamp(0.2, 10.0);
            let speed = (62.0 - rain * 1.1 + rng.gauss(0.0, 5.0)).max(5.0);
            let vehicles = (450.0 + rng.gauss(0.0, 120.0)).max(20.0) as u32;
            let accidents = (rain / 8.0 + rng.next_f64() * 2.0).floor() as u32;
            let congestion = if speed < 30.0 {
                "High"
            } else if speed < 45.0 {
                "Medium"
            } else {
                "Low"
            };

            MergedRow {
                hour: i % 24,
                weather_condition: weather,
                rain_mm: round(rain, 2),
                wind_speed_kmh: round(wind, 1),
                visibility_km: round(visibility, 1),
                avg_speed_kmh: round(speed, 1),
                vehicle_count: vehicles,
                accident_count: accidents,
                congestion_level: congestion,
            }
        })
        .collect()
}

/// Congestion risk under a heavy-rain scenario: logistic response to a
/// sampled rainfall and traffic volume.
fn simulation_risks(n: usize, rng: &mut SimpleRng) -> Vec<f64> {
    (0..n)
        .map(|_| {
            let rain = rng.gauss(20.0, 6.0).max(0.0);
            let volume = rng.gauss(1.0, 0.15);
            let score = 0.12 * (rain - 15.0) + 2.0 * (volume - 1.0);
            round(1.0 / (1.0 + (-score).exp()), 4)
        })
        .collect()
}

const VARIABLES: [&str; 6] = [
    "rain_mm",
    "wind_speed_kmh",
    "visibility_km",
    "avg_speed_kmh",
    "vehicle_count",
    "accident_count",
];

/// Base loadings: weather severity, traffic flow, risk.
const BASE_LOADINGS: [[f64; 3]; 6] = [
    [0.88, -0.21, 0.30],
    [0.74, -0.05, 0.18],
    [-0.62, 0.12, -0.55],
    [-0.35, 0.81, -0.20],
    [0.10, -0.77, 0.15],
    [0.28, -0.18, 0.79],
];

fn write_factors(path: &Path, rng: &mut SimpleRng) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating loadings file")?;
    writer.write_record(["", "Factor1", "Factor2", "Factor3"])?;
    for (name, base) in VARIABLES.iter().zip(BASE_LOADINGS) {
        let mut record = vec![name.to_string()];
        record.extend(
            base.iter()
                .map(|b| round((b + rng.gauss(0.0, 0.03)).clamp(-1.0, 1.0), 3).to_string()),
        );
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}

fn round(v: f64, digits: i32) -> f64 {
    let p = 10f64.powi(digits);
    (v * p).round() / p
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    let mut rng = SimpleRng::new(cli.seed);

    fs::create_dir_all(&cli.out_dir)
        .with_context(|| format!("creating {}", cli.out_dir.display()))?;

    let traffic_path = cli.out_dir.join(TRAFFIC_FILE);
    let mut writer = csv::Writer::from_path(&traffic_path).context("creating traffic file")?;
    for row in traffic_rows(cli.records, &mut rng) {
        writer.serialize(row)?;
    }
    writer.flush()?;

    let sim_path = cli.out_dir.join(SIMULATION_FILE);
    let mut writer = csv::Writer::from_path(&sim_path).context("creating simulation file")?;
    writer.write_record(["congestion_risk"])?;
    for risk in simulation_risks(cli.runs, &mut rng) {
        writer.write_record([risk.to_string()])?;
    }
    writer.flush()?;

    write_factors(&cli.out_dir.join(FACTORS_FILE), &mut rng)?;

    log::info!(
        "Wrote {} records, {} runs and {} x 3 loadings to {}",
        cli.records,
        cli.runs,
        VARIABLES.len(),
        cli.out_dir.display()
    );
    Ok(())
}
