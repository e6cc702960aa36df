//! MarketLab CLI: analysis, synthetic data and broker login helpers.
//!
//! Commands:
//! - `analyze`: classify a CSV of OHLCV bars and list its signals
//! - `synthetic`: write a seeded random-walk series as CSV
//! - `auth-url`: print the broker login URL for the configured app
//! - `auth-code`: pull the auth code out of a pasted redirect URL

mod logging;
mod report;
mod session;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use marketlab_core::data::{read_csv_file, write_csv, Interval, RandomWalk};
use marketlab_core::{AnalysisConfig, Analyzer, BarSeries};
use session::{extract_auth_code, redact, BrokerCredentials, DEFAULT_AUTH_BASE};
use std::io::Write;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(
    name = "marketlab",
    about = "MarketLab CLI: market state classification and signal scanning"
)]
struct Cli {
    /// Log filter when RUST_LOG is unset (e.g. "info", "marketlab_core=debug").
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify a CSV of bars and print the report.
    Analyze {
        /// CSV with timestamp,open,high,low,close,volume columns.
        #[arg(long)]
        input: PathBuf,

        /// Resample to this interval first (e.g. "1 hour", "15m").
        #[arg(long)]
        interval: Option<Interval>,

        /// TOML analysis config. Defaults apply when omitted.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Print the report as JSON instead of text.
        #[arg(long, default_value_t = false)]
        json: bool,

        /// Print only the enhanced state tag.
        #[arg(long, default_value_t = false)]
        enhanced: bool,
    },
    /// Generate a seeded random-walk series.
    Synthetic {
        /// Number of bars.
        #[arg(long, default_value_t = 500)]
        bars: usize,

        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Bar interval (e.g. "1h", "5 minutes").
        #[arg(long, default_value = "1h")]
        interval: Interval,

        /// First bar date (YYYY-MM-DD).
        #[arg(long, default_value = "2024-01-02")]
        start: String,

        /// Output CSV path. Writes to stdout when omitted.
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Print the broker login URL.
    AuthUrl {
        #[arg(long, env = "MARKETLAB_CLIENT_ID")]
        client_id: String,

        #[arg(long, env = "MARKETLAB_REDIRECT_URI", default_value = "https://www.google.com/")]
        redirect_uri: String,

        /// Opaque value echoed back on the redirect.
        #[arg(long, default_value = "marketlab")]
        state: String,

        #[arg(long, default_value = DEFAULT_AUTH_BASE)]
        auth_base: String,
    },
    /// Extract the auth code from the URL the browser was redirected to.
    AuthCode {
        #[arg(long)]
        redirect_url: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(&cli.log_level)?;

    match cli.command {
        Commands::Analyze {
            input,
            interval,
            config,
            json,
            enhanced,
        } => run_analyze(input, interval, config, json, enhanced),
        Commands::Synthetic {
            bars,
            seed,
            interval,
            start,
            output,
        } => run_synthetic(bars, seed, interval, &start, output),
        Commands::AuthUrl {
            client_id,
            redirect_uri,
            state,
            auth_base,
        } => {
            let creds = BrokerCredentials::new(client_id, redirect_uri)?;
            let url = creds.authorization_url(&auth_base, &state)?;
            info!(client_id = creds.client_id(), "login URL generated");
            println!("{url}");
            Ok(())
        }
        Commands::AuthCode { redirect_url } => {
            let code = extract_auth_code(&redirect_url)?;
            info!(code = %redact(&code), "auth code extracted");
            println!("{code}");
            Ok(())
        }
    }
}

fn run_analyze(
    input: PathBuf,
    interval: Option<Interval>,
    config_path: Option<PathBuf>,
    json: bool,
    enhanced: bool,
) -> Result<()> {
    let config = match config_path {
        Some(path) => AnalysisConfig::from_file(&path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => AnalysisConfig::default(),
    };
    let bars =
        read_csv_file(&input).with_context(|| format!("reading bars from {}", input.display()))?;
    info!(path = %input.display(), bars = bars.len(), "loaded bars");

    let analyzer = Analyzer::new(config)?;
    let report = match interval {
        Some(interval) => analyzer.analyze_raw(&bars, interval)?,
        None => analyzer.analyze(&BarSeries::new(bars))?,
    };

    if enhanced {
        println!("{}", report.enhanced_state);
    } else if json {
        println!("{}", serde_json::to_string_pretty(&report.without_series())?);
    } else {
        print!("{}", report::render(&report));
    }
    Ok(())
}

fn run_synthetic(
    n: usize,
    seed: u64,
    interval: Interval,
    start: &str,
    output: Option<PathBuf>,
) -> Result<()> {
    let start = NaiveDate::parse_from_str(start, "%Y-%m-%d")
        .with_context(|| format!("invalid --start '{start}'"))?
        .and_hms_opt(0, 0, 0)
        .context("invalid start time")?;
    let bars = RandomWalk::new(start, interval, seed).generate(n);

    match output {
        Some(path) => {
            let file = std::fs::File::create(&path)
                .with_context(|| format!("creating {}", path.display()))?;
            write_csv(file, &bars)?;
            info!(path = %path.display(), bars = bars.len(), seed, "synthetic series written");
        }
        None => {
            let stdout = std::io::stdout();
            let mut lock = stdout.lock();
            write_csv(&mut lock, &bars)?;
            lock.flush()?;
        }
    }
    Ok(())
}
