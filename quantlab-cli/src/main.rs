//! QuantLab CLI: benchmark validation, raw windows, and quant comparisons.
//!
//! Commands:
//! - `validate`: load a benchmark source and report its shape and hash
//! - `window`: print the most recent benchmark values as JSON
//! - `compare`: align a strategy series and print the chart payload as JSON

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use quantlab_core::{AnchorPolicy, BenchmarkLoader, ChartMode, LoaderOptions, StrategyReturnSeries};
use quantlab_service::{BenchmarkService, ServiceConfig};

#[derive(Parser)]
#[command(
    name = "quantlab",
    about = "QuantLab CLI: benchmark timeline and strategy comparison"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a benchmark source and report row count, date range and hash.
    Validate {
        /// Path to the newest-first benchmark CSV.
        #[arg(long)]
        source: PathBuf,

        /// The source starts with a header row.
        #[arg(long, default_value_t = false)]
        has_header: bool,
    },
    /// Print the last N benchmark values as JSON.
    Window {
        /// Path to the service TOML config.
        #[arg(long)]
        config: PathBuf,

        /// Number of trading days. Defaults to chart.default_window.
        #[arg(short, long)]
        n: Option<usize>,
    },
    /// Align a strategy series against the benchmark and print the chart JSON.
    Compare {
        /// Path to the service TOML config.
        #[arg(long)]
        config: PathBuf,

        /// Strategy values, oldest first (e.g., 10,11,12).
        #[arg(long, value_delimiter = ',', required = true, allow_negative_numbers = true)]
        values: Vec<f64>,

        /// Date of the first value (YYYY-MM-DD). Requires --end.
        #[arg(long)]
        start: Option<String>,

        /// Date of the last value (YYYY-MM-DD). Requires --start.
        #[arg(long)]
        end: Option<String>,

        /// Chart mode. Defaults to chart.default_mode.
        #[arg(long, value_enum)]
        mode: Option<ModeArg>,

        /// Quant id to tag the payload with.
        #[arg(long, default_value_t = 0)]
        quant_id: u64,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    Absolute,
    Relative,
}

impl From<ModeArg> for ChartMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Absolute => ChartMode::Absolute,
            ModeArg::Relative => ChartMode::Relative,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { source, has_header } => {
            init_tracing("info")?;
            run_validate(&source, has_header)
        }
        Commands::Window { config, n } => {
            let config = load_config(&config)?;
            run_window(config, n)
        }
        Commands::Compare {
            config,
            values,
            start,
            end,
            mode,
            quant_id,
        } => {
            let config = load_config(&config)?;
            run_compare(config, values, start, end, mode, quant_id)
        }
    }
}

/// Install the global subscriber. `RUST_LOG` overrides the configured filter.
fn init_tracing(default_filter: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .with_context(|| format!("invalid log filter '{default_filter}'"))?;
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn load_config(path: &Path) -> Result<ServiceConfig> {
    let config = ServiceConfig::from_file(path)
        .with_context(|| format!("loading config {}", path.display()))?;
    init_tracing(&config.logging.filter)?;
    Ok(config)
}

fn run_validate(source: &Path, has_header: bool) -> Result<()> {
    let loader = BenchmarkLoader::new(LoaderOptions { has_header });
    let series = loader
        .load_path(source)
        .with_context(|| format!("validating {}", source.display()))?;

    println!("Source:  {}", source.display());
    println!("Points:  {}", series.len());
    match (series.first(), series.last()) {
        (Some(first), Some(last)) => {
            println!("Range:   {} to {}", first.trading_date, last.trading_date);
            println!("Latest:  {:.2}", last.index_value);
        }
        _ => println!("Range:   (empty)"),
    }
    println!("Hash:    {}", series.content_hash());
    Ok(())
}

fn run_window(config: ServiceConfig, n: Option<usize>) -> Result<()> {
    let service = BenchmarkService::load_benchmark(config)?;
    let values = service.benchmark_window(n);
    println!("{}", serde_json::to_string(&values)?);
    Ok(())
}

fn run_compare(
    config: ServiceConfig,
    values: Vec<f64>,
    start: Option<String>,
    end: Option<String>,
    mode: Option<ModeArg>,
    quant_id: u64,
) -> Result<()> {
    let (series, policy) = match (start.as_deref(), end.as_deref()) {
        (Some(start), Some(end)) => (
            StrategyReturnSeries::with_span(values, parse_date(start)?, parse_date(end)?),
            Some(AnchorPolicy::Dated),
        ),
        (None, None) => (StrategyReturnSeries::new(values), None),
        _ => bail!("--start and --end must be given together"),
    };

    let service = BenchmarkService::load_benchmark(config)?;
    let chart = match service.quant_chart(quant_id, &series, policy, mode.map(ChartMode::from)) {
        Ok(chart) => chart,
        Err(e) if e.is_client_error() => bail!("request rejected: {e}"),
        Err(e) => return Err(e.into()),
    };

    println!("{}", serde_json::to_string_pretty(&chart)?);
    Ok(())
}

fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").with_context(|| format!("invalid date '{raw}'"))
}
