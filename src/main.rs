use anyhow::Context;
use backtester::{BacktestOutcome, Backtester};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use configuration::{Config, Overrides};
use core_types::PriceSeries;
use std::path::{Path, PathBuf};
use strategies::{MACrossover, Strategy};
use tracing_subscriber::EnvFilter;

mod render;

/// The main entry point for the crossover backtester.
fn main() {
    // Load environment variables from a .env file when one is present.
    dotenvy::dotenv().ok();

    // Logs go to stderr so that stdout only carries the report.
    let (writer, guard) = tracing_appender::non_blocking(std::io::stderr());
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(writer)
        .init();

    // Parse command-line arguments
    let cli = Cli::parse();

    // The window end is resolved here, once, and passed down explicitly.
    let today = Local::now().date_naive();

    // Execute the appropriate command
    let result = match cli.command {
        Commands::Run(args) => handle_run(args, today),
        Commands::Signals(args) => handle_signals(args, today),
    };

    if let Err(e) = result {
        tracing::error!("{e:#}");
        // Flush buffered log lines before exiting.
        drop(guard);
        std::process::exit(1);
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Backtests a moving average crossover strategy on daily closing prices.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate signals, simulate the portfolio and report performance.
    Run(RunArgs),
    /// Generate signals only and list the entry/exit points.
    Signals(SignalArgs),
}

#[derive(Parser)]
struct RunArgs {
    /// Path of the configuration file.
    #[arg(long, default_value = configuration::DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    #[command(flatten)]
    overrides: Overrides,

    /// Directory to write signals.csv, portfolio.csv and report.json into.
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Print the performance report as JSON instead of tables.
    #[arg(long)]
    json: bool,
}

#[derive(Parser)]
struct SignalArgs {
    /// Path of the configuration file.
    #[arg(long, default_value = configuration::DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    #[command(flatten)]
    overrides: Overrides,
}

// ==============================================================================
// Command Logic
// ==============================================================================

/// Loads the configuration and the price series it points at.
fn prepare(
    config_path: &Path,
    overrides: &Overrides,
    today: NaiveDate,
) -> anyhow::Result<(Config, PriceSeries)> {
    let config = configuration::load_config_with_overrides(config_path, overrides)
        .with_context(|| format!("loading configuration from {}", config_path.display()))?;

    let window = config.backtest.window(today)?;
    let prices = market_data::load_price_series(&config.data, &window)
        .with_context(|| format!("loading prices from {}", config.data.path.display()))?;

    Ok((config, prices))
}

/// Handles the full two-stage backtest.
fn handle_run(args: RunArgs, today: NaiveDate) -> anyhow::Result<()> {
    let (config, prices) = prepare(&args.config, &args.overrides, today)?;

    let strategy = MACrossover::new(config.strategy.clone())?;
    let backtester = Backtester::new(
        Box::new(strategy),
        config.backtest.initial_capital,
        config.backtest.position_size,
        analytics::AnalyticsEngine::new(),
    );
    let outcome = backtester.run(&prices)?;

    if let Some(dir) = &args.output_dir {
        write_outputs(dir, &outcome)?;
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome.report)?);
    } else {
        println!("{}", render::report_table(&config.backtest.symbol, &outcome.report));
        if !outcome.trades.is_empty() {
            println!("{}", render::trades_table(&outcome.trades));
        }
    }

    Ok(())
}

/// Handles signal generation on its own.
fn handle_signals(args: SignalArgs, today: NaiveDate) -> anyhow::Result<()> {
    let (config, prices) = prepare(&args.config, &args.overrides, today)?;

    let strategy = MACrossover::new(config.strategy.clone())?;
    let signals = strategy.generate(&prices)?;

    println!(
        "{} {} from {} to {}",
        config.backtest.symbol,
        strategy.name(),
        prices.first_date(),
        prices.last_date()
    );
    println!("{}", render::markers_table(&signals.transitions()));
    Ok(())
}

/// Writes the two result series and the report into `dir`.
fn write_outputs(dir: &Path, outcome: &BacktestOutcome) -> anyhow::Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("creating output directory {}", dir.display()))?;

    market_data::write_signals(&dir.join("signals.csv"), &outcome.signals)?;
    market_data::write_portfolio(&dir.join("portfolio.csv"), &outcome.portfolio)?;

    let report_path = dir.join("report.json");
    let json = serde_json::to_string_pretty(&outcome.report)?;
    std::fs::write(&report_path, json)
        .with_context(|| format!("writing {}", report_path.display()))?;

    tracing::info!(dir = %dir.display(), "Wrote backtest outputs");
    Ok(())
}
