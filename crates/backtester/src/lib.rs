use analytics::{AnalyticsEngine, PerformanceReport};
use core_types::{PortfolioSeries, PriceSeries, SignalSeries, Trade};
use strategies::Strategy;

pub mod error;
pub mod portfolio;
pub mod trades;

pub use error::BacktestError;
pub use portfolio::backtest_portfolio;
pub use trades::extract_trades;

/// Everything a single backtest produces, index-aligned with the input prices.
#[derive(Debug, Clone)]
pub struct BacktestOutcome {
    pub signals: SignalSeries,
    pub portfolio: PortfolioSeries,
    pub trades: Vec<Trade>,
    pub report: PerformanceReport,
}

/// The two-stage backtesting pipeline.
///
/// Runs the strategy over the prices, simulates the portfolio against the
/// resulting signals and summarises it. Holds parameters only, so `run` can
/// be called repeatedly and always gives the same result for the same input.
pub struct Backtester {
    strategy: Box<dyn Strategy>,
    initial_capital: f64,
    position_size: u32,
    analytics_engine: AnalyticsEngine,
}

impl Backtester {
    pub fn new(
        strategy: Box<dyn Strategy>,
        initial_capital: f64,
        position_size: u32,
        analytics_engine: AnalyticsEngine,
    ) -> Self {
        Self {
            strategy,
            initial_capital,
            position_size,
            analytics_engine,
        }
    }

    /// Runs the full pipeline over `prices`.
    pub fn run(&self, prices: &PriceSeries) -> Result<BacktestOutcome, BacktestError> {
        tracing::info!(
            strategy = %self.strategy.name(),
            bars = prices.len(),
            from = %prices.first_date(),
            to = %prices.last_date(),
            "Starting backtest"
        );

        // --- 1. SIGNAL GENERATION ---
        let signals = self.strategy.generate(prices)?;

        // --- 2. PORTFOLIO SIMULATION ---
        let portfolio =
            backtest_portfolio(prices, &signals, self.initial_capital, self.position_size)?;

        // --- 3. ANALYSIS ---
        let trades = extract_trades(&portfolio);
        let report = self.analytics_engine.calculate(&portfolio, &trades)?;

        tracing::info!(
            final_equity = report.final_equity,
            trades = trades.len(),
            "Backtest complete"
        );

        Ok(BacktestOutcome {
            signals,
            portfolio,
            trades,
            report,
        })
    }
}
