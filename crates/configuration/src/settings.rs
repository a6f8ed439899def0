use crate::error::ConfigError;
use chrono::NaiveDate;
use core_types::BacktestWindow;
use serde::Deserialize;
use std::path::PathBuf;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub data: DataSource,
    pub backtest: BacktestSettings,
    pub strategy: MACrossoverParams,
}

/// Where the historical prices live and which columns to read.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DataSource {
    /// Path of the CSV file holding the daily bars.
    pub path: PathBuf,
    /// Header of the date column.
    pub date_column: String,
    /// Header of the closing-price column.
    pub close_column: String,
}

impl Default for DataSource {
    fn default() -> Self {
        Self {
            path: PathBuf::from("historicalPriceData.csv"),
            date_column: "Date".to_string(),
            close_column: "Close".to_string(),
        }
    }
}

/// Contains parameters for a single backtest run.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BacktestSettings {
    /// The instrument being tested (e.g., "SP500"). Used for labelling only.
    pub symbol: String,
    /// First day of the backtest window (inclusive).
    pub start_date: NaiveDate,
    /// Last day of the backtest window (inclusive).
    /// When absent, the caller supplies the run date.
    pub end_date: Option<NaiveDate>,
    /// The initial starting capital for the simulation.
    pub initial_capital: f64,
    /// Units held while the signal is long.
    pub position_size: u32,
}

impl Default for BacktestSettings {
    fn default() -> Self {
        Self {
            symbol: "SP500".to_string(),
            start_date: NaiveDate::from_ymd_opt(2016, 1, 1).unwrap_or_default(),
            end_date: None,
            initial_capital: 100_000.0,
            position_size: 10,
        }
    }
}

impl BacktestSettings {
    /// Resolves the backtest window, using `today` when no end date is configured.
    pub fn window(&self, today: NaiveDate) -> Result<BacktestWindow, ConfigError> {
        let end = self.end_date.unwrap_or(today);
        BacktestWindow::new(self.start_date, end)
            .map_err(|e| ConfigError::ValidationError(e.to_string()))
    }
}

/// Parameters for the moving average crossover strategy.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct MACrossoverParams {
    /// Lookback of the fast moving average, in bars.
    pub short_window: usize,
    /// Lookback of the slow moving average, in bars.
    pub long_window: usize,
}

impl Default for MACrossoverParams {
    fn default() -> Self {
        Self {
            short_window: 30,
            long_window: 120,
        }
    }
}

/// Command-line replacements for individual configuration values.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "clap", derive(clap::Args))]
pub struct Overrides {
    /// CSV file with the historical prices.
    #[cfg_attr(feature = "clap", arg(long))]
    pub data: Option<PathBuf>,

    /// Label of the instrument being tested.
    #[cfg_attr(feature = "clap", arg(long))]
    pub symbol: Option<String>,

    /// First day of the backtest window (format: YYYY-MM-DD).
    #[cfg_attr(feature = "clap", arg(long))]
    pub from: Option<NaiveDate>,

    /// Last day of the backtest window (format: YYYY-MM-DD). Defaults to today.
    #[cfg_attr(feature = "clap", arg(long))]
    pub to: Option<NaiveDate>,

    /// Lookback of the fast moving average.
    #[cfg_attr(feature = "clap", arg(long))]
    pub short_window: Option<usize>,

    /// Lookback of the slow moving average.
    #[cfg_attr(feature = "clap", arg(long))]
    pub long_window: Option<usize>,

    /// Starting cash of the simulated portfolio.
    #[cfg_attr(feature = "clap", arg(long))]
    pub initial_capital: Option<f64>,

    /// Units held while the signal is long.
    #[cfg_attr(feature = "clap", arg(long))]
    pub position_size: Option<u32>,
}

impl Config {
    /// Replaces configured values with any overrides that were given, then
    /// re-validates.
    pub fn apply_overrides(mut self, overrides: &Overrides) -> Result<Self, ConfigError> {
        if let Some(path) = &overrides.data {
            self.data.path = path.clone();
        }
        if let Some(symbol) = &overrides.symbol {
            self.backtest.symbol = symbol.clone();
        }
        if let Some(from) = overrides.from {
            self.backtest.start_date = from;
        }
        if let Some(to) = overrides.to {
            self.backtest.end_date = Some(to);
        }
        if let Some(short_window) = overrides.short_window {
            self.strategy.short_window = short_window;
        }
        if let Some(long_window) = overrides.long_window {
            self.strategy.long_window = long_window;
        }
        if let Some(capital) = overrides.initial_capital {
            self.backtest.initial_capital = capital;
        }
        if let Some(size) = overrides.position_size {
            self.backtest.position_size = size;
        }

        self.validate()?;
        Ok(self)
    }

    /// Checks the values that would make a run meaningless.
    ///
    /// A short window that is not below the long window is allowed; it only
    /// produces a degenerate signal, so it is logged rather than rejected.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.strategy.short_window == 0 || self.strategy.long_window == 0 {
            return Err(ConfigError::ValidationError(
                "Moving average windows must be at least 1".to_string(),
            ));
        }
        if self.strategy.short_window >= self.strategy.long_window {
            tracing::warn!(
                short_window = self.strategy.short_window,
                long_window = self.strategy.long_window,
                "Short window is not below the long window; crossovers will be degenerate"
            );
        }
        if self.backtest.position_size == 0 {
            return Err(ConfigError::ValidationError(
                "position_size must be greater than 0".to_string(),
            ));
        }
        if !self.backtest.initial_capital.is_finite() || self.backtest.initial_capital < 0.0 {
            return Err(ConfigError::ValidationError(
                "initial_capital must be a finite, non-negative amount".to_string(),
            ));
        }
        if let Some(end) = self.backtest.end_date {
            if self.backtest.start_date > end {
                return Err(ConfigError::ValidationError(format!(
                    "start_date {} is after end_date {}",
                    self.backtest.start_date, end
                )));
            }
        }
        Ok(())
    }
}
