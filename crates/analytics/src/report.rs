use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A standardized report of a backtest's performance.
///
/// This struct is the final output of the `AnalyticsEngine` and is what the
/// command line renders or writes to `report.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceReport {
    // I. Period
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub bars: usize,

    // II. Core Profitability Metrics
    pub initial_capital: f64,
    pub final_equity: f64,
    pub total_net_profit: f64,
    pub total_return_pct: Option<f64>, // Option<> because capital can be zero
    pub gross_profit: f64,
    pub gross_loss: f64,
    pub profit_factor: Option<f64>, // Option<> because it is infinite if GrossLoss is 0

    // III. Risk and Drawdown
    pub max_drawdown: f64,
    pub max_drawdown_pct: f64,
    pub sharpe_ratio: Option<f64>, // Option<> for cases with no stdev
    /// Share of bars with units held, in percent.
    pub exposure_pct: f64,

    // IV. Trade-Level Statistics
    pub total_entries: usize,
    pub closed_trades: usize,
    pub winning_trades: usize,
    pub losing_trades: usize,
    pub win_rate_pct: Option<f64>, // Option<> for cases with 0 closed trades
    pub average_holding_days: Option<f64>,
}

impl PerformanceReport {
    /// Creates a report for the given period with every metric zeroed out.
    pub fn new(start_date: NaiveDate, end_date: NaiveDate, initial_capital: f64) -> Self {
        Self {
            start_date,
            end_date,
            bars: 0,
            initial_capital,
            final_equity: initial_capital,
            total_net_profit: 0.0,
            total_return_pct: None,
            gross_profit: 0.0,
            gross_loss: 0.0,
            profit_factor: None,
            max_drawdown: 0.0,
            max_drawdown_pct: 0.0,
            sharpe_ratio: None,
            exposure_pct: 0.0,
            total_entries: 0,
            closed_trades: 0,
            winning_trades: 0,
            losing_trades: 0,
            win_rate_pct: None,
            average_holding_days: None,
        }
    }
}
