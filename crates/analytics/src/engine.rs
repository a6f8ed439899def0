use crate::error::AnalyticsError;
use crate::report::PerformanceReport;
use core_types::{PortfolioSeries, Trade};

/// A stateless calculator for deriving performance metrics from a backtest.
#[derive(Debug, Default)]
pub struct AnalyticsEngine {}

impl AnalyticsEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// The main entry point for calculating performance metrics.
    ///
    /// # Arguments
    ///
    /// * `portfolio` - The simulated portfolio series, including the equity curve.
    /// * `trades` - The round trips extracted from that portfolio.
    ///
    /// # Returns
    ///
    /// A `Result` containing the `PerformanceReport` or an `AnalyticsError`.
    pub fn calculate(
        &self,
        portfolio: &PortfolioSeries,
        trades: &[Trade],
    ) -> Result<PerformanceReport, AnalyticsError> {
        let (first, last) = match (portfolio.records().first(), portfolio.records().last()) {
            (Some(first), Some(last)) => (first, last),
            _ => {
                return Err(AnalyticsError::NotEnoughData(
                    "portfolio series is empty".to_string(),
                ));
            }
        };

        let mut report =
            PerformanceReport::new(first.date, last.date, portfolio.initial_capital);
        report.bars = portfolio.len();

        self.calculate_profitability(portfolio, &mut report);
        self.calculate_drawdown(portfolio, &mut report);
        self.calculate_ratios(portfolio, &mut report);
        self.calculate_trade_statistics(trades, &mut report);

        tracing::debug!(?report, "Calculated performance report");
        Ok(report)
    }

    /// Calculates equity-level profitability.
    fn calculate_profitability(&self, portfolio: &PortfolioSeries, report: &mut PerformanceReport) {
        report.final_equity = portfolio.final_equity().unwrap_or(portfolio.initial_capital);
        report.total_net_profit = report.final_equity - portfolio.initial_capital;

        if portfolio.initial_capital > 0.0 {
            report.total_return_pct =
                Some(report.total_net_profit / portfolio.initial_capital * 100.0);
        }

        let invested_bars = portfolio
            .records()
            .iter()
            .filter(|r| r.held_units > 0)
            .count();
        report.exposure_pct = invested_bars as f64 / portfolio.len() as f64 * 100.0;
    }

    /// Calculates maximum drawdown from the equity curve.
    fn calculate_drawdown(&self, portfolio: &PortfolioSeries, report: &mut PerformanceReport) {
        let mut max_drawdown = 0.0;
        let mut max_drawdown_pct = 0.0;
        let mut peak_equity = f64::NEG_INFINITY;

        for (_date, equity) in portfolio.equity_curve() {
            if equity > peak_equity {
                peak_equity = equity;
            }
            let drawdown = peak_equity - equity;
            if drawdown > max_drawdown {
                max_drawdown = drawdown;
            }
            if peak_equity > 0.0 {
                let pct = drawdown / peak_equity * 100.0;
                if pct > max_drawdown_pct {
                    max_drawdown_pct = pct;
                }
            }
        }

        report.max_drawdown = max_drawdown;
        report.max_drawdown_pct = max_drawdown_pct;
    }

    /// Calculates the per-period Sharpe ratio (risk-free rate of zero).
    ///
    /// Only defined, finite period returns take part; a non-finite return
    /// from a zero prior total is left out rather than poisoning the mean.
    fn calculate_ratios(&self, portfolio: &PortfolioSeries, report: &mut PerformanceReport) {
        let returns: Vec<f64> = portfolio
            .records()
            .iter()
            .filter_map(|r| r.returns)
            .filter(|r| r.is_finite())
            .collect();

        if returns.len() < 2 {
            report.sharpe_ratio = None;
            return;
        }

        let mean_return = returns.iter().sum::<f64>() / returns.len() as f64;
        let variance = returns
            .iter()
            .map(|r| (r - mean_return) * (r - mean_return))
            .sum::<f64>()
            / returns.len() as f64;

        if variance <= 0.0 {
            report.sharpe_ratio = None;
            return;
        }

        report.sharpe_ratio = Some(mean_return / variance.sqrt());
    }

    /// Calculates win/loss statistics over the extracted round trips.
    fn calculate_trade_statistics(&self, trades: &[Trade], report: &mut PerformanceReport) {
        report.total_entries = trades.len();

        let mut holding_days = 0i64;
        for trade in trades {
            let (Some(pnl), Some(exit_date)) = (trade.pnl(), trade.exit_date) else {
                continue;
            };
            report.closed_trades += 1;
            holding_days += (exit_date - trade.entry_date).num_days();

            if pnl > 0.0 {
                report.gross_profit += pnl;
                report.winning_trades += 1;
            } else {
                report.gross_loss += pnl.abs();
                report.losing_trades += 1;
            }
        }

        if report.gross_loss > 0.0 {
            report.profit_factor = Some(report.gross_profit / report.gross_loss);
        }

        if report.closed_trades > 0 {
            let closed = report.closed_trades as f64;
            report.win_rate_pct = Some(report.winning_trades as f64 / closed * 100.0);
            report.average_holding_days = Some(holding_days as f64 / closed);
        }
    }
}
