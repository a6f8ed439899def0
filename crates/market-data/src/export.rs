use crate::error::DataError;
use core_types::{PortfolioSeries, SignalSeries};
use std::path::Path;

const SIGNAL_HEADER: [&str; 6] = [
    "Date",
    "Close",
    "short_mavg",
    "long_mavg",
    "signal",
    "positions",
];
const PORTFOLIO_HEADER: [&str; 8] = [
    "Date",
    "Close",
    "held_units",
    "position_delta",
    "holdings",
    "cash",
    "total",
    "returns",
];

/// Writes the signal series as a CSV table. The undefined first `positions`
/// cell is left empty.
pub fn write_signals(path: &Path, signals: &SignalSeries) -> Result<(), DataError> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(SIGNAL_HEADER)?;

    for record in signals.records() {
        writer.write_record([
            record.date.to_string(),
            record.close.to_string(),
            record.short_mavg.to_string(),
            record.long_mavg.to_string(),
            record.signal.as_f64().to_string(),
            record.positions.map(|t| t.delta().to_string()).unwrap_or_default(),
        ])?;
    }

    writer.flush()?;
    tracing::info!(path = %path.display(), rows = signals.len(), "Wrote signal series");
    Ok(())
}

/// Writes the portfolio series as a CSV table. The undefined first `returns`
/// cell is left empty.
pub fn write_portfolio(path: &Path, portfolio: &PortfolioSeries) -> Result<(), DataError> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(PORTFOLIO_HEADER)?;

    for record in portfolio.records() {
        writer.write_record([
            record.date.to_string(),
            record.close.to_string(),
            record.held_units.to_string(),
            record.position_delta.to_string(),
            record.holdings.to_string(),
            record.cash.to_string(),
            record.total.to_string(),
            record.returns.map(|r| r.to_string()).unwrap_or_default(),
        ])?;
    }

    writer.flush()?;
    tracing::info!(path = %path.display(), rows = portfolio.len(), "Wrote portfolio series");
    Ok(())
}
