use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BacktestError {
    #[error("Strategy execution error: {0}")]
    Strategy(#[from] strategies::StrategyError),

    #[error("Analytics calculation error: {0}")]
    Analytics(#[from] analytics::AnalyticsError),

    #[error("Price and signal series differ in length: {prices} prices, {signals} signals")]
    LengthMismatch { prices: usize, signals: usize },

    #[error(
        "Price and signal series disagree at row {index}: \
         price date {price_date}, signal date {signal_date}"
    )]
    IndexMismatch {
        index: usize,
        price_date: NaiveDate,
        signal_date: NaiveDate,
    },

    #[error("Initial capital must be finite and non-negative, got {0}")]
    InvalidCapital(f64),

    #[error("Position size must be greater than 0")]
    InvalidPositionSize,
}
