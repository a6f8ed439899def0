use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum CoreError {
    #[error("A price series must contain at least one point")]
    EmptySeries,

    #[error("Missing or non-finite closing price at {date}")]
    MissingPrice { date: NaiveDate },

    #[error("Timestamps must be strictly increasing: {current} follows {previous}")]
    NonMonotonic {
        previous: NaiveDate,
        current: NaiveDate,
    },

    #[error("Invalid backtest window: start {start} is after end {end}")]
    InvalidWindow { start: NaiveDate, end: NaiveDate },
}
