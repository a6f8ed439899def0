use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DataError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Column '{0}' not found in the CSV header")]
    MissingColumn(String),

    #[error("Unparseable date '{value}' on line {line}")]
    InvalidDate { line: u64, value: String },

    #[error("Missing or unparseable closing price '{value}' on line {line}")]
    MissingPrice { line: u64, value: String },

    #[error("No prices between {start} and {end}")]
    EmptyWindow { start: NaiveDate, end: NaiveDate },

    #[error("Malformed price series: {0}")]
    Series(#[from] core_types::CoreError),
}
