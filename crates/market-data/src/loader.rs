use crate::error::DataError;
use chrono::{NaiveDate, NaiveDateTime};
use configuration::DataSource;
use core_types::{BacktestWindow, PricePoint, PriceSeries};
use std::fs::File;
use std::io::{BufReader, Read};

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%m/%d/%Y"];
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Loads the closing prices in `window` from the CSV file described by `source`.
///
/// Rows are kept in file order. Rows outside the window are skipped without
/// looking at their price; inside the window a missing close is an error.
pub fn load_price_series(
    source: &DataSource,
    window: &BacktestWindow,
) -> Result<PriceSeries, DataError> {
    tracing::info!(
        path = %source.path.display(),
        start = %window.start,
        end = %window.end,
        "Loading price history"
    );
    let file = File::open(&source.path)?;
    read_price_series(BufReader::new(file), source, window)
}

/// Same as `load_price_series`, reading from any byte source.
pub fn read_price_series<R: Read>(
    input: R,
    source: &DataSource,
    window: &BacktestWindow,
) -> Result<PriceSeries, DataError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(input);

    let headers = reader.headers()?.clone();
    let date_idx = find_column(&headers, &source.date_column)?;
    let close_idx = find_column(&headers, &source.close_column)?;

    let mut points = Vec::new();
    let mut skipped = 0usize;

    for result in reader.records() {
        let record = result?;
        let line = record.position().map_or(0, |p| p.line());

        let raw_date = record.get(date_idx).unwrap_or_default();
        let date = parse_date(raw_date).ok_or_else(|| DataError::InvalidDate {
            line,
            value: raw_date.to_string(),
        })?;

        if !window.contains(date) {
            skipped += 1;
            continue;
        }

        let raw_close = record.get(close_idx).unwrap_or_default();
        let close = raw_close
            .parse::<f64>()
            .ok()
            .filter(|c| c.is_finite())
            .ok_or_else(|| DataError::MissingPrice {
                line,
                value: raw_close.to_string(),
            })?;

        points.push(PricePoint::new(date, close));
    }

    if points.is_empty() {
        return Err(DataError::EmptyWindow {
            start: window.start,
            end: window.end,
        });
    }

    tracing::debug!(kept = points.len(), skipped, "Read price rows");
    Ok(PriceSeries::new(points)?)
}

fn find_column(headers: &csv::StringRecord, name: &str) -> Result<usize, DataError> {
    headers
        .iter()
        .position(|h| h.eq_ignore_ascii_case(name.trim()))
        .ok_or_else(|| DataError::MissingColumn(name.to_string()))
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
                .map(|dt| dt.date())
        })
}
