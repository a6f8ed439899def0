use crate::enums::{Exposure, Transition};
use crate::error::CoreError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single daily closing price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
}

impl PricePoint {
    pub fn new(date: NaiveDate, close: f64) -> Self {
        Self { date, close }
    }
}

/// An ordered, validated sequence of daily closing prices.
///
/// Dates are strictly increasing and every close is finite. Zero or negative
/// closes are accepted; downstream arithmetic does not guard against them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

impl PriceSeries {
    pub fn new(points: Vec<PricePoint>) -> Result<Self, CoreError> {
        if points.is_empty() {
            return Err(CoreError::EmptySeries);
        }

        for point in &points {
            if !point.close.is_finite() {
                return Err(CoreError::MissingPrice { date: point.date });
            }
        }

        for pair in points.windows(2) {
            if pair[1].date <= pair[0].date {
                return Err(CoreError::NonMonotonic {
                    previous: pair[0].date,
                    current: pair[1].date,
                });
            }
        }

        Ok(Self { points })
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false for a constructed series; present for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.points.iter().map(|p| p.date)
    }

    pub fn closes(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.close)
    }

    pub fn first_date(&self) -> NaiveDate {
        self.points[0].date
    }

    pub fn last_date(&self) -> NaiveDate {
        self.points[self.points.len() - 1].date
    }
}

/// The inclusive date range a backtest covers.
///
/// The window is always passed explicitly to the data loader; nothing in the
/// pipeline reads the current date on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BacktestWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl BacktestWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, CoreError> {
        if start > end {
            return Err(CoreError::InvalidWindow { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Per-step output of the signal generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalRecord {
    pub date: NaiveDate,
    pub close: f64,
    pub short_mavg: f64,
    pub long_mavg: f64,
    pub signal: Exposure,
    /// `None` at the first step, which has no predecessor.
    pub positions: Option<Transition>,
}

impl SignalRecord {
    /// The `positions` column in numeric form, NaN where undefined.
    pub fn positions_value(&self) -> f64 {
        self.positions.map_or(f64::NAN, |t| t.delta())
    }
}

/// A point where the signal changed, for overlaying on a price chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransitionMarker {
    pub date: NaiveDate,
    pub close: f64,
    pub short_mavg: f64,
    pub long_mavg: f64,
    pub transition: Transition,
}

/// The signal series, aligned 1:1 with the price series it was derived from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SignalSeries {
    pub short_window: usize,
    pub long_window: usize,
    records: Vec<SignalRecord>,
}

impl SignalSeries {
    pub fn new(short_window: usize, long_window: usize, records: Vec<SignalRecord>) -> Self {
        Self {
            short_window,
            long_window,
            records,
        }
    }

    pub fn records(&self) -> &[SignalRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.records.iter().map(|r| r.date)
    }

    /// Every entry and exit, in date order.
    pub fn transitions(&self) -> Vec<TransitionMarker> {
        self.records
            .iter()
            .filter_map(|r| match r.positions {
                Some(t) if t.is_change() => Some(TransitionMarker {
                    date: r.date,
                    close: r.close,
                    short_mavg: r.short_mavg,
                    long_mavg: r.long_mavg,
                    transition: t,
                }),
                _ => None,
            })
            .collect()
    }

    pub fn entries(&self) -> Vec<TransitionMarker> {
        self.transitions()
            .into_iter()
            .filter(|m| m.transition == Transition::Entry)
            .collect()
    }

    pub fn exits(&self) -> Vec<TransitionMarker> {
        self.transitions()
            .into_iter()
            .filter(|m| m.transition == Transition::Exit)
            .collect()
    }
}

/// Per-step state of the simulated portfolio.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioRecord {
    pub date: NaiveDate,
    pub close: f64,
    pub held_units: u32,
    /// Change in held units from the previous step (the portfolio starts flat).
    pub position_delta: i64,
    pub holdings: f64,
    pub cash: f64,
    /// Always exactly `cash + holdings`.
    pub total: f64,
    /// `None` at the first step. Non-finite when the prior total was zero.
    pub returns: Option<f64>,
}

/// The portfolio series, aligned 1:1 with the price and signal series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PortfolioSeries {
    pub initial_capital: f64,
    pub position_size: u32,
    records: Vec<PortfolioRecord>,
}

impl PortfolioSeries {
    pub fn new(initial_capital: f64, position_size: u32, records: Vec<PortfolioRecord>) -> Self {
        Self {
            initial_capital,
            position_size,
            records,
        }
    }

    pub fn records(&self) -> &[PortfolioRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn dates(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        self.records.iter().map(|r| r.date)
    }

    /// The `(date, total)` pairs of the equity curve.
    pub fn equity_curve(&self) -> Vec<(NaiveDate, f64)> {
        self.records.iter().map(|r| (r.date, r.total)).collect()
    }

    pub fn final_equity(&self) -> Option<f64> {
        self.records.last().map(|r| r.total)
    }
}

/// A round trip from an entry to the matching exit.
///
/// The exit fields are `None` while the position is still open at the end of
/// the backtest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub units: u32,
    pub entry_date: NaiveDate,
    pub entry_price: f64,
    pub exit_date: Option<NaiveDate>,
    pub exit_price: Option<f64>,
}

impl Trade {
    pub fn is_closed(&self) -> bool {
        self.exit_price.is_some()
    }

    /// Realised profit of a closed trade.
    pub fn pnl(&self) -> Option<f64> {
        self.exit_price
            .map(|exit| (exit - self.entry_price) * f64::from(self.units))
    }
}
