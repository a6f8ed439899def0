use crate::error::BacktestError;
use core_types::{PortfolioRecord, PortfolioSeries, PriceSeries, SignalSeries};

/// Simulates a fixed-size, long-only position that follows `signals`.
///
/// Per date `t`:
/// - `held_units[t]` is `position_size` while the signal is long, else 0.
/// - `holdings[t] = held_units[t] * price[t]`.
/// - `position_delta[t] = held_units[t] - held_units[t-1]`, starting flat.
/// - `cash[t] = initial_capital - sum(position_delta[0..=t] * price[0..=t])`.
/// - `total[t] = cash[t] + holdings[t]`.
/// - `returns[t] = (total[t] - total[t-1]) / total[t-1]`, undefined at `t = 0`.
///
/// Cash may go negative; there is no margin check. A zero prior total yields
/// a non-finite return, which is kept as-is.
///
/// # Errors
///
/// Fails fast when the two series are not on the same date index, or when
/// `initial_capital` / `position_size` are out of range.
pub fn backtest_portfolio(
    prices: &PriceSeries,
    signals: &SignalSeries,
    initial_capital: f64,
    position_size: u32,
) -> Result<PortfolioSeries, BacktestError> {
    ensure_aligned(prices, signals)?;
    if !initial_capital.is_finite() || initial_capital < 0.0 {
        return Err(BacktestError::InvalidCapital(initial_capital));
    }
    if position_size == 0 {
        return Err(BacktestError::InvalidPositionSize);
    }

    let mut records = Vec::with_capacity(prices.len());
    let mut previous_units: u32 = 0;
    let mut previous_total: Option<f64> = None;
    // Running cost of every position change so far.
    let mut spent = 0.0;

    for (point, signal) in prices.points().iter().zip(signals.records()) {
        let held_units = signal.signal.units(position_size);
        let position_delta = i64::from(held_units) - i64::from(previous_units);

        spent += position_delta as f64 * point.close;
        let cash = initial_capital - spent;
        let holdings = f64::from(held_units) * point.close;
        let total = cash + holdings;
        let returns = previous_total.map(|prev| (total - prev) / prev);

        if position_delta != 0 {
            tracing::debug!(
                date = %point.date,
                price = point.close,
                position_delta,
                cash,
                "Position change"
            );
        }

        records.push(PortfolioRecord {
            date: point.date,
            close: point.close,
            held_units,
            position_delta,
            holdings,
            cash,
            total,
            returns,
        });
        previous_units = held_units;
        previous_total = Some(total);
    }

    Ok(PortfolioSeries::new(initial_capital, position_size, records))
}

/// The simulator's precondition: both series carry the same dates in the same order.
fn ensure_aligned(prices: &PriceSeries, signals: &SignalSeries) -> Result<(), BacktestError> {
    if prices.len() != signals.len() {
        return Err(BacktestError::LengthMismatch {
            prices: prices.len(),
            signals: signals.len(),
        });
    }

    let mismatch = prices
        .dates()
        .zip(signals.dates())
        .enumerate()
        .find(|(_, (price_date, signal_date))| price_date != signal_date);

    match mismatch {
        Some((index, (price_date, signal_date))) => Err(BacktestError::IndexMismatch {
            index,
            price_date,
            signal_date,
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use core_types::{Exposure, PricePoint, SignalRecord, Transition};

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2022, 2, d).unwrap()
    }

    fn prices(closes: &[f64]) -> PriceSeries {
        PriceSeries::new(
            closes
                .iter()
                .enumerate()
                .map(|(i, &c)| PricePoint::new(day(i as u32 + 1), c))
                .collect(),
        )
        .unwrap()
    }

    /// Builds a signal series directly from exposures, bypassing the averages.
    fn signals(prices: &PriceSeries, exposures: &[Exposure]) -> SignalSeries {
        let mut previous = None;
        let records = prices
            .points()
            .iter()
            .zip(exposures)
            .map(|(p, &signal)| {
                let positions = previous.map(|prev| Transition::between(prev, signal));
                previous = Some(signal);
                SignalRecord {
                    date: p.date,
                    close: p.close,
                    short_mavg: p.close,
                    long_mavg: p.close,
                    signal,
                    positions,
                }
            })
            .collect();
        SignalSeries::new(1, 2, records)
    }

    use Exposure::{Flat, Long};

    #[test]
    fn test_immediate_entry_at_flat_price() {
        let prices = prices(&[100.0, 100.0]);
        let portfolio =
            backtest_portfolio(&prices, &signals(&prices, &[Long, Long]), 100_000.0, 10).unwrap();
        let r = portfolio.records();

        assert_eq!(r[0].held_units, 10);
        assert_eq!(r[1].held_units, 10);
        assert_eq!(r[0].position_delta, 10);
        assert_eq!(r[1].position_delta, 0);
        assert_eq!(r[0].cash, 99_000.0);
        assert_eq!(r[1].cash, 99_000.0);
        assert_eq!(r[0].holdings, 1_000.0);
        assert_eq!(r[1].holdings, 1_000.0);
        assert_eq!(r[0].total, 100_000.0);
        assert_eq!(r[1].total, 100_000.0);
        assert_eq!(r[0].returns, None);
        assert_eq!(r[1].returns, Some(0.0));
    }

    #[test]
    fn test_round_trip_realises_price_change() {
        let prices = prices(&[50.0, 55.0, 60.0, 58.0]);
        let portfolio = backtest_portfolio(
            &prices,
            &signals(&prices, &[Flat, Long, Long, Flat]),
            1_000.0,
            10,
        )
        .unwrap();
        let r = portfolio.records();

        assert_eq!(r[1].cash, 450.0);
        assert_eq!(r[2].total, 1_050.0);
        // Sold 10 at 58 after buying 10 at 55.
        assert_eq!(r[3].position_delta, -10);
        assert_eq!(r[3].cash, 1_030.0);
        assert_eq!(r[3].holdings, 0.0);
        assert_eq!(portfolio.final_equity(), Some(1_030.0));
    }

    #[test]
    fn test_insufficient_capital_goes_negative() {
        let prices = prices(&[500.0, 510.0]);
        let portfolio =
            backtest_portfolio(&prices, &signals(&prices, &[Long, Long]), 100.0, 10).unwrap();
        assert_eq!(portfolio.records()[0].cash, -4_900.0);
        assert_eq!(portfolio.records()[1].total, 200.0);
    }

    #[test]
    fn test_zero_prior_total_gives_non_finite_return() {
        let prices = prices(&[10.0, 12.0]);
        let portfolio =
            backtest_portfolio(&prices, &signals(&prices, &[Flat, Long]), 0.0, 1).unwrap();
        let r = portfolio.records();
        assert_eq!(r[0].total, 0.0);
        assert_eq!(r[1].total, 0.0);
        let ret = r[1].returns.unwrap();
        assert!(!ret.is_finite());
    }

    #[test]
    fn test_length_mismatch_fails_fast() {
        let short = prices(&[1.0, 2.0]);
        let long = prices(&[1.0, 2.0, 3.0]);
        let result = backtest_portfolio(&long, &signals(&short, &[Flat, Flat]), 100.0, 1);
        assert!(matches!(
            result,
            Err(BacktestError::LengthMismatch { prices: 3, signals: 2 })
        ));
    }

    #[test]
    fn test_date_mismatch_fails_fast() {
        let a = prices(&[1.0, 2.0]);
        let b = PriceSeries::new(vec![
            PricePoint::new(day(1), 1.0),
            PricePoint::new(day(9), 2.0),
        ])
        .unwrap();
        let result = backtest_portfolio(&a, &signals(&b, &[Flat, Flat]), 100.0, 1);
        assert!(matches!(
            result,
            Err(BacktestError::IndexMismatch { index: 1, .. })
        ));
    }

    #[test]
    fn test_invalid_parameters() {
        let p = prices(&[1.0]);
        let s = signals(&p, &[Flat]);
        assert!(matches!(
            backtest_portfolio(&p, &s, -1.0, 1),
            Err(BacktestError::InvalidCapital(_))
        ));
        assert!(matches!(
            backtest_portfolio(&p, &s, f64::NAN, 1),
            Err(BacktestError::InvalidCapital(_))
        ));
        assert!(matches!(
            backtest_portfolio(&p, &s, 100.0, 0),
            Err(BacktestError::InvalidPositionSize)
        ));
    }
}
