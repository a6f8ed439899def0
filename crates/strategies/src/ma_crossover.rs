use crate::error::StrategyError;
use crate::rolling::RollingMean;
use crate::Strategy;
use configuration::MACrossoverParams;
use core_types::{Exposure, PriceSeries, SignalRecord, SignalSeries, Transition};
use ta::Next;

/// The dual moving average crossover strategy.
///
/// Invested while the short average is strictly above the long one.
#[derive(Debug, Clone)]
pub struct MACrossover {
    params: MACrossoverParams,
}

impl MACrossover {
    /// Creates a new `MACrossover` instance with the given parameters.
    ///
    /// Zero-length windows are rejected. A short window that is not below the
    /// long window is accepted; it yields a degenerate signal.
    pub fn new(params: MACrossoverParams) -> Result<Self, StrategyError> {
        if params.short_window == 0 || params.long_window == 0 {
            return Err(StrategyError::InvalidParameters(
                "Moving average windows must be at least 1".to_string(),
            ));
        }
        Ok(Self { params })
    }
}

impl Strategy for MACrossover {
    fn name(&self) -> String {
        format!(
            "MA crossover ({}/{})",
            self.params.short_window, self.params.long_window
        )
    }

    fn generate(&self, prices: &PriceSeries) -> Result<SignalSeries, StrategyError> {
        generate_signals(prices, self.params.short_window, self.params.long_window)
    }
}

/// Computes the crossover signal series for `prices`.
///
/// For every date:
/// - `short_mavg` / `long_mavg` are trailing means over at most
///   `short_window` / `long_window` closes (fewer at the start of the series).
/// - `signal` is `Long` when `short_mavg > long_mavg`, else `Flat`. Ties are flat.
/// - `positions` is the transition from the previous date's signal, and is
///   undefined (`None`) on the first date.
pub fn generate_signals(
    prices: &PriceSeries,
    short_window: usize,
    long_window: usize,
) -> Result<SignalSeries, StrategyError> {
    let mut short = RollingMean::new(short_window)?;
    let mut long = RollingMean::new(long_window)?;

    if short_window >= long_window {
        tracing::warn!(
            short_window,
            long_window,
            "Short window is not below the long window; the signal will be degenerate"
        );
    }

    let mut records = Vec::with_capacity(prices.len());
    let mut previous: Option<Exposure> = None;

    for point in prices.points() {
        let short_mavg = short.next(point.close);
        let long_mavg = long.next(point.close);

        // A NaN average compares false, so it lands on `Flat`.
        let signal = if short_mavg > long_mavg {
            Exposure::Long
        } else {
            Exposure::Flat
        };
        let positions = previous.map(|prev| Transition::between(prev, signal));

        if let Some(transition) = positions.filter(|t| t.is_change()) {
            tracing::debug!(
                date = %point.date,
                short_mavg,
                long_mavg,
                ?transition,
                "Crossover"
            );
        }

        records.push(SignalRecord {
            date: point.date,
            close: point.close,
            short_mavg,
            long_mavg,
            signal,
            positions,
        });
        previous = Some(signal);
    }

    let series = SignalSeries::new(short_window, long_window, records);
    tracing::info!(
        bars = series.len(),
        entries = series.entries().len(),
        exits = series.exits().len(),
        "Generated crossover signals"
    );
    Ok(series)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use core_types::PricePoint;
    use proptest::prelude::*;

    fn series(closes: &[f64]) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2016, 1, 1).unwrap();
        let points = closes
            .iter()
            .enumerate()
            .map(|(i, &close)| PricePoint::new(start + chrono::Days::new(i as u64), close))
            .collect();
        PriceSeries::new(points).unwrap()
    }

    fn signal_values(signals: &SignalSeries) -> Vec<f64> {
        signals.records().iter().map(|r| r.signal.as_f64()).collect()
    }

    #[test]
    fn test_step_up_then_plateau() {
        let signals = generate_signals(&series(&[10.0, 10.0, 10.0, 20.0, 20.0]), 1, 2).unwrap();
        let records = signals.records();

        let short: Vec<f64> = records.iter().map(|r| r.short_mavg).collect();
        let long: Vec<f64> = records.iter().map(|r| r.long_mavg).collect();
        assert_eq!(short, vec![10.0, 10.0, 10.0, 20.0, 20.0]);
        assert_eq!(long, vec![10.0, 10.0, 10.0, 15.0, 20.0]);

        // 20 > 15 on day 4; 20 == 20 on day 5 is not invested.
        assert_eq!(signal_values(&signals), vec![0.0, 0.0, 0.0, 1.0, 0.0]);

        let positions: Vec<Option<Transition>> = records.iter().map(|r| r.positions).collect();
        assert_eq!(
            positions,
            vec![
                None,
                Some(Transition::Hold),
                Some(Transition::Hold),
                Some(Transition::Entry),
                Some(Transition::Exit),
            ]
        );
        assert!(records[0].positions_value().is_nan());
        assert_eq!(records[3].positions_value(), 1.0);
        assert_eq!(records[4].positions_value(), -1.0);
    }

    #[test]
    fn test_single_point_has_no_defined_positions() {
        let signals = generate_signals(&series(&[42.0]), 3, 10).unwrap();
        assert_eq!(signals.len(), 1);
        assert_eq!(signals.records()[0].positions, None);
        assert_eq!(signals.records()[0].short_mavg, 42.0);
        assert_eq!(signals.records()[0].long_mavg, 42.0);
        assert!(signals.transitions().is_empty());
    }

    #[test]
    fn test_windows_longer_than_series_degrade_to_expanding_mean() {
        let signals = generate_signals(&series(&[1.0, 2.0, 3.0, 4.0]), 50, 100).unwrap();
        let expected = [1.0, 1.5, 2.0, 2.5];
        for (record, mean) in signals.records().iter().zip(expected) {
            assert_eq!(record.short_mavg, mean);
            assert_eq!(record.long_mavg, mean);
            assert_eq!(record.signal, Exposure::Flat);
        }
    }

    #[test]
    fn test_uptrend_enters_and_downtrend_exits() {
        let closes = [5.0, 4.0, 3.0, 4.0, 6.0, 8.0, 7.0, 5.0, 3.0, 2.0];
        let signals = generate_signals(&series(&closes), 2, 4).unwrap();
        let entries = signals.entries();
        let exits = signals.exits();
        assert_eq!(entries.len(), 1);
        assert_eq!(exits.len(), 1);
        assert!(entries[0].date < exits[0].date);
        assert!(entries[0].short_mavg > entries[0].long_mavg);
    }

    #[test]
    fn test_flat_run_after_varied_history_stays_flat() {
        let history = [
            2012.66, 2016.71, 1990.26, 1943.09, 1922.03, 1923.67, 1938.68, 1890.28, 1921.84,
            1880.33, 1881.33, 1859.33, 1868.99, 1906.90, 1877.08, 1903.63, 1882.95, 1893.36,
            1940.24, 1939.38, 1903.03, 1912.53, 1915.45, 1880.05, 1853.44, 1852.21, 1851.86,
            1829.08, 1864.78, 1895.58,
        ];
        let mut closes = history.to_vec();
        closes.extend(std::iter::repeat_n(1864.78, 200));
        let prices = series(&closes);

        for (short, long) in [(1, 10), (1, 30), (5, 20)] {
            let signals = generate_signals(&prices, short, long).unwrap();
            let records = signals.records();
            let settled = history.len() + long - 1;

            for record in &records[settled..] {
                assert_eq!(record.short_mavg, record.long_mavg, "{short}/{long}");
                assert_eq!(record.signal, Exposure::Flat, "{short}/{long} at {}", record.date);
            }
            for record in &records[settled + 1..] {
                assert_eq!(record.positions, Some(Transition::Hold), "{short}/{long}");
            }
        }
    }

    #[test]
    fn test_output_is_aligned_with_input() {
        let prices = series(&[3.0, 1.0, 4.0, 1.0, 5.0, 9.0, 2.0, 6.0]);
        let signals = generate_signals(&prices, 2, 3).unwrap();
        assert!(prices.dates().eq(signals.dates()));
        assert_eq!(signals.short_window, 2);
        assert_eq!(signals.long_window, 3);
    }

    #[test]
    fn test_zero_window_is_rejected() {
        let prices = series(&[1.0, 2.0]);
        assert!(generate_signals(&prices, 0, 2).is_err());
        assert!(MACrossover::new(MACrossoverParams { short_window: 2, long_window: 0 }).is_err());
    }

    #[test]
    fn test_strategy_trait_delegates_to_generate_signals() {
        let prices = series(&[10.0, 11.0, 12.0, 11.0, 9.0, 8.0]);
        let strategy =
            MACrossover::new(MACrossoverParams { short_window: 2, long_window: 3 }).unwrap();
        assert_eq!(strategy.name(), "MA crossover (2/3)");
        assert_eq!(
            strategy.generate(&prices).unwrap(),
            generate_signals(&prices, 2, 3).unwrap()
        );
    }

    proptest! {
        #[test]
        fn prop_equal_windows_never_cross(
            closes in prop::collection::vec(1.0f64..1_000.0, 1..200),
            window in 1usize..40,
        ) {
            let signals = generate_signals(&series(&closes), window, window).unwrap();
            for record in signals.records() {
                prop_assert_eq!(record.signal, Exposure::Flat);
            }
            for record in &signals.records()[1..] {
                prop_assert_eq!(record.positions, Some(Transition::Hold));
            }
        }

        #[test]
        fn prop_positions_telescope(
            closes in prop::collection::vec(1.0f64..1_000.0, 2..200),
            short in 1usize..20,
            extra in 1usize..40,
        ) {
            let signals = generate_signals(&series(&closes), short, short + extra).unwrap();
            let records = signals.records();
            let sum: f64 = records[1..].iter().map(|r| r.positions_value()).sum();
            let first = records[0].signal.as_f64();
            let last = records[records.len() - 1].signal.as_f64();
            prop_assert_eq!(sum, last - first);
        }

        #[test]
        fn prop_positions_change_only_where_signal_changes(
            closes in prop::collection::vec(1.0f64..1_000.0, 2..200),
            short in 1usize..20,
            extra in 1usize..40,
        ) {
            let signals = generate_signals(&series(&closes), short, short + extra).unwrap();
            for pair in signals.records().windows(2) {
                let changed = pair[0].signal != pair[1].signal;
                prop_assert_eq!(pair[1].positions.map(|t| t.is_change()), Some(changed));
            }
        }
    }
}
