use core_types::{PortfolioSeries, Trade};

/// Pairs every entry in `portfolio` with the exit that follows it.
///
/// An entry still open on the last date yields a trade without exit fields.
pub fn extract_trades(portfolio: &PortfolioSeries) -> Vec<Trade> {
    let mut trades = Vec::new();
    let mut open: Option<Trade> = None;

    for record in portfolio.records() {
        if record.position_delta > 0 {
            open = Some(Trade {
                units: record.held_units,
                entry_date: record.date,
                entry_price: record.close,
                exit_date: None,
                exit_price: None,
            });
        } else if record.position_delta < 0 {
            if let Some(mut trade) = open.take() {
                trade.exit_date = Some(record.date);
                trade.exit_price = Some(record.close);
                trades.push(trade);
            }
        }
    }

    trades.extend(open);
    trades
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use core_types::PortfolioRecord;

    fn record(d: u32, close: f64, held_units: u32, position_delta: i64) -> PortfolioRecord {
        PortfolioRecord {
            date: NaiveDate::from_ymd_opt(2020, 5, d).unwrap(),
            close,
            held_units,
            position_delta,
            holdings: 0.0,
            cash: 0.0,
            total: 0.0,
            returns: None,
        }
    }

    #[test]
    fn test_pairs_entries_with_exits_and_keeps_open_trade() {
        let portfolio = PortfolioSeries::new(
            0.0,
            5,
            vec![
                record(1, 10.0, 5, 5),
                record(2, 11.0, 5, 0),
                record(3, 12.0, 0, -5),
                record(4, 9.0, 0, 0),
                record(5, 8.0, 5, 5),
            ],
        );

        let trades = extract_trades(&portfolio);
        assert_eq!(trades.len(), 2);
        assert_eq!(trades[0].entry_price, 10.0);
        assert_eq!(trades[0].exit_price, Some(12.0));
        assert_eq!(trades[0].pnl(), Some(10.0));
        assert!(!trades[1].is_closed());
        assert_eq!(trades[1].entry_price, 8.0);
    }

    #[test]
    fn test_no_position_changes_means_no_trades() {
        let portfolio = PortfolioSeries::new(0.0, 5, vec![record(1, 10.0, 0, 0)]);
        assert!(extract_trades(&portfolio).is_empty());
    }
}
