use analytics::PerformanceReport;
use comfy_table::{Cell, CellAlignment, Table, presets::UTF8_FULL};
use core_types::{Trade, Transition, TransitionMarker};

fn money(value: f64) -> String {
    format!("{value:.2}")
}

fn optional(value: Option<f64>, suffix: &str) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{v:.2}{suffix}"))
}

/// The performance summary as a two-column table.
pub fn report_table(symbol: &str, report: &PerformanceReport) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec!["Metric", "Value"]);

    let rows = [
        ("Symbol", symbol.to_string()),
        ("Period", format!("{} to {}", report.start_date, report.end_date)),
        ("Bars", report.bars.to_string()),
        ("Initial capital", money(report.initial_capital)),
        ("Final equity", money(report.final_equity)),
        ("Net profit", money(report.total_net_profit)),
        ("Total return", optional(report.total_return_pct, "%")),
        (
            "Max drawdown",
            format!(
                "{} ({:.2}%)",
                money(report.max_drawdown),
                report.max_drawdown_pct
            ),
        ),
        ("Sharpe (per bar)", optional(report.sharpe_ratio, "")),
        ("Exposure", format!("{:.2}%", report.exposure_pct)),
        ("Entries", report.total_entries.to_string()),
        ("Closed trades", report.closed_trades.to_string()),
        ("Win rate", optional(report.win_rate_pct, "%")),
        ("Profit factor", optional(report.profit_factor, "")),
        ("Avg holding (days)", optional(report.average_holding_days, "")),
    ];
    for (metric, value) in rows {
        table.add_row(vec![
            Cell::new(metric),
            Cell::new(value).set_alignment(CellAlignment::Right),
        ]);
    }
    table
}

/// One row per round trip.
pub fn trades_table(trades: &[Trade]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["Entry", "Entry price", "Exit", "Exit price", "Units", "P&L"]);

    for trade in trades {
        table.add_row(vec![
            trade.entry_date.to_string(),
            money(trade.entry_price),
            trade.exit_date.map_or_else(|| "open".to_string(), |d| d.to_string()),
            optional(trade.exit_price, ""),
            trade.units.to_string(),
            optional(trade.pnl(), ""),
        ]);
    }
    table
}

/// The entry/exit markers a chart would overlay on the price axis.
pub fn markers_table(markers: &[TransitionMarker]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["Date", "Close", "Short MA", "Long MA", "Signal"]);

    for marker in markers {
        let label = match marker.transition {
            Transition::Entry => "entry",
            Transition::Exit => "exit",
            Transition::Hold => "hold",
        };
        table.add_row(vec![
            marker.date.to_string(),
            money(marker.close),
            money(marker.short_mavg),
            money(marker.long_mavg),
            label.to_string(),
        ]);
    }
    table
}
