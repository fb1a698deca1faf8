use chrono::NaiveDateTime;
use std::path::PathBuf;

use crate::config::{Config, WatchMode};
use crate::core::sessions::SessionWindow;
use crate::models::{CellValue, RawTable, Side};
use crate::trading::trade_record::NormalizedTrade;

/// Build a text table from header names and string rows.
pub fn table(columns: &[&str], rows: &[&[&str]]) -> RawTable {
    RawTable::new(
        columns.iter().map(|c| c.to_string()).collect(),
        rows.iter()
            .map(|r| r.iter().map(|v| CellValue::text(v)).collect())
            .collect(),
    )
}

/// A TradingView-shaped table from (type, date/time, net P&L) triples.
pub fn typed_table(rows: &[(&str, &str, &str)]) -> RawTable {
    let rows: Vec<Vec<&str>> = rows.iter().map(|(t, d, p)| vec![*t, *d, *p]).collect();
    let refs: Vec<&[&str]> = rows.iter().map(|r| r.as_slice()).collect();
    table(&["Type", "Date/Time", "Net P&L USD"], &refs)
}

pub fn at(raw: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M").unwrap()
}

/// A trade at the given time, with its cycle derived from the default session.
pub fn trade(raw_time: &str, side: Side, pnl: f64) -> NormalizedTrade {
    let timestamp = at(raw_time);
    let cycle = SessionWindow::default()
        .cycle_for(timestamp.time())
        .expect("test trade outside session");
    NormalizedTrade {
        timestamp,
        cycle,
        side,
        pnl,
    }
}

/// Ten trades: five in cycle 0 (4 wins, net +650) and five in cycle 3
/// (1 win, net +100).
pub fn two_cycle_scenario() -> Vec<NormalizedTrade> {
    vec![
        trade("2024-01-15 07:05", Side::Long, 400.0),
        trade("2024-01-15 07:20", Side::Long, 100.0),
        trade("2024-01-16 07:35", Side::Short, 100.0),
        trade("2024-01-16 07:50", Side::Long, 100.0),
        trade("2024-01-17 08:10", Side::Short, -50.0),
        trade("2024-01-15 11:05", Side::Short, 300.0),
        trade("2024-01-16 11:20", Side::Long, -50.0),
        trade("2024-01-17 11:40", Side::Short, -50.0),
        trade("2024-01-18 12:00", Side::Long, -50.0),
        trade("2024-01-19 12:15", Side::Short, -50.0),
    ]
}

/// Polling config with near-zero stability delays, independent of the environment.
pub fn default_test_config() -> Config {
    Config {
        watch_dir: PathBuf::from("."),
        output_dir: PathBuf::from("."),
        watch_mode: WatchMode::Poll,
        poll_interval_secs: 1,
        settle_delay_ms: 1,
        stability_check_ms: 1,
        unstable_backoff_ms: 1,
        stability_max_attempts: 2,
        log_level: "debug".to_string(),
    }
}
