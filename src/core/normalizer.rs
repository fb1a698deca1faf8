use chrono::{DateTime, NaiveDate, NaiveDateTime};
use tracing::debug;

use crate::core::columns::ResolvedColumns;
use crate::core::sessions::SessionWindow;
use crate::error::{ReportError, Result};
use crate::models::{CellValue, RawTable, Side};
use crate::trading::trade_record::NormalizedTrade;

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
];

#[derive(Debug, Clone, PartialEq)]
pub struct Normalized {
    pub trades: Vec<NormalizedTrade>,
    /// Rows that passed the entry filter, before the session cut.
    pub entry_rows: usize,
    pub dropped_outside_session: usize,
}

pub fn parse_timestamp(value: &CellValue) -> Option<NaiveDateTime> {
    match value {
        CellValue::DateTime(dt) => Some(*dt),
        CellValue::Text(raw) => parse_timestamp_str(raw),
        _ => None,
    }
}

fn parse_timestamp_str(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    for fmt in DATETIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(parsed);
        }
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.naive_local());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Accepts plain numbers plus "$1,250", "−50" and "(50)" style text.
pub fn parse_pnl(value: &CellValue) -> Option<f64> {
    match value {
        CellValue::Number(n) => Some(*n),
        CellValue::Text(raw) => {
            let mut s: String = raw
                .chars()
                .filter(|c| !matches!(c, '$' | ',' | ' '))
                .map(|c| if c == '\u{2212}' { '-' } else { c })
                .collect();
            let negative = s.starts_with('(') && s.ends_with(')');
            if negative {
                s = s[1..s.len() - 1].to_string();
            }
            let parsed: f64 = s.parse().ok()?;
            Some(if negative { -parsed } else { parsed })
        }
        _ => None,
    }
}

fn is_entry(value: &CellValue) -> bool {
    match value {
        CellValue::Text(s) => s.to_lowercase().contains("entry"),
        _ => false,
    }
}

fn data_error(table: &RawTable, row: usize, column: usize) -> ReportError {
    ReportError::DataFormat {
        row: row + 1,
        column: table.columns()[column].clone(),
        value: table.cell(row, column).to_string(),
    }
}

/// Turn raw export rows into session trades.
///
/// Timestamps are validated on every row; P&L only on entry rows inside the
/// session, since exit rows are discarded anyway.
pub fn normalize(
    table: &RawTable,
    columns: &ResolvedColumns,
    window: &SessionWindow,
) -> Result<Normalized> {
    let mut timestamps = Vec::with_capacity(table.len());
    for row in 0..table.len() {
        let ts = parse_timestamp(table.cell(row, columns.timestamp))
            .ok_or_else(|| data_error(table, row, columns.timestamp))?;
        timestamps.push(ts);
    }

    let entries: Vec<usize> = match columns.trade_type {
        Some(type_col) => (0..table.len())
            .filter(|&row| is_entry(table.cell(row, type_col)))
            .collect(),
        None => (0..table.len()).collect(),
    };

    if entries.is_empty() {
        return Err(ReportError::EmptyDataset("no entry rows"));
    }

    let mut trades = Vec::with_capacity(entries.len());
    let mut dropped = 0;
    for &row in &entries {
        let timestamp = timestamps[row];
        let Some(cycle) = window.cycle_for(timestamp.time()) else {
            dropped += 1;
            continue;
        };

        let pnl = parse_pnl(table.cell(row, columns.pnl))
            .ok_or_else(|| data_error(table, row, columns.pnl))?;

        let side = match columns.trade_type {
            Some(type_col) => Side::from_trade_type(&table.cell(row, type_col).to_string()),
            None => Side::Unknown,
        };

        trades.push(NormalizedTrade {
            timestamp,
            cycle,
            side,
            pnl,
        });
    }

    debug!(
        "{} entry rows, {} inside session, {} outside",
        entries.len(),
        trades.len(),
        dropped
    );

    if trades.is_empty() {
        return Err(ReportError::EmptyDataset("no entries inside the session window"));
    }

    Ok(Normalized {
        trades,
        entry_rows: entries.len(),
        dropped_outside_session: dropped,
    })
}
