use crate::error::{ColumnKind, ReportError, Result};

/// A named predicate over a lowercased column header.
#[derive(Debug, Clone, Copy)]
pub struct ColumnMatcher {
    pub name: &'static str,
    pub matches: fn(&str) -> bool,
}

fn mentions_date_or_time(col: &str) -> bool {
    col.contains("date") || col.contains("time")
}

fn is_exactly_type(col: &str) -> bool {
    col.trim() == "type"
}

fn is_net_or_usd_pnl(col: &str) -> bool {
    (col.contains("p&l") || col.contains("pnl") || col.contains("profit"))
        && (col.contains("usd") || col.contains("net"))
}

fn mentions_pnl(col: &str) -> bool {
    col.contains("p&l") || col.contains("pnl")
}

pub const TIMESTAMP_MATCHERS: &[ColumnMatcher] = &[ColumnMatcher {
    name: "date_or_time",
    matches: mentions_date_or_time,
}];

pub const TRADE_TYPE_MATCHERS: &[ColumnMatcher] = &[ColumnMatcher {
    name: "exact_type",
    matches: is_exactly_type,
}];

/// Net/USD figures win over any other P&L-looking column.
pub const PNL_MATCHERS: &[ColumnMatcher] = &[
    ColumnMatcher {
        name: "net_or_usd_pnl",
        matches: is_net_or_usd_pnl,
    },
    ColumnMatcher {
        name: "any_pnl",
        matches: mentions_pnl,
    },
];

/// Apply matchers in priority order; within one matcher the first column in
/// table order wins.
pub fn first_match(columns: &[String], matchers: &[ColumnMatcher]) -> Option<usize> {
    let lower: Vec<String> = columns.iter().map(|c| c.to_lowercase()).collect();
    matchers
        .iter()
        .find_map(|m| lower.iter().position(|c| (m.matches)(c)))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedColumns {
    pub timestamp: usize,
    pub trade_type: Option<usize>,
    pub pnl: usize,
    pub timestamp_name: String,
    pub trade_type_name: Option<String>,
    pub pnl_name: String,
}

pub fn resolve_columns(columns: &[String]) -> Result<ResolvedColumns> {
    let timestamp = first_match(columns, TIMESTAMP_MATCHERS)
        .ok_or(ReportError::MissingColumn(ColumnKind::Timestamp))?;
    let trade_type = first_match(columns, TRADE_TYPE_MATCHERS);
    let pnl = first_match(columns, PNL_MATCHERS).ok_or(ReportError::MissingColumn(ColumnKind::Pnl))?;

    Ok(ResolvedColumns {
        timestamp,
        trade_type,
        pnl,
        timestamp_name: columns[timestamp].clone(),
        trade_type_name: trade_type.map(|i| columns[i].clone()),
        pnl_name: columns[pnl].clone(),
    })
}
