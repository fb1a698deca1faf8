use calamine::{open_workbook_auto, Data, Range, Reader};
use std::path::Path;
use tracing::debug;

use crate::error::Result;
use crate::models::{CellValue, RawTable, StrategyMetadata};

/// A named worksheet converted to a table.
#[derive(Debug, Clone)]
pub struct Sheet {
    pub name: String,
    pub table: RawTable,
}

/// Load every worksheet, then pick the trade list and the properties sheet.
pub fn read_workbook(path: &Path) -> Result<(RawTable, StrategyMetadata)> {
    let mut workbook = open_workbook_auto(path)?;

    let mut sheets = Vec::new();
    for name in workbook.sheet_names() {
        let range = workbook.worksheet_range(&name)?;
        sheets.push(Sheet {
            table: range_to_table(&range),
            name,
        });
    }

    Ok(split_workbook(sheets))
}

pub fn split_workbook(mut sheets: Vec<Sheet>) -> (RawTable, StrategyMetadata) {
    let metadata = find_properties_sheet(&sheets)
        .map(|i| extract_metadata(&sheets[i].table))
        .unwrap_or_default();

    let table = match select_trade_sheet(&sheets) {
        Some(i) => {
            debug!("Using sheet '{}' as trade list", sheets[i].name);
            sheets.swap_remove(i).table
        }
        None => RawTable::default(),
    };

    (table, metadata)
}

/// Sheet priority:
/// 1. first name containing both "trade" and "list"
/// 2. last name containing "trade"
/// 3. widest sheet (first one on ties)
pub fn select_trade_sheet(sheets: &[Sheet]) -> Option<usize> {
    let lower: Vec<String> = sheets.iter().map(|s| s.name.to_lowercase()).collect();

    if let Some(i) = lower
        .iter()
        .position(|n| n.contains("trade") && n.contains("list"))
    {
        return Some(i);
    }

    if let Some(i) = lower.iter().rposition(|n| n.contains("trade")) {
        return Some(i);
    }

    let mut widest: Option<usize> = None;
    for (i, sheet) in sheets.iter().enumerate() {
        match widest {
            Some(w) if sheets[w].table.width() >= sheet.table.width() => {}
            _ => widest = Some(i),
        }
    }
    widest
}

pub fn find_properties_sheet(sheets: &[Sheet]) -> Option<usize> {
    sheets
        .iter()
        .position(|s| s.name.to_lowercase().contains("propert"))
}

/// Build metadata from a two-column `name`/`value` sheet. Any other shape yields
/// empty metadata.
pub fn extract_metadata(table: &RawTable) -> StrategyMetadata {
    let find = |wanted: &str| {
        table
            .columns()
            .iter()
            .position(|c| c.trim().to_lowercase() == wanted)
    };

    let (Some(name_col), Some(value_col)) = (find("name"), find("value")) else {
        return StrategyMetadata::default();
    };

    (0..table.len())
        .filter_map(|row| {
            let key = table.cell(row, name_col).to_string();
            if key.is_empty() {
                None
            } else {
                Some((key, table.cell(row, value_col).clone()))
            }
        })
        .collect()
}

fn range_to_table(range: &Range<Data>) -> RawTable {
    let mut rows = range
        .rows()
        .filter(|row| !row.iter().all(|c| matches!(c, Data::Empty)));

    let Some(header) = rows.next() else {
        return RawTable::default();
    };
    let columns: Vec<String> = header.iter().map(|c| c.to_string().trim().to_string()).collect();
    let body: Vec<Vec<CellValue>> = rows.map(|row| row.iter().map(to_cell).collect()).collect();

    RawTable::new(columns, body)
}

fn to_cell(data: &Data) -> CellValue {
    match data {
        Data::Empty | Data::Error(_) => CellValue::Empty,
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::text(s),
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(CellValue::DateTime)
            .unwrap_or(CellValue::Number(dt.as_f64())),
    }
}
