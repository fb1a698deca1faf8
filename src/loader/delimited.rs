use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::Result;
use crate::models::{CellValue, RawTable};

pub fn read_csv(path: &Path) -> Result<RawTable> {
    let file = File::open(path)?;
    read_csv_from(file)
}

/// Parse a delimited export with a header row. Blank lines are skipped.
pub fn read_csv_from<R: Read>(reader: R) -> Result<RawTable> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let columns: Vec<String> = rdr
        .headers()?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = record?;
        let row: Vec<CellValue> = record.iter().map(CellValue::text).collect();
        if row.iter().all(CellValue::is_empty) {
            continue;
        }
        rows.push(row);
    }

    Ok(RawTable::new(columns, rows))
}
