pub mod delimited;
pub mod spreadsheet;

use std::path::Path;
use tracing::debug;

use crate::error::{ReportError, Result};
use crate::models::{RawTable, StrategyMetadata};

pub const SUPPORTED_EXTENSIONS: &[&str] = &["xlsx", "xls", "csv"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Spreadsheet,
    Delimited,
}

impl InputFormat {
    pub fn from_path(path: &Path) -> Result<InputFormat> {
        let ext = extension_of(path);
        match ext.as_str() {
            "xlsx" | "xls" => Ok(InputFormat::Spreadsheet),
            "csv" => Ok(InputFormat::Delimited),
            _ => Err(ReportError::UnsupportedFormat(format!(".{}", ext))),
        }
    }
}

/// Lowercase extension without the dot, empty when there is none.
fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}

pub fn is_supported(path: &Path) -> bool {
    SUPPORTED_EXTENSIONS.contains(&extension_of(path).as_str())
}

/// Read an export into a table plus whatever strategy properties it carries.
/// Delimited files never carry properties.
pub fn load_file(path: &Path) -> Result<(RawTable, StrategyMetadata)> {
    let format = InputFormat::from_path(path)?;
    debug!("Loading {} as {:?}", path.display(), format);

    match format {
        InputFormat::Spreadsheet => spreadsheet::read_workbook(path),
        InputFormat::Delimited => Ok((delimited::read_csv(path)?, StrategyMetadata::default())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn extension_dispatch_is_case_insensitive() {
        assert_eq!(
            InputFormat::from_path(&PathBuf::from("a/B.XLSX")).unwrap(),
            InputFormat::Spreadsheet
        );
        assert_eq!(
            InputFormat::from_path(&PathBuf::from("run.xls")).unwrap(),
            InputFormat::Spreadsheet
        );
        assert_eq!(
            InputFormat::from_path(&PathBuf::from("run.Csv")).unwrap(),
            InputFormat::Delimited
        );
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let err = load_file(&PathBuf::from("export.json")).unwrap_err();
        assert!(matches!(err, ReportError::UnsupportedFormat(ref e) if e == ".json"));
        assert!(!is_supported(&PathBuf::from("notes")));
        assert!(is_supported(&PathBuf::from("x.CSV")));
    }
}
