use std::fmt;
use thiserror::Error;

/// The logical column a lookup failed to find.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Timestamp,
    Pnl,
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnKind::Timestamp => write!(f, "timestamp"),
            ColumnKind::Pnl => write!(f, "pnl"),
        }
    }
}

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("unsupported file format: {0}")]
    UnsupportedFormat(String),

    #[error("could not find {0} column in data")]
    MissingColumn(ColumnKind),

    #[error("row {row}: cannot parse {column} value '{value}'")]
    DataFormat {
        row: usize,
        column: String,
        value: String,
    },

    #[error("no trade entries found in data ({0})")]
    EmptyDataset(&'static str),

    #[error("failed to read file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse delimited file: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to read spreadsheet: {0}")]
    Spreadsheet(#[from] calamine::Error),
}

pub type Result<T> = std::result::Result<T, ReportError>;
