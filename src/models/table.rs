use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// A single cell as read from an export file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CellValue {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
    DateTime(NaiveDateTime),
}

impl CellValue {
    /// Build a text cell, mapping blank strings to `Empty`.
    pub fn text(s: &str) -> Self {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(trimmed.to_string())
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            _ => None,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Text(s) => write!(f, "{}", s),
            CellValue::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    write!(f, "{}", *n as i64)
                } else {
                    write!(f, "{}", n)
                }
            }
            CellValue::Bool(b) => write!(f, "{}", b),
            CellValue::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
        }
    }
}

/// Rows of cells positionally aligned with `columns`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    columns: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

impl RawTable {
    /// Rows shorter than the header are padded with `Empty`, longer rows truncated.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, CellValue::Empty);
                row
            })
            .collect();
        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn cell(&self, row: usize, column: usize) -> &CellValue {
        self.rows
            .get(row)
            .and_then(|r| r.get(column))
            .unwrap_or(&CellValue::Empty)
    }
}

/// Strategy properties exported alongside the trade list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StrategyMetadata {
    values: HashMap<String, CellValue>,
}

impl StrategyMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: CellValue) {
        self.values.insert(key.into(), value);
    }

    /// Empty cells count as absent.
    pub fn get(&self, key: &str) -> Option<&CellValue> {
        self.values.get(key).filter(|v| !v.is_empty())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl FromIterator<(String, CellValue)> for StrategyMetadata {
    fn from_iter<I: IntoIterator<Item = (String, CellValue)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}
