use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Represents a cell value with type information
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "type", content = "value")]
pub enum CellValue {
    #[default]
    Empty,
    String(String),
    Number(f64),
    Boolean(bool),
    /// Date-formatted cell, kept as its spreadsheet serial number
    DateTime(f64),
    Error(String),
}

static EMPTY_CELL: CellValue = CellValue::Empty;

impl CellValue {
    /// Numeric view of the cell. Date cells count as numbers, the way
    /// a spreadsheet stores them.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) | CellValue::DateTime(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            CellValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Whether the cell holds a value that counts as "present": non-empty
    /// strings, non-zero numbers and `true`.
    pub fn is_truthy(&self) -> bool {
        match self {
            CellValue::Empty => false,
            CellValue::String(s) => !s.is_empty(),
            CellValue::Number(n) | CellValue::DateTime(n) => *n != 0.0 && !n.is_nan(),
            CellValue::Boolean(b) => *b,
            CellValue::Error(_) => true,
        }
    }

    /// Text rendering used for label matching and diagnostics
    pub fn display_text(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::String(s) => s.clone(),
            CellValue::Number(n) | CellValue::DateTime(n) => n.to_string(),
            CellValue::Boolean(b) => b.to_string(),
            CellValue::Error(e) => format!("#{}", e),
        }
    }
}

/// One sheet of a loaded workbook, addressed by absolute coordinates
/// (row 0, column 0 is `A1`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Worksheet {
    pub name: String,
    pub rows: Vec<Vec<CellValue>>,
}

impl Worksheet {
    pub fn new(name: impl Into<String>, rows: Vec<Vec<CellValue>>) -> Self {
        Worksheet {
            name: name.into(),
            rows,
        }
    }

    /// Cell at `(row, col)`; out-of-range positions read as empty
    pub fn cell(&self, row: usize, col: usize) -> &CellValue {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&EMPTY_CELL)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of populated columns in `row`
    pub fn row_len(&self, row: usize) -> usize {
        self.rows.get(row).map(Vec::len).unwrap_or(0)
    }
}

/// An in-memory workbook, sheets kept in file order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Workbook {
    pub sheets: Vec<Worksheet>,
}

impl Workbook {
    pub fn new(sheets: Vec<Worksheet>) -> Self {
        Workbook { sheets }
    }

    pub fn sheet_names(&self) -> Vec<String> {
        self.sheets.iter().map(|s| s.name.clone()).collect()
    }

    /// Exact, case-sensitive lookup
    pub fn sheet(&self, name: &str) -> Option<&Worksheet> {
        self.sheets.iter().find(|s| s.name == name)
    }
}

/// Excel-specific errors
#[derive(Debug, Error)]
pub enum ExcelError {
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Failed to open workbook: {0}")]
    InvalidFormat(#[from] calamine::Error),

    #[error("Failed to read file: {0}")]
    Io(#[from] std::io::Error),
}
