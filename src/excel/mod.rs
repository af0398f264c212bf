//! Excel module for loading uploaded workbooks into an in-memory grid.
//!
//! This module provides:
//! - Loading xlsx / xls / xlsb / ods files from disk or from raw bytes
//! - An owned, absolutely-addressed cell grid per sheet
//! - Spreadsheet date serial decoding
//! - Upload checksums

pub mod types;
pub mod reader;

// Re-export commonly used types and functions
pub use types::*;
pub use reader::{
    checksum_bytes, compute_checksum, date_from_serial, load_workbook, load_workbook_from_bytes,
    sheet_names_from_bytes,
};
