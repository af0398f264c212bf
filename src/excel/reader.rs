use calamine::{open_workbook_auto, open_workbook_auto_from_rs, Data, Range, Reader, Sheets};
use chrono::{Duration, NaiveDate};
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{Cursor, Read, Seek};
use std::path::Path;

use super::types::*;

/// Load a workbook from disk
pub fn load_workbook(path: &str) -> Result<Workbook, ExcelError> {
    if !Path::new(path).exists() {
        return Err(ExcelError::FileNotFound(path.to_string()));
    }

    let mut sheets: Sheets<_> = open_workbook_auto(path)?;
    Ok(read_all_sheets(&mut sheets))
}

/// Load a workbook from an uploaded blob. The whole file is held in memory.
pub fn load_workbook_from_bytes(bytes: &[u8]) -> Result<Workbook, ExcelError> {
    let mut sheets = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))?;
    Ok(read_all_sheets(&mut sheets))
}

/// Sheet names only, without materializing any grid
pub fn sheet_names_from_bytes(bytes: &[u8]) -> Result<Vec<String>, ExcelError> {
    let sheets = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))?;
    Ok(sheets.sheet_names().to_vec())
}

fn read_all_sheets<RS>(workbook: &mut Sheets<RS>) -> Workbook
where
    RS: Read + Seek,
{
    let sheet_names = workbook.sheet_names().to_vec();
    let mut sheets = Vec::with_capacity(sheet_names.len());

    for name in sheet_names {
        // A sheet calamine cannot read (chart sheets, macro sheets) still
        // shows up by name, just without cells.
        let rows = match workbook.worksheet_range(&name) {
            Ok(range) => range_to_grid(&range),
            Err(e) => {
                tracing::warn!("Failed to read sheet '{}': {}", name, e);
                Vec::new()
            }
        };
        sheets.push(Worksheet::new(name, rows));
    }

    Workbook::new(sheets)
}

/// Expand a calamine range into a grid anchored at `A1`
fn range_to_grid(range: &Range<Data>) -> Vec<Vec<CellValue>> {
    let Some((start_row, start_col)) = range.start() else {
        return Vec::new();
    };
    let (start_row, start_col) = (start_row as usize, start_col as usize);

    let mut grid: Vec<Vec<CellValue>> = vec![Vec::new(); start_row];

    for row in range.rows() {
        let mut cells = vec![CellValue::Empty; start_col];
        cells.extend(row.iter().map(|cell| convert_cell_value(Some(cell))));

        // Trailing empties carry no information
        while matches!(cells.last(), Some(CellValue::Empty)) {
            cells.pop();
        }
        grid.push(cells);
    }

    grid
}

/// Convert calamine Data to our CellValue
fn convert_cell_value(cell: Option<&Data>) -> CellValue {
    match cell {
        None => CellValue::Empty,
        Some(data) => match data {
            Data::Empty => CellValue::Empty,
            Data::String(s) => CellValue::String(s.clone()),
            Data::Float(f) => CellValue::Number(*f),
            Data::Int(i) => CellValue::Number(*i as f64),
            Data::Bool(b) => CellValue::Boolean(*b),
            Data::DateTime(dt) => CellValue::DateTime(dt.as_f64()),
            Data::DateTimeIso(s) => CellValue::String(s.clone()),
            Data::DurationIso(s) => CellValue::String(s.clone()),
            Data::Error(e) => CellValue::Error(format!("{:?}", e)),
        },
    }
}

/// Decode a 1900-system spreadsheet date serial.
///
/// Serial 1 is 1900-01-01. The format counts a non-existent 1900-02-29
/// (serial 60), so serials before it are shifted by one day.
pub fn date_from_serial(value: f64) -> Option<NaiveDate> {
    if !value.is_finite() || value < 1.0 {
        return None;
    }

    let days = value.floor() as i64;
    let epoch = if days < 60 {
        NaiveDate::from_ymd_opt(1899, 12, 31)?
    } else {
        NaiveDate::from_ymd_opt(1899, 12, 30)?
    };

    epoch.checked_add_signed(Duration::days(days))
}

/// Compute SHA-256 checksum of an in-memory upload
pub fn checksum_bytes(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

/// Compute SHA-256 checksum of a file
pub fn compute_checksum(path: &str) -> Result<String, ExcelError> {
    let mut file = File::open(path)?;

    let mut hasher = Sha256::new();
    let mut buffer = [0; 8192];

    loop {
        let bytes_read = file.read(&mut buffer)?;

        if bytes_read == 0 {
            break;
        }

        hasher.update(&buffer[..bytes_read]);
    }

    let result = hasher.finalize();
    Ok(format!("{:x}", result))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_from_serial() {
        assert_eq!(date_from_serial(1.0), NaiveDate::from_ymd_opt(1900, 1, 1));
        assert_eq!(date_from_serial(59.0), NaiveDate::from_ymd_opt(1900, 2, 28));
        assert_eq!(date_from_serial(61.0), NaiveDate::from_ymd_opt(1900, 3, 1));
        assert_eq!(date_from_serial(45352.0), NaiveDate::from_ymd_opt(2024, 3, 1));
        // Time of day is ignored
        assert_eq!(date_from_serial(45352.75), NaiveDate::from_ymd_opt(2024, 3, 1));
        assert_eq!(date_from_serial(0.0), None);
        assert_eq!(date_from_serial(f64::NAN), None);
    }

    #[test]
    fn test_checksum_bytes() {
        assert_eq!(
            checksum_bytes(b"abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_corrupt_upload_is_rejected() {
        let result = load_workbook_from_bytes(b"definitely not a spreadsheet");
        assert!(matches!(result, Err(ExcelError::InvalidFormat(_))));
    }

    #[test]
    fn test_missing_file() {
        let result = load_workbook("/nonexistent/vendas.xlsx");
        assert!(matches!(result, Err(ExcelError::FileNotFound(_))));
    }
}
