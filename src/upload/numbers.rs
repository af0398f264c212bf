//! Locale-tolerant number reading for hand-typed spreadsheet cells.
//!
//! Every failure degrades to a fallback value; the caller's [`Diagnostics`]
//! records what was lost.

use crate::excel::CellValue;

use super::diagnostics::Diagnostics;
use super::types::WarningKind;

/// How text cells are cleaned before parsing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberStyle {
    /// Strip `R`, `$`, whitespace and `.` thousands separators, then turn
    /// the first `,` into a decimal point. `"R$ 1.234,56"` reads as 1234.56.
    Currency,
    /// Keep only digits, `.` and `,`, then turn the first `,` into a
    /// decimal point.
    Separators,
}

impl NumberStyle {
    pub fn clean(&self, raw: &str) -> String {
        let kept: String = match self {
            NumberStyle::Currency => raw
                .chars()
                .filter(|c| !matches!(c, 'R' | '$' | '.') && !c.is_whitespace())
                .collect(),
            NumberStyle::Separators => raw
                .chars()
                .filter(|c| c.is_ascii_digit() || matches!(c, '.' | ','))
                .collect(),
        };
        kept.replacen(',', ".", 1)
    }
}

/// Parse the longest leading decimal number in `s`.
///
/// Returns the value and how many bytes of `s` it used. Leading
/// whitespace is skipped; trailing garbage is ignored.
pub fn parse_float_prefix(s: &str) -> Option<(f64, usize)> {
    let bytes = s.as_bytes();
    let mut i = 0;

    while i < bytes.len() && (bytes[i] as char).is_ascii_whitespace() {
        i += 1;
    }
    let start = i;

    if i < bytes.len() && matches!(bytes[i], b'+' | b'-') {
        i += 1;
    }

    let int_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    let mut digits = i - int_start;

    if i < bytes.len() && bytes[i] == b'.' {
        let frac_start = i + 1;
        let mut j = frac_start;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if digits > 0 || j > frac_start {
            digits += j - frac_start;
            i = j;
        }
    }

    if digits == 0 {
        return None;
    }

    if i < bytes.len() && matches!(bytes[i], b'e' | b'E') {
        let mut j = i + 1;
        if j < bytes.len() && matches!(bytes[j], b'+' | b'-') {
            j += 1;
        }
        let exp_start = j;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if j > exp_start {
            i = j;
        }
    }

    s[start..i].parse::<f64>().ok().map(|v| (v, i))
}

/// Outcome of reading one cell as a number
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParsedCell {
    /// Numeric cell
    Number(f64),
    /// Text cell that yielded a number; `lossy` when text was left over
    Text { value: f64, lossy: bool },
    Blank,
    Invalid,
}

pub fn parse_cell(cell: &CellValue, style: NumberStyle) -> ParsedCell {
    match cell {
        CellValue::Number(n) | CellValue::DateTime(n) => ParsedCell::Number(*n),
        CellValue::String(s) if s.trim().is_empty() => ParsedCell::Blank,
        CellValue::String(s) => {
            let cleaned = style.clean(s);
            match parse_float_prefix(&cleaned) {
                Some((value, used)) => ParsedCell::Text {
                    value,
                    lossy: used < cleaned.len(),
                },
                None => ParsedCell::Invalid,
            }
        }
        CellValue::Empty => ParsedCell::Blank,
        CellValue::Boolean(_) | CellValue::Error(_) => ParsedCell::Invalid,
    }
}

/// Read a cell as a number, falling back to `fallback` when it is blank,
/// unreadable, or text that reads as zero. Numeric cells always pass
/// through unchanged.
pub fn read_number(
    cell: &CellValue,
    style: NumberStyle,
    fallback: f64,
    diagnostics: &mut Diagnostics,
    row: usize,
    col: usize,
) -> f64 {
    match parse_cell(cell, style) {
        ParsedCell::Number(n) => n,
        ParsedCell::Text { value, lossy } => {
            if lossy {
                diagnostics.push(
                    row,
                    col,
                    cell.display_text(),
                    WarningKind::LossyNumber,
                    format!("Only the leading part of the value was read ({})", value),
                );
            }
            if value == 0.0 {
                fallback
            } else {
                value
            }
        }
        ParsedCell::Blank => fallback,
        ParsedCell::Invalid => {
            diagnostics.push(
                row,
                col,
                cell.display_text(),
                WarningKind::UnparseableNumber,
                format!("Value is not a number; using {}", fallback),
            );
            fallback
        }
    }
}
