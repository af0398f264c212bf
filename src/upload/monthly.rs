//! Extraction of a monthly roster tab (e.g. `Out-25`) into salesperson
//! records.

use crate::excel::{CellValue, Worksheet};

use super::diagnostics::Diagnostics;
use super::layout::MonthlyLayout;
use super::numbers::{read_number, NumberStyle};
use super::types::{SalespersonRecord, WarningKind, WeeklyEntry};

const HEADER_MARKERS: [&str; 2] = ["consultor", "comercial"];
const FOOTER_LABEL: &str = "total";

fn is_header_label(text: &str) -> bool {
    let lower = text.to_lowercase();
    HEADER_MARKERS.iter().any(|marker| lower.contains(marker))
}

/// A roster row is numbered in the number column, either as a number or
/// as digit-only text.
fn has_sequence_number(cell: &CellValue) -> bool {
    match cell {
        CellValue::Number(_) | CellValue::DateTime(_) => true,
        CellValue::String(s) => {
            let s = s.trim();
            !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
        }
        _ => false,
    }
}

fn find_header_row(sheet: &Worksheet, layout: &MonthlyLayout) -> Option<usize> {
    (0..layout.header_scan_rows.min(sheet.row_count()))
        .find(|&row| is_header_label(&sheet.cell(row, layout.name).display_text()))
}

/// Parse one monthly tab. Rows are read until a `Total` footer or the end
/// of the sheet.
pub fn parse_monthly_tab(
    sheet: &Worksheet,
    layout: &MonthlyLayout,
    diagnostics: &mut Diagnostics,
) -> Vec<SalespersonRecord> {
    tracing::debug!("[parse_monthly_tab] Total rows: {}", sheet.row_count());

    let header_row = match find_header_row(sheet, layout) {
        Some(row) => {
            tracing::debug!("[parse_monthly_tab] Header found at row {}", row + 1);
            row
        }
        None => {
            tracing::warn!(
                "[parse_monthly_tab] No roster header in '{}', assuming row {}",
                sheet.name,
                layout.fallback_header_row + 1
            );
            diagnostics.push(
                layout.fallback_header_row,
                layout.name,
                sheet.cell(layout.fallback_header_row, layout.name).display_text(),
                WarningKind::HeaderNotFound,
                format!(
                    "No roster header in the first {} rows; using row {}",
                    layout.header_scan_rows,
                    layout.fallback_header_row + 1
                ),
            );
            layout.fallback_header_row
        }
    };

    let mut team: Vec<SalespersonRecord> = Vec::new();

    for row in (header_row + layout.data_offset)..sheet.row_count() {
        let Some(name) = sheet.cell(row, layout.name).as_str().map(str::trim) else {
            continue;
        };
        if name.is_empty() {
            continue;
        }
        if name.to_lowercase() == FOOTER_LABEL {
            tracing::debug!("[parse_monthly_tab] Total row reached at row {}", row + 1);
            break;
        }
        if is_header_label(name) {
            continue;
        }

        if !has_sequence_number(sheet.cell(row, layout.number)) {
            tracing::debug!("[parse_monthly_tab] Row {} skipped (no number): {}", row + 1, name);
            continue;
        }

        let weeks: Vec<WeeklyEntry> = layout
            .weeks
            .iter()
            .enumerate()
            .map(|(i, &col)| WeeklyEntry {
                week: i as u32 + 1,
                revenue: read_number(
                    sheet.cell(row, col),
                    NumberStyle::Separators,
                    0.0,
                    diagnostics,
                    row,
                    col,
                ),
                goal: 0.0,
            })
            .collect();
        let weekly_total: f64 = weeks.iter().map(|w| w.revenue).sum();

        let total_revenue = read_number(
            sheet.cell(row, layout.result),
            NumberStyle::Separators,
            weekly_total,
            diagnostics,
            row,
            layout.result,
        );
        let monthly_goal = read_number(
            sheet.cell(row, layout.goal),
            NumberStyle::Separators,
            0.0,
            diagnostics,
            row,
            layout.goal,
        );

        tracing::debug!(
            "[parse_monthly_tab] Salesperson: {}, result: {}, goal: {}",
            name,
            total_revenue,
            monthly_goal
        );

        team.push(SalespersonRecord {
            id: (team.len() + 1).to_string(),
            name: name.to_string(),
            avatar: String::new(),
            total_revenue,
            monthly_goal,
            active: true,
            weeks,
            total_sales_count: 0,
        });
    }

    tracing::info!("[parse_monthly_tab] Salespeople found in '{}': {}", sheet.name, team.len());
    team
}
