//! Extraction of the aggregate "Geral" sheet: revenue by month for each
//! year column, plus the mentorship start annotation.

use std::collections::HashSet;

use crate::excel::{date_from_serial, CellValue, Worksheet};

use super::diagnostics::Diagnostics;
use super::numbers::{read_number, NumberStyle};
use super::types::{Month, MonthlyDataPoint, WarningKind, YearMonth};

/// Accepted names for the aggregate sheet, in lookup order
pub const GENERAL_SHEET_NAMES: [&str; 3] = ["Geral", "geral", "GERAL"];

const YEAR_SCAN_ROWS: usize = 5;
/// Column 0 holds row labels
const YEAR_SCAN_COLS: std::ops::Range<usize> = 1..10;
const MIN_YEAR: f64 = 2020.0;
const MAX_YEAR: f64 = 2030.0;

const MENTORSHIP_SCAN_ROWS: usize = 20;
const MENTORSHIP_SCAN_COLS: usize = 15;
const MENTORSHIP_LABEL: &str = "início mentoria";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeneralSheetData {
    pub historical_data: Vec<MonthlyDataPoint>,
    pub current_year_data: Vec<MonthlyDataPoint>,
    pub years_available: Vec<i32>,
    pub mentorship_start_date: Option<String>,
}

/// A year found in the header row and the column holding its figures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct YearColumn {
    col: usize,
    year: i32,
}

/// Parse the aggregate sheet.
///
/// Points after `cutoff` are dropped. The remaining points are split on
/// `current_year` (the wall-clock year at parse time), not on the cutoff
/// year.
pub fn parse_general_sheet(
    sheet: &Worksheet,
    cutoff: YearMonth,
    current_year: i32,
    diagnostics: &mut Diagnostics,
) -> GeneralSheetData {
    tracing::debug!("[parse_general_sheet] Total rows: {}", sheet.row_count());

    let mut data = GeneralSheetData {
        mentorship_start_date: find_mentorship_start(sheet, diagnostics),
        ..Default::default()
    };

    let Some((year_row, year_columns)) = find_year_row(sheet) else {
        tracing::warn!("[parse_general_sheet] No year header row in sheet '{}'", sheet.name);
        diagnostics.push(
            0,
            0,
            "",
            WarningKind::HeaderNotFound,
            format!("No year between {} and {} in the first {} rows", MIN_YEAR, MAX_YEAR, YEAR_SCAN_ROWS),
        );
        return data;
    };

    let mut years: Vec<i32> = year_columns.iter().map(|yc| yc.year).collect();
    years.sort_unstable();
    years.dedup();
    data.years_available = years;

    tracing::info!(
        "[parse_general_sheet] Year row found at row {}; years {:?}",
        year_row + 1,
        data.years_available
    );

    let mut seen: HashSet<YearMonth> = HashSet::new();

    for row in (year_row + 1)..sheet.row_count() {
        let label_cell = sheet.cell(row, 0);
        if !label_cell.is_truthy() {
            continue;
        }

        let Some(month) = Month::from_label(&label_cell.display_text()) else {
            continue;
        };

        for &YearColumn { col, year } in &year_columns {
            let position = YearMonth::new(year, month.number());
            if position > cutoff {
                continue;
            }

            let cell = sheet.cell(row, col);
            if !seen.insert(position) {
                diagnostics.push(
                    row,
                    col,
                    cell.display_text(),
                    WarningKind::DuplicatePoint,
                    format!("{} {} already read; value ignored", month.abbrev(), year),
                );
                continue;
            }

            let revenue = read_number(cell, NumberStyle::Currency, 0.0, diagnostics, row, col);
            let point = MonthlyDataPoint {
                month,
                year,
                revenue,
                goal: 0.0,
            };

            if year == current_year {
                data.current_year_data.push(point);
            } else {
                data.historical_data.push(point);
            }
        }
    }

    tracing::info!(
        "[parse_general_sheet] Historical points: {}, current year points: {}",
        data.historical_data.len(),
        data.current_year_data.len()
    );

    data
}

/// First row within the scan window holding plausible years, with every
/// year column it contains
fn find_year_row(sheet: &Worksheet) -> Option<(usize, Vec<YearColumn>)> {
    for row in 0..YEAR_SCAN_ROWS.min(sheet.row_count()) {
        let year_columns: Vec<YearColumn> = YEAR_SCAN_COLS
            .filter_map(|col| {
                let value = sheet.cell(row, col).as_number()?;
                let is_year = (MIN_YEAR..=MAX_YEAR).contains(&value) && value.fract() == 0.0;
                is_year.then(|| YearColumn {
                    col,
                    year: value as i32,
                })
            })
            .collect();

        if !year_columns.is_empty() {
            return Some((row, year_columns));
        }
    }

    None
}

/// Scan the top-left box for the mentorship start label.
///
/// The whole box is scanned; a later label overwrites an earlier one.
fn find_mentorship_start(sheet: &Worksheet, diagnostics: &mut Diagnostics) -> Option<String> {
    let mut found = None;

    for row in 0..MENTORSHIP_SCAN_ROWS.min(sheet.row_count()) {
        for col in 0..MENTORSHIP_SCAN_COLS.min(sheet.row_len(row)) {
            let is_label = sheet
                .cell(row, col)
                .as_str()
                .map(|s| s.to_lowercase().contains(MENTORSHIP_LABEL))
                .unwrap_or(false);
            if !is_label {
                continue;
            }

            let (date_row, date_col) = if sheet.cell(row, col + 1).is_truthy() {
                (row, col + 1)
            } else {
                (row + 1, col)
            };
            let date_cell = sheet.cell(date_row, date_col);
            if !date_cell.is_truthy() {
                continue;
            }

            match date_cell {
                CellValue::Number(serial) | CellValue::DateTime(serial) => {
                    match date_from_serial(*serial) {
                        Some(date) => {
                            let iso = date.format("%Y-%m-%d").to_string();
                            tracing::info!("[parse_general_sheet] Mentorship start date: {}", iso);
                            found = Some(iso);
                        }
                        None => diagnostics.push(
                            date_row,
                            date_col,
                            date_cell.display_text(),
                            WarningKind::UnparseableDate,
                            "Mentorship start is not a valid date serial",
                        ),
                    }
                }
                CellValue::String(s) => {
                    tracing::info!("[parse_general_sheet] Mentorship start date (text): {}", s);
                    found = Some(s.clone());
                }
                other => diagnostics.push(
                    date_row,
                    date_col,
                    other.display_text(),
                    WarningKind::UnparseableDate,
                    "Mentorship start is neither a date nor text",
                ),
            }
        }
    }

    found
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(v: &str) -> CellValue {
        CellValue::String(v.to_string())
    }

    fn n(v: f64) -> CellValue {
        CellValue::Number(v)
    }

    fn e() -> CellValue {
        CellValue::Empty
    }

    fn month_rows(years: &[i32]) -> Vec<Vec<CellValue>> {
        Month::ALL
            .iter()
            .map(|m| {
                let mut row = vec![s(m.long_name())];
                row.extend(years.iter().map(|y| n(*y as f64 * 10.0 + m.number() as f64)));
                row
            })
            .collect()
    }

    fn sheet_with_years(years: &[i32]) -> Worksheet {
        let mut rows = vec![vec![s("Faturamento mensal")]];
        let mut header = vec![s("Mês")];
        header.extend(years.iter().map(|y| n(*y as f64)));
        rows.push(header);
        rows.extend(month_rows(years));
        Worksheet::new("Geral", rows)
    }

    fn parse(sheet: &Worksheet, cutoff: YearMonth, current_year: i32) -> (GeneralSheetData, Vec<WarningKind>) {
        let mut diagnostics = Diagnostics::new(sheet.name.clone());
        let data = parse_general_sheet(sheet, cutoff, current_year, &mut diagnostics);
        let kinds = diagnostics.into_warnings().into_iter().map(|w| w.kind).collect();
        (data, kinds)
    }

    #[test]
    fn test_cutoff_excludes_later_months() {
        let sheet = sheet_with_years(&[2023, 2024, 2025]);
        let cutoff = YearMonth::new(2024, 6);
        let (data, _) = parse(&sheet, cutoff, 2025);

        assert_eq!(data.years_available, vec![2023, 2024, 2025]);
        assert!(data
            .historical_data
            .iter()
            .chain(data.current_year_data.iter())
            .all(|p| p.position() <= cutoff));
        // 12 months of 2023 and Jan-Jun 2024
        assert_eq!(data.historical_data.len(), 18);
        assert!(data.current_year_data.is_empty());
    }

    #[test]
    fn test_partition_uses_wall_clock_year() {
        let sheet = sheet_with_years(&[2024, 2025]);
        let (data, _) = parse(&sheet, YearMonth::new(2025, 2), 2025);

        assert_eq!(data.current_year_data.len(), 2);
        assert_eq!(data.current_year_data[0].month, Month::Jan);
        assert_eq!(data.current_year_data[1].month, Month::Fev);
        assert_eq!(data.current_year_data[1].revenue, 20252.0);
        assert_eq!(data.historical_data.len(), 12);

        // Same data parsed a year later: everything is history
        let (later, _) = parse(&sheet, YearMonth::new(2025, 2), 2026);
        assert!(later.current_year_data.is_empty());
        assert_eq!(later.historical_data.len(), 14);
    }

    #[test]
    fn test_every_year_in_header_row_is_recorded() {
        let rows = vec![
            vec![e(), e(), s("Resumo")],
            vec![s("Mês"), n(2022.0), s("x"), n(2023.0)],
            vec![s("Janeiro"), n(100.0), e(), s("R$ 1.000,50")],
        ];
        let sheet = Worksheet::new("Geral", rows);
        let (data, _) = parse(&sheet, YearMonth::new(2023, 12), 2030);

        assert_eq!(data.years_available, vec![2022, 2023]);
        assert_eq!(data.historical_data.len(), 2);
        assert_eq!(data.historical_data[1].revenue, 1000.5);
    }

    #[test]
    fn test_year_row_outside_window_yields_nothing() {
        let mut rows: Vec<Vec<CellValue>> = (0..5).map(|_| vec![s("nota")]).collect();
        rows.push(vec![s("Mês"), n(2024.0)]);
        rows.push(vec![s("Janeiro"), n(100.0)]);
        let sheet = Worksheet::new("Geral", rows);

        let (data, kinds) = parse(&sheet, YearMonth::new(2024, 12), 2024);
        assert!(data.historical_data.is_empty());
        assert!(data.current_year_data.is_empty());
        assert!(data.years_available.is_empty());
        assert_eq!(kinds, vec![WarningKind::HeaderNotFound]);
    }

    #[test]
    fn test_years_outside_range_or_in_label_column_are_ignored() {
        let rows = vec![
            vec![n(2024.0), n(2019.0), n(2031.0), n(2024.5)],
            vec![s("Mês"), n(2021.0)],
        ];
        let sheet = Worksheet::new("Geral", rows);
        let (data, _) = parse(&sheet, YearMonth::new(2021, 12), 2021);
        assert_eq!(data.years_available, vec![2021]);
    }

    #[test]
    fn test_unknown_labels_are_skipped_not_terminal() {
        let rows = vec![
            vec![s("Mês"), n(2024.0)],
            vec![s("Janeiro"), n(10.0)],
            vec![s("Total parcial"), n(999.0)],
            vec![e(), n(5.0)],
            vec![s("fev."), n(20.0)],
        ];
        let sheet = Worksheet::new("Geral", rows);
        let (data, _) = parse(&sheet, YearMonth::new(2024, 12), 2020);
        let months: Vec<Month> = data.historical_data.iter().map(|p| p.month).collect();
        assert_eq!(months, vec![Month::Jan, Month::Fev]);
    }

    #[test]
    fn test_unparseable_revenue_becomes_zero_with_warning() {
        let rows = vec![
            vec![s("Mês"), n(2024.0)],
            vec![s("Março"), s("sem dados")],
        ];
        let sheet = Worksheet::new("Geral", rows);
        let (data, kinds) = parse(&sheet, YearMonth::new(2024, 12), 2024);
        assert_eq!(data.current_year_data[0].revenue, 0.0);
        assert_eq!(data.current_year_data[0].goal, 0.0);
        assert_eq!(kinds, vec![WarningKind::UnparseableNumber]);
    }

    #[test]
    fn test_duplicate_month_rows_keep_first() {
        let rows = vec![
            vec![s("Mês"), n(2024.0)],
            vec![s("Janeiro"), n(10.0)],
            vec![s("Jan (projeção)"), n(99.0)],
        ];
        let sheet = Worksheet::new("Geral", rows);
        let (data, kinds) = parse(&sheet, YearMonth::new(2024, 12), 2024);
        assert_eq!(data.current_year_data.len(), 1);
        assert_eq!(data.current_year_data[0].revenue, 10.0);
        assert_eq!(kinds, vec![WarningKind::DuplicatePoint]);
    }

    #[test]
    fn test_mentorship_date_from_serial_next_to_label() {
        let rows = vec![
            vec![s("Mês"), n(2024.0), e(), e(), e(), e(), e(), e(), e(), e(), s("Início Mentoria"), n(45352.0)],
        ];
        let sheet = Worksheet::new("Geral", rows);
        let (data, _) = parse(&sheet, YearMonth::new(2024, 12), 2024);
        assert_eq!(data.mentorship_start_date.as_deref(), Some("2024-03-01"));
    }

    #[test]
    fn test_mentorship_date_below_label_as_text() {
        let rows = vec![
            vec![s("INÍCIO MENTORIA")],
            vec![s("01/03/2024")],
        ];
        let sheet = Worksheet::new("Geral", rows);
        let (data, _) = parse(&sheet, YearMonth::new(2024, 12), 2024);
        assert_eq!(data.mentorship_start_date.as_deref(), Some("01/03/2024"));
    }

    #[test]
    fn test_later_mentorship_label_overwrites_earlier() {
        let rows = vec![
            vec![s("Início mentoria"), s("2023-05-01")],
            vec![],
            vec![s("Início mentoria (renovação)"), s("2024-02-01")],
        ];
        let sheet = Worksheet::new("Geral", rows);
        let (data, _) = parse(&sheet, YearMonth::new(2024, 12), 2024);
        assert_eq!(data.mentorship_start_date.as_deref(), Some("2024-02-01"));
    }

    #[test]
    fn test_mentorship_label_outside_box_is_ignored() {
        let mut row = vec![e(); 15];
        row.push(s("Início mentoria"));
        row.push(s("2024-01-01"));
        let sheet = Worksheet::new("Geral", vec![row]);
        let (data, _) = parse(&sheet, YearMonth::new(2024, 12), 2024);
        assert_eq!(data.mentorship_start_date, None);
    }
}
