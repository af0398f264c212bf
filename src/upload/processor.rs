use chrono::{Datelike, Local};
use thiserror::Error;

use crate::excel::{checksum_bytes, load_workbook_from_bytes, sheet_names_from_bytes, ExcelError, Workbook};

use super::diagnostics::Diagnostics;
use super::general::{parse_general_sheet, GeneralSheetData, GENERAL_SHEET_NAMES};
use super::kpi::calculate_kpis;
use super::layout::MonthlyLayout;
use super::monthly::parse_monthly_tab;
use super::tab_name::{available_months, format_tab_name, nearest_eligible_tab};
use super::types::{AvailableMonth, Month, ProcessedData, UploadConfig, UploadResult};

/// Message shown when the upload cannot be read as a workbook
pub const PROCESSING_ERROR_MESSAGE: &str =
    "Erro ao processar o arquivo. Verifique se o formato está correto.";

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Selected month {0} is not between 1 and 12")]
    InvalidMonth(u32),

    #[error(transparent)]
    Excel(#[from] ExcelError),
}

impl UploadError {
    /// Message for the person who uploaded the file
    pub fn user_message(&self) -> String {
        match self {
            UploadError::InvalidMonth(month) => {
                format!("Mês selecionado inválido ({}). Escolha um mês entre 1 e 12.", month)
            }
            UploadError::Excel(_) => PROCESSING_ERROR_MESSAGE.to_string(),
        }
    }
}

/// Process an uploaded workbook against the selected cutoff month
pub fn process_file(bytes: &[u8], config: &UploadConfig, layout: &MonthlyLayout) -> UploadResult {
    process_file_at(bytes, config, layout, Local::now().year())
}

/// [`process_file`] with an explicit "current year" for the
/// historical/current split
pub fn process_file_at(
    bytes: &[u8],
    config: &UploadConfig,
    layout: &MonthlyLayout,
    current_year: i32,
) -> UploadResult {
    let result = load_workbook_from_bytes(bytes)
        .map_err(UploadError::from)
        .and_then(|workbook| process_workbook_at(&workbook, config, layout, current_year))
        .map(|data| ProcessedData {
            checksum: checksum_bytes(bytes),
            ..data
        });

    match result {
        Ok(data) => UploadResult::ok(data),
        Err(e) => {
            tracing::error!("Error processing file: {}", e);
            UploadResult::failed(e.user_message())
        }
    }
}

/// Run the extraction pipeline over an already loaded workbook
pub fn process_workbook_at(
    workbook: &Workbook,
    config: &UploadConfig,
    layout: &MonthlyLayout,
    current_year: i32,
) -> Result<ProcessedData, UploadError> {
    let month = Month::from_number(config.selected_month)
        .ok_or(UploadError::InvalidMonth(config.selected_month))?;
    let cutoff = config.cutoff();
    let selected_tab = format_tab_name(month, config.selected_year);

    let sheets_found = workbook.sheet_names();
    let mut row_count = 0usize;
    let mut warnings = Vec::new();

    tracing::info!(
        "Processing workbook with {} sheets, cutoff {}",
        sheets_found.len(),
        selected_tab
    );

    let general = match GENERAL_SHEET_NAMES.iter().find_map(|name| workbook.sheet(name)) {
        Some(sheet) => {
            let mut diagnostics = Diagnostics::new(&sheet.name);
            let data = parse_general_sheet(sheet, cutoff, current_year, &mut diagnostics);
            warnings.extend(diagnostics.into_warnings());
            row_count += sheet.row_count().saturating_sub(1);
            data
        }
        None => {
            tracing::info!("No general sheet found; revenue history left empty");
            GeneralSheetData::default()
        }
    };

    let monthly_sheet = workbook.sheet(&selected_tab).or_else(|| {
        let names = workbook.sheets.iter().map(|s| s.name.as_str());
        nearest_eligible_tab(names, cutoff).and_then(|name| workbook.sheet(name))
    });

    let (team, resolved_tab) = match monthly_sheet {
        Some(sheet) => {
            if sheet.name != selected_tab {
                tracing::info!("Tab '{}' not found; reading '{}' instead", selected_tab, sheet.name);
            }
            let mut diagnostics = Diagnostics::new(&sheet.name);
            let team = parse_monthly_tab(sheet, layout, &mut diagnostics);
            warnings.extend(diagnostics.into_warnings());
            row_count += sheet.row_count().saturating_sub(1);
            (team, Some(sheet.name.clone()))
        }
        None => {
            tracing::info!("No monthly tab at or before {}; team left empty", selected_tab);
            (Vec::new(), None)
        }
    };

    let kpis = calculate_kpis(
        &general.historical_data,
        &general.current_year_data,
        &team,
        cutoff,
        general.mentorship_start_date.as_deref(),
    );

    if !warnings.is_empty() {
        tracing::warn!("{} cells could not be read cleanly", warnings.len());
    }

    Ok(ProcessedData {
        sheets_found,
        row_count,
        kpis,
        historical_data: general.historical_data,
        current_year_data: general.current_year_data,
        team,
        years_available: general.years_available,
        selected_month: selected_tab,
        resolved_tab,
        mentorship_start_date: general.mentorship_start_date,
        checksum: String::new(),
        warnings,
    })
}

/// List the monthly tabs of an upload, newest first. An unreadable file
/// yields no months.
pub fn detect_available_months(bytes: &[u8]) -> Vec<AvailableMonth> {
    match sheet_names_from_bytes(bytes) {
        Ok(names) => available_months(names.iter().map(String::as_str)),
        Err(e) => {
            tracing::error!("Error detecting months: {}", e);
            Vec::new()
        }
    }
}
