//! Sales workbook ingestion.
//!
//! An uploaded workbook carries an aggregate "Geral" sheet (revenue by
//! month for several years) and one roster tab per month named `Mon-YY`.
//! This module extracts both, applies the user's cutoff month and derives
//! the dashboard KPIs.

pub mod types;
pub mod diagnostics;
pub mod numbers;
pub mod layout;
pub mod tab_name;
pub mod general;
pub mod monthly;
pub mod kpi;
pub mod processor;

// Re-export commonly used types and functions
pub use types::*;
pub use diagnostics::Diagnostics;
pub use layout::{LayoutError, MonthlyLayout};
pub use tab_name::{available_months, format_tab_name, nearest_eligible_tab, parse_tab_name};
pub use general::{parse_general_sheet, GeneralSheetData};
pub use monthly::parse_monthly_tab;
pub use kpi::calculate_kpis;
pub use processor::{
    detect_available_months, process_file, process_file_at, process_workbook_at, UploadError,
    PROCESSING_ERROR_MESSAGE,
};
