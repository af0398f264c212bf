use serde::{Deserialize, Serialize};

/// Calendar month, named by its Portuguese abbreviation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Month {
    Jan,
    Fev,
    Mar,
    Abr,
    Mai,
    Jun,
    Jul,
    Ago,
    Set,
    Out,
    Nov,
    Dez,
}

impl Month {
    pub const ALL: [Month; 12] = [
        Month::Jan,
        Month::Fev,
        Month::Mar,
        Month::Abr,
        Month::Mai,
        Month::Jun,
        Month::Jul,
        Month::Ago,
        Month::Set,
        Month::Out,
        Month::Nov,
        Month::Dez,
    ];

    /// 1-based month number
    pub fn number(&self) -> u32 {
        *self as u32 + 1
    }

    pub fn from_number(n: u32) -> Option<Month> {
        n.checked_sub(1)
            .and_then(|i| Month::ALL.get(i as usize))
            .copied()
    }

    pub fn abbrev(&self) -> &'static str {
        match self {
            Month::Jan => "Jan",
            Month::Fev => "Fev",
            Month::Mar => "Mar",
            Month::Abr => "Abr",
            Month::Mai => "Mai",
            Month::Jun => "Jun",
            Month::Jul => "Jul",
            Month::Ago => "Ago",
            Month::Set => "Set",
            Month::Out => "Out",
            Month::Nov => "Nov",
            Month::Dez => "Dez",
        }
    }

    pub fn long_name(&self) -> &'static str {
        match self {
            Month::Jan => "Janeiro",
            Month::Fev => "Fevereiro",
            Month::Mar => "Março",
            Month::Abr => "Abril",
            Month::Mai => "Maio",
            Month::Jun => "Junho",
            Month::Jul => "Julho",
            Month::Ago => "Agosto",
            Month::Set => "Setembro",
            Month::Out => "Outubro",
            Month::Nov => "Novembro",
            Month::Dez => "Dezembro",
        }
    }

    /// Case-insensitive abbreviation lookup ("out" -> Out)
    pub fn from_abbrev(s: &str) -> Option<Month> {
        Month::ALL
            .iter()
            .find(|m| m.abbrev().eq_ignore_ascii_case(s))
            .copied()
    }

    /// Row label lookup for the general sheet: exact long name first,
    /// then a match on the first three letters of the long name.
    pub fn from_label(label: &str) -> Option<Month> {
        let label = label.trim().to_lowercase();

        Month::ALL
            .iter()
            .find(|m| m.long_name().to_lowercase() == label)
            .or_else(|| {
                Month::ALL.iter().find(|m| {
                    let prefix: String = m.long_name().to_lowercase().chars().take(3).collect();
                    label.starts_with(&prefix)
                })
            })
            .copied()
    }
}

/// A (year, month) position; ordering compares years first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Self {
        YearMonth { year, month }
    }
}

/// Revenue for one month of one year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyDataPoint {
    pub month: Month,
    pub year: i32,
    pub revenue: f64,
    pub goal: f64,
}

impl MonthlyDataPoint {
    pub fn position(&self) -> YearMonth {
        YearMonth::new(self.year, self.month.number())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyEntry {
    pub week: u32,
    pub revenue: f64,
    pub goal: f64,
}

/// One roster row of a monthly tab
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalespersonRecord {
    pub id: String,
    pub name: String,
    pub avatar: String,
    pub total_revenue: f64,
    pub monthly_goal: f64,
    pub active: bool,
    pub weeks: Vec<WeeklyEntry>,
    pub total_sales_count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KpiSet {
    pub annual_goal: f64,
    pub annual_realized: f64,
    pub last_year_growth: f64,
    pub mentorship_growth: f64,
    pub current_month_name: String,
    pub average_ticket: f64,
    pub conversion_rate: f64,
    pub cac: f64,
    pub ltv: f64,
    pub active_customers: u32,
    pub total_sales_count: u32,
}

/// What went wrong with a cell that was degraded or ignored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    /// Non-empty cell that could not be read as a number; counted as 0
    UnparseableNumber,
    /// String mixing `.` and `,` whose value may have been truncated
    LossyNumber,
    /// Mentorship start annotation with an unusable date next to it
    UnparseableDate,
    /// A (month, year) pair already seen in the same series
    DuplicatePoint,
    /// Expected header missing; empty result or fallback row used
    HeaderNotFound,
}

/// Cell-level diagnostic emitted while extracting a sheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellWarning {
    pub sheet: String,
    pub row: usize,
    pub column: usize,
    pub raw_value: String,
    pub kind: WarningKind,
    pub message: String,
}

/// Cutoff selected by the user
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadConfig {
    pub selected_month: u32,
    pub selected_year: i32,
}

impl UploadConfig {
    pub fn cutoff(&self) -> YearMonth {
        YearMonth::new(self.selected_year, self.selected_month)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedData {
    pub sheets_found: Vec<String>,
    pub row_count: usize,
    pub kpis: KpiSet,
    pub historical_data: Vec<MonthlyDataPoint>,
    pub current_year_data: Vec<MonthlyDataPoint>,
    pub team: Vec<SalespersonRecord>,
    pub years_available: Vec<i32>,
    /// Canonical tab name of the requested cutoff month
    pub selected_month: String,
    /// Tab the roster was actually read from
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved_tab: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mentorship_start_date: Option<String>,
    pub checksum: String,
    pub warnings: Vec<CellWarning>,
}

/// Result of processing an upload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<ProcessedData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl UploadResult {
    pub fn ok(data: ProcessedData) -> Self {
        UploadResult {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        UploadResult {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

/// A monthly tab found in the workbook
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailableMonth {
    pub month: u32,
    pub year: i32,
    pub tab_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_numbers() {
        assert_eq!(Month::Jan.number(), 1);
        assert_eq!(Month::Dez.number(), 12);
        assert_eq!(Month::from_number(10), Some(Month::Out));
        assert_eq!(Month::from_number(0), None);
        assert_eq!(Month::from_number(13), None);
    }

    #[test]
    fn test_month_from_label() {
        assert_eq!(Month::from_label("Março"), Some(Month::Mar));
        assert_eq!(Month::from_label("  FEVEREIRO "), Some(Month::Fev));
        assert_eq!(Month::from_label("set/24"), Some(Month::Set));
        assert_eq!(Month::from_label("Total"), None);
        assert_eq!(Month::from_label(""), None);
    }

    #[test]
    fn test_year_month_ordering() {
        assert!(YearMonth::new(2023, 12) < YearMonth::new(2024, 1));
        assert!(YearMonth::new(2024, 6) <= YearMonth::new(2024, 6));
        assert!(YearMonth::new(2024, 7) > YearMonth::new(2024, 6));
    }

    #[test]
    fn test_month_serializes_as_abbreviation() {
        let point = MonthlyDataPoint {
            month: Month::Out,
            year: 2025,
            revenue: 1500.0,
            goal: 0.0,
        };
        let json = serde_json::to_value(&point).unwrap();
        assert_eq!(json["month"], "Out");
    }

    #[test]
    fn test_failed_result_shape() {
        let json = serde_json::to_value(UploadResult::failed("erro")).unwrap();
        assert_eq!(json, serde_json::json!({ "success": false, "error": "erro" }));
    }
}
