use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Number of week columns every roster row carries
pub const WEEKS_PER_MONTH: usize = 5;

/// Column offsets (0-based) of a monthly roster tab.
///
/// The default matches the standard template:
/// A number, B name, C daily target, D weekly target, E/G/I/K/M weeks 1-5,
/// P period result, R period goal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MonthlyLayout {
    pub number: usize,
    pub name: usize,
    pub daily_target: usize,
    pub weekly_target: usize,
    pub weeks: [usize; WEEKS_PER_MONTH],
    pub result: usize,
    pub goal: usize,
    /// Rows searched for the roster header
    pub header_scan_rows: usize,
    /// Header row used when no header is found
    pub fallback_header_row: usize,
    /// Rows between the header and the first salesperson
    pub data_offset: usize,
}

impl Default for MonthlyLayout {
    fn default() -> Self {
        MonthlyLayout {
            number: 0,
            name: 1,
            daily_target: 2,
            weekly_target: 3,
            weeks: [4, 6, 8, 10, 12],
            result: 15,
            goal: 17,
            header_scan_rows: 10,
            fallback_header_row: 1,
            data_offset: 2,
        }
    }
}

#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("Failed to read layout file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid layout: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid layout: data rows must start below the header (dataOffset = 0)")]
    ZeroDataOffset,
}

impl MonthlyLayout {
    pub fn from_json(json: &str) -> Result<Self, LayoutError> {
        let layout: MonthlyLayout = serde_json::from_str(json)?;
        layout.validate()?;
        Ok(layout)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, LayoutError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn validate(&self) -> Result<(), LayoutError> {
        if self.data_offset == 0 {
            return Err(LayoutError::ZeroDataOffset);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout_offsets() {
        let layout = MonthlyLayout::default();
        assert_eq!(layout.name, 1);
        assert_eq!(layout.weeks, [4, 6, 8, 10, 12]);
        assert_eq!(layout.result, 15);
        assert_eq!(layout.goal, 17);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let layout = MonthlyLayout::from_json(r#"{ "result": 14, "weeks": [3, 5, 7, 9, 11] }"#).unwrap();
        assert_eq!(layout.result, 14);
        assert_eq!(layout.weeks, [3, 5, 7, 9, 11]);
        assert_eq!(layout.goal, 17);
        assert_eq!(layout.name, 1);
    }

    #[test]
    fn test_shipped_layout_file_is_the_default() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/config/monthly_layout.json");
        assert_eq!(MonthlyLayout::load(path).unwrap(), MonthlyLayout::default());
    }

    #[test]
    fn test_rejects_wrong_week_count() {
        assert!(matches!(
            MonthlyLayout::from_json(r#"{ "weeks": [4, 6, 8] }"#),
            Err(LayoutError::Parse(_))
        ));
    }

    #[test]
    fn test_rejects_zero_data_offset() {
        assert!(matches!(
            MonthlyLayout::from_json(r#"{ "dataOffset": 0 }"#),
            Err(LayoutError::ZeroDataOffset)
        ));
    }
}
