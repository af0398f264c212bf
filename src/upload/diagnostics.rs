use super::types::{CellWarning, WarningKind};

/// Collects cell-level warnings for one sheet while it is being extracted
#[derive(Debug, Default)]
pub struct Diagnostics {
    sheet: String,
    warnings: Vec<CellWarning>,
}

impl Diagnostics {
    pub fn new(sheet: impl Into<String>) -> Self {
        Diagnostics {
            sheet: sheet.into(),
            warnings: Vec::new(),
        }
    }

    pub fn push(
        &mut self,
        row: usize,
        column: usize,
        raw_value: impl Into<String>,
        kind: WarningKind,
        message: impl Into<String>,
    ) {
        let warning = CellWarning {
            sheet: self.sheet.clone(),
            row,
            column,
            raw_value: raw_value.into(),
            kind,
            message: message.into(),
        };
        tracing::debug!(
            sheet = %warning.sheet,
            row,
            column,
            kind = ?kind,
            "{}",
            warning.message
        );
        self.warnings.push(warning);
    }

    pub fn len(&self) -> usize {
        self.warnings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.warnings.is_empty()
    }

    pub fn into_warnings(self) -> Vec<CellWarning> {
        self.warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warnings_carry_sheet_name() {
        let mut diagnostics = Diagnostics::new("Out-25");
        diagnostics.push(4, 6, "abc", WarningKind::UnparseableNumber, "counted as 0");

        let warnings = diagnostics.into_warnings();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].sheet, "Out-25");
        assert_eq!(warnings[0].row, 4);
        assert_eq!(warnings[0].column, 6);
        assert_eq!(warnings[0].raw_value, "abc");
    }
}
