use serde::Serialize;

use crate::excel::{self, ExcelError};
use crate::upload::{self, AvailableMonth, LayoutError, MonthlyLayout, UploadConfig, UploadResult};

#[derive(Debug, Serialize)]
pub struct CommandError {
    message: String,
}

impl CommandError {
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for CommandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CommandError {}

impl From<ExcelError> for CommandError {
    fn from(e: ExcelError) -> Self {
        CommandError {
            message: e.to_string(),
        }
    }
}

impl From<LayoutError> for CommandError {
    fn from(e: LayoutError) -> Self {
        CommandError {
            message: e.to_string(),
        }
    }
}

impl From<tokio::task::JoinError> for CommandError {
    fn from(e: tokio::task::JoinError) -> Self {
        CommandError {
            message: format!("Task join error: {}", e),
        }
    }
}

// ==================== Upload Commands ====================

/// Process an uploaded workbook held in memory
pub async fn upload_process(
    bytes: Vec<u8>,
    config: UploadConfig,
    layout: Option<MonthlyLayout>,
) -> Result<UploadResult, CommandError> {
    let layout = layout.unwrap_or_default();

    let result = tokio::task::spawn_blocking(move || {
        upload::process_file(&bytes, &config, &layout)
    })
    .await?;

    Ok(result)
}

/// Process a workbook on disk, optionally with a layout file for the
/// monthly tabs
pub async fn upload_process_path(
    path: String,
    config: UploadConfig,
    layout_path: Option<String>,
) -> Result<UploadResult, CommandError> {
    let layout = match layout_path {
        Some(layout_path) => {
            tokio::task::spawn_blocking(move || MonthlyLayout::load(layout_path)).await??
        }
        None => MonthlyLayout::default(),
    };

    if !std::path::Path::new(&path).exists() {
        return Err(ExcelError::FileNotFound(path).into());
    }
    let bytes = tokio::fs::read(&path)
        .await
        .map_err(ExcelError::from)?;

    upload_process(bytes, config, Some(layout)).await
}

/// Get the monthly tabs of a workbook on disk, newest first
pub async fn upload_detect_months(path: String) -> Result<Vec<AvailableMonth>, CommandError> {
    if !std::path::Path::new(&path).exists() {
        return Err(ExcelError::FileNotFound(path).into());
    }
    let bytes = tokio::fs::read(&path)
        .await
        .map_err(ExcelError::from)?;

    let result = tokio::task::spawn_blocking(move || {
        upload::detect_available_months(&bytes)
    })
    .await?;

    Ok(result)
}

/// Compute checksum of an uploaded file
pub async fn upload_checksum(path: String) -> Result<String, CommandError> {
    let result = tokio::task::spawn_blocking(move || {
        excel::compute_checksum(&path)
    })
    .await??;

    Ok(result)
}
