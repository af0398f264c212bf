//! Ingestion engine for sales-mentorship workbooks.
//!
//! Loads an uploaded spreadsheet, reads the multi-year revenue sheet and the
//! monthly roster tabs, and derives the KPIs the dashboard shows.

pub mod commands;
pub mod excel;
pub mod upload;

pub use upload::{
    detect_available_months, process_file, AvailableMonth, MonthlyLayout, ProcessedData,
    UploadConfig, UploadResult,
};

/// Install the tracing subscriber used by the command-line front end.
///
/// `RUST_LOG` overrides the default `info` filter. Logs go to stderr so
/// stdout stays clean for JSON output.
pub fn init_logging() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let _ = tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init();
}
