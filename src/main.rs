use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};

use sales_sheet_ingest::{commands, UploadConfig};

#[derive(Parser)]
#[command(name = "sheet-ingest")]
#[command(about = "Extract revenue history, team rosters and KPIs from a sales workbook", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process a workbook up to the selected month
    Process {
        file: PathBuf,
        /// Cutoff month (1-12)
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=12))]
        month: u32,
        /// Cutoff year (4 digits)
        #[arg(long)]
        year: i32,
        /// JSON file with the monthly tab column layout
        #[arg(long)]
        layout: Option<PathBuf>,
        #[arg(long)]
        pretty: bool,
    },
    /// List the monthly tabs of a workbook, newest first
    Months {
        file: PathBuf,
        #[arg(long)]
        pretty: bool,
    },
}

fn to_json<T: serde::Serialize>(value: &T, pretty: bool) -> anyhow::Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(json)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    sales_sheet_ingest::init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Process {
            file,
            month,
            year,
            layout,
            pretty,
        } => {
            let config = UploadConfig {
                selected_month: month,
                selected_year: year,
            };
            let result = commands::upload_process_path(
                file.display().to_string(),
                config,
                layout.map(|p| p.display().to_string()),
            )
            .await
            .with_context(|| format!("failed to process {}", file.display()))?;

            println!("{}", to_json(&result, pretty)?);
            if !result.success {
                std::process::exit(1);
            }
        }
        Commands::Months { file, pretty } => {
            let months = commands::upload_detect_months(file.display().to_string())
                .await
                .with_context(|| format!("failed to read {}", file.display()))?;
            println!("{}", to_json(&months, pretty)?);
        }
    }

    Ok(())
}
