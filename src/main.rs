//! oil-recovery - production history import, reserve aggregation and ORC export
//!
//! # Usage
//!
//! ```bash
//! # Parse a production history workbook and print the records
//! oil-recovery import history.xlsx
//!
//! # Full results workbook (Raw Data + one sheet per method)
//! oil-recovery export history.xlsx --results methods.json
//!
//! # ORC summary workbook, with one method switched off
//! oil-recovery summary --results methods.json --geological-reserves 120000000 --disable Сазонов
//! ```
//!
//! # Environment Variables
//!
//! - `ORC_CONFIG`: Path to the TOML config (default: ./orc_config.toml)
//! - `RUST_LOG`: Logging level (default: info)

use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::info;

use oil_recovery::config::AnalysisConfig;
use oil_recovery::pipeline;
use oil_recovery::{parse_geological_reserves, Method, MethodResults, ProductionRecord};

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "oil-recovery")]
#[command(about = "Production history import, decline-method reserve aggregation and ORC export")]
#[command(version)]
struct CliArgs {
    /// Path to a TOML config file (overrides ORC_CONFIG / ./orc_config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: SubCommand,
}

#[derive(clap::Subcommand, Debug)]
enum SubCommand {
    /// Parse the first sheet of a workbook into production records
    Import {
        /// Workbook with rows of [year, oil, liquid]
        file: PathBuf,
        /// Print records as JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Write the full results workbook: Raw Data + one sheet per method
    Export {
        /// Workbook with rows of [year, oil, liquid]
        file: PathBuf,
        /// JSON file with per-method regression results
        #[arg(long, value_name = "JSON")]
        results: PathBuf,
        /// Output path (default: export.results_file from config)
        #[arg(long, value_name = "PATH")]
        out: Option<PathBuf>,
    },

    /// Write the ORC summary workbook and print the ORC breakdown
    Summary {
        /// JSON file with per-method regression results
        #[arg(long, value_name = "JSON")]
        results: PathBuf,
        /// Geological reserves (Q); empty or <= 0 disables the ORC
        #[arg(long, value_name = "Q", default_value = "")]
        geological_reserves: String,
        /// Exclude a method from averaging (repeatable)
        #[arg(long, value_name = "METHOD")]
        disable: Vec<Method>,
        /// Output path (default: export.summary_file from config)
        #[arg(long, value_name = "PATH")]
        out: Option<PathBuf>,
    },
}

// ============================================================================
// Helpers
// ============================================================================

fn load_config(path: Option<&Path>) -> Result<AnalysisConfig> {
    match path {
        Some(p) => AnalysisConfig::load_from_file(p)
            .with_context(|| format!("Failed to load config {}", p.display())),
        None => Ok(AnalysisConfig::load()),
    }
}

async fn load_results(path: &Path) -> Result<MethodResults> {
    let text = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read method results {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("Invalid method results JSON in {}", path.display()))
}

fn print_records(records: &[ProductionRecord]) {
    println!(
        "{:>4}  {:<10} {:>14} {:>14} {:>14} {:>10}",
        "#", "Год", "Нефть", "Жидкость", "Вода", "Обв., %"
    );
    for r in records {
        println!(
            "{:>4}  {:<10} {:>14} {:>14} {:>14} {:>10}",
            r.index, r.year, r.oil_volume, r.liquid_volume, r.water_volume, r.water_cut_percent
        );
    }
}

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let args = CliArgs::parse();
    let config = load_config(args.config.as_deref())?;

    match args.command {
        SubCommand::Import { file, json } => {
            let records = pipeline::import_records(&file)
                .await
                .with_context(|| format!("Failed to import {}", file.display()))?;
            if json {
                println!("{}", serde_json::to_string_pretty(&records)?);
            } else {
                print_records(&records);
            }
        }

        SubCommand::Export { file, results, out } => {
            let records = pipeline::import_records(&file)
                .await
                .with_context(|| format!("Failed to import {}", file.display()))?;
            let results = load_results(&results).await?;
            let out = out.unwrap_or_else(|| PathBuf::from(&config.export.results_file));

            pipeline::export_results(&out, &records, &results)
                .await
                .with_context(|| format!("Failed to export {}", out.display()))?;
            info!(file = %out.display(), "Results workbook exported");
        }

        SubCommand::Summary {
            results,
            geological_reserves,
            disable,
            out,
        } => {
            let results = load_results(&results).await?;
            let mut selection = config.methods;
            for method in disable {
                selection.set(method, false);
            }

            let geological = parse_geological_reserves(&geological_reserves);
            let summary = pipeline::summarize(&results, &selection, geological, &config.orc);

            for row in &summary.chart.rows {
                println!("{:<18} V остаточные = {}", row.method, row.remaining_oil_reserves);
            }
            if let Some(avg) = summary.chart.average {
                println!("{:<18} V остаточные = {}", "V среднее", avg.remaining_oil_reserves);
            }
            for line in summary.display.lines() {
                println!("{line}");
            }

            let out = out.unwrap_or_else(|| PathBuf::from(&config.export.summary_file));
            pipeline::export_summary(
                &out,
                &summary.report,
                config.export.include_method_results_sheet,
            )
            .await
            .with_context(|| format!("Failed to export {}", out.display()))?;
            info!(file = %out.display(), "Summary workbook exported");
        }
    }

    Ok(())
}
