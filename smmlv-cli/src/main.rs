use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use tracing::debug;

use smmlv_cli::app::{self, ComputeRequest, DerivedReport, WageTableReport};
use smmlv_cli::config::AppConfig;
use smmlv_cli::logging;
use smmlv_data::experiences;

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Contract experience calculator.
///
/// Converts contract values into legal monthly minimum wages (SMMLV) and
/// back to present-day pesos, and reports expiring company documents.
#[derive(Debug, Parser)]
#[command(name = "smmlv", version, about)]
struct Cli {
    /// TOML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log level or filter directive; overrides the config file.
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Append logs to this file; overrides the config file.
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the minimum wage table.
    Wages {
        /// CSV with `year,amount` columns.
        #[arg(long)]
        wages: Option<PathBuf>,
    },

    /// Compute the derived values of one contract.
    Compute {
        #[arg(long)]
        wages: Option<PathBuf>,

        /// Initial contract value.
        #[arg(long, default_value = "0")]
        initial: String,

        /// Addition amount; repeat for several additions.
        #[arg(long = "addition")]
        additions: Vec<String>,

        /// Participation percentage, 0 to 100.
        #[arg(long, default_value = "")]
        participation: String,

        /// Termination date, `YYYY-MM-DD` or `DD/MM/YYYY`.
        #[arg(long, default_value = "")]
        termination_date: String,

        /// Print JSON instead of a table.
        #[arg(long)]
        json: bool,
    },

    /// Compute and store every experience in a CSV file.
    Batch {
        #[arg(long)]
        wages: Option<PathBuf>,

        /// Experience CSV.
        #[arg(long)]
        records: PathBuf,

        #[arg(long)]
        json: bool,
    },

    /// List expired and soon-to-expire documents.
    Expirations {
        /// CSV with `id,name,folder,expiration_date` columns.
        #[arg(long)]
        documents: PathBuf,

        /// Reference date; defaults to today.
        #[arg(long)]
        today: Option<NaiveDate>,

        /// Days before expiration that count as "expiring soon".
        #[arg(long)]
        window: Option<i64>,

        #[arg(long)]
        json: bool,
    },
}

// ─── entry point ─────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load(cli.config.as_deref())?;

    let level = cli.log_level.as_deref().unwrap_or(&config.logging.level);
    logging::init_logging(level)?;
    if let Some(path) = cli.log_file.as_ref().or(config.logging.file.as_ref()) {
        logging::enable_file_logging(path)?;
    }

    debug!(backend = %config.store.backend, "opening store");
    let store = app::open_store(&config.store).await?;
    let default_wages = config.reference.wages_csv.as_deref();

    match cli.command {
        Command::Wages { wages } => {
            let table =
                app::load_reference_data(&*store, wages.as_deref().or(default_wages)).await?;
            println!("{}", WageTableReport(&table));
        }
        Command::Compute {
            wages,
            initial,
            additions,
            participation,
            termination_date,
            json,
        } => {
            let table =
                app::load_reference_data(&*store, wages.as_deref().or(default_wages)).await?;
            let request = ComputeRequest {
                initial_value: initial,
                additions,
                participation_percent: participation,
                termination_date,
            };
            let output = app::compute(&request, table.clone());
            if json {
                println!("{}", serde_json::to_string_pretty(&output)?);
            } else {
                let report = DerivedReport {
                    inputs: &output.inputs,
                    derived: &output.derived,
                    table: &table,
                };
                println!("{report}");
            }
        }
        Command::Batch {
            wages,
            records,
            json,
        } => {
            let table =
                app::load_reference_data(&*store, wages.as_deref().or(default_wages)).await?;
            let drafts = experiences::load_from_file(&records)
                .with_context(|| format!("failed to load experiences: {}", records.display()))?;
            let report = app::run_batch(&*store, &table, &drafts).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("{report}");
            }
        }
        Command::Expirations {
            documents,
            today,
            window,
            json,
        } => {
            let today = today.unwrap_or_else(|| Local::now().date_naive());
            let window = window.unwrap_or(config.expirations.window_days);
            let report = app::expirations(&documents, today, window)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print!("{report}");
            }
        }
    }

    Ok(())
}
