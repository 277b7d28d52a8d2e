//! CLI entry point for qsobook
//!
//! Every command prints its result as JSON on stdout; logs go to stderr.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;

use qsobook_lib::commands::{self, AppState};
use qsobook_lib::config::Config;
use qsobook_lib::time_utils::DateOrder;

#[derive(Parser)]
#[command(name = "qsobook")]
#[command(author, version, about = "Amateur radio logbook tools", long_about = None)]
struct Cli {
    /// SQLite database file (overrides QSOBOOK_DB)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import QSOs from an ADIF file
    ImportAdif {
        file: PathBuf,
        #[arg(long)]
        logbook: Option<String>,
        /// Report what would be imported without saving anything
        #[arg(long)]
        dry_run: bool,
    },

    /// Export QSOs to an ADIF file
    ExportAdif {
        #[arg(long)]
        logbook: Option<String>,
        #[arg(long)]
        station_callsign: Option<String>,
        /// Defaults to the suggested export filename
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Import QSOs from a CSV file
    ImportCsv {
        file: PathBuf,
        /// Column mapping as HEADER=FIELD, repeatable
        #[arg(long = "map", value_name = "HEADER=FIELD", required = true)]
        map: Vec<String>,
        #[arg(long)]
        logbook: Option<String>,
        /// day-first or month-first, for ambiguous NN/NN/YYYY dates
        #[arg(long)]
        date_order: Option<DateOrder>,
        /// Report what would be imported without saving anything
        #[arg(long)]
        dry_run: bool,
    },

    /// Suggest a column mapping for a CSV file
    CsvMapping { file: PathBuf },

    /// Maidenhead locator conversions
    #[command(subcommand)]
    Grid(GridCommand),

    /// Manage logbooks
    #[command(subcommand)]
    Logbook(LogbookCommand),

    /// Read and write persisted settings
    #[command(subcommand)]
    Settings(SettingsCommand),

    /// Show database statistics
    Stats,
}

#[derive(Subcommand)]
enum GridCommand {
    /// Position to locator
    Encode {
        #[arg(allow_hyphen_values = true)]
        lat: f64,
        #[arg(allow_hyphen_values = true)]
        lon: f64,
        #[arg(short, long, default_value_t = 6)]
        precision: usize,
    },
    /// Locator to cell center and bounds
    Decode { locator: String },
    /// Distance in km between two locators
    Distance { from: String, to: String },
}

#[derive(Subcommand)]
enum LogbookCommand {
    Create { name: String },
    List,
}

#[derive(Subcommand)]
enum SettingsCommand {
    Get { key: String },
    Set { key: String, value: String },
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("qsobook=info,qsobook_lib=info"))
        .init();

    let cli = Cli::parse();

    let mut config = Config::from_env();
    if let Some(db) = cli.db {
        config.db_path = db;
    }

    // Grid commands need no database
    let command = match cli.command {
        Commands::Grid(grid) => {
            return match grid {
                GridCommand::Encode { lat, lon, precision } => {
                    print_json(&commands::grid::encode(lat, lon, precision)?)
                }
                GridCommand::Decode { locator } => print_json(&commands::grid::decode(&locator)?),
                GridCommand::Distance { from, to } => {
                    print_json(&commands::grid::distance(&from, &to)?)
                }
            };
        }
        Commands::CsvMapping { file } => {
            let suggestion = commands::csv::suggest_mapping(&file)
                .with_context(|| format!("reading {}", file.display()))?;
            return print_json(&suggestion);
        }
        other => other,
    };

    let db_path = config.db_path.clone();
    let state = AppState::open(config)
        .await
        .with_context(|| format!("opening database {}", db_path.display()))?;

    match command {
        Commands::ImportAdif {
            file,
            logbook,
            dry_run,
        } => {
            let summary =
                commands::adif::import_adif(&state, &file, logbook.as_deref(), dry_run).await?;
            print_json(&summary)?;
        }
        Commands::ExportAdif {
            logbook,
            station_callsign,
            output,
        } => {
            let result = commands::adif::export_adif(
                &state,
                logbook.as_deref(),
                station_callsign.as_deref(),
                output.as_deref(),
            )
            .await?;
            print_json(&result)?;
        }
        Commands::ImportCsv {
            file,
            map,
            logbook,
            date_order,
            dry_run,
        } => {
            let mapping = commands::csv::parse_mapping_args(&map)?;
            let summary = commands::csv::import_csv(
                &state,
                &file,
                &mapping,
                logbook.as_deref(),
                date_order,
                dry_run,
            )
            .await
            .with_context(|| format!("importing {}", file.display()))?;
            print_json(&summary)?;
        }
        Commands::Logbook(LogbookCommand::Create { name }) => {
            print_json(&commands::logbook::create_logbook(&state, &name).await?)?;
        }
        Commands::Logbook(LogbookCommand::List) => {
            print_json(&commands::logbook::list_logbooks(&state).await?)?;
        }
        Commands::Settings(SettingsCommand::Get { key }) => {
            print_json(&commands::settings::get_setting(&state, &key).await?)?;
        }
        Commands::Settings(SettingsCommand::Set { key, value }) => {
            commands::settings::set_setting(&state, &key, &value).await?;
            print_json(&serde_json::json!({ "key": key, "saved": true }))?;
        }
        Commands::Stats => {
            print_json(&commands::settings::get_db_stats(&state).await?)?;
        }
        Commands::Grid(_) | Commands::CsvMapping { .. } => {}
    }

    Ok(())
}
