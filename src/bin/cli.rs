//! kvcatalog CLI
//!
//! Inspects the schema catalog stored in a snapshot dump.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use kvcatalog::{CatalogReader, Config, SnapshotFile};
use serde::Serialize;
use tracing_subscriber::{fmt, EnvFilter};

/// kvcatalog CLI
#[derive(Parser, Debug)]
#[command(name = "kvcatalog-cli")]
#[command(about = "Read the schema catalog out of a key-value snapshot dump")]
#[command(version)]
struct Args {
    /// Snapshot dump file
    #[arg(short, long)]
    snapshot: PathBuf,

    /// Prefix of metadata keys in the store
    #[arg(long, default_value = "m")]
    meta_prefix: String,

    /// Max payload bytes echoed into warnings
    #[arg(long, default_value = "256")]
    log_payload_limit: usize,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the schema version
    Version,

    /// List all databases
    Databases,

    /// Show one database
    Database {
        /// Database id
        id: i64,
    },

    /// List the tables of a database
    Tables {
        /// Database id
        db_id: i64,

        /// Also list records that failed to decode
        #[arg(long)]
        show_skipped: bool,
    },
}

#[derive(Serialize)]
struct SkippedView {
    field: String,
    error: String,
}

fn main() {
    // Logs go to stderr so stdout stays machine-readable
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,kvcatalog=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    if let Err(e) = run(args) {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> kvcatalog::Result<()> {
    let config = Config::builder()
        .meta_prefix(args.meta_prefix.into_bytes())
        .log_payload_limit(args.log_payload_limit)
        .build();

    let snapshot = SnapshotFile::load(&args.snapshot)?;
    tracing::info!(
        "Loaded snapshot {} ({} keys)",
        args.snapshot.display(),
        snapshot.len()
    );

    let reader = CatalogReader::with_config(&snapshot, &config)?;

    match args.command {
        Commands::Version => {
            println!("{}", reader.get_schema_version()?);
        }
        Commands::Databases => {
            print_json(&reader.list_databases()?)?;
        }
        Commands::Database { id } => match reader.get_database(id)? {
            Some(db) => print_json(&db)?,
            None => {
                tracing::warn!("Database {} not found", id);
                std::process::exit(2);
            }
        },
        Commands::Tables { db_id, show_skipped } => {
            if show_skipped {
                let scan = reader.scan_tables(db_id)?;
                let skipped: Vec<SkippedView> = scan
                    .skipped
                    .iter()
                    .map(|s| SkippedView {
                        field: String::from_utf8_lossy(&s.field).into_owned(),
                        error: s.error.to_string(),
                    })
                    .collect();
                print_json(&serde_json::json!({
                    "tables": scan.tables,
                    "skipped": skipped,
                    "sequences": scan.sequences,
                }))?;
            } else {
                print_json(&reader.list_tables(db_id)?)?;
            }
        }
    }

    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> kvcatalog::Result<()> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| kvcatalog::CatalogError::Serialization(e.to_string()))?;
    println!("{}", text);
    Ok(())
}
