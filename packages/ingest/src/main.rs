#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for loading the Postcode Address File.

use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;
use paf_match_cli_utils::IndicatifProgress;
use paf_match_database::{address_db, paths};
use paf_match_matcher::config;

#[derive(Parser)]
#[command(name = "paf_load", about = "Load a PAF CSV into the address store")]
struct Cli {
    /// Headerless 16-column PAF CSV file
    csv: PathBuf,
    /// Config file (defaults to `$PAF_MATCH_CONFIG`, then `paf_match.toml`)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Database file, overriding `[database] path` from the config
    #[arg(long)]
    database: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = paf_match_cli_utils::init_logger();
    let cli = Cli::parse();

    let config_path = config::config_path(cli.config.as_deref(), &paths::project_root());
    let config = config::load(&config_path)?;
    let db_path = cli
        .database
        .unwrap_or_else(|| paths::resolve(&config.database.path));

    log::info!("Opening address store at {}", db_path.display());
    let conn = address_db::open(&db_path)?;

    let start = Instant::now();
    let progress = IndicatifProgress::records_bar(&multi, "Loading PAF records");
    let stats = paf_match_ingest::load_file(&cli.csv, &conn, progress.as_ref())?;
    progress.finish(format!("Loaded {} records", stats.inserted));

    log::info!(
        "Done in {:.1}s: {} rows, {} inserted, {} duplicate UDPRN, {} rejected ({} stored)",
        start.elapsed().as_secs_f64(),
        stats.rows,
        stats.inserted,
        stats.duplicates,
        stats.rejected,
        address_db::count(&conn)?,
    );

    Ok(())
}
