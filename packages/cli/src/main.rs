#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line address matcher.
//!
//! Matches one free-text address against the PAF address store and prints
//! the best record, every tied record, or a no-match banner.
//!
//! Uses `indicatif-log-bridge` (via [`paf_match_cli_utils::init_logger`])
//! so `RUST_LOG=debug` shows the retrieval strategy and candidate counts.

mod report;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use paf_match_database::address_db::DuckDbAddressStore;
use paf_match_database::paths;
use paf_match_matcher::{MatchEngine, config};

#[derive(Parser)]
#[command(name = "paf_match", about = "Match a UK postal address against the PAF")]
struct Cli {
    /// Free-text address to match (words are joined with spaces)
    query: Vec<String>,
    /// Config file (defaults to `$PAF_MATCH_CONFIG`, then `paf_match.toml`)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _multi = paf_match_cli_utils::init_logger();
    let cli = Cli::parse();

    let query = cli.query.join(" ");
    if query.trim().is_empty() {
        println!("{}", report::USAGE);
        return Ok(());
    }

    let config_path = config::config_path(cli.config.as_deref(), &paths::project_root());
    let config = config::load(&config_path)?;
    let db_path = paths::resolve(&config.database.path);

    log::debug!("Using address store at {}", db_path.display());
    let store = DuckDbAddressStore::open(&db_path)?;
    let engine = MatchEngine::from_config(Arc::new(store), &config);

    let result = engine.match_address(&query).await?;
    log::debug!(
        "{} with {} record(s), score {:.4}",
        result.classification,
        result.records.len(),
        result.score
    );

    print!("{}", report::render(&result)?);

    Ok(())
}
