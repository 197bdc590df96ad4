#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! `DuckDB` storage for PAF address records.
//!
//! [`address_db`] owns the `addresses` table: schema and index setup,
//! bulk inserts, and the two lookups the matcher needs.
//! [`address_db::DuckDbAddressStore`] exposes those lookups through the
//! async [`paf_match_matcher::AddressStore`] trait.

pub mod address_db;
pub mod paths;

use paf_match_matcher::StoreError;

/// Errors that can occur during database operations.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// `DuckDB` error.
    #[error("DuckDB error: {0}")]
    DuckDb(#[from] duckdb::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// No address database exists at the configured path.
    #[error("Address database not found at {path}")]
    Missing {
        /// Path that was looked up.
        path: String,
    },

    /// The shared connection is unusable.
    #[error("Connection error: {message}")]
    Connection {
        /// Description of what went wrong.
        message: String,
    },
}

impl From<DbError> for StoreError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::DuckDb(e) => Self::Backend(Box::new(e)),
            DbError::Io(e) => Self::Io(e),
            DbError::Missing { path } => Self::Unavailable {
                message: format!("address database not found at {path}"),
            },
            DbError::Connection { message } => Self::Unavailable { message },
        }
    }
}
