#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Loads the Postcode Address File into the address store.
//!
//! The input is the headerless 16-column PAF CSV. Columns map by position
//! onto [`PafField::ALL`]; empty values are dropped. Each record gets its
//! `phonetic` key from its first two rendered lines before it is written,
//! and records whose UDPRN is already stored are skipped.

use std::io::Read;
use std::path::Path;

use duckdb::Connection;
use paf_match_address_models::{AddressRecord, PafField};
use paf_match_cli_utils::ProgressCallback;
use paf_match_database::{DbError, address_db};
use paf_match_text::lines::phonetic_key;

/// Number of parsed rows buffered before each store insert.
const BATCH_SIZE: usize = 10_000;

/// Errors that can occur while loading a PAF file.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    /// The CSV reader failed in a way that stops the load.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Writing to the address store failed.
    #[error("Store error: {0}")]
    Store(#[from] DbError),

    /// The input file could not be opened.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path that caused the error.
        path: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

/// Totals for one load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadStats {
    /// Rows read from the CSV.
    pub rows: u64,
    /// Records written to the store.
    pub inserted: u64,
    /// Records skipped because their UDPRN was already present.
    pub duplicates: u64,
    /// Rows rejected as malformed.
    pub rejected: u64,
}

/// Builds a record from one CSV row.
///
/// Returns `None` if the row has more than 16 columns. Shorter rows leave
/// the trailing fields absent.
#[must_use]
pub fn record_from_row(row: &csv::StringRecord) -> Option<AddressRecord> {
    if row.len() > PafField::ALL.len() {
        return None;
    }

    let mut record = PafField::ALL
        .iter()
        .zip(row.iter())
        .fold(AddressRecord::default(), |record, (&field, value)| {
            record.with(field, value.trim())
        });
    record.phonetic = Some(phonetic_key(&record));

    Some(record)
}

/// Loads PAF CSV rows from `reader` into the store behind `conn`.
///
/// # Errors
///
/// Returns [`IngestError`] if reading the input fails or the store
/// rejects a batch. Malformed rows are skipped and counted instead.
pub fn load_reader(
    reader: impl Read,
    conn: &Connection,
    progress: &dyn ProgressCallback,
) -> Result<LoadStats, IngestError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut stats = LoadStats::default();
    let mut batch = Vec::with_capacity(BATCH_SIZE);

    for result in csv_reader.records() {
        stats.rows += 1;

        let row = match result {
            Ok(row) => row,
            Err(e) if e.is_io_error() => return Err(e.into()),
            Err(e) => {
                log::warn!("  skipping malformed row {}: {e}", stats.rows);
                stats.rejected += 1;
                continue;
            }
        };

        let Some(record) = record_from_row(&row) else {
            log::warn!(
                "  skipping row {} with {} columns (expected at most {})",
                stats.rows,
                row.len(),
                PafField::ALL.len()
            );
            stats.rejected += 1;
            continue;
        };

        batch.push(record);
        if batch.len() >= BATCH_SIZE {
            flush(conn, &mut batch, &mut stats, progress)?;
        }
    }

    flush(conn, &mut batch, &mut stats, progress)?;

    Ok(stats)
}

/// Loads the PAF CSV at `path`.
///
/// # Errors
///
/// Returns [`IngestError`] if the file cannot be opened or the store
/// rejects a batch.
pub fn load_file(
    path: &Path,
    conn: &Connection,
    progress: &dyn ProgressCallback,
) -> Result<LoadStats, IngestError> {
    let file = std::fs::File::open(path).map_err(|e| IngestError::Io {
        path: path.display().to_string(),
        source: e,
    })?;

    log::info!("Loading PAF records from {}", path.display());
    load_reader(std::io::BufReader::new(file), conn, progress)
}

fn flush(
    conn: &Connection,
    batch: &mut Vec<AddressRecord>,
    stats: &mut LoadStats,
    progress: &dyn ProgressCallback,
) -> Result<(), IngestError> {
    if batch.is_empty() {
        return Ok(());
    }

    let inserted = address_db::insert_records(conn, batch)?;
    stats.inserted += inserted.inserted;
    stats.duplicates += inserted.skipped;
    progress.inc(batch.len() as u64);
    log::debug!(
        "  batch of {} written ({} total inserted)",
        batch.len(),
        stats.inserted
    );
    batch.clear();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use paf_match_cli_utils::null_progress;

    const SAMPLE: &str = "\
NE28 1AA,Wallsend,,,Kings Road North,,24,,,,,,1001,S,,1A
NE28 1AA,Wallsend,,,Kings Road North,,26,,,,,,1002,S,,1B
NE30 2SQ,North Shields,,,Brislee Avenue,,3,,,,,,1003,S,,1A
";

    fn row(fields: &[&str]) -> csv::StringRecord {
        csv::StringRecord::from(fields.to_vec())
    }

    #[test]
    fn maps_columns_by_position() {
        let record = record_from_row(&row(&[
            "NE28 1AA",
            "Wallsend",
            "",
            "",
            "Kings Road North",
            "",
            "24",
            "",
            "",
            "",
            "",
            "",
            "12345678",
            "S",
            "",
            "1A",
        ]))
        .unwrap();

        assert_eq!(record.postcode.as_deref(), Some("NE28 1AA"));
        assert_eq!(record.post_town.as_deref(), Some("Wallsend"));
        assert_eq!(record.dependent_locality, None);
        assert_eq!(record.thoroughfare.as_deref(), Some("Kings Road North"));
        assert_eq!(record.building_number.as_deref(), Some("24"));
        assert_eq!(record.udprn.as_deref(), Some("12345678"));
        assert_eq!(record.postcode_type.as_deref(), Some("S"));
        assert_eq!(record.delivery_point_suffix.as_deref(), Some("1A"));
        assert_eq!(record.phonetic.as_deref(), Some("24KNKSRTNR0WLSNT"));
    }

    #[test]
    fn short_rows_leave_trailing_fields_absent() {
        let record = record_from_row(&row(&["NE28 1AA", "Wallsend"])).unwrap();
        assert_eq!(record.post_town.as_deref(), Some("Wallsend"));
        assert_eq!(record.udprn, None);
        assert_eq!(record.phonetic.as_deref(), Some("WLSNTN1AA"));
    }

    #[test]
    fn rejects_rows_with_too_many_columns() {
        let fields = vec!["x"; 17];
        assert_eq!(record_from_row(&row(&fields)), None);
    }

    #[test]
    fn loads_csv_into_store() {
        let conn = address_db::open_in_memory().unwrap();
        let stats = load_reader(SAMPLE.as_bytes(), &conn, null_progress().as_ref()).unwrap();

        assert_eq!(
            stats,
            LoadStats {
                rows: 3,
                inserted: 3,
                duplicates: 0,
                rejected: 0,
            }
        );

        let found = address_db::find_by_postcode(&conn, "NE28 1AA").unwrap();
        assert_eq!(found.len(), 2);
        let found = address_db::find_by_phonetic_prefix(&conn, "3BRSL").unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].udprn.as_deref(), Some("1003"));
    }

    #[test]
    fn reloading_skips_existing_udprns() {
        let conn = address_db::open_in_memory().unwrap();
        load_reader(SAMPLE.as_bytes(), &conn, null_progress().as_ref()).unwrap();
        let stats = load_reader(SAMPLE.as_bytes(), &conn, null_progress().as_ref()).unwrap();

        assert_eq!(stats.inserted, 0);
        assert_eq!(stats.duplicates, 3);
        assert_eq!(address_db::count(&conn).unwrap(), 3);
    }

    #[test]
    fn counts_rejected_rows() {
        let input = format!("{SAMPLE}{}\n", vec!["x"; 17].join(","));
        let conn = address_db::open_in_memory().unwrap();
        let stats = load_reader(input.as_bytes(), &conn, null_progress().as_ref()).unwrap();

        assert_eq!(stats.rows, 4);
        assert_eq!(stats.rejected, 1);
        assert_eq!(stats.inserted, 3);
    }

    #[test]
    fn missing_file_is_io_error() {
        let conn = address_db::open_in_memory().unwrap();
        let err = load_file(
            Path::new("/nonexistent/paf.csv"),
            &conn,
            null_progress().as_ref(),
        )
        .unwrap_err();
        assert!(matches!(err, IngestError::Io { .. }));
    }
}
