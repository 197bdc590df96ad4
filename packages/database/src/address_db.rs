//! The `addresses` table.
//!
//! One row per PAF record: the sixteen PAF columns plus the derived
//! `phonetic` key. Lookups run by exact postcode and by phonetic key
//! prefix, so both columns are indexed. UDPRN is unique when present;
//! records without one are allowed in any number.

use std::collections::BTreeSet;
use std::path::Path;
use std::sync::{Arc, Mutex};

use duckdb::Connection;
use paf_match_address_models::{AddressRecord, PafField};
use paf_match_matcher::{AddressStore, StoreError};

use crate::DbError;

/// Number of rows per insert transaction.
const CHUNK_SIZE: usize = 5_000;

/// Outcome of [`insert_records`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InsertStats {
    /// Rows written.
    pub inserted: u64,
    /// Rows skipped because their UDPRN was already stored.
    pub skipped: u64,
}

/// Opens (or creates) the address `DuckDB` and ensures the schema exists.
///
/// # Errors
///
/// Returns [`DbError`] if the connection or schema creation fails.
pub fn open(path: &Path) -> Result<Connection, DbError> {
    if let Some(parent) = path.parent() {
        crate::paths::ensure_dir(parent)?;
    }

    let conn = Connection::open(path)?;
    create_schema(&conn)?;
    Ok(conn)
}

/// Opens an existing address `DuckDB` for lookups only.
///
/// Unlike [`open`], nothing is created: a missing file is an error and
/// the connection refuses writes.
///
/// # Errors
///
/// Returns [`DbError::Missing`] if `path` does not exist, or another
/// [`DbError`] if the connection cannot be opened.
pub fn open_read_only(path: &Path) -> Result<Connection, DbError> {
    if !path.is_file() {
        return Err(DbError::Missing {
            path: path.display().to_string(),
        });
    }

    let conn = Connection::open_with_flags(
        path,
        duckdb::Config::default().access_mode(duckdb::AccessMode::ReadOnly)?,
    )?;
    Ok(conn)
}

/// Opens a private in-memory address database.
///
/// # Errors
///
/// Returns [`DbError`] if the connection or schema creation fails.
pub fn open_in_memory() -> Result<Connection, DbError> {
    let conn = Connection::open_in_memory()?;
    create_schema(&conn)?;
    Ok(conn)
}

fn create_schema(conn: &Connection) -> Result<(), DbError> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS addresses (
            postcode TEXT,
            post_town TEXT,
            dependent_locality TEXT,
            double_dependent_locality TEXT,
            thoroughfare TEXT,
            dependent_thoroughfare TEXT,
            building_number TEXT,
            building_name TEXT,
            sub_building_name TEXT,
            po_box TEXT,
            department_name TEXT,
            organisation_name TEXT,
            udprn TEXT UNIQUE,
            postcode_type TEXT,
            su_organisation_indicator TEXT,
            delivery_point_suffix TEXT,
            phonetic TEXT
        );

        CREATE INDEX IF NOT EXISTS addresses_postcode_idx ON addresses (postcode);
        CREATE INDEX IF NOT EXISTS addresses_phonetic_idx ON addresses (phonetic);",
    )?;
    Ok(())
}

/// Comma-separated column list in [`PafField::ALL`] order, then `phonetic`.
fn column_list() -> String {
    PafField::ALL
        .iter()
        .map(|field| field.column())
        .chain(std::iter::once("phonetic"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Inserts records, skipping any whose UDPRN is already stored.
///
/// Within one call the first record carrying a given UDPRN wins. Each
/// chunk of rows is written in its own transaction.
///
/// # Errors
///
/// Returns [`DbError`] if any database operation fails.
pub fn insert_records(
    conn: &Connection,
    records: &[AddressRecord],
) -> Result<InsertStats, DbError> {
    let mut stats = InsertStats::default();

    if records.is_empty() {
        return Ok(stats);
    }

    // First occurrence of each UDPRN wins within the batch.
    let mut seen: BTreeSet<&str> = BTreeSet::new();
    let deduped: Vec<&AddressRecord> = records
        .iter()
        .filter(|record| {
            record
                .get(PafField::Udprn)
                .is_none_or(|udprn| seen.insert(udprn))
        })
        .collect();
    stats.skipped = (records.len() - deduped.len()) as u64;

    let columns = column_list();
    let placeholders = vec!["?"; PafField::ALL.len() + 1].join(", ");
    let sql = format!(
        "INSERT INTO addresses ({columns}) VALUES ({placeholders}) ON CONFLICT DO NOTHING"
    );

    for chunk in deduped.chunks(CHUNK_SIZE) {
        conn.execute_batch("BEGIN TRANSACTION")?;

        let result = insert_chunk(conn, &sql, chunk);

        match result {
            Ok(chunk_stats) => {
                conn.execute_batch("COMMIT")?;
                stats.inserted += chunk_stats.inserted;
                stats.skipped += chunk_stats.skipped;
            }
            Err(e) => {
                conn.execute_batch("ROLLBACK")?;
                return Err(e);
            }
        }
    }

    if stats.skipped > 0 {
        log::info!("Skipped {} record(s) with duplicate UDPRN", stats.skipped);
    }

    Ok(stats)
}

fn insert_chunk(
    conn: &Connection,
    sql: &str,
    chunk: &[&AddressRecord],
) -> Result<InsertStats, DbError> {
    let mut stats = InsertStats::default();
    let mut stmt = conn.prepare(sql)?;

    for record in chunk {
        let values: Vec<Option<&str>> = PafField::ALL
            .iter()
            .map(|&field| record.get(field))
            .chain(std::iter::once(record.phonetic.as_deref()))
            .collect();

        let changed = stmt.execute(duckdb::params_from_iter(values))?;
        if changed == 0 {
            stats.skipped += 1;
        } else {
            stats.inserted += 1;
        }
    }

    Ok(stats)
}

/// Returns every record whose postcode equals `postcode`.
///
/// # Errors
///
/// Returns [`DbError`] if the query fails.
pub fn find_by_postcode(
    conn: &Connection,
    postcode: &str,
) -> Result<Vec<AddressRecord>, DbError> {
    select_where(conn, "postcode = ?", &[postcode])
}

/// Returns every record whose phonetic key starts with `prefix`.
///
/// The prefix is turned into a half-open key range so the lookup is a
/// range predicate on `phonetic` rather than a function call per row.
///
/// # Errors
///
/// Returns [`DbError`] if the query fails.
pub fn find_by_phonetic_prefix(
    conn: &Connection,
    prefix: &str,
) -> Result<Vec<AddressRecord>, DbError> {
    match prefix_upper_bound(prefix) {
        Some(upper) => select_where(
            conn,
            "phonetic >= ? AND phonetic < ?",
            &[prefix, upper.as_str()],
        ),
        None => select_where(conn, "phonetic >= ?", &[prefix]),
    }
}

/// Smallest string greater than every string starting with `prefix`.
///
/// `None` when no such bound exists (empty prefix, or only `char::MAX`).
fn prefix_upper_bound(prefix: &str) -> Option<String> {
    let mut chars: Vec<char> = prefix.chars().collect();
    while let Some(last) = chars.pop() {
        if let Some(next) = (u32::from(last) + 1..=u32::from(char::MAX)).find_map(char::from_u32)
        {
            chars.push(next);
            return Some(chars.into_iter().collect());
        }
    }
    None
}

/// Number of stored records.
///
/// # Errors
///
/// Returns [`DbError`] if the query fails.
pub fn count(conn: &Connection) -> Result<u64, DbError> {
    let n: i64 = conn.query_row("SELECT COUNT(*) FROM addresses", [], |row| row.get(0))?;
    Ok(u64::try_from(n).unwrap_or(0))
}

fn select_where(
    conn: &Connection,
    predicate: &str,
    values: &[&str],
) -> Result<Vec<AddressRecord>, DbError> {
    let sql = format!("SELECT {} FROM addresses WHERE {predicate}", column_list());

    let mut stmt = conn.prepare(&sql)?;
    for (i, value) in values.iter().enumerate() {
        stmt.raw_bind_parameter(i + 1, *value)?;
    }
    stmt.raw_execute()?;

    let mut records = Vec::new();
    let mut rows = stmt.raw_query();
    while let Some(row) = rows.next()? {
        let mut record = AddressRecord::default();
        for (i, field) in PafField::ALL.iter().enumerate() {
            let value: Option<String> = row.get(i)?;
            if let Some(value) = value {
                record.set(*field, value);
            }
        }
        record.phonetic = row.get(PafField::ALL.len())?;
        records.push(record);
    }

    Ok(records)
}

/// An [`AddressStore`] over a `DuckDB` address database.
///
/// `duckdb::Connection` is `Send` but not `Sync`, so the shared connection
/// sits behind a `Mutex`. Each lookup clones it and runs on the blocking
/// pool, leaving the async runtime free while `DuckDB` works.
#[derive(Clone, Debug)]
pub struct DuckDbAddressStore {
    conn: Arc<Mutex<Connection>>,
}

impl DuckDbAddressStore {
    /// Wraps an open connection whose schema already exists.
    #[must_use]
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    /// Opens the existing database at `path` read-only.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Missing`] if no database exists at `path`, or
    /// another [`DbError`] if the connection fails.
    pub fn open(path: &Path) -> Result<Self, DbError> {
        Ok(Self::new(open_read_only(path)?))
    }

    fn clone_connection(&self) -> Result<Connection, DbError> {
        let conn = self.conn.lock().map_err(|e| DbError::Connection {
            message: format!("connection mutex poisoned: {e}"),
        })?;
        Ok(conn.try_clone()?)
    }

    async fn run<F>(&self, query: F) -> Result<Vec<AddressRecord>, StoreError>
    where
        F: FnOnce(&Connection) -> Result<Vec<AddressRecord>, DbError> + Send + 'static,
    {
        let conn = self.clone_connection()?;
        let records = tokio::task::spawn_blocking(move || query(&conn)).await??;
        Ok(records)
    }
}

#[async_trait::async_trait]
impl AddressStore for DuckDbAddressStore {
    async fn find_by_postcode(&self, postcode: &str) -> Result<Vec<AddressRecord>, StoreError> {
        let postcode = postcode.to_string();
        self.run(move |conn| find_by_postcode(conn, &postcode)).await
    }

    async fn find_by_phonetic_prefix(
        &self,
        prefix: &str,
    ) -> Result<Vec<AddressRecord>, StoreError> {
        let prefix = prefix.to_string();
        self.run(move |conn| find_by_phonetic_prefix(conn, &prefix)).await
    }
}
