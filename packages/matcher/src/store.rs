//! Address store abstraction.
//!
//! The engine only needs two lookups: every record sharing a postcode and
//! every record whose stored phonetic key starts with a prefix. Backends
//! implement [`AddressStore`]; [`InMemoryAddressStore`] serves fixtures and
//! tests.

use std::time::Duration;

use paf_match_address_models::AddressRecord;
use paf_match_text::lines::phonetic_key;

/// Errors that can occur while querying an address store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Error raised by the storage backend itself.
    #[error("Store backend error: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A single query exceeded its time budget.
    #[error("Store query timed out after {after:?}")]
    Timeout {
        /// The per-attempt timeout that elapsed.
        after: Duration,
    },

    /// The backend is temporarily unable to serve queries.
    #[error("Store unavailable: {message}")]
    Unavailable {
        /// Description of what went wrong.
        message: String,
    },

    /// The blocking task running the query panicked or was cancelled.
    #[error("Store task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl StoreError {
    /// Returns `true` if the error is likely transient and worth retrying.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        match self {
            Self::Io(_) | Self::Timeout { .. } | Self::Unavailable { .. } | Self::Join(_) => true,
            Self::Backend(_) => false,
        }
    }
}

/// Read-only access to canonical address records.
#[async_trait::async_trait]
pub trait AddressStore: Send + Sync {
    /// Returns every record whose postcode equals `postcode` exactly.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the lookup fails.
    async fn find_by_postcode(&self, postcode: &str) -> Result<Vec<AddressRecord>, StoreError>;

    /// Returns every record whose stored phonetic key starts with `prefix`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the lookup fails.
    async fn find_by_phonetic_prefix(
        &self,
        prefix: &str,
    ) -> Result<Vec<AddressRecord>, StoreError>;
}

/// An [`AddressStore`] backed by a `Vec`.
#[derive(Debug, Clone, Default)]
pub struct InMemoryAddressStore {
    records: Vec<AddressRecord>,
}

impl InMemoryAddressStore {
    /// Creates a store holding `records`.
    ///
    /// Records without a `phonetic` key get one derived the same way
    /// ingestion does.
    #[must_use]
    pub fn new(records: impl IntoIterator<Item = AddressRecord>) -> Self {
        let records = records
            .into_iter()
            .map(|mut record| {
                if record.phonetic.is_none() {
                    record.phonetic = Some(phonetic_key(&record));
                }
                record
            })
            .collect();

        Self { records }
    }

    /// Number of stored records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns `true` if the store holds no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait::async_trait]
impl AddressStore for InMemoryAddressStore {
    async fn find_by_postcode(&self, postcode: &str) -> Result<Vec<AddressRecord>, StoreError> {
        Ok(self
            .records
            .iter()
            .filter(|r| r.postcode.as_deref() == Some(postcode))
            .cloned()
            .collect())
    }

    async fn find_by_phonetic_prefix(
        &self,
        prefix: &str,
    ) -> Result<Vec<AddressRecord>, StoreError> {
        Ok(self
            .records
            .iter()
            .filter(|r| r.phonetic.as_deref().is_some_and(|p| p.starts_with(prefix)))
            .cloned()
            .collect())
    }
}
