#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Fuzzy matching of free-text UK addresses against PAF records.
//!
//! [`MatchEngine`] retrieves candidates from an injected [`AddressStore`]
//! (exact postcode when the query carries one, phonetic key prefix
//! otherwise), scores each candidate by trigram Jaccard similarity, and
//! classifies the best-scoring set as unique, ambiguous, or empty.
//!
//! Store calls go through [`retry::with_retry`], which bounds each attempt
//! with a timeout and retries transient failures with exponential backoff.

pub mod config;
pub mod engine;
pub mod query;
pub mod retry;
pub mod store;

pub use engine::MatchEngine;
pub use store::{AddressStore, InMemoryAddressStore, StoreError};

/// Errors surfaced by [`MatchEngine::match_address`].
///
/// An empty or ambiguous result is not an error.
#[derive(Debug, thiserror::Error)]
pub enum MatchError {
    /// A transient store failure persisted through every retry.
    #[error("Address store unavailable during {operation} after {attempts} attempt(s): {source}")]
    StoreUnavailable {
        /// Store operation that failed.
        operation: String,
        /// Number of attempts made, including the first.
        attempts: u32,
        /// Error from the final attempt.
        source: StoreError,
    },

    /// The store failed in a way retrying cannot fix.
    #[error("Address store error during {operation}: {source}")]
    Store {
        /// Store operation that failed.
        operation: String,
        /// Underlying store error.
        source: StoreError,
    },
}
