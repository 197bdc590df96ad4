//! The match engine.

use std::sync::Arc;

use paf_match_address_models::{
    AddressRecord, MatchConfig, MatchResult, MatchingConfig, StoreConfig,
};
use paf_match_text::similarity::jaccard_index;

use crate::query::{MatchQuery, Retrieval, candidate_comparison};
use crate::retry::with_retry;
use crate::{AddressStore, MatchError};

/// Matches free-text addresses against an [`AddressStore`].
///
/// Holds no per-query state, so one engine can serve concurrent callers
/// behind an `Arc`.
#[derive(Clone)]
pub struct MatchEngine {
    store: Arc<dyn AddressStore>,
    matching: MatchingConfig,
    store_config: StoreConfig,
}

impl std::fmt::Debug for MatchEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatchEngine")
            .field("matching", &self.matching)
            .field("store_config", &self.store_config)
            .finish_non_exhaustive()
    }
}

impl MatchEngine {
    /// Creates an engine over `store`.
    #[must_use]
    pub fn new(
        store: Arc<dyn AddressStore>,
        matching: MatchingConfig,
        store_config: StoreConfig,
    ) -> Self {
        Self {
            store,
            matching,
            store_config,
        }
    }

    /// Creates an engine using the matching and store sections of `config`.
    #[must_use]
    pub fn from_config(store: Arc<dyn AddressStore>, config: &MatchConfig) -> Self {
        Self::new(store, config.matching.clone(), config.store.clone())
    }

    /// Finds the records best matching `raw`.
    ///
    /// Candidates come from an exact postcode lookup when the query
    /// contains a postcode, otherwise from a phonetic prefix lookup on
    /// the leading address words. Every candidate tied on the highest
    /// trigram similarity is returned; no tie-break is applied.
    ///
    /// # Errors
    ///
    /// Returns [`MatchError`] if the store cannot be queried.
    pub async fn match_address(&self, raw: &str) -> Result<MatchResult, MatchError> {
        let query = MatchQuery::parse(raw);
        let candidates = self.retrieve(&query).await?;
        log::debug!("Scoring {} candidate(s)", candidates.len());
        Ok(rank(&query.comparison, candidates))
    }

    async fn retrieve(&self, query: &MatchQuery) -> Result<Vec<AddressRecord>, MatchError> {
        match query.retrieval(self.matching.phonetic_prefix_tokens) {
            Retrieval::Postcode(postcode) => {
                log::debug!("Retrieving candidates by postcode {postcode}");
                with_retry("find_by_postcode", &self.store_config, || {
                    self.store.find_by_postcode(&postcode)
                })
                .await
            }
            Retrieval::PhoneticPrefix(key) => {
                log::debug!("Retrieving candidates by phonetic prefix {key}");
                with_retry("find_by_phonetic_prefix", &self.store_config, || {
                    self.store.find_by_phonetic_prefix(&key)
                })
                .await
            }
            Retrieval::Nothing => {
                log::debug!("Query {:?} has nothing to retrieve by", query.raw);
                Ok(Vec::new())
            }
        }
    }
}

/// Scores `candidates` against a prepared query string and keeps every
/// candidate tied on the best score.
///
/// A strictly better score resets the tie set; an equal score joins it.
/// The running best starts at zero, so candidates scoring zero still tie.
#[must_use]
#[allow(clippy::float_cmp)]
pub fn rank(comparison: &str, candidates: Vec<AddressRecord>) -> MatchResult {
    let mut best = 0.0_f64;
    let mut ties = Vec::new();

    for candidate in candidates {
        let score = jaccard_index(comparison, &candidate_comparison(&candidate));
        log::trace!(
            "  {score:.4} {}",
            candidate.udprn.as_deref().unwrap_or("<no udprn>")
        );

        if score > best {
            best = score;
            ties.clear();
            ties.push(candidate);
        } else if score == best {
            ties.push(candidate);
        }
    }

    MatchResult::from_ties(ties, best)
}
