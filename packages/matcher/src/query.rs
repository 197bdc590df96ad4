//! Query preparation.
//!
//! Both sides of a comparison go through the same pipeline: normalize,
//! split off the postcode, expand abbreviations, drop stopwords, and
//! remove spaces. [`MatchQuery`] holds every intermediate form of the live
//! query; [`candidate_comparison`] produces the matching form of a record.

use paf_match_address_models::AddressRecord;
use paf_match_text::comparison_string;
use paf_match_text::lines::paf_to_single_line;
use paf_match_text::normalize::normalize;
use paf_match_text::phonetic::prefix_key;
use paf_match_text::postcode::separate_postcode;

/// A free-text query in every intermediate form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchQuery {
    /// Input as supplied.
    pub raw: String,
    /// Normalized input, postcode included.
    pub normalized: String,
    /// Postcode found in the input.
    pub postcode: Option<String>,
    /// Normalized input with the postcode removed.
    pub address: String,
    /// Final string fed to trigram scoring.
    pub comparison: String,
}

/// How candidates are fetched for a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Retrieval {
    /// Exact postcode lookup.
    Postcode(String),
    /// Phonetic key prefix lookup.
    PhoneticPrefix(String),
    /// Nothing in the query to look up by.
    Nothing,
}

impl MatchQuery {
    /// Runs the query pipeline over `raw`.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let normalized = normalize(raw);
        let separated = separate_postcode(&normalized);
        let comparison = comparison_string(&separated.address);

        Self {
            raw: raw.to_string(),
            normalized,
            postcode: separated.postcode,
            address: separated.address,
            comparison,
        }
    }

    /// Picks the retrieval strategy: the postcode when present, otherwise
    /// the phonetic key of the first `prefix_tokens` address words.
    #[must_use]
    pub fn retrieval(&self, prefix_tokens: usize) -> Retrieval {
        if let Some(postcode) = &self.postcode {
            return Retrieval::Postcode(postcode.clone());
        }

        let key = prefix_key(&self.address, prefix_tokens);
        if key.is_empty() {
            Retrieval::Nothing
        } else {
            Retrieval::PhoneticPrefix(key)
        }
    }
}

/// Renders a candidate record into the string compared against
/// [`MatchQuery::comparison`]. Any postcode is discarded.
#[must_use]
pub fn candidate_comparison(record: &AddressRecord) -> String {
    let normalized = normalize(&paf_to_single_line(record));
    comparison_string(&separate_postcode(&normalized).address)
}
