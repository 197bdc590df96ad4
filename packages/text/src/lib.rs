#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Text pipeline for PAF address matching.
//!
//! Every function in this crate is total: arbitrary input, including the
//! empty string, produces a value and never an error.
//!
//! # Pipeline
//!
//! The same steps are applied to the live query and to every candidate
//! record so that both sides are compared in the same shape:
//!
//! 1. [`normalize::normalize`]: uppercase alphanumerics, single spaces
//! 2. [`postcode::separate_postcode`]: split off the UK postcode
//! 3. [`abbreviations::expand`]: `RD` → `ROAD`, `AVE` → `AVENUE`, ...
//! 4. [`stopwords::remove`]: drop `THE`, `OF`, ...
//! 5. [`normalize::strip_spaces`]: one contiguous token
//! 6. [`similarity::jaccard_index`]: trigram Jaccard coefficient
//!
//! Candidate records are first rendered to text with [`lines::paf_to_lines`].
//! [`phonetic::phonetic`] derives the coarse retrieval key.

pub mod abbreviations;
pub mod lines;
pub mod normalize;
pub mod phonetic;
pub mod postcode;
pub mod similarity;
pub mod stopwords;

/// Turns a normalized, postcode-free address into the string compared by
/// [`similarity::jaccard_index`].
#[must_use]
pub fn comparison_string(address: &str) -> String {
    normalize::strip_spaces(&stopwords::remove(&abbreviations::expand(address)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_comparison_string() {
        let normalized = normalize::normalize(" 3 The Brislee    Ave, North    Shields ne30 2sq");
        let separated = postcode::separate_postcode(&normalized);
        assert_eq!(
            comparison_string(&separated.address),
            "3BRISLEEAVENUENORTHSHIELDS"
        );
    }

    #[test]
    fn comparison_string_of_empty_is_empty() {
        assert_eq!(comparison_string(""), "");
        assert_eq!(comparison_string("THE OF AND"), "");
    }
}
