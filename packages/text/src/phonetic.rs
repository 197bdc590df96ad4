//! Word-wise phonetic keys for coarse candidate retrieval.
//!
//! Each word is reduced to its Metaphone consonant skeleton and the codes
//! are concatenated, so `"24 Kings Road North"` becomes `"24KNKSRTNR0"`.
//! Words starting with a digit (house and flat numbers) are kept verbatim
//! because they must match exactly.
//!
//! The stored `phonetic` attribute of a record is computed once at
//! ingestion from its first two rendered lines; queries are matched by
//! key prefix.

use std::sync::LazyLock;

use rphonetic::{Encoder, Metaphone};

/// Longest code produced for one word. `Metaphone::default()` stops at
/// four, which would cut `WALLSEND` to `WLSN`.
const MAX_CODE_LEN: usize = 64;

static METAPHONE: LazyLock<Metaphone> = LazyLock::new(|| Metaphone::new(Some(MAX_CODE_LEN)));

/// Computes the phonetic key of an address line.
#[must_use]
pub fn phonetic(line: &str) -> String {
    line.split_whitespace()
        .map(|word| {
            if word.starts_with(|c: char| c.is_ascii_digit()) {
                word.to_string()
            } else {
                metaphone(word)
            }
        })
        .collect()
}

/// Computes the phonetic key of the first `max_tokens` words of `line`.
#[must_use]
pub fn prefix_key(line: &str, max_tokens: usize) -> String {
    let head: Vec<&str> = line.split_whitespace().take(max_tokens).collect();
    phonetic(&head.join(" "))
}

/// Encodes a single word with the Metaphone algorithm.
///
/// Only ASCII letters are encoded, case-insensitively; a word without any
/// encodes to the empty string.
#[must_use]
pub fn metaphone(word: &str) -> String {
    let letters: String = word
        .chars()
        .filter(char::is_ascii_alphabetic)
        .map(|c| c.to_ascii_uppercase())
        .collect();

    if letters.is_empty() {
        return String::new();
    }

    METAPHONE.encode(&letters)
}
