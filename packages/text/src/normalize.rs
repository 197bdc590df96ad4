//! Address text normalization.
//!
//! Applied symmetrically to queries and to rendered records, so that
//! `" 3 The Brislee  Ave,"` and `"3 THE BRISLEE AVE"` compare equal.

use regex::Regex;
use std::sync::LazyLock;

/// Regex for every run of characters that is neither an ASCII letter or
/// digit nor whitespace.
static NON_ADDRESS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^A-Za-z0-9\s]+").expect("valid regex"));

/// Normalizes arbitrary text to uppercase ASCII alphanumerics separated
/// by single spaces.
///
/// The pipeline:
/// 1. Drop every character that is not an ASCII letter, digit, or whitespace
/// 2. Collapse whitespace runs into one space
/// 3. Uppercase
/// 4. Trim
///
/// The result is either empty or matches `[A-Z0-9]+( [A-Z0-9]+)*`, and
/// normalizing twice gives the same string as normalizing once.
#[must_use]
pub fn normalize(input: &str) -> String {
    NON_ADDRESS_RE
        .replace_all(input, "")
        .split_whitespace()
        .map(str::to_ascii_uppercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Removes every whitespace character.
///
/// Used only to prepare trigram input: trigrams then span what were word
/// boundaries, which absorbs word-segmentation differences such as
/// `"BRIS LEE"` vs `"BRISLEE"`.
#[must_use]
pub fn strip_spaces(input: &str) -> String {
    input.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Joins address lines into a single space-separated line.
#[must_use]
pub fn single_line<S: AsRef<str>>(lines: &[S]) -> String {
    lines
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(" ")
}
