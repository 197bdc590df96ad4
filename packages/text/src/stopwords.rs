//! Common English stopwords.
//!
//! Words such as "THE" and "OF" carry no address information but add
//! trigrams, so they are dropped before scoring. The list is uppercase
//! and matching is case-sensitive: run [`crate::normalize::normalize`]
//! first.

use std::collections::BTreeSet;
use std::sync::LazyLock;

static STOPWORDS: LazyLock<BTreeSet<&'static str>> = LazyLock::new(|| {
    BTreeSet::from([
        "A", "ABLE", "ABOUT", "ACROSS", "AFTER", "ALL", "ALMOST", "ALSO", "AM", "AMONG", "AN",
        "AND", "ANY", "ARE", "AS", "AT", "BE", "BECAUSE", "BEEN", "BUT", "BY", "CAN", "CANNOT",
        "COULD", "DEAR", "DID", "DO", "DOES", "EITHER", "ELSE", "EVER", "EVERY", "FOR", "FROM",
        "GET", "GOT", "HAD", "HAS", "HAVE", "HE", "HER", "HERS", "HIM", "HIS", "HOW", "HOWEVER",
        "I", "IF", "IN", "INTO", "IS", "IT", "ITS", "JUST", "LEAST", "LET", "LIKE", "LIKELY",
        "MAY", "ME", "MIGHT", "MOST", "MUST", "MY", "NEITHER", "NO", "NOR", "NOT", "OF", "OFF",
        "OFTEN", "ON", "ONLY", "OR", "OTHER", "OUR", "OWN", "RATHER", "SAID", "SAY", "SAYS",
        "SHE", "SHOULD", "SINCE", "SO", "SOME", "THAN", "THAT", "THE", "THEIR", "THEM", "THEN",
        "THERE", "THESE", "THEY", "THIS", "TIS", "TO", "TOO", "TWAS", "US", "WANTS", "WAS", "WE",
        "WERE", "WHAT", "WHEN", "WHERE", "WHICH", "WHILE", "WHO", "WHOM", "WHY", "WILL", "WITH",
        "WOULD", "YET", "YOU", "YOUR",
    ])
});

/// Returns `true` if `token` is a stopword.
#[must_use]
pub fn is_stopword(token: &str) -> bool {
    STOPWORDS.contains(token)
}

/// Removes stopword tokens, keeping the remaining tokens in order.
///
/// Input made entirely of stopwords yields an empty string.
#[must_use]
pub fn remove(input: &str) -> String {
    input
        .split_whitespace()
        .filter(|token| !is_stopword(token))
        .collect::<Vec<_>>()
        .join(" ")
}
