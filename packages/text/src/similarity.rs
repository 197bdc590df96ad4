//! Trigram Jaccard similarity.

use std::collections::BTreeSet;

/// Collects the set of contiguous three-character windows of `s`.
///
/// No padding is applied, so strings shorter than three characters
/// produce an empty set.
#[must_use]
pub fn trigrams(s: &str) -> BTreeSet<[char; 3]> {
    let chars: Vec<char> = s.chars().collect();
    chars.windows(3).map(|w| [w[0], w[1], w[2]]).collect()
}

/// Jaccard coefficient of the trigram sets of `a` and `b`.
///
/// Returns `|A ∩ B| / |A ∪ B|` in `[0, 1]`, or `0.0` when both sets are
/// empty. Inputs are expected to be normalized and space-stripped.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn jaccard_index(a: &str, b: &str) -> f64 {
    let a = trigrams(a);
    let b = trigrams(b);

    let union = a.union(&b).count();
    if union == 0 {
        return 0.0;
    }

    let intersection = a.intersection(&b).count();
    intersection as f64 / union as f64
}
