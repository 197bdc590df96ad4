//! Console rendering of match results.

use paf_match_address_models::{MatchClassification, MatchResult};

/// Printed when no address is supplied.
pub const USAGE: &str = ">> PLEASE PROVIDE AN ADDRESS TO MATCH";

const BEST_MATCH: &str = ">> BEST MATCH";
const NO_MATCH: &str = ">> NO MATCH";
const MULTIPLE_MATCHES: &str = ">> MULTIPLE MATCHES";

/// Renders one banner line followed by each returned record as pretty JSON.
///
/// # Errors
///
/// Returns an error if a record cannot be serialized.
pub fn render(result: &MatchResult) -> Result<String, serde_json::Error> {
    let banner = match result.classification {
        MatchClassification::Unique => BEST_MATCH,
        MatchClassification::NoMatch => NO_MATCH,
        MatchClassification::Ambiguous => MULTIPLE_MATCHES,
    };

    let mut out = format!("{banner}\n");
    for record in &result.records {
        out.push_str(&serde_json::to_string_pretty(record)?);
        out.push('\n');
    }

    Ok(out)
}
