//! Thoroughfare type abbreviation table.
//!
//! Maps common British thoroughfare abbreviations to their canonical
//! expanded forms. Applied symmetrically to queries and records so that
//! "24 KINGS RD" matches "24 KINGS ROAD".

use std::collections::BTreeMap;
use std::sync::LazyLock;

/// Maps thoroughfare abbreviations to their canonical full form.
static THOROUGHFARE_TYPES: LazyLock<BTreeMap<&'static str, &'static str>> = LazyLock::new(|| {
    BTreeMap::from([
        ("ALY", "ALLEY"),
        ("ARC", "ARCADE"),
        ("AV", "AVENUE"),
        ("AVE", "AVENUE"),
        ("AVEN", "AVENUE"),
        ("AVENU", "AVENUE"),
        ("AVN", "AVENUE"),
        ("AVNUE", "AVENUE"),
        ("BNK", "BANK"),
        ("BCH", "BEACH"),
        ("BOT", "BOTTOM"),
        ("BOTTM", "BOTTOM"),
        ("BTM", "BOTTOM"),
        ("BLVD", "BOULEVARD"),
        ("BOUL", "BOULEVARD"),
        ("BOULV", "BOULEVARD"),
        ("BRDGE", "BRIDGE"),
        ("BRG", "BRIDGE"),
        ("BLDG", "BUILDING"),
        ("CAUSEWA", "CAUSEWAY"),
        ("CSWY", "CAUSEWAY"),
        ("CIRC", "CIRCUS"),
        ("CL", "CLOSE"),
        ("COR", "CORNER"),
        ("CT", "COURT"),
        ("CV", "COVE"),
        ("CRES", "CRESCENT"),
        ("CRSENT", "CRESCENT"),
        ("CRSNT", "CRESCENT"),
        ("XING", "CROSSING"),
        ("DL", "DALE"),
        ("DR", "DRIVE"),
        ("DRIV", "DRIVE"),
        ("DRV", "DRIVE"),
        ("EST", "ESTATE"),
        ("GDNS", "GARDENS"),
        ("GRDNS", "GARDENS"),
        ("GROV", "GROVE"),
        ("GRV", "GROVE"),
        ("HVN", "HAVEN"),
        ("HL", "HILL"),
        ("JCT", "JUNCTION"),
        ("JCTN", "JUNCTION"),
        ("LN", "LANE"),
        ("LCK", "LOCK"),
        ("LDG", "LODGE"),
        ("LDGE", "LODGE"),
        ("LODG", "LODGE"),
        ("MNR", "MANOR"),
        ("MD", "MEAD"),
        ("MWS", "MEWS"),
        ("MNT", "MOUNT"),
        ("PKWY", "PARKWAY"),
        ("PL", "PLACE"),
        ("RDG", "RIDGE"),
        ("RI", "RISE"),
        ("RD", "ROAD"),
        ("RW", "ROW"),
        ("SQ", "SQUARE"),
        ("SQR", "SQUARE"),
        ("SQRE", "SQUARE"),
        ("SQU", "SQUARE"),
        ("STA", "STATION"),
        ("STN", "STATION"),
        ("ST", "STREET"),
        ("STR", "STREET"),
        ("STRT", "STREET"),
        ("TCE", "TERRACE"),
        ("VL", "VALE"),
        ("VW", "VIEW"),
        ("VILL", "VILLAGE"),
        ("VILLG", "VILLAGE"),
        ("VLG", "VILLAGE"),
        ("WY", "WAY"),
        ("WH", "WHARF"),
        ("WHA", "WHARF"),
        ("WHF", "WHARF"),
    ])
});

/// Expands a single token if it matches a known abbreviation.
///
/// Returns the expanded form or the original token unchanged.
#[must_use]
pub fn expand_token(token: &str) -> &str {
    THOROUGHFARE_TYPES.get(token).copied().unwrap_or(token)
}

/// Expands every abbreviated token of a space-delimited string.
///
/// Tokens are expanded independently; multi-word abbreviations are not
/// recognised.
#[must_use]
pub fn expand(input: &str) -> String {
    input
        .split_whitespace()
        .map(expand_token)
        .collect::<Vec<_>>()
        .join(" ")
}
