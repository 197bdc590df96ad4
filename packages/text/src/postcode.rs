//! UK postcode detection.
//!
//! Recognises the standard outward + inward code shapes (`A9 9AA`,
//! `A99 9AA`, `AA9 9AA`, `AA99 9AA`, `A9A 9AA`, `AA9A 9AA`) plus the
//! Girobank special case `GIR 0AA`.

use regex::Regex;
use std::sync::LazyLock;

/// UK postcode grammar. The second letter of a two-letter area never
/// uses I or Z.
static POSTCODE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"([Gg][Ii][Rr] 0[Aa]{2})|((([A-Za-z][0-9]{1,2})|(([A-Za-z][A-Ha-hJ-Yj-y][0-9]{1,2})|(([A-Za-z][0-9][A-Za-z])|([A-Za-z][A-Ha-hJ-Yj-y][0-9]?[A-Za-z])))) [0-9][A-Za-z]{2})",
    )
    .expect("valid regex")
});

/// An address with its postcode split off.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeparatedPostcode {
    /// The address with the postcode removed, whitespace collapsed.
    pub address: String,
    /// The first postcode found, if any.
    pub postcode: Option<String>,
}

/// Splits the first postcode-shaped substring off a normalized address.
///
/// Only the first match is removed; any later postcode-shaped text stays
/// in the address.
#[must_use]
pub fn separate_postcode(input: &str) -> SeparatedPostcode {
    let Some(found) = POSTCODE_RE.find(input) else {
        return SeparatedPostcode {
            address: input.trim().to_string(),
            postcode: None,
        };
    };

    let remainder = format!("{} {}", &input[..found.start()], &input[found.end()..]);

    SeparatedPostcode {
        address: remainder.split_whitespace().collect::<Vec<_>>().join(" "),
        postcode: Some(found.as_str().to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize;

    #[test]
    fn separates_trailing_postcode() {
        let res = separate_postcode("3 THE BRISLEE AVE NORTH SHIELDS NE30 2SQ");
        assert_eq!(res.address, "3 THE BRISLEE AVE NORTH SHIELDS");
        assert_eq!(res.postcode.as_deref(), Some("NE30 2SQ"));
    }

    #[test]
    fn recognises_all_outward_shapes() {
        for code in [
            "M1 1AE", "B33 8TH", "CR2 6XH", "DN55 1PT", "W1A 0AX", "EC1A 1BB",
        ] {
            let res = separate_postcode(&format!("SOMEWHERE {code}"));
            assert_eq!(res.postcode.as_deref(), Some(code), "missed {code}");
            assert_eq!(res.address, "SOMEWHERE");
        }
    }

    #[test]
    fn recognises_girobank() {
        let res = separate_postcode("GIROBANK BOOTLE GIR 0AA");
        assert_eq!(res.postcode.as_deref(), Some("GIR 0AA"));
        assert_eq!(res.address, "GIROBANK BOOTLE");
    }

    #[test]
    fn removes_postcode_from_middle() {
        let res = separate_postcode("24 KINGS ROAD NE28 1AA WALLSEND");
        assert_eq!(res.postcode.as_deref(), Some("NE28 1AA"));
        assert_eq!(res.address, "24 KINGS ROAD WALLSEND");
    }

    #[test]
    fn removes_only_first_postcode() {
        let res = separate_postcode("NE28 1AA NE30 2SQ");
        assert_eq!(res.postcode.as_deref(), Some("NE28 1AA"));
        assert_eq!(res.address, "NE30 2SQ");
    }

    #[test]
    fn without_postcode_returns_input() {
        let res = separate_postcode("3 THE BRISLEE AVE NORTH SHIELDS");
        assert_eq!(res.address, "3 THE BRISLEE AVE NORTH SHIELDS");
        assert_eq!(res.postcode, None);
    }

    #[test]
    fn handles_empty_input() {
        let res = separate_postcode("");
        assert_eq!(res.address, "");
        assert_eq!(res.postcode, None);
    }

    #[test]
    fn rejoining_reproduces_normalized_input() {
        for input in [
            "3 THE BRISLEE AVE NORTH SHIELDS NE30 2SQ",
            "FLAT 2 BLOCK B 24 KINGS ROAD WALLSEND NE28 1AA",
            "EC1A 1BB",
        ] {
            let res = separate_postcode(input);
            let postcode = res.postcode.expect("postcode present");
            let rejoined = normalize(&format!("{} {postcode}", res.address));
            assert_eq!(rejoined, input);
        }
    }
}
