//! Postal layout of PAF records.
//!
//! A record is rendered by walking [`LAYOUT`] in order. Each rule names one
//! field and whether that field ends the current line or continues onto
//! whatever comes next, so `subBuildingName` sits on the same line as
//! `buildingName` and `buildingNumber` on the same line as the following
//! thoroughfare.

use paf_match_address_models::{AddressRecord, PafField};

/// What happens after a field is placed on the current line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineJoin {
    /// The field closes the line.
    Break,
    /// The field is joined with a space to the next present field.
    Continue,
}

/// Postal layout precedence. Fields not listed never appear in the lines.
pub const LAYOUT: &[(PafField, LineJoin)] = &[
    (PafField::OrganisationName, LineJoin::Break),
    (PafField::SubBuildingName, LineJoin::Continue),
    (PafField::BuildingName, LineJoin::Break),
    (PafField::BuildingNumber, LineJoin::Continue),
    (PafField::DependentThoroughfare, LineJoin::Break),
    (PafField::Thoroughfare, LineJoin::Break),
    (PafField::DoubleDependentLocality, LineJoin::Break),
    (PafField::DependentLocality, LineJoin::Break),
    (PafField::PostTown, LineJoin::Break),
    (PafField::Postcode, LineJoin::Break),
];

/// Renders a record into its ordered, non-empty address lines.
///
/// Absent fields contribute nothing. A continuing field with nothing
/// after it becomes a line of its own.
#[must_use]
pub fn paf_to_lines(record: &AddressRecord) -> Vec<String> {
    let mut lines = Vec::new();
    let mut pending: Vec<&str> = Vec::new();

    for &(field, join) in LAYOUT {
        let Some(value) = record.get(field) else {
            continue;
        };

        pending.push(value.trim());

        if join == LineJoin::Break {
            lines.push(pending.join(" "));
            pending.clear();
        }
    }

    if !pending.is_empty() {
        lines.push(pending.join(" "));
    }

    lines
}

/// Renders a record as one space-separated search string.
#[must_use]
pub fn paf_to_single_line(record: &AddressRecord) -> String {
    crate::normalize::single_line(&paf_to_lines(record))
}

/// Text the stored `phonetic` key is derived from: the first two lines.
#[must_use]
pub fn phonetic_source(record: &AddressRecord) -> String {
    let lines = paf_to_lines(record);
    crate::normalize::single_line(&lines[..lines.len().min(2)])
}

/// Phonetic key stored alongside a record.
///
/// The source lines are normalized first so the key lines up with the
/// prefix computed from a normalized query.
#[must_use]
pub fn phonetic_key(record: &AddressRecord) -> String {
    crate::phonetic::phonetic(&crate::normalize::normalize(&phonetic_source(record)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(fields: &[(PafField, &str)]) -> AddressRecord {
        fields
            .iter()
            .fold(AddressRecord::default(), |r, (f, v)| r.with(*f, *v))
    }

    #[test]
    fn renders_all_fields() {
        let address = record(&[
            (PafField::Postcode, "NE28 1AA"),
            (PafField::PostTown, "Wallsend"),
            (PafField::DependentLocality, "High Farm"),
            (PafField::DoubleDependentLocality, "Kings Estate"),
            (PafField::Thoroughfare, "Kings Road North"),
            (PafField::DependentThoroughfare, "Brand New Houses"),
            (PafField::BuildingNumber, "24"),
            (PafField::BuildingName, "Block B"),
            (PafField::SubBuildingName, "Flat 2"),
            (PafField::OrganisationName, "Bob The Builder"),
        ]);
        assert_eq!(
            paf_to_lines(&address),
            vec![
                "Bob The Builder",
                "Flat 2 Block B",
                "24 Brand New Houses",
                "Kings Road North",
                "Kings Estate",
                "High Farm",
                "Wallsend",
                "NE28 1AA",
            ]
        );
    }

    #[test]
    fn dependent_thoroughfare_without_number() {
        let address = record(&[
            (PafField::Postcode, "NE28 1AA"),
            (PafField::PostTown, "Wallsend"),
            (PafField::DependentLocality, "High Farm"),
            (PafField::Thoroughfare, "Kings Road North"),
            (PafField::DependentThoroughfare, "Brand New Houses"),
            (PafField::BuildingName, "Block B"),
            (PafField::SubBuildingName, "Flat 2"),
            (PafField::OrganisationName, "Bob The Builder"),
        ]);
        assert_eq!(
            paf_to_lines(&address),
            vec![
                "Bob The Builder",
                "Flat 2 Block B",
                "Brand New Houses",
                "Kings Road North",
                "High Farm",
                "Wallsend",
                "NE28 1AA",
            ]
        );
    }

    #[test]
    fn sub_building_without_building_name_joins_number() {
        let address = record(&[
            (PafField::Postcode, "NE28 1AA"),
            (PafField::PostTown, "Wallsend"),
            (PafField::DependentLocality, "High Farm"),
            (PafField::DoubleDependentLocality, "Kings Estate"),
            (PafField::Thoroughfare, "Kings Road North"),
            (PafField::DependentThoroughfare, "Brand New Houses"),
            (PafField::BuildingNumber, "24"),
            (PafField::SubBuildingName, "Flat 2"),
        ]);
        assert_eq!(
            paf_to_lines(&address),
            vec![
                "Flat 2 24 Brand New Houses",
                "Kings Road North",
                "Kings Estate",
                "High Farm",
                "Wallsend",
                "NE28 1AA",
            ]
        );
    }

    #[test]
    fn building_name_and_number() {
        let address = record(&[
            (PafField::Postcode, "NE28 1AA"),
            (PafField::PostTown, "Wallsend"),
            (PafField::Thoroughfare, "Kings Road North"),
            (PafField::BuildingNumber, "24"),
            (PafField::BuildingName, "Block B"),
        ]);
        assert_eq!(
            paf_to_lines(&address),
            vec!["Block B", "24 Kings Road North", "Wallsend", "NE28 1AA"]
        );
    }

    #[test]
    fn building_name_only() {
        let address = record(&[
            (PafField::Postcode, "NE28 1AA"),
            (PafField::PostTown, "Wallsend"),
            (PafField::Thoroughfare, "Kings Road North"),
            (PafField::BuildingName, "Block B"),
        ]);
        assert_eq!(
            paf_to_lines(&address),
            vec!["Block B", "Kings Road North", "Wallsend", "NE28 1AA"]
        );
    }

    #[test]
    fn number_joins_thoroughfare() {
        let address = record(&[
            (PafField::Postcode, "NE28 1AA"),
            (PafField::PostTown, "Wallsend"),
            (PafField::Thoroughfare, "Kings Road North"),
            (PafField::BuildingNumber, "24"),
        ]);
        assert_eq!(
            paf_to_lines(&address),
            vec!["24 Kings Road North", "Wallsend", "NE28 1AA"]
        );
    }

    #[test]
    fn missing_postcode() {
        let address = record(&[
            (PafField::PostTown, "Wallsend"),
            (PafField::Thoroughfare, "Kings Road North"),
            (PafField::BuildingNumber, "24"),
        ]);
        assert_eq!(
            paf_to_lines(&address),
            vec!["24 Kings Road North", "Wallsend"]
        );
    }

    #[test]
    fn dangling_continuation_is_kept() {
        let address = record(&[(PafField::SubBuildingName, "Flat 2")]);
        assert_eq!(paf_to_lines(&address), vec!["Flat 2"]);
    }

    #[test]
    fn ignores_fields_outside_layout_and_blanks() {
        let address = record(&[
            (PafField::Udprn, "12345678"),
            (PafField::PoBox, "PO Box 7"),
            (PafField::Thoroughfare, "  "),
            (PafField::PostTown, "Wallsend"),
        ]);
        let lines = paf_to_lines(&address);
        assert_eq!(lines, vec!["Wallsend"]);
        assert!(lines.iter().all(|l| !l.is_empty()));
        assert!(paf_to_lines(&AddressRecord::default()).is_empty());
    }

    #[test]
    fn single_line_and_phonetic_source() {
        let address = record(&[
            (PafField::Postcode, "NE28 1AA"),
            (PafField::PostTown, "Wallsend"),
            (PafField::Thoroughfare, "Kings Road North"),
            (PafField::BuildingNumber, "24"),
            (PafField::BuildingName, "Block B"),
        ]);
        assert_eq!(
            paf_to_single_line(&address),
            "Block B 24 Kings Road North Wallsend NE28 1AA"
        );
        assert_eq!(phonetic_source(&address), "Block B 24 Kings Road North");
        assert_eq!(phonetic_source(&AddressRecord::default()), "");
    }

    #[test]
    fn phonetic_key_covers_first_two_lines() {
        let address = record(&[
            (PafField::Postcode, "NE28 1AA"),
            (PafField::PostTown, "Wallsend"),
            (PafField::Thoroughfare, "Kings Road North"),
            (PafField::BuildingNumber, "24"),
        ]);
        assert_eq!(phonetic_key(&address), "24KNKSRTNR0WLSNT");

        let lower = record(&[
            (PafField::BuildingNumber, "3b"),
            (PafField::Thoroughfare, "Kings Rd."),
        ]);
        assert_eq!(phonetic_key(&lower), "3BKNKSRT");
    }
}
