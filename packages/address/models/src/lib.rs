#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Shared types for PAF address matching.
//!
//! This crate contains only data types, configuration structs, and simple
//! conversions. It has no heavyweight dependencies (no database, no I/O).

use std::time::Duration;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// One column of the Postcode Address File schema.
///
/// Variants are declared in CSV column order, so [`PafField::ALL`] doubles
/// as the positional mapping used by ingestion.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum PafField {
    /// Full postcode, e.g. `NE28 1AA`.
    Postcode,
    /// Post town.
    PostTown,
    /// Dependent locality.
    DependentLocality,
    /// Double dependent locality.
    DoubleDependentLocality,
    /// Thoroughfare (street) name.
    Thoroughfare,
    /// Dependent thoroughfare name.
    DependentThoroughfare,
    /// Building number.
    BuildingNumber,
    /// Building name.
    BuildingName,
    /// Sub-building name (flat, unit).
    SubBuildingName,
    /// PO Box number.
    #[serde(rename = "POBox")]
    #[strum(serialize = "POBox")]
    PoBox,
    /// Department name.
    DepartmentName,
    /// Organisation name.
    OrganisationName,
    /// Unique Delivery Point Reference Number.
    #[serde(rename = "UDPRN")]
    #[strum(serialize = "UDPRN")]
    Udprn,
    /// Postcode type (`S` small user, `L` large user).
    PostcodeType,
    /// Small user organisation indicator.
    #[serde(rename = "SUOrganisationIndicator")]
    #[strum(serialize = "SUOrganisationIndicator")]
    SuOrganisationIndicator,
    /// Delivery point suffix.
    DeliveryPointSuffix,
}

impl PafField {
    /// Every field, in PAF CSV column order.
    pub const ALL: [Self; 16] = [
        Self::Postcode,
        Self::PostTown,
        Self::DependentLocality,
        Self::DoubleDependentLocality,
        Self::Thoroughfare,
        Self::DependentThoroughfare,
        Self::BuildingNumber,
        Self::BuildingName,
        Self::SubBuildingName,
        Self::PoBox,
        Self::DepartmentName,
        Self::OrganisationName,
        Self::Udprn,
        Self::PostcodeType,
        Self::SuOrganisationIndicator,
        Self::DeliveryPointSuffix,
    ];

    /// Column name used for this field in the address store.
    #[must_use]
    pub const fn column(self) -> &'static str {
        match self {
            Self::Postcode => "postcode",
            Self::PostTown => "post_town",
            Self::DependentLocality => "dependent_locality",
            Self::DoubleDependentLocality => "double_dependent_locality",
            Self::Thoroughfare => "thoroughfare",
            Self::DependentThoroughfare => "dependent_thoroughfare",
            Self::BuildingNumber => "building_number",
            Self::BuildingName => "building_name",
            Self::SubBuildingName => "sub_building_name",
            Self::PoBox => "po_box",
            Self::DepartmentName => "department_name",
            Self::OrganisationName => "organisation_name",
            Self::Udprn => "udprn",
            Self::PostcodeType => "postcode_type",
            Self::SuOrganisationIndicator => "su_organisation_indicator",
            Self::DeliveryPointSuffix => "delivery_point_suffix",
        }
    }
}

/// A canonical PAF address record.
///
/// Every field is optional. Empty values are never stored: [`Self::set`]
/// turns a blank value into `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postcode: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_town: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependent_locality: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub double_dependent_locality: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thoroughfare: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependent_thoroughfare: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub building_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub building_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_building_name: Option<String>,
    #[serde(default, rename = "POBox", skip_serializing_if = "Option::is_none")]
    pub po_box: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organisation_name: Option<String>,
    #[serde(default, rename = "UDPRN", skip_serializing_if = "Option::is_none")]
    pub udprn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub postcode_type: Option<String>,
    #[serde(
        default,
        rename = "SUOrganisationIndicator",
        skip_serializing_if = "Option::is_none"
    )]
    pub su_organisation_indicator: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_point_suffix: Option<String>,
    /// Phonetic key of the first two rendered lines, attached at ingestion.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phonetic: Option<String>,
}

impl AddressRecord {
    const fn slot(&self, field: PafField) -> &Option<String> {
        match field {
            PafField::Postcode => &self.postcode,
            PafField::PostTown => &self.post_town,
            PafField::DependentLocality => &self.dependent_locality,
            PafField::DoubleDependentLocality => &self.double_dependent_locality,
            PafField::Thoroughfare => &self.thoroughfare,
            PafField::DependentThoroughfare => &self.dependent_thoroughfare,
            PafField::BuildingNumber => &self.building_number,
            PafField::BuildingName => &self.building_name,
            PafField::SubBuildingName => &self.sub_building_name,
            PafField::PoBox => &self.po_box,
            PafField::DepartmentName => &self.department_name,
            PafField::OrganisationName => &self.organisation_name,
            PafField::Udprn => &self.udprn,
            PafField::PostcodeType => &self.postcode_type,
            PafField::SuOrganisationIndicator => &self.su_organisation_indicator,
            PafField::DeliveryPointSuffix => &self.delivery_point_suffix,
        }
    }

    const fn slot_mut(&mut self, field: PafField) -> &mut Option<String> {
        match field {
            PafField::Postcode => &mut self.postcode,
            PafField::PostTown => &mut self.post_town,
            PafField::DependentLocality => &mut self.dependent_locality,
            PafField::DoubleDependentLocality => &mut self.double_dependent_locality,
            PafField::Thoroughfare => &mut self.thoroughfare,
            PafField::DependentThoroughfare => &mut self.dependent_thoroughfare,
            PafField::BuildingNumber => &mut self.building_number,
            PafField::BuildingName => &mut self.building_name,
            PafField::SubBuildingName => &mut self.sub_building_name,
            PafField::PoBox => &mut self.po_box,
            PafField::DepartmentName => &mut self.department_name,
            PafField::OrganisationName => &mut self.organisation_name,
            PafField::Udprn => &mut self.udprn,
            PafField::PostcodeType => &mut self.postcode_type,
            PafField::SuOrganisationIndicator => &mut self.su_organisation_indicator,
            PafField::DeliveryPointSuffix => &mut self.delivery_point_suffix,
        }
    }

    /// Returns the value of `field`, or `None` if it is absent or blank.
    #[must_use]
    pub fn get(&self, field: PafField) -> Option<&str> {
        self.slot(field)
            .as_deref()
            .filter(|v| !v.trim().is_empty())
    }

    /// Sets `field`. A blank value clears it.
    pub fn set(&mut self, field: PafField, value: impl Into<String>) {
        let value = value.into();
        *self.slot_mut(field) = if value.trim().is_empty() {
            None
        } else {
            Some(value)
        };
    }

    /// Builder-style [`Self::set`].
    #[must_use]
    pub fn with(mut self, field: PafField, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }

    /// Iterates the present fields in PAF column order.
    pub fn fields(&self) -> impl Iterator<Item = (PafField, &str)> {
        PafField::ALL
            .into_iter()
            .filter_map(|field| self.get(field).map(|value| (field, value)))
    }
}

/// Outcome class of a single match invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, AsRefStr)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchClassification {
    /// Exactly one candidate achieved the best score.
    Unique,
    /// No candidates were retrieved.
    NoMatch,
    /// More than one candidate tied on the best score.
    Ambiguous,
}

impl MatchClassification {
    /// Classifies a tie set by its size.
    #[must_use]
    pub const fn from_tie_count(count: usize) -> Self {
        match count {
            0 => Self::NoMatch,
            1 => Self::Unique,
            _ => Self::Ambiguous,
        }
    }
}

/// Result of matching one free-text query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchResult {
    pub classification: MatchClassification,
    /// Every record tied on the best score.
    pub records: Vec<AddressRecord>,
    /// Best trigram similarity seen, `0.0` when nothing was scored.
    pub score: f64,
}

impl MatchResult {
    /// Builds a result from the set of records tied on `score`.
    #[must_use]
    pub const fn from_ties(records: Vec<AddressRecord>, score: f64) -> Self {
        Self {
            classification: MatchClassification::from_tie_count(records.len()),
            records,
            score,
        }
    }

    /// A result with no candidates.
    #[must_use]
    pub const fn no_match() -> Self {
        Self::from_ties(Vec::new(), 0.0)
    }

    /// The winning record, if the result is [`MatchClassification::Unique`].
    #[must_use]
    pub fn best(&self) -> Option<&AddressRecord> {
        match self.classification {
            MatchClassification::Unique => self.records.first(),
            MatchClassification::NoMatch | MatchClassification::Ambiguous => None,
        }
    }
}

/// Top-level configuration, loaded from `paf_match.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatchConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub matching: MatchingConfig,
    #[serde(default)]
    pub store: StoreConfig,
}

/// Location of the `DuckDB` address store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Path of the database file. Relative paths resolve against the
    /// project root.
    #[serde(default = "default_database_path")]
    pub path: String,
}

fn default_database_path() -> String {
    "data/paf.duckdb".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
        }
    }
}

/// Matching heuristics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchingConfig {
    /// Number of leading query tokens encoded for the phonetic-prefix
    /// lookup when no postcode is present.
    #[serde(default = "default_phonetic_prefix_tokens")]
    pub phonetic_prefix_tokens: usize,
}

const fn default_phonetic_prefix_tokens() -> usize {
    4
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            phonetic_prefix_tokens: default_phonetic_prefix_tokens(),
        }
    }
}

/// Timeout and retry policy for store access.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Per-attempt timeout for a single store query, in milliseconds.
    #[serde(default = "default_query_timeout_ms")]
    pub query_timeout_ms: u64,
    /// Re-attempts after the first failure (0 disables retry).
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Backoff before the first retry; doubled on each further retry.
    #[serde(default = "default_base_backoff_ms")]
    pub base_backoff_ms: u64,
}

const fn default_query_timeout_ms() -> u64 {
    5_000
}

const fn default_max_retries() -> u32 {
    3
}

const fn default_base_backoff_ms() -> u64 {
    200
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            query_timeout_ms: default_query_timeout_ms(),
            max_retries: default_max_retries(),
            base_backoff_ms: default_base_backoff_ms(),
        }
    }
}

impl StoreConfig {
    /// Per-attempt query timeout.
    #[must_use]
    pub const fn query_timeout(&self) -> Duration {
        Duration::from_millis(self.query_timeout_ms)
    }

    /// Delay before retry number `attempt` (1-based).
    #[must_use]
    pub fn backoff(&self, attempt: u32) -> Duration {
        let factor = 1u64 << attempt.saturating_sub(1).min(16);
        Duration::from_millis(self.base_backoff_ms.saturating_mul(factor))
    }
}
