#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Dataset record types shared across the rental-map system.
//!
//! Defines the field-exact schemas for the five municipal datasets
//! (crime, rent, schools, parks, neighbourhood boundaries) and the
//! canonical name type used as the sole join key between them. All
//! cross-dataset joins are attribute-based; no geometric matching is
//! performed anywhere in the system.

use std::fmt;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// A neighbourhood or rent-zone identifier in canonical form.
///
/// Canonicalization is uppercasing plus trimming. Every index key and
/// every comparison in the system goes through this type, so two names
/// differing only in case or surrounding whitespace always resolve to
/// the same record. Deserialization canonicalizes, which makes it
/// impossible to smuggle a raw name into an index.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CanonicalName(String);

impl CanonicalName {
    /// Canonicalizes a raw name.
    #[must_use]
    pub fn new(raw: &str) -> Self {
        Self(raw.trim().to_uppercase())
    }

    /// Returns the canonical form as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the name, returning the canonical `String`.
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for CanonicalName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CanonicalName {
    fn from(raw: &str) -> Self {
        Self::new(raw)
    }
}

impl Serialize for CanonicalName {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for CanonicalName {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::new(&raw))
    }
}

/// The five datasets the store loads, one variant per source file.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DatasetKind {
    /// Per-neighbourhood violent/weapons crime counts.
    Crime,
    /// Per-zone average rents by unit type.
    Rent,
    /// School point features.
    Schools,
    /// Park point features.
    Parks,
    /// Neighbourhood boundary polygons.
    Neighbourhoods,
}

impl DatasetKind {
    /// All dataset kinds, in load order.
    pub const ALL: [Self; 5] = [
        Self::Crime,
        Self::Rent,
        Self::Schools,
        Self::Parks,
        Self::Neighbourhoods,
    ];

    /// Well-known file name for this dataset in a data directory.
    #[must_use]
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::Crime => "crime-data-processed.json",
            Self::Rent => "rent-data-processed.json",
            Self::Schools => "schools.geojson",
            Self::Parks => "parks.geojson",
            Self::Neighbourhoods => "neighbourhoods.geojson",
        }
    }

    /// The designated top-level key whose absence invalidates a payload.
    #[must_use]
    pub const fn top_level_key(self) -> &'static str {
        match self {
            Self::Crime => "crime_by_neighbourhood",
            Self::Rent => "rent_by_neighbourhood",
            Self::Schools | Self::Parks | Self::Neighbourhoods => "features",
        }
    }
}

/// Violent/weapons crime figures for a single neighbourhood.
///
/// Neighbourhoods absent from the crime source have no record at all,
/// which is distinct from a record with zero incidents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrimeRecord {
    /// Neighbourhood name as reported by the source.
    pub neighbourhood_name: String,
    /// Total violent/weapons incidents reported for 2025.
    pub violent_weapons_crimes_total_2025: u32,
    /// Monthly average of violent/weapons incidents.
    pub violent_weapons_crimes_monthly_avg: f64,
}

impl CrimeRecord {
    /// Canonical form of the reported neighbourhood name.
    #[must_use]
    pub fn canonical_name(&self) -> CanonicalName {
        CanonicalName::new(&self.neighbourhood_name)
    }
}

/// Average rents for a rental-market zone.
///
/// Rent is reported per *zone*, which may aggregate several
/// neighbourhoods; `neighbourhood_name` therefore often holds a zone
/// name rather than a single neighbourhood. Every figure is nullable --
/// a zone with no listings of a unit type reports `null`, never zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RentRecord {
    /// Zone (or neighbourhood) name as reported by the source.
    pub neighbourhood_name: String,
    /// Average studio rent.
    pub studio: Option<f64>,
    /// Average one-bedroom rent.
    #[serde(rename = "1_bedroom")]
    pub one_bedroom: Option<f64>,
    /// Average two-bedroom rent.
    #[serde(rename = "2_bedroom")]
    pub two_bedroom: Option<f64>,
    /// Average rent for three or more bedrooms.
    #[serde(rename = "3_bedroom_plus")]
    pub three_bedroom_plus: Option<f64>,
    /// Average across all unit types.
    pub total_avg: Option<f64>,
}

impl RentRecord {
    /// Canonical form of the reported zone name.
    #[must_use]
    pub fn canonical_name(&self) -> CanonicalName {
        CanonicalName::new(&self.neighbourhood_name)
    }

    /// Returns the figure for a unit type, `None` when unreported.
    #[must_use]
    pub const fn price(&self, unit: UnitType) -> Option<f64> {
        match unit {
            UnitType::Studio => self.studio,
            UnitType::OneBedroom => self.one_bedroom,
            UnitType::TwoBedroom => self.two_bedroom,
            UnitType::ThreeBedroomPlus => self.three_bedroom_plus,
            UnitType::TotalAverage => self.total_avg,
        }
    }
}

/// The closed set of rental unit types.
///
/// Wire names match the rent dataset's JSON keys; display labels come
/// from [`UnitType::label`] rather than string comparisons at call
/// sites.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
pub enum UnitType {
    /// Studio apartment.
    #[serde(rename = "studio")]
    #[strum(serialize = "studio")]
    Studio,
    /// One bedroom.
    #[serde(rename = "1_bedroom")]
    #[strum(serialize = "1_bedroom")]
    OneBedroom,
    /// Two bedrooms.
    #[serde(rename = "2_bedroom")]
    #[strum(serialize = "2_bedroom")]
    TwoBedroom,
    /// Three or more bedrooms.
    #[serde(rename = "3_bedroom_plus")]
    #[strum(serialize = "3_bedroom_plus")]
    ThreeBedroomPlus,
    /// Average across all unit types.
    #[serde(rename = "total_avg")]
    #[strum(serialize = "total_avg")]
    TotalAverage,
}

impl UnitType {
    /// All unit types, in display order.
    pub const ALL: [Self; 5] = [
        Self::Studio,
        Self::OneBedroom,
        Self::TwoBedroom,
        Self::ThreeBedroomPlus,
        Self::TotalAverage,
    ];

    /// Human-readable label for filter controls and panels.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Studio => "Studio",
            Self::OneBedroom => "1 Bedroom",
            Self::TwoBedroom => "2 Bedroom",
            Self::ThreeBedroomPlus => "3+ Bedroom",
            Self::TotalAverage => "Total Average",
        }
    }
}

/// A typed `GeoJSON` feature collection.
///
/// Generic over the properties schema so schools/parks and boundaries
/// share the container while keeping their properties validated at
/// parse time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureCollection<P> {
    /// `GeoJSON` object type (always `"FeatureCollection"`).
    #[serde(rename = "type")]
    pub collection_type: String,
    /// The member features.
    pub features: Vec<Feature<P>>,
}

impl<P> FeatureCollection<P> {
    /// An empty collection, for degenerate inputs in tests.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            collection_type: "FeatureCollection".to_string(),
            features: Vec::new(),
        }
    }
}

/// A single typed `GeoJSON` feature.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Feature<P> {
    /// `GeoJSON` object type (always `"Feature"`).
    #[serde(rename = "type")]
    pub feature_type: String,
    /// Schema-validated properties.
    pub properties: P,
    /// Geometry, if the source supplies one.
    #[serde(default)]
    pub geometry: Option<geojson::Geometry>,
}

/// Properties of a school or park point feature.
///
/// Membership in a neighbourhood is decided purely by the
/// `neighbourhood_name` attribute, never by point-in-polygon tests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointProperties {
    /// Display name of the school or park, when present.
    #[serde(default)]
    pub name: Option<String>,
    /// Name of the containing neighbourhood, when present.
    #[serde(default)]
    pub neighbourhood_name: Option<String>,
}

impl PointProperties {
    /// Whether this feature belongs to the named neighbourhood.
    #[must_use]
    pub fn in_neighbourhood(&self, name: &CanonicalName) -> bool {
        self.neighbourhood_name
            .as_deref()
            .is_some_and(|n| CanonicalName::new(n) == *name)
    }
}

/// Properties of a neighbourhood boundary feature.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoundaryProperties {
    /// Official neighbourhood name.
    pub name: String,
    /// City planning district, consumed only by zone-mapping
    /// generation.
    #[serde(default)]
    pub district: Option<String>,
}

impl BoundaryProperties {
    /// Canonical form of the neighbourhood name.
    #[must_use]
    pub fn canonical_name(&self) -> CanonicalName {
        CanonicalName::new(&self.name)
    }
}

/// School/park feature collection.
pub type PointCollection = FeatureCollection<PointProperties>;
/// Neighbourhood boundary feature collection.
pub type BoundaryCollection = FeatureCollection<BoundaryProperties>;

/// Crime dataset payload: the designated top-level key holds the
/// record sequence, and its absence fails deserialization (and thus
/// the whole load).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrimePayload {
    /// One record per neighbourhood that reports crime.
    pub crime_by_neighbourhood: Vec<CrimeRecord>,
}

/// Rent dataset payload, keyed by zone name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RentPayload {
    /// One record per rental-market zone.
    pub rent_by_neighbourhood: Vec<RentRecord>,
}

/// Result of a rent lookup for a neighbourhood.
///
/// When the neighbourhood has no rent record of its own and the figure
/// was inherited from its rental-market zone, `inherited_from` names
/// that zone so presentation layers can disclose the provenance. It is
/// never set on a direct hit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RentLookup {
    /// The resolved rent record (direct or zone-inherited).
    #[serde(flatten)]
    pub record: RentRecord,
    /// Zone the record was inherited from, if the fallback path was
    /// taken.
    #[serde(rename = "_inheritedFrom", skip_serializing_if = "Option::is_none")]
    pub inherited_from: Option<CanonicalName>,
}

impl RentLookup {
    /// Whether this figure is a zone average rather than
    /// neighbourhood-specific data.
    #[must_use]
    pub const fn is_inherited(&self) -> bool {
        self.inherited_from.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_name_uppercases_and_trims() {
        assert_eq!(CanonicalName::new("  Downtown ").as_str(), "DOWNTOWN");
        assert_eq!(
            CanonicalName::new("downtown"),
            CanonicalName::new("DOWNTOWN ")
        );
    }

    #[test]
    fn canonical_name_canonicalizes_on_deserialize() {
        let name: CanonicalName = serde_json::from_str("\" alberta avenue \"").unwrap();
        assert_eq!(name.as_str(), "ALBERTA AVENUE");
    }

    #[test]
    fn rent_record_uses_wire_field_names() {
        let record: RentRecord = serde_json::from_value(serde_json::json!({
            "neighbourhood_name": "DOWNTOWN",
            "studio": 1100.0,
            "1_bedroom": 1250.5,
            "2_bedroom": null,
            "3_bedroom_plus": 1900.0,
            "total_avg": 1400.0,
        }))
        .unwrap();

        assert_eq!(record.price(UnitType::OneBedroom), Some(1250.5));
        assert_eq!(record.price(UnitType::TwoBedroom), None);
    }

    #[test]
    fn rent_lookup_serializes_provenance_marker_only_when_inherited() {
        let record = RentRecord {
            neighbourhood_name: "EDMONTON".to_string(),
            studio: None,
            one_bedroom: Some(1200.0),
            two_bedroom: None,
            three_bedroom_plus: None,
            total_avg: Some(1300.0),
        };

        let direct = RentLookup {
            record: record.clone(),
            inherited_from: None,
        };
        let json = serde_json::to_value(&direct).unwrap();
        assert!(json.get("_inheritedFrom").is_none());

        let inherited = RentLookup {
            record,
            inherited_from: Some(CanonicalName::new("EDMONTON")),
        };
        let json = serde_json::to_value(&inherited).unwrap();
        assert_eq!(json["_inheritedFrom"], "EDMONTON");
    }

    #[test]
    fn crime_payload_requires_top_level_key() {
        let result: Result<CrimePayload, _> =
            serde_json::from_value(serde_json::json!({ "records": [] }));
        assert!(result.is_err());
    }

    #[test]
    fn point_membership_is_case_insensitive() {
        let props = PointProperties {
            name: Some("Rundle Park".to_string()),
            neighbourhood_name: Some("rundle heights ".to_string()),
        };
        assert!(props.in_neighbourhood(&CanonicalName::new("Rundle Heights")));
        assert!(!props.in_neighbourhood(&CanonicalName::new("DOWNTOWN")));
    }

    #[test]
    fn unit_type_labels_cover_all_variants() {
        for unit in UnitType::ALL {
            assert!(!unit.label().is_empty());
        }
        assert_eq!(UnitType::OneBedroom.label(), "1 Bedroom");
        assert_eq!(UnitType::OneBedroom.as_ref(), "1_bedroom");
    }
}
