#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Neighbourhood-to-rent-zone mapping.
//!
//! Rent figures are reported per rental-market *zone*, which is coarser
//! than the city's neighbourhood boundaries. This crate owns the static
//! artifact that maps every neighbourhood to the zone it inherits rent
//! figures from, the configurable district heuristics used to derive
//! it, and the deterministic generator that regenerates the artifact
//! from the boundary and rent datasets.

pub mod generate;
pub mod heuristics;

use std::collections::BTreeMap;
use std::path::Path;

use rental_map_data_models::CanonicalName;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use generate::generate_mapping;
pub use heuristics::DistrictHeuristics;

/// Errors that can occur loading or writing zone-mapping data.
#[derive(Debug, Error)]
pub enum ZoneMappingError {
    /// JSON parsing or serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing of the heuristic table failed.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// File read or write failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// The flat neighbourhood-name to zone-name mapping artifact.
///
/// Total over the boundary dataset it was generated from: every
/// boundary feature's canonical name is present as a key. Stored
/// sorted so regeneration from identical inputs is byte-identical.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ZoneMapping {
    entries: BTreeMap<CanonicalName, CanonicalName>,
}

impl ZoneMapping {
    /// Parses the artifact from its flat JSON object form.
    ///
    /// # Errors
    ///
    /// Returns [`ZoneMappingError::Json`] if the content is not a flat
    /// string-to-string object.
    pub fn from_json_str(json: &str) -> Result<Self, ZoneMappingError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Loads the artifact from a file.
    ///
    /// # Errors
    ///
    /// Returns [`ZoneMappingError`] if the file cannot be read or
    /// parsed.
    pub fn load(path: &Path) -> Result<Self, ZoneMappingError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    /// Serializes the artifact as pretty-printed JSON with sorted keys.
    ///
    /// # Errors
    ///
    /// Returns [`ZoneMappingError::Json`] if serialization fails.
    pub fn to_json_string(&self) -> Result<String, ZoneMappingError> {
        Ok(serde_json::to_string_pretty(&self.entries)?)
    }

    /// Resolves a neighbourhood name to its rent zone.
    ///
    /// Returns `None` only for names outside the boundary dataset the
    /// mapping was generated from; within it, the mapping is total.
    #[must_use]
    pub fn resolve(&self, name: &CanonicalName) -> Option<&CanonicalName> {
        self.entries.get(name)
    }

    /// Number of mapped neighbourhoods.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the mapping has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over `(neighbourhood, zone)` pairs in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = (&CanonicalName, &CanonicalName)> {
        self.entries.iter()
    }

    pub(crate) fn insert(&mut self, neighbourhood: CanonicalName, zone: CanonicalName) {
        self.entries.insert(neighbourhood, zone);
    }
}

impl FromIterator<(CanonicalName, CanonicalName)> for ZoneMapping {
    fn from_iter<I: IntoIterator<Item = (CanonicalName, CanonicalName)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_flat_json_object() {
        let mapping = ZoneMapping::from_json_str(
            r#"{ "ALBERTA AVENUE": "HIGHLANDS/ALBERTA AVENUE", "DOWNTOWN": "DOWNTOWN" }"#,
        )
        .unwrap();

        assert_eq!(mapping.len(), 2);
        assert_eq!(
            mapping.resolve(&CanonicalName::new("alberta avenue")),
            Some(&CanonicalName::new("HIGHLANDS/ALBERTA AVENUE"))
        );
    }

    #[test]
    fn rejects_non_flat_json() {
        let result = ZoneMapping::from_json_str(r#"{ "DOWNTOWN": { "zone": "DOWNTOWN" } }"#);
        assert!(result.is_err());
    }

    #[test]
    fn round_trips_with_sorted_keys() {
        let mapping: ZoneMapping = [
            (CanonicalName::new("ZETA"), CanonicalName::new("EDMONTON")),
            (CanonicalName::new("ALPHA"), CanonicalName::new("EDMONTON")),
        ]
        .into_iter()
        .collect();

        let json = mapping.to_json_string().unwrap();
        assert!(json.find("ALPHA").unwrap() < json.find("ZETA").unwrap());
        assert_eq!(ZoneMapping::from_json_str(&json).unwrap(), mapping);
    }

    #[test]
    fn resolve_misses_for_unknown_name() {
        let mapping = ZoneMapping::default();
        assert!(mapping.resolve(&CanonicalName::new("NOWHERE")).is_none());
    }
}
