//! Configurable district-to-zone heuristic table.
//!
//! The table is embedded TOML rather than code so the approximate
//! fallbacks can be corrected without touching the generator. Follows
//! the same embed-and-parse pattern as the data source registries.

use rental_map_data_models::CanonicalName;
use serde::Deserialize;

use crate::ZoneMappingError;

/// Embedded heuristic table.
const DISTRICTS_TOML: &str = include_str!("../heuristics/districts.toml");

/// Number of district rules in the embedded table. Enforced by a test.
#[cfg(test)]
const EXPECTED_DISTRICT_COUNT: usize = 8;

/// District-to-zone fallback rules plus the citywide fallback zone.
#[derive(Debug, Clone, Deserialize)]
pub struct DistrictHeuristics {
    /// Zone assigned when no rule matches (the citywide aggregate).
    fallback_zone: CanonicalName,
    /// Ordered district rules.
    districts: Vec<DistrictRule>,
}

/// A single district-to-zone rule.
#[derive(Debug, Clone, Deserialize)]
struct DistrictRule {
    /// Canonical district name from the boundary dataset.
    district: CanonicalName,
    /// Zone neighbourhoods in this district inherit.
    zone: CanonicalName,
}

impl DistrictHeuristics {
    /// Returns the embedded heuristic table.
    ///
    /// # Panics
    ///
    /// Panics if the embedded TOML fails to parse. Since it is a
    /// compile-time constant, parse failures indicate a development
    /// error and are caught by tests.
    #[must_use]
    pub fn embedded() -> Self {
        Self::from_toml_str(DISTRICTS_TOML)
            .unwrap_or_else(|e| panic!("Failed to parse embedded district heuristics: {e}"))
    }

    /// Parses a heuristic table from TOML.
    ///
    /// # Errors
    ///
    /// Returns [`ZoneMappingError::Toml`] if the content does not match
    /// the table schema.
    pub fn from_toml_str(content: &str) -> Result<Self, ZoneMappingError> {
        Ok(toml::de::from_str(content)?)
    }

    /// Looks up the zone for a district, `None` when no rule matches.
    #[must_use]
    pub fn zone_for_district(&self, district: &CanonicalName) -> Option<&CanonicalName> {
        self.districts
            .iter()
            .find(|rule| rule.district == *district)
            .map(|rule| &rule.zone)
    }

    /// The citywide fallback zone.
    #[must_use]
    pub const fn fallback_zone(&self) -> &CanonicalName {
        &self.fallback_zone
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn embedded_table_parses() {
        let heuristics = DistrictHeuristics::embedded();
        assert_eq!(
            heuristics.districts.len(),
            EXPECTED_DISTRICT_COUNT,
            "Expected {EXPECTED_DISTRICT_COUNT} district rules, found {}. \
             Update EXPECTED_DISTRICT_COUNT after editing districts.toml.",
            heuristics.districts.len()
        );
        assert_eq!(heuristics.fallback_zone().as_str(), "EDMONTON");
    }

    #[test]
    fn district_names_are_unique_and_canonical() {
        let heuristics = DistrictHeuristics::embedded();
        let mut seen = BTreeSet::new();
        for rule in &heuristics.districts {
            assert!(
                seen.insert(rule.district.clone()),
                "Duplicate district rule: {}",
                rule.district
            );
            assert_eq!(
                rule.district.as_str(),
                rule.district.as_str().trim().to_uppercase(),
                "District {} is not canonical",
                rule.district
            );
        }
    }

    #[test]
    fn known_district_resolves() {
        let heuristics = DistrictHeuristics::embedded();
        assert_eq!(
            heuristics.zone_for_district(&CanonicalName::new("Jasper Place")),
            Some(&CanonicalName::new("WEST JASPER PLACE/RURAL"))
        );
        assert!(
            heuristics
                .zone_for_district(&CanonicalName::new("NO SUCH DISTRICT"))
                .is_none()
        );
    }
}
