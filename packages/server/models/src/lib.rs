#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API response types for the rental-map server.
//!
//! These types are serialized to JSON for the REST API. They are
//! separate from the dataset record types to allow independent
//! evolution of the API contract -- except for the rent lookup, whose
//! `_inheritedFrom` provenance marker is part of the data contract and
//! passes through unchanged.

use rental_map_data_models::{CanonicalName, CrimeRecord, RentLookup};
use rental_map_quartiles::QuartileRanking;
use serde::Serialize;

/// `GET /api/health` response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the server is up.
    pub healthy: bool,
    /// Crate version.
    pub version: String,
    /// Whether the dataset load has completed.
    pub data_loaded: bool,
}

/// Joined per-neighbourhood view returned by
/// `GET /api/neighbourhoods/{name}`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NeighbourhoodSummary {
    /// Canonical neighbourhood name.
    pub name: CanonicalName,
    /// Crime record, absent when the source does not report this
    /// neighbourhood.
    pub crime: Option<CrimeRecord>,
    /// Rent figures, direct or zone-inherited (see `_inheritedFrom`).
    pub rent: Option<RentLookup>,
    /// Number of attribute-matched school features.
    pub school_count: usize,
    /// Number of attribute-matched park features.
    pub park_count: usize,
    /// Quartile rankings for each metric, absent when no ranking is
    /// available.
    pub quartiles: QuartileSummary,
}

/// Per-metric quartile rankings for one neighbourhood.
#[derive(Debug, Clone, Default, Serialize)]
pub struct QuartileSummary {
    /// Crime safety ranking.
    pub crime: Option<QuartileRanking>,
    /// School access ranking.
    pub schools: Option<QuartileRanking>,
    /// Park access ranking.
    pub parks: Option<QuartileRanking>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_uses_camel_case_and_keeps_contract_marker() {
        let summary = NeighbourhoodSummary {
            name: CanonicalName::new("Crestwood"),
            crime: None,
            rent: None,
            school_count: 2,
            park_count: 0,
            quartiles: QuartileSummary::default(),
        };

        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["name"], "CRESTWOOD");
        assert_eq!(json["schoolCount"], 2);
        assert!(json.get("school_count").is_none());
    }
}
