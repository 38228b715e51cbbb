//! Deterministic generator for the neighbourhood-to-rent-zone artifact.
//!
//! Resolution priority per neighbourhood, highest first:
//!
//! 1. the name exactly equals a rent zone name;
//! 2. some zone name contains the name as a substring (e.g. zone
//!    `HIGHLANDS/ALBERTA AVENUE` contains `ALBERTA AVENUE`);
//! 3. a district rule from the configurable heuristic table;
//! 4. the citywide fallback zone.
//!
//! The reverse direction (neighbourhood name containing a zone name) is
//! deliberately not matched; it produces false positives like `WEST
//! JASPER PLACE` swallowing `JASPER PLACE`.

use std::collections::HashSet;

use rental_map_data_models::{BoundaryCollection, CanonicalName};

use crate::{DistrictHeuristics, ZoneMapping};

/// Generates the mapping from boundary features and the ordered rent
/// zone list.
///
/// Total over the boundary collection: every feature's canonical name
/// receives exactly one zone. Substring matches take the first
/// containing zone in `rent_zones` order, so identical inputs always
/// produce an identical artifact.
#[must_use]
pub fn generate_mapping(
    boundaries: &BoundaryCollection,
    rent_zones: &[CanonicalName],
    heuristics: &DistrictHeuristics,
) -> ZoneMapping {
    let zone_set: HashSet<&CanonicalName> = rent_zones.iter().collect();

    let mut mapping = ZoneMapping::default();
    for feature in &boundaries.features {
        let name = feature.properties.canonical_name();
        let district = feature
            .properties
            .district
            .as_deref()
            .map(CanonicalName::new);

        let zone = resolve_zone(&name, district.as_ref(), rent_zones, &zone_set, heuristics);
        mapping.insert(name, zone);
    }

    log::info!("Generated mapping for {} neighbourhoods", mapping.len());
    mapping
}

fn resolve_zone(
    name: &CanonicalName,
    district: Option<&CanonicalName>,
    rent_zones: &[CanonicalName],
    zone_set: &HashSet<&CanonicalName>,
    heuristics: &DistrictHeuristics,
) -> CanonicalName {
    if zone_set.contains(name) {
        return name.clone();
    }

    if let Some(zone) = rent_zones
        .iter()
        .find(|zone| zone.as_str().contains(name.as_str()))
    {
        return zone.clone();
    }

    district
        .and_then(|d| heuristics.zone_for_district(d))
        .unwrap_or_else(|| heuristics.fallback_zone())
        .clone()
}
