//! Per-metric quartile map builders.
//!
//! Each builder produces one numeric value per neighbourhood, computes
//! thresholds over the full value set, and assigns every neighbourhood
//! a tier with its descriptor bundle. Tier information is supplementary
//! to the rest of the system, so malformed or empty inputs degrade to
//! an empty map with a warning instead of an error -- callers treat a
//! missing entry as "no ranking available", never as a worst-case
//! default.

use std::collections::HashMap;

use rental_map_data_models::{BoundaryCollection, CanonicalName, CrimeRecord, PointCollection};

use crate::{Metric, QuartileRanking, assign_tier, quartile_thresholds};

/// A canonical-name keyed quartile ranking map for one metric.
pub type QuartileMap = HashMap<CanonicalName, QuartileRanking>;

/// Builds the crime quartile map from reported incident totals.
///
/// Neighbourhoods absent from the crime source receive no entry;
/// absence of crime *data* is not a zero-incident claim.
#[must_use]
pub fn crime_quartiles(crime: &[CrimeRecord]) -> QuartileMap {
    if crime.is_empty() {
        log::warn!("Crime data not available for quartile calculation");
        return QuartileMap::new();
    }

    let values: Vec<f64> = crime
        .iter()
        .map(|record| f64::from(record.violent_weapons_crimes_total_2025))
        .collect();
    let quartiles = quartile_thresholds(&values);

    let map: QuartileMap = crime
        .iter()
        .map(|record| {
            let value = f64::from(record.violent_weapons_crimes_total_2025);
            let tier = assign_tier(value, &quartiles, Metric::Crime.orientation());
            (
                record.canonical_name(),
                QuartileRanking::new(Metric::Crime, tier, value),
            )
        })
        .collect();

    log::debug!("Crime quartiles calculated for {} neighbourhoods", map.len());
    map
}

/// Builds the schools quartile map from attribute-matched feature
/// counts per boundary feature.
#[must_use]
pub fn schools_quartiles(
    schools: &PointCollection,
    neighbourhoods: &BoundaryCollection,
) -> QuartileMap {
    count_quartiles(Metric::Schools, schools, neighbourhoods)
}

/// Builds the parks quartile map from attribute-matched feature counts
/// per boundary feature.
#[must_use]
pub fn parks_quartiles(parks: &PointCollection, neighbourhoods: &BoundaryCollection) -> QuartileMap {
    count_quartiles(Metric::Parks, parks, neighbourhoods)
}

/// Shared count-based builder for schools and parks.
///
/// Every boundary neighbourhood receives an entry; a neighbourhood
/// with no matching features has a real zero-count entry (absence of
/// *matches*, unlike absence of crime data).
fn count_quartiles(
    metric: Metric,
    points: &PointCollection,
    neighbourhoods: &BoundaryCollection,
) -> QuartileMap {
    if neighbourhoods.features.is_empty() {
        log::warn!("Neighbourhood boundaries not available for {metric} quartile calculation");
        return QuartileMap::new();
    }

    // Count features per canonical neighbourhood name in one pass, then
    // resolve each boundary against the counts.
    let mut features_by_name: HashMap<CanonicalName, u32> = HashMap::new();
    for feature in &points.features {
        if let Some(name) = feature.properties.neighbourhood_name.as_deref() {
            *features_by_name.entry(CanonicalName::new(name)).or_default() += 1;
        }
    }

    let counts: Vec<(CanonicalName, f64)> = neighbourhoods
        .features
        .iter()
        .map(|feature| {
            let name = feature.properties.canonical_name();
            let count = features_by_name.get(&name).copied().unwrap_or(0);
            (name, f64::from(count))
        })
        .collect();

    let values: Vec<f64> = counts.iter().map(|(_, count)| *count).collect();
    let quartiles = quartile_thresholds(&values);

    let map: QuartileMap = counts
        .into_iter()
        .map(|(name, value)| {
            let tier = assign_tier(value, &quartiles, metric.orientation());
            (name, QuartileRanking::new(metric, tier, value))
        })
        .collect();

    log::debug!("{metric} quartiles calculated for {} neighbourhoods", map.len());
    map
}
