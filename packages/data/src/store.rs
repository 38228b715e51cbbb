//! The load/cache/index layer and its name-based join accessors.
//!
//! Lifecycle: `uninitialized -> loading -> ready`, or `uninitialized ->
//! loading -> failed -> uninitialized`. The loaded snapshot is
//! write-once; accessors only ever see a fully validated, fully
//! indexed dataset set, never a partial one.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use rental_map_data_models::{
    BoundaryCollection, BoundaryProperties, CanonicalName, CrimePayload, CrimeRecord,
    DatasetKind, Feature, PointCollection, PointProperties, RentLookup, RentPayload, RentRecord,
};
use rental_map_zones::ZoneMapping;
use serde::de::DeserializeOwned;

use crate::{DataLoadError, DatasetFetcher};

type LoadFuture = Shared<BoxFuture<'static, Result<Arc<Datasets>, DataLoadError>>>;

/// Load state machine. `Loading` holds the shared in-flight future
/// every concurrent caller awaits.
enum LoadState {
    Uninitialized,
    Loading(LoadFuture),
    Ready(Arc<Datasets>),
}

/// The session-wide dataset store.
///
/// Constructed once at process start and passed by reference to
/// consumers; there is no implicit module-level state.
pub struct DataStore {
    fetcher: Arc<dyn DatasetFetcher>,
    zone_mapping: ZoneMapping,
    state: Mutex<LoadState>,
}

impl DataStore {
    /// Creates an unloaded store over the given transport and zone
    /// mapping artifact.
    #[must_use]
    pub fn new(fetcher: Arc<dyn DatasetFetcher>, zone_mapping: ZoneMapping) -> Self {
        Self {
            fetcher,
            zone_mapping,
            state: Mutex::new(LoadState::Uninitialized),
        }
    }

    /// Loads all five datasets, coalescing concurrent callers onto one
    /// underlying fetch (single-flight) and serving from memory once
    /// loaded.
    ///
    /// # Errors
    ///
    /// Returns [`DataLoadError`] if any fetch or shape validation
    /// fails. Every caller awaiting the same in-flight load receives
    /// the same error, and the store resets to uninitialized so a
    /// subsequent call retries from scratch.
    ///
    /// # Panics
    ///
    /// Panics if the internal state mutex is poisoned.
    pub async fn load_all(&self) -> Result<Arc<Datasets>, DataLoadError> {
        let fut = {
            let mut state = self.state.lock().expect("DataStore state mutex poisoned");
            match &*state {
                LoadState::Ready(datasets) => return Ok(Arc::clone(datasets)),
                LoadState::Loading(fut) => fut.clone(),
                LoadState::Uninitialized => {
                    let fetcher = Arc::clone(&self.fetcher);
                    let zone_mapping = self.zone_mapping.clone();
                    let fut: LoadFuture =
                        fetch_and_validate(fetcher, zone_mapping).boxed().shared();
                    *state = LoadState::Loading(fut.clone());
                    fut
                }
            }
        };

        let result = fut.clone().await;

        // Settle the state machine. Every coalesced caller runs this,
        // so guard on the future identity: a failed load may already
        // have been reset (and a fresh load started) by another caller.
        let mut state = self.state.lock().expect("DataStore state mutex poisoned");
        if let LoadState::Loading(current) = &*state {
            if current.ptr_eq(&fut) {
                *state = match &result {
                    Ok(datasets) => LoadState::Ready(Arc::clone(datasets)),
                    Err(_) => LoadState::Uninitialized,
                };
            }
        }

        result
    }

    /// Whether a load has completed successfully. Synchronous and
    /// side-effect-free, for consumers that cannot await.
    ///
    /// # Panics
    ///
    /// Panics if the internal state mutex is poisoned.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        matches!(
            &*self.state.lock().expect("DataStore state mutex poisoned"),
            LoadState::Ready(_)
        )
    }

    /// The loaded snapshot, `None` until a load completes.
    ///
    /// # Panics
    ///
    /// Panics if the internal state mutex is poisoned.
    #[must_use]
    pub fn datasets(&self) -> Option<Arc<Datasets>> {
        match &*self.state.lock().expect("DataStore state mutex poisoned") {
            LoadState::Ready(datasets) => Some(Arc::clone(datasets)),
            _ => None,
        }
    }
}

/// Fetches and validates all five datasets, then builds the indexed
/// snapshot. Any failure aborts the whole attempt; no index is built
/// from a partially validated set.
async fn fetch_and_validate(
    fetcher: Arc<dyn DatasetFetcher>,
    zone_mapping: ZoneMapping,
) -> Result<Arc<Datasets>, DataLoadError> {
    let (crime_raw, rent_raw, schools_raw, parks_raw, neighbourhoods_raw) = futures::try_join!(
        fetcher.fetch(DatasetKind::Crime),
        fetcher.fetch(DatasetKind::Rent),
        fetcher.fetch(DatasetKind::Schools),
        fetcher.fetch(DatasetKind::Parks),
        fetcher.fetch(DatasetKind::Neighbourhoods),
    )?;

    let crime: CrimePayload = validate(DatasetKind::Crime, crime_raw)?;
    let rent: RentPayload = validate(DatasetKind::Rent, rent_raw)?;
    let schools: PointCollection = validate(DatasetKind::Schools, schools_raw)?;
    let parks: PointCollection = validate(DatasetKind::Parks, parks_raw)?;
    let neighbourhoods: BoundaryCollection =
        validate(DatasetKind::Neighbourhoods, neighbourhoods_raw)?;

    let datasets = Datasets::build(
        crime.crime_by_neighbourhood,
        rent.rent_by_neighbourhood,
        schools,
        parks,
        neighbourhoods,
        zone_mapping,
    );

    log::info!(
        "Loaded datasets: {} crime records, {} rent zones, {} schools, {} parks, {} neighbourhoods",
        datasets.crime_records().len(),
        datasets.rent_records().len(),
        datasets.schools().features.len(),
        datasets.parks().features.len(),
        datasets.neighbourhoods().features.len(),
    );

    Ok(Arc::new(datasets))
}

fn validate<T: DeserializeOwned>(
    kind: DatasetKind,
    raw: serde_json::Value,
) -> Result<T, DataLoadError> {
    serde_json::from_value(raw).map_err(|e| DataLoadError::Shape {
        dataset: kind,
        message: format!("expected `{}` payload: {e}", kind.top_level_key()),
    })
}

/// The validated, indexed, immutable dataset snapshot.
///
/// Also the join engine: accessors resolve a neighbourhood name to its
/// crime record, rent record (direct or zone-inherited), park/school
/// features, and boundary feature. Lookup misses are `None`, never
/// errors.
#[derive(Debug)]
pub struct Datasets {
    crime: Vec<CrimeRecord>,
    rent: Vec<RentRecord>,
    schools: PointCollection,
    parks: PointCollection,
    neighbourhoods: BoundaryCollection,
    zone_mapping: ZoneMapping,
    crime_index: HashMap<CanonicalName, usize>,
    rent_index: HashMap<CanonicalName, usize>,
    boundary_index: HashMap<CanonicalName, usize>,
}

impl Datasets {
    /// Builds the canonical-name indices in linear time over each
    /// dataset.
    fn build(
        crime: Vec<CrimeRecord>,
        rent: Vec<RentRecord>,
        schools: PointCollection,
        parks: PointCollection,
        neighbourhoods: BoundaryCollection,
        zone_mapping: ZoneMapping,
    ) -> Self {
        let crime_index = crime
            .iter()
            .enumerate()
            .map(|(i, record)| (record.canonical_name(), i))
            .collect();
        let rent_index = rent
            .iter()
            .enumerate()
            .map(|(i, record)| (record.canonical_name(), i))
            .collect();
        let boundary_index = neighbourhoods
            .features
            .iter()
            .enumerate()
            .map(|(i, feature)| (feature.properties.canonical_name(), i))
            .collect();

        Self {
            crime,
            rent,
            schools,
            parks,
            neighbourhoods,
            zone_mapping,
            crime_index,
            rent_index,
            boundary_index,
        }
    }

    /// Crime record for a neighbourhood, `None` when the source does
    /// not report it.
    #[must_use]
    pub fn crime_by_neighbourhood(&self, name: &str) -> Option<&CrimeRecord> {
        let key = CanonicalName::new(name);
        self.crime_index.get(&key).map(|&i| &self.crime[i])
    }

    /// Rent figures for a neighbourhood.
    ///
    /// Looks the name up directly in the rent index first; when
    /// absent, resolves it through the zone mapping and returns the
    /// zone's record marked with its provenance. `None` when even the
    /// mapped zone has no record -- rent is never defaulted to zero.
    #[must_use]
    pub fn rent_by_neighbourhood(&self, name: &str) -> Option<RentLookup> {
        let key = CanonicalName::new(name);

        if let Some(&i) = self.rent_index.get(&key) {
            return Some(RentLookup {
                record: self.rent[i].clone(),
                inherited_from: None,
            });
        }

        let zone = self.zone_mapping.resolve(&key)?;
        let &i = self.rent_index.get(zone)?;
        Some(RentLookup {
            record: self.rent[i].clone(),
            inherited_from: Some(zone.clone()),
        })
    }

    /// School features whose `neighbourhood_name` attribute matches.
    #[must_use]
    pub fn schools_in(&self, name: &str) -> Vec<&Feature<PointProperties>> {
        Self::features_in(&self.schools, name)
    }

    /// Park features whose `neighbourhood_name` attribute matches.
    #[must_use]
    pub fn parks_in(&self, name: &str) -> Vec<&Feature<PointProperties>> {
        Self::features_in(&self.parks, name)
    }

    fn features_in<'a>(
        collection: &'a PointCollection,
        name: &str,
    ) -> Vec<&'a Feature<PointProperties>> {
        let key = CanonicalName::new(name);
        collection
            .features
            .iter()
            .filter(|feature| feature.properties.in_neighbourhood(&key))
            .collect()
    }

    /// Boundary feature for a neighbourhood name.
    #[must_use]
    pub fn neighbourhood_by_name(&self, name: &str) -> Option<&Feature<BoundaryProperties>> {
        let key = CanonicalName::new(name);
        self.boundary_index
            .get(&key)
            .map(|&i| &self.neighbourhoods.features[i])
    }

    /// All boundary neighbourhood names, canonical and sorted.
    #[must_use]
    pub fn neighbourhood_names(&self) -> Vec<CanonicalName> {
        let mut names: Vec<CanonicalName> = self.boundary_index.keys().cloned().collect();
        names.sort();
        names
    }

    /// The raw crime records, for quartile builders.
    #[must_use]
    pub fn crime_records(&self) -> &[CrimeRecord] {
        &self.crime
    }

    /// The raw rent records.
    #[must_use]
    pub fn rent_records(&self) -> &[RentRecord] {
        &self.rent
    }

    /// The school feature collection.
    #[must_use]
    pub const fn schools(&self) -> &PointCollection {
        &self.schools
    }

    /// The park feature collection.
    #[must_use]
    pub const fn parks(&self) -> &PointCollection {
        &self.parks
    }

    /// The neighbourhood boundary collection.
    #[must_use]
    pub const fn neighbourhoods(&self) -> &BoundaryCollection {
        &self.neighbourhoods
    }
}
