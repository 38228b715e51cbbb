#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Dataset loading, caching, indexing, and name-based joins.
//!
//! The [`DataStore`] fetches the five municipal datasets exactly once
//! per session, validates their shapes, and builds canonical-name
//! indices for O(1) lookup. Concurrent load requests before the first
//! one resolves are coalesced into a single underlying fetch
//! (single-flight); a failed load resets the store so the next call
//! retries cleanly. Once loaded, the datasets are immutable for the
//! rest of the session and every accessor is synchronous.

pub mod fetch;
pub mod store;

use rental_map_data_models::DatasetKind;
use thiserror::Error;

pub use fetch::{DatasetFetcher, FileFetcher, HttpFetcher};
pub use store::{DataStore, Datasets};

/// Errors that fail a whole load attempt.
///
/// Cloneable because every caller coalesced into one in-flight load
/// receives the same rejection. Per-neighbourhood absence is never an
/// error; accessors model it as `None`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataLoadError {
    /// The underlying fetch for one dataset failed.
    #[error("Failed to fetch {dataset} dataset: {message}")]
    Fetch {
        /// Which dataset failed.
        dataset: DatasetKind,
        /// Transport-level failure description.
        message: String,
    },

    /// A fetched payload did not match the expected shape for its
    /// dataset kind (e.g. the designated top-level key is missing).
    #[error("{dataset} payload failed shape validation: {message}")]
    Shape {
        /// Which dataset failed validation.
        dataset: DatasetKind,
        /// Schema violation description.
        message: String,
    },
}
