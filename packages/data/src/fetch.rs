//! Dataset transport implementations.
//!
//! The transport is an external collaborator to the core: the store
//! only needs something that can produce a raw JSON payload per
//! dataset kind. [`HttpFetcher`] pulls the well-known file names from a
//! base URL; [`FileFetcher`] reads them from a local data directory.

use std::path::PathBuf;

use async_trait::async_trait;
use rental_map_data_models::DatasetKind;

use crate::DataLoadError;

/// Produces the raw JSON payload for a dataset.
#[async_trait]
pub trait DatasetFetcher: Send + Sync {
    /// Fetches the raw payload for `kind`.
    ///
    /// # Errors
    ///
    /// Returns [`DataLoadError::Fetch`] if the transport fails and
    /// [`DataLoadError::Shape`] if the response is not valid JSON.
    async fn fetch(&self, kind: DatasetKind) -> Result<serde_json::Value, DataLoadError>;
}

/// Fetches dataset files over HTTP from a base URL.
pub struct HttpFetcher {
    client: reqwest::Client,
    base_url: String,
}

impl HttpFetcher {
    /// Creates a fetcher for `{base_url}/{file_name}` requests.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }
}

#[async_trait]
impl DatasetFetcher for HttpFetcher {
    async fn fetch(&self, kind: DatasetKind) -> Result<serde_json::Value, DataLoadError> {
        let url = format!("{}/{}", self.base_url, kind.file_name());

        let resp = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| DataLoadError::Fetch {
                dataset: kind,
                message: e.to_string(),
            })?;

        if !resp.status().is_success() {
            return Err(DataLoadError::Fetch {
                dataset: kind,
                message: format!("{url} returned status {}", resp.status()),
            });
        }

        let body = resp.text().await.map_err(|e| DataLoadError::Fetch {
            dataset: kind,
            message: e.to_string(),
        })?;

        serde_json::from_str(&body).map_err(|e| DataLoadError::Shape {
            dataset: kind,
            message: format!("response is not valid JSON: {e}"),
        })
    }
}

/// Reads dataset files from a local data directory.
pub struct FileFetcher {
    dir: PathBuf,
}

impl FileFetcher {
    /// Creates a fetcher reading `{dir}/{file_name}`.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl DatasetFetcher for FileFetcher {
    async fn fetch(&self, kind: DatasetKind) -> Result<serde_json::Value, DataLoadError> {
        let path = self.dir.join(kind.file_name());

        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|e| DataLoadError::Fetch {
                dataset: kind,
                message: format!("{}: {e}", path.display()),
            })?;

        serde_json::from_slice(&bytes).map_err(|e| DataLoadError::Shape {
            dataset: kind,
            message: format!("{} is not valid JSON: {e}", path.display()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_fetcher_trims_trailing_slash() {
        let fetcher = HttpFetcher::new("https://example.test/data/");
        assert_eq!(fetcher.base_url, "https://example.test/data");
    }

    #[tokio::test]
    async fn file_fetcher_reports_missing_file_as_fetch_error() {
        let fetcher = FileFetcher::new("/nonexistent-data-dir");
        let err = fetcher.fetch(DatasetKind::Crime).await.unwrap_err();
        assert!(matches!(
            err,
            DataLoadError::Fetch {
                dataset: DatasetKind::Crime,
                ..
            }
        ));
    }
}
