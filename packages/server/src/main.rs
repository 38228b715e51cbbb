#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Standalone server binary, configured from environment variables.
//!
//! `DATA_DIR` (default `data`) selects the local dataset directory;
//! `BASE_URL` switches to fetching the datasets over HTTP instead.
//! `MAPPING_PATH` overrides the zone mapping artifact location.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use rental_map_data::{DataStore, DatasetFetcher, FileFetcher, HttpFetcher};
use rental_map_server::{ServerConfig, run_server};
use rental_map_zones::ZoneMapping;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    let data_dir = PathBuf::from(std::env::var("DATA_DIR").unwrap_or_else(|_| "data".to_string()));
    let base_url = std::env::var("BASE_URL").ok();

    let mapping_path = std::env::var("MAPPING_PATH").map_or_else(
        |_| data_dir.join("neighbourhood-to-rent-zone.json"),
        PathBuf::from,
    );
    log::info!("Loading zone mapping from {}", mapping_path.display());
    let mapping = ZoneMapping::load(Path::new(&mapping_path))
        .expect("Failed to load zone mapping artifact");

    let (fetcher, serve_data_dir): (Arc<dyn DatasetFetcher>, Option<PathBuf>) = match base_url {
        Some(url) => {
            log::info!("Fetching datasets from {url}");
            (Arc::new(HttpFetcher::new(url)), None)
        }
        None => {
            log::info!("Reading datasets from {}", data_dir.display());
            (
                Arc::new(FileFetcher::new(data_dir.clone())),
                Some(data_dir),
            )
        }
    };

    let store = Arc::new(DataStore::new(fetcher, mapping));

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    run_server(
        store,
        ServerConfig {
            bind_addr,
            port,
            serve_data_dir,
        },
    )
    .await
}
