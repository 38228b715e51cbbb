#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line entry point for the rental-map toolchain.
//!
//! `serve` starts the API server against a local data directory or a
//! remote base URL. `generate-mapping` regenerates the static
//! neighbourhood-to-rent-zone artifact from the boundary and rent
//! datasets; run it whenever either input file changes.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use rental_map_data::{DataStore, DatasetFetcher, FileFetcher, HttpFetcher};
use rental_map_data_models::{BoundaryCollection, CanonicalName, RentPayload, RentRecord};
use rental_map_server::{ServerConfig, run_server};
use rental_map_zones::{DistrictHeuristics, ZoneMapping, generate_mapping};

#[derive(Parser)]
#[command(name = "rental-map", about = "Edmonton rental dashboard data toolchain")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server
    Serve {
        /// Address to bind
        #[arg(long, default_value = "127.0.0.1")]
        bind: String,
        /// Port to bind
        #[arg(long, default_value_t = 8080)]
        port: u16,
        /// Local directory holding the dataset files
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,
        /// Fetch datasets from this base URL instead of `--data-dir`
        #[arg(long)]
        base_url: Option<String>,
        /// Zone mapping artifact (default: `<data-dir>/neighbourhood-to-rent-zone.json`)
        #[arg(long)]
        mapping: Option<PathBuf>,
    },
    /// Regenerate the neighbourhood-to-rent-zone mapping artifact
    GenerateMapping {
        /// Neighbourhood boundary GeoJSON file
        #[arg(long)]
        boundaries: PathBuf,
        /// Processed rent dataset JSON file
        #[arg(long)]
        rent: PathBuf,
        /// Output path for the mapping artifact
        #[arg(long)]
        output: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    let cli = Cli::parse();
    match cli.command {
        Commands::Serve {
            bind,
            port,
            data_dir,
            base_url,
            mapping,
        } => serve(bind, port, data_dir, base_url, mapping).await?,
        Commands::GenerateMapping {
            boundaries,
            rent,
            output,
        } => generate(&boundaries, &rent, &output)?,
    }

    Ok(())
}

async fn serve(
    bind: String,
    port: u16,
    data_dir: PathBuf,
    base_url: Option<String>,
    mapping: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mapping_path =
        mapping.unwrap_or_else(|| data_dir.join("neighbourhood-to-rent-zone.json"));
    let zone_mapping = ZoneMapping::load(&mapping_path)?;
    log::info!(
        "Loaded zone mapping with {} entries from {}",
        zone_mapping.len(),
        mapping_path.display()
    );

    let (fetcher, serve_data_dir): (Arc<dyn DatasetFetcher>, Option<PathBuf>) = match base_url {
        Some(url) => (Arc::new(HttpFetcher::new(url)), None),
        None => (
            Arc::new(FileFetcher::new(data_dir.clone())),
            Some(data_dir),
        ),
    };
    let store = Arc::new(DataStore::new(fetcher, zone_mapping));

    let config = ServerConfig {
        bind_addr: bind,
        port,
        serve_data_dir,
    };

    // The server uses actix-web's runtime, so run it in a blocking
    // task to avoid nesting tokio runtimes.
    tokio::task::spawn_blocking(move || {
        actix_web::rt::System::new().block_on(run_server(store, config))
    })
    .await??;

    Ok(())
}

fn generate(
    boundaries_path: &std::path::Path,
    rent_path: &std::path::Path,
    output_path: &std::path::Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let boundaries: BoundaryCollection =
        serde_json::from_str(&std::fs::read_to_string(boundaries_path)?)?;
    let rent: RentPayload = serde_json::from_str(&std::fs::read_to_string(rent_path)?)?;

    let rent_zones: Vec<CanonicalName> = rent
        .rent_by_neighbourhood
        .iter()
        .map(RentRecord::canonical_name)
        .collect();

    let mapping = generate_mapping(&boundaries, &rent_zones, &DistrictHeuristics::embedded());
    std::fs::write(output_path, mapping.to_json_string()?)?;

    log::info!(
        "Wrote mapping for {} neighbourhoods to {}",
        mapping.len(),
        output_path.display()
    );
    Ok(())
}
