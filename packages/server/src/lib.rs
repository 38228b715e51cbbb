#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the rental-map dashboard.
//!
//! Serves the joined per-neighbourhood views and quartile maps for the
//! map frontend, plus the raw dataset files via `actix-files` when
//! running against a local data directory. Handlers trigger the
//! dataset load lazily; the store's single-flight semantics make this
//! free after the first request, and a failed load stays retryable on
//! the next request.

pub mod handlers;

use std::path::PathBuf;
use std::sync::Arc;

use actix_cors::Cors;
use actix_files::Files;
use actix_web::{App, HttpServer, middleware, web};
use rental_map_data::DataStore;

/// Shared application state.
pub struct AppState {
    /// The session-wide dataset store.
    pub store: Arc<DataStore>,
}

/// Server configuration, resolved by the binary from environment or
/// CLI arguments.
pub struct ServerConfig {
    /// Address to bind.
    pub bind_addr: String,
    /// Port to bind.
    pub port: u16,
    /// When set, serve this directory's raw dataset files at `/data`.
    pub serve_data_dir: Option<PathBuf>,
}

/// Registers the API routes. Split out so handler tests can build the
/// same app without binding a socket.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(handlers::health))
            .route("/neighbourhoods", web::get().to(handlers::neighbourhoods))
            .route(
                "/neighbourhoods/{name}",
                web::get().to(handlers::neighbourhood),
            )
            .route(
                "/quartiles/{metric}",
                web::get().to(handlers::quartiles_for_metric),
            ),
    );
}

/// Starts the rental-map API server.
///
/// Kicks off a background dataset load so the first real request
/// usually hits a warm cache, then serves until shutdown. This is a
/// regular async function -- the caller provides the async runtime
/// (e.g. via `#[actix_web::main]`).
///
/// # Errors
///
/// Returns an `std::io::Result` error if the HTTP server fails to bind
/// or encounters a runtime error.
#[allow(clippy::future_not_send)]
pub async fn run_server(store: Arc<DataStore>, config: ServerConfig) -> std::io::Result<()> {
    {
        let store = Arc::clone(&store);
        actix_web::rt::spawn(async move {
            if let Err(e) = store.load_all().await {
                log::warn!("Initial dataset load failed (will retry per request): {e}");
            }
        });
    }

    let state = web::Data::new(AppState { store });
    let serve_data_dir = config.serve_data_dir.clone();

    log::info!("Starting server on {}:{}", config.bind_addr, config.port);

    HttpServer::new(move || {
        let cors = Cors::permissive();

        let app = App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .configure(configure_api);

        // Serve raw dataset files for the map frontend when running
        // against a local data directory.
        if let Some(dir) = &serve_data_dir {
            app.service(Files::new("/data", dir))
        } else {
            app
        }
    })
    .bind((config.bind_addr.clone(), config.port))?
    .run()
    .await
}
