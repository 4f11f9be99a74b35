//! Movie Service Library
//!
//! HTTP service storing movie records (title, year, language).
//! It can be run as a standalone service or embedded in the combined binary.

pub mod config;
pub mod handlers;
pub mod infra;
pub mod repository;
pub mod routes;
pub mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use tracing::info;

use common::shutdown_signal;

use crate::config::MovieServiceConfig;
use crate::infra::open_database;
use crate::repository::MovieStore;
use crate::routes::create_router;
use crate::state::AppState;

/// Boxed error returned by the server entry points
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Run the movie service on `host:port` (standalone or in the combined binary).
pub async fn run_embedded(host: &str, port: u16) -> Result<(), BoxError> {
    let config = MovieServiceConfig::from_env().with_address(host, port);
    run_server_with_config(config).await
}

/// Run the HTTP server with the given configuration.
///
/// The store connection is opened before binding and closed after the
/// server has drained on shutdown.
pub async fn run_server_with_config(config: MovieServiceConfig) -> Result<(), BoxError> {
    // Initialize database
    let db = open_database(&config.database).await?;

    // Create repository and state
    let movies = Arc::new(MovieStore::new(db.get_connection()));
    let state = AppState::new(movies);

    // Build router
    let app = create_router(state);

    // Build address
    let addr: SocketAddr = config.service.bind_address().parse()?;
    info!("Movie service listening on {}", addr);

    // Run server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.close().await?;
    info!("Movie service stopped");

    Ok(())
}
