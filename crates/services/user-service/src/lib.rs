//! User Service Library
//!
//! HTTP service storing user records (name, age, email, optional phone
//! number). Runs standalone or inside the combined binary.

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

use crate::config::UserServiceConfig;
use crate::infra::open_database;
use crate::repository::UserStore;
use crate::routes::create_router;
use crate::state::AppState;

/// Boxed error returned by the server entry points
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Run the user service on `host:port`.
pub async fn run_embedded(host: &str, port: u16) -> Result<(), BoxError> {
    let config = UserServiceConfig::from_env().with_address(host, port);
    run_server_with_config(config).await
}

/// Run the HTTP server with the given configuration.
pub async fn run_server_with_config(config: UserServiceConfig) -> Result<(), BoxError> {
    let db = open_database(&config.database).await?;

    let users = Arc::new(UserStore::new(db.get_connection()));
    let state = AppState::new(users, config.filter_mode);
    let app = create_router(state);

    let addr: SocketAddr = config.service.bind_address().parse()?;
    info!(filter_mode = %config.filter_mode, "User service listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.close().await?;
    info!("User service stopped");

    Ok(())
}
