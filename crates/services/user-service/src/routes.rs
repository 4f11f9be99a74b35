//! Route configuration.

use axum::Router;
use tower_http::trace::TraceLayer;

use crate::handlers::{health_routes, user_routes};
use crate::state::AppState;

/// Create the user service router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(health_routes())
        .merge(user_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
