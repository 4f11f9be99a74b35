//! Application state for dependency injection.

use std::sync::Arc;

use crate::repository::MovieRepository;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub movies: Arc<dyn MovieRepository>,
}

impl AppState {
    /// Create new app state.
    pub fn new(movies: Arc<dyn MovieRepository>) -> Self {
        Self { movies }
    }
}
