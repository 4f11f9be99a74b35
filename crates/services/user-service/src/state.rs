//! Application state for dependency injection.

use std::sync::Arc;

use domain::FilterMode;

use crate::repository::UserRepository;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    /// How retrieve and update combine several supplied criteria
    pub filter_mode: FilterMode,
}

impl AppState {
    /// Create new app state.
    pub fn new(users: Arc<dyn UserRepository>, filter_mode: FilterMode) -> Self {
        Self { users, filter_mode }
    }
}
