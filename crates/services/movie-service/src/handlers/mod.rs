//! HTTP handlers.

pub mod health_handler;
pub mod movie_handler;

pub use health_handler::health_routes;
pub use movie_handler::movie_routes;
