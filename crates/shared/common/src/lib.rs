//! Common utilities shared by the record services.
//!
//! This crate provides:
//! - Unified error handling for HTTP
//! - Query-string extractors rendering rejections as `AppError`, with
//!   optional `validator` rules
//! - Configuration structures
//! - The database connection wrapper (feature `database`)
//! - Graceful shutdown signal

pub mod config;
#[cfg(feature = "database")]
pub mod db;
pub mod error;
pub mod extractors;
pub mod shutdown;

pub use config::*;
#[cfg(feature = "database")]
pub use db::Database;
pub use error::{AppError, AppResult};
pub use extractors::{QueryParams, ValidatedQuery};
pub use shutdown::shutdown_signal;
