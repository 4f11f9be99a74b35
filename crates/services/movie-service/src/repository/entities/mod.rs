//! Database entities.

pub mod movie;
