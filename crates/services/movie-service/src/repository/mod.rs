//! Repository layer for data access.

pub mod entities;
mod movie_repository;

pub use movie_repository::{MovieRepository, MovieStore};

#[cfg(any(test, feature = "test-utils"))]
pub use movie_repository::MockMovieRepository;
