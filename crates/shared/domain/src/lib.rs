//! Domain layer - record entities, request coercion and query shapes.
//!
//! This crate contains pure domain logic with no infrastructure dependencies.
//! Both services share it; neither service depends on the other.

pub mod constants;
pub mod error;
pub mod field;
pub mod movie;
pub mod query;
pub mod user;

pub use constants::*;
pub use error::{DomainError, DomainResult};
pub use movie::{Movie, MovieFilter, MovieParams, NewMovie};
pub use query::{FilterMode, Projection, ReplaceOutcome};
pub use user::{NewUser, NewUserParams, User, UserChanges, UserFilter, UserParams};
