//! Coercion of raw query-string values into typed record fields.
//!
//! Every parameter arrives as text. Non-empty text rules are declared with
//! `validator` on the parameter structs; this module only turns text into
//! integers and identifiers.

use std::str::FromStr;

use serde::{Deserialize, Deserializer};
use uuid::Uuid;

use crate::error::{DomainError, DomainResult};

/// Deserialize a query value, treating an empty or blank one as absent.
pub fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|text| !text.trim().is_empty()))
}

/// Unwrap a value that must be present.
pub fn present<T>(field: &str, value: Option<T>) -> DomainResult<T> {
    value.ok_or_else(|| DomainError::validation(format!("{} is required", field)))
}

/// Require a value and coerce it to an integer.
pub fn required_int<T: FromStr>(field: &str, value: Option<&str>) -> DomainResult<T> {
    match value {
        Some(raw) if !raw.trim().is_empty() => parse_int(field, raw),
        _ => Err(DomainError::validation(format!("{} is required", field))),
    }
}

/// Coerce an optional value to an integer; an empty string counts as absent.
pub fn optional_int<T: FromStr>(field: &str, value: Option<&str>) -> DomainResult<Option<T>> {
    match value {
        Some(raw) if !raw.trim().is_empty() => parse_int(field, raw).map(Some),
        _ => Ok(None),
    }
}

/// Coerce a present value to an integer.
pub fn parse_int<T: FromStr>(field: &str, raw: &str) -> DomainResult<T> {
    raw.trim()
        .parse()
        .map_err(|_| DomainError::validation(format!("{} must be an integer, got '{}'", field, raw)))
}

/// Parse a store identifier.
pub fn parse_id(raw: &str) -> DomainResult<Uuid> {
    Uuid::parse_str(raw.trim())
        .map_err(|_| DomainError::validation(format!("'{}' is not a valid _id", raw)))
}

/// Require an identifier and parse it.
pub fn required_id(value: Option<&str>) -> DomainResult<Uuid> {
    match value {
        Some(raw) if !raw.trim().is_empty() => parse_id(raw),
        _ => Err(DomainError::validation("_id is required")),
    }
}
