//! Query shapes shared by both collections.

use std::str::FromStr;

use serde::Serialize;
use serde_json::Value;

use crate::constants::{FIELD_ID, FILTER_MODE_ALL, FILTER_MODE_FIRST};
use crate::error::{DomainError, DomainResult};

/// How multiple supplied criteria are combined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FilterMode {
    /// Priority-ordered single criterion: the first supplied field wins,
    /// the rest are ignored.
    #[default]
    FirstMatch,
    /// Every supplied field must match.
    AllOf,
}

impl FromStr for FilterMode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            FILTER_MODE_FIRST => Ok(FilterMode::FirstMatch),
            FILTER_MODE_ALL => Ok(FilterMode::AllOf),
            other => Err(DomainError::validation(format!(
                "unknown filter mode '{}', expected '{}' or '{}'",
                other, FILTER_MODE_FIRST, FILTER_MODE_ALL
            ))),
        }
    }
}

impl std::fmt::Display for FilterMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FilterMode::FirstMatch => write!(f, "{}", FILTER_MODE_FIRST),
            FilterMode::AllOf => write!(f, "{}", FILTER_MODE_ALL),
        }
    }
}

/// Result of a replace keyed by `_id`.
///
/// `matched` counts documents found under the key; `modified` counts those
/// whose stored values actually changed. Writing identical values matches
/// without modifying.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplaceOutcome {
    pub matched: u64,
    pub modified: u64,
}

impl ReplaceOutcome {
    /// Nothing matched the key
    pub fn none() -> Self {
        Self::default()
    }

    /// The keyed document was found; `changed` tells whether it was rewritten
    pub fn matched(changed: bool) -> Self {
        Self {
            matched: 1,
            modified: u64::from(changed),
        }
    }
}

/// Selection of returned document fields. Empty means every field.
///
/// As in a document store, `_id` is returned even when not listed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Projection {
    fields: Vec<String>,
}

impl Projection {
    /// Return every field
    pub fn all() -> Self {
        Self::default()
    }

    /// Return only the named fields (plus `_id`)
    pub fn only<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
        }
    }

    /// Check if this projection keeps every field
    pub fn is_all(&self) -> bool {
        self.fields.is_empty()
    }

    /// Serialize a record and strip the fields not selected.
    pub fn apply<T: Serialize>(&self, record: &T) -> DomainResult<Value> {
        let mut value = serde_json::to_value(record)
            .map_err(|e| DomainError::internal(format!("failed to serialize record: {}", e)))?;

        if self.is_all() {
            return Ok(value);
        }

        if let Value::Object(map) = &mut value {
            map.retain(|key, _| key == FIELD_ID || self.fields.iter().any(|f| f == key));
        }

        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Serialize)]
    struct Doc {
        #[serde(rename = "_id")]
        id: u32,
        title: &'static str,
        year: i32,
    }

    #[test]
    fn test_filter_mode_parse() {
        assert_eq!("first".parse::<FilterMode>().unwrap(), FilterMode::FirstMatch);
        assert_eq!(" ALL ".parse::<FilterMode>().unwrap(), FilterMode::AllOf);
        assert!("any".parse::<FilterMode>().is_err());
        assert_eq!(FilterMode::default(), FilterMode::FirstMatch);
    }

    #[test]
    fn test_projection_all_keeps_everything() {
        let doc = Doc { id: 1, title: "Dune", year: 2021 };
        let value = Projection::all().apply(&doc).unwrap();
        assert_eq!(value, json!({"_id": 1, "title": "Dune", "year": 2021}));
    }

    #[test]
    fn test_projection_only_keeps_id() {
        let doc = Doc { id: 1, title: "Dune", year: 2021 };
        let value = Projection::only(["year"]).apply(&doc).unwrap();
        assert_eq!(value, json!({"_id": 1, "year": 2021}));
    }
}
