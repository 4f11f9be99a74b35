//! Movie domain entity and related types.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::constants::{FIELD_LANGUAGE, FIELD_TITLE, FIELD_YEAR};
use crate::error::DomainResult;
use crate::field::{optional_int, present, required_id, required_int};

/// Movie domain entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movie {
    /// Store-generated identifier
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub title: String,
    pub year: i32,
    pub language: String,
}

/// Field values for a new movie, or for a full replacement of one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMovie {
    pub title: String,
    pub year: i32,
    pub language: String,
}

impl NewMovie {
    /// Build from raw values, enforcing that every field is present.
    /// Non-empty text is checked by the [`MovieParams`] rules.
    pub fn parse(
        title: Option<String>,
        year: Option<&str>,
        language: Option<String>,
    ) -> DomainResult<Self> {
        Ok(Self {
            title: present(FIELD_TITLE, title)?,
            year: required_int(FIELD_YEAR, year)?,
            language: present(FIELD_LANGUAGE, language)?,
        })
    }

    /// Attach the identifier assigned by the store
    pub fn into_movie(self, id: Uuid) -> Movie {
        Movie {
            id,
            title: self.title,
            year: self.year,
            language: self.language,
        }
    }
}

/// Exact-match criteria; every present field must match. Empty matches all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MovieFilter {
    pub id: Option<Uuid>,
    pub title: Option<String>,
    pub year: Option<i32>,
    pub language: Option<String>,
}

impl MovieFilter {
    /// Filter matching every movie
    pub fn any() -> Self {
        Self::default()
    }

    /// Filter on release year
    pub fn by_year(year: i32) -> Self {
        Self {
            year: Some(year),
            ..Self::default()
        }
    }

    /// Check if no criteria are set
    pub fn is_empty(&self) -> bool {
        self.id.is_none() && self.title.is_none() && self.year.is_none() && self.language.is_none()
    }
}

/// Raw query-string parameters accepted by the movie endpoints.
///
/// The `validate` rules apply where a record is written (`/create`,
/// `/update`).
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct MovieParams {
    #[serde(rename = "_id")]
    pub id: Option<String>,
    #[validate(length(min = 1, message = "title is required"))]
    pub title: Option<String>,
    pub year: Option<String>,
    #[validate(length(min = 1, message = "language is required"))]
    pub language: Option<String>,
}

impl MovieParams {
    /// Values for `/create`
    pub fn into_new_movie(self) -> DomainResult<NewMovie> {
        NewMovie::parse(self.title, self.year.as_deref(), self.language)
    }

    /// Filter for `/retrieve`: only `year` narrows the result.
    pub fn into_filter(self) -> DomainResult<MovieFilter> {
        Ok(match optional_int(FIELD_YEAR, self.year.as_deref())? {
            Some(year) => MovieFilter::by_year(year),
            None => MovieFilter::any(),
        })
    }

    /// Target and replacement values for `/update`
    pub fn into_replacement(self) -> DomainResult<(Uuid, NewMovie)> {
        let id = required_id(self.id.as_deref())?;
        let movie = NewMovie::parse(self.title, self.year.as_deref(), self.language)?;
        Ok((id, movie))
    }

    /// Target for `/delete`
    pub fn into_id(self) -> DomainResult<Uuid> {
        required_id(self.id.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DomainError;
    use serde_json::json;

    fn params(title: Option<&str>, year: Option<&str>, language: Option<&str>) -> MovieParams {
        MovieParams {
            id: None,
            title: title.map(String::from),
            year: year.map(String::from),
            language: language.map(String::from),
        }
    }

    #[test]
    fn test_new_movie_from_params() {
        let movie = params(Some("Dune"), Some("2021"), Some("English"))
            .into_new_movie()
            .unwrap();
        assert_eq!(
            movie,
            NewMovie {
                title: "Dune".into(),
                year: 2021,
                language: "English".into()
            }
        );
    }

    #[test]
    fn test_new_movie_requires_every_field() {
        assert!(params(None, Some("2021"), Some("English")).into_new_movie().is_err());
        assert!(params(Some("Dune"), None, Some("English")).into_new_movie().is_err());
        assert!(params(Some("Dune"), Some("2021"), None).into_new_movie().is_err());
    }

    #[test]
    fn test_params_reject_empty_text() {
        let errors = params(Some(""), Some("2021"), Some("English"))
            .validate()
            .unwrap_err();
        assert!(errors.field_errors().contains_key("title"));

        assert!(params(Some("Dune"), Some("2021"), Some("English")).validate().is_ok());
        assert!(params(None, Some("2021"), None).validate().is_ok());
    }

    #[test]
    fn test_filter_uses_year_only() {
        let filter = params(Some("Dune"), Some("2021"), None).into_filter().unwrap();
        assert_eq!(filter, MovieFilter::by_year(2021));

        let filter = params(Some("Dune"), None, None).into_filter().unwrap();
        assert!(filter.is_empty());
    }

    #[test]
    fn test_filter_rejects_non_numeric_year() {
        let err = params(None, Some("recent"), None).into_filter().unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn test_replacement_requires_id() {
        let err = params(Some("Dune"), Some("2021"), Some("English"))
            .into_replacement()
            .unwrap_err();
        assert_eq!(err, DomainError::validation("_id is required"));
    }

    #[test]
    fn test_movie_serializes_with_wire_names() {
        let id = Uuid::new_v4();
        let movie = NewMovie {
            title: "Dune".into(),
            year: 2021,
            language: "English".into(),
        }
        .into_movie(id);

        let value = serde_json::to_value(&movie).unwrap();
        assert_eq!(
            value,
            json!({"_id": id, "title": "Dune", "year": 2021, "language": "English"})
        );
    }
}
