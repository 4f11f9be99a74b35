//! User domain entity and related types.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::constants::{FIELD_AGE, FIELD_EMAIL, FIELD_NAME, FIELD_PHONE_NUMBER, USER_FIELD_PRIORITY};
use crate::error::{DomainError, DomainResult};
use crate::field::{empty_as_none, optional_int, parse_id, parse_int, present, required_id, required_int};
use crate::query::FilterMode;

/// User domain entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Store-generated identifier
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub name: String,
    pub age: i32,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<i64>,
}

/// Field values for a new user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub age: i32,
    pub email: String,
    pub phone_number: Option<i64>,
}

impl NewUser {
    /// Attach the identifier assigned by the store
    pub fn into_user(self, id: Uuid) -> User {
        User {
            id,
            name: self.name,
            age: self.age,
            email: self.email,
            phone_number: self.phone_number,
        }
    }
}

/// Fields to overwrite on an existing user. Absent fields stay untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserChanges {
    pub name: Option<String>,
    pub age: Option<i32>,
    pub email: Option<String>,
    pub phone_number: Option<i64>,
}

impl UserChanges {
    /// Check if there is nothing to write
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.age.is_none()
            && self.email.is_none()
            && self.phone_number.is_none()
    }
}

/// Exact-match criteria; every present field must match. Empty matches all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserFilter {
    pub name: Option<String>,
    pub age: Option<i32>,
    pub email: Option<String>,
    pub phone_number: Option<i64>,
    pub id: Option<Uuid>,
}

impl UserFilter {
    /// Filter matching every user
    pub fn any() -> Self {
        Self::default()
    }

    /// Check if no criteria are set
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.age.is_none()
            && self.email.is_none()
            && self.phone_number.is_none()
            && self.id.is_none()
    }
}

/// Query-string parameters of `/create`.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct NewUserParams {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: Option<String>,
    pub age: Option<String>,
    #[validate(length(min = 1, message = "email is required"))]
    pub email: Option<String>,
    #[serde(rename = "phoneNumber")]
    pub phone_number: Option<String>,
}

impl NewUserParams {
    /// Values for `/create`; `phoneNumber` may be absent.
    pub fn into_new_user(self) -> DomainResult<NewUser> {
        Ok(NewUser {
            name: present(FIELD_NAME, self.name)?,
            age: required_int(FIELD_AGE, self.age.as_deref())?,
            email: present(FIELD_EMAIL, self.email)?,
            phone_number: optional_int(FIELD_PHONE_NUMBER, self.phone_number.as_deref())?,
        })
    }
}

/// Criteria parameters of `/retrieve`, `/update` and `/delete`.
///
/// A parameter sent with an empty or blank value counts as not supplied.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserParams {
    #[serde(default, deserialize_with = "empty_as_none")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub age: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub email: Option<String>,
    #[serde(rename = "phoneNumber", default, deserialize_with = "empty_as_none")]
    pub phone_number: Option<String>,
    #[serde(rename = "_id", default, deserialize_with = "empty_as_none")]
    pub id: Option<String>,
}

impl UserParams {
    /// Names of the supplied parameters, in priority order
    pub fn supplied(&self) -> Vec<&'static str> {
        let flags = [
            self.name.is_some(),
            self.age.is_some(),
            self.email.is_some(),
            self.phone_number.is_some(),
            self.id.is_some(),
        ];
        USER_FIELD_PRIORITY
            .iter()
            .zip(flags)
            .filter_map(|(field, is_present)| is_present.then_some(*field))
            .collect()
    }

    /// Filter for `/retrieve`.
    ///
    /// With [`FilterMode::FirstMatch`] only the highest-priority supplied
    /// parameter is kept; the others are dropped before any coercion.
    pub fn into_filter(self, mode: FilterMode) -> DomainResult<UserFilter> {
        let params = match mode {
            FilterMode::FirstMatch => self.first_criterion(),
            FilterMode::AllOf => self,
        };
        params.into_exact_filter()
    }

    /// Target and changes for `/update`.
    ///
    /// The target is always `_id`. The fields written are picked from
    /// `name`, `age`, `email`, `phoneNumber` according to `mode`.
    pub fn into_update(self, mode: FilterMode) -> DomainResult<(Uuid, UserChanges)> {
        let id = required_id(self.id.as_deref())?;
        let params = UserParams { id: None, ..self };
        let params = match mode {
            FilterMode::FirstMatch => params.first_criterion(),
            FilterMode::AllOf => params,
        };

        let changes = UserChanges {
            name: params.name,
            age: params
                .age
                .as_deref()
                .map(|age| parse_int(FIELD_AGE, age))
                .transpose()?,
            email: params.email,
            phone_number: params
                .phone_number
                .as_deref()
                .map(|phone| parse_int(FIELD_PHONE_NUMBER, phone))
                .transpose()?,
        };

        if changes.is_empty() {
            return Err(DomainError::validation(
                "at least one of name, age, email, phoneNumber is required",
            ));
        }

        Ok((id, changes))
    }

    /// Filter for `/delete`: every supplied parameter, and only those.
    pub fn into_delete_filter(self) -> DomainResult<UserFilter> {
        let filter = self.into_exact_filter()?;
        if filter.is_empty() {
            return Err(DomainError::validation(
                "at least one of name, age, email, phoneNumber, _id is required",
            ));
        }
        Ok(filter)
    }

    fn first_criterion(self) -> Self {
        let UserParams {
            name,
            age,
            email,
            phone_number,
            id,
        } = self;

        if name.is_some() {
            UserParams { name, ..Self::default() }
        } else if age.is_some() {
            UserParams { age, ..Self::default() }
        } else if email.is_some() {
            UserParams { email, ..Self::default() }
        } else if phone_number.is_some() {
            UserParams { phone_number, ..Self::default() }
        } else {
            UserParams { id, ..Self::default() }
        }
    }

    fn into_exact_filter(self) -> DomainResult<UserFilter> {
        Ok(UserFilter {
            name: self.name,
            age: self
                .age
                .as_deref()
                .map(|age| parse_int(FIELD_AGE, age))
                .transpose()?,
            email: self.email,
            phone_number: self
                .phone_number
                .as_deref()
                .map(|phone| parse_int(FIELD_PHONE_NUMBER, phone))
                .transpose()?,
            id: self.id.as_deref().map(parse_id).transpose()?,
        })
    }
}
