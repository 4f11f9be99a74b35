//! Domain-level constants.
//!
//! Wire names of record fields as they appear in query strings and JSON.

// =============================================================================
// Shared
// =============================================================================

/// Store-generated identifier
pub const FIELD_ID: &str = "_id";

// =============================================================================
// Movies
// =============================================================================

pub const FIELD_TITLE: &str = "title";
pub const FIELD_YEAR: &str = "year";
pub const FIELD_LANGUAGE: &str = "language";

// =============================================================================
// Users
// =============================================================================

pub const FIELD_NAME: &str = "name";
pub const FIELD_AGE: &str = "age";
pub const FIELD_EMAIL: &str = "email";
pub const FIELD_PHONE_NUMBER: &str = "phoneNumber";

/// Priority order used when only one user criterion is honoured.
pub const USER_FIELD_PRIORITY: &[&str] = &[
    FIELD_NAME,
    FIELD_AGE,
    FIELD_EMAIL,
    FIELD_PHONE_NUMBER,
    FIELD_ID,
];

// =============================================================================
// Filter modes
// =============================================================================

/// Only the first supplied criterion (in priority order) is used
pub const FILTER_MODE_FIRST: &str = "first";

/// Every supplied criterion is combined with AND
pub const FILTER_MODE_ALL: &str = "all";
