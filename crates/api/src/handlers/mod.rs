//! Route handlers, one module per resource.
//!
//! Handlers assume their route's capability gate has already run.

pub mod auth;
pub mod companies;
pub mod jobs;
pub mod users;

use serde::de::{Deserialize, DeserializeOwned, Deserializer};
use serde_json::{Map, Value};

use super::{ApiError, AppState};

/// Check a partial-update body against the typed shape `T`.
///
/// Rejects unknown fields and wrongly typed values; the untouched map is what
/// the statement builder consumes, so key order is preserved.
pub(crate) fn validate_shape<T: DeserializeOwned>(payload: &Map<String, Value>) -> Result<T, ApiError> {
    serde_json::from_value(Value::Object(payload.clone()))
        .map_err(|e| ApiError::BadRequest(e.to_string()))
}

/// `deserialize_with` for update fields backed by NOT NULL columns: the key
/// may be left out, but an explicit `null` is rejected.
pub(crate) fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// Character-length bounds for a required string field.
pub(crate) fn check_length(field: &str, value: &str, min: usize, max: usize) -> Result<(), ApiError> {
    let len = value.chars().count();
    if len < min || len > max {
        return Err(ApiError::BadRequest(format!(
            "{field} must be between {min} and {max} characters"
        )));
    }
    Ok(())
}

pub(crate) fn check_email(email: &str) -> Result<(), ApiError> {
    check_length("email", email, 6, 60)?;
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(()),
        _ => Err(ApiError::BadRequest("email must be a valid address".to_string())),
    }
}
