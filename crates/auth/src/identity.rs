//! The caller identity decoded from a verified token.

use chrono::{DateTime, Utc};

/// Who is making the request.
///
/// Built fresh for every request from the bearer token; never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub username: String,
    pub is_admin: bool,
    pub issued_at: DateTime<Utc>,
}
