//! Typed error type for the db crate.

use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("sqlx error: {0}")]
    Sqlx(sqlx::Error),

    /// No row matched; the message names what was looked up.
    #[error("{0}")]
    NotFound(String),

    /// The caller's data was rejected (duplicate key, failed constraint, …).
    #[error("{0}")]
    BadRequest(String),

    /// A dynamic statement could not be built from the caller's payload.
    #[error(transparent)]
    Statement(#[from] sql::SqlError),

    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Client-facing message for a constraint violation caused by caller data.
///
/// Postgres's own text names tables and columns, so it is only logged.
fn client_message(sqlstate: &str) -> Option<&'static str> {
    let message = match sqlstate {
        "23502" => "A required field is missing",
        "23503" => "A referenced record does not exist",
        "23505" => "A record with this key already exists",
        "23514" => "A field has an invalid value",
        "22001" => "A field value is too long",
        _ => return None,
    };
    Some(message)
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if let Some(message) = db_err.code().as_deref().and_then(client_message) {
                warn!(
                    code = ?db_err.code(),
                    constraint = ?db_err.constraint(),
                    detail = %db_err.message(),
                    "rejected caller data"
                );
                return Self::BadRequest(message.to_string());
            }
        }
        Self::Sqlx(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_database_errors_stay_sqlx() {
        let err = DbError::from(sqlx::Error::RowNotFound);
        assert!(matches!(err, DbError::Sqlx(sqlx::Error::RowNotFound)));
    }

    #[test]
    fn constraint_violations_get_generic_messages() {
        for code in ["23502", "23503", "23505", "23514", "22001"] {
            let message = client_message(code).expect("client data sqlstate");
            assert!(!message.contains("column"));
            assert!(!message.contains("relation"));
        }
        assert_eq!(client_message("23502"), Some("A required field is missing"));
    }

    #[test]
    fn server_side_sqlstates_are_not_client_errors() {
        assert_eq!(client_message("40001"), None);
        assert_eq!(client_message("53300"), None);
    }

    #[test]
    fn statement_errors_keep_their_message() {
        let err = DbError::from(sql::SqlError::NoData);
        assert_eq!(err.to_string(), "No data");
    }
}
