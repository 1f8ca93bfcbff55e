//! HTTP error type and status mapping.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::error;

use auth::AuthError;
use db::DbError;
use sql::SqlError;

/// Every failure a handler or gate can return.
///
/// Rendered as `{"error": {"message": "...", "status": N}}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("{0}")]
    NotFound(String),

    /// Details are logged, never sent to the client.
    #[error("Internal Server Error")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let Self::Internal(detail) = &self {
            error!(%detail, "request failed");
        }

        let status = self.status();
        let body = json!({
            "error": {
                "message": self.to_string(),
                "status": status.as_u16(),
            }
        });
        (status, Json(body)).into_response()
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound(message) => Self::NotFound(message),
            DbError::BadRequest(message) => Self::BadRequest(message),
            DbError::Statement(err) => err.into(),
            DbError::Sqlx(_) | DbError::Migration(_) => Self::Internal(err.to_string()),
        }
    }
}

impl From<SqlError> for ApiError {
    fn from(err: SqlError) -> Self {
        Self::BadRequest(err.to_string())
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Unauthorized => Self::Unauthorized,
            AuthError::Token(_) | AuthError::Hashing(_) => Self::Internal(err.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn db_errors_map_to_statuses() {
        let not_found: ApiError = DbError::NotFound("No job: 1".into()).into();
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);
        assert_eq!(not_found.to_string(), "No job: 1");

        let no_data: ApiError = DbError::Statement(SqlError::NoData).into();
        assert_eq!(no_data.status(), StatusCode::BAD_REQUEST);
        assert_eq!(no_data.to_string(), "No data");

        let internal: ApiError = DbError::Sqlx(sqlx::Error::PoolTimedOut).into();
        assert_eq!(internal.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(internal.to_string(), "Internal Server Error");
    }

    #[test]
    fn auth_errors_map_to_statuses() {
        let unauthorized: ApiError = AuthError::Unauthorized.into();
        assert_eq!(unauthorized.status(), StatusCode::UNAUTHORIZED);

        let hashing: ApiError = AuthError::Hashing("boom".into()).into();
        assert_eq!(hashing.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
