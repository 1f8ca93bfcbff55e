//! Auth-level error types.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    /// A capability check failed (or the caller presented no identity).
    #[error("Unauthorized")]
    Unauthorized,

    /// A token could not be signed or verified.
    #[error("invalid token: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    /// bcrypt failed, or its blocking task panicked.
    #[error("password hashing error: {0}")]
    Hashing(String),
}
