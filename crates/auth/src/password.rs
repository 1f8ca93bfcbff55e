//! Password hashing with bcrypt.
//!
//! bcrypt is CPU-bound, so both operations run on tokio's blocking pool.

use crate::AuthError;

/// Work factor used when none is configured.
pub const DEFAULT_WORK_FACTOR: u32 = bcrypt::DEFAULT_COST;

/// Hash `password` with the given bcrypt cost.
pub async fn hash_password(password: &str, work_factor: u32) -> Result<String, AuthError> {
    let password = password.to_string();

    tokio::task::spawn_blocking(move || {
        bcrypt::hash(password, work_factor).map_err(|e| AuthError::Hashing(e.to_string()))
    })
    .await
    .map_err(|e| AuthError::Hashing(format!("task join error: {e}")))?
}

/// Check `password` against a stored bcrypt `hash`.
///
/// Returns `Ok(false)` on a mismatch; `Err` only when the hash itself is unusable.
pub async fn verify_password(password: &str, hash: &str) -> Result<bool, AuthError> {
    let password = password.to_string();
    let hash = hash.to_string();

    tokio::task::spawn_blocking(move || {
        bcrypt::verify(password, &hash).map_err(|e| AuthError::Hashing(e.to_string()))
    })
    .await
    .map_err(|e| AuthError::Hashing(format!("task join error: {e}")))?
}
