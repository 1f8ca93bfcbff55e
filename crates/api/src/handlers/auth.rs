use axum::{extract::rejection::JsonRejection, extract::State, http::StatusCode, Json};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{info, warn};

use auth::password::{hash_password, verify_password};
use db::models::NewUser;
use db::repository::users as user_repo;

use super::{check_email, check_length, ApiError, AppState};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TokenRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

/// `POST /auth/token { username, password } => { token }`
pub async fn token(
    State(state): State<AppState>,
    payload: Result<Json<TokenRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(req) = payload?;

    let Some(credentials) = user_repo::credentials(&state.pool, &req.username).await? else {
        warn!(username = %req.username, "login for unknown user");
        return Err(ApiError::Unauthorized);
    };

    if !verify_password(&req.password, &credentials.password).await? {
        warn!(username = %req.username, "login with wrong password");
        return Err(ApiError::Unauthorized);
    }

    let user = credentials.into_user();
    let token = state.auth.issue(&user.username, user.is_admin)?;
    Ok(Json(json!({ "token": token })))
}

/// `POST /auth/register { user } => { token }`
///
/// Self-registration never grants admin.
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let Json(req) = payload?;
    check_length("username", &req.username, 1, 25)?;
    check_length("password", &req.password, 5, 72)?;
    check_length("firstName", &req.first_name, 1, 30)?;
    check_length("lastName", &req.last_name, 1, 30)?;
    check_email(&req.email)?;

    let new_user = NewUser {
        password: hash_password(&req.password, state.config.bcrypt_work_factor).await?,
        username: req.username,
        first_name: req.first_name,
        last_name: req.last_name,
        email: req.email,
        is_admin: false,
    };

    let user = user_repo::register(&state.pool, &new_user).await?;
    let token = state.auth.issue(&user.username, user.is_admin)?;
    info!(username = %user.username, "user self-registered");
    Ok((StatusCode::CREATED, Json(json!({ "token": token }))))
}
