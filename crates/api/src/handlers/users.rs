use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tracing::info;

use auth::password::hash_password;
use auth::Identity;
use db::models::NewUser;
use db::repository::users as user_repo;

use super::{check_email, check_length, present, validate_shape, ApiError, AppState};

/// Fields a user PATCH may carry. Admin status cannot be changed this way.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct UserUpdate {
    #[serde(default, deserialize_with = "present")]
    first_name: Option<String>,
    #[serde(default, deserialize_with = "present")]
    last_name: Option<String>,
    #[serde(default, deserialize_with = "present")]
    password: Option<String>,
    #[serde(default, deserialize_with = "present")]
    email: Option<String>,
}

/// `POST /users { user } => { user, token }`
///
/// Admin-only user creation; the new user may itself be an admin.
pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<NewUser>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let Json(mut new_user) = payload?;
    check_length("username", &new_user.username, 1, 25)?;
    check_length("password", &new_user.password, 5, 72)?;
    check_email(&new_user.email)?;

    new_user.password = hash_password(&new_user.password, state.config.bcrypt_work_factor).await?;

    let user = user_repo::register(&state.pool, &new_user).await?;
    let token = state.auth.issue(&user.username, user.is_admin)?;
    info!(username = %user.username, is_admin = user.is_admin, "user created by admin");
    Ok((StatusCode::CREATED, Json(json!({ "user": user, "token": token }))))
}

/// `GET /users => { users }`
pub async fn list(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let users = user_repo::find_all(&state.pool).await?;
    Ok(Json(json!({ "users": users })))
}

/// `GET /users/:username => { user }` including applied job ids.
pub async fn get(Path(username): Path<String>, State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let user = user_repo::get(&state.pool, &username).await?;
    Ok(Json(json!({ "user": user })))
}

/// `GET /me => { user }` for the caller's own token.
pub async fn me(Extension(identity): Extension<Identity>, State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let user = user_repo::get(&state.pool, &identity.username).await?;
    Ok(Json(json!({ "user": user })))
}

/// `PATCH /users/:username { fld1, ... } => { user }`
///
/// A new password is hashed before it is stored.
pub async fn update(
    Path(username): Path<String>,
    State(state): State<AppState>,
    payload: Result<Json<Map<String, Value>>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(mut data) = payload?;
    let shape = validate_shape::<UserUpdate>(&data)?;

    for (field, value) in [("firstName", &shape.first_name), ("lastName", &shape.last_name)] {
        if let Some(value) = value {
            check_length(field, value, 1, 30)?;
        }
    }
    if let Some(email) = &shape.email {
        check_email(email)?;
    }
    if let Some(password) = &shape.password {
        check_length("password", password, 5, 72)?;
        let hashed = hash_password(password, state.config.bcrypt_work_factor).await?;
        // Replaces in place so the key keeps its position.
        data.insert("password".to_string(), Value::String(hashed));
    }

    let user = user_repo::update(&state.pool, &username, &data).await?;
    Ok(Json(json!({ "user": user })))
}

/// `DELETE /users/:username => { deleted: username }`
pub async fn remove(Path(username): Path<String>, State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    user_repo::remove(&state.pool, &username).await?;
    Ok(Json(json!({ "deleted": username })))
}

/// `POST /users/:username/jobs/:id => { applied: id }`
pub async fn apply(
    params: Result<Path<(String, i32)>, PathRejection>,
    State(state): State<AppState>,
) -> Result<Json<Value>, ApiError> {
    let Path((username, job_id)) = params?;
    user_repo::apply_to_job(&state.pool, &username, job_id).await?;
    Ok(Json(json!({ "applied": job_id })))
}
