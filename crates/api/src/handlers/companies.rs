use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Map, Value};

use db::models::{CompanyFilters, NewCompany};
use db::repository::companies as company_repo;

use super::{check_length, present, validate_shape, ApiError, AppState};

/// Fields a company PATCH may carry. The handle is immutable.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
#[allow(dead_code)] // parsed only to validate the payload
struct CompanyUpdate {
    #[serde(default, deserialize_with = "present")]
    name: Option<String>,
    #[serde(default, deserialize_with = "present")]
    description: Option<String>,
    num_employees: Option<i32>,
    logo_url: Option<String>,
}

/// `GET /companies?nameLike=&minEmployees=&maxEmployees= => { companies }`
pub async fn list(
    State(state): State<AppState>,
    filters: Result<Query<CompanyFilters>, QueryRejection>,
) -> Result<Json<Value>, ApiError> {
    let Query(filters) = filters?;
    let companies = company_repo::find_all(&state.pool, &filters).await?;
    Ok(Json(json!({ "companies": companies })))
}

/// `GET /companies/:handle => { company }` including its jobs.
pub async fn get(Path(handle): Path<String>, State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let company = company_repo::get(&state.pool, &handle).await?;
    Ok(Json(json!({ "company": company })))
}

/// `POST /companies { company } => { company }`
pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<NewCompany>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let Json(company) = payload?;
    check_length("handle", &company.handle, 1, 25)?;
    check_length("name", &company.name, 1, 100)?;

    let company = company_repo::create(&state.pool, &company).await?;
    Ok((StatusCode::CREATED, Json(json!({ "company": company }))))
}

/// `PATCH /companies/:handle { fld1, ... } => { company }`
pub async fn update(
    Path(handle): Path<String>,
    State(state): State<AppState>,
    payload: Result<Json<Map<String, Value>>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(data) = payload?;
    validate_shape::<CompanyUpdate>(&data)?;

    let company = company_repo::update(&state.pool, &handle, &data).await?;
    Ok(Json(json!({ "company": company })))
}

/// `DELETE /companies/:handle => { deleted: handle }`
pub async fn remove(Path(handle): Path<String>, State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    company_repo::remove(&state.pool, &handle).await?;
    Ok(Json(json!({ "deleted": handle })))
}
