use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::{json, Map, Value};

use db::models::{JobFilters, NewJob};
use db::repository::jobs as job_repo;

use super::{check_length, present, validate_shape, ApiError, AppState};

/// Fields a job PATCH may carry. The id and company are immutable.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
#[allow(dead_code)] // parsed only to validate the payload
struct JobUpdate {
    #[serde(default, deserialize_with = "present")]
    title: Option<String>,
    salary: Option<i32>,
    equity: Option<f64>,
}

/// `GET /jobs?title=&minSalary=&hasEquity= => { jobs }`
pub async fn list(
    State(state): State<AppState>,
    filters: Result<Query<JobFilters>, QueryRejection>,
) -> Result<Json<Value>, ApiError> {
    let Query(filters) = filters?;
    let jobs = job_repo::find_all(&state.pool, &filters).await?;
    Ok(Json(json!({ "jobs": jobs })))
}

/// `GET /jobs/:id => { job }`
pub async fn get(
    id: Result<Path<i32>, PathRejection>,
    State(state): State<AppState>,
) -> Result<Json<Value>, ApiError> {
    let Path(id) = id?;
    let job = job_repo::get(&state.pool, id).await?;
    Ok(Json(json!({ "job": job })))
}

/// `POST /jobs { job } => { job }`
pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<NewJob>, JsonRejection>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let Json(job) = payload?;
    check_length("title", &job.title, 1, 100)?;

    let job = job_repo::create(&state.pool, &job).await?;
    Ok((StatusCode::CREATED, Json(json!({ "job": job }))))
}

/// `PATCH /jobs/:id { fld1, ... } => { job }`
pub async fn update(
    id: Result<Path<i32>, PathRejection>,
    State(state): State<AppState>,
    payload: Result<Json<Map<String, Value>>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Path(id) = id?;
    let Json(data) = payload?;
    validate_shape::<JobUpdate>(&data)?;

    let job = job_repo::update(&state.pool, id, &data).await?;
    Ok(Json(json!({ "job": job })))
}

/// `DELETE /jobs/:id => { deleted: id }`
pub async fn remove(
    id: Result<Path<i32>, PathRejection>,
    State(state): State<AppState>,
) -> Result<Json<Value>, ApiError> {
    let Path(id) = id?;
    job_repo::remove(&state.pool, id).await?;
    Ok(Json(json!({ "deleted": id })))
}
