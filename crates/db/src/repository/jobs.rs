//! Job CRUD operations.

use serde_json::{Map, Value};
use sql::{filter_clause, partial_update, ColumnMapper, FilterOption, FilterOptions, Operator};
use sqlx::PgPool;
use tracing::{info, instrument};

use crate::{
    models::{JobFilters, JobRow, NewJob},
    repository::{bind_values, where_sql},
    DbError,
};

/// Job fields share their column names; nothing is renamed.
pub const COLUMNS: ColumnMapper = ColumnMapper::identity();

/// Comparison filters accepted by [`find_all`].
pub const FILTERS: FilterOptions = FilterOptions::new(&[
    FilterOption::new("title", "title", Operator::ILike),
    FilterOption::new("minSalary", "salary", Operator::Gte),
]);

const HAS_EQUITY: &str = r#""equity" > 0"#;

const RETURNING: &str = "id, title, salary, equity::FLOAT8 AS equity, company_handle";

/// Insert a new job for an existing company.
///
/// Returns `DbError::BadRequest` if the company handle is unknown.
#[instrument(skip(pool, job), fields(company_handle = %job.company_handle))]
pub async fn create(pool: &PgPool, job: &NewJob) -> Result<JobRow, DbError> {
    let company = sqlx::query_scalar::<_, String>("SELECT handle FROM companies WHERE handle = $1")
        .bind(&job.company_handle)
        .fetch_optional(pool)
        .await?;

    if company.is_none() {
        return Err(DbError::BadRequest(format!(
            "Invalid company handle: {}",
            job.company_handle
        )));
    }

    let row = sqlx::query_as::<_, JobRow>(&format!(
        r#"
        INSERT INTO jobs (title, salary, equity, company_handle)
        VALUES ($1, $2, $3, $4)
        RETURNING {RETURNING}
        "#
    ))
    .bind(&job.title)
    .bind(job.salary)
    .bind(job.equity)
    .bind(&job.company_handle)
    .fetch_one(pool)
    .await?;

    info!(job_id = row.id, "job created");
    Ok(row)
}

/// Build the listing query for `filters`.
pub fn find_all_statement(filters: &JobFilters) -> Result<(String, Vec<Value>), DbError> {
    let mut conditions = Vec::new();
    let mut values = Vec::new();

    let payload = filters.to_payload();
    if !payload.is_empty() {
        let clause = filter_clause(&payload, &FILTERS)?;
        conditions.push(clause.where_conditions);
        values = clause.values;
    }

    if filters.has_equity == Some(true) {
        conditions.push(HAS_EQUITY.to_string());
    }

    let sql = format!("SELECT {RETURNING} FROM jobs{} ORDER BY id", where_sql(&conditions));
    Ok((sql, values))
}

/// Return all jobs matching `filters`, ordered by id.
#[instrument(skip(pool))]
pub async fn find_all(pool: &PgPool, filters: &JobFilters) -> Result<Vec<JobRow>, DbError> {
    let (sql, values) = find_all_statement(filters)?;

    let rows = bind_values(sqlx::query_as::<_, JobRow>(&sql), &values)
        .fetch_all(pool)
        .await?;

    Ok(rows)
}

/// Fetch a single job by its primary key.
#[instrument(skip(pool))]
pub async fn get(pool: &PgPool, id: i32) -> Result<JobRow, DbError> {
    let row = sqlx::query_as::<_, JobRow>(&format!("SELECT {RETURNING} FROM jobs WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| DbError::NotFound(format!("No job: {id}")))?;

    Ok(row)
}

/// Build the partial-update statement for `data`; the id binds last.
pub fn update_statement(data: &Map<String, Value>) -> Result<(String, Vec<Value>), DbError> {
    let set = partial_update(data, &COLUMNS)?;
    let sql = format!(
        "UPDATE jobs SET {} WHERE id = ${} RETURNING {RETURNING}",
        set.set_cols,
        set.next_placeholder()
    );
    Ok((sql, set.values))
}

/// Partially update a job.
///
/// Returns `DbError::NotFound` if no job has this id.
#[instrument(skip(pool, data))]
pub async fn update(pool: &PgPool, id: i32, data: &Map<String, Value>) -> Result<JobRow, DbError> {
    let (sql, values) = update_statement(data)?;

    let row = bind_values(sqlx::query_as::<_, JobRow>(&sql), &values)
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| DbError::NotFound(format!("No job: {id}")))?;

    Ok(row)
}

/// Permanently delete a job.
///
/// Returns `DbError::NotFound` if no row was deleted.
#[instrument(skip(pool))]
pub async fn remove(pool: &PgPool, id: i32) -> Result<(), DbError> {
    let result = sqlx::query("DELETE FROM jobs WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::NotFound(format!("No job: {id}")));
    }

    Ok(())
}
