//! User CRUD operations and job applications.

use serde_json::{Map, Value};
use sql::{partial_update, ColumnMapper, ColumnMapping};
use sqlx::PgPool;
use tracing::{info, instrument};

use crate::{
    models::{NewUser, UserCredentials, UserDetail, UserRow},
    repository::bind_values,
    DbError,
};

/// API field → column renames for partial updates.
pub const COLUMNS: ColumnMapper = ColumnMapper::new(&[
    ColumnMapping::new("firstName", "first_name"),
    ColumnMapping::new("lastName", "last_name"),
    ColumnMapping::new("isAdmin", "is_admin"),
]);

const RETURNING: &str = "username, first_name, last_name, email, is_admin";

/// Insert a new user. `user.password` must already be hashed.
///
/// Returns `DbError::BadRequest` if the username is taken.
#[instrument(skip(pool, user), fields(username = %user.username))]
pub async fn register(pool: &PgPool, user: &NewUser) -> Result<UserRow, DbError> {
    let duplicate = sqlx::query_scalar::<_, String>("SELECT username FROM users WHERE username = $1")
        .bind(&user.username)
        .fetch_optional(pool)
        .await?;

    if duplicate.is_some() {
        return Err(DbError::BadRequest(format!("Duplicate username: {}", user.username)));
    }

    let row = sqlx::query_as::<_, UserRow>(&format!(
        r#"
        INSERT INTO users (username, password, first_name, last_name, email, is_admin)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING {RETURNING}
        "#
    ))
    .bind(&user.username)
    .bind(&user.password)
    .bind(&user.first_name)
    .bind(&user.last_name)
    .bind(&user.email)
    .bind(user.is_admin)
    .fetch_one(pool)
    .await?;

    info!("user registered");
    Ok(row)
}

/// Fetch a user including the stored password hash, for login.
#[instrument(skip(pool))]
pub async fn credentials(pool: &PgPool, username: &str) -> Result<Option<UserCredentials>, DbError> {
    let row = sqlx::query_as::<_, UserCredentials>(&format!(
        "SELECT {RETURNING}, password FROM users WHERE username = $1"
    ))
    .bind(username)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// Return all users ordered by username.
#[instrument(skip(pool))]
pub async fn find_all(pool: &PgPool) -> Result<Vec<UserRow>, DbError> {
    let rows = sqlx::query_as::<_, UserRow>(&format!("SELECT {RETURNING} FROM users ORDER BY username"))
        .fetch_all(pool)
        .await?;

    Ok(rows)
}

/// Fetch a user and the ids of the jobs they applied to.
#[instrument(skip(pool))]
pub async fn get(pool: &PgPool, username: &str) -> Result<UserDetail, DbError> {
    let user = sqlx::query_as::<_, UserRow>(&format!("SELECT {RETURNING} FROM users WHERE username = $1"))
        .bind(username)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| DbError::NotFound(format!("No user: {username}")))?;

    let jobs = sqlx::query_scalar::<_, i32>(
        "SELECT job_id FROM applications WHERE username = $1 ORDER BY job_id",
    )
    .bind(username)
    .fetch_all(pool)
    .await?;

    Ok(UserDetail { user, jobs })
}

/// Build the partial-update statement for `data`; the username binds last.
pub fn update_statement(data: &Map<String, Value>) -> Result<(String, Vec<Value>), DbError> {
    let set = partial_update(data, &COLUMNS)?;
    let sql = format!(
        "UPDATE users SET {} WHERE username = ${} RETURNING {RETURNING}",
        set.set_cols,
        set.next_placeholder()
    );
    Ok((sql, set.values))
}

/// Partially update a user. A `password` in `data` must already be hashed.
///
/// Returns `DbError::NotFound` if no user has this username.
#[instrument(skip(pool, data))]
pub async fn update(pool: &PgPool, username: &str, data: &Map<String, Value>) -> Result<UserRow, DbError> {
    let (sql, values) = update_statement(data)?;

    let row = bind_values(sqlx::query_as::<_, UserRow>(&sql), &values)
        .bind(username)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| DbError::NotFound(format!("No user: {username}")))?;

    Ok(row)
}

/// Permanently delete a user.
///
/// Returns `DbError::NotFound` if no row was deleted.
#[instrument(skip(pool))]
pub async fn remove(pool: &PgPool, username: &str) -> Result<(), DbError> {
    let result = sqlx::query("DELETE FROM users WHERE username = $1")
        .bind(username)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::NotFound(format!("No user: {username}")));
    }

    Ok(())
}

/// Record that `username` applied to job `job_id`.
///
/// Returns `DbError::NotFound` if either side is missing, and
/// `DbError::BadRequest` if the application already exists.
#[instrument(skip(pool))]
pub async fn apply_to_job(pool: &PgPool, username: &str, job_id: i32) -> Result<(), DbError> {
    let job = sqlx::query_scalar::<_, i32>("SELECT id FROM jobs WHERE id = $1")
        .bind(job_id)
        .fetch_optional(pool)
        .await?;
    if job.is_none() {
        return Err(DbError::NotFound(format!("No job: {job_id}")));
    }

    let user = sqlx::query_scalar::<_, String>("SELECT username FROM users WHERE username = $1")
        .bind(username)
        .fetch_optional(pool)
        .await?;
    if user.is_none() {
        return Err(DbError::NotFound(format!("No username: {username}")));
    }

    sqlx::query("INSERT INTO applications (job_id, username) VALUES ($1, $2)")
        .bind(job_id)
        .bind(username)
        .execute(pool)
        .await?;

    info!("application recorded");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn update_statement_maps_camel_case_fields() {
        let data = json!({ "firstName": "First", "lastName": "Last", "email": "e@x.com" });

        let (sql, values) = update_statement(data.as_object().unwrap()).unwrap();

        assert_eq!(
            sql,
            r#"UPDATE users SET "first_name"=$1, "last_name"=$2, "email"=$3 WHERE username = $4 RETURNING username, first_name, last_name, email, is_admin"#
        );
        assert_eq!(values, vec![json!("First"), json!("Last"), json!("e@x.com")]);
    }

    #[test]
    fn empty_update_is_rejected() {
        assert!(matches!(update_statement(&Map::new()), Err(DbError::Statement(_))));
    }
}
