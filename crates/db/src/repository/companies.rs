//! Company CRUD operations.

use serde_json::{Map, Value};
use sql::{filter_clause, partial_update, ColumnMapper, ColumnMapping, FilterOption, FilterOptions, Operator};
use sqlx::PgPool;
use tracing::{info, instrument};

use crate::{
    models::{CompanyDetail, CompanyFilters, CompanyRow, JobSummary, NewCompany},
    repository::{bind_values, where_sql},
    DbError,
};

/// API field → column renames for partial updates.
pub const COLUMNS: ColumnMapper = ColumnMapper::new(&[
    ColumnMapping::new("numEmployees", "num_employees"),
    ColumnMapping::new("logoUrl", "logo_url"),
]);

/// Filters accepted by [`find_all`].
pub const FILTERS: FilterOptions = FilterOptions::new(&[
    FilterOption::new("nameLike", "name", Operator::ILike),
    FilterOption::new("minEmployees", "num_employees", Operator::Gte),
    FilterOption::new("maxEmployees", "num_employees", Operator::Lte),
]);

const RETURNING: &str = "handle, name, description, num_employees, logo_url";

/// Insert a new company.
///
/// Returns `DbError::BadRequest` if the handle is already taken.
#[instrument(skip(pool, company), fields(handle = %company.handle))]
pub async fn create(pool: &PgPool, company: &NewCompany) -> Result<CompanyRow, DbError> {
    let duplicate = sqlx::query_scalar::<_, String>("SELECT handle FROM companies WHERE handle = $1")
        .bind(&company.handle)
        .fetch_optional(pool)
        .await?;

    if duplicate.is_some() {
        return Err(DbError::BadRequest(format!("Duplicate company: {}", company.handle)));
    }

    let row = sqlx::query_as::<_, CompanyRow>(&format!(
        r#"
        INSERT INTO companies (handle, name, description, num_employees, logo_url)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING {RETURNING}
        "#
    ))
    .bind(&company.handle)
    .bind(&company.name)
    .bind(&company.description)
    .bind(company.num_employees)
    .bind(&company.logo_url)
    .fetch_one(pool)
    .await?;

    info!("company created");
    Ok(row)
}

/// Build the listing query for `filters`.
///
/// Returns `DbError::BadRequest` when `minEmployees` exceeds `maxEmployees`.
pub fn find_all_statement(filters: &CompanyFilters) -> Result<(String, Vec<Value>), DbError> {
    if let (Some(min), Some(max)) = (filters.min_employees, filters.max_employees) {
        if min > max {
            return Err(DbError::BadRequest(
                "minEmployees cannot be greater than maxEmployees".to_string(),
            ));
        }
    }

    let payload = filters.to_payload();
    let (conditions, values) = if payload.is_empty() {
        (Vec::new(), Vec::new())
    } else {
        let clause = filter_clause(&payload, &FILTERS)?;
        (vec![clause.where_conditions], clause.values)
    };

    let sql = format!("SELECT {RETURNING} FROM companies{} ORDER BY name", where_sql(&conditions));
    Ok((sql, values))
}

/// Return all companies matching `filters`, ordered by name.
#[instrument(skip(pool))]
pub async fn find_all(pool: &PgPool, filters: &CompanyFilters) -> Result<Vec<CompanyRow>, DbError> {
    let (sql, values) = find_all_statement(filters)?;

    let rows = bind_values(sqlx::query_as::<_, CompanyRow>(&sql), &values)
        .fetch_all(pool)
        .await?;

    Ok(rows)
}

/// Fetch a company and its jobs.
#[instrument(skip(pool))]
pub async fn get(pool: &PgPool, handle: &str) -> Result<CompanyDetail, DbError> {
    let company = sqlx::query_as::<_, CompanyRow>(&format!(
        "SELECT {RETURNING} FROM companies WHERE handle = $1"
    ))
    .bind(handle)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DbError::NotFound(format!("No company: {handle}")))?;

    let jobs = sqlx::query_as::<_, JobSummary>(
        r#"
        SELECT id, title, salary, equity::FLOAT8 AS equity
        FROM jobs
        WHERE company_handle = $1
        ORDER BY id
        "#,
    )
    .bind(handle)
    .fetch_all(pool)
    .await?;

    Ok(CompanyDetail { company, jobs })
}

/// Build the partial-update statement for `data`; the handle binds last.
pub fn update_statement(data: &Map<String, Value>) -> Result<(String, Vec<Value>), DbError> {
    let set = partial_update(data, &COLUMNS)?;
    let sql = format!(
        "UPDATE companies SET {} WHERE handle = ${} RETURNING {RETURNING}",
        set.set_cols,
        set.next_placeholder()
    );
    Ok((sql, set.values))
}

/// Partially update a company.
///
/// Returns `DbError::NotFound` if no company has this handle.
#[instrument(skip(pool, data))]
pub async fn update(pool: &PgPool, handle: &str, data: &Map<String, Value>) -> Result<CompanyRow, DbError> {
    let (sql, values) = update_statement(data)?;

    let row = bind_values(sqlx::query_as::<_, CompanyRow>(&sql), &values)
        .bind(handle)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| DbError::NotFound(format!("No company: {handle}")))?;

    Ok(row)
}

/// Permanently delete a company (and, by cascade, its jobs).
///
/// Returns `DbError::NotFound` if no row was deleted.
#[instrument(skip(pool))]
pub async fn remove(pool: &PgPool, handle: &str) -> Result<(), DbError> {
    let result = sqlx::query("DELETE FROM companies WHERE handle = $1")
        .bind(handle)
        .execute(pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::NotFound(format!("No company: {handle}")));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unfiltered_listing_has_no_where() {
        let (sql, values) = find_all_statement(&CompanyFilters::default()).unwrap();

        assert_eq!(
            sql,
            "SELECT handle, name, description, num_employees, logo_url FROM companies ORDER BY name"
        );
        assert!(values.is_empty());
    }

    #[test]
    fn filtered_listing_binds_in_order() {
        let filters = CompanyFilters {
            name_like: Some("c2".into()),
            min_employees: Some(2),
            max_employees: Some(3),
        };

        let (sql, values) = find_all_statement(&filters).unwrap();

        assert!(sql.ends_with(
            r#" WHERE "name" ILIKE $1 AND "num_employees" >= $2 AND "num_employees" <= $3 ORDER BY name"#
        ));
        assert_eq!(values, vec![json!("%c2%"), json!(2), json!(3)]);
    }

    #[test]
    fn min_greater_than_max_is_bad_request() {
        let filters = CompanyFilters {
            name_like: None,
            min_employees: Some(10),
            max_employees: Some(1),
        };

        assert!(matches!(find_all_statement(&filters), Err(DbError::BadRequest(_))));
    }

    #[test]
    fn update_statement_continues_numbering_for_handle() {
        let data = json!({ "numEmployees": 10, "logoUrl": null });

        let (sql, values) = update_statement(data.as_object().unwrap()).unwrap();

        assert_eq!(
            sql,
            r#"UPDATE companies SET "num_employees"=$1, "logo_url"=$2 WHERE handle = $3 RETURNING handle, name, description, num_employees, logo_url"#
        );
        assert_eq!(values, vec![json!(10), Value::Null]);
    }

    #[test]
    fn empty_update_is_rejected() {
        assert!(matches!(
            update_statement(&Map::new()),
            Err(DbError::Statement(sql::SqlError::NoData))
        ));
    }
}
