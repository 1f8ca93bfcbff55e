//! Repository functions, one per database operation.
//!
//! Every function takes a `&DbPool` and returns a `Result<T, DbError>`.
//! No HTTP types here; pure SQL.
//!
//! Dynamic statements (partial updates, filtered listings) are assembled by
//! the `sql` crate and their values bound positionally with [`bind_values`].

pub mod companies;
pub mod jobs;
pub mod users;

use serde_json::Value;
use sqlx::postgres::PgArguments;
use sqlx::query::QueryAs;
use sqlx::Postgres;

/// Bind JSON values to `$1..$N` in order.
///
/// `null` is bound as a typed int8 NULL; Postgres assignment-casts it to the
/// target column type in both numeric and text columns.
pub(crate) fn bind_values<'q, O>(
    mut query: QueryAs<'q, Postgres, O, PgArguments>,
    values: &'q [Value],
) -> QueryAs<'q, Postgres, O, PgArguments> {
    for value in values {
        query = match value {
            Value::Null => query.bind(None::<i64>),
            Value::Bool(b) => query.bind(*b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => query.bind(i),
                None => query.bind(n.as_f64()),
            },
            Value::String(s) => query.bind(s.as_str()),
            other => query.bind(sqlx::types::Json(other)),
        };
    }
    query
}

/// `WHERE` clause prefix for an optional condition list.
pub(crate) fn where_sql(conditions: &[String]) -> String {
    if conditions.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", conditions.join(" AND "))
    }
}
