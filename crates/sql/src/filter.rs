//! Filter `WHERE` clause builder.
//!
//! Each filter key is looked up in a static [`FilterOptions`] table that names
//! the column and comparison operator it applies to:
//!
//! ```text
//! {nameLike: "c2", minEmployees: 2}
//!   =>  "name" ILIKE $1 AND "num_employees" >= $2   ["%c2%", 2]
//! ```

use std::fmt;

use serde_json::{Map, Value};

use crate::{columns::quote_ident, SqlError};

/// Comparison operators a filter may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Eq,
    /// Case-insensitive substring match; the value is wrapped in `%…%`.
    ILike,
    Gte,
    Lte,
}

impl Operator {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::ILike => "ILIKE",
            Self::Gte => ">=",
            Self::Lte => "<=",
        }
    }

    pub fn is_pattern(&self) -> bool {
        matches!(self, Self::ILike)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// How one filter key translates to a condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterOption {
    pub key: &'static str,
    pub column: &'static str,
    pub operator: Operator,
}

impl FilterOption {
    pub const fn new(key: &'static str, column: &'static str, operator: Operator) -> Self {
        Self { key, column, operator }
    }
}

/// Static table of every filter a listing endpoint accepts.
#[derive(Debug, Clone, Copy)]
pub struct FilterOptions {
    options: &'static [FilterOption],
}

impl FilterOptions {
    pub const fn new(options: &'static [FilterOption]) -> Self {
        Self { options }
    }

    pub fn lookup(&self, key: &str) -> Option<&FilterOption> {
        self.options.iter().find(|o| o.key == key)
    }
}

/// A `WHERE` fragment (without the `WHERE` keyword) and its bound values.
#[derive(Debug, Clone, PartialEq)]
pub struct WhereClause {
    pub where_conditions: String,
    pub values: Vec<Value>,
}

impl WhereClause {
    pub fn next_placeholder(&self) -> usize {
        self.values.len() + 1
    }
}

/// Build an `AND`-joined condition list for the keys of `filters`, in
/// iteration order.
///
/// # Errors
/// - [`SqlError::NoData`] when `filters` is empty.
/// - [`SqlError::UnknownFilter`] when a key has no entry in `options`.
pub fn filter_clause(filters: &Map<String, Value>, options: &FilterOptions) -> Result<WhereClause, SqlError> {
    if filters.is_empty() {
        return Err(SqlError::NoData);
    }

    let mut conditions = Vec::with_capacity(filters.len());
    let mut values = Vec::with_capacity(filters.len());

    for (idx, (key, value)) in filters.iter().enumerate() {
        let option = options
            .lookup(key)
            .ok_or_else(|| SqlError::UnknownFilter(key.clone()))?;

        let value = if option.operator.is_pattern() {
            wrap_pattern(value)
        } else {
            value.clone()
        };

        conditions.push(format!(
            "{} {} ${}",
            quote_ident(option.column),
            option.operator,
            idx + 1
        ));
        values.push(value);
    }

    tracing::trace!(conditions = conditions.len(), "built filter clause");
    Ok(WhereClause {
        where_conditions: conditions.join(" AND "),
        values,
    })
}

fn wrap_pattern(value: &Value) -> Value {
    match value {
        Value::String(s) => Value::String(format!("%{s}%")),
        other => Value::String(format!("%{other}%")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const COMPANY_FILTERS: FilterOptions = FilterOptions::new(&[
        FilterOption::new("nameLike", "name", Operator::ILike),
        FilterOption::new("minEmployees", "num_employees", Operator::Gte),
        FilterOption::new("maxEmployees", "num_employees", Operator::Lte),
        FilterOption::new("handle", "handle", Operator::Eq),
    ]);

    fn object(value: Value) -> Map<String, Value> {
        value.as_object().cloned().expect("test filters must be an object")
    }

    #[test]
    fn builds_conditions_and_wraps_pattern_values() {
        let filters = object(json!({ "nameLike": "c2", "minEmployees": 2, "maxEmployees": 3 }));

        let clause = filter_clause(&filters, &COMPANY_FILTERS).expect("known filters");

        assert_eq!(
            clause.where_conditions,
            r#""name" ILIKE $1 AND "num_employees" >= $2 AND "num_employees" <= $3"#
        );
        assert_eq!(clause.values, vec![json!("%c2%"), json!(2), json!(3)]);
        assert_eq!(clause.next_placeholder(), 4);
    }

    #[test]
    fn non_pattern_values_pass_through_unchanged() {
        let filters = object(json!({ "handle": "c1", "maxEmployees": 10 }));

        let clause = filter_clause(&filters, &COMPANY_FILTERS).unwrap();

        assert_eq!(clause.where_conditions, r#""handle" = $1 AND "num_employees" <= $2"#);
        assert_eq!(clause.values, vec![json!("c1"), json!(10)]);
    }

    #[test]
    fn single_filter_has_no_and() {
        let filters = object(json!({ "nameLike": "net" }));

        let clause = filter_clause(&filters, &COMPANY_FILTERS).unwrap();

        assert_eq!(clause.where_conditions, r#""name" ILIKE $1"#);
        assert_eq!(clause.values, vec![json!("%net%")]);
    }

    #[test]
    fn pattern_wraps_non_string_values_as_text() {
        let filters = object(json!({ "nameLike": 42 }));

        let clause = filter_clause(&filters, &COMPANY_FILTERS).unwrap();

        assert_eq!(clause.values, vec![json!("%42%")]);
    }

    #[test]
    fn caller_payload_is_not_mutated() {
        let filters = object(json!({ "nameLike": "c2" }));

        filter_clause(&filters, &COMPANY_FILTERS).unwrap();

        assert_eq!(filters["nameLike"], json!("c2"));
    }

    #[test]
    fn empty_filters_are_rejected() {
        assert_eq!(
            filter_clause(&Map::new(), &COMPANY_FILTERS).unwrap_err(),
            SqlError::NoData
        );
    }

    #[test]
    fn unknown_filter_key_is_rejected() {
        let filters = object(json!({ "nameLike": "c", "favoriteColor": "blue" }));

        let err = filter_clause(&filters, &COMPANY_FILTERS).unwrap_err();

        assert_eq!(err, SqlError::UnknownFilter("favoriteColor".to_string()));
    }

    #[test]
    fn operator_sql_text() {
        assert_eq!(Operator::Eq.to_string(), "=");
        assert_eq!(Operator::ILike.to_string(), "ILIKE");
        assert_eq!(Operator::Gte.to_string(), ">=");
        assert_eq!(Operator::Lte.to_string(), "<=");
        assert!(Operator::ILike.is_pattern());
        assert!(!Operator::Gte.is_pattern());
    }
}
