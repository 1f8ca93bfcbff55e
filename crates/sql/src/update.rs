//! Partial-update `SET` clause builder.
//!
//! ```text
//! {firstName: "Aliya", age: 32}  =>  "first_name"=$1, "age"=$2   ["Aliya", 32]
//! ```

use serde_json::{Map, Value};

use crate::{columns::quote_ident, ColumnMapper, SqlError};

/// A `SET` fragment together with the values bound to its placeholders.
///
/// `values[i]` is bound to `$i+1`, and to the i-th `column=$N` cell of
/// `set_cols`.
#[derive(Debug, Clone, PartialEq)]
pub struct SetClause {
    pub set_cols: String,
    pub values: Vec<Value>,
}

impl SetClause {
    /// Number of the first placeholder free for the caller (e.g. a `WHERE id = $N`).
    pub fn next_placeholder(&self) -> usize {
        self.values.len() + 1
    }
}

/// Build a `SET` fragment for the keys of `data`, in iteration order.
///
/// A `null` value sets the column to `NULL`; it is not skipped.
///
/// # Errors
/// [`SqlError::NoData`] when `data` is empty.
pub fn partial_update(data: &Map<String, Value>, columns: &ColumnMapper) -> Result<SetClause, SqlError> {
    if data.is_empty() {
        return Err(SqlError::NoData);
    }

    let mut cols = Vec::with_capacity(data.len());
    let mut values = Vec::with_capacity(data.len());

    for (idx, (key, value)) in data.iter().enumerate() {
        cols.push(format!("{}=${}", quote_ident(columns.resolve(key)), idx + 1));
        values.push(value.clone());
    }

    tracing::trace!(columns = cols.len(), "built partial update");

    Ok(SetClause {
        set_cols: cols.join(", "),
        values,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ColumnMapping;
    use serde_json::json;

    const JS_TO_SQL: ColumnMapper = ColumnMapper::new(&[
        ColumnMapping::new("firstName", "first_name"),
        ColumnMapping::new("lastName", "last_name"),
        ColumnMapping::new("isAdmin", "is_admin"),
    ]);

    fn object(value: Value) -> Map<String, Value> {
        value.as_object().cloned().expect("test payload must be an object")
    }

    #[test]
    fn builds_set_cols_and_values_in_order() {
        let data = object(json!({
            "firstName": "First",
            "lastName": "Last",
            "email": "newemail@email.com"
        }));

        let clause = partial_update(&data, &JS_TO_SQL).expect("non-empty payload");

        assert_eq!(clause.set_cols, r#""first_name"=$1, "last_name"=$2, "email"=$3"#);
        assert_eq!(clause.values, vec![json!("First"), json!("Last"), json!("newemail@email.com")]);
        assert_eq!(clause.next_placeholder(), 4);
    }

    #[test]
    fn insertion_order_drives_placeholder_numbering() {
        let data = object(json!({ "email": "e@x.com", "isAdmin": true, "firstName": "F" }));

        let clause = partial_update(&data, &JS_TO_SQL).unwrap();

        assert_eq!(clause.set_cols, r#""email"=$1, "is_admin"=$2, "first_name"=$3"#);
        assert_eq!(clause.values, vec![json!("e@x.com"), json!(true), json!("F")]);
    }

    #[test]
    fn null_values_are_kept() {
        let data = object(json!({ "logoUrl": null, "numEmployees": 3 }));
        const MAPPER: ColumnMapper = ColumnMapper::new(&[
            ColumnMapping::new("numEmployees", "num_employees"),
            ColumnMapping::new("logoUrl", "logo_url"),
        ]);
        let mapper = MAPPER;

        let clause = partial_update(&data, &mapper).unwrap();

        assert_eq!(clause.set_cols, r#""logo_url"=$1, "num_employees"=$2"#);
        assert_eq!(clause.values, vec![Value::Null, json!(3)]);
    }

    #[test]
    fn one_cell_per_value() {
        let data = object(json!({ "a": 1, "b": 2, "c": 3, "d": 4, "e": 5 }));

        let clause = partial_update(&data, &ColumnMapper::identity()).unwrap();

        assert_eq!(clause.set_cols.split(", ").count(), clause.values.len());
        assert_eq!(clause.values.len(), 5);
    }

    #[test]
    fn empty_payload_is_rejected() {
        let err = partial_update(&Map::new(), &JS_TO_SQL).unwrap_err();
        assert_eq!(err, SqlError::NoData);
        assert_eq!(err.to_string(), "No data");
    }
}
