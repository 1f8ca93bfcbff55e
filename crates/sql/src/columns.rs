//! Logical field name → physical column name mapping.
//!
//! API payloads use camelCase keys (`firstName`), the schema uses snake_case
//! columns (`first_name`).  A [`ColumnMapper`] is a static, ordered list of the
//! renames a table needs; keys it does not know are used verbatim.

/// One logical key → column rename.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMapping {
    pub key: &'static str,
    pub column: &'static str,
}

impl ColumnMapping {
    pub const fn new(key: &'static str, column: &'static str) -> Self {
        Self { key, column }
    }
}

/// Ordered set of [`ColumnMapping`]s for one table.
#[derive(Debug, Clone, Copy, Default)]
pub struct ColumnMapper {
    mappings: &'static [ColumnMapping],
}

impl ColumnMapper {
    /// Build a mapper over a static table of renames.
    pub const fn new(mappings: &'static [ColumnMapping]) -> Self {
        Self { mappings }
    }

    /// A mapper with no renames; every key is its own column.
    pub const fn identity() -> Self {
        Self { mappings: &[] }
    }

    /// Resolve `key` to its physical column, falling back to `key` itself.
    pub fn resolve<'k>(&self, key: &'k str) -> &'k str {
        self.mappings
            .iter()
            .find(|m| m.key == key)
            .map(|m| m.column)
            .unwrap_or(key)
    }
}

/// Quote a Postgres identifier: wrap in double quotes and double any embedded
/// double quote, so the result can never terminate the identifier early.
pub fn quote_ident(ident: &str) -> String {
    let mut out = String::with_capacity(ident.len() + 2);
    out.push('"');
    for ch in ident.chars() {
        if ch == '"' {
            out.push('"');
        }
        out.push(ch);
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const USERS: ColumnMapper = ColumnMapper::new(&[
        ColumnMapping::new("firstName", "first_name"),
        ColumnMapping::new("lastName", "last_name"),
        ColumnMapping::new("isAdmin", "is_admin"),
    ]);

    #[test]
    fn mapped_key_resolves_to_column() {
        assert_eq!(USERS.resolve("firstName"), "first_name");
        assert_eq!(USERS.resolve("isAdmin"), "is_admin");
    }

    #[test]
    fn unmapped_key_resolves_to_itself() {
        assert_eq!(USERS.resolve("email"), "email");
        assert_eq!(ColumnMapper::identity().resolve("title"), "title");
    }

    #[test]
    fn quote_ident_doubles_embedded_quotes() {
        assert_eq!(quote_ident("first_name"), "\"first_name\"");
        assert_eq!(quote_ident("a\"b"), "\"a\"\"b\"");
        assert_eq!(
            quote_ident("x\"=1; DROP TABLE users; --"),
            "\"x\"\"=1; DROP TABLE users; --\""
        );
    }
}
