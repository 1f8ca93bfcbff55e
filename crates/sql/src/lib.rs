//! `sql` crate: parameterized statement fragments for Postgres.
//!
//! Builds the dynamic parts of single-table statements:
//! - partial-update `SET` clauses ([`partial_update`]),
//! - filter `WHERE` clauses ([`filter_clause`]).
//!
//! Every value is returned as a positional `$N` parameter, never interpolated
//! into the SQL text. Identifiers are double-quoted.  No I/O happens here.

pub mod error;
pub mod columns;
pub mod update;
pub mod filter;

pub use error::SqlError;
pub use columns::{quote_ident, ColumnMapper, ColumnMapping};
pub use update::{partial_update, SetClause};
pub use filter::{filter_clause, FilterOption, FilterOptions, Operator, WhereClause};
