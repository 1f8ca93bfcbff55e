//! Typed error type for the sql crate.

use thiserror::Error;

/// Reasons a statement fragment could not be built.
///
/// Both variants are caller mistakes and map to a 400 at the HTTP edge.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SqlError {
    /// The payload had no keys, so there is nothing to set or filter on.
    #[error("No data")]
    NoData,

    /// A filter key has no entry in the filter options table.
    #[error("Unknown filter: {0}")]
    UnknownFilter(String),
}
