//! Transform-engine error types.

use olist_store::StoreError;
use thiserror::Error;

/// Analytics errors. The catalog run is all-or-nothing: the first error
/// aborts the run and no partial result map is produced.
#[derive(Error, Debug)]
pub enum AnalyticsError {
    /// A named query's SQL failed to execute (malformed SQL or store failure)
    #[error("query '{name}' failed: {source}")]
    Sql {
        name: &'static str,
        #[source]
        source: StoreError,
    },

    /// A SQL-backed variant had no embedded resource. Unreachable by
    /// construction (resources are embedded at compile time) but kept so the
    /// failure mode is named rather than panicking.
    #[error("query '{name}' has no SQL resource")]
    NoSqlResource { name: &'static str },

    /// Raw-table read failure in a computed query
    #[error(transparent)]
    Store(#[from] StoreError),

    /// A raw table lacked a column a computed query depends on
    #[error("table '{table}' is missing column '{column}'")]
    MissingColumn {
        table: &'static str,
        column: &'static str,
    },

    /// Report serialization failure
    #[error("render error: {0}")]
    Render(String),
}

/// Result type for analytics operations.
pub type Result<T> = std::result::Result<T, AnalyticsError>;
