//! Store error types.

use thiserror::Error;

/// Store errors.
#[derive(Error, Debug)]
pub enum StoreError {
    /// DuckDB error (open failure, bad SQL, corrupt database file)
    #[error("DuckDB error: {0}")]
    DuckDb(#[from] duckdb::Error),

    /// A result cell held a DuckDB type with no tabular mapping
    #[error("Unsupported column type: {0}")]
    UnsupportedType(String),

    /// A table was written with a malformed shape
    #[error("Invalid table '{table}': {reason}")]
    InvalidTable { table: String, reason: String },
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
