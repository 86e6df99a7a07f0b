//! ETL error types.

use thiserror::Error;

/// Extract/load errors. All are fatal to the run; nothing retries.
#[derive(Error, Debug)]
pub enum EtlError {
    /// CSV read or parse failure
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Filesystem failure reading a source file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Holiday feed failure (connection error or non-2xx response)
    #[error("Holiday feed error: {0}")]
    Http(#[from] reqwest::Error),

    /// Store write failure while loading
    #[error(transparent)]
    Store(#[from] olist_store::StoreError),
}

/// Result type for ETL operations.
pub type Result<T> = std::result::Result<T, EtlError>;
