//! # Olist Store
//!
//! Store accessor for the ELT pipeline: a thin handle over a DuckDB
//! database providing whole-table reads and writes plus execution of text
//! queries collected into [`olist_domain::DataTable`]s.
//!
//! The store has exactly one writer (the loader, once per run) and is
//! read-only afterwards, so no locking layer exists here.

#![forbid(unsafe_code)]
#![warn(clippy::all)]

pub mod error;
pub mod store;

pub use error::{Result, StoreError};
pub use store::{database_exists, Store};
