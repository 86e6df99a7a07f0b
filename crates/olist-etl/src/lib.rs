//! # Olist ETL
//!
//! Extract and load stages of the pipeline.
//!
//! The extractor turns the nine Olist CSV exports into in-memory
//! [`olist_domain::DataTable`]s keyed by destination table name and fetches
//! the Brazilian public-holiday calendar for the target year. The loader
//! writes every table to the store with replace semantics.
//!
//! Both stages are plain I/O wrappers; all analytical logic lives in
//! `olist-analytics`.

#![forbid(unsafe_code)]
#![warn(clippy::all)]

pub mod error;
pub mod extract;
pub mod holidays;
pub mod load;

pub use error::{EtlError, Result};
pub use extract::{extract, read_csv_table, CSV_TABLE_MAPPING};
pub use holidays::{fetch_public_holidays, HolidayRecord, PUBLIC_HOLIDAYS_TABLE};
pub use load::load;
