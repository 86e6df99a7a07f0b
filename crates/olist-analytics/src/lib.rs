//! # Olist Analytics
//!
//! Query catalog and transform engine: the fixed set of nine named
//! analytical queries the dashboard is built from.
//!
//! Seven queries execute embedded SQL against the store; two are computed
//! in memory from raw tables:
//!
//! - freight value / product weight per delivered order
//! - orders per day in 2017, flagged against the public-holiday calendar
//!
//! [`run_queries`] produces the name→table mapping that is the sole
//! contract toward the presentation layer ([`report`]).

#![forbid(unsafe_code)]
#![warn(clippy::all)]

pub mod calendar;
pub mod catalog;
pub mod error;
pub mod freight;
pub mod report;

pub use catalog::{get_all_queries, run_queries, QueryFn, QueryName, QueryResult};
pub use error::{AnalyticsError, Result};
