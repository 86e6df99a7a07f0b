//! Pipeline configuration.
//!
//! One explicit struct, resolved once at startup from CLI arguments with
//! environment fallbacks, and passed by reference into the stages. No
//! process-wide mutable state.

use std::env;
use std::path::PathBuf;

use crate::Args;

const DEFAULT_DATASET_DIR: &str = "dataset";
const DEFAULT_DATABASE: &str = "olist.duckdb";
const DEFAULT_HOLIDAYS_URL: &str = "https://date.nager.at/api/v3/publicholidays";
const DEFAULT_HOLIDAY_YEAR: i32 = 2017;

/// Resolved pipeline configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding the nine source CSV files
    pub dataset_dir: PathBuf,

    /// Store file; present-and-non-empty skips extract/load
    pub database_path: PathBuf,

    /// Holiday feed base URL
    pub holidays_url: String,

    /// Year requested from the holiday feed
    pub holiday_year: i32,

    /// Optional Markdown report output
    pub report_path: Option<PathBuf>,

    /// Optional JSON report output
    pub json_path: Option<PathBuf>,

    /// Re-run extract/load even when the store already exists
    pub force_reload: bool,
}

impl Config {
    /// Resolve configuration: CLI argument, then environment, then default.
    pub fn resolve(args: Args) -> Self {
        Self {
            dataset_dir: args
                .dataset_dir
                .or_else(|| env::var("OLIST_DATASET_DIR").ok().map(PathBuf::from))
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATASET_DIR)),

            database_path: args
                .database
                .or_else(|| env::var("OLIST_DATABASE").ok().map(PathBuf::from))
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE)),

            holidays_url: args
                .holidays_url
                .or_else(|| env::var("OLIST_HOLIDAYS_URL").ok())
                .unwrap_or_else(|| DEFAULT_HOLIDAYS_URL.to_string()),

            holiday_year: args
                .holiday_year
                .or_else(|| {
                    env::var("OLIST_HOLIDAY_YEAR")
                        .ok()
                        .and_then(|v| v.parse().ok())
                })
                .unwrap_or(DEFAULT_HOLIDAY_YEAR),

            report_path: args.report,
            json_path: args.json,
            force_reload: args.force_reload,
        }
    }
}
