//! Olist ELT pipeline runner.
//!
//! Extracts the marketplace CSVs and the holiday calendar when the store is
//! absent or empty, loads them into DuckDB, runs the analytical query
//! catalog, and writes the requested report outputs. Any failure aborts the
//! run; there are no retries and no partial results.

mod config;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use olist_analytics::report::{headline_stats, render_json, render_markdown};
use olist_analytics::run_queries;
use olist_etl::{extract, load};
use olist_store::{database_exists, Store};
use tracing::info;
use tracing_subscriber::EnvFilter;

use config::Config;

#[derive(Parser, Debug)]
#[command(name = "olist-elt")]
#[command(about = "Run the Olist marketplace ELT pipeline and query catalog")]
pub struct Args {
    /// Directory holding the source CSV files
    #[arg(long)]
    dataset_dir: Option<PathBuf>,

    /// DuckDB database file
    #[arg(long)]
    database: Option<PathBuf>,

    /// Public-holiday feed base URL
    #[arg(long)]
    holidays_url: Option<String>,

    /// Year to fetch holidays for
    #[arg(long)]
    holiday_year: Option<i32>,

    /// Write a Markdown report to this path
    #[arg(long)]
    report: Option<PathBuf>,

    /// Write the full query results as JSON to this path
    #[arg(long)]
    json: Option<PathBuf>,

    /// Re-run extract/load even if the store already exists
    #[arg(long)]
    force_reload: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config = Config::resolve(Args::parse());
    info!(
        database = %config.database_path.display(),
        dataset = %config.dataset_dir.display(),
        "starting pipeline"
    );

    // Checked before open: opening creates the file.
    let reload = config.force_reload || !database_exists(&config.database_path);
    let store = Store::open(&config.database_path)?;

    if reload {
        info!(year = config.holiday_year, "running extract/load");
        let client = reqwest::Client::new();
        let tables = extract(
            &config.dataset_dir,
            &client,
            &config.holidays_url,
            config.holiday_year,
        )
        .await?;
        load(&tables, &store)?;
    } else {
        info!("store already populated, skipping extract/load");
    }

    let results = run_queries(&store)?;
    info!(queries = results.len(), "query catalog complete");

    if let Some(stats) = headline_stats(&results) {
        info!(
            revenue_2017 = stats.total_revenue_2017,
            revenue_2018 = stats.total_revenue_2018,
            delivered = stats.delivered_orders,
            delivery_rate_pct = stats.delivery_rate_pct,
            "headline stats"
        );
    }

    if let Some(path) = &config.report_path {
        std::fs::write(path, render_markdown(&results))?;
        info!(path = %path.display(), "Markdown report written");
    }

    if let Some(path) = &config.json_path {
        std::fs::write(path, render_json(&results)?)?;
        info!(path = %path.display(), "JSON results written");
    }

    Ok(())
}
