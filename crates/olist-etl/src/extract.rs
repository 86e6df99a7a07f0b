//! CSV extraction.
//!
//! Each source CSV maps to one destination table; the header row defines the
//! schema and column types are inferred from the data (integer, float, or
//! text, with empty cells as nulls). The inference matches what the loaded
//! queries expect: id-like hex strings stay textual, measures become numeric,
//! timestamps stay textual and are cast where a query needs them.

use std::collections::BTreeMap;
use std::path::Path;

use olist_domain::{DataTable, Value};
use tracing::{debug, info};

use crate::error::Result;
use crate::holidays::{self, PUBLIC_HOLIDAYS_TABLE};

/// Fixed mapping from source CSV file name to destination table name.
pub const CSV_TABLE_MAPPING: [(&str, &str); 9] = [
    ("olist_customers_dataset.csv", "olist_customers"),
    ("olist_geolocation_dataset.csv", "olist_geolocation"),
    ("olist_order_items_dataset.csv", "olist_order_items"),
    ("olist_order_payments_dataset.csv", "olist_order_payments"),
    ("olist_order_reviews_dataset.csv", "olist_order_reviews"),
    ("olist_orders_dataset.csv", "olist_orders"),
    ("olist_products_dataset.csv", "olist_products"),
    ("olist_sellers_dataset.csv", "olist_sellers"),
    (
        "product_category_name_translation.csv",
        "product_category_name_translation",
    ),
];

/// Narrowest type that fits every non-empty value seen in a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnKind {
    Empty,
    Int,
    Float,
    Text,
}

impl ColumnKind {
    fn widen(self, field: &str) -> ColumnKind {
        match self {
            ColumnKind::Text => ColumnKind::Text,
            ColumnKind::Empty | ColumnKind::Int => {
                if field.parse::<i64>().is_ok() {
                    ColumnKind::Int
                } else if field.parse::<f64>().is_ok() {
                    ColumnKind::Float
                } else {
                    ColumnKind::Text
                }
            }
            ColumnKind::Float => {
                if field.parse::<f64>().is_ok() {
                    ColumnKind::Float
                } else {
                    ColumnKind::Text
                }
            }
        }
    }
}

/// Read one CSV file into a typed [`DataTable`].
pub fn read_csv_table<P: AsRef<Path>>(path: P) -> Result<DataTable> {
    let mut reader = csv::Reader::from_path(path.as_ref())?;
    let columns: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut records = Vec::new();
    for record in reader.records() {
        records.push(record?);
    }

    let mut kinds = vec![ColumnKind::Empty; columns.len()];
    for record in &records {
        for (idx, field) in record.iter().enumerate() {
            if !field.is_empty() {
                kinds[idx] = kinds[idx].widen(field);
            }
        }
    }

    let mut table = DataTable::new(columns);
    for record in &records {
        let row = record
            .iter()
            .zip(&kinds)
            .map(|(field, kind)| convert_field(field, *kind))
            .collect();
        table.push_row(row);
    }

    debug!(
        path = %path.as_ref().display(),
        rows = table.len(),
        "CSV read"
    );
    Ok(table)
}

fn convert_field(field: &str, kind: ColumnKind) -> Value {
    if field.is_empty() {
        return Value::Null;
    }
    match kind {
        ColumnKind::Int => field.parse().map(Value::Int).unwrap_or(Value::Null),
        ColumnKind::Float => field.parse().map(Value::Float).unwrap_or(Value::Null),
        ColumnKind::Empty | ColumnKind::Text => Value::Text(field.to_string()),
    }
}

/// Extract all source tables: the nine CSVs plus the holiday calendar.
pub async fn extract(
    dataset_dir: &Path,
    client: &reqwest::Client,
    holidays_base_url: &str,
    holiday_year: i32,
) -> Result<BTreeMap<String, DataTable>> {
    let mut tables = BTreeMap::new();

    for (file_name, table_name) in CSV_TABLE_MAPPING {
        let table = read_csv_table(dataset_dir.join(file_name))?;
        info!(table = table_name, rows = table.len(), "extracted CSV");
        tables.insert(table_name.to_string(), table);
    }

    let holidays = holidays::fetch_public_holidays(client, holidays_base_url, holiday_year).await?;
    info!(
        table = PUBLIC_HOLIDAYS_TABLE,
        rows = holidays.len(),
        year = holiday_year,
        "fetched public holidays"
    );
    tables.insert(PUBLIC_HOLIDAYS_TABLE.to_string(), holidays);

    Ok(tables)
}
