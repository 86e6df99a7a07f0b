//! DuckDB store handle.

use std::path::Path;

use duckdb::types::{TimeUnit, Value as SqlValue, ValueRef};
use duckdb::{appender_params_from_iter, Connection};
use olist_domain::{DataTable, Value};
use tracing::debug;

use crate::error::{Result, StoreError};

const MS_PER_DAY: i64 = 86_400_000;

/// Whether a store file is already populated: present and non-zero size.
///
/// This is the sole signal the pipeline uses to skip extract/load.
#[must_use]
pub fn database_exists<P: AsRef<Path>>(path: P) -> bool {
    std::fs::metadata(path).map(|m| m.len() > 0).unwrap_or(false)
}

/// Handle to the relational store.
pub struct Store {
    conn: Connection,
}

impl Store {
    /// Open (or create) a file-backed store.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        Ok(Self { conn })
    }

    /// Open an in-memory store.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn })
    }

    /// Execute one or more statements without collecting results.
    pub fn execute_batch(&self, sql: &str) -> Result<()> {
        self.conn.execute_batch(sql)?;
        Ok(())
    }

    /// Execute a text query and collect the full result set.
    pub fn query(&self, sql: &str) -> Result<DataTable> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query([])?;

        let columns = rows
            .as_ref()
            .map(|s| s.column_names())
            .unwrap_or_default();
        let width = columns.len();
        let mut table = DataTable::new(columns);

        while let Some(row) = rows.next()? {
            let mut out = Vec::with_capacity(width);
            for idx in 0..width {
                out.push(from_sql_ref(row.get_ref(idx)?)?);
            }
            table.push_row(out);
        }

        Ok(table)
    }

    /// Read an entire table.
    pub fn read_table(&self, name: &str) -> Result<DataTable> {
        self.query(&format!("SELECT * FROM {}", quote_ident(name)))
    }

    /// Write a whole table, replacing any existing table of the same name.
    ///
    /// Column types are inferred from the values present; loading the same
    /// table twice yields identical contents (replace, never append).
    pub fn replace_table(&self, name: &str, table: &DataTable) -> Result<()> {
        if table.columns.is_empty() {
            return Err(StoreError::InvalidTable {
                table: name.to_string(),
                reason: "no columns".to_string(),
            });
        }

        let ident = quote_ident(name);
        self.conn
            .execute_batch(&format!("DROP TABLE IF EXISTS {ident}"))?;

        let ddl_columns = table
            .columns
            .iter()
            .enumerate()
            .map(|(idx, col)| format!("{} {}", quote_ident(col), column_sql_type(table, idx)))
            .collect::<Vec<_>>()
            .join(", ");
        self.conn
            .execute_batch(&format!("CREATE TABLE {ident} ({ddl_columns})"))?;

        let mut appender = self.conn.appender(name)?;
        for row in &table.rows {
            appender.append_row(appender_params_from_iter(row.iter().map(to_sql_value)))?;
        }
        appender.flush()?;

        debug!(table = name, rows = table.len(), "table replaced");
        Ok(())
    }
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// DuckDB column type for one table column, from the values it holds.
fn column_sql_type(table: &DataTable, idx: usize) -> &'static str {
    let mut saw_int = false;
    let mut saw_float = false;
    let mut saw_bool = false;
    let mut saw_ts = false;

    for row in &table.rows {
        match &row[idx] {
            Value::Null => {}
            Value::Int(_) => saw_int = true,
            Value::Float(_) => saw_float = true,
            Value::Bool(_) => saw_bool = true,
            Value::Timestamp(_) => saw_ts = true,
            Value::Text(_) => return "VARCHAR",
        }
    }

    if saw_float {
        "DOUBLE"
    } else if saw_int {
        "BIGINT"
    } else if saw_ts {
        "TIMESTAMP"
    } else if saw_bool {
        "BOOLEAN"
    } else {
        // all-null column
        "VARCHAR"
    }
}

fn to_sql_value(value: &Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Bool(b) => SqlValue::Boolean(*b),
        Value::Int(v) => SqlValue::BigInt(*v),
        Value::Float(v) => SqlValue::Double(*v),
        Value::Text(s) => SqlValue::Text(s.clone()),
        Value::Timestamp(ms) => SqlValue::Timestamp(TimeUnit::Millisecond, *ms),
    }
}

fn from_sql_ref(value: ValueRef<'_>) -> Result<Value> {
    Ok(match value {
        ValueRef::Null => Value::Null,
        ValueRef::Boolean(b) => Value::Bool(b),
        ValueRef::TinyInt(v) => Value::Int(v as i64),
        ValueRef::SmallInt(v) => Value::Int(v as i64),
        ValueRef::Int(v) => Value::Int(v as i64),
        ValueRef::BigInt(v) => Value::Int(v),
        ValueRef::UTinyInt(v) => Value::Int(v as i64),
        ValueRef::USmallInt(v) => Value::Int(v as i64),
        ValueRef::UInt(v) => Value::Int(v as i64),
        ValueRef::UBigInt(v) => Value::Int(v as i64),
        ValueRef::Float(v) => Value::Float(v as f64),
        ValueRef::Double(v) => Value::Float(v),
        ValueRef::Decimal(d) => {
            let parsed = d
                .to_string()
                .parse::<f64>()
                .map_err(|_| StoreError::UnsupportedType(format!("DECIMAL {d}")))?;
            Value::Float(parsed)
        }
        ValueRef::Text(bytes) => {
            let text = std::str::from_utf8(bytes)
                .map_err(|_| StoreError::UnsupportedType("non-UTF8 text".to_string()))?;
            Value::Text(text.to_string())
        }
        ValueRef::Timestamp(unit, v) => Value::Timestamp(to_millis(unit, v)),
        ValueRef::Date32(days) => Value::Timestamp(days as i64 * MS_PER_DAY),
        other => {
            return Err(StoreError::UnsupportedType(format!("{other:?}")));
        }
    })
}

fn to_millis(unit: TimeUnit, v: i64) -> i64 {
    match unit {
        TimeUnit::Second => v * 1_000,
        TimeUnit::Millisecond => v,
        TimeUnit::Microsecond => v / 1_000,
        TimeUnit::Nanosecond => v / 1_000_000,
    }
}
