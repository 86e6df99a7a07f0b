//! # Olist ELT - Domain Model
//!
//! Shared tabular value model for the ELT pipeline. A [`DataTable`] is the
//! unit of exchange between every layer: the extractor produces them from
//! CSV files and the holiday feed, the loader writes them to the store, and
//! the transform engine returns one per named analytical query.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

// =============================================================================
// SCALAR VALUES
// =============================================================================

/// A single cell value.
///
/// `Timestamp` carries milliseconds since the Unix epoch (UTC), matching the
/// wire representation the dashboard consumes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Timestamp(i64),
}

impl Value {
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Numeric view, widening integers to `f64`.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(v) => Some(*v as f64),
            Value::Float(v) => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            Value::Timestamp(v) => Some(*v),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Day-granularity view of a temporal value.
    ///
    /// Accepts epoch-millisecond timestamps as well as the textual forms the
    /// source CSVs carry (`2017-10-02 10:56:33`, ISO dates).
    #[must_use]
    pub fn as_date(&self) -> Option<NaiveDate> {
        self.as_datetime().map(|dt| dt.date())
    }

    /// Full datetime view of a temporal value.
    #[must_use]
    pub fn as_datetime(&self) -> Option<NaiveDateTime> {
        match self {
            Value::Timestamp(ms) => {
                DateTime::from_timestamp_millis(*ms).map(|dt| dt.naive_utc())
            }
            Value::Text(s) => parse_datetime(s),
            _ => None,
        }
    }
}

fn parse_datetime(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S"))
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

// =============================================================================
// DATA TABLES
// =============================================================================

/// An ordered, in-memory table: named columns and rows of [`Value`]s.
///
/// Tables are built once and read-only afterwards; nothing downstream of the
/// transform engine mutates them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl DataTable {
    #[must_use]
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<Value>) {
        debug_assert_eq!(row.len(), self.columns.len());
        self.rows.push(row);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column by name.
    #[must_use]
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Cell lookup by row index and column name.
    #[must_use]
    pub fn get(&self, row: usize, column: &str) -> Option<&Value> {
        let idx = self.column_index(column)?;
        self.rows.get(row)?.get(idx)
    }

    /// Iterate one column by name.
    pub fn column<'a>(&'a self, name: &str) -> Option<impl Iterator<Item = &'a Value>> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().filter_map(move |r| r.get(idx)))
    }
}
