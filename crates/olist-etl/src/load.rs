//! Load stage: write extracted tables into the store.

use std::collections::BTreeMap;

use olist_domain::DataTable;
use olist_store::Store;
use tracing::info;

use crate::error::Result;

/// Write every extracted table to the store, replacing existing tables.
pub fn load(tables: &BTreeMap<String, DataTable>, store: &Store) -> Result<()> {
    for (name, table) in tables {
        store.replace_table(name, table)?;
        info!(table = %name, rows = table.len(), "loaded table");
    }
    Ok(())
}
