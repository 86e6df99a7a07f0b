//! Freight/weight aggregation.
//!
//! Computed in memory rather than in SQL: raw items, products, and orders
//! are read in full, hash-joined, filtered to delivered orders, and summed
//! per order.

use std::collections::BTreeMap;
use std::collections::HashMap;

use olist_domain::{DataTable, Value};
use olist_store::Store;

use crate::catalog::{QueryName, QueryResult};
use crate::error::{AnalyticsError, Result};

const DELIVERED_STATUS: &str = "delivered";

/// Sum of freight value and product weight per delivered order.
///
/// Inner-join semantics throughout: items without a matching product or
/// order are dropped, and orders with no items never appear. A null
/// `freight_value` or `product_weight_g` is excluded from its sum (a group
/// whose values are all null sums to zero), mirroring how the dashboard's
/// source data treated missing weights.
pub(crate) fn freight_value_weight_relationship(store: &Store) -> Result<QueryResult> {
    let orders = store.read_table("olist_orders")?;
    let items = store.read_table("olist_order_items")?;
    let products = store.read_table("olist_products")?;

    let order_id_idx = required(&orders, "olist_orders", "order_id")?;
    let status_idx = required(&orders, "olist_orders", "order_status")?;
    let item_order_idx = required(&items, "olist_order_items", "order_id")?;
    let item_product_idx = required(&items, "olist_order_items", "product_id")?;
    let freight_idx = required(&items, "olist_order_items", "freight_value")?;
    let product_id_idx = required(&products, "olist_products", "product_id")?;
    let weight_idx = required(&products, "olist_products", "product_weight_g")?;

    // Join keys: order id -> status, product id -> weight (None = null).
    let statuses: HashMap<&str, &str> = orders
        .rows
        .iter()
        .filter_map(|r| {
            Some((r[order_id_idx].as_str()?, r[status_idx].as_str()?))
        })
        .collect();
    let weights: HashMap<&str, Option<f64>> = products
        .rows
        .iter()
        .filter_map(|r| {
            Some((r[product_id_idx].as_str()?, r[weight_idx].as_f64()))
        })
        .collect();

    // Group-by over a BTreeMap keeps output order deterministic.
    let mut sums: BTreeMap<String, (f64, f64)> = BTreeMap::new();
    for row in &items.rows {
        let Some(order_id) = row[item_order_idx].as_str() else {
            continue;
        };
        let Some(product_id) = row[item_product_idx].as_str() else {
            continue;
        };
        // items -> products inner join
        let Some(weight) = weights.get(product_id) else {
            continue;
        };
        // items -> orders inner join, then the delivered filter
        if statuses.get(order_id) != Some(&DELIVERED_STATUS) {
            continue;
        }

        let entry = sums.entry(order_id.to_string()).or_insert((0.0, 0.0));
        if let Some(freight) = row[freight_idx].as_f64() {
            entry.0 += freight;
        }
        if let Some(weight) = weight {
            entry.1 += weight;
        }
    }

    let mut table = DataTable::new(vec![
        "order_id".into(),
        "freight_value".into(),
        "product_weight_g".into(),
    ]);
    for (order_id, (freight, weight)) in sums {
        table.push_row(vec![
            Value::Text(order_id),
            Value::Float(freight),
            Value::Float(weight),
        ]);
    }

    Ok(QueryResult {
        name: QueryName::GetFreightValueWeightRelationship,
        table,
    })
}

fn required(table: &DataTable, table_name: &'static str, column: &'static str) -> Result<usize> {
    table
        .column_index(column)
        .ok_or(AnalyticsError::MissingColumn {
            table: table_name,
            column,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with(orders: &str, items: &str, products: &str) -> Store {
        let store = Store::open_in_memory().unwrap();
        store
            .execute_batch(&format!(
                r#"
                CREATE TABLE olist_orders (order_id VARCHAR, order_status VARCHAR);
                CREATE TABLE olist_order_items (
                    order_id VARCHAR, product_id VARCHAR, freight_value DOUBLE);
                CREATE TABLE olist_products (
                    product_id VARCHAR, product_weight_g BIGINT);
                INSERT INTO olist_orders VALUES {orders};
                INSERT INTO olist_order_items VALUES {items};
                INSERT INTO olist_products VALUES {products};
                "#
            ))
            .unwrap();
        store
    }

    #[test]
    fn test_delivered_orders_are_summed() {
        // O1 delivered with two items, O2 not delivered with one.
        let store = store_with(
            "('O1', 'delivered'), ('O2', 'shipped')",
            "('O1', 'P1', 10.0), ('O1', 'P2', 20.0), ('O2', 'P3', 5.0)",
            "('P1', 100), ('P2', 200), ('P3', 50)",
        );

        let result = freight_value_weight_relationship(&store).unwrap();
        let table = result.table;

        assert_eq!(
            table.columns,
            vec!["order_id", "freight_value", "product_weight_g"]
        );
        assert_eq!(table.len(), 1, "non-delivered orders are excluded");
        assert_eq!(table.get(0, "order_id"), Some(&Value::Text("O1".into())));
        assert_eq!(table.get(0, "freight_value"), Some(&Value::Float(30.0)));
        assert_eq!(
            table.get(0, "product_weight_g"),
            Some(&Value::Float(300.0))
        );
    }

    #[test]
    fn test_order_without_items_is_absent() {
        let store = store_with(
            "('O1', 'delivered'), ('ORPHAN', 'delivered')",
            "('O1', 'P1', 10.0)",
            "('P1', 100)",
        );

        let table = freight_value_weight_relationship(&store).unwrap().table;
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(0, "order_id"), Some(&Value::Text("O1".into())));
    }

    #[test]
    fn test_item_without_product_is_dropped() {
        let store = store_with(
            "('O1', 'delivered')",
            "('O1', 'P1', 10.0), ('O1', 'MISSING', 99.0)",
            "('P1', 100)",
        );

        let table = freight_value_weight_relationship(&store).unwrap().table;
        assert_eq!(table.get(0, "freight_value"), Some(&Value::Float(10.0)));
    }

    #[test]
    fn test_null_weight_is_excluded_from_sum() {
        let store = store_with(
            "('O1', 'delivered')",
            "('O1', 'P1', 10.0), ('O1', 'P2', 20.0)",
            "('P1', 100), ('P2', NULL)",
        );

        let table = freight_value_weight_relationship(&store).unwrap().table;
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(0, "freight_value"), Some(&Value::Float(30.0)));
        assert_eq!(
            table.get(0, "product_weight_g"),
            Some(&Value::Float(100.0))
        );
    }

    #[test]
    fn test_all_null_weights_sum_to_zero() {
        let store = store_with(
            "('O1', 'delivered')",
            "('O1', 'P1', 10.0)",
            "('P1', NULL)",
        );

        let table = freight_value_weight_relationship(&store).unwrap().table;
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(0, "product_weight_g"), Some(&Value::Float(0.0)));
    }

    #[test]
    fn test_no_delivered_orders_yields_empty_table() {
        let store = store_with(
            "('O1', 'canceled')",
            "('O1', 'P1', 10.0)",
            "('P1', 100)",
        );

        let table = freight_value_weight_relationship(&store).unwrap().table;
        assert!(table.is_empty());
    }
}
