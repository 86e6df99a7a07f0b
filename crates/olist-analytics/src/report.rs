//! Report generation over the query-result mapping.
//!
//! This is the presentation boundary: everything here consumes the
//! name→table mapping read-only and renders it as JSON or Markdown for the
//! dashboard. The headline numbers mirror the stat cards the dashboard
//! shows (revenue year over year, delivery rate, top category).

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use olist_domain::{DataTable, Value};
use serde::Serialize;

use crate::catalog::QueryName;
use crate::error::{AnalyticsError, Result};

/// Rows shown per table in the Markdown rendering; full tables go to JSON.
const MARKDOWN_ROW_LIMIT: usize = 20;

/// Headline statistics derived from the query results.
#[derive(Debug, Clone, Serialize)]
pub struct HeadlineStats {
    pub total_revenue_2017: f64,
    pub total_revenue_2018: f64,
    pub delivered_orders: i64,
    pub total_orders: i64,
    pub delivery_rate_pct: f64,
    pub uncompleted_orders: i64,
    pub top_category: Option<TopCategory>,
}

/// The category with the greatest delivered revenue.
#[derive(Debug, Clone, Serialize)]
pub struct TopCategory {
    pub name: String,
    pub orders: i64,
    pub revenue: f64,
}

/// Derive headline numbers from the result mapping.
///
/// Returns `None` when the mapping lacks the tables the numbers come from
/// (which a full `run_queries` pass never does).
#[must_use]
pub fn headline_stats(results: &BTreeMap<String, DataTable>) -> Option<HeadlineStats> {
    let revenue = results.get(QueryName::RevenueByMonthYear.as_str())?;
    let statuses = results.get(QueryName::GlobalAmountOrderStatus.as_str())?;
    let top = results.get(QueryName::Top10RevenueCategories.as_str())?;

    let total_revenue_2017 = column_sum(revenue, "Year2017");
    let total_revenue_2018 = column_sum(revenue, "Year2018");

    let mut delivered_orders = 0;
    let mut total_orders = 0;
    for (row, _) in statuses.rows.iter().enumerate() {
        let amount = statuses
            .get(row, "Amount")
            .and_then(Value::as_i64)
            .unwrap_or(0);
        total_orders += amount;
        if statuses.get(row, "order_status").and_then(Value::as_str) == Some("delivered") {
            delivered_orders += amount;
        }
    }
    let delivery_rate_pct = if total_orders > 0 {
        delivered_orders as f64 / total_orders as f64 * 100.0
    } else {
        0.0
    };

    let top_category = (!top.is_empty()).then(|| TopCategory {
        name: top
            .get(0, "Category")
            .and_then(Value::as_str)
            .map(title_case)
            .unwrap_or_default(),
        orders: top.get(0, "Num_order").and_then(Value::as_i64).unwrap_or(0),
        revenue: top.get(0, "Revenue").and_then(Value::as_f64).unwrap_or(0.0),
    });

    Some(HeadlineStats {
        total_revenue_2017,
        total_revenue_2018,
        delivered_orders,
        total_orders,
        delivery_rate_pct,
        uncompleted_orders: total_orders - delivered_orders,
        top_category,
    })
}

/// Render the full result mapping as pretty JSON.
pub fn render_json(results: &BTreeMap<String, DataTable>) -> Result<String> {
    serde_json::to_string_pretty(results).map_err(|e| AnalyticsError::Render(e.to_string()))
}

/// Render a Markdown report: headline stats plus one table per query,
/// in catalog order.
#[must_use]
pub fn render_markdown(results: &BTreeMap<String, DataTable>) -> String {
    let mut md = String::new();
    md.push_str("# Olist Marketplace Report\n\n");
    md.push_str(&format!("**Generated:** {}\n\n", Utc::now().to_rfc3339()));

    if let Some(stats) = headline_stats(results) {
        md.push_str("## Headline\n\n");
        md.push_str("| Metric | Value |\n");
        md.push_str("|--------|-------|\n");
        md.push_str(&format!(
            "| Total Revenue 2018 | ${:.0} |\n",
            stats.total_revenue_2018
        ));
        md.push_str(&format!(
            "| Total Revenue 2017 | ${:.0} |\n",
            stats.total_revenue_2017
        ));
        md.push_str(&format!(
            "| Successful Deliveries | {} ({:.1}% of {}) |\n",
            stats.delivered_orders, stats.delivery_rate_pct, stats.total_orders
        ));
        md.push_str(&format!(
            "| Uncompleted Orders | {} |\n",
            stats.uncompleted_orders
        ));
        if let Some(ref top) = stats.top_category {
            md.push_str(&format!(
                "| Top Category | {} ({} orders, ${:.0}) |\n",
                top.name, top.orders, top.revenue
            ));
        }
        md.push('\n');
    }

    for name in QueryName::ALL {
        if let Some(table) = results.get(name.as_str()) {
            md.push_str(&format!("## {}\n\n", title_case(name.as_str())));
            md.push_str(&table_markdown(table));
            md.push('\n');
        }
    }

    md
}

fn table_markdown(table: &DataTable) -> String {
    if table.is_empty() {
        return "_no rows_\n".to_string();
    }

    let mut md = String::new();
    md.push_str(&format!("| {} |\n", table.columns.join(" | ")));
    md.push_str(&format!(
        "|{}\n",
        "---|".repeat(table.columns.len())
    ));
    for row in table.rows.iter().take(MARKDOWN_ROW_LIMIT) {
        let cells: Vec<String> = row.iter().map(format_value).collect();
        md.push_str(&format!("| {} |\n", cells.join(" | ")));
    }
    if table.len() > MARKDOWN_ROW_LIMIT {
        md.push_str(&format!(
            "\n_{} more rows_\n",
            table.len() - MARKDOWN_ROW_LIMIT
        ));
    }
    md
}

fn format_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Int(v) => v.to_string(),
        Value::Float(v) => format!("{v:.2}"),
        Value::Text(s) => s.clone(),
        Value::Timestamp(ms) => DateTime::from_timestamp_millis(*ms)
            .map(|dt| dt.naive_utc().to_string())
            .unwrap_or_default(),
    }
}

fn column_sum(table: &DataTable, column: &str) -> f64 {
    table
        .column(column)
        .map(|values| values.filter_map(Value::as_f64).sum())
        .unwrap_or(0.0)
}

fn title_case(name: &str) -> String {
    name.split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_results() -> BTreeMap<String, DataTable> {
        let mut revenue = DataTable::new(vec![
            "month".into(),
            "Year2016".into(),
            "Year2017".into(),
            "Year2018".into(),
        ]);
        revenue.push_row(vec![
            Value::Text("Jan".into()),
            Value::Float(0.0),
            Value::Float(100.0),
            Value::Float(150.0),
        ]);
        revenue.push_row(vec![
            Value::Text("Feb".into()),
            Value::Float(0.0),
            Value::Float(50.0),
            Value::Float(250.0),
        ]);

        let mut statuses = DataTable::new(vec!["order_status".into(), "Amount".into()]);
        statuses.push_row(vec![Value::Text("canceled".into()), Value::Int(5)]);
        statuses.push_row(vec![Value::Text("delivered".into()), Value::Int(95)]);

        let mut top = DataTable::new(vec![
            "Category".into(),
            "Num_order".into(),
            "Revenue".into(),
        ]);
        top.push_row(vec![
            Value::Text("bed_bath_table".into()),
            Value::Int(40),
            Value::Float(1234.5),
        ]);

        BTreeMap::from([
            ("revenue_by_month_year".to_string(), revenue),
            ("global_amount_order_status".to_string(), statuses),
            ("top_10_revenue_categories".to_string(), top),
        ])
    }

    #[test]
    fn test_headline_stats_values() {
        let stats = headline_stats(&sample_results()).unwrap();
        assert_eq!(stats.total_revenue_2017, 150.0);
        assert_eq!(stats.total_revenue_2018, 400.0);
        assert_eq!(stats.delivered_orders, 95);
        assert_eq!(stats.total_orders, 100);
        assert_eq!(stats.uncompleted_orders, 5);
        assert!((stats.delivery_rate_pct - 95.0).abs() < 1e-9);

        let top = stats.top_category.unwrap();
        assert_eq!(top.name, "Bed Bath Table");
        assert_eq!(top.orders, 40);
    }

    #[test]
    fn test_headline_stats_requires_source_tables() {
        assert!(headline_stats(&BTreeMap::new()).is_none());
    }

    #[test]
    fn test_markdown_contains_tables_and_stats() {
        let md = render_markdown(&sample_results());
        assert!(md.contains("## Headline"));
        assert!(md.contains("| Total Revenue 2018 | $400 |"));
        assert!(md.contains("## Revenue By Month Year"));
        assert!(md.contains("| Jan | 0.00 | 100.00 | 150.00 |"));
    }

    #[test]
    fn test_json_round_trips() {
        let json = render_json(&sample_results()).unwrap();
        let parsed: BTreeMap<String, DataTable> = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, sample_results());
    }
}
