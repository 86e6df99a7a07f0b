//! Per-day order counts joined against the public-holiday calendar.

use std::collections::{BTreeMap, HashSet};

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use olist_domain::{DataTable, Value};
use olist_store::Store;

use crate::catalog::{QueryName, QueryResult};
use crate::error::{AnalyticsError, Result};

/// The dashboard's fixed analysis year.
const TARGET_YEAR: i32 = 2017;

/// Orders placed per calendar day in 2017, with a holiday flag.
///
/// One row per distinct purchase date with at least one order; dates with no
/// orders are absent, not zero-filled. Holiday membership is decided on the
/// calendar date itself, before the date is widened to an epoch-millisecond
/// timestamp for the output.
pub(crate) fn orders_per_day_and_holidays_2017(store: &Store) -> Result<QueryResult> {
    let holidays = store.read_table("public_holidays")?;
    let orders = store.read_table("olist_orders")?;

    let date_idx = required(&holidays, "public_holidays", "date")?;
    let purchase_idx = required(&orders, "olist_orders", "order_purchase_timestamp")?;

    let holiday_dates: HashSet<NaiveDate> = holidays
        .rows
        .iter()
        .filter_map(|r| r[date_idx].as_date())
        .collect();

    let mut counts: BTreeMap<NaiveDate, i64> = BTreeMap::new();
    for row in &orders.rows {
        let Some(purchased) = row[purchase_idx].as_datetime() else {
            continue;
        };
        let date = purchased.date();
        if chrono::Datelike::year(&date) == TARGET_YEAR {
            *counts.entry(date).or_insert(0) += 1;
        }
    }

    let mut table = DataTable::new(vec![
        "order_count".into(),
        "date".into(),
        "holiday".into(),
    ]);
    for (date, count) in counts {
        let holiday = holiday_dates.contains(&date);
        table.push_row(vec![
            Value::Int(count),
            Value::Int(midnight_epoch_ms(date)),
            Value::Bool(holiday),
        ]);
    }

    Ok(QueryResult {
        name: QueryName::OrdersPerDayAndHolidays2017,
        table,
    })
}

fn midnight_epoch_ms(date: NaiveDate) -> i64 {
    NaiveDateTime::new(date, NaiveTime::MIN)
        .and_utc()
        .timestamp_millis()
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

    const JAN_1_2017_MS: i64 = 1_483_228_800_000;
    const JAN_2_2017_MS: i64 = 1_483_315_200_000;

    fn store_with_orders(timestamps: &[&str]) -> Store {
        let store = Store::open_in_memory().unwrap();
        store
            .execute_batch(
                r#"
                CREATE TABLE public_holidays (date TIMESTAMP, name VARCHAR);
                CREATE TABLE olist_orders (
                    order_id VARCHAR, order_purchase_timestamp VARCHAR);
                INSERT INTO public_holidays VALUES
                    (TIMESTAMP '2017-01-01 00:00:00', 'New Year''s Day');
                "#,
            )
            .unwrap();
        for (i, ts) in timestamps.iter().enumerate() {
            store
                .execute_batch(&format!(
                    "INSERT INTO olist_orders VALUES ('o{i}', '{ts}')"
                ))
                .unwrap();
        }
        store
    }

    #[test]
    fn test_counts_and_holiday_flags_are_exact() {
        let store = store_with_orders(&[
            "2017-01-01 08:00:00",
            "2017-01-01 21:15:00",
            "2017-01-02 09:30:00",
        ]);

        let table = orders_per_day_and_holidays_2017(&store).unwrap().table;

        assert_eq!(table.columns, vec!["order_count", "date", "holiday"]);
        assert_eq!(table.len(), 2);

        assert_eq!(table.get(0, "order_count"), Some(&Value::Int(2)));
        assert_eq!(table.get(0, "date"), Some(&Value::Int(JAN_1_2017_MS)));
        assert_eq!(table.get(0, "holiday"), Some(&Value::Bool(true)));

        assert_eq!(table.get(1, "order_count"), Some(&Value::Int(1)));
        assert_eq!(table.get(1, "date"), Some(&Value::Int(JAN_2_2017_MS)));
        assert_eq!(table.get(1, "holiday"), Some(&Value::Bool(false)));
    }

    #[test]
    fn test_other_years_are_excluded() {
        let store = store_with_orders(&[
            "2016-12-31 23:59:59",
            "2017-01-02 00:00:00",
            "2018-01-01 00:00:00",
        ]);

        let table = orders_per_day_and_holidays_2017(&store).unwrap().table;
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(0, "date"), Some(&Value::Int(JAN_2_2017_MS)));
    }

    #[test]
    fn test_no_orders_yields_empty_table() {
        let store = store_with_orders(&[]);
        let table = orders_per_day_and_holidays_2017(&store).unwrap().table;
        assert!(table.is_empty());
    }

    #[test]
    fn test_holiday_match_is_day_granular() {
        // Purchases late in the day still match a holiday stored at midnight.
        let store = store_with_orders(&["2017-01-01 23:59:59"]);
        let table = orders_per_day_and_holidays_2017(&store).unwrap().table;
        assert_eq!(table.get(0, "holiday"), Some(&Value::Bool(true)));
    }
}
