//! Public holiday feed.
//!
//! One GET against the Nager.Date API per run: `{base_url}/{year}/BR`.
//! A connection failure or non-2xx response aborts the run; there are no
//! retries. The feed's `types` and `counties` fields are dropped and the
//! `date` field is parsed to day granularity.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use olist_domain::{DataTable, Value};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Destination table name for the holiday calendar.
pub const PUBLIC_HOLIDAYS_TABLE: &str = "public_holidays";

/// Country segment of the feed URL. The marketplace is Brazilian.
const COUNTRY_CODE: &str = "BR";

/// One holiday as kept after projection.
///
/// The feed also sends `types` and `counties`; omitting them here is the
/// projection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HolidayRecord {
    pub date: NaiveDate,
    pub local_name: String,
    pub name: String,
    pub country_code: String,
    pub fixed: bool,
    pub global: bool,
    pub launch_year: Option<i32>,
}

/// Fetch the holiday calendar for one year.
pub async fn fetch_public_holidays(
    client: &reqwest::Client,
    base_url: &str,
    year: i32,
) -> Result<DataTable> {
    let url = format!("{base_url}/{year}/{COUNTRY_CODE}");
    let records: Vec<HolidayRecord> = client
        .get(&url)
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;

    Ok(holidays_table(&records))
}

/// Build the `public_holidays` table from parsed records.
///
/// `date` is stored as a midnight-UTC timestamp so the store keeps it as a
/// real temporal column rather than text.
pub fn holidays_table(records: &[HolidayRecord]) -> DataTable {
    let mut table = DataTable::new(vec![
        "date".into(),
        "local_name".into(),
        "name".into(),
        "country_code".into(),
        "fixed".into(),
        "global".into(),
        "launch_year".into(),
    ]);

    for record in records {
        table.push_row(vec![
            Value::Timestamp(midnight_epoch_ms(record.date)),
            Value::Text(record.local_name.clone()),
            Value::Text(record.name.clone()),
            Value::Text(record.country_code.clone()),
            Value::Bool(record.fixed),
            Value::Bool(record.global),
            record
                .launch_year
                .map(|y| Value::Int(y as i64))
                .unwrap_or(Value::Null),
        ]);
    }

    table
}

fn midnight_epoch_ms(date: NaiveDate) -> i64 {
    NaiveDateTime::new(date, NaiveTime::MIN)
        .and_utc()
        .timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;

    // Trimmed real response shape from the Nager.Date v3 API, including the
    // two fields the pipeline drops.
    const FEED_FIXTURE: &str = r#"[
        {
            "date": "2017-01-01",
            "localName": "Confraternização Universal",
            "name": "New Year's Day",
            "countryCode": "BR",
            "fixed": true,
            "global": true,
            "counties": null,
            "launchYear": null,
            "types": ["Public"]
        },
        {
            "date": "2017-04-21",
            "localName": "Dia de Tiradentes",
            "name": "Tiradentes",
            "countryCode": "BR",
            "fixed": true,
            "global": true,
            "counties": null,
            "launchYear": 1965,
            "types": ["Public"]
        }
    ]"#;

    #[test]
    fn test_feed_parsing_drops_unused_fields() {
        let records: Vec<HolidayRecord> = serde_json::from_str(FEED_FIXTURE).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "New Year's Day");
        assert_eq!(records[1].launch_year, Some(1965));
    }

    #[test]
    fn test_holidays_table_shape() {
        let records: Vec<HolidayRecord> = serde_json::from_str(FEED_FIXTURE).unwrap();
        let table = holidays_table(&records);

        assert_eq!(table.len(), 2);
        assert!(table.column_index("types").is_none());
        assert!(table.column_index("counties").is_none());

        // 2017-01-01T00:00:00Z
        assert_eq!(
            table.get(0, "date"),
            Some(&Value::Timestamp(1_483_228_800_000))
        );
        assert_eq!(table.get(0, "fixed"), Some(&Value::Bool(true)));
        assert_eq!(table.get(0, "launch_year"), Some(&Value::Null));
        assert_eq!(table.get(1, "launch_year"), Some(&Value::Int(1965)));
    }
}
