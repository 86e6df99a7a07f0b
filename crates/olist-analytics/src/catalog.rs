//! Query catalog: the closed set of named analytical queries and their
//! dispatch.
//!
//! The catalog is a fixed enumeration, not a registry; adding a query means
//! adding a variant, its handler, and (for SQL-backed queries) a resource
//! under `sql/`. The variant→resource mapping is embedded at compile time,
//! so a missing resource is a build failure rather than a runtime surprise.

use std::collections::BTreeMap;

use olist_domain::DataTable;
use olist_store::Store;
use tracing::debug;

use crate::error::{AnalyticsError, Result};
use crate::{calendar, freight};

/// The nine named analytical queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryName {
    DeliveryDateDifference,
    GlobalAmountOrderStatus,
    RevenueByMonthYear,
    RevenuePerState,
    Top10LeastRevenueCategories,
    Top10RevenueCategories,
    RealVsEstimatedDeliveredTime,
    OrdersPerDayAndHolidays2017,
    GetFreightValueWeightRelationship,
}

impl QueryName {
    /// Execution order of the catalog.
    pub const ALL: [QueryName; 9] = [
        QueryName::DeliveryDateDifference,
        QueryName::GlobalAmountOrderStatus,
        QueryName::RevenueByMonthYear,
        QueryName::RevenuePerState,
        QueryName::Top10LeastRevenueCategories,
        QueryName::Top10RevenueCategories,
        QueryName::RealVsEstimatedDeliveredTime,
        QueryName::OrdersPerDayAndHolidays2017,
        QueryName::GetFreightValueWeightRelationship,
    ];

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DeliveryDateDifference => "delivery_date_difference",
            Self::GlobalAmountOrderStatus => "global_amount_order_status",
            Self::RevenueByMonthYear => "revenue_by_month_year",
            Self::RevenuePerState => "revenue_per_state",
            Self::Top10LeastRevenueCategories => "top_10_least_revenue_categories",
            Self::Top10RevenueCategories => "top_10_revenue_categories",
            Self::RealVsEstimatedDeliveredTime => "real_vs_estimated_delivered_time",
            Self::OrdersPerDayAndHolidays2017 => "orders_per_day_and_holidays_2017",
            Self::GetFreightValueWeightRelationship => {
                "get_freight_value_weight_relationship"
            }
        }
    }

    /// Embedded SQL resource; `None` for the two computed queries.
    #[must_use]
    pub fn sql(&self) -> Option<&'static str> {
        match self {
            Self::DeliveryDateDifference => {
                Some(include_str!("../sql/delivery_date_difference.sql"))
            }
            Self::GlobalAmountOrderStatus => {
                Some(include_str!("../sql/global_amount_order_status.sql"))
            }
            Self::RevenueByMonthYear => Some(include_str!("../sql/revenue_by_month_year.sql")),
            Self::RevenuePerState => Some(include_str!("../sql/revenue_per_state.sql")),
            Self::Top10LeastRevenueCategories => {
                Some(include_str!("../sql/top_10_least_revenue_categories.sql"))
            }
            Self::Top10RevenueCategories => {
                Some(include_str!("../sql/top_10_revenue_categories.sql"))
            }
            Self::RealVsEstimatedDeliveredTime => {
                Some(include_str!("../sql/real_vs_estimated_delivered_time.sql"))
            }
            Self::OrdersPerDayAndHolidays2017 | Self::GetFreightValueWeightRelationship => None,
        }
    }

    fn handler(&self) -> QueryFn {
        match self {
            Self::DeliveryDateDifference => query_delivery_date_difference,
            Self::GlobalAmountOrderStatus => query_global_amount_order_status,
            Self::RevenueByMonthYear => query_revenue_by_month_year,
            Self::RevenuePerState => query_revenue_per_state,
            Self::Top10LeastRevenueCategories => query_top_10_least_revenue_categories,
            Self::Top10RevenueCategories => query_top_10_revenue_categories,
            Self::RealVsEstimatedDeliveredTime => query_real_vs_estimated_delivered_time,
            Self::OrdersPerDayAndHolidays2017 => calendar::orders_per_day_and_holidays_2017,
            Self::GetFreightValueWeightRelationship => {
                freight::freight_value_weight_relationship
            }
        }
    }
}

/// One executed query: its name and result table.
#[derive(Debug, Clone)]
pub struct QueryResult {
    pub name: QueryName,
    pub table: DataTable,
}

/// A named-query handler. All handlers are read-only against the store.
pub type QueryFn = fn(&Store) -> Result<QueryResult>;

/// Every query handler, in catalog order.
#[must_use]
pub fn get_all_queries() -> Vec<QueryFn> {
    QueryName::ALL.iter().map(QueryName::handler).collect()
}

/// Execute the whole catalog and return the name→table mapping.
///
/// All-or-nothing: the first failing query aborts the run and no partial
/// mapping is returned. The mapping holds exactly the nine catalog names.
pub fn run_queries(store: &Store) -> Result<BTreeMap<String, DataTable>> {
    let mut results = BTreeMap::new();

    for query in get_all_queries() {
        let QueryResult { name, table } = query(store)?;
        debug!(query = name.as_str(), rows = table.len(), "query executed");
        results.insert(name.as_str().to_string(), table);
    }

    Ok(results)
}

fn execute_sql(name: QueryName, store: &Store) -> Result<QueryResult> {
    let Some(sql) = name.sql() else {
        return Err(AnalyticsError::NoSqlResource {
            name: name.as_str(),
        });
    };
    let table = store.query(sql).map_err(|source| AnalyticsError::Sql {
        name: name.as_str(),
        source,
    })?;
    Ok(QueryResult { name, table })
}

fn query_delivery_date_difference(store: &Store) -> Result<QueryResult> {
    execute_sql(QueryName::DeliveryDateDifference, store)
}

fn query_global_amount_order_status(store: &Store) -> Result<QueryResult> {
    execute_sql(QueryName::GlobalAmountOrderStatus, store)
}

fn query_revenue_by_month_year(store: &Store) -> Result<QueryResult> {
    execute_sql(QueryName::RevenueByMonthYear, store)
}

fn query_revenue_per_state(store: &Store) -> Result<QueryResult> {
    execute_sql(QueryName::RevenuePerState, store)
}

fn query_top_10_least_revenue_categories(store: &Store) -> Result<QueryResult> {
    execute_sql(QueryName::Top10LeastRevenueCategories, store)
}

fn query_top_10_revenue_categories(store: &Store) -> Result<QueryResult> {
    execute_sql(QueryName::Top10RevenueCategories, store)
}

fn query_real_vs_estimated_delivered_time(store: &Store) -> Result<QueryResult> {
    execute_sql(QueryName::RealVsEstimatedDeliveredTime, store)
}
