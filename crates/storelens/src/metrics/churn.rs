//! Activity status from days since the last order.

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize, Serializer};

use crate::dataset::Order;
use crate::table::format_datetime;

use super::common::{days_between, orders_by_customer};

/// Customers silent for more than this many days are inactive.
pub const INACTIVE_AFTER_DAYS: i64 = 90;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActivityStatus {
    Active,
    Inactive,
}

impl ActivityStatus {
    pub fn from_days(days: i64) -> Self {
        if days > INACTIVE_AFTER_DAYS {
            ActivityStatus::Inactive
        } else {
            ActivityStatus::Active
        }
    }
}

impl fmt::Display for ActivityStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActivityStatus::Active => write!(f, "Active"),
            ActivityStatus::Inactive => write!(f, "Inactive"),
        }
    }
}

/// Churn status of one customer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerChurn {
    pub customer_id: i64,
    /// Most recent order of this customer.
    #[serde(serialize_with = "serialize_date")]
    pub order_date: NaiveDateTime,
    #[serde(rename = "Days_Since_Last_Order")]
    pub days_since_last_order: i64,
    #[serde(rename = "Status")]
    pub status: ActivityStatus,
}

fn serialize_date<S: Serializer>(date: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_datetime(date))
}

/// Days since each customer's last order, relative to the latest order
/// in the data.
pub fn churn_analysis(orders: &[Order]) -> Vec<CustomerChurn> {
    let Some(latest) = orders.iter().map(|o| o.order_date).max() else {
        return Vec::new();
    };

    orders_by_customer(orders)
        .into_iter()
        .map(|(customer_id, agg)| {
            let days = days_between(latest, agg.last_order);
            CustomerChurn {
                customer_id,
                order_date: agg.last_order,
                days_since_last_order: days,
                status: ActivityStatus::from_days(days),
            }
        })
        .collect()
}
