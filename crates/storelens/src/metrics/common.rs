//! Shared aggregation helpers.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::dataset::Order;
use crate::table::stats::{quantile_tiers, round_to};

/// Per-customer order aggregate, keyed in ascending customer order.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomerOrders {
    pub order_count: usize,
    pub total_value: f64,
    pub last_order: NaiveDateTime,
}

/// Group orders by customer.
pub fn orders_by_customer(orders: &[Order]) -> BTreeMap<i64, CustomerOrders> {
    let mut groups: BTreeMap<i64, CustomerOrders> = BTreeMap::new();
    for order in orders {
        groups
            .entry(order.customer_id)
            .and_modify(|g| {
                g.order_count += 1;
                g.total_value += order.order_value;
                g.last_order = g.last_order.max(order.order_date);
            })
            .or_insert(CustomerOrders {
                order_count: 1,
                total_value: order.order_value,
                last_order: order.order_date,
            });
    }
    groups
}

/// Total spend per customer (unrounded).
pub fn spend_by_customer(orders: &[Order]) -> BTreeMap<i64, f64> {
    let mut spend = BTreeMap::new();
    for order in orders {
        *spend.entry(order.customer_id).or_insert(0.0) += order.order_value;
    }
    spend
}

/// Whole days from `earlier` to `later`, truncated.
pub fn days_between(later: NaiveDateTime, earlier: NaiveDateTime) -> i64 {
    (later - earlier).num_days()
}

/// Share of `value` in `total` as a percentage with 2 decimals. A zero
/// total yields 0.
pub fn percent_of_total(value: f64, total: f64) -> f64 {
    if total == 0.0 {
        0.0
    } else {
        round_to(value / total * 100.0, 2)
    }
}

/// Group `(key, value)` pairs by float key in ascending key order.
pub fn group_by_float<T>(pairs: impl IntoIterator<Item = (f64, T)>) -> Vec<(f64, Vec<T>)> {
    let mut pairs: Vec<(f64, T)> = pairs.into_iter().collect();
    pairs.sort_by(|a, b| a.0.total_cmp(&b.0));

    let mut groups: Vec<(f64, Vec<T>)> = Vec::new();
    for (key, value) in pairs {
        match groups.last_mut() {
            Some((last, values)) if *last == key => values.push(value),
            _ => groups.push((key, vec![value])),
        }
    }
    groups
}

/// Equal-frequency tier of a value among its peers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Tier {
    Low,
    Medium,
    High,
}

impl Tier {
    /// Assign Low/Medium/High by quantile cut over `values`.
    pub fn assign(values: &[f64]) -> Vec<Tier> {
        quantile_tiers(values, 3)
            .into_iter()
            .map(|idx| match idx {
                0 => Tier::Low,
                1 => Tier::Medium,
                _ => Tier::High,
            })
            .collect()
    }
}
