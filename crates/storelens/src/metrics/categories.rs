//! Revenue ranking by product category.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::dataset::Order;
use crate::table::stats::round_to;

use super::common::percent_of_total;

/// Revenue of a single category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryRevenue {
    pub product_category: String,
    pub order_value: f64,
    #[serde(rename = "Percent_of_Total")]
    pub percent_of_total: f64,
}

/// Categories ordered by revenue, highest first.
pub fn top_categories(orders: &[Order]) -> Vec<CategoryRevenue> {
    let mut revenue: BTreeMap<&str, f64> = BTreeMap::new();
    for order in orders {
        *revenue.entry(order.product_category.as_str()).or_insert(0.0) += order.order_value;
    }

    let mut ranked: Vec<(&str, f64)> = revenue
        .into_iter()
        .map(|(category, total)| (category, round_to(total, 2)))
        .collect();
    // Stable, so equal revenue keeps category order
    ranked.sort_by(|a, b| b.1.total_cmp(&a.1));

    let total: f64 = ranked.iter().map(|(_, v)| v).sum();
    ranked
        .into_iter()
        .map(|(category, value)| CategoryRevenue {
            product_category: category.to_string(),
            order_value: value,
            percent_of_total: percent_of_total(value, total),
        })
        .collect()
}
