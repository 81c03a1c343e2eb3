//! Order value and review volume per rating.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::dataset::{Customer, Order, Review};
use crate::table::stats::{mean, round_to};

use super::common::group_by_float;

/// Aggregates for one rating value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatingInsight {
    pub rating: f64,
    pub order_value: f64,
    pub review_count: usize,
}

/// Inner-join reviews to orders and customers on `customer_id`, then group
/// by rating.
///
/// The join is many-to-many: a review by a customer with `k` orders yields
/// `k` joined rows, each counted once.
pub fn review_rating_insights(
    reviews: &[Review],
    orders: &[Order],
    customers: &[Customer],
) -> Vec<RatingInsight> {
    let mut order_values: BTreeMap<i64, Vec<f64>> = BTreeMap::new();
    for order in orders {
        order_values
            .entry(order.customer_id)
            .or_default()
            .push(order.order_value);
    }

    let mut customer_rows: BTreeMap<i64, usize> = BTreeMap::new();
    for customer in customers {
        *customer_rows.entry(customer.customer_id).or_insert(0) += 1;
    }

    let joined = reviews.iter().flat_map(|review| {
        let values = order_values
            .get(&review.customer_id)
            .map(Vec::as_slice)
            .unwrap_or(&[]);
        let repeat = customer_rows.get(&review.customer_id).copied().unwrap_or(0);
        values
            .iter()
            .flat_map(move |&v| std::iter::repeat_n((review.rating, v), repeat))
    });

    group_by_float(joined)
        .into_iter()
        .map(|(rating, values)| RatingInsight {
            rating,
            order_value: round_to(mean(&values).unwrap_or(0.0), 2),
            review_count: values.len(),
        })
        .collect()
}
