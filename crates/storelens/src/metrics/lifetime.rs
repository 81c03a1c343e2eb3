//! Customer lifetime value tiers.

use serde::Serialize;

use crate::dataset::Order;
use crate::table::stats::round_to;

use super::common::{orders_by_customer, Tier};

/// Lifetime value of one customer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerValue {
    pub customer_id: i64,
    pub order_value: f64,
    #[serde(rename = "Frequency")]
    pub frequency: usize,
    #[serde(rename = "CLV_Score")]
    pub clv_score: f64,
    #[serde(rename = "CLV_Category")]
    pub category: Tier,
}

/// Total spend per customer, tiered into Low/Medium/High.
pub fn customer_lifetime_value(orders: &[Order]) -> Vec<CustomerValue> {
    let totals: Vec<(i64, f64, usize)> = orders_by_customer(orders)
        .into_iter()
        .map(|(id, agg)| (id, round_to(agg.total_value, 2), agg.order_count))
        .collect();
    let scores: Vec<f64> = totals.iter().map(|(_, score, _)| *score).collect();

    totals
        .into_iter()
        .zip(Tier::assign(&scores))
        .map(|((customer_id, score, frequency), category)| CustomerValue {
            customer_id,
            order_value: score,
            frequency,
            clv_score: score,
            category,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::NaiveDate;

    fn order(customer_id: i64, value: f64) -> Order {
        Order {
            order_id: customer_id,
            customer_id,
            order_date: NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            product_category: "Home".to_string(),
            order_value: value,
            payment_method: "Card".to_string(),
            delivered: "Yes".to_string(),
        }
    }

    #[test]
    fn test_uniform_distribution_splits_evenly() {
        let orders: Vec<Order> = (1..=9).map(|i| order(i, i as f64 * 10.0)).collect();
        let values = customer_lifetime_value(&orders);

        let count = |tier| values.iter().filter(|v| v.category == tier).count();
        assert_eq!(count(Tier::Low), 3);
        assert_eq!(count(Tier::Medium), 3);
        assert_eq!(count(Tier::High), 3);
        assert_eq!(values[8].category, Tier::High);
    }

    #[test]
    fn test_score_is_rounded_total() {
        let orders = vec![order(1, 10.004), order(1, 5.0)];
        let values = customer_lifetime_value(&orders);
        assert_eq!(values[0].clv_score, 15.0);
        assert_eq!(values[0].order_value, 15.0);
        assert_eq!(values[0].frequency, 2);
    }
}
