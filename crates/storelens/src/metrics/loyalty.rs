//! Mean spend per loyalty score.

use serde::Serialize;

use crate::dataset::{Customer, Order};
use crate::table::stats::{mean, round_to};

use super::common::{group_by_float, spend_by_customer, Tier};

/// Mean spend of customers sharing a loyalty score.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoyaltyLevel {
    pub loyalty_score: f64,
    pub order_value: f64,
    #[serde(rename = "Loyalty_Level")]
    pub level: Tier,
}

/// Group customers by loyalty score and tier the mean spend of each score.
pub fn customer_loyalty(customers: &[Customer], orders: &[Order]) -> Vec<LoyaltyLevel> {
    let spend = spend_by_customer(orders);
    let groups = group_by_float(customers.iter().map(|c| {
        (
            c.loyalty_score,
            spend.get(&c.customer_id).copied().unwrap_or(0.0),
        )
    }));

    let scored: Vec<(f64, f64)> = groups
        .into_iter()
        .map(|(score, values)| (score, round_to(mean(&values).unwrap_or(0.0), 2)))
        .collect();
    let means: Vec<f64> = scored.iter().map(|(_, m)| *m).collect();

    scored
        .into_iter()
        .zip(Tier::assign(&means))
        .map(|((loyalty_score, order_value), level)| LoyaltyLevel {
            loyalty_score,
            order_value,
            level,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::NaiveDate;

    fn customer(id: i64, score: f64) -> Customer {
        Customer {
            customer_id: id,
            gender: "Other".to_string(),
            age: 30,
            city: "Paris".to_string(),
            loyalty_score: score,
        }
    }

    fn order(customer_id: i64, value: f64) -> Order {
        Order {
            order_id: 1,
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
    fn test_mean_spend_per_score() {
        let customers = vec![
            customer(1, 4.5),
            customer(2, 4.5),
            customer(3, 1.0),
            customer(4, 3.0),
        ];
        let orders = vec![order(1, 100.0), order(3, 10.0), order(4, 50.0)];

        let levels = customer_loyalty(&customers, &orders);
        let scores: Vec<f64> = levels.iter().map(|l| l.loyalty_score).collect();
        assert_eq!(scores, vec![1.0, 3.0, 4.5]);

        // Customer 2 has no orders and counts as zero spend
        assert_eq!(levels[2].order_value, 50.0);
        assert_eq!(levels[0].order_value, 10.0);
        assert_eq!(levels[0].level, Tier::Low);
    }

    #[test]
    fn test_empty_customers() {
        assert!(customer_loyalty(&[], &[]).is_empty());
    }
}
