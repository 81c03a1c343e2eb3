//! Spending broken down by age bucket, gender and city.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::dataset::{Customer, Order};
use crate::table::stats::round_to;

use super::common::{percent_of_total, spend_by_customer};

/// Age bucket, lower bound inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AgeGroup {
    Young,
    Adult,
    #[serde(rename = "Middle-aged")]
    MiddleAged,
    Senior,
}

impl AgeGroup {
    /// Every bucket in age order.
    pub const ALL: [AgeGroup; 4] = [
        AgeGroup::Young,
        AgeGroup::Adult,
        AgeGroup::MiddleAged,
        AgeGroup::Senior,
    ];

    /// Bucket for an age; `None` outside `[0, 100)`.
    pub fn from_age(age: i64) -> Option<Self> {
        match age {
            0..=24 => Some(AgeGroup::Young),
            25..=39 => Some(AgeGroup::Adult),
            40..=59 => Some(AgeGroup::MiddleAged),
            60..=99 => Some(AgeGroup::Senior),
            _ => None,
        }
    }
}

impl fmt::Display for AgeGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            AgeGroup::Young => "Young",
            AgeGroup::Adult => "Adult",
            AgeGroup::MiddleAged => "Middle-aged",
            AgeGroup::Senior => "Senior",
        };
        write!(f, "{}", label)
    }
}

/// Spend of one (age bucket, gender, city) combination.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DemographicDetail {
    #[serde(rename = "Age_Group")]
    pub age_group: AgeGroup,
    pub gender: String,
    pub city: String,
    pub order_value: f64,
}

/// Spend of one age bucket.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DemographicSummary {
    #[serde(rename = "Age_Group")]
    pub age_group: AgeGroup,
    pub order_value: f64,
    #[serde(rename = "Percent_of_Total")]
    pub percent_of_total: f64,
}

/// Both demographic tables.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Demographics {
    pub detailed: Vec<DemographicDetail>,
    pub summary: Vec<DemographicSummary>,
}

/// Join customer spend onto customers and aggregate by demographic.
///
/// Customers without orders count with zero spend. The detailed table covers
/// every age bucket crossed with every gender and city present among the
/// customers, so combinations nobody falls into are listed with zero spend.
pub fn customer_demographics(customers: &[Customer], orders: &[Order]) -> Demographics {
    let spend = spend_by_customer(orders);

    let genders: BTreeSet<&str> = customers.iter().map(|c| c.gender.as_str()).collect();
    let cities: BTreeSet<&str> = customers.iter().map(|c| c.city.as_str()).collect();

    let mut detailed: BTreeMap<(AgeGroup, &str, &str), f64> = BTreeMap::new();
    for group in AgeGroup::ALL {
        for gender in &genders {
            for city in &cities {
                detailed.insert((group, *gender, *city), 0.0);
            }
        }
    }
    let mut by_group: BTreeMap<AgeGroup, f64> = AgeGroup::ALL.iter().map(|g| (*g, 0.0)).collect();

    for customer in customers {
        let Some(group) = AgeGroup::from_age(customer.age) else {
            continue;
        };
        let value = spend.get(&customer.customer_id).copied().unwrap_or(0.0);
        *detailed
            .entry((group, customer.gender.as_str(), customer.city.as_str()))
            .or_insert(0.0) += value;
        *by_group.entry(group).or_insert(0.0) += value;
    }

    let detailed = detailed
        .into_iter()
        .map(|((age_group, gender, city), value)| DemographicDetail {
            age_group,
            gender: gender.to_string(),
            city: city.to_string(),
            order_value: round_to(value, 2),
        })
        .collect();

    let rounded: Vec<(AgeGroup, f64)> = by_group
        .into_iter()
        .map(|(group, value)| (group, round_to(value, 2)))
        .collect();
    let total: f64 = rounded.iter().map(|(_, v)| v).sum();
    let summary = rounded
        .into_iter()
        .map(|(age_group, value)| DemographicSummary {
            age_group,
            order_value: value,
            percent_of_total: percent_of_total(value, total),
        })
        .collect();

    Demographics { detailed, summary }
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::NaiveDate;

    fn customer(id: i64, age: i64, gender: &str, city: &str) -> Customer {
        Customer {
            customer_id: id,
            gender: gender.to_string(),
            age,
            city: city.to_string(),
            loyalty_score: 3.0,
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
    fn test_age_buckets() {
        assert_eq!(AgeGroup::from_age(0), Some(AgeGroup::Young));
        assert_eq!(AgeGroup::from_age(24), Some(AgeGroup::Young));
        assert_eq!(AgeGroup::from_age(25), Some(AgeGroup::Adult));
        assert_eq!(AgeGroup::from_age(40), Some(AgeGroup::MiddleAged));
        assert_eq!(AgeGroup::from_age(99), Some(AgeGroup::Senior));
        assert_eq!(AgeGroup::from_age(100), None);
        assert_eq!(AgeGroup::MiddleAged.to_string(), "Middle-aged");
    }

    fn detail<'a>(result: &'a Demographics, group: AgeGroup, gender: &str, city: &str) -> &'a DemographicDetail {
        result
            .detailed
            .iter()
            .find(|d| d.age_group == group && d.gender == gender && d.city == city)
            .unwrap()
    }

    #[test]
    fn test_detailed_and_summary() {
        let customers = vec![
            customer(1, 25, "Male", "Paris"),
            customer(2, 30, "Male", "Paris"),
            customer(3, 70, "Female", "Rome"),
            customer(4, 110, "Other", "Oslo"),
        ];
        let orders = vec![order(1, 10.0), order(2, 20.0), order(2, 5.5), order(4, 99.0)];

        let result = customer_demographics(&customers, &orders);

        // 4 buckets x {Female, Male, Other} x {Oslo, Paris, Rome}
        assert_eq!(result.detailed.len(), 36);
        assert_eq!(detail(&result, AgeGroup::Adult, "Male", "Paris").order_value, 35.5);
        assert_eq!(detail(&result, AgeGroup::Senior, "Female", "Rome").order_value, 0.0);
        // The out-of-range customer's spend is not counted anywhere
        let total: f64 = result.detailed.iter().map(|d| d.order_value).sum();
        assert_eq!(total, 35.5);

        assert_eq!(result.summary.len(), 4);
        assert_eq!(result.summary[0].order_value, 0.0);
        assert_eq!(result.summary[1].order_value, 35.5);
        assert_eq!(result.summary[1].percent_of_total, 100.0);
    }

    #[test]
    fn test_detailed_lists_every_combination_in_key_order() {
        let customers = vec![
            customer(1, 30, "Male", "Paris"),
            customer(2, 70, "Female", "Rome"),
        ];
        let orders = vec![order(1, 12.0), order(2, 8.0)];

        let result = customer_demographics(&customers, &orders);
        assert_eq!(result.detailed.len(), 16);

        let first = &result.detailed[0];
        assert_eq!(
            (first.age_group, first.gender.as_str(), first.city.as_str(), first.order_value),
            (AgeGroup::Young, "Female", "Paris", 0.0)
        );
        let last = &result.detailed[15];
        assert_eq!(
            (last.age_group, last.gender.as_str(), last.city.as_str()),
            (AgeGroup::Senior, "Male", "Rome")
        );

        let non_zero: Vec<(AgeGroup, &str, &str, f64)> = result
            .detailed
            .iter()
            .filter(|d| d.order_value > 0.0)
            .map(|d| (d.age_group, d.gender.as_str(), d.city.as_str(), d.order_value))
            .collect();
        assert_eq!(
            non_zero,
            vec![
                (AgeGroup::Adult, "Male", "Paris", 12.0),
                (AgeGroup::Senior, "Female", "Rome", 8.0),
            ]
        );
    }

    #[test]
    fn test_no_spend_gives_zero_percent() {
        let result = customer_demographics(&[customer(1, 30, "Male", "Paris")], &[]);
        assert!(result.summary.iter().all(|s| s.percent_of_total == 0.0));
    }
}
