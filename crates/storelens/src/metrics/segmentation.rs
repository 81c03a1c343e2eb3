//! Recency / frequency / monetary segmentation.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::dataset::Order;
use crate::table::stats::{average_rank, quantile, round_to, RankOrder};

use super::common::{days_between, orders_by_customer};

/// Percentile of Monetary a customer must reach to be a VIP.
pub const VIP_PERCENTILE: f64 = 0.75;
/// VIP customers ordered less than this many days ago.
pub const VIP_MAX_RECENCY: i64 = 30;
/// VIP customers placed more than this many orders.
pub const VIP_MIN_ORDERS: usize = 3;
/// Loyal customers ordered less than this many days ago.
pub const LOYAL_MAX_RECENCY: i64 = 60;
/// Loyal customers placed at least this many orders.
pub const LOYAL_MIN_ORDERS: usize = 2;
/// Customers silent for more than this many days are lost.
pub const LOST_AFTER_DAYS: i64 = 90;

/// Behavioural segment of a customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Segment {
    Regular,
    #[serde(rename = "VIP")]
    Vip,
    Loyal,
    Lost,
}

impl Segment {
    /// Classify a customer from its RFM values.
    ///
    /// The rules override each other in order: VIP, then Loyal, then Lost.
    /// Every VIP also meets the Loyal rule, so a recent frequent customer
    /// ends up Loyal.
    pub fn classify(recency: i64, frequency: usize, monetary: f64, vip_threshold: f64) -> Self {
        let mut segment = Segment::Regular;
        if recency < VIP_MAX_RECENCY && frequency > VIP_MIN_ORDERS && monetary >= vip_threshold {
            segment = Segment::Vip;
        }
        if recency < LOYAL_MAX_RECENCY && frequency >= LOYAL_MIN_ORDERS {
            segment = Segment::Loyal;
        }
        if recency > LOST_AFTER_DAYS {
            segment = Segment::Lost;
        }
        segment
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Segment::Regular => "Regular",
            Segment::Vip => "VIP",
            Segment::Loyal => "Loyal",
            Segment::Lost => "Lost",
        };
        write!(f, "{}", label)
    }
}

/// One customer's RFM profile.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerSegment {
    pub customer_id: i64,
    #[serde(rename = "Recency")]
    pub recency: i64,
    #[serde(rename = "Frequency")]
    pub frequency: usize,
    #[serde(rename = "Monetary")]
    pub monetary: f64,
    #[serde(rename = "Segment")]
    pub segment: Segment,
    #[serde(rename = "RFM_Score")]
    pub rfm_score: f64,
}

/// Segment every customer that placed at least one order.
pub fn customer_segmentation(orders: &[Order]) -> Vec<CustomerSegment> {
    let Some(latest) = orders.iter().map(|o| o.order_date).max() else {
        return Vec::new();
    };

    let mut segments: Vec<CustomerSegment> = orders_by_customer(orders)
        .into_iter()
        .map(|(customer_id, agg)| CustomerSegment {
            customer_id,
            recency: days_between(latest, agg.last_order),
            frequency: agg.order_count,
            monetary: round_to(agg.total_value, 2),
            segment: Segment::Regular,
            rfm_score: 0.0,
        })
        .collect();

    let monetary: Vec<f64> = segments.iter().map(|s| s.monetary).collect();
    let recency: Vec<f64> = segments.iter().map(|s| s.recency as f64).collect();
    let frequency: Vec<f64> = segments.iter().map(|s| s.frequency as f64).collect();

    let vip_threshold = quantile(&monetary, VIP_PERCENTILE).unwrap_or(0.0);
    let recency_rank = average_rank(&recency, RankOrder::Descending);
    let frequency_rank = average_rank(&frequency, RankOrder::Ascending);
    let monetary_rank = average_rank(&monetary, RankOrder::Ascending);

    for (i, s) in segments.iter_mut().enumerate() {
        s.segment = Segment::classify(s.recency, s.frequency, s.monetary, vip_threshold);
        s.rfm_score = recency_rank[i] + frequency_rank[i] + monetary_rank[i];
    }

    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::{Duration, NaiveDate, NaiveDateTime};

    fn base() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 30)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn order(order_id: i64, customer_id: i64, days_ago: i64, value: f64) -> Order {
        Order {
            order_id,
            customer_id,
            order_date: base() - Duration::days(days_ago),
            product_category: "Home".to_string(),
            order_value: value,
            payment_method: "Card".to_string(),
            delivered: "Yes".to_string(),
        }
    }

    #[test]
    fn test_classify_precedence() {
        // Loyal is applied after VIP and overrides it
        assert_eq!(Segment::classify(10, 5, 500.0, 400.0), Segment::Loyal);
        assert_eq!(Segment::classify(10, 5, 100.0, 400.0), Segment::Loyal);
        assert_eq!(Segment::classify(45, 2, 100.0, 400.0), Segment::Loyal);
        assert_eq!(Segment::classify(91, 9, 900.0, 400.0), Segment::Lost);
        assert_eq!(Segment::classify(90, 1, 10.0, 400.0), Segment::Regular);
    }

    #[test]
    fn test_frequent_big_spender_is_loyal_and_silent_customer_lost() {
        let mut orders = Vec::new();
        // Customer 1: five large recent orders
        for i in 0..5 {
            orders.push(order(i, 1, 10 + i, 200.0));
        }
        // Customer 2: one old order
        orders.push(order(10, 2, 120, 50.0));
        // Customer 3: two mid-range orders
        orders.push(order(11, 3, 0, 40.0));
        orders.push(order(12, 3, 20, 40.0));

        let segments = customer_segmentation(&orders);
        assert_eq!(segments.len(), 3);

        let a = &segments[0];
        assert_eq!(a.customer_id, 1);
        assert_eq!(a.recency, 10);
        assert_eq!(a.frequency, 5);
        assert_eq!(a.monetary, 1000.0);
        assert_eq!(a.segment, Segment::Loyal);

        let b = &segments[1];
        assert_eq!(b.recency, 120);
        assert_eq!(b.segment, Segment::Lost);

        assert_eq!(segments[2].segment, Segment::Loyal);
    }

    #[test]
    fn test_rfm_score_uses_average_ranks() {
        let orders = vec![
            order(1, 1, 0, 10.0),
            order(2, 2, 0, 10.0),
            order(3, 3, 5, 30.0),
        ];
        let segments = customer_segmentation(&orders);
        // Recency desc: [0, 0, 5] -> [2.5, 2.5, 1]; frequency all tied -> 2
        // Monetary asc: [10, 10, 30] -> [1.5, 1.5, 3]
        let scores: Vec<f64> = segments.iter().map(|s| s.rfm_score).collect();
        assert_eq!(scores, vec![6.0, 6.0, 6.0]);
    }

    #[test]
    fn test_no_orders() {
        assert!(customer_segmentation(&[]).is_empty());
    }
}
