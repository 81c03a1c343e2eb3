//! Business metrics computed over a cleaned [`Dataset`].
//!
//! Every metric is a pure function of the typed entity records. None of
//! them mutate the dataset, so they can run in any order.

mod categories;
mod churn;
mod common;
mod demographics;
mod lifetime;
mod loyalty;
mod reviews;
mod segmentation;

use serde::Serialize;
use tracing::info;

use crate::dataset::Dataset;

pub use categories::{CategoryRevenue, top_categories};
pub use churn::{ActivityStatus, CustomerChurn, INACTIVE_AFTER_DAYS, churn_analysis};
pub use common::{Tier, days_between, percent_of_total};
pub use demographics::{
    AgeGroup, DemographicDetail, DemographicSummary, Demographics, customer_demographics,
};
pub use lifetime::{CustomerValue, customer_lifetime_value};
pub use loyalty::{LoyaltyLevel, customer_loyalty};
pub use reviews::{RatingInsight, review_rating_insights};
pub use segmentation::{
    CustomerSegment, LOST_AFTER_DAYS, LOYAL_MAX_RECENCY, LOYAL_MIN_ORDERS, Segment,
    VIP_MAX_RECENCY, VIP_MIN_ORDERS, VIP_PERCENTILE, customer_segmentation,
};

/// Results of every metric.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub segmentation: Vec<CustomerSegment>,
    pub top_categories: Vec<CategoryRevenue>,
    pub demographics: Demographics,
    pub loyalty: Vec<LoyaltyLevel>,
    pub review_insights: Vec<RatingInsight>,
    pub lifetime_value: Vec<CustomerValue>,
    pub churn: Vec<CustomerChurn>,
}

impl AnalysisReport {
    /// Customers per segment, in first-seen order.
    pub fn segment_counts(&self) -> Vec<(Segment, usize)> {
        let mut counts: Vec<(Segment, usize)> = Vec::new();
        for s in &self.segmentation {
            match counts.iter_mut().find(|(seg, _)| *seg == s.segment) {
                Some((_, n)) => *n += 1,
                None => counts.push((s.segment, 1)),
            }
        }
        counts
    }

    /// Number of customers flagged inactive.
    pub fn inactive_customers(&self) -> usize {
        self.churn
            .iter()
            .filter(|c| c.status == ActivityStatus::Inactive)
            .count()
    }
}

/// Runs every metric over a dataset.
pub struct MetricsEngine;

impl MetricsEngine {
    pub fn new() -> Self {
        Self
    }

    /// Compute all metrics.
    pub fn run(&self, dataset: &Dataset) -> AnalysisReport {
        let segmentation = customer_segmentation(&dataset.orders);
        info!(customers = segmentation.len(), "Customer segmentation computed");

        let top_categories = top_categories(&dataset.orders);
        info!(categories = top_categories.len(), "Top categories computed");

        let demographics = customer_demographics(&dataset.customers, &dataset.orders);
        info!(groups = demographics.detailed.len(), "Customer demographics computed");

        let loyalty = customer_loyalty(&dataset.customers, &dataset.orders);
        info!(scores = loyalty.len(), "Customer loyalty computed");

        let review_insights =
            review_rating_insights(&dataset.reviews, &dataset.orders, &dataset.customers);
        info!(ratings = review_insights.len(), "Review and rating insights computed");

        let lifetime_value = customer_lifetime_value(&dataset.orders);
        info!(customers = lifetime_value.len(), "Customer lifetime value computed");

        let churn = churn_analysis(&dataset.orders);
        info!(customers = churn.len(), "Churn analysis computed");

        AnalysisReport {
            segmentation,
            top_categories,
            demographics,
            loyalty,
            review_insights,
            lifetime_value,
            churn,
        }
    }
}

impl Default for MetricsEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Compute all metrics with the default engine.
pub fn analyze_dataset(dataset: &Dataset) -> AnalysisReport {
    MetricsEngine::new().run(dataset)
}
