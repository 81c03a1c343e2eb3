//! Metric tables as named result files.

use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use crate::error::{Result, StorelensError};
use crate::metrics::{
    AnalysisReport, CategoryRevenue, CustomerChurn, CustomerSegment, CustomerValue,
    DemographicDetail, DemographicSummary, LoyaltyLevel, RatingInsight,
};

use super::{OutputFormat, create_file, ensure_dir};

/// A flat metric record with a fixed column layout.
pub trait Record: Serialize {
    /// Column names, in serialization order.
    const COLUMNS: &'static [&'static str];
}

impl Record for CustomerSegment {
    const COLUMNS: &'static [&'static str] = &[
        "customer_id",
        "Recency",
        "Frequency",
        "Monetary",
        "Segment",
        "RFM_Score",
    ];
}

impl Record for CategoryRevenue {
    const COLUMNS: &'static [&'static str] = &["product_category", "order_value", "Percent_of_Total"];
}

impl Record for DemographicDetail {
    const COLUMNS: &'static [&'static str] = &["Age_Group", "gender", "city", "order_value"];
}

impl Record for DemographicSummary {
    const COLUMNS: &'static [&'static str] = &["Age_Group", "order_value", "Percent_of_Total"];
}

impl Record for LoyaltyLevel {
    const COLUMNS: &'static [&'static str] = &["loyalty_score", "order_value", "Loyalty_Level"];
}

impl Record for RatingInsight {
    const COLUMNS: &'static [&'static str] = &["rating", "order_value", "review_count"];
}

impl Record for CustomerValue {
    const COLUMNS: &'static [&'static str] = &[
        "customer_id",
        "order_value",
        "Frequency",
        "CLV_Score",
        "CLV_Category",
    ];
}

impl Record for CustomerChurn {
    const COLUMNS: &'static [&'static str] = &[
        "customer_id",
        "order_date",
        "Days_Since_Last_Order",
        "Status",
    ];
}

const SEGMENTATION: &str = "01_customer_segmentation";
const TOP_CATEGORIES: &str = "02_top_categories";
const DEMOGRAPHICS_DETAILED: &str = "03_customer_demographics_detailed";
const DEMOGRAPHICS_SUMMARY: &str = "03_customer_demographics_summary";
const LOYALTY: &str = "04_customer_loyalty";
const REVIEW_INSIGHTS: &str = "05_review_rating_insights";
const LIFETIME_VALUE: &str = "06_customer_ltv";
const CHURN: &str = "07_churn_analysis";

/// File names of every result table for a format, in write order.
pub fn output_files(format: OutputFormat) -> Vec<String> {
    [
        SEGMENTATION,
        TOP_CATEGORIES,
        DEMOGRAPHICS_DETAILED,
        DEMOGRAPHICS_SUMMARY,
        LOYALTY,
        REVIEW_INSIGHTS,
        LIFETIME_VALUE,
        CHURN,
    ]
    .iter()
    .map(|stem| format!("{}.{}", stem, format.extension()))
    .collect()
}

/// Writes metric tables into one output directory.
#[derive(Debug, Clone)]
pub struct ResultWriter {
    dir: PathBuf,
    format: OutputFormat,
}

impl ResultWriter {
    pub fn new(dir: impl Into<PathBuf>, format: OutputFormat) -> Self {
        Self {
            dir: dir.into(),
            format,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    /// Write one table as `<dir>/<stem>.<ext>`.
    ///
    /// Delimited files always carry the header row, even with no records.
    pub fn write<T: Record>(&self, stem: &str, records: &[T]) -> Result<PathBuf> {
        ensure_dir(&self.dir)?;
        let path = self.dir.join(format!("{}.{}", stem, self.format.extension()));
        let mut file = create_file(&path)?;

        match self.format.delimiter() {
            Some(delimiter) => {
                let mut writer = csv::WriterBuilder::new()
                    .delimiter(delimiter)
                    .has_headers(false)
                    .from_writer(file);
                writer.write_record(T::COLUMNS)?;
                for record in records {
                    writer.serialize(record)?;
                }
                writer.flush().map_err(|e| StorelensError::Io {
                    path: path.clone(),
                    source: e,
                })?;
            }
            None => {
                serde_json::to_writer_pretty(&mut file, records)?;
                file.flush().map_err(|e| StorelensError::Io {
                    path: path.clone(),
                    source: e,
                })?;
            }
        }

        info!(path = %path.display(), rows = records.len(), "{} saved", stem);
        Ok(path)
    }

    /// Write all eight result tables.
    pub fn write_report(&self, report: &AnalysisReport) -> Result<Vec<PathBuf>> {
        Ok(vec![
            self.write(SEGMENTATION, &report.segmentation)?,
            self.write(TOP_CATEGORIES, &report.top_categories)?,
            self.write(DEMOGRAPHICS_DETAILED, &report.demographics.detailed)?,
            self.write(DEMOGRAPHICS_SUMMARY, &report.demographics.summary)?,
            self.write(LOYALTY, &report.loyalty)?,
            self.write(REVIEW_INSIGHTS, &report.review_insights)?,
            self.write(LIFETIME_VALUE, &report.lifetime_value)?,
            self.write(CHURN, &report.churn)?,
        ])
    }
}
