//! Storelens: cleaning and analytics for multi-sheet e-commerce exports.
//!
//! A run has two stages. The clean stage loads a raw workbook (customers,
//! products, orders and reviews sheets), repairs or drops bad records and
//! writes a cleaned workbook. The analyze stage binds the cleaned sheets
//! to typed records and computes customer and revenue metrics from them.
//!
//! # Core Principles
//!
//! - **Deterministic**: the same input always yields byte-identical output
//! - **Explicit tables**: every stage takes and returns its data, no shared state
//! - **Provenance**: the cleaned workbook records its source hash and what changed
//!
//! # Example
//!
//! ```no_run
//! use storelens::{Pipeline, PipelineConfig};
//!
//! let pipeline = Pipeline::new(PipelineConfig::default());
//! let cleaned = pipeline.clean().unwrap();
//! println!("Rows removed: {}", cleaned.report.total_rows_removed());
//!
//! let analysis = pipeline.analyze().unwrap();
//! println!("Customers segmented: {}", analysis.report.segmentation.len());
//! ```

pub mod cleaning;
pub mod dataset;
pub mod error;
pub mod input;
pub mod metrics;
pub mod output;
pub mod table;

mod pipeline;

pub use crate::pipeline::{AnalyzeSummary, CleanSummary, Pipeline, PipelineConfig};
pub use cleaning::{Cleaner, CleaningReport, SheetKind, SheetReport, clean_workbook};
pub use dataset::{Customer, Dataset, Order, Product, Review};
pub use error::{Result, StorelensError};
pub use input::{SourceMetadata, Workbook, WorkbookReader, load_workbook};
pub use metrics::{AnalysisReport, MetricsEngine, analyze_dataset};
pub use output::{OutputFormat, ResultWriter};
pub use table::{Table, Value};
