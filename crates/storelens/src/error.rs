//! Error types for the storelens library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for storelens operations.
#[derive(Debug, Error)]
pub enum StorelensError {
    /// Error reading or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Error opening or reading a spreadsheet workbook.
    #[error("Workbook error for '{path}': {message}")]
    Workbook { path: PathBuf, message: String },

    /// File format not supported.
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Empty file or no data to process.
    #[error("Empty data: {0}")]
    EmptyData(String),

    /// A sheet required by the pipeline is absent.
    #[error("Sheet '{0}' not found")]
    MissingSheet(String),

    /// A column required by a cleaning rule or metric is absent.
    #[error("Column '{column}' not found in sheet '{sheet}'")]
    MissingColumn { sheet: String, column: String },

    /// A value could not be coerced to the column's type.
    #[error("Cannot convert '{value}' in sheet '{sheet}', column '{column}', row {row} to {target}")]
    Coercion {
        sheet: String,
        column: String,
        row: usize,
        value: String,
        target: &'static str,
    },

    /// A statistic-filled column stayed empty because it had no values to
    /// impute from.
    #[error(
        "Missing value in sheet '{sheet}', column '{column}', row {row}: \
         the column had no values to impute from"
    )]
    Unimputed {
        sheet: String,
        column: String,
        row: usize,
    },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error writing results or manifests.
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl StorelensError {
    pub(crate) fn missing_column(sheet: impl Into<String>, column: impl Into<String>) -> Self {
        StorelensError::MissingColumn {
            sheet: sheet.into(),
            column: column.into(),
        }
    }
}

/// Result type alias for storelens operations.
pub type Result<T> = std::result::Result<T, StorelensError>;
