//! The clean and analyze stages wired to their configured paths.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::cleaning::{Cleaner, CleaningReport};
use crate::dataset::Dataset;
use crate::error::{Result, StorelensError};
use crate::input::{ParserConfig, SourceMetadata, load_workbook, load_workbook_with};
use crate::metrics::{AnalysisReport, MetricsEngine};
use crate::output::{CleanManifest, OutputFormat, ResultWriter, write_workbook};

/// Paths and output format for a pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Raw workbook (xlsx/ods) or directory of sheet files.
    pub input: PathBuf,
    /// Directory the cleaned workbook is written to and read from.
    pub cleaned_dir: PathBuf,
    /// Directory for the result tables.
    pub output_dir: PathBuf,
    /// Format of the result tables.
    pub format: OutputFormat,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("data/synthetic_ecommerce_dataset_multisheet.xlsx"),
            cleaned_dir: PathBuf::from("data/cleaned"),
            output_dir: PathBuf::from("data"),
            format: OutputFormat::Csv,
        }
    }
}

impl PipelineConfig {
    /// Read a configuration from a JSON file. Absent fields keep their
    /// defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            StorelensError::Config(format!("Failed to open '{}': {}", path.display(), e))
        })?;
        serde_json::from_reader(BufReader::new(file)).map_err(|e| {
            StorelensError::Config(format!("Invalid config '{}': {}", path.display(), e))
        })
    }
}

/// Outcome of the clean stage.
#[derive(Debug, Clone)]
pub struct CleanSummary {
    pub source: SourceMetadata,
    pub report: CleaningReport,
    /// Sheet files written.
    pub files: Vec<PathBuf>,
    pub manifest: PathBuf,
}

/// Outcome of the analyze stage.
#[derive(Debug, Clone)]
pub struct AnalyzeSummary {
    pub report: AnalysisReport,
    /// Result tables written.
    pub files: Vec<PathBuf>,
}

/// Runs the clean and analyze stages.
pub struct Pipeline {
    config: PipelineConfig,
    cleaner: Cleaner,
    engine: MetricsEngine,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            cleaner: Cleaner::new(),
            engine: MetricsEngine::new(),
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Load the raw workbook, clean every sheet and write the cleaned
    /// workbook with its manifest.
    ///
    /// Nothing is written unless loading and cleaning both succeed.
    pub fn clean(&self) -> Result<CleanSummary> {
        let (workbook, source) = load_workbook(&self.config.input)?;
        info!(sheets = workbook.len(), source = %source.file, "Loaded raw workbook");

        let (cleaned, report) = self.cleaner.clean(workbook)?;

        let files = write_workbook(&self.config.cleaned_dir, &cleaned)?;
        let manifest = CleanManifest::new(source.clone(), report.clone(), &files)
            .save(&self.config.cleaned_dir)?;
        info!(dir = %self.config.cleaned_dir.display(), "Cleaned workbook written");

        Ok(CleanSummary {
            source,
            report,
            files,
            manifest,
        })
    }

    /// Load the cleaned workbook, compute every metric and write the result
    /// tables.
    ///
    /// Cleaned cells are read back as text; typing happens when the entity
    /// sheets are bound, so text columns keep values such as `02134`.
    pub fn analyze(&self) -> Result<AnalyzeSummary> {
        let (workbook, _) = load_workbook_with(&self.config.cleaned_dir, ParserConfig::verbatim())?;
        let dataset = Dataset::from_workbook(&workbook)?;
        info!(
            customers = dataset.customers.len(),
            orders = dataset.orders.len(),
            reviews = dataset.reviews.len(),
            "Loaded cleaned dataset"
        );

        let report = self.engine.run(&dataset);
        let files = ResultWriter::new(&self.config.output_dir, self.config.format)
            .write_report(&report)?;

        Ok(AnalyzeSummary { report, files })
    }
}
