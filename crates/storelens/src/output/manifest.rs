//! Provenance record stored next to a cleaned workbook.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cleaning::CleaningReport;
use crate::error::{Result, StorelensError};
use crate::input::SourceMetadata;

use super::{create_file, ensure_dir};

/// Name of the manifest file inside a cleaned workbook directory.
pub const MANIFEST_FILE: &str = "manifest.json";

/// Where a cleaned workbook came from and what cleaning changed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleanManifest {
    /// Storelens version that wrote the workbook.
    pub version: String,
    /// The raw source.
    pub source: SourceMetadata,
    /// Per-sheet cleaning summary.
    pub report: CleaningReport,
    /// Sheet files written, relative to the manifest.
    pub files: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl CleanManifest {
    pub fn new(source: SourceMetadata, report: CleaningReport, files: &[PathBuf]) -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            source,
            report,
            files: files
                .iter()
                .filter_map(|p| p.file_name())
                .map(|n| n.to_string_lossy().into_owned())
                .collect(),
            created_at: Utc::now(),
        }
    }

    /// Save as `<dir>/manifest.json`.
    pub fn save(&self, dir: impl AsRef<Path>) -> Result<PathBuf> {
        let dir = dir.as_ref();
        ensure_dir(dir)?;
        let path = dir.join(MANIFEST_FILE);

        let writer = create_file(&path)?;
        serde_json::to_writer_pretty(writer, self).map_err(|e| {
            StorelensError::Persistence(format!("Failed to serialize manifest: {}", e))
        })?;
        Ok(path)
    }

    /// Load `<dir>/manifest.json`.
    pub fn load(dir: impl AsRef<Path>) -> Result<Self> {
        let path = dir.as_ref().join(MANIFEST_FILE);

        let file = File::open(&path).map_err(|e| {
            StorelensError::Persistence(format!(
                "Failed to open manifest '{}': {}",
                path.display(),
                e
            ))
        })?;

        serde_json::from_reader(BufReader::new(file)).map_err(|e| {
            StorelensError::Persistence(format!(
                "Failed to parse manifest '{}': {}",
                path.display(),
                e
            ))
        })
    }
}
