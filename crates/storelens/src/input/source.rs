//! Data source metadata.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{Result, StorelensError};

/// Metadata about the source a workbook was loaded from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceMetadata {
    /// File or directory name without path.
    pub file: String,
    /// Full path to the source.
    pub path: PathBuf,
    /// SHA-256 hash of the source contents.
    pub hash: String,
    /// Total size in bytes.
    pub size_bytes: u64,
    /// Detected format (xlsx, ods, csv-directory, ...).
    pub format: String,
    /// Sheet names in workbook order.
    pub sheets: Vec<String>,
    /// When the source was loaded.
    pub loaded_at: DateTime<Utc>,
}

impl SourceMetadata {
    /// Describe a source by hashing the given files (one file for a workbook,
    /// every sheet file for a directory).
    pub fn describe(
        path: &Path,
        files: &[PathBuf],
        format: impl Into<String>,
        sheets: Vec<String>,
    ) -> Result<Self> {
        let mut hasher = Sha256::new();
        let mut size_bytes = 0;
        for file in files {
            let contents = fs::read(file).map_err(|e| StorelensError::Io {
                path: file.clone(),
                source: e,
            })?;
            size_bytes += contents.len() as u64;
            hasher.update(&contents);
        }
        let hash = format!("sha256:{:x}", hasher.finalize());

        let file = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(Self {
            file,
            path: path.to_path_buf(),
            hash,
            size_bytes,
            format: format.into(),
            sheets,
            loaded_at: Utc::now(),
        })
    }
}
