//! Writing cleaned workbooks and metric tables to disk.

mod manifest;
mod records;

use std::fmt;
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, StorelensError};
use crate::input::Workbook;
use crate::table::Table;

pub use manifest::{CleanManifest, MANIFEST_FILE};
pub use records::{Record, ResultWriter, output_files};

/// File format for metric tables.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Csv,
    Tsv,
    Json,
}

impl OutputFormat {
    /// File extension, without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Tsv => "tsv",
            OutputFormat::Json => "json",
        }
    }

    /// Field delimiter for the delimited formats.
    pub fn delimiter(&self) -> Option<u8> {
        match self {
            OutputFormat::Csv => Some(b','),
            OutputFormat::Tsv => Some(b'\t'),
            OutputFormat::Json => None,
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "csv" => Ok(OutputFormat::Csv),
            "tsv" => Ok(OutputFormat::Tsv),
            "json" => Ok(OutputFormat::Json),
            _ => Err(format!("Unknown format: {}. Use csv, tsv, or json", s)),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.extension())
    }
}

/// Create a directory and its parents if missing.
pub(crate) fn ensure_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).map_err(|e| StorelensError::Io {
        path: dir.to_path_buf(),
        source: e,
    })
}

pub(crate) fn create_file(path: &Path) -> Result<BufWriter<File>> {
    let file = File::create(path).map_err(|e| StorelensError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(BufWriter::new(file))
}

/// Write a table as delimited text, header first. Nulls become empty fields.
pub fn write_table(path: &Path, table: &Table, delimiter: u8) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(create_file(path)?);

    writer.write_record(&table.headers)?;
    for row in &table.rows {
        writer.write_record(row.iter().map(|v| v.to_string()))?;
    }
    writer.flush().map_err(|e| StorelensError::Io {
        path: path.to_path_buf(),
        source: e,
    })
}

/// Write every sheet of a workbook as `<dir>/<sheet>.csv`.
pub fn write_workbook(dir: &Path, workbook: &Workbook) -> Result<Vec<PathBuf>> {
    ensure_dir(dir)?;
    let mut written = Vec::with_capacity(workbook.len());
    for (name, table) in workbook.iter() {
        let path = dir.join(format!("{}.csv", name));
        write_table(&path, table, b',')?;
        written.push(path);
    }
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    use tempfile::TempDir;

    use crate::input::load_workbook;

    #[test]
    fn test_output_format_parse() {
        assert_eq!("TSV".parse::<OutputFormat>().unwrap(), OutputFormat::Tsv);
        assert_eq!("json".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert!("xlsx".parse::<OutputFormat>().is_err());
        assert_eq!(OutputFormat::default().to_string(), "csv");
    }

    #[test]
    fn test_write_table_quotes_and_nulls() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("t.csv");
        let table = Table::from_raw(&["id", "city"], &[vec!["1", "Paris, FR"], vec!["2", ""]]);

        write_table(&path, &table, b',').unwrap();
        let written = fs::read_to_string(&path).unwrap();
        assert_eq!(written, "id,city\n1,\"Paris, FR\"\n2,\n");
    }

    #[test]
    fn test_workbook_reloads_from_directory() {
        let dir = TempDir::new().unwrap();
        let mut workbook = Workbook::new();
        workbook.insert("customers", Table::from_raw(&["customer_id", "age"], &[vec!["1", "30"]]));
        workbook.insert("orders", Table::from_raw(&["order_id", "order_value"], &[vec!["5", "9.5"]]));

        let written = write_workbook(dir.path(), &workbook).unwrap();
        assert_eq!(written.len(), 2);

        let (reloaded, source) = load_workbook(dir.path()).unwrap();
        assert_eq!(source.sheets, vec!["customers", "orders"]);
        assert_eq!(reloaded.sheet("orders"), workbook.sheet("orders"));
    }
}
