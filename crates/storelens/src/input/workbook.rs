//! Workbook reading: spreadsheet files and directories of per-sheet text files.

use std::fs::{self, File};
use std::io::BufReader;
use std::path::{Path, PathBuf};

use calamine::{Data, Reader, Sheets, open_workbook_auto};
use indexmap::IndexMap;
use tracing::{debug, info};

use crate::error::{Result, StorelensError};
use crate::table::{Table, Value, is_null_token, parse_datetime};

use super::parser::{Parser, ParserConfig};
use super::source::SourceMetadata;

/// Spreadsheet extensions handled by the workbook reader.
const SPREADSHEET_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xlsb", "xls", "ods"];

/// Text extensions recognised as sheets inside a directory.
const SHEET_FILE_EXTENSIONS: &[&str] = &["csv", "tsv", "txt"];

/// A set of named sheets, in workbook order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Workbook {
    sheets: IndexMap<String, Table>,
}

impl Workbook {
    /// Create an empty workbook.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a sheet.
    pub fn insert(&mut self, name: impl Into<String>, table: Table) {
        self.sheets.insert(name.into(), table);
    }

    /// Sheet names in order.
    pub fn sheet_names(&self) -> impl Iterator<Item = &str> {
        self.sheets.keys().map(|k| k.as_str())
    }

    /// Get a sheet by name.
    pub fn sheet(&self, name: &str) -> Option<&Table> {
        self.sheets.get(name)
    }

    /// Get a sheet that must exist.
    pub fn require_sheet(&self, name: &str) -> Result<&Table> {
        self.sheet(name)
            .ok_or_else(|| StorelensError::MissingSheet(name.to_string()))
    }

    /// Iterate over `(name, table)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Table)> {
        self.sheets.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of sheets.
    pub fn len(&self) -> usize {
        self.sheets.len()
    }

    /// Returns true if there are no sheets.
    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }
}

impl IntoIterator for Workbook {
    type Item = (String, Table);
    type IntoIter = indexmap::map::IntoIter<String, Table>;

    fn into_iter(self) -> Self::IntoIter {
        self.sheets.into_iter()
    }
}

impl FromIterator<(String, Table)> for Workbook {
    fn from_iter<I: IntoIterator<Item = (String, Table)>>(iter: I) -> Self {
        Self {
            sheets: iter.into_iter().collect(),
        }
    }
}

enum Backing {
    Spreadsheet(Sheets<BufReader<File>>),
    Directory(IndexMap<String, PathBuf>),
}

/// Opens a workbook source and exposes its sheets.
pub struct WorkbookReader {
    path: PathBuf,
    backing: Backing,
    parser: Parser,
}

impl WorkbookReader {
    /// Open a spreadsheet file or a directory of sheet files.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with(path, ParserConfig::default())
    }

    /// Open with a custom parser configuration for text sheets.
    pub fn open_with(path: impl AsRef<Path>, parser: ParserConfig) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(StorelensError::Io {
                path: path.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file or directory"),
            });
        }

        let backing = if path.is_dir() {
            Backing::Directory(scan_sheet_files(path)?)
        } else if has_extension(path, SPREADSHEET_EXTENSIONS) {
            let sheets = open_workbook_auto(path).map_err(|e| StorelensError::Workbook {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
            Backing::Spreadsheet(sheets)
        } else {
            return Err(StorelensError::UnsupportedFormat(format!(
                "'{}' is neither a spreadsheet ({}) nor a directory of sheet files",
                path.display(),
                SPREADSHEET_EXTENSIONS.join(", ")
            )));
        };

        info!(path = %path.display(), "Opened workbook");

        Ok(Self {
            path: path.to_path_buf(),
            backing,
            parser: Parser::with_config(parser),
        })
    }

    /// Names of the sheets in this source.
    pub fn sheet_names(&self) -> Vec<String> {
        match &self.backing {
            Backing::Spreadsheet(sheets) => sheets.sheet_names(),
            Backing::Directory(files) => files.keys().cloned().collect(),
        }
    }

    /// Short format name of the source.
    pub fn format(&self) -> String {
        match &self.backing {
            Backing::Spreadsheet(_) => self
                .path
                .extension()
                .map(|e| e.to_string_lossy().to_lowercase())
                .unwrap_or_else(|| "spreadsheet".to_string()),
            Backing::Directory(_) => "csv-directory".to_string(),
        }
    }

    /// Describe the source for provenance records.
    pub fn metadata(&self) -> Result<SourceMetadata> {
        let files = match &self.backing {
            Backing::Spreadsheet(_) => vec![self.path.clone()],
            Backing::Directory(files) => files.values().cloned().collect(),
        };
        SourceMetadata::describe(&self.path, &files, self.format(), self.sheet_names())
    }

    /// Materialize one sheet.
    pub fn load_sheet(&mut self, name: &str) -> Result<Table> {
        let table = match &mut self.backing {
            Backing::Spreadsheet(sheets) => {
                let range = sheets.worksheet_range(name).map_err(|e| StorelensError::Workbook {
                    path: self.path.clone(),
                    message: format!("sheet '{}': {}", name, e),
                })?;
                range_to_table(range.rows())
            }
            Backing::Directory(files) => {
                let file = files
                    .get(name)
                    .ok_or_else(|| StorelensError::MissingSheet(name.to_string()))?;
                self.parser.parse_file(file)?
            }
        };

        debug!(
            sheet = name,
            rows = table.row_count(),
            columns = table.column_count(),
            "Loaded sheet"
        );
        Ok(table)
    }

    /// Materialize every sheet, in source order.
    pub fn load_all(&mut self) -> Result<Workbook> {
        let mut workbook = Workbook::new();
        for name in self.sheet_names() {
            let table = self.load_sheet(&name)?;
            workbook.insert(name, table);
        }
        info!(sheets = workbook.len(), "Sheets loaded");
        Ok(workbook)
    }
}

/// Read every sheet of a workbook source into memory.
pub fn load_workbook(path: impl AsRef<Path>) -> Result<(Workbook, SourceMetadata)> {
    load_workbook_with(path, ParserConfig::default())
}

/// Read every sheet, parsing text sheets with the given configuration.
pub fn load_workbook_with(
    path: impl AsRef<Path>,
    parser: ParserConfig,
) -> Result<(Workbook, SourceMetadata)> {
    let mut reader = WorkbookReader::open_with(path, parser)?;
    let metadata = reader.metadata()?;
    let workbook = reader.load_all()?;
    Ok((workbook, metadata))
}

fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .is_some_and(|ext| extensions.contains(&ext.as_str()))
}

/// Map sheet name (file stem) to file for every text sheet in a directory.
fn scan_sheet_files(dir: &Path) -> Result<IndexMap<String, PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|e| StorelensError::Io {
        path: dir.to_path_buf(),
        source: e,
    })?;

    let mut files: Vec<PathBuf> = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| StorelensError::Io {
            path: dir.to_path_buf(),
            source: e,
        })?;
        let path = entry.path();
        if path.is_file() && has_extension(&path, SHEET_FILE_EXTENSIONS) {
            files.push(path);
        }
    }
    // Directory order is platform dependent
    files.sort();

    let sheets: IndexMap<String, PathBuf> = files
        .into_iter()
        .filter_map(|p| {
            let stem = p.file_stem()?.to_string_lossy().into_owned();
            Some((stem, p))
        })
        .collect();

    if sheets.is_empty() {
        return Err(StorelensError::EmptyData(format!(
            "No sheet files (.csv, .tsv) found in '{}'",
            dir.display()
        )));
    }
    Ok(sheets)
}

/// Convert spreadsheet rows (first row = headers) into a table.
fn range_to_table<'a>(mut rows: impl Iterator<Item = &'a [Data]>) -> Table {
    let headers: Vec<String> = match rows.next() {
        Some(header_row) => header_row
            .iter()
            .map(|cell| match cell {
                Data::String(s) => s.trim().to_string(),
                Data::Empty => String::new(),
                other => other.to_string(),
            })
            .collect(),
        None => return Table::default(),
    };

    let data = rows
        .map(|row| row.iter().map(cell_value).collect())
        .collect();
    Table::new(headers, data)
}

/// Convert a spreadsheet cell into a table value.
fn cell_value(cell: &Data) -> Value {
    match cell {
        Data::Empty | Data::Error(_) => Value::Null,
        Data::Int(i) => Value::Int(*i),
        Data::Float(f) => Value::Float(*f),
        Data::Bool(b) => Value::Bool(*b),
        Data::String(s) if is_null_token(s) => Value::Null,
        Data::String(s) => Value::Text(s.clone()),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(Value::DateTime)
            .unwrap_or(Value::Float(dt.as_f64())),
        Data::DateTimeIso(s) => parse_datetime(s)
            .map(Value::DateTime)
            .unwrap_or_else(|| Value::Text(s.clone())),
        Data::DurationIso(s) => Value::Text(s.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::NaiveDate;

    #[test]
    fn test_range_to_table_maps_cells() {
        let rows: Vec<Vec<Data>> = vec![
            vec![Data::String("customer_id".into()), Data::String(" city ".into())],
            vec![Data::Float(1.0), Data::String("Lyon".into())],
            vec![Data::Int(2), Data::Empty],
            vec![Data::Float(3.0), Data::String("N/A".into())],
        ];
        let table = range_to_table(rows.iter().map(|r| r.as_slice()));

        assert_eq!(table.headers, vec!["customer_id", "city"]);
        assert_eq!(table.row_count(), 3);
        assert_eq!(table.get(0, 1), Some(&Value::text("Lyon")));
        assert_eq!(table.get(1, 1), Some(&Value::Null));
        assert_eq!(table.get(2, 1), Some(&Value::Null));
    }

    #[test]
    fn test_iso_datetime_cells_are_parsed() {
        let value = cell_value(&Data::DateTimeIso("2024-05-01T10:00:00".into()));
        let expected = NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap();
        assert_eq!(value, Value::DateTime(expected));
    }

    #[test]
    fn test_empty_range() {
        let rows: Vec<Vec<Data>> = Vec::new();
        let table = range_to_table(rows.iter().map(|r| r.as_slice()));
        assert_eq!(table.column_count(), 0);
    }

    #[test]
    fn test_open_directory_of_sheets() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("orders.csv"), "order_id,order_value\n1,10.5\n").unwrap();
        fs::write(dir.path().join("customers.csv"), "customer_id,age\n1,30\n").unwrap();
        fs::write(dir.path().join("notes.md"), "ignored").unwrap();

        let (workbook, metadata) = load_workbook(dir.path()).unwrap();
        let names: Vec<&str> = workbook.sheet_names().collect();
        assert_eq!(names, vec!["customers", "orders"]);
        assert_eq!(metadata.format, "csv-directory");
        assert!(metadata.hash.starts_with("sha256:"));
    }

    #[test]
    fn test_open_missing_path() {
        let err = WorkbookReader::open("does/not/exist.xlsx").err().unwrap();
        assert!(matches!(err, StorelensError::Io { .. }));
    }

    #[test]
    fn test_open_unsupported_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("data.parquet");
        fs::write(&file, b"PAR1").unwrap();
        let err = WorkbookReader::open(&file).err().unwrap();
        assert!(matches!(err, StorelensError::UnsupportedFormat(_)));
    }
}
