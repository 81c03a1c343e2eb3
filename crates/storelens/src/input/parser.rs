//! CSV/TSV sheet parser with delimiter detection.

use std::fs;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::{Result, StorelensError};
use crate::table::{Table, Value};

/// Delimiters to try when auto-detecting.
const DELIMITERS: &[u8] = &[b'\t', b',', b';', b'|'];

/// Parser configuration.
#[derive(Debug, Clone)]
pub struct ParserConfig {
    /// Delimiter to use (None = auto-detect).
    pub delimiter: Option<u8>,
    /// Quote character.
    pub quote: u8,
    /// Type cells from their text. When off, every non-empty cell is kept
    /// as text and only empty cells are null.
    pub infer_types: bool,
}

impl ParserConfig {
    /// Configuration for reading back sheets this crate wrote: comma
    /// delimited, cells kept verbatim.
    pub fn verbatim() -> Self {
        Self {
            delimiter: Some(b','),
            infer_types: false,
            ..Self::default()
        }
    }
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            delimiter: None,
            quote: b'"',
            infer_types: true,
        }
    }
}

/// Parses one delimited text file into a typed [`Table`].
pub struct Parser {
    config: ParserConfig,
}

impl Parser {
    /// Create a new parser with default configuration.
    pub fn new() -> Self {
        Self {
            config: ParserConfig::default(),
        }
    }

    /// Create a parser with custom configuration.
    pub fn with_config(config: ParserConfig) -> Self {
        Self { config }
    }

    /// Parse a file into a table.
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<Table> {
        let path = path.as_ref();
        let contents = fs::read(path).map_err(|e| StorelensError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        self.parse_bytes(&contents)
    }

    /// Parse bytes directly.
    pub fn parse_bytes(&self, bytes: &[u8]) -> Result<Table> {
        let delimiter = match self.config.delimiter {
            Some(d) => d,
            None => detect_delimiter(bytes)?,
        };

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .quote(self.config.quote)
            .flexible(true)
            .from_reader(bytes);

        let headers: Vec<String> = reader
            .headers()?
            .iter()
            .map(|s| s.trim().to_string())
            .collect();

        if headers.iter().all(|h| h.is_empty()) {
            return Err(StorelensError::EmptyData("No columns found".to_string()));
        }

        let cell: fn(&str) -> Value = if self.config.infer_types {
            Value::from_raw
        } else {
            Value::verbatim
        };

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result?;
            // Table::new pads or truncates to the header width
            rows.push(record.iter().map(cell).collect());
        }

        Ok(Table::new(headers, rows))
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

/// Detect the delimiter by analyzing the first few lines.
fn detect_delimiter(bytes: &[u8]) -> Result<u8> {
    let reader = BufReader::new(bytes);
    let lines: Vec<String> = reader
        .lines()
        .take(10)
        .map_while(|l| l.ok())
        .filter(|l| !l.trim().is_empty())
        .collect();

    if lines.is_empty() {
        return Err(StorelensError::EmptyData("No lines to analyze".to_string()));
    }

    let mut best_delimiter = b',';
    let mut best_score = 0;

    for &delim in DELIMITERS {
        let counts: Vec<usize> = lines
            .iter()
            .map(|line| count_delimiter_in_line(line, delim))
            .collect();

        let first_count = counts[0];
        if first_count == 0 {
            continue;
        }

        // Higher count with consistent lines wins; tabs get a small bonus
        // since they rarely appear inside values
        let consistent = counts.iter().all(|&c| c == first_count);
        let score = if consistent {
            first_count * 1000 + if delim == b'\t' { 100 } else { 0 }
        } else {
            first_count
        };

        if score > best_score {
            best_score = score;
            best_delimiter = delim;
        }
    }

    Ok(best_delimiter)
}

/// Count delimiter occurrences in a line, respecting quotes.
fn count_delimiter_in_line(line: &str, delimiter: u8) -> usize {
    let delim_char = delimiter as char;
    let mut count = 0;
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            c if c == delim_char && !in_quotes => count += 1,
            _ => {}
        }
    }

    count
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_delimiter_csv() {
        let data = b"a,b,c\n1,2,3\n4,5,6";
        assert_eq!(detect_delimiter(data).unwrap(), b',');
    }

    #[test]
    fn test_detect_delimiter_tsv() {
        let data = b"a\tb\tc\n1\t2\t3\n4\t5\t6";
        assert_eq!(detect_delimiter(data).unwrap(), b'\t');
    }

    #[test]
    fn test_detect_delimiter_ignores_quoted_commas() {
        let data = b"id;review_text\n1;\"good, cheap\"\n2;\"slow, broken\"";
        assert_eq!(detect_delimiter(data).unwrap(), b';');
    }

    #[test]
    fn test_parse_types_cells() {
        let parser = Parser::new();
        let data = b"customer_id,city,age\n1,Paris,30\n2,,41.5";
        let table = parser.parse_bytes(data).unwrap();

        assert_eq!(table.headers, vec!["customer_id", "city", "age"]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.get(0, 1), Some(&Value::text("Paris")));
        assert_eq!(table.get(1, 1), Some(&Value::Null));
        assert_eq!(table.get(1, 2), Some(&Value::Float(41.5)));
    }

    #[test]
    fn test_verbatim_keeps_numeric_looking_text() {
        let parser = Parser::with_config(ParserConfig::verbatim());
        let table = parser.parse_bytes(b"customer_id,city,note\n1,02134,1e3\n2,,N/A").unwrap();

        assert_eq!(table.get(0, 0), Some(&Value::text("1")));
        assert_eq!(table.get(0, 1), Some(&Value::text("02134")));
        assert_eq!(table.get(0, 2), Some(&Value::text("1e3")));
        assert_eq!(table.get(1, 1), Some(&Value::Null));
        assert_eq!(table.get(1, 2), Some(&Value::text("N/A")));
    }

    #[test]
    fn test_parse_header_only() {
        let table = Parser::new().parse_bytes(b"a,b\n").unwrap();
        assert_eq!(table.column_count(), 2);
        assert!(table.is_empty());
    }

    #[test]
    fn test_parse_empty_input() {
        assert!(Parser::new().parse_bytes(b"").is_err());
    }
}
