//! Records of what the cleaner changed.

use serde::{Deserialize, Serialize};

use super::cleaner::SheetKind;

/// Summary of cleaning every sheet of a workbook.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CleaningReport {
    /// One entry per sheet, in workbook order.
    pub sheets: Vec<SheetReport>,
}

impl CleaningReport {
    /// Create an empty report.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the report for a sheet.
    pub fn sheet(&self, name: &str) -> Option<&SheetReport> {
        self.sheets.iter().find(|s| s.sheet == name)
    }

    /// Total rows written across all sheets.
    pub fn total_rows(&self) -> usize {
        self.sheets.iter().map(|s| s.rows_written).sum()
    }

    /// Total rows removed (duplicates and invalid rows) across all sheets.
    pub fn total_rows_removed(&self) -> usize {
        self.sheets
            .iter()
            .map(|s| s.duplicates_removed + s.invalid_rows_dropped)
            .sum()
    }
}

/// What happened to one sheet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetReport {
    /// Sheet name.
    pub sheet: String,
    /// Entity rule set applied (None = passed through).
    pub kind: Option<SheetKind>,
    /// Rows in the loaded sheet.
    pub rows_read: usize,
    /// Exact duplicate rows removed.
    pub duplicates_removed: usize,
    /// Rows dropped by the entity's validity filter.
    pub invalid_rows_dropped: usize,
    /// Rows in the cleaned sheet.
    pub rows_written: usize,
    /// Columns in the cleaned sheet.
    pub columns: usize,
    /// Missing values repaired, per column.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub fills: Vec<ColumnFill>,
}

impl SheetReport {
    /// Start a report for a sheet.
    pub fn new(sheet: impl Into<String>, kind: Option<SheetKind>, rows_read: usize) -> Self {
        Self {
            sheet: sheet.into(),
            kind,
            rows_read,
            duplicates_removed: 0,
            invalid_rows_dropped: 0,
            rows_written: 0,
            columns: 0,
            fills: Vec::new(),
        }
    }

    /// Record a column fill. Columns with nothing to fill are not recorded.
    pub fn add_fill(&mut self, column: &str, filled: usize, fill_value: String) {
        if filled == 0 {
            return;
        }
        self.fills.push(ColumnFill {
            column: column.to_string(),
            filled,
            fill_value,
        });
    }

    /// Total missing values repaired.
    pub fn values_filled(&self) -> usize {
        self.fills.iter().map(|f| f.filled).sum()
    }
}

/// Missing values repaired in a single column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnFill {
    /// Column affected.
    pub column: String,
    /// Number of cells filled.
    pub filled: usize,
    /// Value written into the cells.
    pub fill_value: String,
}
