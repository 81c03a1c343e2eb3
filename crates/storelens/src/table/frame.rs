//! Row-major in-memory table.

use std::collections::HashSet;

use crate::error::{Result, StorelensError};

use super::value::Value;

/// A named-column table with typed cells.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    /// Column headers.
    pub headers: Vec<String>,
    /// Row data (row-major order). Every row has `headers.len()` cells.
    pub rows: Vec<Vec<Value>>,
}

impl Table {
    /// Create a new table, padding or truncating rows to the header width.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<Value>>) -> Self {
        let width = headers.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, Value::Null);
                row
            })
            .collect();
        Self { headers, rows }
    }

    /// Create a table from string headers and raw text cells.
    pub fn from_raw<H: AsRef<str>, S: AsRef<str>>(headers: &[H], rows: &[Vec<S>]) -> Self {
        let headers = headers.iter().map(|h| h.as_ref().to_string()).collect();
        let rows = rows
            .iter()
            .map(|row| row.iter().map(|c| Value::from_raw(c.as_ref())).collect())
            .collect();
        Self::new(headers, rows)
    }

    /// Get the number of columns.
    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Get the number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column by name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Position of a column that must exist.
    pub fn require_column(&self, sheet: &str, name: &str) -> Result<usize> {
        self.column_index(name)
            .ok_or_else(|| StorelensError::missing_column(sheet, name))
    }

    /// Get all values for a column by index.
    pub fn column_values(&self, index: usize) -> impl Iterator<Item = &Value> {
        self.rows.iter().map(move |row| &row[index])
    }

    /// Get a specific cell value.
    pub fn get(&self, row: usize, col: usize) -> Option<&Value> {
        self.rows.get(row).and_then(|r| r.get(col))
    }

    /// Get a cell by column name.
    pub fn value(&self, row: usize, column: &str) -> Option<&Value> {
        self.column_index(column).and_then(|col| self.get(row, col))
    }

    /// Set a specific cell value.
    pub fn set(&mut self, row: usize, col: usize, value: Value) {
        if let Some(cell) = self.rows.get_mut(row).and_then(|r| r.get_mut(col)) {
            *cell = value;
        }
    }

    /// Append a column filled with the given value and return its index.
    pub fn add_column(&mut self, name: impl Into<String>, fill: Value) -> usize {
        self.headers.push(name.into());
        for row in &mut self.rows {
            row.push(fill.clone());
        }
        self.headers.len() - 1
    }

    /// Replace nulls in a column with `fill`. Returns the number of cells filled.
    pub fn fill_null(&mut self, col: usize, fill: &Value) -> usize {
        let mut filled = 0;
        for row in &mut self.rows {
            if row[col].is_null() {
                row[col] = fill.clone();
                filled += 1;
            }
        }
        filled
    }

    /// Apply a function to every cell of a column.
    pub fn map_column(&mut self, col: usize, mut f: impl FnMut(&Value) -> Value) {
        for row in &mut self.rows {
            row[col] = f(&row[col]);
        }
    }

    /// Like [`Table::map_column`] but the function may fail; the row index is
    /// passed along for error reporting.
    pub fn try_map_column(
        &mut self,
        col: usize,
        mut f: impl FnMut(usize, &Value) -> Result<Value>,
    ) -> Result<()> {
        for (idx, row) in self.rows.iter_mut().enumerate() {
            row[col] = f(idx, &row[col])?;
        }
        Ok(())
    }

    /// Keep only rows matching the predicate. Returns the number of rows dropped.
    pub fn retain_rows(&mut self, mut keep: impl FnMut(&[Value]) -> bool) -> usize {
        let before = self.rows.len();
        self.rows.retain(|row| keep(row));
        before - self.rows.len()
    }

    /// Remove exact duplicate rows, keeping the first occurrence.
    /// Returns the number of rows removed.
    pub fn drop_duplicates(&mut self) -> usize {
        let mut seen: HashSet<Vec<Value>> = HashSet::with_capacity(self.rows.len());
        let before = self.rows.len();
        self.rows.retain(|row| seen.insert(row.clone()));
        before - self.rows.len()
    }

    /// Non-null numeric values of a column.
    pub fn numeric_values(&self, col: usize) -> Vec<f64> {
        self.column_values(col).filter_map(Value::as_f64).collect()
    }
}
