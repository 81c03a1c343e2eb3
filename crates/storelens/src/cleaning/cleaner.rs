//! Cleaning orchestration across every sheet of a workbook.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::Result;
use crate::input::Workbook;
use crate::table::Table;

use super::report::{CleaningReport, SheetReport};
use super::rules;

/// Entity type of a sheet, which selects its rule set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SheetKind {
    Customers,
    Products,
    Orders,
    Reviews,
}

impl SheetKind {
    /// All entity kinds, in canonical sheet order.
    pub const ALL: [SheetKind; 4] = [
        SheetKind::Customers,
        SheetKind::Products,
        SheetKind::Orders,
        SheetKind::Reviews,
    ];

    /// Tag a sheet by its name. Unrecognized names have no rule set.
    pub fn from_sheet_name(name: &str) -> Option<Self> {
        match name {
            "customers" => Some(SheetKind::Customers),
            "products" => Some(SheetKind::Products),
            "orders" => Some(SheetKind::Orders),
            "reviews" => Some(SheetKind::Reviews),
            _ => None,
        }
    }

    /// Sheet name for this kind.
    pub fn sheet_name(&self) -> &'static str {
        match self {
            SheetKind::Customers => "customers",
            SheetKind::Products => "products",
            SheetKind::Orders => "orders",
            SheetKind::Reviews => "reviews",
        }
    }
}

impl fmt::Display for SheetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.sheet_name())
    }
}

/// Applies deduplication and the per-entity rules to every sheet.
pub struct Cleaner;

impl Cleaner {
    /// Create a new cleaner.
    pub fn new() -> Self {
        Self
    }

    /// Clean every sheet. The input workbook is consumed.
    pub fn clean(&self, workbook: Workbook) -> Result<(Workbook, CleaningReport)> {
        let mut cleaned = Workbook::new();
        let mut report = CleaningReport::new();

        for (name, table) in workbook {
            let (table, sheet_report) = self.clean_sheet(&name, table)?;
            cleaned.insert(name, table);
            report.sheets.push(sheet_report);
        }

        Ok((cleaned, report))
    }

    /// Clean a single sheet according to the kind its name maps to.
    pub fn clean_sheet(&self, name: &str, mut table: Table) -> Result<(Table, SheetReport)> {
        info!(sheet = name, "Cleaning sheet: {}", name);

        let kind = SheetKind::from_sheet_name(name);
        let mut report = SheetReport::new(name, kind, table.row_count());
        report.duplicates_removed = table.drop_duplicates();

        let table = match kind {
            Some(SheetKind::Customers) => rules::clean_customers(table, &mut report)?,
            Some(SheetKind::Products) => rules::clean_products(table, &mut report)?,
            Some(SheetKind::Orders) => rules::clean_orders(table, &mut report)?,
            Some(SheetKind::Reviews) => rules::clean_reviews(table, &mut report)?,
            None => {
                warn!(sheet = name, "No cleaning rules for sheet, only duplicates removed");
                table
            }
        };

        // Rows are stored densely, so the surviving rows are already indexed 0..n
        report.rows_written = table.row_count();
        report.columns = table.column_count();

        info!(
            sheet = name,
            rows = report.rows_written,
            duplicates = report.duplicates_removed,
            dropped = report.invalid_rows_dropped,
            filled = report.values_filled(),
            "Finished cleaning: {}",
            name
        );

        Ok((table, report))
    }
}

impl Default for Cleaner {
    fn default() -> Self {
        Self::new()
    }
}

/// Clean every sheet of a workbook with the default cleaner.
pub fn clean_workbook(workbook: Workbook) -> Result<(Workbook, CleaningReport)> {
    Cleaner::new().clean(workbook)
}
