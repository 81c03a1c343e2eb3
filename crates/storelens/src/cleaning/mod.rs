//! Data-quality repair for each entity sheet.

mod cleaner;
mod report;
mod rules;
mod text;

pub use cleaner::{Cleaner, SheetKind, clean_workbook};
pub use report::{CleaningReport, ColumnFill, SheetReport};
pub use rules::{
    AGE_BOUNDS, RATING_BOUNDS, VALID_GENDERS, clean_customers, clean_orders, clean_products,
    clean_reviews,
};
pub use text::{is_title_case, title_case};
