//! In-memory tables: cell values, row-major tables and the statistics
//! computed over them.

mod frame;
mod value;

pub mod stats;

pub use frame::Table;
pub use value::{Value, format_datetime, is_null_token, parse_datetime};
