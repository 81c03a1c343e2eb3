//! Input handling: workbook sources, sheet loading and source metadata.

mod parser;
mod source;
mod workbook;

pub use parser::{Parser, ParserConfig};
pub use source::SourceMetadata;
pub use workbook::{Workbook, WorkbookReader, load_workbook, load_workbook_with};
