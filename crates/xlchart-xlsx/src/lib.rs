//! # xlchart-xlsx
//!
//! Workbook I/O for xlchart. Source workbooks are read with `calamine`. The
//! output sheet and its chart are added to the existing xlsx package in
//! place: new parts are appended, the few index parts that list sheets are
//! patched with `quick-xml`, and every other entry is copied as is. The
//! result is saved atomically.

pub mod error;
mod package;
mod parts;
pub mod reader;
pub mod writer;
mod xml;

pub use error::{Error, Result};
pub use reader::{SheetRows, SourceWorkbook};
pub use writer::{validate_sheet_name, OutputWorkbook};
