//! # xlchart
//!
//! Reads a table from a worksheet, groups its (x, y) observations by a
//! category column, and writes the reshaped table plus a smoothed line chart
//! (one series per category) into a new sheet of the same workbook.
//!
//! ## Example
//!
//! ```rust,no_run
//! use xlchart::prelude::*;
//!
//! let config = Config {
//!     input: "Book2.xlsx".into(),
//!     source_sheet: "dummy data".to_string(),
//!     destination_sheet: "mias_chart".to_string(),
//!     columns: ColumnNames::new("Measurement Name", "Days on Study", "Times Upper Reference Value"),
//!     ..Config::default()
//! };
//!
//! let summary = xlchart::run(&config).unwrap();
//! println!("{} categories charted", summary.categories);
//! ```

pub mod error;
pub mod pipeline;
pub mod prelude;

pub use error::{Error, Result};
pub use xlchart_core::Error as CoreError;
pub use xlchart_xlsx::Error as XlsxError;
pub use pipeline::{plan, run, Plan, RunSummary};

// Re-export the building blocks
pub use xlchart_chart::{Chart, SheetLayout};
pub use xlchart_core::{CategoryTable, ColumnNames, Config, Observation};
pub use xlchart_xlsx::{OutputWorkbook, SourceWorkbook};
