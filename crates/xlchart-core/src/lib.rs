//! # xlchart-core
//!
//! Core building blocks for xlchart:
//! - [`address`] - A1-style column letters, cell addresses and absolute ranges
//! - [`columns`] - locating the category, x and y columns in a header row
//! - [`aggregate`] - grouping (x, y) observations by category in first-seen order
//! - [`Config`] - the settings of a single run
//!
//! ## Example
//!
//! ```rust
//! use xlchart_core::{aggregate, resolve_columns, ColumnNames};
//!
//! let header = ["kind", "t", "value"];
//! let rows = [["a", "1", "10"], ["b", "1", "20"], ["a", "2", "30"]];
//!
//! let indices = resolve_columns(&header, &ColumnNames::new("kind", "t", "value")).unwrap();
//! let table = aggregate(&rows, &indices).unwrap();
//!
//! assert_eq!(table.categories().collect::<Vec<_>>(), ["a", "b"]);
//! ```

pub mod address;
pub mod aggregate;
pub mod columns;
pub mod config;
pub mod error;

pub use address::{
    absolute_cell_address, absolute_range, cell_address, column_index, column_letter, parse_cell,
};
pub use aggregate::{aggregate, aggregate_from, CategoryTable, Observation};
pub use columns::{resolve_columns, ColumnIndices, ColumnNames};
pub use config::{ChartOptions, Config};
pub use error::{Error, Result};

/// Maximum number of columns in a worksheet (Excel limit)
pub const MAX_COLS: u32 = 16_384;
