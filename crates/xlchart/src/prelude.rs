//! Prelude module - common imports for xlchart users
//!
//! ```rust
//! use xlchart::prelude::*;
//! ```

pub use crate::{plan, run, Error, Plan, Result, RunSummary};

pub use xlchart_chart::{plan_sheet, Chart, DataReference, DataSeries, SheetLayout};
pub use xlchart_core::{
    absolute_cell_address, absolute_range, aggregate, cell_address, column_letter,
    resolve_columns, CategoryTable, ChartOptions, ColumnIndices, ColumnNames, Config, Observation,
};
pub use xlchart_xlsx::{OutputWorkbook, SheetRows, SourceWorkbook};
