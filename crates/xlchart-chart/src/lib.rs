//! # xlchart-chart
//!
//! Chart model for xlchart, and the planner that turns a
//! [`CategoryTable`](xlchart_core::CategoryTable) into the columns and line
//! chart of the output sheet.

mod axis;
mod chart;
mod font;
mod legend;
mod series;

pub mod layout;

pub use axis::Axis;
pub use chart::{Chart, ChartAnchor, ChartType};
pub use font::Font;
pub use layout::{plan_sheet, OutputColumn, SheetLayout};
pub use legend::{Legend, LegendPosition};
pub use series::{DataReference, DataSeries};
