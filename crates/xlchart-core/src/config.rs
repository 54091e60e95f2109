//! Run configuration

use std::path::PathBuf;

use crate::columns::ColumnNames;

pub const DEFAULT_FILE: &str = "Book2.xlsx";
pub const DEFAULT_SOURCE_SHEET: &str = "dummy data";
pub const DEFAULT_DESTINATION_SHEET: &str = "mias_chart";
pub const DEFAULT_CATEGORY_COLUMN: &str = "Measurement Name";
pub const DEFAULT_X_COLUMN: &str = "Days on Study";
pub const DEFAULT_Y_COLUMN: &str = "Times Upper Reference Value";

/// Everything a single transform run needs
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Workbook to read
    pub input: PathBuf,
    /// Where to save the result (defaults to `input`)
    pub output: Option<PathBuf>,
    /// Sheet holding the source table
    pub source_sheet: String,
    /// Sheet to create for the reshaped table and chart
    pub destination_sheet: String,
    /// Header names of the category, x and y columns
    pub columns: ColumnNames,
    /// Chart placement and labels
    pub chart: ChartOptions,
    /// Plan the output but do not save it
    pub dry_run: bool,
}

impl Config {
    /// Path the workbook is saved to
    pub fn output_path(&self) -> &std::path::Path {
        self.output.as_deref().unwrap_or(&self.input)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_FILE),
            output: None,
            source_sheet: DEFAULT_SOURCE_SHEET.to_string(),
            destination_sheet: DEFAULT_DESTINATION_SHEET.to_string(),
            columns: ColumnNames::default(),
            chart: ChartOptions::default(),
            dry_run: false,
        }
    }
}

/// Fixed chart presentation settings
#[derive(Debug, Clone, PartialEq)]
pub struct ChartOptions {
    /// Top-left cell of the chart (1-based column, row)
    pub anchor: (u32, u32),
    /// Pixel offset from the anchor cell
    pub x_offset: u32,
    pub y_offset: u32,
    /// Category (horizontal) axis title
    pub x_axis_title: String,
    /// Value (vertical) axis title
    pub y_axis_title: String,
    /// Font used for legend and axis text
    pub font_name: String,
    pub font_size: f64,
    /// RGB color, e.g. 0x000000
    pub font_color: u32,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            anchor: (5, 1), // E1
            x_offset: 15,
            y_offset: 10,
            x_axis_title: "xULN".to_string(),
            y_axis_title: "Days On Study".to_string(),
            font_name: "Arial".to_string(),
            font_size: 12.0,
            font_color: 0x000000,
        }
    }
}
