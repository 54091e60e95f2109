//! Output sheet layout
//!
//! The output sheet holds one shared x column followed by one y column per
//! category, and a smoothed line chart with one series per category:
//!
//! ```text
//!      A              B        C        E ...
//!  1   Days on Study  catA     catB     +-------------+
//!  2   1              10       20       |  line chart |
//!  3   2              11       21       |             |
//! ```
//!
//! Only the first category's x-values are written. Categories whose x-values
//! differ are still plotted against column A (see
//! [`CategoryTable::axis_mismatches`]).

use tracing::debug;
use xlchart_core::{absolute_cell_address, absolute_range, CategoryTable, ChartOptions, Result};

use crate::axis::Axis;
use crate::chart::{Chart, ChartAnchor, ChartType};
use crate::font::Font;
use crate::legend::{Legend, LegendPosition};
use crate::series::{DataReference, DataSeries};

/// Column holding the shared x-axis values
pub const X_COLUMN: u32 = 1;

/// Row holding the column headers; values start on the row below
pub const HEADER_ROW: u32 = 1;

/// One column of the output sheet
#[derive(Debug, Clone, PartialEq)]
pub struct OutputColumn {
    /// 1-based column index
    pub column: u32,
    /// Text written to the header row
    pub header: String,
    /// Values written below the header
    pub values: Vec<f64>,
}

/// Everything the writer puts on the output sheet
#[derive(Debug, Clone, PartialEq)]
pub struct SheetLayout {
    /// Output sheet name
    pub sheet: String,
    /// Columns in write order, starting with the shared x column
    pub columns: Vec<OutputColumn>,
    /// Line chart, absent when there are no categories
    pub chart: Option<Chart>,
}

impl SheetLayout {
    /// Number of category (y) columns
    pub fn category_count(&self) -> usize {
        self.columns.len().saturating_sub(1)
    }
}

/// Plan the output sheet for a category table.
///
/// # Errors
///
/// Fails with [`xlchart_core::Error::ColumnOutOfRange`] when there are more
/// categories than a worksheet has columns.
pub fn plan_sheet(
    sheet: &str,
    x_header: &str,
    table: &CategoryTable,
    options: &ChartOptions,
) -> Result<SheetLayout> {
    let axis = table.first().map(|(_, obs)| obs).unwrap_or_default();
    let mut columns = vec![OutputColumn {
        column: X_COLUMN,
        header: x_header.to_string(),
        values: axis.iter().map(|o| o.x).collect(),
    }];

    if table.is_empty() {
        return Ok(SheetLayout {
            sheet: sheet.to_string(),
            columns,
            chart: None,
        });
    }

    let first_value_row = HEADER_ROW + 1;
    let categories = absolute_range(
        sheet,
        X_COLUMN,
        first_value_row,
        HEADER_ROW + axis.len() as u32,
    )?;
    debug!(%categories, "shared x-axis range");

    let mut chart = line_chart(options);
    let mut column = X_COLUMN;
    for (label, observations) in table.iter() {
        column += 1;

        let name = absolute_cell_address(sheet, column, HEADER_ROW)?;
        let values = absolute_range(
            sheet,
            column,
            first_value_row,
            HEADER_ROW + observations.len() as u32,
        )?;
        debug!(category = label, %name, %values, "planned series");

        chart.add_series(
            DataSeries::new(DataReference::formula(values))
                .with_name(DataReference::formula(name))
                .with_categories(DataReference::formula(categories.clone()))
                .smoothed(),
        );
        columns.push(OutputColumn {
            column,
            header: label.to_string(),
            values: observations.iter().map(|o| o.y).collect(),
        });
    }

    Ok(SheetLayout {
        sheet: sheet.to_string(),
        columns,
        chart: Some(chart),
    })
}

fn line_chart(options: &ChartOptions) -> Chart {
    let font = Font::new(
        options.font_name.clone(),
        options.font_size,
        options.font_color,
    );

    let mut chart = Chart::new(ChartType::Line);
    chart.anchor = ChartAnchor {
        column: options.anchor.0,
        row: options.anchor.1,
        x_offset: options.x_offset,
        y_offset: options.y_offset,
        ..ChartAnchor::default()
    };
    chart.legend = Some(Legend::new(LegendPosition::Top).with_font(font.clone()));
    chart.category_axis = Some(
        Axis::new()
            .with_title(options.x_axis_title.clone())
            .with_font(font.clone()),
    );
    chart.value_axis = Some(
        Axis::new()
            .with_title(options.y_axis_title.clone())
            .with_font(font)
            .with_major_gridlines(),
    );
    chart
}
