//! Chart types

use crate::axis::Axis;
use crate::legend::Legend;
use crate::series::DataSeries;

/// Default chart size in pixels
pub const DEFAULT_WIDTH: u32 = 480;
pub const DEFAULT_HEIGHT: u32 = 288;

/// Chart types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChartType {
    #[default]
    Line,
}

/// Chart definition
#[derive(Debug, Clone, PartialEq)]
pub struct Chart {
    /// Chart type
    pub chart_type: ChartType,
    /// Data series
    pub series: Vec<DataSeries>,
    /// Category axis (X)
    pub category_axis: Option<Axis>,
    /// Value axis (Y)
    pub value_axis: Option<Axis>,
    /// Legend
    pub legend: Option<Legend>,
    /// Position anchor
    pub anchor: ChartAnchor,
}

impl Chart {
    /// Create a new chart
    pub fn new(chart_type: ChartType) -> Self {
        Self {
            chart_type,
            series: Vec::new(),
            category_axis: None,
            value_axis: None,
            legend: None,
            anchor: ChartAnchor::default(),
        }
    }

    /// Add a data series
    pub fn add_series(&mut self, series: DataSeries) {
        self.series.push(series);
    }
}

/// Chart anchor position and size
///
/// The chart's top-left corner sits `x_offset`/`y_offset` pixels inside the
/// anchor cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartAnchor {
    /// Anchor column (1-based)
    pub column: u32,
    /// Anchor row (1-based)
    pub row: u32,
    /// Horizontal offset in pixels
    pub x_offset: u32,
    /// Vertical offset in pixels
    pub y_offset: u32,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl Default for ChartAnchor {
    fn default() -> Self {
        Self {
            column: 1,
            row: 1,
            x_offset: 0,
            y_offset: 0,
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
        }
    }
}
