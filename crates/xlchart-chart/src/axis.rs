//! Axis types

use crate::font::Font;

/// Chart axis
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Axis {
    /// Axis title
    pub title: Option<String>,
    /// Font for the title and tick labels
    pub font: Option<Font>,
    /// Draw major gridlines across the plot area
    pub major_gridlines: bool,
}

impl Axis {
    /// Create a new axis
    pub fn new() -> Self {
        Self::default()
    }

    /// Set axis title
    pub fn with_title<S: Into<String>>(mut self, title: S) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the title and label font
    pub fn with_font(mut self, font: Font) -> Self {
        self.font = Some(font);
        self
    }

    /// Enable major gridlines
    pub fn with_major_gridlines(mut self) -> Self {
        self.major_gridlines = true;
        self
    }
}
