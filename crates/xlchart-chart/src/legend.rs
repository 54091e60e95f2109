//! Legend types

use crate::font::Font;

/// Chart legend
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Legend {
    /// Position
    pub position: LegendPosition,
    /// Font for the entries
    pub font: Option<Font>,
}

impl Legend {
    /// Create a new legend
    pub fn new(position: LegendPosition) -> Self {
        Self {
            position,
            font: None,
        }
    }

    /// Set the entry font
    pub fn with_font(mut self, font: Font) -> Self {
        self.font = Some(font);
        self
    }
}

/// Legend position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LegendPosition {
    #[default]
    Right,
    Top,
    Bottom,
    Left,
}
