//! Font settings for chart text

/// Chart text font
#[derive(Debug, Clone, PartialEq)]
pub struct Font {
    /// Typeface name
    pub name: String,
    /// Size in points
    pub size: f64,
    /// RGB color (0xRRGGBB)
    pub color: u32,
}

impl Font {
    pub fn new<S: Into<String>>(name: S, size: f64, color: u32) -> Self {
        Self {
            name: name.into(),
            size,
            color,
        }
    }
}
