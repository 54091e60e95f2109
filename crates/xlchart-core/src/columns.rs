//! Header-row column resolution

use crate::error::{Error, Result};

/// Display names of the three columns the transform reads
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnNames {
    /// Column holding the category label
    pub category: String,
    /// Column holding the x-axis value
    pub x: String,
    /// Column holding the y-axis value
    pub y: String,
}

impl ColumnNames {
    /// Create a new set of column names
    pub fn new<C, X, Y>(category: C, x: X, y: Y) -> Self
    where
        C: Into<String>,
        X: Into<String>,
        Y: Into<String>,
    {
        Self {
            category: category.into(),
            x: x.into(),
            y: y.into(),
        }
    }
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self::new(
            crate::config::DEFAULT_CATEGORY_COLUMN,
            crate::config::DEFAULT_X_COLUMN,
            crate::config::DEFAULT_Y_COLUMN,
        )
    }
}

/// Resolved 0-based positions of the three columns within a row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnIndices {
    pub category: usize,
    pub x: usize,
    pub y: usize,
}

/// Locate the category, x and y columns in a header row.
///
/// The row is scanned once, left to right. When a name appears more than
/// once the rightmost occurrence wins. A header cell may satisfy several
/// targets at once if the configured names coincide.
///
/// # Errors
///
/// Returns [`Error::MissingColumns`] listing every name that was not found.
pub fn resolve_columns<S: AsRef<str>>(header: &[S], names: &ColumnNames) -> Result<ColumnIndices> {
    let mut category = None;
    let mut x = None;
    let mut y = None;

    for (idx, cell) in header.iter().enumerate() {
        let cell = cell.as_ref();
        if cell == names.category {
            category = Some(idx);
        }
        if cell == names.x {
            x = Some(idx);
        }
        if cell == names.y {
            y = Some(idx);
        }
    }

    match (category, x, y) {
        (Some(category), Some(x), Some(y)) => Ok(ColumnIndices { category, x, y }),
        _ => {
            let missing = [
                (category, &names.category),
                (x, &names.x),
                (y, &names.y),
            ]
            .into_iter()
            .filter(|(found, _)| found.is_none())
            .map(|(_, name)| name.clone())
            .collect();
            Err(Error::MissingColumns(missing))
        }
    }
}
