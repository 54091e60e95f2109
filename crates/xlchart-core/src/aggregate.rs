//! Grouping of numeric observations by category label

use indexmap::IndexMap;

use crate::address::column_letter;
use crate::columns::ColumnIndices;
use crate::error::{Error, Result};

/// One (x, y) pair taken from a single source row
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    pub x: f64,
    pub y: f64,
}

impl Observation {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Observations grouped by category label.
///
/// Categories iterate in order of first appearance in the source rows and
/// observations within a category keep source row order. The first category
/// supplies the shared x-axis of the output sheet.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryTable {
    categories: IndexMap<String, Vec<Observation>>,
}

impl CategoryTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an observation, creating the category if it is new
    pub fn push<S: Into<String>>(&mut self, category: S, observation: Observation) {
        self.categories
            .entry(category.into())
            .or_default()
            .push(observation);
    }

    /// Number of distinct categories
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Total number of observations across all categories
    pub fn observation_count(&self) -> usize {
        self.categories.values().map(Vec::len).sum()
    }

    /// Observations for a category
    pub fn get(&self, category: &str) -> Option<&[Observation]> {
        self.categories.get(category).map(Vec::as_slice)
    }

    /// The first-seen category and its observations
    pub fn first(&self) -> Option<(&str, &[Observation])> {
        self.categories
            .first()
            .map(|(name, obs)| (name.as_str(), obs.as_slice()))
    }

    /// Category labels in first-seen order
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.categories.keys().map(String::as_str)
    }

    /// Iterate categories and their observations in first-seen order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[Observation])> {
        self.categories
            .iter()
            .map(|(name, obs)| (name.as_str(), obs.as_slice()))
    }

    /// Categories whose x-values differ from the first category's.
    ///
    /// The output sheet writes a single x column taken from the first
    /// category, so any category listed here will be plotted against x
    /// values that are not its own.
    pub fn axis_mismatches(&self) -> Vec<&str> {
        let Some((_, axis)) = self.first() else {
            return Vec::new();
        };

        self.iter()
            .skip(1)
            .filter(|(_, obs)| {
                obs.len() != axis.len()
                    || obs.iter().zip(axis).any(|(a, b)| !same_value(a.x, b.x))
            })
            .map(|(name, _)| name)
            .collect()
    }
}

fn same_value(a: f64, b: f64) -> bool {
    a == b || (a.is_nan() && b.is_nan())
}

/// Group data rows by category, assuming the table starts at cell A1.
///
/// See [`aggregate_from`].
pub fn aggregate<R, S>(rows: &[R], indices: &ColumnIndices) -> Result<CategoryTable>
where
    R: AsRef<[S]>,
    S: AsRef<str>,
{
    aggregate_from(rows, indices, 2, 1)
}

/// Group data rows by category.
///
/// `first_row` and `first_column` are the 1-based sheet row and column of
/// `rows[0][0]`; they are only used to locate the offending cell in error
/// messages. Cells missing from a short row read as the empty string.
///
/// # Errors
///
/// Returns [`Error::NonNumericCell`] for the first x or y cell that does not
/// parse as a float. No partial table is returned.
pub fn aggregate_from<R, S>(
    rows: &[R],
    indices: &ColumnIndices,
    first_row: usize,
    first_column: usize,
) -> Result<CategoryTable>
where
    R: AsRef<[S]>,
    S: AsRef<str>,
{
    let mut table = CategoryTable::new();

    for (offset, row) in rows.iter().enumerate() {
        let row = row.as_ref();
        let at = (first_row + offset, first_column);

        let x = parse_number(row, indices.x, at)?;
        let y = parse_number(row, indices.y, at)?;
        table.push(cell_text(row, indices.category), Observation::new(x, y));
    }

    Ok(table)
}

fn cell_text<S: AsRef<str>>(row: &[S], idx: usize) -> &str {
    row.get(idx).map(AsRef::as_ref).unwrap_or("")
}

/// Parse the cell at `idx`; `(row, first_column)` locates `row[0]` on the sheet
fn parse_number<S: AsRef<str>>(
    row: &[S],
    idx: usize,
    (row_number, first_column): (usize, usize),
) -> Result<f64> {
    let raw = cell_text(row, idx);
    raw.parse::<f64>().map_err(|_| {
        let column = first_column + idx;
        Error::NonNumericCell {
            value: raw.to_string(),
            row: row_number,
            column: u32::try_from(column)
                .ok()
                .and_then(|col| column_letter(col).ok())
                .unwrap_or_else(|| format!("#{column}")),
        }
    })
}
