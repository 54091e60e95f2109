//! Error types for xlchart-core

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in xlchart-core
#[derive(Debug, Error, Clone, PartialEq)]
pub enum Error {
    /// Column index outside 1..=MAX_COLS
    #[error("Unsupported column index {0} (supported: 1..={max})", max = crate::MAX_COLS)]
    ColumnOutOfRange(u32),

    /// Invalid cell address format
    #[error("Invalid cell address: {0}")]
    InvalidAddress(String),

    /// One or more required header names were not found
    #[error("Missing column(s) in header row: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    /// A value cell could not be parsed as a number
    #[error("Non-numeric cell '{value}' at row {row}, column {column}")]
    NonNumericCell {
        /// Raw cell text
        value: String,
        /// 1-based sheet row
        row: usize,
        /// Column letter
        column: String,
    },
}
