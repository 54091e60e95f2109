//! Workbook I/O error types

use std::path::PathBuf;

use thiserror::Error;

/// Result type for workbook operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while reading or writing workbooks
#[derive(Debug, Error)]
pub enum Error {
    /// The workbook file could not be read
    #[error("Failed to read workbook '{}': {source}", path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file is not an xlsx/xlsm package
    #[error("Unsupported workbook '{}': {reason}", path.display())]
    UnsupportedFormat { path: PathBuf, reason: String },

    /// Workbook cells could not be loaded
    #[error("Failed to open workbook '{}': {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: calamine::XlsxError,
    },

    /// A package entry could not be read
    #[error("Failed to read package part '{part}': {source}")]
    Package {
        part: String,
        #[source]
        source: zip::result::ZipError,
    },

    /// A package part is not well-formed XML
    #[error("Malformed XML in package part '{part}': {source}")]
    Xml {
        part: String,
        #[source]
        source: quick_xml::Error,
    },

    /// A package part lacks an element the edit needs
    #[error("Package part '{part}' has no <{element}> element")]
    MissingElement { part: String, element: String },

    /// A sheet exists but its cells could not be read
    #[error("Failed to read sheet '{sheet}': {source}")]
    Read {
        sheet: String,
        #[source]
        source: calamine::XlsxError,
    },

    /// Sheet not found by name
    #[error("Sheet not found: {0}")]
    SheetNotFound(String),

    /// The output sheet could not be created
    #[error("Failed to create sheet '{name}': {reason}")]
    SheetCreate { name: String, reason: String },

    /// The updated package could not be assembled
    #[error("Failed to assemble workbook: {0}")]
    Serialize(#[source] zip::result::ZipError),

    /// The workbook could not be written to disk
    #[error("Failed to save workbook '{}': {source}", path.display())]
    Save {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Core error
    #[error(transparent)]
    Core(#[from] xlchart_core::Error),
}
