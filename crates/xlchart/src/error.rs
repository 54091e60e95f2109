//! Unified error type for a transform run

use thiserror::Error;

/// Result type alias using [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can end a run
#[derive(Debug, Error)]
pub enum Error {
    /// Addressing, column resolution or parsing error
    #[error(transparent)]
    Core(#[from] xlchart_core::Error),

    /// Workbook read or write error
    #[error(transparent)]
    Xlsx(#[from] xlchart_xlsx::Error),

    /// The source sheet has a header but no data rows
    #[error("Sheet '{0}' has no data rows")]
    NoData(String),
}

impl Error {
    /// Process exit status for this error.
    ///
    /// Each failure kind has its own code; 2 is left to argument parsing.
    pub fn exit_code(&self) -> u8 {
        use xlchart_core::Error as Core;
        use xlchart_xlsx::Error as Xlsx;

        let core_code = |err: &Core| match err {
            Core::MissingColumns(_) => 5,
            Core::NonNumericCell { .. } => 6,
            Core::ColumnOutOfRange(_) | Core::InvalidAddress(_) => 9,
        };

        match self {
            Error::Core(err) => core_code(err),
            Error::Xlsx(err) => match err {
                Xlsx::ReadFile { .. }
                | Xlsx::Open { .. }
                | Xlsx::Package { .. }
                | Xlsx::Xml { .. }
                | Xlsx::MissingElement { .. }
                | Xlsx::Read { .. } => 3,
                Xlsx::SheetNotFound(_) => 4,
                Xlsx::SheetCreate { .. } => 7,
                Xlsx::UnsupportedFormat { .. } => 8,
                Xlsx::Serialize(_) => 10,
                Xlsx::Save { .. } => 11,
                Xlsx::Core(err) => core_code(err),
            },
            Error::NoData(_) => 12,
        }
    }
}
