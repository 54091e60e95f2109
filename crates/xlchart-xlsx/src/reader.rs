//! Source workbook reader

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use calamine::{open_workbook, Data, Range, Reader, Xlsx};
use tracing::debug;

use crate::error::{Error, Result};

/// Rows of a sheet with every cell rendered as text
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SheetRows {
    /// 1-based sheet row of `rows[0]`
    pub first_row: usize,
    /// 1-based sheet column of `rows[i][0]`
    pub first_column: usize,
    /// Rows from the first used row down to the last, padded to equal width
    pub rows: Vec<Vec<String>>,
}

impl SheetRows {
    /// The first row, read as the header
    pub fn header(&self) -> Option<&[String]> {
        self.rows.first().map(Vec::as_slice)
    }

    /// Rows below the header
    pub fn data(&self) -> &[Vec<String>] {
        self.rows.get(1..).unwrap_or_default()
    }

    /// 1-based sheet row of the first data row
    pub fn first_data_row(&self) -> usize {
        self.first_row + 1
    }
}

/// An opened xlsx/xlsm workbook
///
/// Only Office Open XML workbooks are read: they are the only kind the
/// output can be written back as.
pub struct SourceWorkbook {
    sheets: Xlsx<BufReader<File>>,
}

impl SourceWorkbook {
    /// Open a workbook from a file
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let sheets: Xlsx<_> = open_workbook(path).map_err(|source| Error::Open {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "opened workbook");

        Ok(Self { sheets })
    }

    /// Check whether a sheet exists
    pub fn has_sheet(&self, name: &str) -> bool {
        self.sheets.sheet_names().iter().any(|s| s == name)
    }

    /// Read a sheet's cell values
    pub fn range(&mut self, sheet: &str) -> Result<Range<Data>> {
        if !self.has_sheet(sheet) {
            return Err(Error::SheetNotFound(sheet.to_string()));
        }
        self.sheets
            .worksheet_range(sheet)
            .map_err(|source| Error::Read {
                sheet: sheet.to_string(),
                source,
            })
    }

    /// Read a sheet as rows of text
    pub fn rows(&mut self, sheet: &str) -> Result<SheetRows> {
        let range = self.range(sheet)?;
        let rows = range
            .rows()
            .map(|row| row.iter().map(cell_text).collect())
            .collect();

        let (first_row, first_column) = range
            .start()
            .map_or((1, 1), |(row, col)| (row as usize + 1, col as usize + 1));

        Ok(SheetRows {
            first_row,
            first_column,
            rows,
        })
    }
}

/// Render a cell the way it is compared and parsed downstream
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => s.clone(),
        Data::Float(f) => f.to_string(),
        Data::Int(i) => i.to_string(),
        Data::Bool(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
        Data::DateTime(dt) => dt.as_f64().to_string(),
        Data::Error(e) => e.to_string(),
    }
}
