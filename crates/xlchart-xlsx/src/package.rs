//! The zip container of an xlsx workbook
//!
//! Entries that are not touched are copied into the output as raw compressed
//! data, so everything the edit does not know about (styles, merged cells,
//! drawings, macros, defined names) survives unchanged.

use std::collections::BTreeMap;
use std::io::{Cursor, Read, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, trace};
use zip::result::ZipError;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::error::{Error, Result};
use crate::xml::{read_relationships, REL_NS};

const ROOT_RELS: &str = "_rels/.rels";

/// An xlsx package held in memory, plus the edits made to it
pub(crate) struct Package {
    path: PathBuf,
    archive: ZipArchive<Cursor<Vec<u8>>>,
    /// Entry names in archive order
    entries: Vec<String>,
    replaced: BTreeMap<String, Vec<u8>>,
    added: Vec<(String, Vec<u8>)>,
}

impl Package {
    /// Read the package at `path`
    pub fn open(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path).map_err(|source| Error::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        let mut archive =
            ZipArchive::new(Cursor::new(bytes)).map_err(|err| Error::UnsupportedFormat {
                path: path.to_path_buf(),
                reason: format!("not an Office Open XML package ({err})"),
            })?;

        let mut entries = Vec::with_capacity(archive.len());
        for i in 0..archive.len() {
            let file = archive.by_index_raw(i).map_err(|source| Error::Package {
                part: format!("#{i}"),
                source,
            })?;
            entries.push(file.name().to_string());
        }
        debug!(path = %path.display(), entries = entries.len(), "read package");

        Ok(Self {
            path: path.to_path_buf(),
            archive,
            entries,
            replaced: BTreeMap::new(),
            added: Vec::new(),
        })
    }

    /// Locate the workbook part through the package relationships
    pub fn workbook_part(&mut self) -> Result<String> {
        if !self.contains(ROOT_RELS) {
            return Err(self.unsupported("no package relationships"));
        }
        let rels = self.read_part(ROOT_RELS)?;
        let rels = read_relationships(&rels).map_err(|source| Error::Xml {
            part: ROOT_RELS.to_string(),
            source,
        })?;

        let office_document = format!("{REL_NS}/officeDocument");
        let target = rels
            .into_iter()
            .find(|rel| rel.rel_type == office_document)
            .map(|rel| rel.target.trim_start_matches('/').to_string())
            .ok_or_else(|| self.unsupported("no office document"))?;

        if !target.to_ascii_lowercase().ends_with(".xml") {
            return Err(self.unsupported("binary workbooks are not supported"));
        }
        if !self.contains(&target) {
            return Err(self.unsupported("workbook part is missing"));
        }
        Ok(target)
    }

    /// Check whether a part exists, ignoring case as part names do
    pub fn contains(&self, part: &str) -> bool {
        self.entries
            .iter()
            .chain(self.added.iter().map(|(name, _)| name))
            .any(|name| name.eq_ignore_ascii_case(part))
    }

    /// Current contents of an existing part
    pub fn read_part(&mut self, part: &str) -> Result<Vec<u8>> {
        if let Some(bytes) = self.replaced.get(part) {
            return Ok(bytes.clone());
        }
        let package_err = |source| Error::Package {
            part: part.to_string(),
            source,
        };

        let mut file = self.archive.by_name(part).map_err(package_err)?;
        let mut bytes = Vec::with_capacity(file.size() as usize);
        file.read_to_end(&mut bytes)
            .map_err(|e| package_err(ZipError::Io(e)))?;
        Ok(bytes)
    }

    /// Replace the contents of an existing part
    pub fn replace_part(&mut self, part: &str, bytes: Vec<u8>) {
        trace!(part, bytes = bytes.len(), "replaced part");
        self.replaced.insert(part.to_string(), bytes);
    }

    /// Add a new part
    pub fn add_part(&mut self, part: String, bytes: Vec<u8>) {
        trace!(part = %part, bytes = bytes.len(), "added part");
        self.added.push((part, bytes));
    }

    /// The first n = 1, 2, ... for which `make(n)` names no existing part
    pub fn next_free_part<F: Fn(u32) -> String>(&self, make: F) -> u32 {
        (1..).find(|&n| !self.contains(&make(n))).unwrap_or(0)
    }

    /// Assemble the edited package
    pub fn to_bytes(&mut self) -> Result<Vec<u8>> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));

        for i in 0..self.archive.len() {
            let file = self.archive.by_index_raw(i).map_err(Error::Serialize)?;
            match self.replaced.get(file.name()) {
                Some(bytes) => {
                    zip.start_file(file.name(), file_options())
                        .map_err(Error::Serialize)?;
                    zip.write_all(bytes)
                        .map_err(|e| Error::Serialize(ZipError::Io(e)))?;
                }
                None => zip.raw_copy_file(file).map_err(Error::Serialize)?,
            }
        }

        for (name, bytes) in &self.added {
            zip.start_file(name.as_str(), file_options())
                .map_err(Error::Serialize)?;
            zip.write_all(bytes)
                .map_err(|e| Error::Serialize(ZipError::Io(e)))?;
        }

        let cursor = zip.finish().map_err(Error::Serialize)?;
        Ok(cursor.into_inner())
    }

    fn unsupported(&self, reason: &str) -> Error {
        Error::UnsupportedFormat {
            path: self.path.clone(),
            reason: reason.to_string(),
        }
    }
}

fn file_options() -> SimpleFileOptions {
    SimpleFileOptions::default().compression_method(CompressionMethod::Deflated)
}
