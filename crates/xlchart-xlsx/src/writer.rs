//! Output workbook writer
//!
//! The new sheet is added to the existing package: its worksheet, drawing and
//! chart parts are appended, and `workbook.xml`, the workbook relationships
//! and `[Content_Types].xml` gain one entry each. Every other part is carried
//! over untouched. Nothing reaches the filesystem before
//! [`OutputWorkbook::save`], which writes to a temporary file beside the
//! destination and renames it into place.

use std::io::Write;
use std::path::Path;

use tracing::{debug, info};
use xlchart_chart::SheetLayout;

use crate::error::{Error, Result};
use crate::package::Package;
use crate::parts::{chart_xml, drawing_xml, relationships_xml, worksheet_xml};
use crate::xml::{
    escape_xml, insert_before_close, read_content_types, read_relationships,
    read_workbook_sheets, WorkbookSheets, REL_NS,
};

const CONTENT_TYPES: &str = "[Content_Types].xml";

const WORKSHEET_TYPE: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml";
const DRAWING_TYPE: &str = "application/vnd.openxmlformats-officedocument.drawing+xml";
const CHART_TYPE: &str = "application/vnd.openxmlformats-officedocument.drawingml.chart+xml";
const RELS_TYPE: &str = "application/vnd.openxmlformats-package.relationships+xml";

/// Characters Excel does not allow in sheet names
const INVALID_SHEET_CHARS: &[char] = &['[', ']', ':', '*', '?', '/', '\\'];
const MAX_SHEET_NAME_LEN: usize = 31;

/// An existing xlsx/xlsm workbook being extended with new sheets
pub struct OutputWorkbook {
    package: Package,
    workbook_part: String,
    sheets: WorkbookSheets,
}

impl OutputWorkbook {
    /// Open an xlsx/xlsm workbook for editing.
    ///
    /// # Errors
    ///
    /// [`Error::UnsupportedFormat`] for anything that is not an Office Open
    /// XML workbook package (xls, xlsb, ods, ...).
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut package = Package::open(path.as_ref())?;
        let workbook_part = package.workbook_part()?;
        let xml = package.read_part(&workbook_part)?;
        let sheets = read_workbook_sheets(&xml).map_err(|source| Error::Xml {
            part: workbook_part.clone(),
            source,
        })?;
        debug!(workbook = %workbook_part, sheets = sheets.names.len(), "opened package");

        Ok(Self {
            package,
            workbook_part,
            sheets,
        })
    }

    /// Sheet names in workbook order
    pub fn sheet_names(&self) -> &[String] {
        &self.sheets.names
    }

    /// Check that `name` is a valid sheet name not already in the workbook.
    ///
    /// Sheet names are unique regardless of case, as in Excel.
    pub fn check_new_sheet(&self, name: &str) -> Result<()> {
        validate_sheet_name(name)?;
        let lowered = name.to_lowercase();
        if self.sheets.names.iter().any(|s| s.to_lowercase() == lowered) {
            return Err(sheet_create(name, "a sheet with this name already exists"));
        }
        Ok(())
    }

    /// Add the layout's sheet, its columns and its chart
    pub fn write_layout(&mut self, layout: &SheetLayout) -> Result<()> {
        self.check_new_sheet(&layout.sheet)?;

        let (dir, file) = match self.workbook_part.rsplit_once('/') {
            Some((dir, file)) => (format!("{dir}/"), file.to_string()),
            None => (String::new(), self.workbook_part.clone()),
        };
        let workbook_rels_part = format!("{dir}_rels/{file}.rels");

        let sheet_number = self
            .package
            .next_free_part(|n| format!("{dir}worksheets/sheet{n}.xml"));
        let sheet_part = format!("{dir}worksheets/sheet{sheet_number}.xml");
        let mut content_types = vec![(sheet_part.clone(), WORKSHEET_TYPE)];

        let drawing_rel = match &layout.chart {
            Some(chart) => {
                let drawing_number = self
                    .package
                    .next_free_part(|n| format!("{dir}drawings/drawing{n}.xml"));
                let chart_number = self
                    .package
                    .next_free_part(|n| format!("{dir}charts/chart{n}.xml"));
                let drawing_part = format!("{dir}drawings/drawing{drawing_number}.xml");
                let chart_part = format!("{dir}charts/chart{chart_number}.xml");

                let drawing_type = format!("{REL_NS}/drawing");
                let drawing_target = format!("../drawings/drawing{drawing_number}.xml");
                self.package.add_part(
                    format!("{dir}worksheets/_rels/sheet{sheet_number}.xml.rels"),
                    relationships_xml(&[("rId1", drawing_type.as_str(), drawing_target.as_str())])
                        .into_bytes(),
                );
                self.package.add_part(
                    drawing_part.clone(),
                    drawing_xml(&chart.anchor, "rId1").into_bytes(),
                );
                let chart_type = format!("{REL_NS}/chart");
                let chart_target = format!("../charts/chart{chart_number}.xml");
                self.package.add_part(
                    format!("{dir}drawings/_rels/drawing{drawing_number}.xml.rels"),
                    relationships_xml(&[("rId1", chart_type.as_str(), chart_target.as_str())])
                        .into_bytes(),
                );
                self.package
                    .add_part(chart_part.clone(), chart_xml(chart).into_bytes());
                debug!(drawing = %drawing_part, chart = %chart_part, series = chart.series.len(), "added chart");

                content_types.push((drawing_part, DRAWING_TYPE));
                content_types.push((chart_part, CHART_TYPE));
                Some("rId1")
            }
            None => None,
        };
        self.package
            .add_part(sheet_part.clone(), worksheet_xml(layout, drawing_rel)?.into_bytes());

        let rel_id = self.add_workbook_relationship(
            &workbook_rels_part,
            &format!("worksheets/sheet{sheet_number}.xml"),
        )?;
        self.add_sheet_entry(&layout.sheet, &rel_id)?;
        self.add_content_types(&content_types)?;

        info!(
            sheet = %layout.sheet,
            part = %sheet_part,
            columns = layout.columns.len(),
            "wrote output sheet"
        );
        Ok(())
    }

    /// Serialize the edited workbook
    pub fn to_bytes(&mut self) -> Result<Vec<u8>> {
        self.package.to_bytes()
    }

    /// Save to `path`, replacing any existing file atomically
    pub fn save<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let path = path.as_ref();
        let bytes = self.to_bytes()?;
        let save_err = |source| Error::Save {
            path: path.to_path_buf(),
            source,
        };

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut file = tempfile::NamedTempFile::new_in(dir).map_err(save_err)?;
        file.write_all(&bytes).map_err(save_err)?;
        file.as_file().sync_all().map_err(save_err)?;
        file.persist(path).map_err(|e| save_err(e.error))?;

        info!(path = %path.display(), bytes = bytes.len(), "saved workbook");
        Ok(())
    }

    fn add_workbook_relationship(&mut self, part: &str, target: &str) -> Result<String> {
        let xml = self.package.read_part(part)?;
        let existing = read_relationships(&xml).map_err(|source| xml_err(part, source))?;
        let id = (1..)
            .map(|n| format!("rId{n}"))
            .find(|id| existing.iter().all(|rel| &rel.id != id))
            .unwrap_or_default();

        let updated = insert_before_close(&xml, b"Relationships", |prefix| {
            format!(
                r#"<{}Relationship Id="{id}" Type="{REL_NS}/worksheet" Target="{}"/>"#,
                qualify(prefix),
                escape_xml(target)
            )
        })
        .map_err(|source| xml_err(part, source))?
        .ok_or_else(|| missing_element(part, "Relationships"))?;

        self.package.replace_part(part, updated);
        Ok(id)
    }

    fn add_sheet_entry(&mut self, name: &str, rel_id: &str) -> Result<()> {
        let part = self.workbook_part.clone();
        let xml = self.package.read_part(&part)?;
        let sheet_id = self.sheets.max_sheet_id + 1;

        let (rel_attr, rel_decl) = match &self.sheets.rel_prefix {
            Some(prefix) => (format!("{prefix}:id"), String::new()),
            None => ("r:id".to_string(), format!(r#" xmlns:r="{REL_NS}""#)),
        };
        let updated = insert_before_close(&xml, b"sheets", |prefix| {
            format!(
                r#"<{}sheet name="{}" sheetId="{sheet_id}" {rel_attr}="{rel_id}"{rel_decl}/>"#,
                qualify(prefix),
                escape_xml(name)
            )
        })
        .map_err(|source| xml_err(&part, source))?
        .ok_or_else(|| missing_element(&part, "sheets"))?;

        self.package.replace_part(&part, updated);
        self.sheets.names.push(name.to_string());
        self.sheets.max_sheet_id = sheet_id;
        Ok(())
    }

    fn add_content_types(&mut self, parts: &[(String, &str)]) -> Result<()> {
        let xml = self.package.read_part(CONTENT_TYPES)?;
        let types = read_content_types(&xml).map_err(|source| xml_err(CONTENT_TYPES, source))?;

        let updated = insert_before_close(&xml, b"Types", |prefix| {
            let prefix = qualify(prefix);
            let mut fragment = String::new();
            if !types.has_default("rels") {
                fragment.push_str(&format!(
                    r#"<{prefix}Default Extension="rels" ContentType="{RELS_TYPE}"/>"#
                ));
            }
            for (part, content_type) in parts {
                fragment.push_str(&format!(
                    r#"<{prefix}Override PartName="/{}" ContentType="{content_type}"/>"#,
                    escape_xml(part)
                ));
            }
            fragment
        })
        .map_err(|source| xml_err(CONTENT_TYPES, source))?
        .ok_or_else(|| missing_element(CONTENT_TYPES, "Types"))?;

        self.package.replace_part(CONTENT_TYPES, updated);
        Ok(())
    }
}

/// Check a sheet name against Excel's rules
pub fn validate_sheet_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(sheet_create(name, "sheet name is empty"));
    }
    if name.chars().count() > MAX_SHEET_NAME_LEN {
        return Err(sheet_create(
            name,
            &format!("sheet name is longer than {MAX_SHEET_NAME_LEN} characters"),
        ));
    }
    if let Some(c) = name.chars().find(|c| INVALID_SHEET_CHARS.contains(c)) {
        return Err(sheet_create(name, &format!("sheet name contains '{c}'")));
    }
    if name.starts_with('\'') || name.ends_with('\'') {
        return Err(sheet_create(
            name,
            "sheet name starts or ends with an apostrophe",
        ));
    }
    if name.eq_ignore_ascii_case("History") {
        return Err(sheet_create(name, "'History' is reserved"));
    }
    Ok(())
}

fn qualify(prefix: Option<&str>) -> String {
    prefix.map(|p| format!("{p}:")).unwrap_or_default()
}

fn sheet_create(name: &str, reason: &str) -> Error {
    Error::SheetCreate {
        name: name.to_string(),
        reason: reason.to_string(),
    }
}

fn xml_err(part: &str, source: quick_xml::Error) -> Error {
    Error::Xml {
        part: part.to_string(),
        source,
    }
}

fn missing_element(part: &str, element: &str) -> Error {
    Error::MissingElement {
        part: part.to_string(),
        element: element.to_string(),
    }
}
