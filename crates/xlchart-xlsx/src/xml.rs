//! Reading and patching the package parts that list sheets
//!
//! Existing parts are never re-serialized. New elements are spliced in
//! front of the parent's closing tag and every other byte is kept as is.

use std::borrow::Cow;

use quick_xml::events::{BytesStart, Event};
use quick_xml::name::QName;
use quick_xml::Reader;

pub(crate) const REL_NS: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

/// One `<Relationship>` of a `.rels` part
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Relationship {
    pub id: String,
    pub rel_type: String,
    pub target: String,
}

/// What `workbook.xml` says about its sheets
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct WorkbookSheets {
    /// Sheet names in workbook order
    pub names: Vec<String>,
    /// Largest `sheetId` in use
    pub max_sheet_id: u32,
    /// Prefix bound to the relationships namespace on the root element
    pub rel_prefix: Option<String>,
}

/// Extensions and part names registered in `[Content_Types].xml`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct ContentTypes {
    pub defaults: Vec<String>,
    pub overrides: Vec<String>,
}

impl ContentTypes {
    pub fn has_default(&self, extension: &str) -> bool {
        self.defaults
            .iter()
            .any(|ext| ext.eq_ignore_ascii_case(extension))
    }
}

pub(crate) fn read_relationships(xml: &[u8]) -> quick_xml::Result<Vec<Relationship>> {
    let mut rels = Vec::new();
    for_each_element(xml, |e| {
        if e.local_name().as_ref() == b"Relationship" {
            rels.push(Relationship {
                id: attr(e, b"Id")?.unwrap_or_default(),
                rel_type: attr(e, b"Type")?.unwrap_or_default(),
                target: attr(e, b"Target")?.unwrap_or_default(),
            });
        }
        Ok(())
    })?;
    Ok(rels)
}

pub(crate) fn read_workbook_sheets(xml: &[u8]) -> quick_xml::Result<WorkbookSheets> {
    let mut sheets = WorkbookSheets::default();
    for_each_element(xml, |e| {
        match e.local_name().as_ref() {
            b"workbook" => {
                for a in e.attributes().flatten() {
                    if let Some(prefix) = a.key.as_ref().strip_prefix(b"xmlns:") {
                        if a.value.as_ref() == REL_NS.as_bytes() {
                            sheets.rel_prefix = Some(String::from_utf8_lossy(prefix).into_owned());
                        }
                    }
                }
            }
            b"sheet" => {
                if let Some(name) = attr(e, b"name")? {
                    sheets.names.push(name);
                }
                let id = attr(e, b"sheetId")?
                    .and_then(|id| id.parse::<u32>().ok())
                    .unwrap_or(0);
                sheets.max_sheet_id = sheets.max_sheet_id.max(id);
            }
            _ => {}
        }
        Ok(())
    })?;
    Ok(sheets)
}

pub(crate) fn read_content_types(xml: &[u8]) -> quick_xml::Result<ContentTypes> {
    let mut types = ContentTypes::default();
    for_each_element(xml, |e| {
        match e.local_name().as_ref() {
            b"Default" => types.defaults.extend(attr(e, b"Extension")?),
            b"Override" => types.overrides.extend(attr(e, b"PartName")?),
            _ => {}
        }
        Ok(())
    })?;
    Ok(types)
}

/// Copy `xml` with `render(prefix)` inserted before the closing tag of the
/// first `parent` element, where `prefix` is the parent's namespace prefix.
///
/// Returns `None` when there is no `parent` element.
pub(crate) fn insert_before_close<F>(
    xml: &[u8],
    parent: &[u8],
    render: F,
) -> quick_xml::Result<Option<Vec<u8>>>
where
    F: FnOnce(Option<&str>) -> String,
{
    let mut reader = Reader::from_reader(xml);
    let mut buf = Vec::new();

    loop {
        let start = reader.buffer_position() as usize;
        match reader.read_event_into(&mut buf)? {
            Event::End(e) if e.local_name().as_ref() == parent => {
                let fragment = render(prefix(e.name()).as_deref());
                let mut out = Vec::with_capacity(xml.len() + fragment.len());
                out.extend_from_slice(&xml[..start]);
                out.extend_from_slice(fragment.as_bytes());
                out.extend_from_slice(&xml[start..]);
                return Ok(Some(out));
            }
            Event::Empty(e) if e.local_name().as_ref() == parent => {
                // <sheets/> becomes <sheets>fragment</sheets>
                let end = reader.buffer_position() as usize;
                let tag = &xml[start..end];
                let open = tag
                    .iter()
                    .rposition(|&b| b == b'/')
                    .map_or(tag, |slash| &tag[..slash]);
                let qname = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                let fragment = render(prefix(e.name()).as_deref());

                let mut out = Vec::with_capacity(xml.len() + fragment.len() + qname.len() + 4);
                out.extend_from_slice(&xml[..start]);
                out.extend_from_slice(open);
                out.push(b'>');
                out.extend_from_slice(fragment.as_bytes());
                out.extend_from_slice(format!("</{qname}>").as_bytes());
                out.extend_from_slice(&xml[end..]);
                return Ok(Some(out));
            }
            Event::Eof => return Ok(None),
            _ => {}
        }
        buf.clear();
    }
}

/// Escape text for element content or double-quoted attribute values
pub(crate) fn escape_xml(s: &str) -> Cow<'_, str> {
    if !s.contains(['&', '<', '>', '"']) {
        return Cow::Borrowed(s);
    }
    Cow::Owned(
        s.replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;")
            .replace('"', "&quot;"),
    )
}

fn for_each_element<F>(xml: &[u8], mut f: F) -> quick_xml::Result<()>
where
    F: FnMut(&BytesStart<'_>) -> quick_xml::Result<()>,
{
    let mut reader = Reader::from_reader(xml);
    reader.trim_text(true);
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) | Event::Empty(e) => f(&e)?,
            Event::Eof => return Ok(()),
            _ => {}
        }
        buf.clear();
    }
}

fn attr(e: &BytesStart<'_>, key: &[u8]) -> quick_xml::Result<Option<String>> {
    for a in e.attributes().flatten() {
        if a.key.as_ref() == key {
            return Ok(Some(quick_xml::escape::unescape(std::str::from_utf8(&a.value)?)?.into_owned()));
        }
    }
    Ok(None)
}

fn prefix(name: QName<'_>) -> Option<String> {
    name.prefix()
        .map(|p| String::from_utf8_lossy(p.as_ref()).into_owned())
}
