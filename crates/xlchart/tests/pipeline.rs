//! End-to-end tests: write a fixture workbook, run the transform, read the
//! result back

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use calamine::{open_workbook_auto, CellErrorType, Data, Reader};
use pretty_assertions::assert_eq;
use tempfile::TempDir;
use xlchart::prelude::*;

const HEADER: &[&str] = &[
    "Measurement Name",
    "Days on Study",
    "Times Upper Reference Value",
];

/// Write a workbook; cells that parse as finite numbers are written as numbers
fn write_fixture(path: &Path, sheets: &[(&str, &[&[&str]])]) {
    let mut workbook = rust_xlsxwriter::Workbook::new();
    for (name, rows) in sheets {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(*name).unwrap();
        for (r, row) in rows.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                if cell.is_empty() {
                    continue;
                }
                match cell.parse::<f64>() {
                    Ok(n) if n.is_finite() => worksheet.write_number(r as u32, c as u16, n).unwrap(),
                    _ => worksheet.write_string(r as u32, c as u16, *cell).unwrap(),
                };
            }
        }
    }
    workbook.save(path).unwrap();
}

/// Two categories, three observations each, interleaved
fn two_category_fixture(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("Book2.xlsx");
    write_fixture(
        &path,
        &[
            ("Notes", &[&["keep me"], &["42"]]),
            (
                "dummy data",
                &[
                    HEADER,
                    &["ALT", "1", "0.5"],
                    &["AST", "1", "0.7"],
                    &["ALT", "8", "1.5"],
                    &["AST", "8", "1.2"],
                    &["ALT", "15", "2.5"],
                    &["AST", "15", "1.9"],
                ],
            ),
        ],
    );
    path
}

fn config_for(path: &Path) -> Config {
    Config {
        input: path.to_path_buf(),
        ..Config::default()
    }
}

fn read_sheet(path: &Path, sheet: &str) -> Vec<Vec<Data>> {
    let mut workbook = open_workbook_auto(path).unwrap();
    let range = workbook.worksheet_range(sheet).unwrap();
    range.rows().map(|row| row.to_vec()).collect()
}

fn sheet_names(path: &Path) -> Vec<String> {
    open_workbook_auto(path).unwrap().sheet_names()
}

/// Every package entry, decompressed
fn package_parts(path: &Path) -> BTreeMap<String, Vec<u8>> {
    let mut archive = zip::ZipArchive::new(File::open(path).unwrap()).unwrap();
    let mut parts = BTreeMap::new();
    for i in 0..archive.len() {
        let mut file = archive.by_index(i).unwrap();
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes).unwrap();
        parts.insert(file.name().to_string(), bytes);
    }
    parts
}

fn chart_xml(path: &Path) -> String {
    String::from_utf8(package_parts(path).remove("xl/charts/chart1.xml").unwrap()).unwrap()
}

fn text(s: &str) -> Data {
    Data::String(s.to_string())
}

#[test]
fn test_writes_reshaped_sheet() {
    let dir = TempDir::new().unwrap();
    let path = two_category_fixture(&dir);

    let summary = run(&config_for(&path)).unwrap();
    assert_eq!(
        summary,
        RunSummary {
            categories: 2,
            observations: 6,
            columns: 3,
            series: 2,
            axis_mismatches: Vec::new(),
            output: Some(path.clone()),
        }
    );

    assert_eq!(sheet_names(&path), ["Notes", "dummy data", "mias_chart"]);
    assert_eq!(
        read_sheet(&path, "mias_chart"),
        vec![
            vec![text("Days on Study"), text("ALT"), text("AST")],
            vec![Data::Float(1.0), Data::Float(0.5), Data::Float(0.7)],
            vec![Data::Float(8.0), Data::Float(1.5), Data::Float(1.2)],
            vec![Data::Float(15.0), Data::Float(2.5), Data::Float(1.9)],
        ]
    );
}

#[test]
fn test_chart_series_reference_output_ranges() {
    let dir = TempDir::new().unwrap();
    let path = two_category_fixture(&dir);
    run(&config_for(&path)).unwrap();

    let xml = chart_xml(&path);
    for reference in [
        "mias_chart!$B$1",
        "mias_chart!$C$1",
        "mias_chart!$A$2:$A$4",
        "mias_chart!$B$2:$B$4",
        "mias_chart!$C$2:$C$4",
    ] {
        assert!(
            xml.contains(&format!("<c:f>{reference}</c:f>")),
            "missing {reference} in chart XML"
        );
    }
    assert!(xml.contains("<c:lineChart>"));
    assert!(xml.contains(r#"<c:smooth val="1"/>"#));
    assert!(xml.contains(r#"<c:legendPos val="t"/>"#));
    assert!(xml.contains("xULN"));
    assert!(xml.contains("Days On Study"));
}

#[test]
fn test_existing_sheets_are_preserved() {
    let dir = TempDir::new().unwrap();
    let path = two_category_fixture(&dir);
    run(&config_for(&path)).unwrap();

    assert_eq!(
        read_sheet(&path, "Notes"),
        vec![vec![text("keep me")], vec![Data::Float(42.0)]]
    );
    let source = read_sheet(&path, "dummy data");
    assert_eq!(source.len(), 7);
    assert_eq!(source[0][0], text("Measurement Name"));
    assert_eq!(source[6], vec![text("AST"), Data::Float(15.0), Data::Float(1.9)]);
}

#[test]
fn test_separate_output_leaves_input_untouched() {
    let dir = TempDir::new().unwrap();
    let path = two_category_fixture(&dir);
    let before = std::fs::read(&path).unwrap();
    let output = dir.path().join("charted.xlsx");

    let config = Config {
        output: Some(output.clone()),
        ..config_for(&path)
    };
    let summary = run(&config).unwrap();

    assert_eq!(summary.output, Some(output.clone()));
    assert_eq!(std::fs::read(&path).unwrap(), before);
    assert_eq!(sheet_names(&output), ["Notes", "dummy data", "mias_chart"]);
}

#[test]
fn test_quoted_destination_sheet_references() {
    let dir = TempDir::new().unwrap();
    let path = two_category_fixture(&dir);
    let config = Config {
        destination_sheet: "lab chart".to_string(),
        ..config_for(&path)
    };
    run(&config).unwrap();

    let xml = chart_xml(&path);
    assert!(xml.contains("<c:f>'lab chart'!$B$2:$B$4</c:f>"));
    assert_eq!(read_sheet(&path, "lab chart")[0][1], text("ALT"));
}

#[test]
fn test_uneven_categories_use_first_category_axis() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("uneven.xlsx");
    write_fixture(
        &path,
        &[(
            "dummy data",
            &[
                HEADER,
                &["ALT", "1", "10"],
                &["ALT", "2", "11"],
                &["AST", "5", "20"],
            ],
        )],
    );

    let summary = run(&config_for(&path)).unwrap();
    assert_eq!(summary.axis_mismatches, vec!["AST".to_string()]);

    let sheet = read_sheet(&path, "mias_chart");
    assert_eq!(sheet[1][0], Data::Float(1.0));
    assert_eq!(sheet[2][0], Data::Float(2.0));
    assert_eq!(sheet[1][2], Data::Float(20.0));

    let xml = chart_xml(&path);
    assert!(xml.contains("<c:f>mias_chart!$A$2:$A$3</c:f>"));
}

#[test]
fn test_dry_run_does_not_write() {
    let dir = TempDir::new().unwrap();
    let path = two_category_fixture(&dir);
    let before = std::fs::read(&path).unwrap();

    let config = Config {
        dry_run: true,
        ..config_for(&path)
    };
    let summary = run(&config).unwrap();

    assert_eq!(summary.output, None);
    assert_eq!(summary.series, 2);
    assert_eq!(std::fs::read(&path).unwrap(), before);
}

#[test]
fn test_missing_workbook() {
    let dir = TempDir::new().unwrap();
    let err = run(&config_for(&dir.path().join("nope.xlsx"))).unwrap_err();
    assert!(matches!(err, Error::Xlsx(xlchart::XlsxError::ReadFile { .. })));
    assert_eq!(err.exit_code(), 3);
}

#[test]
fn test_existing_parts_are_kept_byte_for_byte() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("styled.xlsx");

    let mut workbook = rust_xlsxwriter::Workbook::new();
    let notes = workbook.add_worksheet();
    notes.set_name("Notes").unwrap();
    notes
        .merge_range(0, 0, 0, 2, "Study summary", &rust_xlsxwriter::Format::new().set_bold())
        .unwrap();
    let date = rust_xlsxwriter::Format::new().set_num_format("yyyy-mm-dd");
    notes.write_number_with_format(1, 0, 45292.0, &date).unwrap();
    notes.set_column_width(0, 30).unwrap();
    let data = workbook.add_worksheet();
    data.set_name("dummy data").unwrap();
    for (c, header) in HEADER.iter().enumerate() {
        data.write_string(0, c as u16, *header).unwrap();
    }
    data.write_string(1, 0, "ALT").unwrap();
    data.write_number(1, 1, 1.0).unwrap();
    data.write_number(1, 2, 0.5).unwrap();
    workbook.define_name("StudyStart", "=Notes!$A$2").unwrap();
    workbook.save(&path).unwrap();

    let before = package_parts(&path);
    run(&config_for(&path)).unwrap();
    let after = package_parts(&path);

    let index_parts = ["xl/workbook.xml", "xl/_rels/workbook.xml.rels", "[Content_Types].xml"];
    for (name, bytes) in &before {
        if index_parts.contains(&name.as_str()) {
            continue;
        }
        assert_eq!(after.get(name), Some(bytes), "{name} changed");
    }
    let notes_xml = String::from_utf8_lossy(&after["xl/worksheets/sheet1.xml"]).into_owned();
    assert!(notes_xml.contains(r#"<mergeCell ref="A1:C1"/>"#));

    let workbook_xml = String::from_utf8_lossy(&after["xl/workbook.xml"]).into_owned();
    assert!(workbook_xml.contains("StudyStart"));
    assert!(workbook_xml.contains(r#"<sheet name="mias_chart" sheetId="3""#));

    assert!(matches!(read_sheet(&path, "Notes")[1][0], Data::DateTime(_)));
    assert_eq!(sheet_names(&path), ["Notes", "dummy data", "mias_chart"]);
}

#[test]
fn test_non_finite_values_become_error_cells() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("overflow.xlsx");
    write_fixture(
        &path,
        &[(
            "dummy data",
            &[
                HEADER,
                &["ALT", "1", "inf"],
                &["ALT", "2", "NaN"],
                &["ALT", "3", "-inf"],
            ],
        )],
    );

    run(&config_for(&path)).unwrap();

    let sheet = read_sheet(&path, "mias_chart");
    assert_eq!(sheet[1][1], Data::Error(CellErrorType::Div0));
    assert_eq!(sheet[2][1], Data::Error(CellErrorType::Num));
    assert_eq!(sheet[3][1], Data::Error(CellErrorType::Div0));
    assert_eq!(sheet[3][0], Data::Float(3.0));
}

#[test]
fn test_offset_table_reports_sheet_column() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("offset.xlsx");
    write_fixture(
        &path,
        &[(
            "dummy data",
            &[
                &["", "", HEADER[0], HEADER[1], HEADER[2]],
                &["", "", "ALT", "1", "10"],
                &["", "", "ALT", "two", "11"],
            ],
        )],
    );

    let err = run(&config_for(&path)).unwrap_err();
    assert_eq!(err.to_string(), "Non-numeric cell 'two' at row 3, column D");
}

#[test]
fn test_non_xlsx_inputs_are_rejected_untouched() {
    let dir = TempDir::new().unwrap();

    let legacy = dir.path().join("Book2.xls");
    std::fs::write(&legacy, b"\xD0\xCF\x11\xE0\xA1\xB1\x1A\xE1 compound document").unwrap();

    let ods = dir.path().join("Book2.ods");
    let mut zip = zip::ZipWriter::new(File::create(&ods).unwrap());
    zip.start_file("mimetype", zip::write::SimpleFileOptions::default())
        .unwrap();
    zip.write_all(b"application/vnd.oasis.opendocument.spreadsheet").unwrap();
    zip.start_file("content.xml", zip::write::SimpleFileOptions::default())
        .unwrap();
    zip.write_all(b"<office:document-content/>").unwrap();
    zip.finish().unwrap();

    for path in [legacy, ods] {
        let before = std::fs::read(&path).unwrap();
        let err = run(&config_for(&path)).unwrap_err();
        assert!(
            matches!(err, Error::Xlsx(xlchart::XlsxError::UnsupportedFormat { .. })),
            "{err}"
        );
        assert_eq!(err.exit_code(), 8);
        assert_eq!(std::fs::read(&path).unwrap(), before);
    }
}

#[test]
fn test_failures_leave_file_untouched() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.xlsx");
    write_fixture(
        &path,
        &[
            (
                "dummy data",
                &[HEADER, &["ALT", "1", "10"], &["ALT", "two", "11"]],
            ),
            ("Existing", &[&["x"]]),
        ],
    );
    let before = std::fs::read(&path).unwrap();

    let cases = [
        // non-numeric x cell
        (config_for(&path), 6),
        // unknown source sheet
        (
            Config {
                source_sheet: "missing".to_string(),
                ..config_for(&path)
            },
            4,
        ),
        // header lacks the y column
        (
            Config {
                columns: ColumnNames::new("Measurement Name", "Days on Study", "Nope"),
                ..config_for(&path)
            },
            5,
        ),
        // destination collides with an existing sheet, ignoring case
        (
            Config {
                destination_sheet: "existing".to_string(),
                ..config_for(&path)
            },
            7,
        ),
    ];

    for (config, code) in cases {
        let err = run(&config).unwrap_err();
        assert_eq!(err.exit_code(), code, "{err}");
        assert_eq!(std::fs::read(&path).unwrap(), before);
    }
}

#[test]
fn test_non_numeric_message_names_cell() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.xlsx");
    write_fixture(
        &path,
        &[("dummy data", &[HEADER, &["ALT", "1", "high"]])],
    );

    let err = run(&config_for(&path)).unwrap_err();
    assert_eq!(err.to_string(), "Non-numeric cell 'high' at row 2, column C");
}
