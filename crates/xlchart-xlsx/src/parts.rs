//! XML for the parts added with the output sheet

use xlchart_chart::{Axis, Chart, ChartAnchor, ChartType, Font, LegendPosition, SheetLayout};
use xlchart_core::{cell_address, Result};

use crate::xml::escape_xml;

const XML_DECL: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;
const MAIN_NS: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";
const RELS_NS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
const CHART_NS: &str = "http://schemas.openxmlformats.org/drawingml/2006/chart";
const DRAWING_NS: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
const SHEET_DRAWING_NS: &str =
    "http://schemas.openxmlformats.org/drawingml/2006/spreadsheetDrawing";

/// English Metric Units per pixel at 96 dpi
const EMU_PER_PIXEL: u64 = 9525;

const CATEGORY_AXIS_ID: u32 = 50_010_001;
const VALUE_AXIS_ID: u32 = 50_010_002;

/// Worksheet with the layout's columns, referencing its drawing when there
/// is a chart.
///
/// Headers are inline strings so the shared string table is left alone.
/// NaN is written as `#NUM!` and infinities as `#DIV/0!`.
pub(crate) fn worksheet_xml(layout: &SheetLayout, drawing_rel: Option<&str>) -> Result<String> {
    let rows = layout
        .columns
        .iter()
        .map(|c| c.values.len())
        .max()
        .unwrap_or(0);
    let last_column = layout.columns.iter().map(|c| c.column).max().unwrap_or(1);

    let mut xml = String::from(XML_DECL);
    xml.push_str(&format!(
        r#"<worksheet xmlns="{MAIN_NS}" xmlns:r="{}">"#,
        crate::xml::REL_NS
    ));
    xml.push_str(&format!(
        r#"<dimension ref="A1:{}"/>"#,
        cell_address(last_column, rows as u32 + 1)?
    ));
    xml.push_str("<sheetData>");

    for row in 0..=rows {
        let r = row as u32 + 1;
        xml.push_str(&format!(r#"<row r="{r}">"#));
        for column in &layout.columns {
            let cell = cell_address(column.column, r)?;
            if row == 0 {
                xml.push_str(&string_cell(&cell, &column.header));
            } else if let Some(value) = column.values.get(row - 1) {
                xml.push_str(&number_cell(&cell, *value));
            }
        }
        xml.push_str("</row>");
    }
    xml.push_str("</sheetData>");

    if let Some(rel) = drawing_rel {
        xml.push_str(&format!(r#"<drawing r:id="{}"/>"#, escape_xml(rel)));
    }
    xml.push_str("</worksheet>");
    Ok(xml)
}

fn string_cell(cell: &str, text: &str) -> String {
    let space = if text.trim() != text {
        r#" xml:space="preserve""#
    } else {
        ""
    };
    format!(
        r#"<c r="{cell}" t="inlineStr"><is><t{space}>{}</t></is></c>"#,
        escape_xml(text)
    )
}

fn number_cell(cell: &str, value: f64) -> String {
    if value.is_finite() {
        format!(r#"<c r="{cell}"><v>{value}</v></c>"#)
    } else {
        let error = if value.is_nan() { "#NUM!" } else { "#DIV/0!" };
        format!(r#"<c r="{cell}" t="e"><v>{error}</v></c>"#)
    }
}

/// A `.rels` part; each entry is `(id, type, target)`
pub(crate) fn relationships_xml(rels: &[(&str, &str, &str)]) -> String {
    let mut xml = String::from(XML_DECL);
    xml.push_str(&format!(r#"<Relationships xmlns="{RELS_NS}">"#));
    for (id, rel_type, target) in rels {
        xml.push_str(&format!(
            r#"<Relationship Id="{}" Type="{}" Target="{}"/>"#,
            escape_xml(id),
            escape_xml(rel_type),
            escape_xml(target)
        ));
    }
    xml.push_str("</Relationships>");
    xml
}

/// Drawing part holding one chart frame at `anchor`
pub(crate) fn drawing_xml(anchor: &ChartAnchor, chart_rel: &str) -> String {
    let emu = |px: u32| u64::from(px) * EMU_PER_PIXEL;

    format!(
        concat!(
            "{decl}",
            r#"<xdr:wsDr xmlns:xdr="{xdr}" xmlns:a="{a}">"#,
            "<xdr:oneCellAnchor>",
            "<xdr:from><xdr:col>{col}</xdr:col><xdr:colOff>{col_off}</xdr:colOff>",
            "<xdr:row>{row}</xdr:row><xdr:rowOff>{row_off}</xdr:rowOff></xdr:from>",
            r#"<xdr:ext cx="{cx}" cy="{cy}"/>"#,
            r#"<xdr:graphicFrame macro="">"#,
            r#"<xdr:nvGraphicFramePr><xdr:cNvPr id="2" name="Chart 1"/><xdr:cNvGraphicFramePr/></xdr:nvGraphicFramePr>"#,
            r#"<xdr:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/></xdr:xfrm>"#,
            r#"<a:graphic><a:graphicData uri="{c}">"#,
            r#"<c:chart xmlns:c="{c}" xmlns:r="{r}" r:id="{rel}"/>"#,
            "</a:graphicData></a:graphic>",
            "</xdr:graphicFrame>",
            "<xdr:clientData/>",
            "</xdr:oneCellAnchor>",
            "</xdr:wsDr>"
        ),
        decl = XML_DECL,
        xdr = SHEET_DRAWING_NS,
        a = DRAWING_NS,
        c = CHART_NS,
        r = crate::xml::REL_NS,
        col = anchor.column.saturating_sub(1),
        col_off = emu(anchor.x_offset),
        row = anchor.row.saturating_sub(1),
        row_off = emu(anchor.y_offset),
        cx = emu(anchor.width),
        cy = emu(anchor.height),
        rel = escape_xml(chart_rel),
    )
}

/// Chart part for a line chart model
pub(crate) fn chart_xml(chart: &Chart) -> String {
    let mut xml = String::from(XML_DECL);
    xml.push_str(&format!(
        r#"<c:chartSpace xmlns:c="{CHART_NS}" xmlns:a="{DRAWING_NS}" xmlns:r="{}">"#,
        crate::xml::REL_NS
    ));
    xml.push_str(r#"<c:roundedCorners val="0"/>"#);
    xml.push_str(r#"<c:chart><c:autoTitleDeleted val="1"/><c:plotArea><c:layout/>"#);

    match chart.chart_type {
        ChartType::Line => {
            xml.push_str(r#"<c:lineChart><c:grouping val="standard"/><c:varyColors val="0"/>"#)
        }
    }
    for (i, series) in chart.series.iter().enumerate() {
        xml.push_str(&format!(r#"<c:ser><c:idx val="{i}"/><c:order val="{i}"/>"#));
        if let Some(name) = &series.name {
            xml.push_str(&format!(
                "<c:tx><c:strRef><c:f>{}</c:f></c:strRef></c:tx>",
                escape_xml(name.as_str())
            ));
        }
        xml.push_str(r#"<c:marker><c:symbol val="none"/></c:marker>"#);
        if let Some(categories) = &series.categories {
            xml.push_str(&format!(
                "<c:cat><c:numRef><c:f>{}</c:f></c:numRef></c:cat>",
                escape_xml(categories.as_str())
            ));
        }
        xml.push_str(&format!(
            "<c:val><c:numRef><c:f>{}</c:f></c:numRef></c:val>",
            escape_xml(series.values.as_str())
        ));
        xml.push_str(&format!(
            r#"<c:smooth val="{}"/></c:ser>"#,
            u8::from(series.smooth)
        ));
    }
    xml.push_str(&format!(
        r#"<c:marker val="1"/><c:axId val="{CATEGORY_AXIS_ID}"/><c:axId val="{VALUE_AXIS_ID}"/></c:lineChart>"#
    ));

    let default_axis = Axis::new();
    let category_axis = chart.category_axis.as_ref().unwrap_or(&default_axis);
    let value_axis = chart.value_axis.as_ref().unwrap_or(&default_axis);

    xml.push_str(&format!(r#"<c:catAx><c:axId val="{CATEGORY_AXIS_ID}"/>"#));
    axis_common(&mut xml, category_axis, "b");
    xml.push_str(&format!(
        concat!(
            r#"<c:crossAx val="{}"/><c:crosses val="autoZero"/><c:auto val="1"/>"#,
            r#"<c:lblAlgn val="ctr"/><c:lblOffset val="100"/><c:noMultiLvlLbl val="0"/></c:catAx>"#
        ),
        VALUE_AXIS_ID
    ));

    xml.push_str(&format!(r#"<c:valAx><c:axId val="{VALUE_AXIS_ID}"/>"#));
    axis_common(&mut xml, value_axis, "l");
    xml.push_str(&format!(
        r#"<c:crossAx val="{CATEGORY_AXIS_ID}"/><c:crosses val="autoZero"/><c:crossBetween val="between"/></c:valAx>"#
    ));
    xml.push_str("</c:plotArea>");

    if let Some(legend) = &chart.legend {
        xml.push_str(&format!(
            r#"<c:legend><c:legendPos val="{}"/><c:overlay val="0"/>"#,
            legend_position(legend.position)
        ));
        if let Some(font) = &legend.font {
            xml.push_str(&text_properties(font));
        }
        xml.push_str("</c:legend>");
    }

    xml.push_str(r#"<c:plotVisOnly val="1"/><c:dispBlanksAs val="gap"/></c:chart></c:chartSpace>"#);
    xml
}

/// Elements shared by both axes, from `scaling` through `txPr`
fn axis_common(xml: &mut String, axis: &Axis, position: &str) {
    xml.push_str(r#"<c:scaling><c:orientation val="minMax"/></c:scaling><c:delete val="0"/>"#);
    xml.push_str(&format!(r#"<c:axPos val="{position}"/>"#));
    if axis.major_gridlines {
        xml.push_str("<c:majorGridlines/>");
    }
    if let Some(title) = &axis.title {
        xml.push_str("<c:title><c:tx><c:rich><a:bodyPr/><a:lstStyle/><a:p>");
        if let Some(font) = &axis.font {
            xml.push_str(&format!("<a:pPr>{}</a:pPr>", run_properties("a:defRPr", font)));
        }
        xml.push_str("<a:r>");
        if let Some(font) = &axis.font {
            xml.push_str(&run_properties("a:rPr", font));
        }
        xml.push_str(&format!(
            r#"<a:t>{}</a:t></a:r></a:p></c:rich></c:tx><c:overlay val="0"/></c:title>"#,
            escape_xml(title)
        ));
    }
    xml.push_str(concat!(
        r#"<c:numFmt formatCode="General" sourceLinked="1"/>"#,
        r#"<c:majorTickMark val="out"/><c:minorTickMark val="none"/><c:tickLblPos val="nextTo"/>"#
    ));
    if let Some(font) = &axis.font {
        xml.push_str(&text_properties(font));
    }
}

fn text_properties(font: &Font) -> String {
    format!(
        r#"<c:txPr><a:bodyPr/><a:lstStyle/><a:p><a:pPr>{}</a:pPr><a:endParaRPr lang="en-US"/></a:p></c:txPr>"#,
        run_properties("a:defRPr", font)
    )
}

fn run_properties(tag: &str, font: &Font) -> String {
    let size = (font.size * 100.0).round().clamp(100.0, 400_000.0) as u32;
    format!(
        r#"<{tag} lang="en-US" sz="{size}" b="0"><a:solidFill><a:srgbClr val="{:06X}"/></a:solidFill><a:latin typeface="{}"/></{tag}>"#,
        font.color & 0x00FF_FFFF,
        escape_xml(&font.name)
    )
}

fn legend_position(position: LegendPosition) -> &'static str {
    match position {
        LegendPosition::Right => "r",
        LegendPosition::Top => "t",
        LegendPosition::Bottom => "b",
        LegendPosition::Left => "l",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use xlchart_chart::plan_sheet;
    use xlchart_core::{CategoryTable, ChartOptions, Observation};

    fn layout() -> SheetLayout {
        let mut table = CategoryTable::new();
        table.push("A & B", Observation::new(1.0, 0.5));
        table.push("A & B", Observation::new(2.0, f64::NAN));
        table.push("C", Observation::new(1.0, f64::INFINITY));
        plan_sheet("lab chart", " Day ", &table, &ChartOptions::default()).unwrap()
    }

    #[test]
    fn test_worksheet_cells() {
        let xml = worksheet_xml(&layout(), Some("rId1")).unwrap();

        assert!(xml.contains(r#"<dimension ref="A1:C3"/>"#));
        assert!(xml.contains(
            r#"<c r="A1" t="inlineStr"><is><t xml:space="preserve"> Day </t></is></c>"#
        ));
        assert!(xml.contains(r#"<c r="B1" t="inlineStr"><is><t>A &amp; B</t></is></c>"#));
        assert!(xml.contains(r#"<c r="A3"><v>2</v></c>"#));
        assert!(xml.contains(r#"<c r="B2"><v>0.5</v></c>"#));
        assert!(xml.contains(r#"<c r="B3" t="e"><v>#NUM!</v></c>"#));
        assert!(xml.contains(r#"<c r="C2" t="e"><v>#DIV/0!</v></c>"#));
        assert!(!xml.contains(r#"r="C3""#));
        assert!(xml.ends_with(r#"</sheetData><drawing r:id="rId1"/></worksheet>"#));
    }

    #[test]
    fn test_number_cell() {
        assert_eq!(number_cell("A1", -1.5), r#"<c r="A1"><v>-1.5</v></c>"#);
        assert_eq!(
            number_cell("A1", f64::NEG_INFINITY),
            r#"<c r="A1" t="e"><v>#DIV/0!</v></c>"#
        );
    }

    #[test]
    fn test_drawing_anchor() {
        let anchor = ChartAnchor {
            column: 5,
            row: 1,
            x_offset: 15,
            y_offset: 10,
            width: 480,
            height: 288,
        };
        let xml = drawing_xml(&anchor, "rId1");
        assert!(xml.contains("<xdr:col>4</xdr:col><xdr:colOff>142875</xdr:colOff>"));
        assert!(xml.contains("<xdr:row>0</xdr:row><xdr:rowOff>95250</xdr:rowOff>"));
        assert!(xml.contains(r#"<xdr:ext cx="4572000" cy="2743200"/>"#));
        assert!(xml.contains(r#"r:id="rId1""#));
    }

    #[test]
    fn test_chart_series_and_presentation() {
        let layout = layout();
        let xml = chart_xml(layout.chart.as_ref().unwrap());

        assert!(xml.contains("<c:f>'lab chart'!$B$1</c:f>"));
        assert!(xml.contains("<c:f>'lab chart'!$A$2:$A$3</c:f>"));
        assert!(xml.contains("<c:f>'lab chart'!$C$2:$C$2</c:f>"));
        assert_eq!(xml.matches("<c:ser>").count(), 2);
        assert_eq!(xml.matches(r#"<c:smooth val="1"/>"#).count(), 2);
        assert!(xml.contains(r#"<c:legendPos val="t"/>"#));
        assert!(xml.contains("<a:t>xULN</a:t>"));
        assert!(xml.contains("<a:t>Days On Study</a:t>"));
        assert!(xml.contains(r#"sz="1200""#));
        assert!(xml.contains(r#"<a:srgbClr val="000000"/>"#));
        assert!(xml.contains(r#"<a:latin typeface="Arial"/>"#));
        // gridlines only on the value axis
        assert_eq!(xml.matches("<c:majorGridlines/>").count(), 1);
        let val_ax = &xml[xml.find("<c:valAx>").unwrap()..];
        assert!(val_ax.contains("<c:majorGridlines/>"));
    }

    #[test]
    fn test_relationships() {
        let xml = relationships_xml(&[("rId1", "http://x/chart", "../charts/chart1.xml")]);
        assert!(xml.contains(
            r#"<Relationship Id="rId1" Type="http://x/chart" Target="../charts/chart1.xml"/>"#
        ));
    }
}
