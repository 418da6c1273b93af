//! Minimal WordprocessingML (`.docx`) export of a [`ReportTable`]:
//! one bold heading paragraph followed by one grid table.

use crate::core::report::ReportTable;
use crate::utils::error::Result;
use std::fmt::Write as _;
use std::io::Write;
use zip::write::{SimpleFileOptions, ZipWriter};
use zip::CompressionMethod;

pub const DOCX_MIME_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
pub const DEFAULT_FILE_NAME: &str = "specification.docx";
/// Font sizes accepted by [`DocxWriter::with_font`], in points.
pub const MIN_FONT_POINTS: u32 = 1;
pub const MAX_FONT_POINTS: u32 = 400;

const WORD_NS: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;

const CONTENT_TYPES: &str = r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/><Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/></Types>"#;

const PACKAGE_RELS: &str = r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/></Relationships>"#;

const DOCUMENT_RELS: &str = r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/></Relationships>"#;

/// A4 portrait with 2 cm / 3 cm / 1.5 cm margins, in twentieths of a point.
const SECTION_PROPERTIES: &str = r#"<w:sectPr><w:pgSz w:w="11906" w:h="16838"/><w:pgMar w:top="1134" w:right="850" w:bottom="1134" w:left="1701" w:header="708" w:footer="708" w:gutter="0"/></w:sectPr>"#;

/// Column widths in twips; they sum to the A4 text width above.
const COLUMN_WIDTHS: [u32; 7] = [454, 1300, 2500, 900, 1700, 1250, 1251];

#[derive(Debug, Clone)]
pub struct DocxWriter {
    font: String,
    /// Word measures font sizes in half-points.
    font_half_points: u32,
    header_fill: String,
}

impl Default for DocxWriter {
    fn default() -> Self {
        Self {
            font: "Times New Roman".to_string(),
            font_half_points: 18,
            header_fill: "D9D9D9".to_string(),
        }
    }
}

impl DocxWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sizes outside `MIN_FONT_POINTS..=MAX_FONT_POINTS` are clamped.
    pub fn with_font(mut self, font: impl Into<String>, points: u32) -> Self {
        self.font = font.into();
        self.font_half_points = points.clamp(MIN_FONT_POINTS, MAX_FONT_POINTS) * 2;
        self
    }

    /// Packs the table into `.docx` bytes.
    pub fn write(&self, table: &ReportTable) -> Result<Vec<u8>> {
        let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));

        let parts = [
            ("[Content_Types].xml", CONTENT_TYPES.to_string()),
            ("_rels/.rels", PACKAGE_RELS.to_string()),
            ("word/_rels/document.xml.rels", DOCUMENT_RELS.to_string()),
            ("word/styles.xml", self.styles_xml()),
            ("word/document.xml", self.document_xml(table)),
        ];

        for (name, body) in parts {
            let options =
                SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
            zip.start_file(name, options)?;
            zip.write_all(XML_DECLARATION.as_bytes())?;
            zip.write_all(body.as_bytes())?;
        }

        let cursor = zip.finish()?;
        let bytes = cursor.into_inner();
        tracing::debug!("Built docx package ({} bytes, {} data rows)", bytes.len(), table.rows.len());
        Ok(bytes)
    }

    fn run_properties(&self) -> String {
        format!(
            r#"<w:rFonts w:ascii="{font}" w:hAnsi="{font}" w:cs="{font}" w:eastAsia="{font}"/><w:sz w:val="{size}"/><w:szCs w:val="{size}"/>"#,
            font = escape_xml(&self.font),
            size = self.font_half_points,
        )
    }

    fn styles_xml(&self) -> String {
        let rpr = self.run_properties();
        let border = r#"w:val="single" w:sz="4" w:space="0" w:color="auto""#;
        format!(
            concat!(
                r#"<w:styles xmlns:w="{ns}">"#,
                r#"<w:docDefaults><w:rPrDefault><w:rPr>{rpr}</w:rPr></w:rPrDefault></w:docDefaults>"#,
                r#"<w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/><w:pPr><w:spacing w:after="0" w:line="240" w:lineRule="auto"/></w:pPr><w:rPr>{rpr}</w:rPr></w:style>"#,
                r#"<w:style w:type="table" w:default="1" w:styleId="TableNormal"><w:name w:val="Normal Table"/><w:tblPr><w:tblInd w:w="0" w:type="dxa"/><w:tblCellMar><w:top w:w="0" w:type="dxa"/><w:left w:w="108" w:type="dxa"/><w:bottom w:w="0" w:type="dxa"/><w:right w:w="108" w:type="dxa"/></w:tblCellMar></w:tblPr></w:style>"#,
                r#"<w:style w:type="table" w:styleId="TableGrid"><w:name w:val="Table Grid"/><w:basedOn w:val="TableNormal"/><w:tblPr><w:tblBorders><w:top {b}/><w:left {b}/><w:bottom {b}/><w:right {b}/><w:insideH {b}/><w:insideV {b}/></w:tblBorders></w:tblPr></w:style>"#,
                r#"</w:styles>"#
            ),
            ns = WORD_NS,
            rpr = rpr,
            b = border,
        )
    }

    fn document_xml(&self, table: &ReportTable) -> String {
        let mut xml = String::new();
        let _ = write!(xml, r#"<w:document xmlns:w="{}"><w:body>"#, WORD_NS);

        // Heading
        xml.push_str(r#"<w:p><w:pPr><w:pStyle w:val="Normal"/></w:pPr>"#);
        push_run(&mut xml, &table.heading, true);
        xml.push_str("</w:p>");

        xml.push_str(r#"<w:tbl><w:tblPr><w:tblStyle w:val="TableGrid"/><w:tblW w:w="0" w:type="auto"/><w:tblLook w:val="04A0"/></w:tblPr><w:tblGrid>"#);
        for width in column_widths(table.column_count()) {
            let _ = write!(xml, r#"<w:gridCol w:w="{}"/>"#, width);
        }
        xml.push_str("</w:tblGrid>");

        xml.push_str("<w:tr>");
        for header in &table.header {
            let shading = format!(
                r#"<w:shd w:val="clear" w:color="auto" w:fill="{}"/>"#,
                escape_xml(&self.header_fill)
            );
            push_cell(&mut xml, header, &shading);
        }
        xml.push_str("</w:tr>");

        for row in &table.rows {
            xml.push_str("<w:tr>");
            for value in row {
                push_cell(&mut xml, value, "");
            }
            xml.push_str("</w:tr>");
        }

        // Total: label merged across all but the last column.
        let span = table.column_count().saturating_sub(1).max(1);
        xml.push_str("<w:tr>");
        push_cell(&mut xml, &table.total_label, &format!(r#"<w:gridSpan w:val="{}"/>"#, span));
        push_cell(&mut xml, &table.total_amount, "");
        xml.push_str("</w:tr>");

        xml.push_str("</w:tbl>");
        // Word expects a paragraph between a trailing table and the section.
        xml.push_str("<w:p/>");
        xml.push_str(SECTION_PROPERTIES);
        xml.push_str("</w:body></w:document>");
        xml
    }
}

fn column_widths(count: usize) -> Vec<u32> {
    if count == COLUMN_WIDTHS.len() {
        COLUMN_WIDTHS.to_vec()
    } else {
        let total: u32 = COLUMN_WIDTHS.iter().sum();
        vec![total / count.max(1) as u32; count]
    }
}

fn push_cell(xml: &mut String, text: &str, cell_properties: &str) {
    xml.push_str("<w:tc>");
    if !cell_properties.is_empty() {
        let _ = write!(xml, "<w:tcPr>{}</w:tcPr>", cell_properties);
    }
    xml.push_str("<w:p>");
    push_run(xml, text, false);
    xml.push_str("</w:p></w:tc>");
}

fn push_run(xml: &mut String, text: &str, bold: bool) {
    xml.push_str("<w:r>");
    if bold {
        xml.push_str("<w:rPr><w:b/></w:rPr>");
    }
    let _ = write!(xml, r#"<w:t xml:space="preserve">{}</w:t></w:r>"#, escape_xml(text));
}

pub fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
