//! Packages a composed [`WorksheetDocument`] as a `.docx` file (A4 portrait).

use log::{info, warn};

use crate::config::RenderConfig;
use crate::converters::ooxml::{
    app_properties, core_properties, package_relationships, ContentTypes, MediaLibrary,
    Package, Relationships, XmlPart, NS_DRAWING, NS_OFFICE_REL, NS_PICTURE, REL_IMAGE,
};
use crate::errors::Result;
use crate::images::ImageLoader;
use crate::models::colors::RgbColor;
use crate::models::common::{inches_to_emu, Frame};
use crate::models::document::{
    Border, BorderSet, BorderStyle, DocImage, DocParagraph, DocTable, DocTableCell, DocTableRow,
    DocumentBlock, TableBorders, WorksheetDocument,
};
use crate::models::text::{Alignment, TextRun, TextStyle};

const NS_WORD: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
const NS_WORD_DRAWING: &str =
    "http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing";

const CT_DOCUMENT: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml";
const CT_STYLES: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml";
const CT_HEADER: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.header+xml";
const CT_FOOTER: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.footer+xml";

// A4 in twips.
pub const PAGE_WIDTH: u32 = 11_906;
pub const PAGE_HEIGHT: u32 = 16_838;
pub const PAGE_MARGIN: u32 = 1_200;
/// Width available to body content.
pub const TEXT_WIDTH: u32 = PAGE_WIDTH - 2 * PAGE_MARGIN;
const HEADER_DISTANCE: u32 = 600;

/// Body text size in half-points.
const BODY_HALF_POINTS: u32 = 22;
const HEADER_HALF_POINTS: &str = "18";
const FOOTER_HALF_POINTS: &str = "16";

const DEFAULT_TABLE_BORDER: Border = Border::single(4, RgbColor::hex(0x000000));

/// Serializes a worksheet into `.docx` bytes.
///
/// # Arguments
///
/// * `doc` - The composed worksheet.
/// * `loader` - Produces bytes for the inline activity images.
/// * `config` - Supplies the body font, locale and author.
///
/// # Returns
///
/// The complete zip package. An image that cannot be loaded is left out of the
/// document and logged.
pub fn write_docx<L: ImageLoader + ?Sized>(
    doc: &WorksheetDocument,
    loader: &L,
    config: &RenderConfig,
) -> Result<Vec<u8>> {
    let mut package = Package::new();
    let mut content_types = ContentTypes::new();
    let mut media = MediaLibrary::new(loader, "word/media");

    let mut rels = Relationships::new();
    rels.add("styles", "styles.xml");
    let header_rel = rels.add("header", "header1.xml");
    let footer_rel = rels.add("footer", "footer1.xml");

    let document = document_part(doc, &mut media, &mut rels, &header_rel, &footer_rel)?;
    package.add("word/document.xml", &document)?;
    package.add("word/_rels/document.xml.rels", &rels.to_xml()?)?;
    package.add("word/styles.xml", &styles_part(config)?)?;
    package.add("word/header1.xml", &header_part(doc)?)?;
    package.add("word/footer1.xml", &footer_part(doc)?)?;
    media.write_into(&mut package, &mut content_types)?;

    content_types.add_override("/word/document.xml", CT_DOCUMENT);
    content_types.add_override("/word/styles.xml", CT_STYLES);
    content_types.add_override("/word/header1.xml", CT_HEADER);
    content_types.add_override("/word/footer1.xml", CT_FOOTER);
    package.add("[Content_Types].xml", &content_types.to_xml()?)?;
    package.add("_rels/.rels", &package_relationships("word/document.xml")?)?;
    package.add("docProps/core.xml", &core_properties(&doc.title, &config.author)?)?;

    let paragraphs = doc
        .blocks
        .iter()
        .filter(|b| matches!(b, DocumentBlock::Paragraph(_)))
        .count();
    package.add(
        "docProps/app.xml",
        &app_properties("LessonLaunch", &[("Paragraphs", paragraphs)])?,
    )?;

    let bytes = package.finish()?;
    info!(
        "Packaged worksheet '{}': {} blocks, {} images, {} bytes",
        doc.title,
        doc.blocks.len(),
        media.len(),
        bytes.len()
    );
    Ok(bytes)
}

// --- Document body ---

fn document_part<L: ImageLoader + ?Sized>(
    doc: &WorksheetDocument,
    media: &mut MediaLibrary<'_, L>,
    rels: &mut Relationships,
    header_rel: &str,
    footer_rel: &str,
) -> Result<Vec<u8>> {
    let mut xml = XmlPart::new()?;
    xml.start(
        "w:document",
        &[
            ("xmlns:w", NS_WORD),
            ("xmlns:r", NS_OFFICE_REL),
            ("xmlns:wp", NS_WORD_DRAWING),
            ("xmlns:a", NS_DRAWING),
            ("xmlns:pic", NS_PICTURE),
        ],
    )?;
    xml.start("w:body", &[])?;

    let mut drawing_id = 0usize;
    for block in &doc.blocks {
        match block {
            DocumentBlock::Paragraph(paragraph) => write_paragraph(&mut xml, paragraph)?,
            DocumentBlock::Table(table) => write_table(&mut xml, table)?,
            DocumentBlock::Image(image) => match media.get(&image.source) {
                Some(stored) => {
                    drawing_id += 1;
                    let rel_id = rels.add(REL_IMAGE, format!("media/{}", stored.file_name));
                    let fitted = match stored.aspect_ratio {
                        Some(ratio) => {
                            Frame::new(0.0, 0.0, image.max_width, image.max_height).contain(ratio)
                        }
                        None => Frame::new(0.0, 0.0, image.max_width, image.max_height),
                    };
                    write_image(&mut xml, image, drawing_id, &rel_id, fitted)?;
                }
                None => warn!("Leaving image {} out of the worksheet", image.source),
            },
        }
    }

    let width = PAGE_WIDTH.to_string();
    let height = PAGE_HEIGHT.to_string();
    let margin = PAGE_MARGIN.to_string();
    let distance = HEADER_DISTANCE.to_string();
    xml.start("w:sectPr", &[])?;
    xml.empty("w:headerReference", &[("w:type", "default"), ("r:id", header_rel)])?;
    xml.empty("w:footerReference", &[("w:type", "default"), ("r:id", footer_rel)])?;
    xml.empty("w:pgSz", &[("w:w", width.as_str()), ("w:h", height.as_str())])?;
    xml.empty(
        "w:pgMar",
        &[
            ("w:top", margin.as_str()),
            ("w:right", margin.as_str()),
            ("w:bottom", margin.as_str()),
            ("w:left", margin.as_str()),
            ("w:header", distance.as_str()),
            ("w:footer", distance.as_str()),
            ("w:gutter", "0"),
        ],
    )?;
    xml.end("w:sectPr")?;

    xml.end("w:body")?;
    xml.end("w:document")?;
    Ok(xml.finish())
}

fn justification(alignment: Alignment) -> &'static str {
    match alignment {
        Alignment::Start => "left",
        Alignment::Center => "center",
        Alignment::End => "right",
    }
}

fn write_border(xml: &mut XmlPart, edge: &str, border: Option<&Border>) -> Result<()> {
    match border {
        Some(border) => {
            let value = match border.style {
                BorderStyle::Single => "single",
                BorderStyle::Double => "double",
            };
            let size = border.size.to_string();
            let color = border.color.to_hex();
            xml.empty(
                edge,
                &[
                    ("w:val", value),
                    ("w:sz", size.as_str()),
                    ("w:space", "4"),
                    ("w:color", color.as_str()),
                ],
            )
        }
        None => xml.empty(edge, &[("w:val", "nil")]),
    }
}

fn write_shading(xml: &mut XmlPart, fill: RgbColor) -> Result<()> {
    let fill = fill.to_hex();
    xml.empty(
        "w:shd",
        &[("w:val", "clear"), ("w:color", "auto"), ("w:fill", fill.as_str())],
    )
}

fn write_paragraph_borders(xml: &mut XmlPart, borders: &BorderSet) -> Result<()> {
    xml.start("w:pBdr", &[])?;
    for (edge, border) in [
        ("w:top", &borders.top),
        ("w:left", &borders.left),
        ("w:bottom", &borders.bottom),
        ("w:right", &borders.right),
    ] {
        if border.is_some() {
            write_border(xml, edge, border.as_ref())?;
        }
    }
    xml.end("w:pBdr")
}

/// `w:pPr` children must appear in schema order.
fn write_paragraph_properties(xml: &mut XmlPart, paragraph: &DocParagraph) -> Result<()> {
    xml.start("w:pPr", &[])?;
    if let Some(heading) = paragraph.heading {
        xml.empty("w:pStyle", &[("w:val", heading.style_id())])?;
    }
    if paragraph.page_break_before {
        xml.empty("w:pageBreakBefore", &[])?;
    }
    if let Some(borders) = &paragraph.borders {
        write_paragraph_borders(xml, borders)?;
    }
    if let Some(fill) = paragraph.shading {
        write_shading(xml, fill)?;
    }
    if paragraph.spacing_before > 0 || paragraph.spacing_after > 0 {
        let before = paragraph.spacing_before.to_string();
        let after = paragraph.spacing_after.to_string();
        xml.empty(
            "w:spacing",
            &[("w:before", before.as_str()), ("w:after", after.as_str())],
        )?;
    }
    if paragraph.indent_left > 0 || paragraph.indent_right > 0 {
        let left = paragraph.indent_left.to_string();
        let right = paragraph.indent_right.to_string();
        xml.empty("w:ind", &[("w:left", left.as_str()), ("w:right", right.as_str())])?;
    }
    xml.empty("w:jc", &[("w:val", justification(paragraph.alignment))])?;
    xml.end("w:pPr")
}

fn write_run_properties(xml: &mut XmlPart, style: &TextStyle) -> Result<()> {
    xml.start("w:rPr", &[])?;
    if let Some(font) = &style.font_family {
        xml.empty(
            "w:rFonts",
            &[
                ("w:ascii", font.as_str()),
                ("w:hAnsi", font.as_str()),
                ("w:cs", font.as_str()),
            ],
        )?;
    }
    if style.bold {
        xml.empty("w:b", &[])?;
    }
    if style.italic {
        xml.empty("w:i", &[])?;
    }
    if let Some(color) = style.color {
        let color = color.to_hex();
        xml.empty("w:color", &[("w:val", color.as_str())])?;
    }
    if let Some(pt) = style.font_size_pt {
        let half_points = ((pt * 2.0).round() as i64).to_string();
        xml.empty("w:sz", &[("w:val", half_points.as_str())])?;
        xml.empty("w:szCs", &[("w:val", half_points.as_str())])?;
    }
    xml.end("w:rPr")
}

/// Line breaks inside a run become `w:br`.
fn write_run(xml: &mut XmlPart, run: &TextRun) -> Result<()> {
    xml.start("w:r", &[])?;
    write_run_properties(xml, &run.style)?;
    for (i, line) in run.content.split('\n').enumerate() {
        if i > 0 {
            xml.empty("w:br", &[])?;
        }
        if !line.is_empty() {
            xml.leaf("w:t", &[("xml:space", "preserve")], line)?;
        }
    }
    xml.end("w:r")
}

fn write_paragraph(xml: &mut XmlPart, paragraph: &DocParagraph) -> Result<()> {
    xml.start("w:p", &[])?;
    write_paragraph_properties(xml, paragraph)?;
    for run in &paragraph.runs {
        write_run(xml, run)?;
    }
    xml.end("w:p")
}

// --- Tables ---

/// Grid column widths in twips, proportional to the table's weights.
pub fn column_widths(table: &DocTable) -> Vec<u32> {
    let columns = table.column_count();
    if columns == 0 {
        return Vec::new();
    }
    let weights: Vec<u32> = if table.column_weights.len() == columns
        && table.column_weights.iter().any(|w| *w > 0)
    {
        table.column_weights.clone()
    } else {
        vec![1; columns]
    };
    let total_weight: u32 = weights.iter().sum();
    let total_width = TEXT_WIDTH * table.width_pct.clamp(1, 100) / 100;
    weights
        .iter()
        .map(|w| total_width * w / total_weight)
        .collect()
}

fn write_table_borders(xml: &mut XmlPart, borders: &TableBorders) -> Result<()> {
    xml.start("w:tblBorders", &[])?;
    write_border(xml, "w:top", borders.outer.top.as_ref())?;
    write_border(xml, "w:left", borders.outer.left.as_ref())?;
    write_border(xml, "w:bottom", borders.outer.bottom.as_ref())?;
    write_border(xml, "w:right", borders.outer.right.as_ref())?;
    write_border(xml, "w:insideH", borders.inside_horizontal.as_ref())?;
    write_border(xml, "w:insideV", borders.inside_vertical.as_ref())?;
    xml.end("w:tblBorders")
}

fn write_table(xml: &mut XmlPart, table: &DocTable) -> Result<()> {
    let widths = column_widths(table);
    if widths.is_empty() {
        return Ok(());
    }
    let borders = table
        .borders
        .unwrap_or(TableBorders::grid(DEFAULT_TABLE_BORDER));

    xml.start("w:tbl", &[])?;
    xml.start("w:tblPr", &[])?;
    // Fiftieths of a percent.
    let pct = (table.width_pct.clamp(1, 100) * 50).to_string();
    xml.empty("w:tblW", &[("w:w", pct.as_str()), ("w:type", "pct")])?;
    write_table_borders(xml, &borders)?;
    xml.empty("w:tblLayout", &[("w:type", "fixed")])?;
    xml.end("w:tblPr")?;

    xml.start("w:tblGrid", &[])?;
    for width in &widths {
        let width = width.to_string();
        xml.empty("w:gridCol", &[("w:w", width.as_str())])?;
    }
    xml.end("w:tblGrid")?;

    for row in &table.rows {
        write_row(xml, row, &widths)?;
    }
    xml.end("w:tbl")
}

/// A row with fewer cells than the grid stretches its last cell over the rest.
fn write_row(xml: &mut XmlPart, row: &DocTableRow, widths: &[u32]) -> Result<()> {
    xml.start("w:tr", &[])?;
    if row.header || row.min_height.is_some() {
        xml.start("w:trPr", &[])?;
        if let Some(height) = row.min_height {
            let height = height.to_string();
            xml.empty(
                "w:trHeight",
                &[("w:val", height.as_str()), ("w:hRule", "atLeast")],
            )?;
        }
        if row.header {
            xml.empty("w:tblHeader", &[])?;
        }
        xml.end("w:trPr")?;
    }

    let blank = DocTableCell::empty();
    let cells: Vec<&DocTableCell> = if row.cells.is_empty() {
        vec![&blank]
    } else {
        row.cells.iter().take(widths.len()).collect()
    };
    for (i, cell) in cells.iter().enumerate() {
        let span = if i + 1 == cells.len() {
            widths.len() - i
        } else {
            1
        };
        let width: u32 = widths[i..i + span].iter().sum();
        let width = width.to_string();

        xml.start("w:tc", &[])?;
        xml.start("w:tcPr", &[])?;
        xml.empty("w:tcW", &[("w:w", width.as_str()), ("w:type", "dxa")])?;
        if span > 1 {
            let span = span.to_string();
            xml.empty("w:gridSpan", &[("w:val", span.as_str())])?;
        }
        if let Some(fill) = cell.shading {
            write_shading(xml, fill)?;
        }
        xml.end("w:tcPr")?;

        // A cell must hold at least one paragraph.
        if cell.paragraphs.is_empty() {
            write_paragraph(xml, &DocParagraph::blank())?;
        }
        for paragraph in &cell.paragraphs {
            write_paragraph(xml, paragraph)?;
        }
        xml.end("w:tc")?;
    }
    xml.end("w:tr")
}

// --- Images ---

fn write_image(
    xml: &mut XmlPart,
    image: &DocImage,
    drawing_id: usize,
    rel_id: &str,
    size: Frame,
) -> Result<()> {
    let cx = inches_to_emu(size.w).to_string();
    let cy = inches_to_emu(size.h).to_string();
    let id = drawing_id.to_string();
    let name = format!("Picture {drawing_id}");

    let paragraph = DocParagraph::blank()
        .aligned(image.alignment)
        .spacing(0, image.spacing_after);
    xml.start("w:p", &[])?;
    write_paragraph_properties(xml, &paragraph)?;
    xml.start("w:r", &[])?;
    xml.start("w:drawing", &[])?;
    xml.start(
        "wp:inline",
        &[("distT", "0"), ("distB", "0"), ("distL", "0"), ("distR", "0")],
    )?;
    xml.empty("wp:extent", &[("cx", cx.as_str()), ("cy", cy.as_str())])?;
    xml.empty(
        "wp:docPr",
        &[
            ("id", id.as_str()),
            ("name", name.as_str()),
            ("descr", image.description.as_str()),
        ],
    )?;
    xml.start("wp:cNvGraphicFramePr", &[])?;
    xml.empty("a:graphicFrameLocks", &[("noChangeAspect", "1")])?;
    xml.end("wp:cNvGraphicFramePr")?;

    xml.start("a:graphic", &[])?;
    xml.start("a:graphicData", &[("uri", NS_PICTURE)])?;
    xml.start("pic:pic", &[])?;
    xml.start("pic:nvPicPr", &[])?;
    xml.empty("pic:cNvPr", &[("id", id.as_str()), ("name", name.as_str())])?;
    xml.empty("pic:cNvPicPr", &[])?;
    xml.end("pic:nvPicPr")?;
    xml.start("pic:blipFill", &[])?;
    xml.empty("a:blip", &[("r:embed", rel_id)])?;
    xml.start("a:stretch", &[])?;
    xml.empty("a:fillRect", &[])?;
    xml.end("a:stretch")?;
    xml.end("pic:blipFill")?;
    xml.start("pic:spPr", &[])?;
    xml.start("a:xfrm", &[])?;
    xml.empty("a:off", &[("x", "0"), ("y", "0")])?;
    xml.empty("a:ext", &[("cx", cx.as_str()), ("cy", cy.as_str())])?;
    xml.end("a:xfrm")?;
    xml.start("a:prstGeom", &[("prst", "rect")])?;
    xml.empty("a:avLst", &[])?;
    xml.end("a:prstGeom")?;
    xml.end("pic:spPr")?;
    xml.end("pic:pic")?;
    xml.end("a:graphicData")?;
    xml.end("a:graphic")?;

    xml.end("wp:inline")?;
    xml.end("w:drawing")?;
    xml.end("w:r")?;
    xml.end("w:p")
}

// --- Styles, header, footer ---

fn style_heading(
    xml: &mut XmlPart,
    id: &str,
    name: &str,
    half_points: u32,
    before: u32,
    after: u32,
) -> Result<()> {
    let size = half_points.to_string();
    let before = before.to_string();
    let after = after.to_string();
    xml.start("w:style", &[("w:type", "paragraph"), ("w:styleId", id)])?;
    xml.empty("w:name", &[("w:val", name)])?;
    xml.empty("w:basedOn", &[("w:val", "Normal")])?;
    xml.empty("w:next", &[("w:val", "Normal")])?;
    xml.empty("w:qFormat", &[])?;
    xml.start("w:pPr", &[])?;
    xml.empty("w:keepNext", &[])?;
    xml.empty(
        "w:spacing",
        &[("w:before", before.as_str()), ("w:after", after.as_str())],
    )?;
    xml.end("w:pPr")?;
    xml.start("w:rPr", &[])?;
    xml.empty("w:b", &[])?;
    xml.empty("w:sz", &[("w:val", size.as_str())])?;
    xml.empty("w:szCs", &[("w:val", size.as_str())])?;
    xml.end("w:rPr")?;
    xml.end("w:style")
}

fn styles_part(config: &RenderConfig) -> Result<Vec<u8>> {
    let font = config.font_face.as_str();
    let body_size = BODY_HALF_POINTS.to_string();

    let mut xml = XmlPart::new()?;
    xml.start("w:styles", &[("xmlns:w", NS_WORD)])?;
    xml.start("w:docDefaults", &[])?;
    xml.start("w:rPrDefault", &[])?;
    xml.start("w:rPr", &[])?;
    xml.empty(
        "w:rFonts",
        &[("w:ascii", font), ("w:hAnsi", font), ("w:cs", font), ("w:eastAsia", font)],
    )?;
    xml.empty("w:sz", &[("w:val", body_size.as_str())])?;
    xml.empty("w:szCs", &[("w:val", body_size.as_str())])?;
    xml.empty("w:lang", &[("w:val", config.locale.as_str())])?;
    xml.end("w:rPr")?;
    xml.end("w:rPrDefault")?;
    xml.start("w:pPrDefault", &[])?;
    xml.start("w:pPr", &[])?;
    xml.empty("w:spacing", &[("w:after", "120"), ("w:line", "276"), ("w:lineRule", "auto")])?;
    xml.end("w:pPr")?;
    xml.end("w:pPrDefault")?;
    xml.end("w:docDefaults")?;

    xml.start(
        "w:style",
        &[("w:type", "paragraph"), ("w:default", "1"), ("w:styleId", "Normal")],
    )?;
    xml.empty("w:name", &[("w:val", "Normal")])?;
    xml.empty("w:qFormat", &[])?;
    xml.end("w:style")?;

    style_heading(&mut xml, "Title", "Title", 56, 0, 240)?;
    style_heading(&mut xml, "Heading1", "heading 1", 32, 360, 120)?;
    style_heading(&mut xml, "Heading2", "heading 2", 26, 240, 80)?;

    xml.start("w:style", &[("w:type", "table"), ("w:default", "1"), ("w:styleId", "TableNormal")])?;
    xml.empty("w:name", &[("w:val", "Normal Table")])?;
    xml.start("w:tblPr", &[])?;
    xml.start("w:tblCellMar", &[])?;
    xml.empty("w:top", &[("w:w", "60"), ("w:type", "dxa")])?;
    xml.empty("w:left", &[("w:w", "108"), ("w:type", "dxa")])?;
    xml.empty("w:bottom", &[("w:w", "60"), ("w:type", "dxa")])?;
    xml.empty("w:right", &[("w:w", "108"), ("w:type", "dxa")])?;
    xml.end("w:tblCellMar")?;
    xml.end("w:tblPr")?;
    xml.end("w:style")?;

    xml.end("w:styles")?;
    Ok(xml.finish())
}

fn furniture_run(xml: &mut XmlPart, text: &str, color: &str, size: &str) -> Result<()> {
    xml.start("w:r", &[])?;
    xml.start("w:rPr", &[])?;
    xml.empty("w:color", &[("w:val", color)])?;
    xml.empty("w:sz", &[("w:val", size)])?;
    xml.end("w:rPr")?;
    xml.leaf("w:t", &[("xml:space", "preserve")], text)?;
    xml.end("w:r")
}

fn header_part(doc: &WorksheetDocument) -> Result<Vec<u8>> {
    let color = doc.furniture_color.to_hex();
    let mut xml = XmlPart::new()?;
    xml.start("w:hdr", &[("xmlns:w", NS_WORD), ("xmlns:r", NS_OFFICE_REL)])?;
    xml.start("w:p", &[])?;
    xml.start("w:pPr", &[])?;
    xml.empty("w:jc", &[("w:val", "right")])?;
    xml.end("w:pPr")?;
    furniture_run(&mut xml, &doc.header_text, &color, HEADER_HALF_POINTS)?;
    xml.end("w:p")?;
    xml.end("w:hdr")?;
    Ok(xml.finish())
}

/// The footer text followed by a live page-number field.
fn footer_part(doc: &WorksheetDocument) -> Result<Vec<u8>> {
    let color = doc.furniture_color.to_hex();
    let mut xml = XmlPart::new()?;
    xml.start("w:ftr", &[("xmlns:w", NS_WORD), ("xmlns:r", NS_OFFICE_REL)])?;
    xml.start("w:p", &[])?;
    xml.start("w:pPr", &[])?;
    xml.empty("w:jc", &[("w:val", "center")])?;
    xml.end("w:pPr")?;
    furniture_run(&mut xml, &doc.footer_prefix, &color, FOOTER_HALF_POINTS)?;
    xml.start("w:fldSimple", &[("w:instr", "PAGE")])?;
    furniture_run(&mut xml, "1", &color, FOOTER_HALF_POINTS)?;
    xml.end("w:fldSimple")?;
    xml.end("w:p")?;
    xml.end("w:ftr")?;
    Ok(xml.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::converters::ooxml::tests::{part_names, read_part};
    use crate::errors::RenderError;
    use crate::images::tests::png_bytes;
    use crate::images::LoadedImage;
    use crate::models::document::HeadingLevel;
    use crate::models::image::ImageRef;
    use pretty_assertions::assert_eq;

    struct LocalOnly;

    impl ImageLoader for LocalOnly {
        fn load(&self, source: &ImageRef) -> Result<LoadedImage> {
            match source {
                ImageRef::Local(_) => LoadedImage::from_bytes(png_bytes(200, 100)),
                other => Err(RenderError::Image(format!("not found: {other}"))),
            }
        }
    }

    fn worksheet(blocks: Vec<DocumentBlock>) -> WorksheetDocument {
        WorksheetDocument {
            title: "Fractions".into(),
            header_text: "🔢 Fractions".into(),
            footer_prefix: "Page ".into(),
            furniture_color: RgbColor::hex(0x607D8B),
            blocks,
        }
    }

    fn image_block(path: &str) -> DocumentBlock {
        DocumentBlock::Image(DocImage {
            source: ImageRef::parse(path),
            description: "A pizza cut into quarters".into(),
            max_width: 4.0,
            max_height: 3.0,
            alignment: Alignment::Center,
            spacing_after: 200,
        })
    }

    #[test]
    fn writes_parts_and_furniture() {
        let doc = worksheet(vec![DocumentBlock::Paragraph(
            DocParagraph::text("Halves & quarters", TextStyle::sized(20.0).bold())
                .heading(HeadingLevel::Title),
        )]);
        let bytes = write_docx(&doc, &LocalOnly, &RenderConfig::default()).unwrap();
        let names = part_names(&bytes);
        for required in [
            "[Content_Types].xml",
            "word/document.xml",
            "word/styles.xml",
            "word/header1.xml",
            "word/footer1.xml",
            "word/_rels/document.xml.rels",
        ] {
            assert!(names.iter().any(|n| n == required), "missing {required}");
        }

        let body = read_part(&bytes, "word/document.xml");
        assert!(body.contains("Halves &amp; quarters"));
        assert!(body.contains("<w:pStyle w:val=\"Title\"/>"));
        assert!(body.contains("<w:sz w:val=\"40\"/>"));
        assert!(body.contains("w:w=\"11906\" w:h=\"16838\""));

        assert!(read_part(&bytes, "word/header1.xml").contains("🔢 Fractions"));
        let footer = read_part(&bytes, "word/footer1.xml");
        assert!(footer.contains("Page "));
        assert!(footer.contains("w:instr=\"PAGE\""));
        let styles = read_part(&bytes, "word/styles.xml");
        assert!(styles.contains("Comic Sans MS"));
        assert!(styles.contains("w:val=\"en-GB\""));
    }

    #[test]
    fn table_grid_follows_weights() {
        let table = DocTable::new(vec![DocTableRow::header(vec![
            DocTableCell::empty(),
            DocTableCell::empty(),
        ])])
        .weights(vec![1, 3]);
        assert_eq!(column_widths(&table), vec![TEXT_WIDTH / 4, TEXT_WIDTH * 3 / 4]);

        let narrow = DocTable::new(vec![DocTableRow::new(vec![DocTableCell::empty()])]).width(50);
        assert_eq!(column_widths(&narrow), vec![TEXT_WIDTH / 2]);
    }

    #[test]
    fn short_rows_span_the_remaining_columns() {
        let table = DocTable::new(vec![
            DocTableRow::header(vec![
                DocTableCell::empty(),
                DocTableCell::empty(),
                DocTableCell::empty(),
            ]),
            DocTableRow::new(vec![DocTableCell::new(DocParagraph::text(
                "Notes",
                TextStyle::default(),
            ))])
            .height(900),
        ]);
        let doc = worksheet(vec![DocumentBlock::Table(table)]);
        let bytes = write_docx(&doc, &LocalOnly, &RenderConfig::default()).unwrap();
        let body = read_part(&bytes, "word/document.xml");
        assert!(body.contains("<w:gridSpan w:val=\"3\"/>"));
        assert!(body.contains("<w:tblHeader/>"));
        assert!(body.contains("w:val=\"900\" w:hRule=\"atLeast\""));
    }

    #[test]
    fn images_are_fitted_or_left_out() {
        let doc = worksheet(vec![
            image_block("/tmp/pizza.png"),
            image_block("https://img.example/gone.png"),
        ]);
        let bytes = write_docx(&doc, &LocalOnly, &RenderConfig::default()).unwrap();
        let body = read_part(&bytes, "word/document.xml");
        assert_eq!(body.matches("<w:drawing>").count(), 1);
        // 2:1 image in a 4x3 in box: 4in wide, 2in tall.
        assert!(body.contains("cx=\"3657600\" cy=\"1828800\""));
        assert!(part_names(&bytes).contains(&"word/media/image1.png".to_string()));
    }
}
