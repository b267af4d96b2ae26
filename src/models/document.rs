// src/models/document.rs

//! Block model for the worksheet document.
//!
//! Measurements follow the word-processing conventions of the output format:
//! spacing, indents and row heights in twentieths of a point (twips), border
//! widths in eighths of a point, font sizes in points.

use serde::{Deserialize, Serialize};

use crate::models::colors::RgbColor;
use crate::models::image::ImageRef;
use crate::models::text::{Alignment, TextRun, TextStyle};

/// Heading level of a paragraph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HeadingLevel {
    Title,
    Heading1,
    Heading2,
}

impl HeadingLevel {
    /// The paragraph style id written to the document.
    pub fn style_id(&self) -> &'static str {
        match self {
            HeadingLevel::Title => "Title",
            HeadingLevel::Heading1 => "Heading1",
            HeadingLevel::Heading2 => "Heading2",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BorderStyle {
    Single,
    Double,
}

/// One border edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Border {
    pub style: BorderStyle,
    /// Width in eighths of a point.
    pub size: u32,
    pub color: RgbColor,
}

impl Border {
    pub const fn single(size: u32, color: RgbColor) -> Self {
        Self {
            style: BorderStyle::Single,
            size,
            color,
        }
    }

    pub const fn double(size: u32, color: RgbColor) -> Self {
        Self {
            style: BorderStyle::Double,
            size,
            color,
        }
    }
}

/// Per-edge borders. `None` edges are not drawn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BorderSet {
    pub top: Option<Border>,
    pub bottom: Option<Border>,
    pub left: Option<Border>,
    pub right: Option<Border>,
}

impl BorderSet {
    /// The same border on all four edges.
    pub const fn all(border: Border) -> Self {
        Self {
            top: Some(border),
            bottom: Some(border),
            left: Some(border),
            right: Some(border),
        }
    }

    /// Top and bottom only.
    pub const fn horizontal(border: Border) -> Self {
        Self {
            top: Some(border),
            bottom: Some(border),
            left: None,
            right: None,
        }
    }
}

/// A paragraph of styled runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocParagraph {
    pub runs: Vec<TextRun>,
    #[serde(default)]
    pub alignment: Alignment,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heading: Option<HeadingLevel>,
    /// Space before, in twips.
    #[serde(default)]
    pub spacing_before: u32,
    /// Space after, in twips.
    #[serde(default)]
    pub spacing_after: u32,
    /// Left indent, in twips.
    #[serde(default)]
    pub indent_left: u32,
    /// Right indent, in twips.
    #[serde(default)]
    pub indent_right: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub borders: Option<BorderSet>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shading: Option<RgbColor>,
    #[serde(default)]
    pub page_break_before: bool,
}

impl DocParagraph {
    pub fn new(runs: Vec<TextRun>) -> Self {
        Self {
            runs,
            ..Default::default()
        }
    }

    /// A paragraph of a single run.
    pub fn text(content: impl Into<String>, style: TextStyle) -> Self {
        Self::new(vec![TextRun::new(content, style)])
    }

    /// An empty paragraph, used as a blank writing line or vertical gap.
    pub fn blank() -> Self {
        Self::default()
    }

    pub fn heading(mut self, level: HeadingLevel) -> Self {
        self.heading = Some(level);
        self
    }

    pub fn aligned(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    pub fn spacing(mut self, before: u32, after: u32) -> Self {
        self.spacing_before = before;
        self.spacing_after = after;
        self
    }

    pub fn indent(mut self, left: u32, right: u32) -> Self {
        self.indent_left = left;
        self.indent_right = right;
        self
    }

    pub fn bordered(mut self, borders: BorderSet) -> Self {
        self.borders = Some(borders);
        self
    }

    pub fn shaded(mut self, fill: RgbColor) -> Self {
        self.shading = Some(fill);
        self
    }

    pub fn page_break(mut self, page_break_before: bool) -> Self {
        self.page_break_before = page_break_before;
        self
    }

    pub fn plain_text(&self) -> String {
        self.runs.iter().map(|r| r.content.as_str()).collect()
    }
}

/// One table cell.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocTableCell {
    pub paragraphs: Vec<DocParagraph>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shading: Option<RgbColor>,
}

impl DocTableCell {
    pub fn new(paragraph: DocParagraph) -> Self {
        Self {
            paragraphs: vec![paragraph],
            shading: None,
        }
    }

    /// A cell holding a single empty paragraph.
    pub fn empty() -> Self {
        Self::new(DocParagraph::blank())
    }

    pub fn shaded(mut self, fill: RgbColor) -> Self {
        self.shading = Some(fill);
        self
    }

    pub fn plain_text(&self) -> String {
        self.paragraphs
            .iter()
            .map(DocParagraph::plain_text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocTableRow {
    pub cells: Vec<DocTableCell>,
    /// Marks the header row; repeated on page breaks.
    #[serde(default)]
    pub header: bool,
    /// Minimum row height, in twips.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_height: Option<u32>,
}

impl DocTableRow {
    pub fn new(cells: Vec<DocTableCell>) -> Self {
        Self {
            cells,
            header: false,
            min_height: None,
        }
    }

    pub fn header(cells: Vec<DocTableCell>) -> Self {
        Self {
            cells,
            header: true,
            min_height: None,
        }
    }

    pub fn height(mut self, twips: u32) -> Self {
        self.min_height = Some(twips);
        self
    }
}

/// Borders of a table: the outer edges plus the rules between cells.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableBorders {
    pub outer: BorderSet,
    pub inside_horizontal: Option<Border>,
    pub inside_vertical: Option<Border>,
}

impl TableBorders {
    /// One border everywhere.
    pub const fn grid(border: Border) -> Self {
        Self {
            outer: BorderSet::all(border),
            inside_horizontal: Some(border),
            inside_vertical: Some(border),
        }
    }

    /// Outer edges with `outer`, inside rules with `inside`.
    pub const fn framed(outer: Border, inside: Border) -> Self {
        Self {
            outer: BorderSet::all(outer),
            inside_horizontal: Some(inside),
            inside_vertical: Some(inside),
        }
    }
}

/// A table spanning `width_pct` percent of the text width.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocTable {
    pub rows: Vec<DocTableRow>,
    /// Relative column widths. Empty means equal widths.
    #[serde(default)]
    pub column_weights: Vec<u32>,
    /// Percentage of the text width, 1-100.
    pub width_pct: u32,
    /// `None` uses the default single grid.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub borders: Option<TableBorders>,
}

impl DocTable {
    pub fn new(rows: Vec<DocTableRow>) -> Self {
        Self {
            rows,
            column_weights: Vec::new(),
            width_pct: 100,
            borders: None,
        }
    }

    pub fn width(mut self, width_pct: u32) -> Self {
        self.width_pct = width_pct.clamp(1, 100);
        self
    }

    pub fn weights(mut self, weights: Vec<u32>) -> Self {
        self.column_weights = weights;
        self
    }

    pub fn bordered(mut self, borders: TableBorders) -> Self {
        self.borders = Some(borders);
        self
    }

    /// Rows that are not header rows.
    pub fn data_rows(&self) -> impl Iterator<Item = &DocTableRow> {
        self.rows.iter().filter(|r| !r.header)
    }

    pub fn column_count(&self) -> usize {
        self.rows.iter().map(|r| r.cells.len()).max().unwrap_or(0)
    }
}

/// An inline image on its own line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocImage {
    pub source: ImageRef,
    #[serde(default)]
    pub description: String,
    /// Box the image is fitted into, in inches.
    pub max_width: f64,
    pub max_height: f64,
    #[serde(default)]
    pub alignment: Alignment,
    /// Space after, in twips.
    #[serde(default)]
    pub spacing_after: u32,
}

/// One block of the worksheet body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DocumentBlock {
    Paragraph(DocParagraph),
    Table(DocTable),
    Image(DocImage),
}

impl DocumentBlock {
    /// Every text fragment in the block, in reading order.
    pub fn texts(&self) -> Vec<String> {
        match self {
            DocumentBlock::Paragraph(p) => vec![p.plain_text()],
            DocumentBlock::Table(t) => t
                .rows
                .iter()
                .flat_map(|r| r.cells.iter().map(DocTableCell::plain_text))
                .collect(),
            DocumentBlock::Image(img) => vec![img.description.clone()],
        }
    }
}

/// A composed worksheet, ready to be packaged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorksheetDocument {
    pub title: String,
    /// Running header text.
    pub header_text: String,
    /// Footer text placed before the page number field.
    pub footer_prefix: String,
    /// Accent color of header and footer text.
    pub furniture_color: RgbColor,
    pub blocks: Vec<DocumentBlock>,
}

impl WorksheetDocument {
    /// All tables in the body.
    pub fn tables(&self) -> impl Iterator<Item = &DocTable> {
        self.blocks.iter().filter_map(|b| match b {
            DocumentBlock::Table(t) => Some(t),
            _ => None,
        })
    }

    /// All text fragments of the body, in order.
    pub fn texts(&self) -> Vec<String> {
        self.blocks.iter().flat_map(DocumentBlock::texts).collect()
    }
}
