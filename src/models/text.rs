// src/models/text.rs

use serde::{Deserialize, Serialize};

use crate::models::colors::RgbColor;

/// Horizontal alignment of a paragraph.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Alignment {
    #[default]
    Start,
    Center,
    End,
}

/// Vertical anchoring of text inside its box.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum VerticalAlign {
    #[default]
    Top,
    Middle,
    Bottom,
}

/// Represents the styling that can be applied to a TextRun.
/// Unset fields fall back to the writer's defaults (theme font, black, 11pt).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStyle {
    /// Font size in points.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size_pt: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<RgbColor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub italic: bool,
}

impl TextStyle {
    pub fn sized(font_size_pt: f64) -> Self {
        Self {
            font_size_pt: Some(font_size_pt),
            ..Default::default()
        }
    }

    pub fn color(mut self, color: RgbColor) -> Self {
        self.color = Some(color);
        self
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    pub fn font(mut self, family: impl Into<String>) -> Self {
        self.font_family = Some(family.into());
        self
    }
}

/// A segment of text with consistent styling within a paragraph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextRun {
    pub content: String,
    #[serde(default)]
    pub style: TextStyle,
}

impl TextRun {
    pub fn new(content: impl Into<String>, style: TextStyle) -> Self {
        Self {
            content: content.into(),
            style,
        }
    }

    pub fn plain(content: impl Into<String>) -> Self {
        Self::new(content, TextStyle::default())
    }
}

/// One paragraph of runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextParagraph {
    pub runs: Vec<TextRun>,
    #[serde(default)]
    pub alignment: Alignment,
}

impl TextParagraph {
    pub fn new(runs: Vec<TextRun>) -> Self {
        Self {
            runs,
            alignment: Alignment::Start,
        }
    }

    pub fn single(run: TextRun) -> Self {
        Self::new(vec![run])
    }

    pub fn aligned(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    /// Concatenated text of all runs.
    pub fn plain_text(&self) -> String {
        self.runs.iter().map(|r| r.content.as_str()).collect()
    }
}

/// Represents the textual content of a shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextContent {
    pub paragraphs: Vec<TextParagraph>,
    #[serde(default)]
    pub vertical_align: VerticalAlign,
}

impl TextContent {
    pub fn new(paragraphs: Vec<TextParagraph>) -> Self {
        Self {
            paragraphs,
            vertical_align: VerticalAlign::Top,
        }
    }

    /// Text content made of a single run.
    pub fn single(text: impl Into<String>, style: TextStyle, alignment: Alignment) -> Self {
        Self::new(vec![
            TextParagraph::single(TextRun::new(text, style)).aligned(alignment)
        ])
    }

    pub fn anchored(mut self, vertical_align: VerticalAlign) -> Self {
        self.vertical_align = vertical_align;
        self
    }

    /// All paragraphs joined with newlines.
    pub fn plain_text(&self) -> String {
        self.paragraphs
            .iter()
            .map(TextParagraph::plain_text)
            .collect::<Vec<_>>()
            .join("\n")
    }
}
