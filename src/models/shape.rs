use serde::{Deserialize, Serialize};

use crate::models::colors::{RgbColor, SolidFill};
use crate::models::text::TextContent;

/// The type of a shape. Only the geometries the deck layouts draw are modelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShapeType {
    /// Text box shape, no geometry drawn.
    TextBox,
    /// Rectangle shape.
    Rectangle,
    /// Round corner rectangle shape.
    RoundRectangle,
    /// Ellipse shape.
    Ellipse,
}

impl ShapeType {
    /// The DrawingML preset geometry name.
    pub fn preset_geometry(&self) -> &'static str {
        match self {
            ShapeType::TextBox | ShapeType::Rectangle => "rect",
            ShapeType::RoundRectangle => "roundRect",
            ShapeType::Ellipse => "ellipse",
        }
    }
}

/// The outline of a shape.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Outline {
    pub color: RgbColor,
    /// Stroke weight in points.
    pub weight_pt: f64,
}

/// A generic shape, optionally carrying text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shape {
    pub shape_type: ShapeType,
    /// Background fill. `None` means transparent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<SolidFill>,
    /// Outline. `None` means no outline.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outline: Option<Outline>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<TextContent>,
}

impl Shape {
    /// A transparent text box.
    pub fn text_box(text: TextContent) -> Self {
        Self {
            shape_type: ShapeType::TextBox,
            fill: None,
            outline: None,
            text: Some(text),
        }
    }

    /// A filled geometry with no outline and no text.
    pub fn filled(shape_type: ShapeType, fill: SolidFill) -> Self {
        Self {
            shape_type,
            fill: Some(fill),
            outline: None,
            text: None,
        }
    }

    pub fn with_outline(mut self, outline: Outline) -> Self {
        self.outline = Some(outline);
        self
    }
}
