// src/models/elements.rs

use serde::{Deserialize, Serialize};

use crate::models::common::Frame;
use crate::models::image::Image;
use crate::models::shape::Shape;

/// The specific kind of PageElement.
/// The JSON representation uses the variant name as the key (e.g. `"shape": {...}`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PageElementKind {
    /// A generic shape, possibly with text.
    Shape(Shape),
    /// An image page element.
    Image(Image),
}

/// A visual element placed on a deck page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageElement {
    /// Unique within the deck. Also used as the drawing name in the package.
    pub object_id: String,
    /// Position and size in inches.
    pub frame: Frame,
    #[serde(flatten)]
    pub element_kind: PageElementKind,
}

impl PageElement {
    pub fn shape(object_id: impl Into<String>, frame: Frame, shape: Shape) -> Self {
        Self {
            object_id: object_id.into(),
            frame,
            element_kind: PageElementKind::Shape(shape),
        }
    }

    pub fn image(object_id: impl Into<String>, frame: Frame, image: Image) -> Self {
        Self {
            object_id: object_id.into(),
            frame,
            element_kind: PageElementKind::Image(image),
        }
    }

    /// The plain text of this element, if it is a shape with text.
    pub fn text(&self) -> Option<String> {
        match &self.element_kind {
            PageElementKind::Shape(shape) => shape.text.as_ref().map(|t| t.plain_text()),
            PageElementKind::Image(_) => None,
        }
    }

    pub fn as_image(&self) -> Option<&Image> {
        match &self.element_kind {
            PageElementKind::Image(image) => Some(image),
            PageElementKind::Shape(_) => None,
        }
    }
}
