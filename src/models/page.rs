// src/models/page.rs

use serde::{Deserialize, Serialize};

use crate::models::colors::RgbColor;
use crate::models::elements::{PageElement, PageElementKind};
use crate::models::image::Image;
use crate::models::lesson::SlideType;

/// How the images of a content page are tiled in the right-hand column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ImageArrangement {
    /// One image filling the column.
    Single,
    /// Two images, one above the other.
    Stacked,
    /// Three or four images in a 2x2 grid. Unused cells are left empty.
    Grid,
}

impl ImageArrangement {
    /// The arrangement for a non-zero image count. Counts above four are treated as four.
    pub fn for_count(count: usize) -> Option<Self> {
        match count {
            0 => None,
            1 => Some(ImageArrangement::Single),
            2 => Some(ImageArrangement::Stacked),
            _ => Some(ImageArrangement::Grid),
        }
    }
}

/// Layout variant of a content page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "variant")]
pub enum Layout {
    /// Single text column spanning the page.
    Standard,
    /// Text on the left, images on the right.
    ImageRight { arrangement: ImageArrangement },
}

/// What a page is for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum PageKind {
    Title,
    Objectives,
    /// A page rendered from `slides[slide_index]`.
    #[serde(rename_all = "camelCase")]
    Content {
        slide_index: usize,
        slide_type: SlideType,
        layout: Layout,
    },
    Differentiation,
    Resources,
}

/// A fully positioned page of the deck.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckPage {
    /// The object ID for this page, e.g. `"slide_3"`.
    pub object_id: String,
    pub page_kind: PageKind,
    /// Solid page background.
    pub background: RgbColor,
    /// Elements in paint order.
    pub page_elements: Vec<PageElement>,
    /// Speaker notes attached to the page, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl DeckPage {
    /// Images on the page, in paint order.
    pub fn images(&self) -> impl Iterator<Item = &Image> {
        self.page_elements.iter().filter_map(PageElement::as_image)
    }

    /// Text of every shape on the page, in paint order.
    pub fn texts(&self) -> Vec<String> {
        self.page_elements
            .iter()
            .filter_map(PageElement::text)
            .filter(|t| !t.is_empty())
            .collect()
    }

    /// The layout of a content page.
    pub fn layout(&self) -> Option<Layout> {
        match &self.page_kind {
            PageKind::Content { layout, .. } => Some(*layout),
            _ => None,
        }
    }

    /// Number of shape elements, images excluded.
    pub fn shape_count(&self) -> usize {
        self.page_elements
            .iter()
            .filter(|e| matches!(e.element_kind, PageElementKind::Shape(_)))
            .count()
    }
}
