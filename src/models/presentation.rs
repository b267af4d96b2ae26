use serde::{Deserialize, Serialize};

use crate::models::common::Size;
use crate::models::page::DeckPage;

/// 4:3 page, in inches.
pub const PAGE_SIZE: Size = Size::new(10.0, 7.5);

/// An assembled lesson deck, ready to be packaged or previewed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckPresentation {
    /// The title of the deck (the lesson title).
    pub title: String,
    /// Subject as given in the lesson.
    pub subject: String,
    /// Name of the resolved subject theme.
    pub theme_name: String,
    /// The size of every page, in inches.
    pub page_size: Size,
    /// The pages, in presentation order.
    pub slides: Vec<DeckPage>,
}

impl DeckPresentation {
    pub fn page_count(&self) -> usize {
        self.slides.len()
    }
}
