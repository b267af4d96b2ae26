use crate::models::{
    elements::{PageElement, PageElementKind},
    image::Image,
    page::{DeckPage, PageKind},
    presentation::DeckPresentation,
    shape::Shape,
};
use std::cmp::Ordering;
use std::fmt::Write;

// --- Helper Function for Sorting ---

/// Compares two PageElements by their top edge, then their left edge.
fn compare_elements_by_y(a: &PageElement, b: &PageElement) -> Ordering {
    a.frame
        .y
        .partial_cmp(&b.frame.y)
        .unwrap_or(Ordering::Equal)
        .then(a.frame.x.partial_cmp(&b.frame.x).unwrap_or(Ordering::Equal))
}

// --- Text Extraction Logic ---

/// Text of a shape, trimmed. Shapes without text or with only whitespace give `None`.
fn extract_text_from_shape(shape: &Shape) -> Option<String> {
    let text = shape.text.as_ref()?.plain_text();
    let trimmed = text.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn extract_image_reference(image: &Image) -> String {
    let alt = if image.description.trim().is_empty() {
        image.source.file_name()
    } else {
        image.description.trim().to_string()
    };
    format!("![{}]({})", alt, image.source)
}

fn extract_text_from_page_element(element: &PageElement) -> Option<String> {
    match &element.element_kind {
        PageElementKind::Shape(shape) => extract_text_from_shape(shape),
        PageElementKind::Image(image) => Some(extract_image_reference(image)),
    }
}

/// Extracts the text of one page, top to bottom. Images appear as Markdown
/// image links. `None` when the page carries nothing to show.
pub fn extract_text_from_page(page: &DeckPage) -> Option<String> {
    let mut sorted_elements: Vec<&PageElement> = page.page_elements.iter().collect();
    sorted_elements.sort_by(|a, b| compare_elements_by_y(a, b));

    let parts: Vec<String> = sorted_elements
        .into_iter()
        .filter_map(extract_text_from_page_element)
        .collect();

    if parts.is_empty() {
        None
    } else {
        Some(parts.join("\n"))
    }
}

fn page_heading(index: usize, page: &DeckPage) -> String {
    let kind = match &page.page_kind {
        PageKind::Title => "Title",
        PageKind::Objectives => "Objectives",
        PageKind::Content { .. } => "Content",
        PageKind::Differentiation => "Differentiation",
        PageKind::Resources => "Resources",
    };
    format!("## Slide {} ({})", index + 1, kind)
}

// --- Public API Function ---

/// Extracts the text of every page in a deck as Markdown.
///
/// # Arguments
///
/// * `deck` - The assembled deck.
///
/// # Returns
///
/// A `String` with the deck title as the top heading and one section per page,
/// separated by rules. Pages without any text or images are skipped.
pub fn deck_to_markdown(deck: &DeckPresentation) -> String {
    let mut full_text = String::new();

    // Writing into a String cannot fail.
    let _ = writeln!(full_text, "# {}\n", deck.title);

    let mut first_page = true;
    for (index, page) in deck.slides.iter().enumerate() {
        let Some(page_content) = extract_text_from_page(page) else {
            continue;
        };
        if !first_page {
            let _ = writeln!(full_text, "\n---\n");
        }
        first_page = false;

        let _ = writeln!(full_text, "{}\n", page_heading(index, page));
        let _ = writeln!(full_text, "{}", page_content);
    }

    full_text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::build_deck;
    use crate::images::NoImages;
    use crate::models::common::Frame;
    use crate::models::image::ImageRef;
    use crate::models::lesson::{LessonContent, SlideSpec};
    use crate::models::text::{Alignment, TextContent, TextStyle};
    use pretty_assertions::assert_eq;

    #[test]
    fn elements_are_read_top_to_bottom() {
        let text = |id: &str, y: f64, s: &str| {
            PageElement::shape(
                id,
                Frame::new(0.5, y, 9.0, 0.5),
                Shape::text_box(TextContent::single(s, TextStyle::default(), Alignment::Start)),
            )
        };
        let page = DeckPage {
            object_id: "p".into(),
            page_kind: PageKind::Resources,
            background: crate::models::colors::palette::WHITE,
            page_elements: vec![
                text("b", 3.0, "Second"),
                PageElement::image(
                    "img",
                    Frame::new(5.0, 4.0, 4.0, 3.0),
                    Image {
                        source: ImageRef::parse("/uploads/maps/river.png"),
                        description: String::new(),
                    },
                ),
                text("a", 1.0, "  First  "),
                text("blank", 2.0, "   "),
            ],
            notes: None,
        };
        assert_eq!(
            extract_text_from_page(&page).unwrap(),
            "First\nSecond\n![river.png](/uploads/maps/river.png)"
        );
    }

    #[test]
    fn outline_has_one_section_per_page() {
        let lesson = LessonContent {
            title: "Volcanoes".into(),
            subject: "geography".into(),
            slides: vec![
                SlideSpec {
                    title: "Eruptions".into(),
                    content: "Magma rises".into(),
                    ..Default::default()
                },
                SlideSpec {
                    title: "Types".into(),
                    content: "- Shield\n- Composite".into(),
                    ..Default::default()
                },
            ],
            ..Default::default()
        };
        let deck = build_deck(&lesson, &NoImages, "Arial").unwrap();
        let md = deck_to_markdown(&deck);

        assert!(md.starts_with("# Volcanoes\n"));
        assert!(md.contains("## Slide 1 (Title)"));
        assert!(md.contains("## Slide 3 (Content)"));
        assert!(md.contains("Composite"));
        assert_eq!(md.matches("\n---\n").count(), 2);
    }
}
