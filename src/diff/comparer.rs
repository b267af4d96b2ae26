use log::debug;

use crate::converters::markdown::{deck_to_markdown, extract_text_from_page};
use crate::diff::markdown::{diff_lines, generate_markdown_diff, TextChanges};
use crate::errors::{RenderError, Result};
use crate::models::presentation::DeckPresentation;

const BASE_NAME: &str = "a/deck.md";
const REVISED_NAME: &str = "b/deck.md";

/// Builder for creating a `Comparer`.
/// Sets the "base" deck that revisions are compared against.
#[derive(Default)]
pub struct ComparerBuilder {
    base: Option<DeckPresentation>,
}

impl ComparerBuilder {
    pub fn new() -> Self {
        Default::default()
    }

    /// Sets the base deck to compare against.
    pub fn set_base(mut self, base: DeckPresentation) -> Self {
        self.base = Some(base);
        self
    }

    /// Builds the `Comparer`.
    /// Returns an error if the base deck was not set.
    pub fn build(self) -> Result<Comparer> {
        let base = self
            .base
            .ok_or_else(|| RenderError::InvalidInput("base deck not set".to_string()))?;
        Ok(Comparer::with_outline(base))
    }
}

/// Compares revisions of a deck against a stored base.
pub struct Comparer {
    base: DeckPresentation,
    base_outline: String,
}

impl Comparer {
    /// A comparer over a copy of `base`.
    pub fn from_base(base: &DeckPresentation) -> Self {
        Self::with_outline(base.clone())
    }

    fn with_outline(base: DeckPresentation) -> Self {
        Self {
            base_outline: deck_to_markdown(&base),
            base,
        }
    }

    /// Compares the stored base deck against a revision.
    pub fn compare(&self, revised: &DeckPresentation) -> ComparisonResult {
        let revised_outline = deck_to_markdown(revised);
        let changes = diff_lines(&self.base_outline, &revised_outline, BASE_NAME, REVISED_NAME);

        let page_count = self.base.slides.len().max(revised.slides.len());
        let changed_pages: Vec<usize> = (0..page_count)
            .filter(|&i| {
                let before = self.base.slides.get(i).map(extract_text_from_page);
                let after = revised.slides.get(i).map(extract_text_from_page);
                before != after
            })
            .collect();
        debug!(
            "Deck comparison: +{} -{} lines, pages changed: {:?}",
            changes.lines_added, changes.lines_removed, changed_pages
        );

        ComparisonResult {
            base_outline: self.base_outline.clone(),
            revised_outline,
            changes,
            changed_pages,
        }
    }
}

/// Holds the results of a comparison between two decks.
#[derive(Debug, Clone)]
pub struct ComparisonResult {
    base_outline: String,
    revised_outline: String,
    changes: TextChanges,
    changed_pages: Vec<usize>,
}

impl ComparisonResult {
    pub fn lines_added(&self) -> usize {
        self.changes.lines_added
    }

    pub fn lines_removed(&self) -> usize {
        self.changes.lines_removed
    }

    pub fn has_changes(&self) -> bool {
        !self.changes.is_empty()
    }

    /// Zero-based indices of pages whose text differs, including pages that only
    /// exist in one of the two decks.
    pub fn changed_pages(&self) -> &[usize] {
        &self.changed_pages
    }

    /// Unified diff of the two decks' Markdown outlines.
    pub fn get_git_diff(&self) -> &str {
        &self.changes.unified
    }

    /// Summary followed by the unified diff, as Markdown.
    pub fn get_readable_diff(&self) -> String {
        generate_markdown_diff(
            &self.base_outline,
            &self.revised_outline,
            BASE_NAME,
            REVISED_NAME,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::build_deck;
    use crate::images::NoImages;
    use crate::models::lesson::{LessonContent, SlideSpec};
    use pretty_assertions::assert_eq;

    fn lesson(second_slide: &str) -> LessonContent {
        LessonContent {
            title: "Light".into(),
            subject: "science".into(),
            slides: vec![
                SlideSpec {
                    title: "Sources".into(),
                    content: "The Sun gives light".into(),
                    ..Default::default()
                },
                SlideSpec {
                    title: "Shadows".into(),
                    content: second_slide.into(),
                    ..Default::default()
                },
            ],
            ..Default::default()
        }
    }

    #[test]
    fn builder_requires_base() {
        assert!(matches!(
            ComparerBuilder::new().build(),
            Err(RenderError::InvalidInput(_))
        ));
    }

    #[test]
    fn regenerated_slide_is_reported() {
        let base = build_deck(&lesson("Shadows form behind objects"), &NoImages, "Arial").unwrap();
        let revised =
            build_deck(&lesson("Shadows change length during the day"), &NoImages, "Arial")
                .unwrap();

        let comparer = ComparerBuilder::new().set_base(base.clone()).build().unwrap();
        let result = comparer.compare(&revised);
        assert!(result.has_changes());
        // Title page, then the two content pages.
        assert_eq!(result.changed_pages(), &[2]);
        assert!(result.get_git_diff().contains("+Shadows change length during the day"));
        assert!(result.get_readable_diff().starts_with("## Summary of Changes"));

        let unchanged = comparer.compare(&base);
        assert!(!unchanged.has_changes());
        assert!(unchanged.changed_pages().is_empty());
    }
}
