//! Deck assembly: the fixed page sequence of a lesson deck.
//!
//! Pages are built in memory in this order: title, objectives (when there are
//! any), one content page per slide, differentiation (when it has text) and
//! resources (when any are listed). Packaging and the final file write come last,
//! so a failure never leaves a partial file behind.

use log::info;
use std::path::Path;

use crate::config::RenderConfig;
use crate::converters::pptx::write_pptx;
use crate::errors::Result;
use crate::images::{resolve_slide_images, ImageLoader, ImageMap, ImageResolver};
use crate::layout::{
    differentiation_page, objectives_page, render_slide, resources_page, title_page,
};
use crate::models::lesson::LessonContent;
use crate::models::presentation::{DeckPresentation, PAGE_SIZE};
use crate::themes::resolve_theme;

/// Builds every page of the deck.
///
/// # Arguments
///
/// * `lesson` - The structured lesson. It must have at least one slide.
/// * `images` - Resolves image suggestions to references.
/// * `font_face` - Font family applied to all text.
///
/// # Returns
///
/// The assembled [`DeckPresentation`], or [`crate::errors::RenderError::InvalidLesson`]
/// before any page is built.
pub fn build_deck<R: ImageResolver + ?Sized>(
    lesson: &LessonContent,
    images: &R,
    font_face: &str,
) -> Result<DeckPresentation> {
    lesson.validate_for_deck()?;
    let theme = resolve_theme(&lesson.subject);

    let mut pages = Vec::with_capacity(lesson.slides.len() + 4);
    pages.push(title_page(lesson, theme, font_face));

    let objectives: Vec<String> = lesson
        .objectives
        .iter()
        .filter(|o| !o.trim().is_empty())
        .cloned()
        .collect();
    if !objectives.is_empty() {
        pages.push(objectives_page(&objectives, theme, font_face));
    }

    for (index, slide) in lesson.slides.iter().enumerate() {
        let slide_images = resolve_slide_images(slide, images);
        pages.push(render_slide(slide, theme, &slide_images, index, font_face));
    }

    if let Some(differentiation) = lesson.effective_differentiation() {
        pages.push(differentiation_page(differentiation, theme, font_face));
    }

    if lesson.resources.iter().any(|r| !r.trim().is_empty()) {
        pages.push(resources_page(&lesson.resources, theme, font_face));
    }

    info!(
        "Assembled {} deck '{}' with {} pages",
        theme.name,
        lesson.title,
        pages.len()
    );

    Ok(DeckPresentation {
        title: lesson.title.trim().to_string(),
        subject: lesson.subject.clone(),
        theme_name: theme.name.to_string(),
        page_size: PAGE_SIZE,
        slides: pages,
    })
}

/// Assembles a lesson into `.pptx` bytes.
///
/// A missing image map means no suggestion resolves; `selected_images` still do.
pub fn assemble_deck<L: ImageLoader + ?Sized>(
    lesson: &LessonContent,
    image_map: Option<&ImageMap>,
    loader: &L,
    config: &RenderConfig,
) -> Result<Vec<u8>> {
    let deck = build_deck(lesson, &image_map, &config.font_face)?;
    write_pptx(&deck, loader, config)
}

/// Assembles a lesson and writes the deck to `path`.
/// The file is written only once the whole package is in memory.
pub fn write_deck<L: ImageLoader + ?Sized>(
    lesson: &LessonContent,
    image_map: Option<&ImageMap>,
    loader: &L,
    config: &RenderConfig,
    path: impl AsRef<Path>,
) -> Result<()> {
    let bytes = assemble_deck(lesson, image_map, loader, config)?;
    std::fs::write(path.as_ref(), &bytes)?;
    info!("Wrote {} bytes to {}", bytes.len(), path.as_ref().display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::converters::ooxml::tests::{part_names, read_part};
    use crate::errors::RenderError;
    use crate::images::{LoadedImage, NoImages};
    use crate::models::image::ImageRef;
    use crate::models::lesson::{Differentiation, SlideSpec, SlideType};
    use crate::models::page::{ImageArrangement, Layout, PageKind};
    use pretty_assertions::assert_eq;

    struct NoFiles;

    impl ImageLoader for NoFiles {
        fn load(&self, source: &ImageRef) -> Result<LoadedImage> {
            Err(RenderError::Image(format!("not found: {source}")))
        }
    }

    fn slide(title: &str, content: &str) -> SlideSpec {
        SlideSpec {
            title: title.into(),
            content: content.into(),
            ..Default::default()
        }
    }

    fn full_lesson() -> LessonContent {
        LessonContent {
            title: "Plant Life".into(),
            subject: "science".into(),
            objectives: vec!["Name the parts of a plant".into()],
            slides: vec![slide("Hook", "What do plants need?"), slide("Main", "- Roots\n- Stem")],
            resources: vec!["Seeds".into()],
            differentiation: Some(Differentiation {
                support: Some("Labelled diagram".into()),
                stretch: None,
            }),
            ..Default::default()
        }
    }

    fn kinds(deck: &DeckPresentation) -> Vec<&'static str> {
        deck.slides
            .iter()
            .map(|p| match p.page_kind {
                PageKind::Title => "title",
                PageKind::Objectives => "objectives",
                PageKind::Content { .. } => "content",
                PageKind::Differentiation => "differentiation",
                PageKind::Resources => "resources",
            })
            .collect()
    }

    #[test]
    fn pages_follow_fixed_order() {
        let deck = build_deck(&full_lesson(), &NoImages, "Arial").unwrap();
        assert_eq!(
            kinds(&deck),
            vec!["title", "objectives", "content", "content", "differentiation", "resources"]
        );
    }

    #[test]
    fn optional_pages_are_skipped() {
        let lesson = LessonContent {
            objectives: vec!["  ".into()],
            resources: vec![],
            differentiation: Some(Differentiation::default()),
            ..full_lesson()
        };
        let deck = build_deck(&lesson, &NoImages, "Arial").unwrap();
        assert_eq!(kinds(&deck), vec!["title", "content", "content"]);
        assert_eq!(deck.page_count(), lesson.slides.len() + 1);
    }

    #[test]
    fn habitat_slide_uses_image_right_layout() {
        let lesson = LessonContent {
            title: "Habitats".into(),
            subject: "science".into(),
            slides: vec![SlideSpec {
                title: "Hook".into(),
                slide_type: SlideType::Starter,
                content: "What is a habitat?".into(),
                image_suggestions: vec!["habitat diagram".into()],
                ..Default::default()
            }],
            ..Default::default()
        };
        let mut map = ImageMap::new();
        map.insert("habitat diagram".into(), "/tmp/a.png".into());

        let deck = build_deck(&lesson, &Some(&map), "Arial").unwrap();
        assert_eq!(deck.page_count(), 2);
        let content = &deck.slides[1];
        assert_eq!(
            content.layout(),
            Some(Layout::ImageRight {
                arrangement: ImageArrangement::Single
            })
        );
        assert_eq!(content.images().count(), 1);
        assert_eq!(content.shape_count(), content.page_elements.len() - 1);
    }

    #[test]
    fn title_page_background_differs_from_interior() {
        let deck = build_deck(&full_lesson(), &NoImages, "Arial").unwrap();
        let theme = resolve_theme("science");
        assert_eq!(deck.slides[0].background, theme.colors.primary);
        assert!(deck.slides[1..]
            .iter()
            .all(|p| p.background == theme.colors.background));
    }

    #[test]
    fn lesson_without_slides_fails_before_writing() {
        let lesson = LessonContent {
            slides: vec![],
            ..full_lesson()
        };
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deck.pptx");
        let err = write_deck(&lesson, None, &NoFiles, &RenderConfig::default(), &path).unwrap_err();
        assert!(matches!(err, RenderError::InvalidLesson(_)));
        assert!(!path.exists());
    }

    #[test]
    fn write_deck_produces_a_package() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deck.pptx");
        write_deck(&full_lesson(), None, &NoFiles, &RenderConfig::default(), &path).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        let slides = part_names(&bytes)
            .into_iter()
            .filter(|n| n.starts_with("ppt/slides/slide") && n.ends_with(".xml"))
            .count();
        assert_eq!(slides, 6);
    }

    #[test]
    fn control_characters_never_reach_the_package() {
        let lesson = LessonContent {
            title: "Sound\u{B}waves\u{1}".into(),
            slides: vec![slide("Pitch", "a\u{0}b")],
            ..full_lesson()
        };
        let bytes = assemble_deck(&lesson, None, &NoFiles, &RenderConfig::default()).unwrap();
        for name in part_names(&bytes).iter().filter(|n| n.ends_with(".xml")) {
            let part = read_part(&bytes, name);
            assert!(
                !part.chars().any(|c| c < ' ' && !matches!(c, '\t' | '\n' | '\r')),
                "control character left in {name}"
            );
        }
        let title_slide = read_part(&bytes, "ppt/slides/slide1.xml");
        assert!(title_slide.contains("Sound waves"));
    }
}
