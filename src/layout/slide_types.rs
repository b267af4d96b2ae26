//! The fixed pages around the content slides: title, objectives,
//! differentiation and resources.

use crate::models::colors::{palette, SolidFill};
use crate::models::common::Frame;
use crate::models::elements::PageElement;
use crate::models::lesson::{Differentiation, LessonContent};
use crate::models::page::{DeckPage, PageKind};
use crate::models::shape::{Outline, Shape, ShapeType};
use crate::models::text::{Alignment, TextContent, TextParagraph, TextRun, TextStyle, VerticalAlign};
use crate::themes::Theme;

use super::{rect_element, text_element, ElementIds};

const PAGE_HEADING: Frame = Frame::new(0.5, 0.5, 9.0, 0.8);
const PAGE_HEADING_PT: f64 = 44.0;

/// Objective rows are laid out between these two y positions.
const OBJECTIVES_TOP: f64 = 1.8;
const OBJECTIVES_BOTTOM: f64 = 7.2;
const OBJECTIVE_MAX_PITCH: f64 = 1.0;
const OBJECTIVE_ROW_HEIGHT: f64 = 0.8;

fn page_heading(ids: &mut ElementIds, text: &str, theme: &Theme, font_face: &str) -> PageElement {
    text_element(
        ids,
        PAGE_HEADING,
        TextContent::single(
            text,
            TextStyle::sized(PAGE_HEADING_PT)
                .bold()
                .color(theme.colors.primary)
                .font(font_face),
            Alignment::Start,
        ),
    )
}

fn page(object_id: &str, page_kind: PageKind, theme: &Theme, elements: Vec<PageElement>) -> DeckPage {
    DeckPage {
        object_id: object_id.to_string(),
        page_kind,
        background: theme.colors.background,
        page_elements: elements,
        notes: None,
    }
}

/// The opening page: full-bleed primary background, the lesson title, the
/// learning question when there is one, and a subject line.
pub fn title_page(lesson: &LessonContent, theme: &Theme, font_face: &str) -> DeckPage {
    let mut ids = ElementIds::new("title");
    let white = theme.colors.white;

    let mut elements = vec![text_element(
        &mut ids,
        Frame::new(0.5, 2.0, 9.0, 1.5),
        TextContent::single(
            lesson.title.trim(),
            TextStyle::sized(60.0).bold().color(white).font(font_face),
            Alignment::Center,
        )
        .anchored(VerticalAlign::Middle),
    )];

    if let Some(question) = lesson.learning_question() {
        elements.push(text_element(
            &mut ids,
            Frame::new(1.0, 4.0, 8.0, 1.0),
            TextContent::single(
                question,
                TextStyle::sized(32.0).italic().color(white).font(font_face),
                Alignment::Center,
            ),
        ));
    }

    elements.push(text_element(
        &mut ids,
        Frame::new(1.0, 5.6, 8.0, 0.6),
        TextContent::single(
            format!("{} {} · {}", theme.icon, theme.name, lesson.key_stage),
            TextStyle::sized(24.0).color(white).font(font_face),
            Alignment::Center,
        ),
    ));

    DeckPage {
        background: theme.colors.primary,
        ..page("title", PageKind::Title, theme, elements)
    }
}

/// Vertical distance between objective rows so that `count` rows fit.
pub fn objective_pitch(count: usize) -> f64 {
    if count == 0 {
        return OBJECTIVE_MAX_PITCH;
    }
    ((OBJECTIVES_BOTTOM - OBJECTIVES_TOP) / count as f64).min(OBJECTIVE_MAX_PITCH)
}

/// One outlined rounded row per objective.
/// Rows shrink when there are more than fit at full pitch.
pub fn objectives_page(objectives: &[String], theme: &Theme, font_face: &str) -> DeckPage {
    let mut ids = ElementIds::new("objectives");
    let mut elements = vec![page_heading(&mut ids, "Learning Objectives", theme, font_face)];

    let pitch = objective_pitch(objectives.len());
    let row_h = OBJECTIVE_ROW_HEIGHT.min(pitch * 0.8);
    let font_pt = if pitch < OBJECTIVE_MAX_PITCH {
        (28.0 * pitch).max(14.0).round()
    } else {
        28.0
    };

    for (i, objective) in objectives.iter().enumerate() {
        let y = OBJECTIVES_TOP + pitch * i as f64;
        elements.push(PageElement::shape(
            ids.next("row"),
            Frame::new(0.8, y, 8.4, row_h),
            Shape::filled(ShapeType::RoundRectangle, SolidFill::opaque(theme.colors.white))
                .with_outline(Outline {
                    color: theme.colors.secondary,
                    weight_pt: 2.0,
                }),
        ));
        elements.push(text_element(
            &mut ids,
            Frame::new(1.0, y, 8.0, row_h),
            TextContent::single(
                objective.trim(),
                TextStyle::sized(font_pt)
                    .color(theme.colors.text)
                    .font(font_face),
                Alignment::Start,
            )
            .anchored(VerticalAlign::Middle),
        ));
    }

    page("objectives", PageKind::Objectives, theme, elements)
}

/// Support and stretch panels side by side. A panel without text is left out.
pub fn differentiation_page(diff: &Differentiation, theme: &Theme, font_face: &str) -> DeckPage {
    let mut ids = ElementIds::new("differentiation");
    let mut elements = vec![page_heading(&mut ids, "Differentiation", theme, font_face)];

    let panels = [
        (diff.support(), "Support", 0.5, palette::SUPPORT_PANEL, theme.colors.primary),
        (diff.stretch(), "Stretch", 5.3, palette::STRETCH_PANEL, theme.colors.accent),
    ];
    for (text, label, x, fill, label_color) in panels {
        let Some(text) = text else { continue };
        elements.push(rect_element(
            &mut ids,
            Frame::new(x, 1.8, 4.2, 5.0),
            SolidFill::opaque(fill),
        ));
        elements.push(text_element(
            &mut ids,
            Frame::new(x + 0.2, 2.0, 3.8, 0.6),
            TextContent::single(
                label,
                TextStyle::sized(30.0).bold().color(label_color).font(font_face),
                Alignment::Start,
            ),
        ));
        elements.push(text_element(
            &mut ids,
            Frame::new(x + 0.2, 2.6, 3.8, 4.0),
            TextContent::single(
                text,
                TextStyle::sized(22.0)
                    .color(theme.colors.text)
                    .font(font_face),
                Alignment::Start,
            ),
        ));
    }

    page("differentiation", PageKind::Differentiation, theme, elements)
}

/// "Resources Needed" with one bullet line per resource.
pub fn resources_page(resources: &[String], theme: &Theme, font_face: &str) -> DeckPage {
    let mut ids = ElementIds::new("resources");
    let style = TextStyle::sized(28.0)
        .color(theme.colors.text)
        .font(font_face);
    let paragraphs = resources
        .iter()
        .map(|r| r.trim())
        .filter(|r| !r.is_empty())
        .map(|r| TextParagraph::single(TextRun::new(format!("• {r}"), style.clone())))
        .collect();

    let elements = vec![
        page_heading(&mut ids, "Resources Needed", theme, font_face),
        text_element(
            &mut ids,
            Frame::new(1.0, 1.8, 8.0, 5.0),
            TextContent::new(paragraphs),
        ),
    ];
    page("resources", PageKind::Resources, theme, elements)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::lesson::KeyStage;
    use crate::themes::resolve_theme;

    #[test]
    fn title_page_uses_primary_background() {
        let theme = resolve_theme("geography");
        let lesson = LessonContent {
            title: "Rivers".into(),
            learning_question: Some("Where do rivers go?".into()),
            key_stage: KeyStage::Ks1,
            ..Default::default()
        };
        let page = title_page(&lesson, theme, "Arial");
        assert_eq!(page.background, theme.colors.primary);
        let texts = page.texts();
        assert_eq!(texts[0], "Rivers");
        assert_eq!(texts[1], "Where do rivers go?");
        assert_eq!(texts[2], format!("{} Geography · KS1", theme.icon));
    }

    #[test]
    fn objective_rows_fit_on_the_page() {
        assert_eq!(objective_pitch(3), 1.0);
        let objectives: Vec<String> = (0..9).map(|i| format!("Objective {i}")).collect();
        let page = objectives_page(&objectives, resolve_theme("science"), "Arial");
        let last_row = page
            .page_elements
            .iter()
            .filter(|e| e.object_id.contains("_row"))
            .last()
            .unwrap();
        assert!(last_row.frame.bottom() <= OBJECTIVES_BOTTOM + 1e-9);
    }

    #[test]
    fn differentiation_skips_blank_panels() {
        let diff = Differentiation {
            support: Some("Word mat".into()),
            stretch: Some("  ".into()),
        };
        let page = differentiation_page(&diff, resolve_theme("english"), "Arial");
        let texts = page.texts();
        assert!(texts.contains(&"Support".to_string()));
        assert!(!texts.contains(&"Stretch".to_string()));
    }

    #[test]
    fn resources_are_bulleted() {
        let page = resources_page(
            &["Scissors".into(), "".into(), "Glue".into()],
            resolve_theme("art"),
            "Arial",
        );
        assert_eq!(page.texts()[1], "• Scissors\n• Glue");
        assert_eq!(page.background, resolve_theme("art").colors.background);
    }
}
