//! Worksheet composition: turns a lesson into the block model of a printable
//! activity sheet.
//!
//! Section order is fixed: header, objectives, up to [`MAX_ACTIVITIES`]
//! activities, challenge, reflection. Composition is a single pass over the lesson
//! and cannot fail; packaging happens in [`crate::converters::docx`].

pub mod challenge;
pub mod objectives;

use log::{debug, info};
use std::path::Path;

use crate::config::RenderConfig;
use crate::converters::docx::write_docx;
use crate::errors::Result;

use crate::images::{resolve_activity_image, ImageLoader, ImageResolver};
use crate::models::colors::palette;
use crate::models::document::{
    Border, BorderSet, DocImage, DocParagraph, DocTable, DocTableCell, DocTableRow,
    DocumentBlock, HeadingLevel, TableBorders, WorksheetDocument,
};
use crate::models::lesson::{ActivityItem, LessonContent};
use crate::models::text::{Alignment, TextRun, TextStyle};
use crate::themes::{icons, resolve_theme, Theme};
use crate::visual_formats::render_visual_format;

pub use challenge::{
    challenge_prompts, ANSWER_LINES, ANSWER_LINES_SUPPORT, CHALLENGE_PROMPTS,
    CHALLENGE_PROMPTS_SUPPORT,
};
pub use objectives::rewrite_objective;

/// Activities rendered, at most. Further items are dropped.
pub const MAX_ACTIVITIES: usize = 3;
/// Question table rows, at most.
pub const QUESTION_ROWS: usize = 6;
pub const QUESTION_ROWS_SUPPORT: usize = 4;
/// Gap-fill sentences in support mode, at most. Unlimited otherwise.
pub const GAP_FILL_SUPPORT: usize = 3;
/// Objectives listed on the worksheet, at most.
pub const MAX_WORKSHEET_OBJECTIVES: usize = 4;

/// Minimum question row height, in twips.
const QUESTION_ROW_HEIGHT: u32 = 700;
const QUESTION_ROW_HEIGHT_SUPPORT: u32 = 900;
/// Activity images are fitted into 400x300 px at 96 dpi.
const ACTIVITY_IMAGE_MAX_WIDTH: f64 = 400.0 / 96.0;
const ACTIVITY_IMAGE_MAX_HEIGHT: f64 = 300.0 / 96.0;

const DEFAULT_TITLE: &str = "Lesson Resources";
const SENTENCE_STARTERS: [&str; 4] = [
    "• \"I think that...\"",
    "• \"This shows me...\"",
    "• \"I can see that...\"",
    "• \"The answer is... because...\"",
];

/// Composes the worksheet for a lesson.
///
/// # Arguments
///
/// * `lesson` - The structured lesson.
/// * `images` - Resolves activity image descriptions.
/// * `support_mode` - Fewer items per section, taller rows, and a sentence-starter
///   help box in every activity.
///
/// # Returns
///
/// The composed [`WorksheetDocument`], ready for [`crate::converters::docx`].
pub fn compose_worksheet<R: ImageResolver + ?Sized>(
    lesson: &LessonContent,
    images: &R,
    support_mode: bool,
) -> WorksheetDocument {
    let theme = resolve_theme(&lesson.subject);
    let title = match lesson.title.trim() {
        "" => DEFAULT_TITLE,
        t => t,
    };
    info!(
        "Composing {}{} worksheet '{}'",
        if support_mode { "scaffolded " } else { "" },
        theme.name,
        title
    );

    let mut blocks = header_section(lesson, title, theme);
    blocks.extend(objectives_section(lesson, theme));

    let activities = lesson.activities();
    if activities.len() > MAX_ACTIVITIES {
        debug!(
            "Dropping {} activities beyond the first {}",
            activities.len() - MAX_ACTIVITIES,
            MAX_ACTIVITIES
        );
    }
    for (index, activity) in activities.iter().take(MAX_ACTIVITIES).enumerate() {
        blocks.extend(activity_section(index, activity, images, theme, support_mode));
    }

    blocks.extend(challenge::challenge_section(lesson, support_mode));
    blocks.extend(challenge::reflection_section(theme));

    WorksheetDocument {
        title: title.to_string(),
        header_text: format!("{} {}", theme.icon, title),
        footer_prefix: "Page ".to_string(),
        furniture_color: theme.colors.text_light,
        blocks,
    }
}

/// Composes a worksheet and packages it as `.docx` bytes.
pub fn render_worksheet<R: ImageResolver + ?Sized, L: ImageLoader + ?Sized>(
    lesson: &LessonContent,
    images: &R,
    loader: &L,
    support_mode: bool,
    config: &RenderConfig,
) -> Result<Vec<u8>> {
    let doc = compose_worksheet(lesson, images, support_mode);
    write_docx(&doc, loader, config)
}

/// Renders a worksheet and writes it to `path` once the package is complete.
pub fn write_worksheet<R: ImageResolver + ?Sized, L: ImageLoader + ?Sized>(
    lesson: &LessonContent,
    images: &R,
    loader: &L,
    support_mode: bool,
    config: &RenderConfig,
    path: impl AsRef<Path>,
) -> Result<()> {
    let bytes = render_worksheet(lesson, images, loader, support_mode, config)?;
    std::fs::write(path.as_ref(), &bytes)?;
    info!("Wrote {} bytes to {}", bytes.len(), path.as_ref().display());
    Ok(())
}

// --- Header and objectives ---

fn header_section(lesson: &LessonContent, title: &str, theme: &Theme) -> Vec<DocumentBlock> {
    let mut blocks = vec![DocumentBlock::Paragraph(
        DocParagraph::text(
            title,
            TextStyle::sized(24.0).bold().color(theme.colors.primary),
        )
        .heading(HeadingLevel::Title)
        .aligned(Alignment::Center)
        .spacing(0, 200),
    )];

    if let Some(question) = lesson.learning_question() {
        blocks.push(DocumentBlock::Paragraph(
            DocParagraph::text(
                format!("{} {}", icons::OBJECTIVES, question),
                TextStyle::sized(12.0).italic().color(theme.colors.primary_dark),
            )
            .aligned(Alignment::Center)
            .spacing(0, 300)
            .bordered(BorderSet::horizontal(Border::single(
                2,
                theme.colors.secondary,
            ))),
        ));
    }

    let subject = match lesson.subject.trim() {
        "" => "General",
        s => s,
    };
    let info = TextStyle::sized(10.0);
    blocks.push(DocumentBlock::Paragraph(
        DocParagraph::new(vec![
            TextRun::new(format!("{} {} | ", theme.icon, subject), info.clone().bold()),
            TextRun::new(format!("{} | ", lesson.key_stage), info.clone()),
            TextRun::new("Name: ___________________________ | ", info.clone()),
            TextRun::new("Date: _______________", info),
        ])
        .aligned(Alignment::Center)
        .spacing(200, 400),
    ));
    blocks
}

fn objectives_section(lesson: &LessonContent, theme: &Theme) -> Vec<DocumentBlock> {
    let objectives: Vec<&str> = lesson
        .objectives
        .iter()
        .map(|o| o.trim())
        .filter(|o| !o.is_empty())
        .take(MAX_WORKSHEET_OBJECTIVES)
        .collect();
    if objectives.is_empty() {
        return Vec::new();
    }

    let mut blocks = vec![
        DocumentBlock::Paragraph(
            DocParagraph::text(
                format!("{} Learning Objectives", icons::OBJECTIVES),
                TextStyle::sized(14.0).bold().color(theme.colors.primary),
            )
            .heading(HeadingLevel::Heading1)
            .spacing(300, 200),
        ),
        DocumentBlock::Paragraph(
            DocParagraph::text(
                "Tick each box when you can do it!",
                TextStyle::sized(10.0).italic().color(palette::MUTED_TEXT),
            )
            .spacing(0, 150),
        ),
    ];
    for objective in objectives {
        blocks.push(DocumentBlock::Paragraph(
            DocParagraph::new(vec![
                TextRun::new(
                    format!("{}  ", icons::CHECKBOX),
                    TextStyle::sized(12.0).bold().color(theme.colors.secondary),
                ),
                TextRun::new(rewrite_objective(objective), TextStyle::sized(11.0)),
            ])
            .spacing(0, 120),
        ));
    }
    blocks.push(gap(300));
    blocks
}

fn gap(after: u32) -> DocumentBlock {
    DocumentBlock::Paragraph(DocParagraph::blank().spacing(0, after))
}

// --- Activities ---

fn activity_section<R: ImageResolver + ?Sized>(
    index: usize,
    activity: &ActivityItem,
    images: &R,
    theme: &Theme,
    support_mode: bool,
) -> Vec<DocumentBlock> {
    let title = match activity.title.trim() {
        "" => "Practice Task",
        t => t,
    };
    let mut blocks = vec![DocumentBlock::Paragraph(
        DocParagraph::text(
            format!("{} Activity {}: {}", icons::ACTIVITY, index + 1, title),
            TextStyle::sized(16.0).bold().color(theme.colors.primary),
        )
        .heading(HeadingLevel::Heading1)
        .spacing(400, 200)
        .page_break(index > 0),
    )];

    if let Some((source, description)) = resolve_activity_image(activity, images) {
        blocks.push(DocumentBlock::Image(DocImage {
            source,
            description,
            max_width: ACTIVITY_IMAGE_MAX_WIDTH,
            max_height: ACTIVITY_IMAGE_MAX_HEIGHT,
            alignment: Alignment::Center,
            spacing_after: 250,
        }));
    }

    if !activity.instructions.trim().is_empty() {
        blocks.push(DocumentBlock::Paragraph(
            DocParagraph::text(activity.instructions.trim(), TextStyle::sized(11.0))
                .spacing(0, 250),
        ));
    }

    if support_mode {
        blocks.extend(help_box());
    }

    blocks.extend(content_text(activity, theme));
    blocks.extend(question_table(activity, theme, support_mode));
    blocks.extend(gap_fill(activity, support_mode));
    if let Some(format) = &activity.visual_format {
        blocks.extend(render_visual_format(format, theme, support_mode));
    }

    blocks.push(gap(300));
    blocks
}

/// Sentence starters in a green double-bordered box.
fn help_box() -> Vec<DocumentBlock> {
    let mut paragraphs = vec![DocParagraph::text(
        format!("{} Sentence Starters:", icons::HELP),
        TextStyle::default().bold(),
    )
    .spacing(0, 100)];
    paragraphs.extend(
        SENTENCE_STARTERS
            .iter()
            .map(|s| DocParagraph::text(*s, TextStyle::default()).spacing(0, 50)),
    );

    let frame = Border::double(6, palette::HELP_GREEN);
    vec![
        DocumentBlock::Paragraph(
            DocParagraph::text(
                format!("{} Help Box:", icons::KEY_POINT),
                TextStyle::sized(12.0).bold().color(palette::HELP_GREEN),
            )
            .spacing(150, 100),
        ),
        DocumentBlock::Table(
            DocTable::new(vec![DocTableRow::new(vec![DocTableCell {
                paragraphs,
                shading: Some(palette::HELP_GREEN_TINT),
            }])])
            .bordered(TableBorders {
                outer: BorderSet::all(frame),
                inside_horizontal: None,
                inside_vertical: None,
            }),
        ),
        gap(250),
    ]
}

/// The reading passage, one shaded paragraph per line inside a double frame.
/// Nothing at all is emitted without a passage.
fn content_text(activity: &ActivityItem, theme: &Theme) -> Vec<DocumentBlock> {
    let Some(text) = activity.content_text() else {
        return Vec::new();
    };
    let paragraphs: Vec<&str> = text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    let frame = Border::double(6, theme.colors.primary);
    let last = paragraphs.len().saturating_sub(1);

    let mut blocks = vec![DocumentBlock::Paragraph(
        DocParagraph::text(
            format!("{} Read this carefully:", icons::READING),
            TextStyle::sized(12.0).bold().color(theme.colors.primary),
        )
        .spacing(200, 150),
    )];
    for (idx, para) in paragraphs.iter().enumerate() {
        let borders = BorderSet {
            top: (idx == 0).then_some(frame),
            bottom: (idx == last).then_some(frame),
            left: Some(frame),
            right: Some(frame),
        };
        blocks.push(DocumentBlock::Paragraph(
            DocParagraph::text(*para, TextStyle::sized(11.0))
                .spacing(0, 150)
                .indent(400, 400)
                .bordered(borders)
                .shaded(theme.colors.background),
        ));
    }
    blocks.push(gap(400));
    blocks
}

fn question_table(activity: &ActivityItem, theme: &Theme, support_mode: bool) -> Vec<DocumentBlock> {
    let (cap, height) = if support_mode {
        (QUESTION_ROWS_SUPPORT, QUESTION_ROW_HEIGHT_SUPPORT)
    } else {
        (QUESTION_ROWS, QUESTION_ROW_HEIGHT)
    };
    let questions: Vec<&str> = activity
        .table_questions
        .iter()
        .map(|q| q.trim())
        .filter(|q| !q.is_empty())
        .take(cap)
        .collect();
    if questions.is_empty() {
        return Vec::new();
    }

    let prompt = if activity.content_text().is_some() {
        "Answer these questions using the text above:"
    } else {
        "Complete the table using what you learned:"
    };

    let header_cell = |text: &str| {
        DocTableCell::new(
            DocParagraph::text(text, TextStyle::default().bold()).aligned(Alignment::Center),
        )
        .shaded(theme.colors.background)
    };
    let mut rows = vec![DocTableRow::header(vec![
        header_cell("Question"),
        header_cell("My Answer"),
    ])];
    for question in questions {
        rows.push(
            DocTableRow::new(vec![
                DocTableCell::new(
                    DocParagraph::text(question, TextStyle::default()).spacing(150, 150),
                ),
                DocTableCell::new(DocParagraph::blank().spacing(400, 400)),
            ])
            .height(height),
        );
    }

    vec![
        DocumentBlock::Paragraph(
            DocParagraph::text(prompt, TextStyle::sized(11.0).bold()).spacing(0, 150),
        ),
        DocumentBlock::Table(DocTable::new(rows).weights(vec![50, 50])),
        gap(300),
    ]
}

fn gap_fill(activity: &ActivityItem, support_mode: bool) -> Vec<DocumentBlock> {
    let cap = if support_mode {
        GAP_FILL_SUPPORT
    } else {
        usize::MAX
    };
    let sentences: Vec<&str> = activity
        .gap_fill_questions
        .iter()
        .map(|q| q.trim())
        .filter(|q| !q.is_empty())
        .take(cap)
        .collect();
    if sentences.is_empty() {
        return Vec::new();
    }

    let mut blocks = vec![DocumentBlock::Paragraph(
        DocParagraph::text("Fill in the missing words:", TextStyle::sized(11.0).bold())
            .spacing(300, 150),
    )];
    for (idx, sentence) in sentences.iter().enumerate() {
        blocks.push(DocumentBlock::Paragraph(
            DocParagraph::new(vec![
                TextRun::new(format!("{}. ", idx + 1), TextStyle::sized(10.0).bold()),
                TextRun::new(*sentence, TextStyle::sized(10.0)),
            ])
            .spacing(0, 250),
        ));
    }
    blocks
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::images::{ImageMap, NoImages};
    use crate::models::lesson::{ResourceContent, VisualFormatSpec};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn activity(title: &str) -> ActivityItem {
        ActivityItem {
            title: title.to_string(),
            instructions: "Do the task".to_string(),
            ..Default::default()
        }
    }

    fn lesson_with(items: Vec<ActivityItem>) -> LessonContent {
        LessonContent {
            title: "Habitats".into(),
            subject: "Science".into(),
            objectives: vec!["Identify habitats".into()],
            resource_content: Some(ResourceContent {
                description: "Sheet".into(),
                items,
            }),
            ..Default::default()
        }
    }

    fn count_text(doc: &WorksheetDocument, needle: &str) -> usize {
        doc.texts().iter().filter(|t| t.contains(needle)).count()
    }

    #[test]
    fn support_mode_caps_question_rows() {
        let mut item = activity("Questions");
        item.table_questions = (1..=8).map(|i| format!("Q{i}")).collect();
        let lesson = lesson_with(vec![item]);

        let doc = compose_worksheet(&lesson, &NoImages, true);
        let question_table = doc
            .tables()
            .find(|t| t.rows[0].cells[0].plain_text() == "Question")
            .unwrap();
        assert_eq!(question_table.rows.len(), 5);
        assert_eq!(question_table.data_rows().count(), QUESTION_ROWS_SUPPORT);
        assert!(question_table.rows[0].header);

        let doc = compose_worksheet(&lesson, &NoImages, false);
        let question_table = doc
            .tables()
            .find(|t| t.rows[0].cells[0].plain_text() == "Question")
            .unwrap();
        assert_eq!(question_table.data_rows().count(), QUESTION_ROWS);
    }

    #[test]
    fn at_most_three_activities() {
        let lesson = lesson_with((1..=5).map(|i| activity(&format!("Task {i}"))).collect());
        let doc = compose_worksheet(&lesson, &NoImages, false);
        assert_eq!(count_text(&doc, "Activity "), MAX_ACTIVITIES);
        assert_eq!(count_text(&doc, "Task 4"), 0);
    }

    #[test]
    fn passage_block_is_omitted_without_content_text() {
        let mut without = activity("Plain");
        without.table_questions = vec!["Q1".into()];
        let doc = compose_worksheet(&lesson_with(vec![without]), &NoImages, false);
        assert_eq!(count_text(&doc, "Read this carefully"), 0);
        assert_eq!(count_text(&doc, "Complete the table using what you learned:"), 1);

        let mut with = activity("Reading");
        with.content_text = Some("First paragraph.\n\nSecond paragraph.".into());
        with.table_questions = vec!["Q1".into()];
        let doc = compose_worksheet(&lesson_with(vec![with]), &NoImages, false);
        assert_eq!(count_text(&doc, "Read this carefully"), 1);
        assert_eq!(count_text(&doc, "Answer these questions using the text above:"), 1);
        assert_eq!(count_text(&doc, "paragraph."), 2);
    }

    #[test]
    fn unknown_visual_format_still_completes() {
        let mut item = activity("Widget");
        item.visual_format = Some(VisualFormatSpec {
            format_type: "unknownType".into(),
            data: json!({}),
        });
        let doc = compose_worksheet(&lesson_with(vec![item]), &NoImages, false);
        assert_eq!(count_text(&doc, "Challenge Yourself!"), 1);
        assert_eq!(count_text(&doc, "My Reflection"), 1);
    }

    #[test]
    fn gap_fill_is_capped_only_in_support_mode() {
        let mut item = activity("Gaps");
        item.gap_fill_questions = (1..=5).map(|i| format!("Gap {i} ____")).collect();
        let lesson = lesson_with(vec![item]);
        let normal = compose_worksheet(&lesson, &NoImages, false);
        let support = compose_worksheet(&lesson, &NoImages, true);
        assert_eq!(count_text(&normal, "Gap "), 5);
        assert_eq!(count_text(&support, "Gap "), GAP_FILL_SUPPORT);
    }

    #[test]
    fn help_box_only_in_support_mode() {
        let lesson = lesson_with(vec![activity("One"), activity("Two")]);
        assert_eq!(
            count_text(&compose_worksheet(&lesson, &NoImages, false), "Sentence Starters"),
            0
        );
        assert_eq!(
            count_text(&compose_worksheet(&lesson, &NoImages, true), "Sentence Starters"),
            2
        );
    }

    #[test]
    fn later_activities_start_new_pages() {
        let lesson = lesson_with(vec![activity("One"), activity("Two")]);
        let doc = compose_worksheet(&lesson, &NoImages, false);
        let breaks: Vec<bool> = doc
            .blocks
            .iter()
            .filter_map(|b| match b {
                DocumentBlock::Paragraph(p) if p.plain_text().contains("Activity ") => {
                    Some(p.page_break_before)
                }
                _ => None,
            })
            .collect();
        assert_eq!(breaks, vec![false, true]);
    }

    #[test]
    fn objectives_are_rewritten_and_capped() {
        let mut lesson = lesson_with(vec![]);
        lesson.objectives = (1..=6).map(|i| format!("Identify thing {i}")).collect();
        let doc = compose_worksheet(&lesson, &NoImages, false);
        assert_eq!(count_text(&doc, "I can find and name thing"), MAX_WORKSHEET_OBJECTIVES);
        assert_eq!(count_text(&doc, "Tick each box"), 1);
    }

    #[test]
    fn activity_image_resolves_through_map() {
        let mut item = activity("Look");
        item.images = Some(vec![crate::models::lesson::ActivityImage {
            description: "volcano".into(),
            placement: Some("top".into()),
        }]);
        let mut map = ImageMap::new();
        map.insert("volcano".into(), "/tmp/v.png".into());
        let doc = compose_worksheet(&lesson_with(vec![item]), &map, false);
        assert_eq!(
            doc.blocks
                .iter()
                .filter(|b| matches!(b, DocumentBlock::Image(_)))
                .count(),
            1
        );
    }

    #[test]
    fn furniture_uses_theme_icon_and_title() {
        let doc = compose_worksheet(&LessonContent::default(), &NoImages, false);
        assert_eq!(doc.title, "Lesson Resources");
        assert_eq!(doc.header_text, "📖 Lesson Resources");
        assert_eq!(count_text(&doc, "My Reflection"), 1);
    }

    #[test]
    fn write_worksheet_produces_a_document() {
        struct NoFiles;
        impl ImageLoader for NoFiles {
            fn load(
                &self,
                source: &crate::models::image::ImageRef,
            ) -> Result<crate::images::LoadedImage> {
                Err(crate::errors::RenderError::Image(format!("missing {source}")))
            }
        }

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sheet.docx");
        let lesson = lesson_with(vec![activity("Sorting")]);
        write_worksheet(&lesson, &NoImages, &NoFiles, false, &RenderConfig::default(), &path)
            .unwrap();

        let bytes = std::fs::read(&path).unwrap();
        let body = crate::converters::ooxml::tests::read_part(&bytes, "word/document.xml");
        assert!(body.contains("Activity 1: Sorting"));
    }

    #[test]
    fn control_characters_are_cleaned_from_the_document() {
        let mut item = activity("Echo\u{C}es");
        item.content_text = Some("Sound\u{B}waves\u{1}".into());
        let mut lesson = lesson_with(vec![item]);
        lesson.title = "Sound\u{0}".into();

        let bytes = render_worksheet(
            &lesson,
            &NoImages,
            &crate::images::ImageStore::default(),
            false,
            &RenderConfig::default(),
        )
        .unwrap();
        for name in ["word/document.xml", "word/header1.xml", "docProps/core.xml"] {
            let part = crate::converters::ooxml::tests::read_part(&bytes, name);
            assert!(
                !part.chars().any(|c| c < ' ' && !matches!(c, '\t' | '\n' | '\r')),
                "control character left in {name}"
            );
        }
        let body = crate::converters::ooxml::tests::read_part(&bytes, "word/document.xml");
        assert!(body.contains("Sound waves"));
        assert!(body.contains("Echo es"));
    }
}

