//! The closing "Challenge Yourself!" and reflection sections of the worksheet.

use crate::models::colors::palette;
use crate::models::document::{
    DocParagraph, DocTable, DocTableCell, DocTableRow, DocumentBlock, HeadingLevel,
};
use crate::models::lesson::LessonContent;
use crate::models::text::TextStyle;
use crate::themes::{icons, Theme};

/// Challenge prompts used from the first activity, at most.
pub const CHALLENGE_PROMPTS: usize = 4;
pub const CHALLENGE_PROMPTS_SUPPORT: usize = 3;
/// Blank answer lines under each prompt.
pub const ANSWER_LINES: usize = 3;
pub const ANSWER_LINES_SUPPORT: usize = 4;

const ANSWER_LINE: &str =
    "_________________________________________________________________________";

const FALLBACK_PROMPTS: [&str; CHALLENGE_PROMPTS] = [
    "Explain what you learned today and why it's important.",
    "How does this connect to something else you've learned?",
    "Can you think of a real-life example where you might use this?",
    "What question would you ask someone who wants to learn about this topic?",
];

const FALLBACK_PROMPTS_SUPPORT: [&str; CHALLENGE_PROMPTS_SUPPORT] = [
    "Explain what you learned today in your own words.",
    "Draw a picture or diagram to show what you learned.",
    "Write one question you still have about this topic.",
];

const REFLECTION_PROMPTS: [&str; 3] = [
    "😊 What did I do well?",
    "🤔 What did I find tricky?",
    "🎯 My next step:",
];

/// The open-ended prompts for the challenge section.
///
/// Taken from the first activity's open questions when it has any, otherwise from
/// the fixed fallback set. Capped by mode either way.
pub fn challenge_prompts(lesson: &LessonContent, support_mode: bool) -> Vec<String> {
    let cap = if support_mode {
        CHALLENGE_PROMPTS_SUPPORT
    } else {
        CHALLENGE_PROMPTS
    };

    let from_activity: Vec<String> = lesson
        .activities()
        .first()
        .map(|a| {
            a.open_questions
                .iter()
                .map(|q| q.trim())
                .filter(|q| !q.is_empty())
                .take(cap)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();
    if !from_activity.is_empty() {
        return from_activity;
    }

    let fallback: &[&str] = if support_mode {
        &FALLBACK_PROMPTS_SUPPORT
    } else {
        &FALLBACK_PROMPTS
    };
    fallback.iter().map(|p| p.to_string()).collect()
}

/// Heading, "Can you:" line, then each prompt with its blank answer lines.
pub(crate) fn challenge_section(lesson: &LessonContent, support_mode: bool) -> Vec<DocumentBlock> {
    let mut blocks = vec![
        DocumentBlock::Paragraph(
            DocParagraph::text(
                format!("{} Challenge Yourself!", icons::CHALLENGE),
                TextStyle::sized(16.0).bold().color(palette::CHALLENGE_RED),
            )
            .heading(HeadingLevel::Heading1)
            .spacing(400, 200),
        ),
        DocumentBlock::Paragraph(
            DocParagraph::text("Can you:", TextStyle::sized(11.0).bold()).spacing(0, 150),
        ),
    ];

    let lines = if support_mode {
        ANSWER_LINES_SUPPORT
    } else {
        ANSWER_LINES
    };
    for prompt in challenge_prompts(lesson, support_mode) {
        blocks.push(DocumentBlock::Paragraph(
            DocParagraph::text(format!("• {prompt}"), TextStyle::sized(11.0)).spacing(0, 100),
        ));
        for i in 0..lines {
            let after = if i + 1 == lines { 250 } else { 50 };
            blocks.push(DocumentBlock::Paragraph(
                DocParagraph::text(ANSWER_LINE, TextStyle::default()).spacing(0, after),
            ));
        }
    }
    blocks
}

/// The fixed three-row reflection table. Always present.
pub(crate) fn reflection_section(theme: &Theme) -> Vec<DocumentBlock> {
    let rows = REFLECTION_PROMPTS
        .iter()
        .map(|prompt| {
            DocTableRow::new(vec![DocTableCell {
                paragraphs: vec![
                    DocParagraph::text(*prompt, TextStyle::default().bold()).spacing(0, 100),
                    DocParagraph::blank().spacing(0, 800),
                ],
                shading: None,
            }])
        })
        .collect();

    vec![
        DocumentBlock::Paragraph(
            DocParagraph::text(
                format!("{} My Reflection", icons::THINKING),
                TextStyle::sized(14.0).bold().color(theme.colors.primary),
            )
            .heading(HeadingLevel::Heading1)
            .spacing(400, 200),
        ),
        DocumentBlock::Table(DocTable::new(rows)),
    ]
}
