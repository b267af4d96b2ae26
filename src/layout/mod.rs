//! The slide layout engine: turns one lesson slide into a fully positioned page.
//!
//! All geometry is in inches on the 10 x 7.5 page. Content pages share a header
//! band coloured by slide type, a body region whose width depends on whether any
//! images were resolved, and an optional teacher-note band along the bottom.

pub mod slide_types;
pub mod text_shape;

use log::debug;

use crate::models::colors::{palette, RgbColor, SolidFill};
use crate::models::common::Frame;
use crate::models::elements::PageElement;
use crate::models::image::{Image, ImageRef};
use crate::models::lesson::{SlideSpec, SlideType};
use crate::models::page::{DeckPage, ImageArrangement, Layout, PageKind};
use crate::models::presentation::PAGE_SIZE;
use crate::models::shape::{Shape, ShapeType};
use crate::models::text::{Alignment, TextContent, TextParagraph, TextRun, TextStyle, VerticalAlign};
use crate::themes::Theme;

use self::text_shape::{classify_body_text, estimate_wrapped_lines, BodyText};

pub use self::slide_types::{differentiation_page, objectives_page, resources_page, title_page};
pub use self::text_shape::LONG_LINE_THRESHOLD;

// --- Geometry ---

const HEADER_BAND: Frame = Frame::new(0.0, 0.0, PAGE_SIZE.width, 0.8);
const HEADER_ICON: Frame = Frame::new(0.2, 0.1, 0.6, 0.6);
const HEADER_LABEL: Frame = Frame::new(0.9, 0.1, 4.0, 0.6);
const TITLE: Frame = Frame::new(0.5, 1.0, 9.0, 0.6);
const TITLE_UNDERLINE: Frame = Frame::new(0.5, 1.6, 2.0, 0.05);

/// Body region of the single-column layout.
pub const STANDARD_BODY: Frame = Frame::new(0.7, 1.8, 8.6, 4.5);
/// Body region of the image-right layout.
pub const IMAGE_RIGHT_BODY: Frame = Frame::new(0.5, 1.8, 4.5, 4.5);
/// Column the images are tiled into.
pub const IMAGE_COLUMN: Frame = Frame::new(5.2, 1.8, 4.5, 4.0);
/// Gap between tiled images.
pub const IMAGE_GAP: f64 = 0.2;

const STANDARD_BODY_PT: f64 = 28.0;
const IMAGE_RIGHT_BODY_PT: f64 = 24.0;

/// Vertical advance of one bullet row per wrapped line.
const BULLET_PITCH: f64 = 0.6;
const BULLET_DOT: f64 = 0.1;
const BULLET_INDENT: f64 = 0.25;

const NOTE_BAND: Frame = Frame::new(0.0, 6.8, PAGE_SIZE.width, 0.7);
const NOTE_TEXT: Frame = Frame::new(0.2, 6.8, 9.6, 0.7);
const NOTE_BAND_ALPHA: f64 = 0.2;

// --- Slide type styling ---

/// Header styling of a content page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderStyle {
    pub color: RgbColor,
    pub label: &'static str,
    pub icon: &'static str,
}

/// Header colour, label and icon for a slide type.
/// Unrecognised types get the generic "LESSON" styling in the theme's primary colour.
pub fn header_style(slide_type: &SlideType, theme: &Theme) -> HeaderStyle {
    let colors = &theme.colors;
    let (color, label, icon) = match slide_type {
        SlideType::Starter => (colors.secondary, "STARTER", "🤔"),
        SlideType::Main => (colors.primary, "MAIN ACTIVITY", "📚"),
        SlideType::Activity => (colors.accent, "ACTIVITY", "⚡"),
        SlideType::Assessment => (palette::WARNING, "ASSESSMENT", "❓"),
        SlideType::Plenary => (palette::PURPLE, "PLENARY", "🎓"),
        SlideType::Other(raw) => {
            debug!("Unrecognised slide type '{}', using lesson styling", raw);
            (colors.primary, "LESSON", "📄")
        }
    };
    HeaderStyle { color, label, icon }
}

// --- Element helpers ---

/// Hands out object IDs that are unique within a page, and so within the deck
/// because every page ID is unique.
pub(crate) struct ElementIds {
    page_id: String,
    next: usize,
}

impl ElementIds {
    pub(crate) fn new(page_id: &str) -> Self {
        Self {
            page_id: page_id.to_string(),
            next: 0,
        }
    }

    pub(crate) fn next(&mut self, role: &str) -> String {
        self.next += 1;
        format!("{}_{}{}", self.page_id, role, self.next)
    }
}

pub(crate) fn text_element(ids: &mut ElementIds, frame: Frame, text: TextContent) -> PageElement {
    PageElement::shape(ids.next("text"), frame, Shape::text_box(text))
}

pub(crate) fn rect_element(ids: &mut ElementIds, frame: Frame, fill: SolidFill) -> PageElement {
    PageElement::shape(ids.next("rect"), frame, Shape::filled(ShapeType::Rectangle, fill))
}

/// Frames of the tiled images for `count` images, in image order.
///
/// # Arguments
///
/// * `count` - Number of images; anything above four is laid out as four.
///
/// # Returns
///
/// One frame per image, all inside [`IMAGE_COLUMN`]. Empty for zero images.
pub fn image_frames(count: usize) -> Vec<Frame> {
    let col = IMAGE_COLUMN;
    match ImageArrangement::for_count(count) {
        None => Vec::new(),
        Some(ImageArrangement::Single) => vec![col],
        Some(ImageArrangement::Stacked) => {
            let h = (col.h - IMAGE_GAP) / 2.0;
            vec![
                Frame::new(col.x, col.y, col.w, h),
                Frame::new(col.x, col.y + h + IMAGE_GAP, col.w, h),
            ]
        }
        Some(ImageArrangement::Grid) => {
            let w = (col.w - IMAGE_GAP) / 2.0;
            let h = (col.h - IMAGE_GAP) / 2.0;
            let right = col.x + w + IMAGE_GAP;
            let lower = col.y + h + IMAGE_GAP;
            [
                Frame::new(col.x, col.y, w, h),
                Frame::new(right, col.y, w, h),
                Frame::new(col.x, lower, w, h),
                Frame::new(right, lower, w, h),
            ]
            .into_iter()
            .take(count.min(4))
            .collect()
        }
    }
}

// --- Content pages ---

/// Renders one lesson slide into a positioned deck page.
///
/// # Arguments
///
/// * `slide` - The slide as produced for the lesson.
/// * `theme` - The lesson's resolved subject theme.
/// * `images` - Already resolved images, in display order. Only the first four are used.
/// * `index` - Zero-based position of the slide in the lesson.
/// * `font_face` - Font family applied to all text.
///
/// # Returns
///
/// A [`DeckPage`] with [`Layout::Standard`] when `images` is empty and
/// [`Layout::ImageRight`] otherwise. The title is always present.
pub fn render_slide(
    slide: &SlideSpec,
    theme: &Theme,
    images: &[ImageRef],
    index: usize,
    font_face: &str,
) -> DeckPage {
    let page_id = format!("slide_{}", index + 1);
    let mut ids = ElementIds::new(&page_id);
    let style = header_style(&slide.slide_type, theme);
    let images = &images[..images.len().min(crate::images::MAX_SLIDE_IMAGES)];

    let layout = match ImageArrangement::for_count(images.len()) {
        None => Layout::Standard,
        Some(arrangement) => Layout::ImageRight { arrangement },
    };

    let mut elements = header_elements(&mut ids, slide, &style, theme, index, font_face);

    let (body, font_pt) = match layout {
        Layout::Standard => (STANDARD_BODY, STANDARD_BODY_PT),
        Layout::ImageRight { .. } => (IMAGE_RIGHT_BODY, IMAGE_RIGHT_BODY_PT),
    };
    let body_style = TextStyle::sized(font_pt)
        .color(theme.colors.text)
        .font(font_face);
    elements.extend(body_elements(&mut ids, &slide.content, body, body_style, theme));

    for (image, frame) in images.iter().zip(image_frames(images.len())) {
        elements.push(PageElement::image(
            ids.next("image"),
            frame,
            Image {
                source: image.clone(),
                description: image.file_name(),
            },
        ));
    }

    let notes = slide.notes().map(str::to_string);
    if let Some(note) = &notes {
        elements.extend(note_elements(&mut ids, note, theme, font_face));
    }

    DeckPage {
        object_id: page_id,
        page_kind: PageKind::Content {
            slide_index: index,
            slide_type: slide.slide_type.clone(),
            layout,
        },
        background: theme.colors.background,
        page_elements: elements,
        notes,
    }
}

fn header_elements(
    ids: &mut ElementIds,
    slide: &SlideSpec,
    style: &HeaderStyle,
    theme: &Theme,
    index: usize,
    font_face: &str,
) -> Vec<PageElement> {
    let title = match slide.title.trim() {
        "" => format!("Slide {}", index + 1),
        t => t.to_string(),
    };
    vec![
        rect_element(ids, HEADER_BAND, SolidFill::opaque(style.color)),
        text_element(
            ids,
            HEADER_ICON,
            TextContent::single(style.icon, TextStyle::sized(32.0), Alignment::Center)
                .anchored(VerticalAlign::Middle),
        ),
        text_element(
            ids,
            HEADER_LABEL,
            TextContent::single(
                style.label,
                TextStyle::sized(18.0)
                    .bold()
                    .color(theme.colors.white)
                    .font(font_face),
                Alignment::Start,
            )
            .anchored(VerticalAlign::Middle),
        ),
        text_element(
            ids,
            TITLE,
            TextContent::single(
                title,
                TextStyle::sized(40.0)
                    .bold()
                    .color(theme.colors.text)
                    .font(font_face),
                Alignment::Start,
            ),
        ),
        rect_element(ids, TITLE_UNDERLINE, SolidFill::opaque(style.color)),
    ]
}

/// Lays out the slide body inside `region`.
///
/// Bullets get one dot and one text box per row; each row advances by
/// [`BULLET_PITCH`] per estimated wrapped line. Paragraphs share one text box.
fn body_elements(
    ids: &mut ElementIds,
    content: &str,
    region: Frame,
    style: TextStyle,
    theme: &Theme,
) -> Vec<PageElement> {
    match classify_body_text(content) {
        BodyText::Empty => Vec::new(),
        BodyText::Paragraphs(lines) => {
            let paragraphs = lines
                .into_iter()
                .map(|line| TextParagraph::single(TextRun::new(line, style.clone())))
                .collect();
            vec![text_element(ids, region, TextContent::new(paragraphs))]
        }
        BodyText::Bullets(bullets) => {
            let text_w = region.w - BULLET_INDENT;
            let font_pt = style.font_size_pt.unwrap_or(STANDARD_BODY_PT);
            let mut elements = Vec::with_capacity(bullets.len() * 2);
            let mut y = region.y;
            for bullet in bullets {
                let lines = estimate_wrapped_lines(&bullet, text_w, font_pt) as f64;
                elements.push(PageElement::shape(
                    ids.next("dot"),
                    Frame::new(region.x, y + 0.15, BULLET_DOT, BULLET_DOT),
                    Shape::filled(ShapeType::Ellipse, SolidFill::opaque(theme.colors.primary)),
                ));
                elements.push(text_element(
                    ids,
                    Frame::new(
                        region.x + BULLET_INDENT,
                        y,
                        text_w,
                        BULLET_PITCH * lines - 0.1,
                    ),
                    TextContent::single(bullet, style.clone(), Alignment::Start),
                ));
                y += BULLET_PITCH * lines;
            }
            if y > region.bottom() {
                debug!("Bullets overflow the body region by {:.2}in", y - region.bottom());
            }
            elements
        }
    }
}

fn note_elements(
    ids: &mut ElementIds,
    note: &str,
    theme: &Theme,
    font_face: &str,
) -> Vec<PageElement> {
    vec![
        rect_element(
            ids,
            NOTE_BAND,
            SolidFill::translucent(palette::NOTE_BAND, NOTE_BAND_ALPHA),
        ),
        text_element(
            ids,
            NOTE_TEXT,
            TextContent::single(
                format!("Teacher Note: {note}"),
                TextStyle::sized(14.0)
                    .italic()
                    .color(theme.colors.text_light)
                    .font(font_face),
                Alignment::Start,
            )
            .anchored(VerticalAlign::Middle),
        ),
    ]
}
