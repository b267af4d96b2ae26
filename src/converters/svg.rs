//! Renders assembled deck pages to SVG for quick previews.
//!
//! Coordinates are in points (1in = 72pt). Text is wrapped with the same
//! glyph-width estimate the layout engine uses, so previews match the spacing of
//! the packaged deck closely but not exactly. Images are referenced by URL or
//! path, never embedded.

use log::debug;
use std::fmt::Write;

use crate::converters::ooxml::xml_safe;
use crate::errors::Result;
use crate::layout::text_shape::chars_per_line;
use crate::models::{
    colors::SolidFill,
    common::{Frame, PT_PER_INCH},
    elements::{PageElement, PageElementKind},
    image::{Image, ImageRef},
    page::DeckPage,
    presentation::DeckPresentation,
    shape::{Shape, ShapeType},
    text::{Alignment, TextContent, TextStyle, VerticalAlign},
};

// --- Constants & Defaults ---

const DEFAULT_FONT_SIZE_PT: f64 = 11.0;
const DEFAULT_FONT_FAMILY: &str = "Arial";
const DEFAULT_TEXT_COLOR: &str = "#000000";
const LINE_HEIGHT: f64 = 1.2;
/// Corner radius of rounded rectangles, as a fraction of the shorter side.
const ROUND_RECT_RADIUS: f64 = 0.1667;

// --- Helper Functions ---

/// Escapes special XML characters for SVG text and attribute values. Control
/// characters XML cannot hold become spaces.
fn escape_svg_text(text: &str) -> String {
    xml_safe(text)
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn pt(inches: f64) -> f64 {
    (inches * PT_PER_INCH * 100.0).round() / 100.0
}

fn fill_attrs(fill: Option<&SolidFill>) -> String {
    match fill {
        Some(fill) if fill.alpha < 1.0 => format!(
            r#"fill="{}" fill-opacity="{}""#,
            fill.color.to_css(),
            fill.alpha
        ),
        Some(fill) => format!(r#"fill="{}""#, fill.color.to_css()),
        None => r#"fill="none""#.to_string(),
    }
}

/// Greedy word wrap to at most `max_chars` per line. Words longer than a line
/// are kept whole.
fn wrap_words(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for source_line in text.split('\n') {
        let mut current = String::new();
        for word in source_line.split_whitespace() {
            let needed = if current.is_empty() {
                word.chars().count()
            } else {
                current.chars().count() + 1 + word.chars().count()
            };
            if needed > max_chars && !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
        }
        lines.push(current);
    }
    lines
}

fn text_style_attr(style: &TextStyle) -> String {
    let mut attr = format!(
        "font-family:'{}'; font-size:{}pt; fill:{};",
        style.font_family.as_deref().unwrap_or(DEFAULT_FONT_FAMILY),
        style.font_size_pt.unwrap_or(DEFAULT_FONT_SIZE_PT),
        style
            .color
            .map(|c| c.to_css())
            .unwrap_or_else(|| DEFAULT_TEXT_COLOR.to_string())
    );
    if style.bold {
        attr.push_str(" font-weight:bold;");
    }
    if style.italic {
        attr.push_str(" font-style:italic;");
    }
    attr
}

// --- Conversion Functions ---

/// Writes the text of a shape as one `<text>` per wrapped line.
fn convert_text_content_to_svg(
    text: &TextContent,
    frame: &Frame,
    svg_output: &mut String,
) -> Result<()> {
    struct Line<'a> {
        content: String,
        style: &'a TextStyle,
        alignment: Alignment,
        size_pt: f64,
    }

    let mut lines = Vec::new();
    for paragraph in &text.paragraphs {
        // Styling comes from the first run; runs are concatenated.
        let Some(first) = paragraph.runs.first() else {
            continue;
        };
        let size_pt = first.style.font_size_pt.unwrap_or(DEFAULT_FONT_SIZE_PT);
        let max_chars = chars_per_line(frame.w, size_pt);
        for content in wrap_words(&paragraph.plain_text(), max_chars) {
            lines.push(Line {
                content,
                style: &first.style,
                alignment: paragraph.alignment,
                size_pt,
            });
        }
    }
    if lines.is_empty() {
        return Ok(());
    }

    let block_height: f64 = lines.iter().map(|l| l.size_pt * LINE_HEIGHT).sum();
    let frame_top = pt(frame.y);
    let frame_height = pt(frame.h);
    let mut y = match text.vertical_align {
        VerticalAlign::Top => frame_top,
        VerticalAlign::Middle => frame_top + (frame_height - block_height).max(0.0) / 2.0,
        VerticalAlign::Bottom => frame_top + (frame_height - block_height).max(0.0),
    };

    for line in lines {
        y += line.size_pt;
        let (x, anchor) = match line.alignment {
            Alignment::Start => (pt(frame.x), "start"),
            Alignment::Center => (pt(frame.x + frame.w / 2.0), "middle"),
            Alignment::End => (pt(frame.right()), "end"),
        };
        if !line.content.is_empty() {
            writeln!(
                svg_output,
                r#"  <text x="{}" y="{:.2}" text-anchor="{}" style="{}">{}</text>"#,
                x,
                y,
                anchor,
                text_style_attr(line.style),
                escape_svg_text(&line.content)
            )?;
        }
        y += line.size_pt * (LINE_HEIGHT - 1.0);
    }
    Ok(())
}

fn convert_shape_to_svg(shape: &Shape, frame: &Frame, svg_output: &mut String) -> Result<()> {
    let (x, y, w, h) = (pt(frame.x), pt(frame.y), pt(frame.w), pt(frame.h));
    let fill = fill_attrs(shape.fill.as_ref());
    let stroke = match &shape.outline {
        Some(outline) => format!(
            r#" stroke="{}" stroke-width="{}""#,
            outline.color.to_css(),
            outline.weight_pt
        ),
        None => String::new(),
    };

    match shape.shape_type {
        ShapeType::TextBox => {
            if shape.fill.is_some() || shape.outline.is_some() {
                writeln!(
                    svg_output,
                    r#"  <rect x="{x}" y="{y}" width="{w}" height="{h}" {fill}{stroke}/>"#
                )?;
            }
        }
        ShapeType::Rectangle => writeln!(
            svg_output,
            r#"  <rect x="{x}" y="{y}" width="{w}" height="{h}" {fill}{stroke}/>"#
        )?,
        ShapeType::RoundRectangle => {
            let r = (w.min(h) * ROUND_RECT_RADIUS * 100.0).round() / 100.0;
            writeln!(
                svg_output,
                r#"  <rect x="{x}" y="{y}" width="{w}" height="{h}" rx="{r}" ry="{r}" {fill}{stroke}/>"#
            )?
        }
        ShapeType::Ellipse => {
            let (cx, cy) = (x + w / 2.0, y + h / 2.0);
            let (rx, ry) = (w / 2.0, h / 2.0);
            writeln!(
                svg_output,
                r#"  <ellipse cx="{cx}" cy="{cy}" rx="{rx}" ry="{ry}" {fill}{stroke}/>"#
            )?
        }
    }

    if let Some(text) = &shape.text {
        convert_text_content_to_svg(text, frame, svg_output)?;
    }
    Ok(())
}

fn image_href(source: &ImageRef) -> String {
    match source {
        ImageRef::Inline(data_url) => data_url.clone(),
        other => other.to_string(),
    }
}

fn convert_image_to_svg(image: &Image, frame: &Frame, svg_output: &mut String) -> Result<()> {
    writeln!(
        svg_output,
        r#"  <image x="{}" y="{}" width="{}" height="{}" href="{}" preserveAspectRatio="xMidYMid meet"><title>{}</title></image>"#,
        pt(frame.x),
        pt(frame.y),
        pt(frame.w),
        pt(frame.h),
        escape_svg_text(&image_href(&image.source)),
        escape_svg_text(&image.description)
    )?;
    Ok(())
}

fn convert_page_element_to_svg(element: &PageElement, svg_output: &mut String) -> Result<()> {
    match &element.element_kind {
        PageElementKind::Shape(shape) => convert_shape_to_svg(shape, &element.frame, svg_output),
        PageElementKind::Image(image) => convert_image_to_svg(image, &element.frame, svg_output),
    }
}

/// Converts one page into a standalone SVG document.
pub fn convert_page_to_svg(page: &DeckPage, page_size: (f64, f64)) -> Result<String> {
    let (width, height) = (pt(page_size.0), pt(page_size.1));
    let mut svg_string = String::new();

    writeln!(
        svg_string,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{0}pt" height="{1}pt" viewBox="0 0 {0} {1}">"#,
        width, height
    )?;
    writeln!(
        svg_string,
        r#"  <rect width="100%" height="100%" fill="{}"/>"#,
        page.background.to_css()
    )?;

    // Elements are already in paint order.
    for element in &page.page_elements {
        writeln!(svg_string, "  <!-- {} -->", element.object_id)?;
        convert_page_element_to_svg(element, &mut svg_string)?;
    }

    writeln!(svg_string, "</svg>")?;
    Ok(svg_string)
}

/// Converts every page of a deck into an SVG string, in deck order.
///
/// # Arguments
/// * `deck` - The assembled deck.
///
/// # Returns
/// One SVG document per page.
pub fn convert_deck_to_svg(deck: &DeckPresentation) -> Result<Vec<String>> {
    let size = (deck.page_size.width, deck.page_size.height);
    let pages = deck
        .slides
        .iter()
        .map(|page| convert_page_to_svg(page, size))
        .collect::<Result<Vec<_>>>()?;
    debug!("Rendered {} SVG previews for '{}'", pages.len(), deck.title);
    Ok(pages)
}

// --- Tests ---

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::render_slide;
    use crate::models::lesson::SlideSpec;
    use crate::models::presentation::PAGE_SIZE;
    use crate::themes::resolve_theme;
    use pretty_assertions::assert_eq;

    #[test]
    fn escaping_removes_control_characters() {
        assert_eq!(escape_svg_text("Fish\u{1}& <Chips>"), "Fish &amp; &lt;Chips&gt;");
    }

    #[test]
    fn wraps_on_word_boundaries() {
        assert_eq!(
            wrap_words("the quick brown fox", 10),
            vec!["the quick", "brown fox"]
        );
        assert_eq!(wrap_words("a\nb", 10), vec!["a", "b"]);
        assert_eq!(wrap_words("extraordinarily", 5), vec!["extraordinarily"]);
    }

    #[test]
    fn page_has_background_and_escaped_text() {
        let slide = SlideSpec {
            title: "Cats & Dogs".into(),
            content: "- Pets\n- Care".into(),
            ..Default::default()
        };
        let theme = resolve_theme("science");
        let page = render_slide(
            &slide,
            theme,
            &[ImageRef::parse("https://img.example/cat.png?size=large")],
            0,
            "Arial",
        );
        let deck = DeckPresentation {
            title: "Pets".into(),
            subject: "science".into(),
            theme_name: theme.name.into(),
            page_size: PAGE_SIZE,
            slides: vec![page],
        };

        let svgs = convert_deck_to_svg(&deck).unwrap();
        assert_eq!(svgs.len(), 1);
        let svg = &svgs[0];
        assert!(svg.starts_with("<svg"));
        assert!(svg.contains(r#"width="720pt" height="540pt""#));
        assert!(svg.contains(&format!(r#"fill="{}""#, theme.colors.background.to_css())));
        assert!(svg.contains("Cats &amp; Dogs"));
        assert!(svg.contains("<ellipse"));
        assert!(svg.contains(r#"href="https://img.example/cat.png?size=large""#));
    }

    #[test]
    fn translucent_fill_sets_opacity() {
        let fill = SolidFill::translucent(crate::models::colors::palette::NOTE_BAND, 0.2);
        assert_eq!(fill_attrs(Some(&fill)), r##"fill="#9e9e9e" fill-opacity="0.2""##);
        assert_eq!(fill_attrs(None), r#"fill="none""#);
    }
}
