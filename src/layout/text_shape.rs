//! Classification of free slide text into bullets or paragraphs.
//!
//! Precedence is fixed. A list marker on any line makes the whole body a list.
//! Only when no marker is present is a single overlong line split into sentences.
//! Everything else stays as plain paragraphs.

/// A single unstructured line longer than this (in characters) is split into
/// one bullet per sentence.
pub const LONG_LINE_THRESHOLD: usize = 100;

/// Average glyph width as a fraction of the font size, used to estimate wrapping.
const GLYPH_WIDTH_EM: f64 = 0.5;

/// Markers stripped from the start of list lines.
const LIST_MARKERS: [char; 4] = ['-', '•', '*', '–'];

/// The shape of a slide body after classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BodyText {
    /// Nothing to render.
    Empty,
    /// One entry per bullet row.
    Bullets(Vec<String>),
    /// Non-blank lines rendered as a single text block.
    Paragraphs(Vec<String>),
}

/// Splits slide content into bullets or paragraphs.
///
/// # Arguments
///
/// * `content` - Free text as produced for a slide, one item per line or prose.
///
/// # Returns
///
/// [`BodyText::Bullets`] when any line carries a list marker (`-`, `•`, `*`, `–`,
/// or an ordinal such as `1.`) or when the body is one line longer than
/// [`LONG_LINE_THRESHOLD`]. Symbol markers are stripped; ordinals are kept.
pub fn classify_body_text(content: &str) -> BodyText {
    let lines: Vec<&str> = content
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();
    if lines.is_empty() {
        return BodyText::Empty;
    }

    if lines.iter().any(|l| is_list_line(l)) {
        let bullets: Vec<String> = lines
            .iter()
            .map(|l| strip_marker(l))
            .filter(|l| !l.is_empty())
            .map(str::to_string)
            .collect();
        return if bullets.is_empty() {
            BodyText::Empty
        } else {
            BodyText::Bullets(bullets)
        };
    }

    if let [line] = lines.as_slice() {
        if line.chars().count() > LONG_LINE_THRESHOLD {
            return BodyText::Bullets(split_sentences(line));
        }
    }

    BodyText::Paragraphs(lines.into_iter().map(str::to_string).collect())
}

fn is_list_line(line: &str) -> bool {
    line.starts_with(LIST_MARKERS) || starts_with_ordinal(line)
}

/// True for a leading ordinal marker such as `"12."` or `"3)"`.
/// The marker must be followed by whitespace or end the line, so `"1.5 m"` is not one.
fn starts_with_ordinal(line: &str) -> bool {
    let digits = line.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return false;
    }
    let mut rest = line[digits..].chars();
    match (rest.next(), rest.next()) {
        (Some('.' | ')'), None) => true,
        (Some('.' | ')'), Some(c)) => c.is_whitespace(),
        _ => false,
    }
}

fn strip_marker(line: &str) -> &str {
    match line.strip_prefix(LIST_MARKERS) {
        Some(rest) => rest.trim_start(),
        None => line,
    }
}

/// Splits prose into sentences at `.`, `!` or `?` followed by whitespace.
/// Terminal punctuation stays with its sentence.
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();
    while let Some((idx, c)) = chars.next() {
        if !matches!(c, '.' | '!' | '?') {
            continue;
        }
        let end = idx + c.len_utf8();
        if chars.peek().map_or(false, |(_, next)| next.is_whitespace()) {
            let sentence = text[start..end].trim();
            if !sentence.is_empty() {
                sentences.push(sentence.to_string());
            }
            start = end;
        }
    }
    let tail = text[start..].trim();
    if !tail.is_empty() {
        sentences.push(tail.to_string());
    }
    sentences
}

/// Estimates how many lines `text` wraps to in a box `width_in` inches wide.
/// Always at least one.
pub fn estimate_wrapped_lines(text: &str, width_in: f64, font_size_pt: f64) -> usize {
    let per_line = chars_per_line(width_in, font_size_pt);
    text.chars().count().div_ceil(per_line).max(1)
}

/// Characters that fit on one line of a box `width_in` inches wide. At least one.
pub fn chars_per_line(width_in: f64, font_size_pt: f64) -> usize {
    let glyph_in = font_size_pt * GLYPH_WIDTH_EM / 72.0;
    if glyph_in <= 0.0 || width_in <= 0.0 {
        return 1;
    }
    ((width_in / glyph_in).floor() as usize).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn dash_and_bullet_lines_become_bullets() {
        assert_eq!(
            classify_body_text("- Roots\n• Stem\n\n* Leaves"),
            BodyText::Bullets(vec!["Roots".into(), "Stem".into(), "Leaves".into()])
        );
    }

    #[test]
    fn one_marker_turns_every_line_into_a_bullet() {
        assert_eq!(
            classify_body_text("Think about:\n- shelter"),
            BodyText::Bullets(vec!["Think about:".into(), "shelter".into()])
        );
    }

    #[test]
    fn ordinals_are_list_markers_and_kept() {
        assert_eq!(
            classify_body_text("1. Read\n2) Write"),
            BodyText::Bullets(vec!["1. Read".into(), "2) Write".into()])
        );
        assert_eq!(
            classify_body_text("1.5 metres"),
            BodyText::Paragraphs(vec!["1.5 metres".into()])
        );
    }

    #[test]
    fn long_single_line_is_split_into_sentences() {
        let text = "A habitat is the natural home of an animal. It gives shelter and food! \
                    Can you name a habitat near your school? Think about woods and ponds";
        assert!(text.len() > LONG_LINE_THRESHOLD);
        assert_eq!(
            classify_body_text(text),
            BodyText::Bullets(vec![
                "A habitat is the natural home of an animal.".into(),
                "It gives shelter and food!".into(),
                "Can you name a habitat near your school?".into(),
                "Think about woods and ponds".into(),
            ])
        );
    }

    #[test]
    fn list_markers_take_precedence_over_length() {
        let long = format!("- {}. Second sentence.", "word ".repeat(30));
        match classify_body_text(&long) {
            BodyText::Bullets(b) => assert_eq!(b.len(), 1),
            other => panic!("expected bullets, got {other:?}"),
        }
    }

    #[test]
    fn short_prose_stays_as_paragraphs() {
        assert_eq!(
            classify_body_text("What is a habitat?"),
            BodyText::Paragraphs(vec!["What is a habitat?".into()])
        );
        assert_eq!(classify_body_text("  \n \n"), BodyText::Empty);
        assert_eq!(classify_body_text("-\n•"), BodyText::Empty);
    }

    #[test]
    fn decimals_do_not_split_sentences() {
        assert_eq!(
            split_sentences("Pi is 3.14 roughly. Yes."),
            vec!["Pi is 3.14 roughly.", "Yes."]
        );
    }

    #[test]
    fn wrapped_line_estimate() {
        // 28pt glyph is about 0.194in, so 4.25in holds 21 characters.
        assert_eq!(estimate_wrapped_lines("short", 4.25, 28.0), 1);
        assert_eq!(estimate_wrapped_lines(&"x".repeat(43), 4.25, 28.0), 3);
        assert_eq!(estimate_wrapped_lines("", 4.25, 28.0), 1);
    }
}
