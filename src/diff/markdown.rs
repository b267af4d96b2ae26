use similar::{ChangeTag, TextDiff};
use std::fmt::Write;

/// Line counts and unified diff of two texts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextChanges {
    pub lines_added: usize,
    pub lines_removed: usize,
    /// Unified diff with `---`/`+++` headers. Empty when the texts are equal.
    pub unified: String,
}

impl TextChanges {
    pub fn is_empty(&self) -> bool {
        self.lines_added == 0 && self.lines_removed == 0
    }
}

/// Diffs two texts line by line.
///
/// # Arguments
/// * `base_text` - The original text.
/// * `changed_text` - The revised text.
/// * `base_filename` - Name used in the `---` header, e.g. `"a/deck.md"`.
/// * `changed_filename` - Name used in the `+++` header.
pub fn diff_lines(
    base_text: &str,
    changed_text: &str,
    base_filename: &str,
    changed_filename: &str,
) -> TextChanges {
    let diff = TextDiff::from_lines(base_text, changed_text);

    let mut lines_added = 0;
    let mut lines_removed = 0;
    for change in diff.iter_all_changes() {
        match change.tag() {
            ChangeTag::Insert => lines_added += 1,
            ChangeTag::Delete => lines_removed += 1,
            ChangeTag::Equal => (),
        }
    }

    let unified = if lines_added + lines_removed == 0 {
        String::new()
    } else {
        diff.unified_diff()
            .header(base_filename, changed_filename)
            .to_string()
    };

    TextChanges {
        lines_added,
        lines_removed,
        unified,
    }
}

/// Generates a Markdown report: a summary of lines added and removed followed by
/// the unified diff.
pub fn generate_markdown_diff(
    base_text: &str,
    changed_text: &str,
    base_filename: &str,
    changed_filename: &str,
) -> String {
    let changes = diff_lines(base_text, changed_text, base_filename, changed_filename);
    let mut output = String::new();
    // Writing into a String cannot fail.
    let _ = write!(
        output,
        "## Summary of Changes (Text Content)\n\n- Lines Added: {}\n- Lines Removed: {}\n\n---\n\n{}",
        changes.lines_added, changes.lines_removed, changes.unified
    );
    output
}
