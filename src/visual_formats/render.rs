//! Renderers for each visual-format kind.

use crate::models::colors::{palette, RgbColor};
use crate::models::document::{
    Border, BorderSet, DocParagraph, DocTable, DocTableCell, DocTableRow, DocumentBlock,
    TableBorders,
};
use crate::models::text::{Alignment, TextStyle};
use crate::themes::Theme;

use super::{
    ComparisonData, GridData, LabelMapData, LabelingDiagramData, NumberLineData,
    ResultsTableData, TimelineData, MAX_COMPARISON_CATEGORIES, MAX_GRID_AXIS,
    MAX_NUMBER_LINE_TICKS, MAX_RESULTS_ROWS, MAX_TABLE_COLUMNS, MAX_TIMELINE_EVENTS,
    MAX_WIDGET_LABELS, RESULTS_ROWS_DEFAULT, RESULTS_ROWS_SUPPORT, TIMELINE_DEFAULT_POINTS,
};

/// Writing space above and below blank answer cells, in twips.
const ANSWER_CELL_PADDING: u32 = 400;
/// Placeholder printed in timeline date cells left for the learner.
const DATE_BLANK: &str = "___________";

const THIN_RULE: Border = Border::single(2, palette::BLACK);
const HAIRLINE: Border = Border::single(1, palette::BLACK);

// --- Shared pieces ---

/// The gap placed before every widget.
pub(crate) fn spacer() -> DocumentBlock {
    DocumentBlock::Paragraph(DocParagraph::blank().spacing(400, 200))
}

/// Bold, theme-coloured widget heading, e.g. "📊 Complete the grid:".
fn heading(text: &str, theme: &Theme) -> DocumentBlock {
    DocumentBlock::Paragraph(
        DocParagraph::text(text, TextStyle::sized(12.0).bold().color(theme.colors.primary))
            .spacing(0, 150),
    )
}

fn italic_note(text: impl Into<String>) -> DocParagraph {
    DocParagraph::text(text, TextStyle::sized(10.0).italic())
}

fn header_cell(text: &str, fill: RgbColor) -> DocTableCell {
    DocTableCell::new(
        DocParagraph::text(text, TextStyle::default().bold()).aligned(Alignment::Center),
    )
    .shaded(fill)
}

fn answer_cell() -> DocTableCell {
    DocTableCell::new(DocParagraph::blank().spacing(ANSWER_CELL_PADDING, ANSWER_CELL_PADDING))
}

/// Formats a number without a trailing `.0` and without float noise.
pub(crate) fn format_number(value: f64) -> String {
    let rounded = (value * 1e6).round() / 1e6;
    if rounded == 0.0 {
        // Avoids printing "-0".
        return "0".to_string();
    }
    format!("{rounded}")
}

/// The first `limit` entries of `items`, or `defaults` when `items` is empty.
fn bounded<'a, T>(items: &'a [T], defaults: &'a [T], limit: usize) -> &'a [T] {
    let source = if items.is_empty() { defaults } else { items };
    &source[..source.len().min(limit)]
}

/// Labels joined with bullets, at most [`MAX_WIDGET_LABELS`] of them.
fn label_list(labels: &[String]) -> String {
    labels
        .iter()
        .take(MAX_WIDGET_LABELS)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(" • ")
}

fn value_label(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Number(n) => n
            .as_f64()
            .map(format_number)
            .unwrap_or_else(|| n.to_string()),
        other => other.to_string(),
    }
}

// --- Grid ---

pub(crate) fn grid(data: &GridData, theme: &Theme) -> Vec<DocumentBlock> {
    let defaults = GridData::default();
    let rows = bounded(&data.rows, &defaults.rows, MAX_GRID_AXIS);
    let cols = bounded(&data.cols, &defaults.cols, MAX_GRID_AXIS);
    let fill = theme.colors.background;

    let mut table_rows = Vec::with_capacity(rows.len() + 1);
    let mut header = vec![header_cell("×", fill)];
    header.extend(cols.iter().map(|c| header_cell(&format_number(*c), fill)));
    table_rows.push(DocTableRow::header(header));

    for (row_idx, row) in rows.iter().enumerate() {
        let mut cells = vec![header_cell(&format_number(*row), fill)];
        for (col_idx, col) in cols.iter().enumerate() {
            // Only the first cell carries a worked answer.
            let cell = if row_idx == 0 && col_idx == 0 {
                DocTableCell::new(
                    DocParagraph::text(format_number(row * col), TextStyle::default())
                        .aligned(Alignment::Center)
                        .spacing(250, 250),
                )
                .shaded(theme.colors.highlight)
            } else {
                DocTableCell::new(
                    DocParagraph::blank()
                        .aligned(Alignment::Center)
                        .spacing(250, 250),
                )
            };
            cells.push(cell);
        }
        table_rows.push(DocTableRow::new(cells));
    }

    vec![
        heading("📊 Complete the grid:", theme),
        DocumentBlock::Table(
            DocTable::new(table_rows)
                .width(80)
                .bordered(TableBorders::framed(THIN_RULE, HAIRLINE)),
        ),
    ]
}

// --- Number line ---

/// Tick values from `min` to `max`, both included.
///
/// The step is a tenth of the range, at most 10 and at least 1. If that would give
/// more than [`MAX_NUMBER_LINE_TICKS`] ticks the step is widened to fit. When the
/// range is not a whole number of steps the last interval is shorter, so the line
/// still ends on `max`. Reversed bounds are swapped; an empty range yields a
/// single tick.
pub fn number_line_ticks(min: f64, max: f64) -> Vec<f64> {
    let (lo, hi) = if max < min { (max, min) } else { (min, max) };
    let range = hi - lo;
    if !range.is_finite() || range <= 0.0 {
        return vec![lo];
    }
    let mut step = (range / 10.0).clamp(1.0, 10.0);
    if range / step + 1.0 > MAX_NUMBER_LINE_TICKS as f64 {
        step = range / (MAX_NUMBER_LINE_TICKS - 1) as f64;
    }
    let count = (range / step + 1e-9).floor() as usize + 1;
    let mut ticks: Vec<f64> = (0..count).map(|i| lo + i as f64 * step).collect();
    match ticks.last_mut() {
        Some(last) if hi - *last <= step * 1e-6 => *last = hi,
        _ => ticks.push(hi),
    }
    ticks
}

pub(crate) fn number_line(data: &NumberLineData, theme: &Theme) -> Vec<DocumentBlock> {
    let cells = number_line_ticks(data.min, data.effective_max())
        .into_iter()
        .map(|tick| {
            DocTableCell::new(
                DocParagraph::text(format_number(tick), TextStyle::sized(9.0))
                    .aligned(Alignment::Center),
            )
        })
        .collect();

    let borders = TableBorders {
        outer: BorderSet {
            bottom: Some(Border::single(12, theme.colors.primary)),
            ..Default::default()
        },
        inside_horizontal: None,
        inside_vertical: None,
    };

    let mut blocks = vec![
        heading("📏 Mark these numbers on the number line:", theme),
        DocumentBlock::Table(DocTable::new(vec![DocTableRow::new(cells)]).bordered(borders)),
    ];

    if !data.mark_points.is_empty() {
        let points: Vec<String> = data
            .mark_points
            .iter()
            .take(MAX_WIDGET_LABELS)
            .map(value_label)
            .collect();
        blocks.push(DocumentBlock::Paragraph(
            italic_note(format!("Mark these points: {}", points.join(", "))).spacing(150, 0),
        ));
    }
    blocks
}

// --- Timeline ---

pub(crate) fn timeline(data: &TimelineData, theme: &Theme) -> Vec<DocumentBlock> {
    let blank_events = vec![String::new(); TIMELINE_DEFAULT_POINTS];
    let events = bounded(&data.events, &blank_events, MAX_TIMELINE_EVENTS);

    let event_cells = events
        .iter()
        .map(|event| {
            DocTableCell::new(
                DocParagraph::text(event.as_str(), TextStyle::sized(9.0))
                    .aligned(Alignment::Center),
            )
        })
        .collect();

    // One date cell per event. The first known date is the worked example.
    let date_cells = (0..events.len())
        .map(|idx| {
            let example = (idx == 0).then(|| data.dates.first()).flatten();
            let text = example.map_or(DATE_BLANK, String::as_str);
            let cell = DocTableCell::new(
                DocParagraph::text(text, TextStyle::sized(9.0))
                    .aligned(Alignment::Center)
                    .spacing(200, 200),
            );
            if example.is_some() {
                cell.shaded(theme.colors.highlight)
            } else {
                cell
            }
        })
        .collect();

    let borders = TableBorders {
        outer: BorderSet {
            bottom: Some(Border::single(8, theme.colors.primary)),
            ..BorderSet::all(THIN_RULE)
        },
        inside_horizontal: Some(THIN_RULE),
        inside_vertical: Some(THIN_RULE),
    };

    vec![
        heading("📅 Complete the timeline:", theme),
        DocumentBlock::Table(
            DocTable::new(vec![
                DocTableRow::new(event_cells),
                DocTableRow::new(date_cells),
            ])
            .bordered(borders),
        ),
    ]
}

// --- Comparison table ---

pub(crate) fn comparison_table(data: &ComparisonData, theme: &Theme) -> Vec<DocumentBlock> {
    let defaults = ComparisonData::default();
    let categories = bounded(&data.categories, &defaults.categories, MAX_COMPARISON_CATEGORIES);
    // The category column takes one of the slots.
    let columns = bounded(&data.columns, &defaults.columns, MAX_TABLE_COLUMNS - 1);
    let fill = theme.colors.background;

    let mut header = vec![header_cell("Category", fill)];
    header.extend(columns.iter().map(|c| header_cell(c, fill)));

    let mut rows = vec![DocTableRow::header(header)];
    for category in categories {
        let mut cells = vec![DocTableCell::new(DocParagraph::text(
            category.as_str(),
            TextStyle::default().bold(),
        ))
        .shaded(fill)];
        cells.extend(columns.iter().map(|_| answer_cell()));
        rows.push(DocTableRow::new(cells));
    }

    vec![
        heading("⚖️ Compare and contrast:", theme),
        DocumentBlock::Table(DocTable::new(rows)),
    ]
}

// --- Labelling ---

pub(crate) fn labeling_diagram(data: &LabelingDiagramData, theme: &Theme) -> Vec<DocumentBlock> {
    let diagram_type = match data.diagram_type.trim() {
        "" => "diagram",
        other => other,
    };
    let mut blocks = vec![
        heading("🏷️ Label the diagram:", theme),
        DocumentBlock::Paragraph(
            italic_note(format!(
                "Draw arrows from these labels to the correct parts of the {diagram_type}:"
            ))
            .spacing(0, 200),
        ),
        DocumentBlock::Paragraph(
            DocParagraph::blank()
                .spacing(1500, 1500)
                .bordered(BorderSet::all(THIN_RULE)),
        ),
    ];
    if !data.labels.is_empty() {
        blocks.push(DocumentBlock::Paragraph(
            DocParagraph::text(
                format!("Labels: {}", label_list(&data.labels)),
                TextStyle::sized(10.0).bold(),
            )
            .spacing(200, 0),
        ));
    }
    blocks
}

pub(crate) fn label_map(data: &LabelMapData, theme: &Theme) -> Vec<DocumentBlock> {
    let frame = Border::double(4, theme.colors.primary);
    let mut blocks = vec![
        heading("🗺️ Label the map:", theme),
        DocumentBlock::Paragraph(
            italic_note("Mark and label these locations on the map:").spacing(0, 200),
        ),
        DocumentBlock::Paragraph(
            DocParagraph::blank()
                .spacing(2000, 2000)
                .bordered(BorderSet::all(frame)),
        ),
    ];
    if !data.locations.is_empty() {
        blocks.push(DocumentBlock::Paragraph(
            DocParagraph::text(
                format!("Locations to mark: {}", label_list(&data.locations)),
                TextStyle::sized(10.0).bold(),
            )
            .spacing(200, 0),
        ));
    }
    blocks
}

// --- Results table ---

/// Blank rows drawn for a results table, never more than [`MAX_RESULTS_ROWS`].
pub fn results_row_count(data: &ResultsTableData, support_mode: bool) -> usize {
    if support_mode {
        RESULTS_ROWS_SUPPORT
    } else {
        data.rows
            .filter(|n| *n > 0)
            .unwrap_or(RESULTS_ROWS_DEFAULT)
            .min(MAX_RESULTS_ROWS)
    }
}

pub(crate) fn results_table(
    data: &ResultsTableData,
    theme: &Theme,
    support_mode: bool,
) -> Vec<DocumentBlock> {
    let defaults = ResultsTableData::default();
    let headers = bounded(&data.headers, &defaults.headers, MAX_TABLE_COLUMNS);
    let fill = theme.colors.background;

    let mut rows = vec![DocTableRow::header(
        headers.iter().map(|h| header_cell(h, fill)).collect(),
    )];
    for _ in 0..results_row_count(data, support_mode) {
        rows.push(DocTableRow::new(
            headers.iter().map(|_| answer_cell()).collect(),
        ));
    }

    vec![
        heading("🔬 Record your results:", theme),
        DocumentBlock::Table(DocTable::new(rows)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::document::DocumentBlock;
    use crate::themes::resolve_theme;
    use pretty_assertions::assert_eq;

    fn only_table(blocks: &[DocumentBlock]) -> &DocTable {
        let tables: Vec<_> = blocks
            .iter()
            .filter_map(|b| match b {
                DocumentBlock::Table(t) => Some(t),
                _ => None,
            })
            .collect();
        assert_eq!(tables.len(), 1);
        tables[0]
    }

    #[test]
    fn ticks_use_a_tenth_of_the_range() {
        assert_eq!(number_line_ticks(0.0, 100.0).len(), 11);
        assert_eq!(number_line_ticks(0.0, 5.0), vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);
    }

    #[test]
    fn ticks_are_capped() {
        let ticks = number_line_ticks(0.0, 1000.0);
        assert_eq!(ticks.len(), MAX_NUMBER_LINE_TICKS);
        assert_eq!(ticks.last().copied(), Some(1000.0));
    }

    #[test]
    fn ticks_always_end_on_max() {
        let ticks = number_line_ticks(0.0, 155.0);
        assert_eq!(ticks.len(), 17);
        assert_eq!(ticks[15], 150.0);
        assert_eq!(ticks.last().copied(), Some(155.0));

        let capped = number_line_ticks(0.0, 1005.0);
        assert!(capped.len() <= MAX_NUMBER_LINE_TICKS);
        assert_eq!(capped.last().copied(), Some(1005.0));
    }

    #[test]
    fn zero_max_means_the_default_range() {
        let unset = NumberLineData {
            max: 0.0,
            ..Default::default()
        };
        assert_eq!(unset.effective_max(), 100.0);
        let negative = NumberLineData {
            min: -10.0,
            max: 0.0,
            ..Default::default()
        };
        assert_eq!(negative.effective_max(), 0.0);

        let blocks = number_line(&unset, resolve_theme("maths"));
        let table = only_table(&blocks);
        assert_eq!(table.rows[0].cells.last().unwrap().plain_text(), "100");
    }

    #[test]
    fn grid_axes_are_capped() {
        let data = GridData {
            rows: (1..=500).map(f64::from).collect(),
            cols: (1..=500).map(f64::from).collect(),
        };
        let blocks = grid(&data, resolve_theme("maths"));
        let table = only_table(&blocks);
        assert_eq!(table.rows.len(), MAX_GRID_AXIS + 1);
        assert!(table.rows.iter().all(|r| r.cells.len() == MAX_GRID_AXIS + 1));
    }

    #[test]
    fn timeline_events_are_capped() {
        let data = TimelineData {
            events: (0..40).map(|i| format!("Event {i}")).collect(),
            dates: vec![],
        };
        let blocks = timeline(&data, resolve_theme("history"));
        let table = only_table(&blocks);
        assert_eq!(table.rows[0].cells.len(), MAX_TIMELINE_EVENTS);
        assert_eq!(table.rows[1].cells.len(), MAX_TIMELINE_EVENTS);
    }

    #[test]
    fn comparison_size_is_capped() {
        let data = ComparisonData {
            categories: (0..100).map(|i| format!("Thing {i}")).collect(),
            columns: (0..50).map(|i| format!("Column {i}")).collect(),
        };
        let blocks = comparison_table(&data, resolve_theme("history"));
        let table = only_table(&blocks);
        assert_eq!(table.rows.len(), MAX_COMPARISON_CATEGORIES + 1);
        assert_eq!(table.rows[0].cells.len(), MAX_TABLE_COLUMNS);
    }

    #[test]
    fn results_table_is_capped() {
        let data = ResultsTableData {
            headers: (0..30).map(|i| format!("H{i}")).collect(),
            rows: Some(200_000),
        };
        assert_eq!(results_row_count(&data, false), MAX_RESULTS_ROWS);
        let blocks = results_table(&data, resolve_theme("science"), false);
        let table = only_table(&blocks);
        assert_eq!(table.rows.len(), MAX_RESULTS_ROWS + 1);
        assert_eq!(table.rows[0].cells.len(), MAX_TABLE_COLUMNS);
    }

    #[test]
    fn label_lists_are_capped() {
        let data = LabelMapData {
            locations: (0..100).map(|i| format!("L{i}")).collect(),
        };
        let blocks = label_map(&data, resolve_theme("geography"));
        let texts: Vec<String> = blocks.iter().flat_map(|b| b.texts()).collect();
        let listed = texts
            .iter()
            .find(|t| t.starts_with("Locations to mark:"))
            .unwrap();
        assert_eq!(listed.matches('•').count(), MAX_WIDGET_LABELS - 1);
    }

    #[test]
    fn ticks_handle_reversed_and_empty_ranges() {
        assert_eq!(number_line_ticks(10.0, 0.0).first().copied(), Some(0.0));
        assert_eq!(number_line_ticks(7.0, 7.0), vec![7.0]);
    }

    #[test]
    fn grid_prefills_only_the_first_answer() {
        let theme = resolve_theme("maths");
        let blocks = grid(&GridData::default(), theme);
        let table = only_table(&blocks);
        assert_eq!(table.rows.len(), 5);
        assert_eq!(table.rows[0].cells[0].plain_text(), "×");
        assert_eq!(table.rows[1].cells[1].plain_text(), "4");
        assert_eq!(table.rows[1].cells[1].shading, Some(theme.colors.highlight));
        assert_eq!(table.rows[2].cells[2].plain_text(), "");
    }

    #[test]
    fn timeline_shows_only_the_first_date() {
        let data = TimelineData {
            events: vec!["Romans".into(), "Saxons".into(), "Vikings".into()],
            dates: vec!["43 AD".into(), "410 AD".into(), "793 AD".into()],
        };
        let blocks = timeline(&data, resolve_theme("history"));
        let table = only_table(&blocks);
        let dates: Vec<_> = table.rows[1].cells.iter().map(|c| c.plain_text()).collect();
        assert_eq!(dates, vec!["43 AD", DATE_BLANK, DATE_BLANK]);
    }

    #[test]
    fn results_rows_shrink_in_support_mode() {
        let data = ResultsTableData {
            rows: Some(6),
            ..Default::default()
        };
        assert_eq!(results_row_count(&data, false), 6);
        assert_eq!(results_row_count(&data, true), RESULTS_ROWS_SUPPORT);
        assert_eq!(
            results_row_count(&ResultsTableData::default(), false),
            RESULTS_ROWS_DEFAULT
        );
    }

    #[test]
    fn comparison_has_a_row_per_category() {
        let blocks = comparison_table(&ComparisonData::default(), resolve_theme("history"));
        let table = only_table(&blocks);
        assert_eq!(table.rows.len(), 4);
        assert_eq!(table.rows[0].cells[1].plain_text(), "Then");
    }

    #[test]
    fn mark_points_are_listed() {
        let data = NumberLineData {
            mark_points: vec![serde_json::json!(25), serde_json::json!("half way")],
            ..Default::default()
        };
        let blocks = number_line(&data, resolve_theme("maths"));
        let texts: Vec<String> = blocks.iter().flat_map(|b| b.texts()).collect();
        assert!(texts.contains(&"Mark these points: 25, half way".to_string()));
    }

    #[test]
    fn numbers_print_without_noise() {
        assert_eq!(format_number(10.0), "10");
        assert_eq!(format_number(0.1 + 0.2), "0.3");
        assert_eq!(format_number(-0.0), "0");
    }
}
