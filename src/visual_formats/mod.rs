//! Visual-format widgets for the worksheet: grids, number lines, timelines,
//! comparison tables, labelling diagrams, results tables and map labelling.
//!
//! A widget arrives as a loose `{type, data}` pair. The type tag is mapped onto the
//! closed [`VisualFormatKind`] set, the data is read into a typed struct with
//! defaults for anything missing, and the matching renderer in [`render`] turns it
//! into document blocks. An unknown tag renders nothing.

pub mod catalog;
pub mod render;

use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::models::document::DocumentBlock;
use crate::models::lesson::VisualFormatSpec;
use crate::themes::Theme;

pub use catalog::{suggest_visual_format, templates_for_subject, VisualFormatTemplate};

/// Rows of a results table when no count is given.
pub const RESULTS_ROWS_DEFAULT: usize = 4;
/// Rows of a results table in support mode, regardless of the data.
pub const RESULTS_ROWS_SUPPORT: usize = 3;
/// Upper bound on number line ticks; the step widens to stay under it.
pub const MAX_NUMBER_LINE_TICKS: usize = 21;
/// Event boxes drawn when a timeline has no events.
pub const TIMELINE_DEFAULT_POINTS: usize = 5;
/// Most blank rows a results table draws, whatever the data asks for.
pub const MAX_RESULTS_ROWS: usize = 12;
/// Most row or column factors a multiplication grid takes.
pub const MAX_GRID_AXIS: usize = 12;
/// Most events on a timeline.
pub const MAX_TIMELINE_EVENTS: usize = 10;
/// Most category rows in a comparison table.
pub const MAX_COMPARISON_CATEGORIES: usize = 12;
/// Most columns in a comparison or results table. Fits A4 portrait.
pub const MAX_TABLE_COLUMNS: usize = 6;
/// Most labels, locations or mark points listed under a widget.
pub const MAX_WIDGET_LABELS: usize = 20;

/// The closed set of widget kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum VisualFormatKind {
    Grid,
    NumberLine,
    Timeline,
    ComparisonTable,
    LabelingDiagram,
    ResultsTable,
    LabelMap,
}

impl VisualFormatKind {
    /// Maps a type tag onto a kind. Tags are matched exactly, as produced upstream.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "multiplicationGrid" | "grid" => Some(Self::Grid),
            "numberLine" => Some(Self::NumberLine),
            "timeline" => Some(Self::Timeline),
            "thenNow" | "comparisonTable" => Some(Self::ComparisonTable),
            "labelingDiagram" => Some(Self::LabelingDiagram),
            "resultsTable" => Some(Self::ResultsTable),
            "labelMap" => Some(Self::LabelMap),
            _ => None,
        }
    }

    /// The canonical tag of the kind.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Grid => "grid",
            Self::NumberLine => "numberLine",
            Self::Timeline => "timeline",
            Self::ComparisonTable => "comparisonTable",
            Self::LabelingDiagram => "labelingDiagram",
            Self::ResultsTable => "resultsTable",
            Self::LabelMap => "labelMap",
        }
    }
}

// --- Widget data ---

fn default_grid_rows() -> Vec<f64> {
    vec![2.0, 3.0, 5.0, 10.0]
}

fn default_grid_cols() -> Vec<f64> {
    vec![2.0, 4.0, 5.0, 10.0]
}

/// Multiplication grid. The first cell is filled in as a worked example.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridData {
    #[serde(default = "default_grid_rows")]
    pub rows: Vec<f64>,
    #[serde(default = "default_grid_cols")]
    pub cols: Vec<f64>,
}

impl Default for GridData {
    fn default() -> Self {
        Self {
            rows: default_grid_rows(),
            cols: default_grid_cols(),
        }
    }
}

fn default_max() -> f64 {
    100.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NumberLineData {
    #[serde(default)]
    pub min: f64,
    #[serde(default = "default_max")]
    pub max: f64,
    /// Values the learner should mark; numbers or strings.
    #[serde(default)]
    pub mark_points: Vec<serde_json::Value>,
}

impl Default for NumberLineData {
    fn default() -> Self {
        Self {
            min: 0.0,
            max: default_max(),
            mark_points: Vec::new(),
        }
    }
}

impl NumberLineData {
    /// The upper bound actually drawn. A zero `max` over a non-negative `min` is
    /// how generated data says "unset", so it falls back to the default of 100.
    pub fn effective_max(&self) -> f64 {
        if self.max == 0.0 && self.min >= 0.0 {
            default_max()
        } else {
            self.max
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineData {
    #[serde(default)]
    pub events: Vec<String>,
    /// Only the first date is printed; the rest are left for the learner.
    #[serde(default)]
    pub dates: Vec<String>,
}

fn default_categories() -> Vec<String> {
    vec!["Item 1".into(), "Item 2".into(), "Item 3".into()]
}

fn default_comparison_columns() -> Vec<String> {
    vec!["Then".into(), "Now".into()]
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonData {
    #[serde(default = "default_categories")]
    pub categories: Vec<String>,
    /// Answer column headings.
    #[serde(default = "default_comparison_columns")]
    pub columns: Vec<String>,
}

impl Default for ComparisonData {
    fn default() -> Self {
        Self {
            categories: default_categories(),
            columns: default_comparison_columns(),
        }
    }
}

fn default_diagram_type() -> String {
    "diagram".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelingDiagramData {
    #[serde(default)]
    pub labels: Vec<String>,
    #[serde(default = "default_diagram_type")]
    pub diagram_type: String,
}

impl Default for LabelingDiagramData {
    fn default() -> Self {
        Self {
            labels: Vec::new(),
            diagram_type: default_diagram_type(),
        }
    }
}

fn default_result_headers() -> Vec<String> {
    vec![
        "What we tested".into(),
        "What happened".into(),
        "What we learned".into(),
    ]
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultsTableData {
    #[serde(default = "default_result_headers")]
    pub headers: Vec<String>,
    /// Blank rows to draw. Ignored in support mode.
    #[serde(default)]
    pub rows: Option<usize>,
}

impl Default for ResultsTableData {
    fn default() -> Self {
        Self {
            headers: default_result_headers(),
            rows: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelMapData {
    #[serde(default)]
    pub locations: Vec<String>,
}

/// A widget with its data read and defaulted.
#[derive(Debug, Clone, PartialEq)]
pub enum VisualFormat {
    Grid(GridData),
    NumberLine(NumberLineData),
    Timeline(TimelineData),
    ComparisonTable(ComparisonData),
    LabelingDiagram(LabelingDiagramData),
    ResultsTable(ResultsTableData),
    LabelMap(LabelMapData),
}

/// Reads widget data, falling back to the defaults when the shape is wrong.
fn read_data<T>(kind: VisualFormatKind, data: &serde_json::Value) -> T
where
    T: DeserializeOwned + Default,
{
    if data.is_null() {
        return T::default();
    }
    match serde_json::from_value::<T>(data.clone()) {
        Ok(parsed) => parsed,
        Err(e) => {
            warn!(
                "Ignoring malformed data for visual format '{}': {}",
                kind.tag(),
                e
            );
            T::default()
        }
    }
}

impl VisualFormat {
    /// Builds a typed widget from a `{type, data}` request. Unknown tags yield `None`.
    pub fn from_spec(spec: &VisualFormatSpec) -> Option<Self> {
        let Some(kind) = VisualFormatKind::from_tag(spec.format_type.trim()) else {
            debug!("Unknown visual format type '{}'", spec.format_type);
            return None;
        };
        let data = &spec.data;
        Some(match kind {
            VisualFormatKind::Grid => Self::Grid(read_data(kind, data)),
            VisualFormatKind::NumberLine => Self::NumberLine(read_data(kind, data)),
            VisualFormatKind::Timeline => Self::Timeline(read_data(kind, data)),
            VisualFormatKind::ComparisonTable => Self::ComparisonTable(read_data(kind, data)),
            VisualFormatKind::LabelingDiagram => Self::LabelingDiagram(read_data(kind, data)),
            VisualFormatKind::ResultsTable => Self::ResultsTable(read_data(kind, data)),
            VisualFormatKind::LabelMap => Self::LabelMap(read_data(kind, data)),
        })
    }

    pub fn kind(&self) -> VisualFormatKind {
        match self {
            Self::Grid(_) => VisualFormatKind::Grid,
            Self::NumberLine(_) => VisualFormatKind::NumberLine,
            Self::Timeline(_) => VisualFormatKind::Timeline,
            Self::ComparisonTable(_) => VisualFormatKind::ComparisonTable,
            Self::LabelingDiagram(_) => VisualFormatKind::LabelingDiagram,
            Self::ResultsTable(_) => VisualFormatKind::ResultsTable,
            Self::LabelMap(_) => VisualFormatKind::LabelMap,
        }
    }

    /// Renders the widget, preceded by a spacer paragraph.
    pub fn render(&self, theme: &Theme, support_mode: bool) -> Vec<DocumentBlock> {
        let mut blocks = vec![render::spacer()];
        match self {
            Self::Grid(data) => blocks.extend(render::grid(data, theme)),
            Self::NumberLine(data) => blocks.extend(render::number_line(data, theme)),
            Self::Timeline(data) => blocks.extend(render::timeline(data, theme)),
            Self::ComparisonTable(data) => blocks.extend(render::comparison_table(data, theme)),
            Self::LabelingDiagram(data) => blocks.extend(render::labeling_diagram(data, theme)),
            Self::ResultsTable(data) => {
                blocks.extend(render::results_table(data, theme, support_mode))
            }
            Self::LabelMap(data) => blocks.extend(render::label_map(data, theme)),
        }
        blocks
    }
}

/// Renders a `{type, data}` widget request into document blocks.
///
/// # Arguments
///
/// * `spec` - The widget request from an activity.
/// * `theme` - Colours for headings and shaded cells.
/// * `support_mode` - Reduces row counts where a widget defines a support variant.
///
/// # Returns
///
/// The blocks in order, or an empty vector for an unknown type tag.
pub fn render_visual_format(
    spec: &VisualFormatSpec,
    theme: &Theme,
    support_mode: bool,
) -> Vec<DocumentBlock> {
    VisualFormat::from_spec(spec)
        .map(|format| format.render(theme, support_mode))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::themes::resolve_theme;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn spec(tag: &str, data: serde_json::Value) -> VisualFormatSpec {
        VisualFormatSpec {
            format_type: tag.to_string(),
            data,
        }
    }

    #[test]
    fn unknown_type_renders_nothing() {
        let blocks = render_visual_format(
            &spec("unknownType", json!({})),
            resolve_theme("science"),
            false,
        );
        assert!(blocks.is_empty());
    }

    #[test]
    fn aliases_map_to_the_same_kind() {
        assert_eq!(
            VisualFormatKind::from_tag("multiplicationGrid"),
            Some(VisualFormatKind::Grid)
        );
        assert_eq!(
            VisualFormatKind::from_tag("thenNow"),
            Some(VisualFormatKind::ComparisonTable)
        );
        assert_eq!(VisualFormatKind::from_tag("Grid"), None);
    }

    #[test]
    fn missing_fields_take_defaults() {
        let format = VisualFormat::from_spec(&spec("grid", json!({}))).unwrap();
        assert_eq!(format, VisualFormat::Grid(GridData::default()));

        let format = VisualFormat::from_spec(&spec("numberLine", json!({"max": 20}))).unwrap();
        let VisualFormat::NumberLine(data) = format else {
            panic!("expected number line");
        };
        assert_eq!(data.min, 0.0);
        assert_eq!(data.max, 20.0);
    }

    #[test]
    fn malformed_data_falls_back_to_defaults() {
        let format =
            VisualFormat::from_spec(&spec("comparisonTable", json!({"categories": 7}))).unwrap();
        assert_eq!(
            format,
            VisualFormat::ComparisonTable(ComparisonData::default())
        );
    }

    #[test]
    fn null_data_is_accepted() {
        let blocks = render_visual_format(
            &spec("labelMap", serde_json::Value::Null),
            resolve_theme("geography"),
            false,
        );
        assert!(!blocks.is_empty());
    }
}
