//! Subject template registry for visual formats, and topic-based suggestion.

use serde_json::json;

use crate::models::lesson::VisualFormatSpec;

use super::VisualFormatKind;

/// A named, ready-to-use widget configuration for a subject.
#[derive(Debug, Clone, Copy)]
pub struct VisualFormatTemplate {
    /// Subject key the template belongs to, e.g. `"science"`.
    pub subject: &'static str,
    /// Template key, e.g. `"waterCycle"`.
    pub key: &'static str,
    pub kind: VisualFormatKind,
    /// Teacher-facing description of the task.
    pub prompt: &'static str,
    /// Topic keywords that select this template.
    pub keywords: &'static [&'static str],
    data: fn() -> serde_json::Value,
}

impl VisualFormatTemplate {
    /// The template as a widget request carrying its default data.
    pub fn to_spec(&self) -> VisualFormatSpec {
        VisualFormatSpec {
            format_type: self.kind.tag().to_string(),
            data: (self.data)(),
        }
    }
}

/// Templates in suggestion order. Within a subject the first entry is the fallback.
static TEMPLATES: &[VisualFormatTemplate] = &[
    // mathematics
    VisualFormatTemplate {
        subject: "mathematics",
        key: "multiplication",
        kind: VisualFormatKind::Grid,
        prompt: "Complete the multiplication grid",
        keywords: &["times", "multiply", "times tables", "multiplication"],
        data: || json!({ "rows": [2, 3, 5, 10], "cols": [2, 4, 5, 10] }),
    },
    VisualFormatTemplate {
        subject: "mathematics",
        key: "numberLine",
        kind: VisualFormatKind::NumberLine,
        prompt: "Mark these numbers on the number line",
        keywords: &["number line", "counting", "sequence", "order"],
        data: || json!({ "min": 0, "max": 100 }),
    },
    VisualFormatTemplate {
        subject: "mathematics",
        key: "decimalNumberLine",
        kind: VisualFormatKind::NumberLine,
        prompt: "Plot these decimal numbers",
        keywords: &["decimal", "tenths"],
        data: || json!({ "min": 0, "max": 10 }),
    },
    // science
    VisualFormatTemplate {
        subject: "science",
        key: "plant",
        kind: VisualFormatKind::LabelingDiagram,
        prompt: "Label the parts of a plant",
        keywords: &["plant", "flower", "seed", "roots", "photosynthesis"],
        data: || {
            json!({
                "labels": ["roots", "stem", "leaves", "flower", "petals"],
                "diagramType": "plant"
            })
        },
    },
    VisualFormatTemplate {
        subject: "science",
        key: "waterCycle",
        kind: VisualFormatKind::LabelingDiagram,
        prompt: "Label the water cycle diagram",
        keywords: &["water cycle", "evaporation", "condensation", "rain"],
        data: || {
            json!({
                "labels": ["evaporation", "condensation", "precipitation", "collection"],
                "diagramType": "water cycle"
            })
        },
    },
    VisualFormatTemplate {
        subject: "science",
        key: "humanBody",
        kind: VisualFormatKind::LabelingDiagram,
        prompt: "Label the parts of the body",
        keywords: &["body", "skeleton", "organs", "heart", "lungs"],
        data: || {
            json!({
                "labels": ["heart", "lungs", "stomach", "brain", "skeleton"],
                "diagramType": "body"
            })
        },
    },
    VisualFormatTemplate {
        subject: "science",
        key: "results",
        kind: VisualFormatKind::ResultsTable,
        prompt: "Record your experiment results",
        keywords: &["experiment", "test", "investigation"],
        data: || {
            json!({
                "headers": ["What we tested", "What happened", "What we learned"],
                "rows": 4
            })
        },
    },
    VisualFormatTemplate {
        subject: "science",
        key: "observations",
        kind: VisualFormatKind::ResultsTable,
        prompt: "Record your observations",
        keywords: &["observe", "watching", "changes over time"],
        data: || json!({ "headers": ["Time", "What I observed", "Drawing"], "rows": 5 }),
    },
    VisualFormatTemplate {
        subject: "science",
        key: "classification",
        kind: VisualFormatKind::ResultsTable,
        prompt: "Sort these objects into the table",
        keywords: &["classify", "sort", "group", "living things"],
        data: || json!({ "headers": ["Living", "Non-living", "Never alive"], "rows": 6 }),
    },
    // history
    VisualFormatTemplate {
        subject: "history",
        key: "timeline",
        kind: VisualFormatKind::Timeline,
        prompt: "Place these events on the timeline in order",
        keywords: &["timeline", "chronology", "order", "sequence", "dates"],
        data: || json!({ "events": [], "dates": [] }),
    },
    VisualFormatTemplate {
        subject: "history",
        key: "thenNow",
        kind: VisualFormatKind::ComparisonTable,
        prompt: "Compare life then and now",
        keywords: &["change", "compare", "past", "modern", "today"],
        data: || {
            json!({
                "categories": ["Homes", "Transport", "Schools", "Food"],
                "columns": ["Then", "Now"]
            })
        },
    },
    VisualFormatTemplate {
        subject: "history",
        key: "twoSources",
        kind: VisualFormatKind::ComparisonTable,
        prompt: "Compare these historical sources",
        keywords: &["source", "evidence", "artifact", "picture"],
        data: || {
            json!({
                "categories": ["Who made it?", "When?", "What does it show?", "Can we trust it?"],
                "columns": ["Source A", "Source B"]
            })
        },
    },
    // geography
    VisualFormatTemplate {
        subject: "geography",
        key: "map",
        kind: VisualFormatKind::LabelMap,
        prompt: "Label the map with the correct names",
        keywords: &["map", "location", "country", "continent", "city"],
        data: || json!({ "locations": ["countries", "cities", "rivers", "mountains"] }),
    },
    VisualFormatTemplate {
        subject: "geography",
        key: "weather",
        kind: VisualFormatKind::ResultsTable,
        prompt: "Record the weather each day",
        keywords: &["weather", "climate", "temperature", "season"],
        data: || json!({ "headers": ["Day", "Weather", "Temperature", "Wind"], "rows": 7 }),
    },
    VisualFormatTemplate {
        subject: "geography",
        key: "places",
        kind: VisualFormatKind::ComparisonTable,
        prompt: "Compare these two countries",
        keywords: &["compare", "contrast", "different countries"],
        data: || {
            json!({
                "categories": ["Climate", "Landscape", "Homes", "Food"],
                "columns": ["UK", "Country X"]
            })
        },
    },
    // english
    VisualFormatTemplate {
        subject: "english",
        key: "synonyms",
        kind: VisualFormatKind::ResultsTable,
        prompt: "Find synonyms for these words",
        keywords: &["synonym", "vocabulary", "word choice"],
        data: || {
            json!({
                "headers": ["Word", "Synonym 1", "Synonym 2", "Use in a sentence"],
                "rows": 5
            })
        },
    },
    VisualFormatTemplate {
        subject: "english",
        key: "grammar",
        kind: VisualFormatKind::ResultsTable,
        prompt: "Sort these words into the correct columns",
        keywords: &["grammar", "noun", "verb", "adjective", "word class"],
        data: || json!({ "headers": ["Noun", "Verb", "Adjective", "Adverb"], "rows": 6 }),
    },
    VisualFormatTemplate {
        subject: "english",
        key: "storySequence",
        kind: VisualFormatKind::Timeline,
        prompt: "Plan your story using this story mountain",
        keywords: &["story", "narrative", "plot", "beginning", "ending"],
        data: || {
            json!({
                "events": ["Beginning", "Build-up", "Problem", "Resolution", "Ending"],
                "dates": []
            })
        },
    },
];

/// Subject spellings accepted by the registry, mapped to its keys.
const SUBJECT_KEYS: &[(&str, &str)] = &[
    ("math", "mathematics"),
    ("maths", "mathematics"),
    ("sci", "science"),
    ("hist", "history"),
    ("geo", "geography"),
    ("geog", "geography"),
    ("eng", "english"),
    ("literacy", "english"),
];

fn registry_subject(subject: &str) -> String {
    let normalized = subject.trim().to_lowercase();
    SUBJECT_KEYS
        .iter()
        .find(|(alias, _)| *alias == normalized)
        .map(|(_, key)| key.to_string())
        .unwrap_or(normalized)
}

/// Templates registered for a subject, in registry order.
/// Short forms such as `"maths"` or `"sci"` are accepted.
pub fn templates_for_subject(subject: &str) -> Vec<&'static VisualFormatTemplate> {
    let key = registry_subject(subject);
    TEMPLATES.iter().filter(|t| t.subject == key).collect()
}

/// Suggests a widget template for a lesson topic.
///
/// The first template of the subject with a keyword contained in the topic wins.
/// With no keyword match the subject's first template is returned.
///
/// # Returns
///
/// `None` when the subject has no templates.
pub fn suggest_visual_format(
    subject: &str,
    topic: &str,
) -> Option<&'static VisualFormatTemplate> {
    let templates = templates_for_subject(subject);
    let topic = topic.to_lowercase();
    templates
        .iter()
        .find(|t| t.keywords.iter().any(|k| topic.contains(k)))
        .or_else(|| templates.first())
        .copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::visual_formats::{render_visual_format, VisualFormat};
    use crate::themes::resolve_theme;

    #[test]
    fn suggests_by_topic_keyword() {
        let t = suggest_visual_format("Science", "The Water Cycle").unwrap();
        assert_eq!(t.key, "waterCycle");
        let t = suggest_visual_format("maths", "Times tables to 12").unwrap();
        assert_eq!(t.kind, VisualFormatKind::Grid);
    }

    #[test]
    fn falls_back_to_first_template_of_subject() {
        let t = suggest_visual_format("history", "The Tudors").unwrap();
        assert_eq!(t.key, "timeline");
    }

    #[test]
    fn subjects_without_templates_get_none() {
        assert!(suggest_visual_format("music", "rhythm").is_none());
        assert!(templates_for_subject("").is_empty());
    }

    #[test]
    fn every_template_renders() {
        let theme = resolve_theme("general");
        for template in TEMPLATES {
            let spec = template.to_spec();
            assert!(VisualFormat::from_spec(&spec).is_some(), "{}", template.key);
            assert!(!render_visual_format(&spec, theme, false).is_empty());
        }
    }
}
