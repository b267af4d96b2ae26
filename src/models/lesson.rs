// src/models/lesson.rs

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::{RenderError, Result};

/// The structured lesson object produced by the content generation layer.
///
/// Every collection field defaults to empty so partially filled JSON still loads;
/// [`LessonContent::validate_for_deck`] enforces what deck rendering needs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LessonContent {
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub learning_question: Option<String>,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub key_stage: KeyStage,
    #[serde(default)]
    pub objectives: Vec<String>,
    #[serde(default)]
    pub slides: Vec<SlideSpec>,
    #[serde(default)]
    pub resources: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_content: Option<ResourceContent>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub differentiation: Option<Differentiation>,
}

impl LessonContent {
    /// Parses a lesson from JSON.
    ///
    /// Fails with [`RenderError::InvalidLesson`] when the top-level value is not an
    /// object, and with [`RenderError::JsonDeserialization`] when fields have the
    /// wrong shape.
    pub fn from_json(json: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        if !value.is_object() {
            return Err(RenderError::InvalidLesson(
                "lesson must be a JSON object".to_string(),
            ));
        }
        Ok(serde_json::from_value(value)?)
    }

    /// Checks the invariants deck rendering relies on. Called before any page is built.
    pub fn validate_for_deck(&self) -> Result<()> {
        if self.slides.is_empty() {
            return Err(RenderError::InvalidLesson(
                "lesson has no slides to render".to_string(),
            ));
        }
        Ok(())
    }

    /// The differentiation block, if it carries any non-blank text.
    pub fn effective_differentiation(&self) -> Option<&Differentiation> {
        self.differentiation.as_ref().filter(|d| !d.is_empty())
    }

    /// Non-blank learning question.
    pub fn learning_question(&self) -> Option<&str> {
        non_blank(self.learning_question.as_deref())
    }

    /// The activity items, or an empty slice when there is no resource content.
    pub fn activities(&self) -> &[ActivityItem] {
        self.resource_content
            .as_ref()
            .map(|rc| rc.items.as_slice())
            .unwrap_or(&[])
    }
}

/// UK curriculum age band. Carried through as a label only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum KeyStage {
    Ks1,
    #[default]
    Ks2,
    Other(String),
}

impl From<String> for KeyStage {
    fn from(raw: String) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "ks1" => KeyStage::Ks1,
            "ks2" => KeyStage::Ks2,
            _ => KeyStage::Other(raw),
        }
    }
}

impl From<KeyStage> for String {
    fn from(ks: KeyStage) -> Self {
        match ks {
            KeyStage::Ks1 => "ks1".to_string(),
            KeyStage::Ks2 => "ks2".to_string(),
            KeyStage::Other(raw) => raw,
        }
    }
}

impl fmt::Display for KeyStage {
    /// Upper-case label as printed on pages, e.g. `KS2`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyStage::Ks1 => f.write_str("KS1"),
            KeyStage::Ks2 => f.write_str("KS2"),
            KeyStage::Other(raw) => f.write_str(&raw.to_uppercase()),
        }
    }
}

/// The pedagogical role of a slide. Unrecognised tags are kept in `Other`
/// and render with the generic lesson styling.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SlideType {
    Starter,
    #[default]
    Main,
    Activity,
    Assessment,
    Plenary,
    Other(String),
}

impl From<String> for SlideType {
    fn from(raw: String) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "starter" => SlideType::Starter,
            "main" => SlideType::Main,
            "activity" => SlideType::Activity,
            "assessment" => SlideType::Assessment,
            "plenary" => SlideType::Plenary,
            _ => SlideType::Other(raw),
        }
    }
}

impl From<SlideType> for String {
    fn from(t: SlideType) -> Self {
        match t {
            SlideType::Starter => "starter".to_string(),
            SlideType::Main => "main".to_string(),
            SlideType::Activity => "activity".to_string(),
            SlideType::Assessment => "assessment".to_string(),
            SlideType::Plenary => "plenary".to_string(),
            SlideType::Other(raw) => raw,
        }
    }
}

/// One AI-produced content slide.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlideSpec {
    #[serde(default)]
    pub title: String,
    /// Free text: bullet lines or paragraphs.
    #[serde(default)]
    pub content: String,
    #[serde(default, rename = "type")]
    pub slide_type: SlideType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default)]
    pub image_suggestions: Vec<String>,
    /// User-curated images. When non-empty these replace any suggestion lookups.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_images: Option<Vec<String>>,
}

impl SlideSpec {
    /// Non-blank teacher notes.
    pub fn notes(&self) -> Option<&str> {
        non_blank(self.notes.as_deref())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceContent {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub items: Vec<ActivityItem>,
}

/// One worksheet activity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityItem {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub instructions: String,
    /// Standalone reading passage (150-300 words).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_text: Option<String>,
    #[serde(default)]
    pub table_questions: Vec<String>,
    #[serde(default)]
    pub gap_fill_questions: Vec<String>,
    #[serde(default)]
    pub open_questions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visual_format: Option<VisualFormatSpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<ActivityImage>>,
    /// Direct image reference (path, `/uploads/...` or URL), used ahead of `images`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl ActivityItem {
    pub fn content_text(&self) -> Option<&str> {
        non_blank(self.content_text.as_deref())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityImage {
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placement: Option<String>,
}

/// A visual-format widget request: a type tag plus loosely structured data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualFormatSpec {
    #[serde(rename = "type")]
    pub format_type: String,
    #[serde(default)]
    pub data: serde_json::Value,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Differentiation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub support: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stretch: Option<String>,
}

impl Differentiation {
    pub fn support(&self) -> Option<&str> {
        non_blank(self.support.as_deref())
    }

    pub fn stretch(&self) -> Option<&str> {
        non_blank(self.stretch.as_deref())
    }

    /// True when neither panel has any text.
    pub fn is_empty(&self) -> bool {
        self.support().is_none() && self.stretch().is_none()
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}
