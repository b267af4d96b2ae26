//! Render configuration shared by the deck and worksheet writers.

use log::debug;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const ENV_FONT_FACE: &str = "LESSON_FONT_FACE";
pub const ENV_AUTHOR: &str = "LESSON_AUTHOR";
pub const ENV_UPLOADS_DIR: &str = "LESSON_UPLOADS_DIR";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderConfig {
    /// Font family applied to all deck text and the worksheet body.
    #[serde(default = "default_font_face")]
    pub font_face: String,
    /// Written to the `creator` field of package metadata.
    #[serde(default = "default_author")]
    pub author: String,
    /// Directory that `/uploads/...` image paths are resolved against.
    /// `None` resolves them relative to the working directory.
    #[serde(default)]
    pub uploads_root: Option<PathBuf>,
    /// Language tag written to the worksheet styles.
    #[serde(default = "default_locale")]
    pub locale: String,
}

fn default_font_face() -> String {
    "Comic Sans MS".to_string()
}

fn default_author() -> String {
    "LessonLaunch".to_string()
}

fn default_locale() -> String {
    "en-GB".to_string()
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            font_face: default_font_face(),
            author: default_author(),
            uploads_root: None,
            locale: default_locale(),
        }
    }
}

impl RenderConfig {
    /// Defaults overridden by `LESSON_FONT_FACE`, `LESSON_AUTHOR` and
    /// `LESSON_UPLOADS_DIR`. Blank variables are ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let var = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let mut config = Self::default();
        if let Some(font) = var(ENV_FONT_FACE) {
            config.font_face = font;
        }
        if let Some(author) = var(ENV_AUTHOR) {
            config.author = author;
        }
        if let Some(dir) = var(ENV_UPLOADS_DIR) {
            config.uploads_root = Some(PathBuf::from(dir));
        }
        debug!("Render config: {:?}", config);
        config
    }

    pub fn with_font_face(mut self, font_face: impl Into<String>) -> Self {
        self.font_face = font_face.into();
        self
    }

    pub fn with_uploads_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.uploads_root = Some(root.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    #[test]
    fn partial_json_keeps_defaults() {
        let config: RenderConfig = serde_json::from_str(r#"{"fontFace":"Arial"}"#).unwrap();
        assert_eq!(config.font_face, "Arial");
        assert_eq!(config.author, "LessonLaunch");
        assert_eq!(config.locale, "en-GB");
        assert_eq!(config.uploads_root, None);
    }

    #[test]
    fn environment_overrides_ignore_blanks() {
        let vars: HashMap<&str, &str> = [
            (ENV_FONT_FACE, "  "),
            (ENV_AUTHOR, "Year 4 Team"),
            (ENV_UPLOADS_DIR, "/srv/uploads"),
        ]
        .into_iter()
        .collect();
        let config = RenderConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string()));
        assert_eq!(config.font_face, "Comic Sans MS");
        assert_eq!(config.author, "Year 4 Team");
        assert_eq!(config.uploads_root, Some(PathBuf::from("/srv/uploads")));
    }
}
