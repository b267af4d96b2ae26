//! Subject themes: the colour and icon bundle that skins both the deck and the worksheet.
//!
//! Themes live in a static table; [`resolve_theme`] returns a reference into it, so two
//! subjects that resolve to the same theme yield the same `&'static Theme`.

use log::debug;
use serde::Serialize;

use crate::models::colors::RgbColor;

/// The colour palette of a theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThemeColors {
    pub primary: RgbColor,
    pub primary_dark: RgbColor,
    pub secondary: RgbColor,
    pub accent: RgbColor,
    pub text: RgbColor,
    pub text_light: RgbColor,
    /// Interior page background.
    pub background: RgbColor,
    pub white: RgbColor,
    pub highlight: RgbColor,
}

/// An immutable subject theme.
#[derive(Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Theme {
    /// Table key, e.g. `"mathematics"`.
    pub key: &'static str,
    /// Display name, e.g. `"Mathematics"`.
    pub name: &'static str,
    pub icon: &'static str,
    pub colors: ThemeColors,
    pub gradient: [RgbColor; 2],
}

/// Icons used for recurring page elements.
pub mod icons {
    pub const OBJECTIVES: &str = "🎯";
    pub const TASK: &str = "📝";
    pub const KEY_POINT: &str = "💡";
    pub const QUESTION: &str = "❓";
    pub const ACTIVITY: &str = "✏️";
    pub const READING: &str = "📖";
    pub const THINKING: &str = "🤔";
    pub const SUCCESS: &str = "✅";
    pub const CHALLENGE: &str = "⭐";
    pub const CHECKBOX: &str = "☐";
    pub const HELP: &str = "💭";
}

static THEMES: [Theme; 12] = [
    Theme {
        key: "history",
        name: "History",
        icon: "📜",
        colors: ThemeColors {
            primary: RgbColor::hex(0x8B4513),
            primary_dark: RgbColor::hex(0x5D2F0A),
            secondary: RgbColor::hex(0xDAA520),
            accent: RgbColor::hex(0xCD853F),
            text: RgbColor::hex(0x2C1810),
            text_light: RgbColor::hex(0x5D4E37),
            background: RgbColor::hex(0xF5F0E8),
            white: RgbColor::hex(0xFFFFFF),
            highlight: RgbColor::hex(0xFFE4B5),
        },
        gradient: [RgbColor::hex(0x8B4513), RgbColor::hex(0xDAA520)],
    },
    Theme {
        key: "science",
        name: "Science",
        icon: "🔬",
        colors: ThemeColors {
            primary: RgbColor::hex(0x2E7D32),
            primary_dark: RgbColor::hex(0x1B5E20),
            secondary: RgbColor::hex(0x00ACC1),
            accent: RgbColor::hex(0x66BB6A),
            text: RgbColor::hex(0x1B3A1B),
            text_light: RgbColor::hex(0x4A7C4E),
            background: RgbColor::hex(0xF1F8E9),
            white: RgbColor::hex(0xFFFFFF),
            highlight: RgbColor::hex(0xA5D6A7),
        },
        gradient: [RgbColor::hex(0x2E7D32), RgbColor::hex(0x00ACC1)],
    },
    Theme {
        key: "mathematics",
        name: "Mathematics",
        icon: "🔢",
        colors: ThemeColors {
            primary: RgbColor::hex(0xFF6F00),
            primary_dark: RgbColor::hex(0xE65100),
            secondary: RgbColor::hex(0x424242),
            accent: RgbColor::hex(0xFFA726),
            text: RgbColor::hex(0x212121),
            text_light: RgbColor::hex(0x616161),
            background: RgbColor::hex(0xFFF8E1),
            white: RgbColor::hex(0xFFFFFF),
            highlight: RgbColor::hex(0xFFE0B2),
        },
        gradient: [RgbColor::hex(0xFF6F00), RgbColor::hex(0xFFA726)],
    },
    Theme {
        key: "english",
        name: "English",
        icon: "📚",
        colors: ThemeColors {
            primary: RgbColor::hex(0x6A1B9A),
            primary_dark: RgbColor::hex(0x4A148C),
            secondary: RgbColor::hex(0xE91E63),
            accent: RgbColor::hex(0x9C27B0),
            text: RgbColor::hex(0x311B92),
            text_light: RgbColor::hex(0x673AB7),
            background: RgbColor::hex(0xF3E5F5),
            white: RgbColor::hex(0xFFFFFF),
            highlight: RgbColor::hex(0xCE93D8),
        },
        gradient: [RgbColor::hex(0x6A1B9A), RgbColor::hex(0xE91E63)],
    },
    Theme {
        key: "geography",
        name: "Geography",
        icon: "🌍",
        colors: ThemeColors {
            primary: RgbColor::hex(0x0277BD),
            primary_dark: RgbColor::hex(0x01579B),
            secondary: RgbColor::hex(0x558B2F),
            accent: RgbColor::hex(0x29B6F6),
            text: RgbColor::hex(0x01344C),
            text_light: RgbColor::hex(0x4A7A8C),
            background: RgbColor::hex(0xE1F5FE),
            white: RgbColor::hex(0xFFFFFF),
            highlight: RgbColor::hex(0x81D4FA),
        },
        gradient: [RgbColor::hex(0x0277BD), RgbColor::hex(0x558B2F)],
    },
    Theme {
        key: "art",
        name: "Art & Design",
        icon: "🎨",
        colors: ThemeColors {
            primary: RgbColor::hex(0xD32F2F),
            primary_dark: RgbColor::hex(0xC62828),
            secondary: RgbColor::hex(0xFFA000),
            accent: RgbColor::hex(0xF57C00),
            text: RgbColor::hex(0x3E2723),
            text_light: RgbColor::hex(0x6D4C41),
            background: RgbColor::hex(0xFFF3E0),
            white: RgbColor::hex(0xFFFFFF),
            highlight: RgbColor::hex(0xFFCC80),
        },
        gradient: [RgbColor::hex(0xD32F2F), RgbColor::hex(0xFFA000)],
    },
    Theme {
        key: "computing",
        name: "Computing",
        icon: "💻",
        colors: ThemeColors {
            primary: RgbColor::hex(0x1976D2),
            primary_dark: RgbColor::hex(0x0D47A1),
            secondary: RgbColor::hex(0x00BCD4),
            accent: RgbColor::hex(0x42A5F5),
            text: RgbColor::hex(0x0D3C61),
            text_light: RgbColor::hex(0x546E7A),
            background: RgbColor::hex(0xE3F2FD),
            white: RgbColor::hex(0xFFFFFF),
            highlight: RgbColor::hex(0x90CAF9),
        },
        gradient: [RgbColor::hex(0x1976D2), RgbColor::hex(0x00BCD4)],
    },
    Theme {
        key: "dt",
        name: "Design & Technology",
        icon: "🔧",
        colors: ThemeColors {
            primary: RgbColor::hex(0x607D8B),
            primary_dark: RgbColor::hex(0x455A64),
            secondary: RgbColor::hex(0xFF9800),
            accent: RgbColor::hex(0x78909C),
            text: RgbColor::hex(0x263238),
            text_light: RgbColor::hex(0x546E7A),
            background: RgbColor::hex(0xECEFF1),
            white: RgbColor::hex(0xFFFFFF),
            highlight: RgbColor::hex(0xFFB74D),
        },
        gradient: [RgbColor::hex(0x607D8B), RgbColor::hex(0xFF9800)],
    },
    Theme {
        key: "spanish",
        name: "Spanish",
        icon: "🇪🇸",
        colors: ThemeColors {
            primary: RgbColor::hex(0xC62828),
            primary_dark: RgbColor::hex(0xB71C1C),
            secondary: RgbColor::hex(0xFBC02D),
            accent: RgbColor::hex(0xF44336),
            text: RgbColor::hex(0x880E4F),
            text_light: RgbColor::hex(0xC2185B),
            background: RgbColor::hex(0xFFF9C4),
            white: RgbColor::hex(0xFFFFFF),
            highlight: RgbColor::hex(0xFFEB3B),
        },
        gradient: [RgbColor::hex(0xC62828), RgbColor::hex(0xFBC02D)],
    },
    Theme {
        key: "pe",
        name: "Physical Education",
        icon: "⚽",
        colors: ThemeColors {
            primary: RgbColor::hex(0x388E3C),
            primary_dark: RgbColor::hex(0x2E7D32),
            secondary: RgbColor::hex(0xFFA726),
            accent: RgbColor::hex(0x66BB6A),
            text: RgbColor::hex(0x1B5E20),
            text_light: RgbColor::hex(0x558B2F),
            background: RgbColor::hex(0xE8F5E9),
            white: RgbColor::hex(0xFFFFFF),
            highlight: RgbColor::hex(0xAED581),
        },
        gradient: [RgbColor::hex(0x388E3C), RgbColor::hex(0xFFA726)],
    },
    Theme {
        key: "music",
        name: "Music",
        icon: "🎵",
        colors: ThemeColors {
            primary: RgbColor::hex(0x5E35B1),
            primary_dark: RgbColor::hex(0x4527A0),
            secondary: RgbColor::hex(0xEC407A),
            accent: RgbColor::hex(0x7E57C2),
            text: RgbColor::hex(0x311B92),
            text_light: RgbColor::hex(0x512DA8),
            background: RgbColor::hex(0xEDE7F6),
            white: RgbColor::hex(0xFFFFFF),
            highlight: RgbColor::hex(0xBA68C8),
        },
        gradient: [RgbColor::hex(0x5E35B1), RgbColor::hex(0xEC407A)],
    },
    Theme {
        key: "general",
        name: "General",
        icon: "📖",
        colors: ThemeColors {
            primary: RgbColor::hex(0x4C6EF5),
            primary_dark: RgbColor::hex(0x3C5CE0),
            secondary: RgbColor::hex(0x35C97A),
            accent: RgbColor::hex(0xFF6B6B),
            text: RgbColor::hex(0x1A1C25),
            text_light: RgbColor::hex(0x4B4E5D),
            background: RgbColor::hex(0xF5F7FB),
            white: RgbColor::hex(0xFFFFFF),
            highlight: RgbColor::hex(0x90A4FC),
        },
        gradient: [RgbColor::hex(0x4C6EF5), RgbColor::hex(0x35C97A)],
    },
];

/// Index of the fallback theme in [`THEMES`].
const GENERAL: usize = 11;

/// Substring aliases, checked in order after an exact key match fails.
const SUBJECT_ALIASES: &[(&str, &str)] = &[
    ("hist", "history"),
    ("sci", "science"),
    ("math", "mathematics"),
    ("maths", "mathematics"),
    ("eng", "english"),
    ("literacy", "english"),
    ("reading", "english"),
    ("writing", "english"),
    ("geo", "geography"),
    ("design", "dt"),
    ("technology", "dt"),
    ("d&t", "dt"),
    ("art", "art"),
    ("comp", "computing"),
    ("ict", "computing"),
    ("coding", "computing"),
    ("pe", "pe"),
    ("sport", "pe"),
    ("physical", "pe"),
    ("music", "music"),
];

/// Every theme, in table order. The fallback theme is last.
pub fn all_themes() -> &'static [Theme] {
    &THEMES
}

/// The fallback theme.
pub fn general_theme() -> &'static Theme {
    &THEMES[GENERAL]
}

fn theme_by_key(key: &str) -> Option<&'static Theme> {
    THEMES.iter().find(|t| t.key == key)
}

/// Maps a subject string to its theme.
///
/// The subject is trimmed and lower-cased, then matched against the theme keys,
/// then against the alias table by substring. Anything else gets the general theme.
///
/// # Arguments
///
/// * `subject` - Free-text subject, e.g. `"Maths"` or `" Year 4 Science "`.
///
/// # Returns
///
/// A reference into the static theme table. Never fails.
pub fn resolve_theme(subject: &str) -> &'static Theme {
    let normalized = subject.trim().to_lowercase();
    if normalized.is_empty() {
        return general_theme();
    }
    if let Some(theme) = theme_by_key(&normalized) {
        return theme;
    }
    for (alias, key) in SUBJECT_ALIASES {
        if normalized.contains(alias) {
            if let Some(theme) = theme_by_key(key) {
                debug!("Subject '{}' matched theme '{}' via alias '{}'", subject, key, alias);
                return theme;
            }
        }
    }
    debug!("No theme for subject '{}', using general", subject);
    general_theme()
}

/// [`resolve_theme`] for an optional subject. `None` gets the general theme.
pub fn resolve_theme_opt(subject: Option<&str>) -> &'static Theme {
    subject.map_or_else(general_theme, resolve_theme)
}
