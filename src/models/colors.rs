use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// An RGB color.
///
/// Serialized as a six-digit uppercase hex string without a leading `#`
/// (`"8B4513"`), which is the form both OOXML parts and the lesson themes use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RgbColor {
    pub red: u8,
    pub green: u8,
    pub blue: u8,
}

impl RgbColor {
    /// Builds a color from a packed `0xRRGGBB` literal.
    pub const fn hex(value: u32) -> Self {
        Self {
            red: ((value >> 16) & 0xFF) as u8,
            green: ((value >> 8) & 0xFF) as u8,
            blue: (value & 0xFF) as u8,
        }
    }

    /// Parses `"RRGGBB"` or `"#RRGGBB"`. Returns `None` for anything else.
    pub fn parse(s: &str) -> Option<Self> {
        let digits = s.trim().trim_start_matches('#');
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        u32::from_str_radix(digits, 16).ok().map(Self::hex)
    }

    /// Uppercase hex without `#`, e.g. `"FF6F00"`.
    pub fn to_hex(&self) -> String {
        format!("{:02X}{:02X}{:02X}", self.red, self.green, self.blue)
    }

    /// CSS form, e.g. `"#ff6f00"`.
    pub fn to_css(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.red, self.green, self.blue)
    }
}

impl fmt::Display for RgbColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for RgbColor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for RgbColor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        RgbColor::parse(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid hex color '{raw}'")))
    }
}

/// A solid fill. `alpha` runs from 0.0 (fully transparent) to 1.0 (opaque).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolidFill {
    pub color: RgbColor,
    pub alpha: f64,
}

impl SolidFill {
    pub const fn opaque(color: RgbColor) -> Self {
        Self { color, alpha: 1.0 }
    }

    pub const fn translucent(color: RgbColor, alpha: f64) -> Self {
        Self { color, alpha }
    }
}

/// Commonly used fixed colors that are not part of a subject theme.
pub mod palette {
    use super::RgbColor;

    pub const WHITE: RgbColor = RgbColor::hex(0xFFFFFF);
    pub const BLACK: RgbColor = RgbColor::hex(0x000000);
    pub const NOTE_BAND: RgbColor = RgbColor::hex(0x9E9E9E);
    pub const WARNING: RgbColor = RgbColor::hex(0xF59E0B);
    pub const PURPLE: RgbColor = RgbColor::hex(0x7E57C2);
    pub const SUPPORT_PANEL: RgbColor = RgbColor::hex(0xE3F2FD);
    pub const STRETCH_PANEL: RgbColor = RgbColor::hex(0xFFF3E0);
    pub const HELP_GREEN: RgbColor = RgbColor::hex(0x4CAF50);
    pub const HELP_GREEN_TINT: RgbColor = RgbColor::hex(0xE8F5E9);
    pub const CHALLENGE_RED: RgbColor = RgbColor::hex(0xF44336);
    pub const MUTED_TEXT: RgbColor = RgbColor::hex(0x666666);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_with_and_without_hash() {
        assert_eq!(RgbColor::parse("8B4513"), Some(RgbColor::hex(0x8B4513)));
        assert_eq!(RgbColor::parse("#8b4513"), Some(RgbColor::hex(0x8B4513)));
        assert_eq!(RgbColor::parse("8B45"), None);
        assert_eq!(RgbColor::parse("GGGGGG"), None);
    }

    #[test]
    fn formats_hex_and_css() {
        let c = RgbColor::hex(0xFF6F00);
        assert_eq!(c.to_hex(), "FF6F00");
        assert_eq!(c.to_css(), "#ff6f00");
    }

    #[test]
    fn serde_uses_hex_strings() {
        let json = serde_json::to_string(&RgbColor::hex(0x2E7D32)).unwrap();
        assert_eq!(json, "\"2E7D32\"");
        let back: RgbColor = serde_json::from_str("\"#2e7d32\"").unwrap();
        assert_eq!(back, RgbColor::hex(0x2E7D32));
    }
}
