// src/models/image.rs

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Prefix of paths served from the application's upload directory.
pub const UPLOADS_PREFIX: &str = "/uploads/";

/// Where an image's bytes come from.
///
/// Built from the raw strings found in `selectedImages`, the image map or an
/// activity's `imageUrl`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind", content = "value")]
pub enum ImageRef {
    /// A file on the local filesystem.
    Local(PathBuf),
    /// A path under the uploads root, stored without the leading `/uploads/`.
    Upload(String),
    /// An `http(s)` URL.
    Remote(String),
    /// A `data:` URL. Kept so it can be reported; it is never decoded.
    Inline(String),
}

impl ImageRef {
    /// Classifies a raw reference string. Surrounding whitespace is ignored.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        let lower = raw.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            ImageRef::Remote(raw.to_string())
        } else if lower.starts_with("data:") {
            ImageRef::Inline(raw.to_string())
        } else if let Some(rest) = raw.strip_prefix(UPLOADS_PREFIX) {
            ImageRef::Upload(rest.to_string())
        } else {
            ImageRef::Local(PathBuf::from(raw))
        }
    }

    /// A short name used for placeholder labels and media file names.
    pub fn file_name(&self) -> String {
        let tail = match self {
            ImageRef::Local(path) => {
                return path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "image".to_string())
            }
            ImageRef::Upload(rest) => rest.as_str(),
            ImageRef::Remote(url) => url
                .split(['?', '#'])
                .next()
                .unwrap_or(url.as_str()),
            ImageRef::Inline(_) => return "inline image".to_string(),
        };
        tail.rsplit('/')
            .find(|s| !s.is_empty())
            .unwrap_or("image")
            .to_string()
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageRef::Local(path) => write!(f, "{}", path.display()),
            ImageRef::Upload(rest) => write!(f, "{UPLOADS_PREFIX}{rest}"),
            ImageRef::Remote(url) => f.write_str(url),
            ImageRef::Inline(_) => f.write_str("data:…"),
        }
    }
}

/// An image placed on a deck page.
/// The bytes are loaded only when the page is packaged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    pub source: ImageRef,
    /// Alternative text written into the package.
    #[serde(default)]
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_references() {
        assert_eq!(
            ImageRef::parse("https://img.example/a.png"),
            ImageRef::Remote("https://img.example/a.png".to_string())
        );
        assert_eq!(
            ImageRef::parse("/uploads/user1/a.png"),
            ImageRef::Upload("user1/a.png".to_string())
        );
        assert_eq!(
            ImageRef::parse(" /tmp/a.png "),
            ImageRef::Local(PathBuf::from("/tmp/a.png"))
        );
        assert!(matches!(
            ImageRef::parse("data:image/png;base64,AAAA"),
            ImageRef::Inline(_)
        ));
    }

    #[test]
    fn file_names_strip_query_and_directories() {
        assert_eq!(
            ImageRef::parse("https://cdn.example/x/photo.jpg?w=400").file_name(),
            "photo.jpg"
        );
        assert_eq!(ImageRef::parse("/uploads/u/diagram.png").file_name(), "diagram.png");
        assert_eq!(ImageRef::parse("/tmp/a.png").file_name(), "a.png");
    }

    #[test]
    fn display_restores_upload_prefix() {
        assert_eq!(
            ImageRef::parse("/uploads/u/a.png").to_string(),
            "/uploads/u/a.png"
        );
    }
}
