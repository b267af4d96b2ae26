//! Image resolution and loading.
//!
//! Resolution turns a slide's selections or suggestions into an ordered list of
//! [`ImageRef`]s. Loading turns a reference into bytes that can be embedded in a
//! package, and happens only when a deck or worksheet is serialized.

use indexmap::IndexMap;
use log::debug;
use std::collections::HashMap;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use crate::errors::{RenderError, Result};
use crate::models::image::ImageRef;
use crate::models::lesson::{ActivityItem, LessonContent, SlideSpec};

/// Images shown on one content page, at most.
pub const MAX_SLIDE_IMAGES: usize = 4;

/// Description to path-or-URL mapping supplied by the image sourcing step.
/// Iteration order is insertion order.
pub type ImageMap = IndexMap<String, String>;

/// Parses an image map from JSON. `null` and an empty string give an empty map.
pub fn parse_image_map(json: &str) -> Result<ImageMap> {
    let trimmed = json.trim();
    if trimmed.is_empty() || trimmed == "null" {
        return Ok(ImageMap::new());
    }
    Ok(serde_json::from_str(trimmed)?)
}

// --- Resolution ---

/// Looks up an image by its description.
pub trait ImageResolver {
    fn resolve(&self, description: &str) -> Option<ImageRef>;
}

impl ImageResolver for ImageMap {
    fn resolve(&self, description: &str) -> Option<ImageRef> {
        self.get(description)
            .filter(|path| !path.trim().is_empty())
            .map(|path| ImageRef::parse(path))
    }
}

impl<T: ImageResolver + ?Sized> ImageResolver for &T {
    fn resolve(&self, description: &str) -> Option<ImageRef> {
        (**self).resolve(description)
    }
}

impl<T: ImageResolver> ImageResolver for Option<T> {
    fn resolve(&self, description: &str) -> Option<ImageRef> {
        self.as_ref().and_then(|r| r.resolve(description))
    }
}

/// A resolver that never finds anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoImages;

impl ImageResolver for NoImages {
    fn resolve(&self, _description: &str) -> Option<ImageRef> {
        None
    }
}

/// Resolves the images of one content slide.
///
/// Non-blank `selected_images` win and are used verbatim, in order. Otherwise each
/// suggestion is looked up and the hits are kept in suggestion order. The two
/// sources are never merged. Either way the list is cut at [`MAX_SLIDE_IMAGES`].
pub fn resolve_slide_images<R: ImageResolver + ?Sized>(
    slide: &SlideSpec,
    resolver: &R,
) -> Vec<ImageRef> {
    let selected: Vec<ImageRef> = slide
        .selected_images
        .iter()
        .flatten()
        .filter(|s| !s.trim().is_empty())
        .take(MAX_SLIDE_IMAGES)
        .map(|s| ImageRef::parse(s))
        .collect();
    if !selected.is_empty() {
        return selected;
    }

    slide
        .image_suggestions
        .iter()
        .filter_map(|description| {
            let found = resolver.resolve(description);
            if found.is_none() {
                debug!("No image found for suggestion '{}'", description);
            }
            found
        })
        .take(MAX_SLIDE_IMAGES)
        .collect()
}

/// Resolves the image shown at the top of a worksheet activity.
///
/// A direct `image_url` wins; otherwise the first described image that resolves.
pub fn resolve_activity_image<R: ImageResolver + ?Sized>(
    activity: &ActivityItem,
    resolver: &R,
) -> Option<(ImageRef, String)> {
    if let Some(url) = activity.image_url.as_deref().filter(|u| !u.trim().is_empty()) {
        return Some((ImageRef::parse(url), activity.title.clone()));
    }
    activity
        .images
        .iter()
        .flatten()
        .find_map(|img| {
            resolver
                .resolve(&img.description)
                .map(|r| (r, img.description.clone()))
        })
}

// --- Loading ---

/// Formats that can be embedded as-is. Anything else decodable is converted to PNG.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EmbedFormat {
    Png,
    Jpeg,
    Gif,
}

impl EmbedFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            EmbedFormat::Png => "png",
            EmbedFormat::Jpeg => "jpeg",
            EmbedFormat::Gif => "gif",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            EmbedFormat::Png => "image/png",
            EmbedFormat::Jpeg => "image/jpeg",
            EmbedFormat::Gif => "image/gif",
        }
    }
}

/// Image bytes ready for embedding, with their pixel size.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedImage {
    pub bytes: Vec<u8>,
    pub format: EmbedFormat,
    pub width: u32,
    pub height: u32,
}

impl LoadedImage {
    /// Sniffs the format of `bytes` and reads the pixel size.
    ///
    /// PNG, JPEG and GIF are kept byte for byte. BMP and WebP are decoded and
    /// re-encoded as PNG. Anything else is an error.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        let detected = image::guess_format(&bytes)
            .map_err(|e| RenderError::Image(format!("Unrecognised image data: {e}")))?;

        let format = match detected {
            image::ImageFormat::Png => EmbedFormat::Png,
            image::ImageFormat::Jpeg => EmbedFormat::Jpeg,
            image::ImageFormat::Gif => EmbedFormat::Gif,
            image::ImageFormat::Bmp | image::ImageFormat::WebP => {
                return Self::reencode_png(&bytes);
            }
            other => {
                return Err(RenderError::Image(format!(
                    "Unsupported image format: {other:?}"
                )))
            }
        };

        let (width, height) = image::ImageReader::new(Cursor::new(&bytes))
            .with_guessed_format()?
            .into_dimensions()
            .map_err(|e| RenderError::Image(format!("Failed to read image size: {e}")))?;

        Ok(Self {
            bytes,
            format,
            width,
            height,
        })
    }

    fn reencode_png(bytes: &[u8]) -> Result<Self> {
        let decoded = image::load_from_memory(bytes)
            .map_err(|e| RenderError::Image(format!("Failed to decode image: {e}")))?;
        let mut png_bytes = Vec::new();
        decoded
            .write_to(&mut Cursor::new(&mut png_bytes), image::ImageFormat::Png)
            .map_err(|e| RenderError::Image(format!("Failed to encode PNG: {e}")))?;
        Ok(Self {
            bytes: png_bytes,
            format: EmbedFormat::Png,
            width: decoded.width(),
            height: decoded.height(),
        })
    }

    /// Width over height, or `None` for a degenerate image.
    pub fn aspect_ratio(&self) -> Option<f64> {
        (self.width > 0 && self.height > 0).then(|| self.width as f64 / self.height as f64)
    }
}

/// Produces embeddable bytes for an image reference.
pub trait ImageLoader {
    fn load(&self, source: &ImageRef) -> Result<LoadedImage>;
}

impl<T: ImageLoader + ?Sized> ImageLoader for &T {
    fn load(&self, source: &ImageRef) -> Result<LoadedImage> {
        (**self).load(source)
    }
}

/// Loads local files and `/uploads/...` paths from disk.
///
/// Remote URLs are not fetched here; see [`ImageStore`] for prefetched ones.
#[derive(Debug, Clone, Default)]
pub struct FsImageLoader {
    uploads_root: Option<PathBuf>,
}

impl FsImageLoader {
    /// `uploads_root` is the directory `/uploads/...` references live under.
    /// Without it they are resolved against the working directory.
    pub fn new(uploads_root: Option<PathBuf>) -> Self {
        Self { uploads_root }
    }

    fn upload_path(&self, rest: &str) -> PathBuf {
        match &self.uploads_root {
            Some(root) => root.join(rest),
            None => Path::new("uploads").join(rest),
        }
    }
}

impl ImageLoader for FsImageLoader {
    fn load(&self, source: &ImageRef) -> Result<LoadedImage> {
        let path = match source {
            ImageRef::Local(path) => path.clone(),
            ImageRef::Upload(rest) => self.upload_path(rest),
            ImageRef::Remote(url) => {
                return Err(RenderError::Image(format!(
                    "Remote image was not prefetched: {url}"
                )))
            }
            ImageRef::Inline(_) => {
                return Err(RenderError::Image(
                    "Inline data URLs are not supported".to_string(),
                ))
            }
        };
        debug!("Loading image from {}", path.display());
        LoadedImage::from_bytes(std::fs::read(&path)?)
    }
}

/// Images fetched ahead of rendering, keyed by URL, with a filesystem fallback
/// for everything else.
#[derive(Debug, Clone, Default)]
pub struct ImageStore {
    remote: HashMap<String, LoadedImage>,
    fallback: FsImageLoader,
}

impl ImageStore {
    pub fn new(fallback: FsImageLoader) -> Self {
        Self {
            remote: HashMap::new(),
            fallback,
        }
    }

    pub fn insert(&mut self, url: impl Into<String>, image: LoadedImage) {
        self.remote.insert(url.into(), image);
    }

    pub fn contains(&self, url: &str) -> bool {
        self.remote.contains_key(url)
    }

    /// Number of prefetched remote images.
    pub fn len(&self) -> usize {
        self.remote.len()
    }

    pub fn is_empty(&self) -> bool {
        self.remote.is_empty()
    }
}

impl ImageLoader for ImageStore {
    fn load(&self, source: &ImageRef) -> Result<LoadedImage> {
        match source {
            ImageRef::Remote(url) => self.remote.get(url).cloned().ok_or_else(|| {
                RenderError::Image(format!("Remote image was not prefetched: {url}"))
            }),
            other => self.fallback.load(other),
        }
    }
}

/// Every remote URL a lesson's deck and worksheet could show, deduplicated, in
/// first-use order.
pub fn remote_references<R: ImageResolver + ?Sized>(
    lesson: &LessonContent,
    resolver: &R,
) -> Vec<String> {
    let mut seen = indexmap::IndexSet::new();
    let slide_refs = lesson
        .slides
        .iter()
        .flat_map(|slide| resolve_slide_images(slide, resolver));
    let activity_refs = lesson
        .activities()
        .iter()
        .filter_map(|a| resolve_activity_image(a, resolver).map(|(r, _)| r));
    for reference in slide_refs.chain(activity_refs) {
        if let ImageRef::Remote(url) = reference {
            seen.insert(url);
        }
    }
    seen.into_iter().collect()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::lesson::ActivityImage;
    use pretty_assertions::assert_eq;

    /// A small PNG for tests that need real image bytes.
    pub(crate) fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = image::RgbImage::new(width, height);
        let mut out = Vec::new();
        img.write_to(&mut Cursor::new(&mut out), image::ImageFormat::Png)
            .unwrap();
        out
    }

    fn map(pairs: &[(&str, &str)]) -> ImageMap {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn slide(suggestions: &[&str], selected: Option<&[&str]>) -> SlideSpec {
        SlideSpec {
            title: "Hook".into(),
            image_suggestions: suggestions.iter().map(|s| s.to_string()).collect(),
            selected_images: selected.map(|s| s.iter().map(|x| x.to_string()).collect()),
            ..Default::default()
        }
    }

    #[test]
    fn selected_images_win_over_suggestions() {
        let images = map(&[("a", "/tmp/a.png")]);
        let s = slide(&["a"], Some(&["https://x/1.png", "/uploads/u/2.png"]));
        let resolved = resolve_slide_images(&s, &images);
        assert_eq!(
            resolved,
            vec![
                ImageRef::Remote("https://x/1.png".into()),
                ImageRef::Upload("u/2.png".into())
            ]
        );
    }

    #[test]
    fn suggestions_keep_order_and_skip_misses() {
        let images = map(&[("b", "/tmp/b.png"), ("a", "/tmp/a.png")]);
        let s = slide(&["a", "missing", "b"], Some(&[]));
        let resolved = resolve_slide_images(&s, &images);
        assert_eq!(
            resolved,
            vec![
                ImageRef::Local("/tmp/a.png".into()),
                ImageRef::Local("/tmp/b.png".into())
            ]
        );
    }

    #[test]
    fn resolution_is_capped() {
        let s = slide(&[], Some(&["1", "2", "3", "4", "5", "6"]));
        assert_eq!(resolve_slide_images(&s, &NoImages).len(), MAX_SLIDE_IMAGES);
    }

    #[test]
    fn missing_map_resolves_nothing() {
        let none: Option<&ImageMap> = None;
        assert!(resolve_slide_images(&slide(&["a"], None), &none).is_empty());
    }

    #[test]
    fn activity_image_prefers_direct_url() {
        let images = map(&[("volcano", "/tmp/v.png")]);
        let mut activity = ActivityItem {
            title: "Volcanoes".into(),
            images: Some(vec![ActivityImage {
                description: "volcano".into(),
                placement: None,
            }]),
            ..Default::default()
        };
        assert_eq!(
            resolve_activity_image(&activity, &images).map(|(r, _)| r),
            Some(ImageRef::Local("/tmp/v.png".into()))
        );
        activity.image_url = Some("https://x/v.jpg".into());
        assert_eq!(
            resolve_activity_image(&activity, &images).map(|(r, _)| r),
            Some(ImageRef::Remote("https://x/v.jpg".into()))
        );
    }

    #[test]
    fn image_map_parses_null_as_empty() {
        assert!(parse_image_map("null").unwrap().is_empty());
        let parsed = parse_image_map(r#"{"habitat diagram": "/tmp/a.png"}"#).unwrap();
        assert_eq!(parsed.get("habitat diagram").map(String::as_str), Some("/tmp/a.png"));
    }

    #[test]
    fn png_is_kept_and_measured() {
        let loaded = LoadedImage::from_bytes(png_bytes(4, 2)).unwrap();
        assert_eq!(loaded.format, EmbedFormat::Png);
        assert_eq!((loaded.width, loaded.height), (4, 2));
        assert_eq!(loaded.aspect_ratio(), Some(2.0));
    }

    #[test]
    fn bmp_is_converted_to_png() {
        let img = image::RgbImage::new(3, 3);
        let mut bmp = Vec::new();
        img.write_to(&mut Cursor::new(&mut bmp), image::ImageFormat::Bmp)
            .unwrap();
        let loaded = LoadedImage::from_bytes(bmp).unwrap();
        assert_eq!(loaded.format, EmbedFormat::Png);
        assert_eq!(image::guess_format(&loaded.bytes).unwrap(), image::ImageFormat::Png);
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(matches!(
            LoadedImage::from_bytes(b"not an image".to_vec()),
            Err(RenderError::Image(_))
        ));
    }

    #[test]
    fn fs_loader_reads_uploads_under_root() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("u")).unwrap();
        std::fs::write(dir.path().join("u/pic.png"), png_bytes(2, 2)).unwrap();

        let loader = FsImageLoader::new(Some(dir.path().to_path_buf()));
        let loaded = loader.load(&ImageRef::parse("/uploads/u/pic.png")).unwrap();
        assert_eq!(loaded.width, 2);
        assert!(loader.load(&ImageRef::parse("https://x/y.png")).is_err());
    }

    #[test]
    fn store_serves_prefetched_urls() {
        let mut store = ImageStore::default();
        store.insert(
            "https://x/y.png",
            LoadedImage::from_bytes(png_bytes(1, 1)).unwrap(),
        );
        assert!(store.load(&ImageRef::parse("https://x/y.png")).is_ok());
        assert!(store.load(&ImageRef::parse("https://x/z.png")).is_err());
    }

    #[test]
    fn remote_references_are_unique() {
        let lesson = LessonContent {
            slides: vec![
                slide(&[], Some(&["https://x/1.png", "/tmp/a.png"])),
                slide(&[], Some(&["https://x/1.png", "https://x/2.png"])),
            ],
            ..Default::default()
        };
        assert_eq!(
            remote_references(&lesson, &NoImages),
            vec!["https://x/1.png".to_string(), "https://x/2.png".to_string()]
        );
    }
}
