use crate::errors::{RenderError, Result};
use crate::images::{remote_references, ImageResolver, ImageStore, LoadedImage};
use crate::models::lesson::LessonContent;
use log::{debug, info, warn};
use reqwest::header::ACCEPT;

/// Outcome of a prefetch run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrefetchSummary {
    /// URLs downloaded and stored.
    pub fetched: usize,
    /// URLs already in the store before the run.
    pub cached: usize,
    /// URLs that could not be downloaded or decoded. Pages showing them get a
    /// placeholder frame.
    pub failed: Vec<String>,
}

/// Downloads one image and sniffs its format.
///
/// # Arguments
///
/// * `url` - An `http(s)` image URL.
/// * `http_client` - An asynchronous `reqwest::Client` instance.
///
/// # Errors
///
/// Returns `RenderError::Network` when the request cannot be sent,
/// `RenderError::ImageFetch` for non-2xx responses and `RenderError::Image` when
/// the body is not a supported image.
pub async fn fetch_image(url: &str, http_client: &reqwest::Client) -> Result<LoadedImage> {
    if url.trim().is_empty() {
        return Err(RenderError::InvalidInput(
            "Image URL cannot be empty".to_string(),
        ));
    }

    let response = http_client
        .get(url)
        .header(ACCEPT, "image/*")
        .send()
        .await
        .map_err(RenderError::Network)?;

    let status = response.status();
    if !status.is_success() {
        return Err(RenderError::ImageFetch {
            status: status.as_u16(),
            url: url.to_string(),
        });
    }

    let bytes = response.bytes().await.map_err(RenderError::Network)?;
    debug!("Fetched {} bytes from {}", bytes.len(), url);
    LoadedImage::from_bytes(bytes.to_vec())
}

/// Downloads every remote image a lesson's deck and worksheet can show into
/// `store`, one URL at a time.
///
/// Failures are logged and skipped; rendering later draws a placeholder for them.
/// URLs already in the store are not fetched again.
pub async fn prefetch_remote_images<R: ImageResolver + ?Sized>(
    lesson: &LessonContent,
    resolver: &R,
    http_client: &reqwest::Client,
    store: &mut ImageStore,
) -> PrefetchSummary {
    let mut summary = PrefetchSummary::default();

    for url in remote_references(lesson, resolver) {
        if store.contains(&url) {
            summary.cached += 1;
            continue;
        }
        match fetch_image(&url, http_client).await {
            Ok(image) => {
                store.insert(url, image);
                summary.fetched += 1;
            }
            Err(e) => {
                warn!("Skipping remote image {}: {}", url, e);
                summary.failed.push(url);
            }
        }
    }

    info!(
        "Prefetched {} remote images ({} cached, {} failed)",
        summary.fetched,
        summary.cached,
        summary.failed.len()
    );
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::images::NoImages;
    use crate::models::lesson::SlideSpec;
    use pretty_assertions::assert_eq;

    fn lesson_with_images(urls: &[&str]) -> LessonContent {
        LessonContent {
            title: "Maps".into(),
            slides: vec![SlideSpec {
                title: "Where".into(),
                selected_images: Some(urls.iter().map(|u| u.to_string()).collect()),
                ..Default::default()
            }],
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn local_images_are_not_fetched() {
        let lesson = lesson_with_images(&["/uploads/map.png", "/tmp/b.png"]);
        let mut store = ImageStore::default();
        let summary =
            prefetch_remote_images(&lesson, &NoImages, &reqwest::Client::new(), &mut store).await;
        assert_eq!(summary, PrefetchSummary::default());
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn unusable_urls_are_skipped() {
        let lesson = lesson_with_images(&["http://[not-a-host/x.png"]);
        let mut store = ImageStore::default();
        let summary =
            prefetch_remote_images(&lesson, &NoImages, &reqwest::Client::new(), &mut store).await;
        assert_eq!(summary.fetched, 0);
        assert_eq!(summary.failed, vec!["http://[not-a-host/x.png".to_string()]);
    }

    #[tokio::test]
    async fn empty_url_is_invalid_input() {
        let err = fetch_image("  ", &reqwest::Client::new()).await.unwrap_err();
        assert!(matches!(err, RenderError::InvalidInput(_)));
    }
}
