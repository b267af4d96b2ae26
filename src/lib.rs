#[cfg(not(target_arch = "wasm32"))]
#[cfg(feature = "remote-images")]
pub mod client;

#[cfg(not(target_arch = "wasm32"))]
#[cfg(feature = "remote-images")]
pub use client::{fetch_image, prefetch_remote_images, PrefetchSummary};

pub mod config;
pub mod converters;
pub mod deck;
pub mod errors;
pub mod images;
pub mod layout;
pub mod models;
pub mod themes;
pub mod visual_formats;
pub mod worksheet;

pub use config::RenderConfig;
pub use converters::markdown;
pub use deck::{assemble_deck, build_deck, write_deck};
pub use errors::{RenderError, Result};
pub use images::{FsImageLoader, ImageMap, ImageStore};
pub use models::lesson::LessonContent;
pub use models::presentation::DeckPresentation;
pub use worksheet::{compose_worksheet, render_worksheet, write_worksheet};

// features
#[cfg(feature = "diff")]
pub mod diff;
#[cfg(feature = "diff")]
pub use diff::{compare_decks, ComparerBuilder};

use wasm_bindgen::prelude::*;

/// Installs the browser console logger and, when enabled, the panic hook.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    // A second init (e.g. module reloaded) keeps the first logger.
    let _ = console_log::init_with_level(log::Level::Info);
}

/// Renders a lesson deck from JSON and returns the `.pptx` bytes.
///
/// `image_map_json` may be omitted, `null` or an object of description to URL.
/// Images that cannot be loaded in the browser are drawn as placeholders.
#[wasm_bindgen(js_name = renderDeckPptx)]
pub fn render_deck_pptx(
    lesson_json: &str,
    image_map_json: Option<String>,
) -> std::result::Result<Vec<u8>, JsError> {
    let lesson = LessonContent::from_json(lesson_json)?;
    let image_map = match image_map_json.as_deref() {
        Some(json) => images::parse_image_map(json)?,
        None => ImageMap::new(),
    };
    let bytes = assemble_deck(
        &lesson,
        Some(&image_map),
        &ImageStore::default(),
        &RenderConfig::default(),
    )?;
    Ok(bytes)
}

/// Renders a lesson worksheet from JSON and returns the `.docx` bytes.
#[wasm_bindgen(js_name = renderWorksheetDocx)]
pub fn render_worksheet_docx(
    lesson_json: &str,
    support_mode: bool,
) -> std::result::Result<Vec<u8>, JsError> {
    let lesson = LessonContent::from_json(lesson_json)?;
    let bytes = render_worksheet(
        &lesson,
        &images::NoImages,
        &ImageStore::default(),
        support_mode,
        &RenderConfig::default(),
    )?;
    Ok(bytes)
}
