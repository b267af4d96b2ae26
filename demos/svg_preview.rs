use std::env;
use std::fs;

use lesson_deck_tools::converters::convert_deck_to_svg;
use lesson_deck_tools::{build_deck, ImageMap, LessonContent, RenderConfig};

fn main() -> anyhow::Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let lesson_path = env::args()
        .nth(1)
        .unwrap_or_else(|| "demos/data/sample_lesson.json".to_string());
    log::info!("Loading lesson from {}", lesson_path);
    let lesson = LessonContent::from_json(&fs::read_to_string(&lesson_path)?)?;

    // Optional second argument: a JSON object mapping image descriptions to URLs.
    let image_map = match env::args().nth(2) {
        Some(path) => lesson_deck_tools::images::parse_image_map(&fs::read_to_string(path)?)?,
        None => ImageMap::new(),
    };

    let config = RenderConfig::from_env();
    let deck = build_deck(&lesson, &image_map, &config.font_face)?;
    let pages = convert_deck_to_svg(&deck)?;
    log::info!("Converted {} pages to SVG", pages.len());

    fs::create_dir_all("preview")?;
    for (i, svg) in pages.iter().enumerate() {
        let output_path = format!("preview/page_{}.svg", i + 1);
        fs::write(&output_path, svg)?;
        log::debug!("Page {} saved to {}", i + 1, output_path);
    }
    log::info!("Preview written to preview/");
    Ok(())
}
