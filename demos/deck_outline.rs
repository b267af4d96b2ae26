use std::env;
use std::fs;

use lesson_deck_tools::{build_deck, markdown::deck_to_markdown, LessonContent, RenderConfig};

fn main() -> anyhow::Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let lesson_path = env::args()
        .nth(1)
        .unwrap_or_else(|| "demos/data/sample_lesson.json".to_string());
    let lesson = LessonContent::from_json(&fs::read_to_string(&lesson_path)?)?;

    let config = RenderConfig::from_env();
    let deck = build_deck(&lesson, &lesson_deck_tools::images::NoImages, &config.font_face)?;
    log::info!("Built {} pages for \"{}\"", deck.slides.len(), lesson.title);
    for (i, page) in deck.slides.iter().enumerate() {
        log::debug!(
            "Page {} ({}): {} shapes, {} images",
            i + 1,
            page.object_id,
            page.shape_count(),
            page.images().count()
        );
    }

    println!("{}", deck_to_markdown(&deck));
    Ok(())
}
