use std::env;
use std::fs;

use lesson_deck_tools::{
    write_deck, write_worksheet, FsImageLoader, ImageStore, LessonContent, RenderConfig,
};

const DEFAULT_LESSON: &str = "demos/data/sample_lesson.json";

fn main() -> anyhow::Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
    dotenvy::dotenv().ok();

    let lesson_path = env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_LESSON.to_string());
    log::info!("Loading lesson from {}", lesson_path);
    let lesson = LessonContent::from_json(&fs::read_to_string(&lesson_path)?)?;

    let config = RenderConfig::from_env();
    let loader = ImageStore::new(FsImageLoader::new(config.uploads_root.clone()));

    write_deck(&lesson, None, &loader, &config, "lesson.pptx")?;
    log::info!("Deck written to lesson.pptx");

    write_worksheet(
        &lesson,
        &lesson_deck_tools::images::NoImages,
        &loader,
        false,
        &config,
        "worksheet.docx",
    )?;
    write_worksheet(
        &lesson,
        &lesson_deck_tools::images::NoImages,
        &loader,
        true,
        &config,
        "worksheet_support.docx",
    )?;
    log::info!("Worksheets written to worksheet.docx and worksheet_support.docx");
    Ok(())
}
