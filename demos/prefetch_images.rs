use std::env;
use std::fs;

use lesson_deck_tools::images::parse_image_map;
use lesson_deck_tools::{
    prefetch_remote_images, write_deck, FsImageLoader, ImageMap, ImageStore, LessonContent,
    RenderConfig,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
    dotenvy::dotenv().ok();

    let mut args = env::args().skip(1);
    let lesson_path = args
        .next()
        .unwrap_or_else(|| "demos/data/sample_lesson.json".to_string());
    let lesson = LessonContent::from_json(&fs::read_to_string(&lesson_path)?)?;
    let image_map = match args.next() {
        Some(path) => parse_image_map(&fs::read_to_string(path)?)?,
        None => ImageMap::new(),
    };

    let config = RenderConfig::from_env();
    let mut store = ImageStore::new(FsImageLoader::new(config.uploads_root.clone()));
    let http_client = reqwest::Client::new();

    let summary = prefetch_remote_images(&lesson, &image_map, &http_client, &mut store).await;
    for url in &summary.failed {
        log::warn!("Will draw a placeholder for {}", url);
    }

    write_deck(&lesson, Some(&image_map), &store, &config, "lesson.pptx")?;
    log::info!(
        "Deck written to lesson.pptx with {} prefetched images",
        store.len()
    );
    Ok(())
}
