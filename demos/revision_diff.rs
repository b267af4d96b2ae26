use std::env;
use std::fs;

use lesson_deck_tools::{build_deck, ComparerBuilder, LessonContent, RenderConfig};

fn main() -> anyhow::Result<()> {
    env_logger::builder()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let mut args = env::args().skip(1);
    let base_path = args
        .next()
        .unwrap_or_else(|| "demos/data/sample_lesson.json".to_string());
    let base_lesson = LessonContent::from_json(&fs::read_to_string(&base_path)?)?;

    // Without a second lesson, regenerate the last slide to show a revision.
    let revised_lesson = match args.next() {
        Some(path) => LessonContent::from_json(&fs::read_to_string(path)?)?,
        None => {
            let mut revised = base_lesson.clone();
            if let Some(last) = revised.slides.last_mut() {
                last.content = "Draw the water cycle from memory and label every arrow.".into();
            }
            revised
        }
    };

    let config = RenderConfig::from_env();
    let no_images = lesson_deck_tools::images::NoImages;
    let base = build_deck(&base_lesson, &no_images, &config.font_face)?;
    let revised = build_deck(&revised_lesson, &no_images, &config.font_face)?;

    let comparer = ComparerBuilder::new().set_base(base).build()?;
    let result = comparer.compare(&revised);
    log::info!(
        "+{} -{} lines, pages changed: {:?}",
        result.lines_added(),
        result.lines_removed(),
        result.changed_pages()
    );

    if result.has_changes() {
        fs::write("deck_changes.md", result.get_readable_diff())?;
        log::info!("Report written to deck_changes.md");
    } else {
        log::info!("No changes between the two decks");
    }
    Ok(())
}
