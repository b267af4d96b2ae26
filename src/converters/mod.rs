//! Output formats for assembled decks and composed worksheets.

pub mod docx;
pub mod markdown;
pub(crate) mod ooxml;
pub mod pptx;
pub mod svg;

pub use docx::write_docx;
pub use markdown::deck_to_markdown;
pub use pptx::write_pptx;
pub use svg::convert_deck_to_svg;
