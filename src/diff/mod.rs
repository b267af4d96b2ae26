//! Revision summaries between two assembled decks, computed on their Markdown
//! outlines.

pub mod comparer;
pub mod markdown;

pub use comparer::{Comparer, ComparerBuilder, ComparisonResult};

use crate::models::presentation::DeckPresentation;

/// Compares a regenerated deck against the previous version.
pub fn compare_decks(base: &DeckPresentation, revised: &DeckPresentation) -> ComparisonResult {
    Comparer::from_base(base).compare(revised)
}
