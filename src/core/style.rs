/// Style application — merges the global style guide into one
/// deterministic clause per prompt.
use crate::schema::style::{DirectiveCategory, StyleGuide};

pub struct StyleApplicator;

impl StyleApplicator {
    /// Concatenate guide phrases in the fixed category order
    /// (technique → linework → palette → mood), preserving guide order
    /// within each category. No randomness, no content-based reordering.
    pub fn clause(guide: &StyleGuide) -> String {
        let mut phrases: Vec<&str> = Vec::new();
        for category in DirectiveCategory::RENDER_ORDER {
            phrases.extend(guide.phrases_for(category));
        }
        phrases.join(", ")
    }
}
