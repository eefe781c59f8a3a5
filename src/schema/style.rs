use serde::{Deserialize, Serialize};
use std::path::Path;

/// The category of a style directive. Rendering order is fixed:
/// technique → linework → palette → mood.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DirectiveCategory {
    Technique,
    Linework,
    Palette,
    Mood,
}

impl DirectiveCategory {
    /// The fixed order in which directive categories are rendered into
    /// a style clause.
    pub const RENDER_ORDER: [DirectiveCategory; 4] = [
        DirectiveCategory::Technique,
        DirectiveCategory::Linework,
        DirectiveCategory::Palette,
        DirectiveCategory::Mood,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Technique => "technique",
            Self::Linework => "linework",
            Self::Palette => "palette",
            Self::Mood => "mood",
        }
    }
}

/// A single style-guide entry: a category plus a short free-text phrase.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StyleDirective {
    pub category: DirectiveCategory,
    pub phrase: String,
}

/// A global visual style guide: an ordered list of directives applied
/// identically to every composed prompt.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StyleGuide {
    pub directives: Vec<StyleDirective>,
}

impl StyleGuide {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, category: DirectiveCategory, phrase: impl Into<String>) {
        self.directives.push(StyleDirective {
            category,
            phrase: phrase.into(),
        });
    }

    /// Phrases for one category, in guide order.
    pub fn phrases_for(&self, category: DirectiveCategory) -> impl Iterator<Item = &str> {
        self.directives
            .iter()
            .filter(move |d| d.category == category)
            .map(|d| d.phrase.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.directives.is_empty()
    }

    /// Load directives from a RON file containing a list of
    /// (category, phrase) entries.
    pub fn load_from_ron(&mut self, path: &Path) -> Result<(), StyleError> {
        let contents = std::fs::read_to_string(path)?;
        let directives: Vec<StyleDirective> = ron::from_str(&contents)?;
        self.directives.extend(directives);
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StyleError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON deserialization error: {0}")]
    Ron(#[from] ron::error::SpannedError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phrases_for_preserves_guide_order() {
        let mut guide = StyleGuide::new();
        guide.push(DirectiveCategory::Palette, "muted earth tones");
        guide.push(DirectiveCategory::Palette, "cold blue shadows");
        let phrases: Vec<&str> = guide.phrases_for(DirectiveCategory::Palette).collect();
        assert_eq!(phrases, vec!["muted earth tones", "cold blue shadows"]);
    }

    #[test]
    fn phrases_for_filters_category() {
        let mut guide = StyleGuide::new();
        guide.push(DirectiveCategory::Technique, "ink and wash");
        guide.push(DirectiveCategory::Mood, "melancholy");
        let phrases: Vec<&str> = guide.phrases_for(DirectiveCategory::Technique).collect();
        assert_eq!(phrases, vec!["ink and wash"]);
    }

    #[test]
    fn category_labels() {
        assert_eq!(DirectiveCategory::Technique.label(), "technique");
        assert_eq!(DirectiveCategory::Linework.label(), "linework");
        assert_eq!(DirectiveCategory::Palette.label(), "palette");
        assert_eq!(DirectiveCategory::Mood.label(), "mood");
    }

    #[test]
    fn load_test_style_from_ron() {
        let path = std::path::PathBuf::from("tests/fixtures/style.ron");
        let mut guide = StyleGuide::new();
        guide.load_from_ron(&path).unwrap();
        assert_eq!(guide.directives.len(), 2);
        let techniques: Vec<&str> = guide.phrases_for(DirectiveCategory::Technique).collect();
        assert_eq!(techniques, vec!["ink and wash"]);
    }
}
