/// The main storyboard pipeline: Scene text → prompt blocks.
///
/// Wires together scene parsing, moment selection, entity binding,
/// style application, prompt composition, and output formatting. The
/// pipeline is a pure function of its inputs: no I/O, no shared state,
/// and bit-identical output for identical inputs.
use std::path::Path;
use thiserror::Error;
use tracing::debug;

use crate::core::binder::EntityBinder;
use crate::core::composer::{ComposerLimits, CompositionError, PromptComposer};
use crate::core::formatter::{FormatError, OutputFormatter};
use crate::core::parser::{ParseError, SceneParser};
use crate::core::selector::{LexicalSalience, MomentSelector, SalienceScorer, SelectError};
use crate::core::style::StyleApplicator;
use crate::schema::character::{CharacterError, CharacterTable};
use crate::schema::prompt::Storyboard;
use crate::schema::style::{StyleError, StyleGuide};

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),
    #[error("selection error: {0}")]
    Select(#[from] SelectError),
    #[error("composition error: {0}")]
    Composition(#[from] CompositionError),
    #[error("formatting error: {0}")]
    Format(#[from] FormatError),
    #[error("character table error: {0}")]
    Character(#[from] CharacterError),
    #[error("style guide error: {0}")]
    Style(#[from] StyleError),
}

/// The top-level storyboard engine. Built via `StoryboardEngine::builder()`.
///
/// Holds the immutable character table, style guide, scorer, and
/// composer limits; each `compose` call constructs everything else
/// fresh and discards it afterward.
pub struct StoryboardEngine {
    characters: CharacterTable,
    style: StyleGuide,
    scorer: Box<dyn SalienceScorer>,
    limits: ComposerLimits,
}

/// Builder for constructing a `StoryboardEngine`.
pub struct StoryboardEngineBuilder {
    characters_path: Option<String>,
    style_path: Option<String>,
    /// Directly provided character table (for testing without files).
    characters: Option<CharacterTable>,
    /// Directly provided style guide (for testing without files).
    style: Option<StyleGuide>,
    scorer: Option<Box<dyn SalienceScorer>>,
    max_prompt_len: Option<usize>,
}

impl StoryboardEngine {
    pub fn builder() -> StoryboardEngineBuilder {
        StoryboardEngineBuilder {
            characters_path: None,
            style_path: None,
            characters: None,
            style: None,
            scorer: None,
            max_prompt_len: None,
        }
    }

    /// Run the full pipeline over one scene.
    ///
    /// Stage failures abort the scene and surface the originating
    /// error; binding warnings are accumulated and returned alongside
    /// the successful output.
    pub fn compose(&self, scene_text: &str) -> Result<Storyboard, PipelineError> {
        let scene = SceneParser::parse(scene_text, &self.characters)?;

        let selector = MomentSelector::new(self.scorer.as_ref());
        let moments = selector.select(&scene)?;

        let binder = EntityBinder::new(&self.characters);
        let style_clause = StyleApplicator::clause(&self.style);
        let composer = PromptComposer::new(self.limits.clone());

        let mut warnings = Vec::new();
        let mut composed = Vec::with_capacity(moments.len());
        for moment in moments {
            let cast = binder.bind(&moment, &mut warnings);
            let body = composer.compose(&scene, &moment, &cast, &style_clause)?;
            composed.push((moment, body));
        }

        let blocks = OutputFormatter::format(composed)?;
        debug!(
            blocks = blocks.len(),
            warnings = warnings.len(),
            "composed storyboard"
        );
        Ok(Storyboard { blocks, warnings })
    }
}

impl StoryboardEngineBuilder {
    pub fn characters_path(mut self, path: &str) -> Self {
        self.characters_path = Some(path.to_string());
        self
    }

    pub fn style_path(mut self, path: &str) -> Self {
        self.style_path = Some(path.to_string());
        self
    }

    /// Provide the character table directly (for testing without files).
    pub fn with_characters(mut self, characters: CharacterTable) -> Self {
        self.characters = Some(characters);
        self
    }

    /// Provide the style guide directly (for testing without files).
    pub fn with_style(mut self, style: StyleGuide) -> Self {
        self.style = Some(style);
        self
    }

    /// Override the default salience scorer.
    pub fn with_scorer(mut self, scorer: Box<dyn SalienceScorer>) -> Self {
        self.scorer = Some(scorer);
        self
    }

    /// Override the maximum prompt body length, in characters.
    pub fn max_prompt_len(mut self, len: usize) -> Self {
        self.max_prompt_len = Some(len);
        self
    }

    pub fn build(self) -> Result<StoryboardEngine, PipelineError> {
        let mut characters = self.characters.unwrap_or_default();
        if let Some(ref path) = self.characters_path {
            if Path::new(path).exists() {
                characters.load_from_ron(Path::new(path))?;
            }
        }

        let mut style = self.style.unwrap_or_default();
        if let Some(ref path) = self.style_path {
            if Path::new(path).exists() {
                style.load_from_ron(Path::new(path))?;
            }
        }

        let scorer = self
            .scorer
            .unwrap_or_else(|| Box::new(LexicalSalience::default()));
        let limits = ComposerLimits {
            max_body_len: self
                .max_prompt_len
                .unwrap_or(crate::core::composer::DEFAULT_MAX_BODY_LEN),
        };

        Ok(StoryboardEngine {
            characters,
            style,
            scorer,
            limits,
        })
    }
}
