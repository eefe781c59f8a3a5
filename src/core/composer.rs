/// Prompt composition — assembles one structured prompt body per moment.
///
/// Section order is fixed: shot framing → character descriptions →
/// background recap → setting cues → action line → style clause. Under
/// a tight length budget, background detail is dropped first, then
/// setting, then framing; character descriptors and the style clause
/// are never dropped.
use thiserror::Error;
use tracing::debug;

use crate::core::binder::Binding;
use crate::schema::moment::Moment;
use crate::schema::scene::{BeatKind, Scene};

/// Default maximum prompt body length, in characters.
pub const DEFAULT_MAX_BODY_LEN: usize = 800;

/// Location nouns recognized as setting cues.
const SETTING_CUES: &[&str] = &[
    "bridge", "gap", "edge", "cliff", "tower", "castle", "forest", "river", "street", "alley",
    "rooftop", "hall", "room", "doorway", "window", "stair", "stairs", "cave", "field",
    "courtyard", "gate", "wall", "ruins", "shore", "dock", "market", "temple", "chasm",
    "balcony", "ceiling", "floor", "pillar", "rampart", "slope",
];

#[derive(Debug, Error)]
pub enum CompositionError {
    #[error(
        "prompt body needs {required} characters for its required sections, budget is {limit}"
    )]
    BudgetExceeded { required: usize, limit: usize },
}

#[derive(Debug, Clone)]
pub struct ComposerLimits {
    pub max_body_len: usize,
}

impl Default for ComposerLimits {
    fn default() -> Self {
        Self {
            max_body_len: DEFAULT_MAX_BODY_LEN,
        }
    }
}

pub struct PromptComposer {
    limits: ComposerLimits,
}

impl PromptComposer {
    pub fn new(limits: ComposerLimits) -> Self {
        Self { limits }
    }

    /// Compose the prompt body for one moment.
    pub fn compose(
        &self,
        scene: &Scene,
        moment: &Moment,
        cast: &[Binding<'_>],
        style_clause: &str,
    ) -> Result<String, CompositionError> {
        let beat = &scene.beats[moment.beat_index];

        let framing = framing_line(beat.kind, cast.len());
        let characters: Vec<String> = cast.iter().map(describe).collect();
        let background = if moment.beat_index > 0 {
            let previous = &scene.beats[moment.beat_index - 1];
            Some(format!("Moments before: {}", previous.summary()))
        } else {
            None
        };
        let setting = setting_line(scene, moment.beat_index);
        let action = format!("Action: {}", beat.one_line());
        let style = if style_clause.is_empty() {
            None
        } else {
            Some(format!("Style: {}.", style_clause))
        };

        // Optional sections, in the order they get dropped under budget
        // pressure: background, then setting, then framing.
        let mut keep_background = background.is_some();
        let mut keep_setting = setting.is_some();
        let mut keep_framing = true;

        loop {
            let mut sections: Vec<&str> = Vec::new();
            if keep_framing {
                sections.push(&framing);
            }
            sections.extend(characters.iter().map(|c| c.as_str()));
            if keep_background {
                sections.push(background.as_deref().unwrap_or_default());
            }
            if keep_setting {
                sections.push(setting.as_deref().unwrap_or_default());
            }
            sections.push(&action);
            if let Some(ref style) = style {
                sections.push(style);
            }

            let body = sections.join(" ");
            let length = body.chars().count();
            if length <= self.limits.max_body_len {
                return Ok(body);
            }
            if keep_background {
                keep_background = false;
                debug!(beat = moment.beat_index, "dropped background to fit budget");
            } else if keep_setting {
                keep_setting = false;
                debug!(beat = moment.beat_index, "dropped setting to fit budget");
            } else if keep_framing {
                keep_framing = false;
                debug!(beat = moment.beat_index, "dropped framing to fit budget");
            } else {
                return Err(CompositionError::BudgetExceeded {
                    required: length,
                    limit: self.limits.max_body_len,
                });
            }
        }
    }
}

/// Shot framing derived from the beat kind and cast size.
fn framing_line(kind: BeatKind, cast_size: usize) -> String {
    let line = match (kind, cast_size) {
        (BeatKind::Dialogue, 0 | 1) => "Close-up, expressive framing.",
        (BeatKind::Dialogue, _) => "Medium shot, characters facing each other.",
        (BeatKind::Action, 0) => "Establishing wide shot.",
        (BeatKind::Action, 1) => "Dynamic medium shot.",
        (BeatKind::Action, _) => "Wide action shot.",
    };
    line.to_string()
}

/// One character description sentence. Canonical descriptors are used
/// verbatim; placeholders get a generic figure description.
fn describe(binding: &Binding<'_>) -> String {
    match binding {
        Binding::Canonical(character) => {
            let mut line = character.name.clone();
            if !character.appearance.is_empty() {
                line.push_str(": ");
                line.push_str(&character.appearance_clause());
            }
            if !character.signature_traits.is_empty() {
                line.push_str("; ");
                line.push_str(&character.signature_traits.join(", "));
            }
            line.push('.');
            line
        }
        Binding::Placeholder { mention } => {
            format!("{mention}: an unidentified figure.")
        }
    }
}

/// Setting cues observed in the scene up to and including the moment's
/// beat, in order of first appearance.
fn setting_line(scene: &Scene, upto: usize) -> Option<String> {
    let mut cues: Vec<&str> = Vec::new();
    for beat in &scene.beats[..=upto] {
        for word in beat
            .text
            .split(|c: char| !c.is_alphabetic())
            .filter(|w| !w.is_empty())
        {
            let lower = word.to_lowercase();
            if let Some(&cue) = SETTING_CUES.iter().find(|&&c| c == lower) {
                if !cues.contains(&cue) {
                    cues.push(cue);
                }
            }
        }
    }
    if cues.is_empty() {
        None
    } else {
        Some(format!("Setting: {}.", cues.join(", ")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::binder::EntityBinder;
    use crate::core::parser::SceneParser;
    use crate::schema::character::{Character, CharacterTable};

    fn make_table() -> CharacterTable {
        let mut table = CharacterTable::new();
        table.register(Character {
            name: "Mira".to_string(),
            aliases: Vec::new(),
            appearance: vec!["silver armor".to_string(), "braided red hair".to_string()],
            signature_traits: Vec::new(),
        });
        table.register(Character {
            name: "Kato".to_string(),
            aliases: Vec::new(),
            appearance: vec!["leather vest".to_string(), "nervous eyes".to_string()],
            signature_traits: Vec::new(),
        });
        table
    }

    fn compose_moment(max_body_len: usize) -> Result<String, CompositionError> {
        let table = make_table();
        let scene = SceneParser::parse(
            "Kato waits by the gate. Mira leaps across the bridge toward Kato.",
            &table,
        )
        .unwrap();
        let moment = Moment {
            beat_index: 1,
            summary: scene.beats[1].summary(),
            mentions: scene.beats[1].mentions.clone(),
            salience: 0.0,
        };
        let mut warnings = Vec::new();
        let cast = EntityBinder::new(&table).bind(&moment, &mut warnings);
        let composer = PromptComposer::new(ComposerLimits { max_body_len });
        composer.compose(&scene, &moment, &cast, "ink and wash, muted earth tones")
    }

    #[test]
    fn sections_appear_in_fixed_order() {
        let body = compose_moment(DEFAULT_MAX_BODY_LEN).unwrap();
        let framing = body.find("Wide action shot.").unwrap();
        let characters = body.find("Mira: silver armor, braided red hair.").unwrap();
        let background = body.find("Moments before:").unwrap();
        let setting = body.find("Setting:").unwrap();
        let action = body.find("Action:").unwrap();
        let style = body.find("Style:").unwrap();
        assert!(framing < characters);
        assert!(characters < background);
        assert!(background < setting);
        assert!(setting < action);
        assert!(action < style);
    }

    #[test]
    fn style_clause_is_the_final_segment() {
        let body = compose_moment(DEFAULT_MAX_BODY_LEN).unwrap();
        assert!(body.ends_with("Style: ink and wash, muted earth tones."));
    }

    #[test]
    fn appearance_phrases_verbatim_exactly_once() {
        let body = compose_moment(DEFAULT_MAX_BODY_LEN).unwrap();
        assert_eq!(body.matches("silver armor").count(), 1);
        assert_eq!(body.matches("braided red hair").count(), 1);
        assert_eq!(body.matches("leather vest").count(), 1);
    }

    #[test]
    fn setting_cues_collected_from_scene_so_far() {
        let body = compose_moment(DEFAULT_MAX_BODY_LEN).unwrap();
        assert!(body.contains("Setting: gate, bridge."));
    }

    #[test]
    fn background_dropped_before_setting() {
        let full = compose_moment(DEFAULT_MAX_BODY_LEN).unwrap();
        // Tight enough to force out the background recap, roomy enough
        // to keep everything else.
        let budget = full.chars().count() - 1;
        let body = compose_moment(budget).unwrap();
        assert!(!body.contains("Moments before:"));
        assert!(body.contains("Setting:"));
        assert!(body.contains("silver armor"));
        assert!(body.ends_with("muted earth tones."));
    }

    #[test]
    fn setting_dropped_after_background() {
        let without_background = compose_moment(
            compose_moment(DEFAULT_MAX_BODY_LEN).unwrap().chars().count() - 1,
        )
        .unwrap();
        let budget = without_background.chars().count() - 1;
        let body = compose_moment(budget).unwrap();
        assert!(!body.contains("Moments before:"));
        assert!(!body.contains("Setting:"));
        assert!(body.contains("silver armor"));
    }

    #[test]
    fn characters_and_style_never_dropped() {
        // Walk the budget down one character at a time; every body that
        // still composes keeps the descriptors and the style clause,
        // and the first failure reports the minimal body size.
        let mut last = compose_moment(DEFAULT_MAX_BODY_LEN).unwrap();
        loop {
            let budget = last.chars().count() - 1;
            match compose_moment(budget) {
                Ok(body) => {
                    assert!(body.contains("silver armor"));
                    assert!(body.contains("leather vest"));
                    assert!(body.ends_with("muted earth tones."));
                    last = body;
                }
                Err(CompositionError::BudgetExceeded { required, limit }) => {
                    assert_eq!(limit, budget);
                    assert_eq!(required, last.chars().count());
                    break;
                }
            }
        }
    }

    #[test]
    fn impossible_budget_is_an_error() {
        assert!(matches!(
            compose_moment(20),
            Err(CompositionError::BudgetExceeded { limit: 20, .. })
        ));
    }

    #[test]
    fn placeholder_described_generically() {
        let described = describe(&Binding::Placeholder {
            mention: "Riven".to_string(),
        });
        assert_eq!(described, "Riven: an unidentified figure.");
    }

    #[test]
    fn traits_appended_after_appearance() {
        let character = Character {
            name: "Mira".to_string(),
            aliases: Vec::new(),
            appearance: vec!["silver armor".to_string()],
            signature_traits: vec!["fearless".to_string()],
        };
        assert_eq!(
            describe(&Binding::Canonical(&character)),
            "Mira: silver armor; fearless."
        );
    }

    #[test]
    fn first_beat_has_no_background_section() {
        let table = make_table();
        let scene = SceneParser::parse("Mira leaps across the bridge. Kato waits. Dust falls.", &table)
            .unwrap();
        let moment = Moment {
            beat_index: 0,
            summary: scene.beats[0].summary(),
            mentions: scene.beats[0].mentions.clone(),
            salience: 0.0,
        };
        let mut warnings = Vec::new();
        let cast = EntityBinder::new(&table).bind(&moment, &mut warnings);
        let composer = PromptComposer::new(ComposerLimits::default());
        let body = composer.compose(&scene, &moment, &cast, "").unwrap();
        assert!(!body.contains("Moments before:"));
        assert!(!body.contains("Style:"));
        assert!(body.ends_with("Action: Mira leaps across the bridge."));
    }
}
