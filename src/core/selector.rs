/// Moment selection — scores beats for visual salience and picks the
/// 3–5 most important ones under adjacency and diversity constraints.
use rustc_hash::FxHashSet;
use thiserror::Error;
use tracing::debug;

use crate::schema::moment::Moment;
use crate::schema::scene::{Beat, Scene};

/// Minimum number of moments a scene must yield.
pub const MIN_MOMENTS: usize = 3;
/// Maximum number of moments selected per scene.
pub const MAX_MOMENTS: usize = 5;

#[derive(Debug, Error)]
pub enum SelectError {
    #[error("scene has {found} qualifying beats, at least {min} are required", min = MIN_MOMENTS)]
    InsufficientContent { found: usize },
}

/// Scoring seam for beat salience. Selection constraints (adjacency,
/// diversity) live in `MomentSelector`; only the score is pluggable.
pub trait SalienceScorer {
    fn score(&self, beat: &Beat) -> f32;
}

/// Lexical cues indicating physical action.
const ACTION_CUES: &[&str] = &[
    "draw", "draws", "drew", "leap", "leaps", "leapt", "jump", "jumps", "jumped", "collapse",
    "collapses", "collapsed", "crash", "crashes", "crashed", "strike", "strikes", "struck",
    "swing", "swings", "swung", "charge", "charges", "charged", "fall", "falls", "fell", "grab",
    "grabs", "grabbed", "throw", "throws", "threw", "run", "runs", "ran", "slam", "slams",
    "slammed", "shatter", "shatters", "shattered", "lunge", "lunges", "lunged", "dodge",
    "dodges", "dodged", "climb", "climbs", "climbed", "cling", "clings", "clung", "fight",
    "fights", "fought", "explode", "explodes", "exploded", "burst", "bursts", "fire", "fires",
    "fired", "smash", "smashes", "smashed", "dive", "dives", "dove", "kick", "kicks", "kicked",
    "punch", "punches", "punched", "vault", "vaults", "sprint", "sprints", "step", "steps",
    "stumble", "stumbles", "stumbled", "duck", "ducks", "ducked",
];

/// Lexical cues indicating emotional spikes or narrative turns.
const TRANSITION_CUES: &[&str] = &[
    "suddenly", "abruptly", "but", "then", "until", "finally", "however", "instead",
    "terrified", "startled", "scream", "screams", "screamed", "gasp", "gasps", "gasped",
    "horror", "panic", "panicked", "desperate", "fear", "afraid", "shock", "shocked", "frozen",
    "trembling", "rage", "furious", "tears", "weeping",
];

/// The default scorer: weighted lexical cues plus participant count,
/// with a penalty for very short beats.
#[derive(Debug, Clone)]
pub struct LexicalSalience {
    pub participant_weight: f32,
    pub action_weight: f32,
    pub transition_weight: f32,
    pub short_beat_penalty: f32,
    /// Beats with fewer words than this are penalized.
    pub short_beat_words: usize,
}

impl Default for LexicalSalience {
    fn default() -> Self {
        Self {
            participant_weight: 2.0,
            action_weight: 1.5,
            transition_weight: 1.0,
            short_beat_penalty: 2.0,
            short_beat_words: 4,
        }
    }
}

impl SalienceScorer for LexicalSalience {
    fn score(&self, beat: &Beat) -> f32 {
        let words: Vec<String> = beat
            .text
            .split(|c: char| !c.is_alphabetic())
            .filter(|w| !w.is_empty())
            .map(|w| w.to_lowercase())
            .collect();

        let action_hits = cue_hits(&words, ACTION_CUES);
        let transition_hits = cue_hits(&words, TRANSITION_CUES);

        let mut score = beat.participants().len() as f32 * self.participant_weight
            + action_hits as f32 * self.action_weight
            + transition_hits as f32 * self.transition_weight;
        if beat.word_count() < self.short_beat_words {
            score -= self.short_beat_penalty;
        }
        score
    }
}

/// Count distinct cue words present in the beat.
fn cue_hits(words: &[String], cues: &[&str]) -> usize {
    let present: FxHashSet<&str> = words.iter().map(|w| w.as_str()).collect();
    cues.iter().filter(|cue| present.contains(**cue)).count()
}

/// Selects the top-scoring beats as moments, subject to adjacency and
/// participant-diversity constraints. Ties break toward the earlier
/// narrative position.
pub struct MomentSelector<'a> {
    scorer: &'a dyn SalienceScorer,
}

impl<'a> MomentSelector<'a> {
    pub fn new(scorer: &'a dyn SalienceScorer) -> Self {
        Self { scorer }
    }

    pub fn select(&self, scene: &Scene) -> Result<Vec<Moment>, SelectError> {
        let beats = &scene.beats;
        if beats.len() < MIN_MOMENTS {
            return Err(SelectError::InsufficientContent { found: beats.len() });
        }

        let target = beats.len().min(MAX_MOMENTS);
        let mut ordered: Vec<(usize, f32)> = beats
            .iter()
            .map(|b| (b.index, self.scorer.score(b)))
            .collect();
        // Score descending, earlier position wins ties.
        ordered.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));

        // Dense scenes keep the adjacency constraint; short scenes
        // relax it up front, since spreading out is impossible anyway.
        let enforce_adjacency = beats.len() >= 2 * target;
        let mut picked = pick(&ordered, beats, target, enforce_adjacency, true);
        if picked.len() < MIN_MOMENTS {
            picked = pick(&ordered, beats, target, false, true);
        }
        if picked.len() < MIN_MOMENTS {
            picked = pick(&ordered, beats, target, false, false);
        }
        if picked.len() < MIN_MOMENTS {
            return Err(SelectError::InsufficientContent {
                found: picked.len(),
            });
        }

        picked.sort_unstable();
        debug!(?picked, target, "selected moments");

        let scores: Vec<f32> = {
            let mut by_index = vec![0.0; beats.len()];
            for &(idx, score) in &ordered {
                by_index[idx] = score;
            }
            by_index
        };

        Ok(picked
            .into_iter()
            .map(|idx| Moment {
                beat_index: idx,
                summary: beats[idx].summary(),
                mentions: beats[idx].mentions.clone(),
                salience: scores[idx],
            })
            .collect())
    }
}

/// One greedy selection pass over score-ordered beats.
fn pick(
    ordered: &[(usize, f32)],
    beats: &[Beat],
    target: usize,
    enforce_adjacency: bool,
    enforce_diversity: bool,
) -> Vec<usize> {
    let mut picked: Vec<usize> = Vec::new();
    let mut casts: Vec<Vec<String>> = Vec::new();

    for &(idx, _) in ordered {
        if picked.len() == target {
            break;
        }
        if enforce_adjacency && picked.iter().any(|&p| p.abs_diff(idx) == 1) {
            continue;
        }
        let cast = participant_set(&beats[idx]);
        if enforce_diversity && !cast.is_empty() && casts.contains(&cast) {
            continue;
        }
        picked.push(idx);
        casts.push(cast);
    }
    picked
}

/// The participant set used for the diversity check: lowercased and
/// sorted, so mention order within the beat is irrelevant.
fn participant_set(beat: &Beat) -> Vec<String> {
    let mut cast = beat.participants();
    cast.sort_unstable();
    cast
}
