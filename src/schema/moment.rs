use serde::{Deserialize, Serialize};

/// A beat selected as visually significant, to become one image prompt.
///
/// Moments are always ordered by ascending `beat_index` and never
/// overlap; a scene yields between three and five of them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Moment {
    /// Narrative offset of the underlying beat within the scene.
    pub beat_index: usize,
    /// One-line human-readable summary of the beat.
    pub summary: String,
    /// Actor mentions carried over from the beat, in occurrence order.
    pub mentions: Vec<String>,
    /// The salience score that selected this beat.
    pub salience: f32,
}
