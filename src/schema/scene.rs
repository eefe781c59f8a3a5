use serde::{Deserialize, Serialize};

/// Maximum character length of a beat summary line.
const SUMMARY_LEN: usize = 100;

/// Subject pronouns the mention scanner records for later antecedent
/// resolution. Possessive and object forms are not tracked; they rarely
/// introduce a new participant.
const SUBJECT_PRONOUNS: [&str; 3] = ["he", "she", "they"];

/// Returns true if the word is a tracked subject pronoun (case-insensitive).
pub fn is_pronoun(word: &str) -> bool {
    SUBJECT_PRONOUNS
        .iter()
        .any(|p| word.eq_ignore_ascii_case(p))
}

/// Whether a beat is primarily an action or a dialogue unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BeatKind {
    Action,
    Dialogue,
}

/// A minimal narrative unit extracted from scene text: one action or
/// dialogue segment, with the character mentions detected inside it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Beat {
    /// Position of this beat in the scene's narrative order, 0-based.
    pub index: usize,
    /// The beat's text span, as it appeared in the scene.
    pub text: String,
    pub kind: BeatKind,
    /// Detected actor mentions (names, aliases, subject pronouns) in
    /// order of first occurrence.
    pub mentions: Vec<String>,
}

impl Beat {
    /// The beat text collapsed onto a single line.
    pub fn one_line(&self) -> String {
        self.text.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    /// A one-line summary of the beat, truncated for display.
    pub fn summary(&self) -> String {
        let line = self.one_line();
        if line.chars().count() <= SUMMARY_LEN {
            line
        } else {
            let mut s: String = line.chars().take(SUMMARY_LEN - 1).collect();
            s.push('…');
            s
        }
    }

    /// Distinct named participants (lowercased, pronouns excluded),
    /// in order of first mention.
    pub fn participants(&self) -> Vec<String> {
        let mut seen = Vec::new();
        for mention in &self.mentions {
            if is_pronoun(mention) {
                continue;
            }
            let lower = mention.to_lowercase();
            if !seen.contains(&lower) {
                seen.push(lower);
            }
        }
        seen
    }

    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }
}

/// A parsed scene: the raw text plus its ordered beats.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scene {
    pub text: String,
    pub beats: Vec<Beat>,
}
