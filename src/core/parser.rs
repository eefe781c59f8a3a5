/// Scene parsing — splits raw scene text into ordered narrative beats.
///
/// Beats are sentence-level units tagged as action or dialogue, with
/// character mentions detected via a name/alias scan against the
/// supplied character table.
use rustc_hash::FxHashSet;
use thiserror::Error;
use tracing::debug;

use crate::schema::character::CharacterTable;
use crate::schema::scene::{is_pronoun, Beat, BeatKind, Scene};

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("scene text is empty or whitespace-only")]
    EmptyScene,
    #[error("no narrative beats detected in scene text")]
    NoBeats,
}

/// Capitalized sentence-starters that are never proper-name mentions.
const CAPITALIZED_STOPWORDS: &[&str] = &[
    "a", "an", "the", "and", "but", "or", "then", "suddenly", "finally", "meanwhile", "however",
    "instead", "when", "while", "as", "if", "after", "before", "until", "once", "now", "later",
    "soon", "here", "there", "this", "that", "these", "those", "it", "its", "his", "her", "hers",
    "their", "theirs", "him", "them", "in", "on", "at", "to", "of", "by", "for", "with", "from",
    "into", "onto", "over", "under", "above", "below", "behind", "beyond", "across", "around",
    "against", "through", "inside", "outside", "down", "up", "out", "no", "yes", "not", "what",
    "who", "where", "why", "how", "all", "every", "each", "some", "one", "two", "three", "i",
];

pub struct SceneParser;

impl SceneParser {
    /// Parse raw scene text into ordered beats, detecting character
    /// mentions against `table`.
    pub fn parse(text: &str, table: &CharacterTable) -> Result<Scene, ParseError> {
        if text.trim().is_empty() {
            return Err(ParseError::EmptyScene);
        }

        let mut sentences = Vec::new();
        for paragraph in split_paragraphs(text) {
            for sentence in split_sentences(&paragraph) {
                // A beat needs at least one word; bare punctuation is noise.
                if !sentence.chars().any(|c| c.is_alphabetic()) {
                    continue;
                }
                sentences.push(sentence);
            }
        }

        if sentences.is_empty() {
            return Err(ParseError::NoBeats);
        }

        let confirmed = confirmed_proper_names(&sentences);
        let mut beats = Vec::with_capacity(sentences.len());
        for (index, sentence) in sentences.into_iter().enumerate() {
            let kind = if has_quoted_speech(&sentence) {
                BeatKind::Dialogue
            } else {
                BeatKind::Action
            };
            let mentions = detect_mentions(&sentence, table, &confirmed);
            beats.push(Beat {
                index,
                text: sentence,
                kind,
                mentions,
            });
        }
        debug!(beats = beats.len(), "parsed scene into beats");

        Ok(Scene {
            text: text.to_string(),
            beats,
        })
    }
}

/// Group lines into blank-line-separated paragraphs, joining wrapped
/// lines with single spaces.
fn split_paragraphs(text: &str) -> Vec<String> {
    let mut paragraphs = Vec::new();
    let mut current = String::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            if !current.is_empty() {
                paragraphs.push(std::mem::take(&mut current));
            }
        } else {
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(line);
        }
    }
    if !current.is_empty() {
        paragraphs.push(current);
    }
    paragraphs
}

/// Split a paragraph into sentences. Terminators inside quoted spans do
/// not end a sentence, so quoted dialogue stays in one beat. Straight
/// single quotes count as delimiters only at word boundaries; an
/// apostrophe inside a word (Kato's) never opens or closes a span.
fn split_sentences(paragraph: &str) -> Vec<String> {
    let chars: Vec<char> = paragraph.chars().collect();
    let mut sentences = Vec::new();
    let mut current = String::new();
    let mut in_quote = false;
    let mut in_squote = false;
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        current.push(c);
        match c {
            '"' => in_quote = !in_quote,
            '\u{201C}' => in_quote = true,
            '\u{201D}' => in_quote = false,
            '\u{2018}' => in_squote = true,
            '\'' | '\u{2019}' => {
                let opens = c == '\''
                    && (i == 0 || chars[i - 1].is_whitespace());
                let closes = chars.get(i + 1).is_none_or(|n| !n.is_alphanumeric());
                if !in_squote && opens {
                    in_squote = true;
                } else if in_squote && closes {
                    in_squote = false;
                }
            }
            '.' | '!' | '?' | '…' if !in_quote && !in_squote => {
                // Absorb trailing terminators and a closing quote.
                while i + 1 < chars.len()
                    && matches!(chars[i + 1], '.' | '!' | '?' | '…' | '"' | '\u{201D}')
                {
                    i += 1;
                    current.push(chars[i]);
                    if matches!(chars[i], '"' | '\u{201D}') {
                        in_quote = false;
                    }
                }
                let sentence = current.trim();
                if !sentence.is_empty() {
                    sentences.push(sentence.to_string());
                }
                current.clear();
            }
            _ => {}
        }
        i += 1;
    }

    let tail = current.trim();
    if !tail.is_empty() {
        sentences.push(tail.to_string());
    }
    sentences
}

/// True if the text carries quoted speech: double or curly quotes, or a
/// straight single quote opening at a word boundary. Apostrophes inside
/// words do not count.
fn has_quoted_speech(text: &str) -> bool {
    let mut prev: Option<char> = None;
    for c in text.chars() {
        match c {
            '"' | '\u{201C}' | '\u{201D}' | '\u{2018}' => return true,
            '\'' if prev.is_none_or(|p| p.is_whitespace()) => return true,
            _ => {}
        }
        prev = Some(c);
    }
    false
}

/// Lowercased words seen capitalized at a non-initial sentence position
/// anywhere in the scene. A capitalized sentence opener only counts as
/// an unknown proper name when it reappears here; otherwise it is an
/// ordinary noun that happens to start a sentence.
fn confirmed_proper_names(sentences: &[String]) -> FxHashSet<String> {
    let mut confirmed = FxHashSet::default();
    for sentence in sentences {
        for (i, token) in tokenize(sentence).iter().enumerate() {
            if i == 0 {
                continue;
            }
            let mut chars = token.word.chars();
            if chars.next().is_some_and(|c| c.is_uppercase()) && chars.any(|c| c.is_lowercase()) {
                confirmed.insert(token.word.to_lowercase());
            }
        }
    }
    confirmed
}

/// A word token with its byte offset into the beat text.
struct Token<'a> {
    start: usize,
    word: &'a str,
}

fn tokenize(text: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut start = None;
    for (pos, c) in text.char_indices() {
        if c.is_alphabetic() || (start.is_some() && (c == '\'' || c == '-')) {
            if start.is_none() {
                start = Some(pos);
            }
        } else if let Some(s) = start.take() {
            tokens.push(Token {
                start: s,
                word: trim_possessive(&text[s..pos]),
            });
        }
    }
    if let Some(s) = start {
        tokens.push(Token {
            start: s,
            word: trim_possessive(&text[s..]),
        });
    }
    tokens
}

fn trim_possessive(word: &str) -> &str {
    word.strip_suffix("'s")
        .or_else(|| word.strip_suffix('\''))
        .unwrap_or(word)
}

/// Scan a beat for actor mentions: table names and aliases (including
/// multi-word aliases), subject pronouns, and unknown capitalized words
/// that look like proper names. A sentence-initial capitalized word is
/// only a proper-name candidate when `confirmed` vouches for it.
/// Returned in order of first occurrence, deduplicated
/// case-insensitively.
fn detect_mentions(text: &str, table: &CharacterTable, confirmed: &FxHashSet<String>) -> Vec<String> {
    let tokens = tokenize(text);
    let lowered: Vec<String> = tokens.iter().map(|t| t.word.to_lowercase()).collect();

    // Table keys as lowercased word sequences, longest first so
    // multi-word aliases win over their prefixes.
    let mut keys: Vec<Vec<String>> = Vec::new();
    for character in table.iter() {
        keys.push(split_key(&character.name));
        for alias in &character.aliases {
            keys.push(split_key(alias));
        }
    }
    keys.sort_by(|a, b| b.len().cmp(&a.len()));

    let mut candidates: Vec<(usize, String)> = Vec::new();
    let mut matched_positions = FxHashSet::default();

    for i in 0..tokens.len() {
        for key in &keys {
            if key.is_empty() || i + key.len() > tokens.len() {
                continue;
            }
            if lowered[i..i + key.len()] == key[..] {
                let surface: Vec<&str> =
                    tokens[i..i + key.len()].iter().map(|t| t.word).collect();
                candidates.push((tokens[i].start, surface.join(" ")));
                for k in i..i + key.len() {
                    matched_positions.insert(k);
                }
                break;
            }
        }
    }

    for (i, token) in tokens.iter().enumerate() {
        if matched_positions.contains(&i) {
            continue;
        }
        if is_pronoun(token.word) {
            candidates.push((token.start, token.word.to_string()));
            continue;
        }
        let mut chars = token.word.chars();
        let leading_upper = chars.next().is_some_and(|c| c.is_uppercase());
        // All-caps words are treated as sound effects, not names.
        let has_lowercase = chars.any(|c| c.is_lowercase());
        if leading_upper
            && has_lowercase
            && !CAPITALIZED_STOPWORDS.contains(&lowered[i].as_str())
            && (i > 0 || confirmed.contains(&lowered[i]))
        {
            candidates.push((token.start, token.word.to_string()));
        }
    }

    candidates.sort_by_key(|(pos, _)| *pos);
    let mut seen = FxHashSet::default();
    let mut mentions = Vec::new();
    for (_, surface) in candidates {
        if seen.insert(surface.to_lowercase()) {
            mentions.push(surface);
        }
    }
    mentions
}

fn split_key(key: &str) -> Vec<String> {
    key.split_whitespace().map(|w| w.to_lowercase()).collect()
}
