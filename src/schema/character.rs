use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A canonical character record. Immutable once registered; the pipeline
/// looks characters up by name or alias and never copies them with
/// modification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Character {
    pub name: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    /// Ordered appearance phrases, used verbatim in composed prompts.
    #[serde(default)]
    pub appearance: Vec<String>,
    #[serde(default)]
    pub signature_traits: Vec<String>,
}

impl Character {
    /// The character's appearance phrases joined into a single clause.
    pub fn appearance_clause(&self) -> String {
        self.appearance.join(", ")
    }
}

/// Registry of canonical characters with case-insensitive name and
/// alias lookup.
#[derive(Debug, Clone, Default)]
pub struct CharacterTable {
    characters: Vec<Character>,
    /// Lowercased name/alias → position in `characters`. First
    /// registration wins on key collisions.
    index: FxHashMap<String, usize>,
}

impl CharacterTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, character: Character) {
        let pos = self.characters.len();
        self.index
            .entry(character.name.to_lowercase())
            .or_insert(pos);
        for alias in &character.aliases {
            self.index.entry(alias.to_lowercase()).or_insert(pos);
        }
        self.characters.push(character);
    }

    /// Resolve a free-text mention to its canonical record via exact
    /// name or alias match, case-insensitively.
    pub fn resolve(&self, mention: &str) -> Option<&Character> {
        self.index
            .get(&mention.to_lowercase())
            .map(|&pos| &self.characters[pos])
    }

    pub fn iter(&self) -> impl Iterator<Item = &Character> {
        self.characters.iter()
    }

    pub fn len(&self) -> usize {
        self.characters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.characters.is_empty()
    }

    /// Load characters from a RON file containing a list of records.
    pub fn load_from_ron(&mut self, path: &Path) -> Result<(), CharacterError> {
        let contents = std::fs::read_to_string(path)?;
        let characters: Vec<Character> = ron::from_str(&contents)?;
        for character in characters {
            self.register(character);
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CharacterError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON deserialization error: {0}")]
    Ron(#[from] ron::error::SpannedError),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_table() -> CharacterTable {
        let mut table = CharacterTable::new();
        table.register(Character {
            name: "Mira".to_string(),
            aliases: vec!["the swordswoman".to_string()],
            appearance: vec!["silver armor".to_string(), "braided red hair".to_string()],
            signature_traits: vec!["fearless".to_string()],
        });
        table.register(Character {
            name: "Kato".to_string(),
            aliases: Vec::new(),
            appearance: vec!["leather vest".to_string(), "nervous eyes".to_string()],
            signature_traits: Vec::new(),
        });
        table
    }

    #[test]
    fn resolve_by_name() {
        let table = make_table();
        assert_eq!(table.resolve("Mira").unwrap().name, "Mira");
        assert_eq!(table.resolve("kato").unwrap().name, "Kato");
    }

    #[test]
    fn resolve_by_alias_case_insensitive() {
        let table = make_table();
        assert_eq!(table.resolve("The Swordswoman").unwrap().name, "Mira");
    }

    #[test]
    fn resolve_unknown_mention() {
        let table = make_table();
        assert!(table.resolve("Riven").is_none());
    }

    #[test]
    fn first_registration_wins_on_collision() {
        let mut table = make_table();
        table.register(Character {
            name: "Mira".to_string(),
            aliases: Vec::new(),
            appearance: vec!["impostor".to_string()],
            signature_traits: Vec::new(),
        });
        assert_eq!(
            table.resolve("Mira").unwrap().appearance,
            vec!["silver armor", "braided red hair"]
        );
    }

    #[test]
    fn appearance_clause_joins_phrases() {
        let table = make_table();
        assert_eq!(
            table.resolve("Mira").unwrap().appearance_clause(),
            "silver armor, braided red hair"
        );
    }

    #[test]
    fn load_test_characters_from_ron() {
        let path = std::path::PathBuf::from("tests/fixtures/characters.ron");
        let mut table = CharacterTable::new();
        table.load_from_ron(&path).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.resolve("the swordswoman").unwrap().name, "Mira");
        assert_eq!(
            table.resolve("Kato").unwrap().appearance,
            vec!["leather vest", "nervous eyes"]
        );
    }
}
