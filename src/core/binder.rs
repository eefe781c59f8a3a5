/// Entity binding — resolves a moment's free-text mentions to canonical
/// character records.
///
/// Resolution is non-fatal by design: an unresolved named mention
/// becomes a placeholder plus an accumulated `BindingWarning`, never an
/// abort.
use tracing::warn;

use crate::schema::character::{Character, CharacterTable};
use crate::schema::moment::Moment;
use crate::schema::prompt::BindingWarning;
use crate::schema::scene::is_pronoun;

/// The result of binding one mention.
#[derive(Debug, Clone)]
pub enum Binding<'a> {
    Canonical(&'a Character),
    /// A named mention with no table match. Carries the surface text so
    /// the composer can still describe the figure generically.
    Placeholder { mention: String },
}

impl Binding<'_> {
    pub fn display_name(&self) -> &str {
        match self {
            Binding::Canonical(character) => &character.name,
            Binding::Placeholder { mention } => mention,
        }
    }
}

pub struct EntityBinder<'a> {
    table: &'a CharacterTable,
}

impl<'a> EntityBinder<'a> {
    pub fn new(table: &'a CharacterTable) -> Self {
        Self { table }
    }

    /// Bind a moment's mentions in occurrence order. Each canonical
    /// character appears at most once in the returned cast, regardless
    /// of how many mentions resolved to it.
    pub fn bind(&self, moment: &Moment, warnings: &mut Vec<BindingWarning>) -> Vec<Binding<'a>> {
        let mut cast: Vec<Binding<'a>> = Vec::new();

        for mention in &moment.mentions {
            if is_pronoun(mention) {
                // A pronoun refers to the nearest preceding named
                // character in the same beat; it never introduces one.
                if let Some(antecedent) = nearest_antecedent(&cast) {
                    push_canonical(&mut cast, antecedent);
                }
                continue;
            }

            match self.table.resolve(mention) {
                Some(character) => push_canonical(&mut cast, character),
                None => {
                    let duplicate = cast.iter().any(|b| {
                        matches!(b, Binding::Placeholder { mention: m }
                            if m.eq_ignore_ascii_case(mention))
                    });
                    if !duplicate {
                        warn!(
                            mention = %mention,
                            beat = moment.beat_index,
                            "unresolved character mention"
                        );
                        warnings.push(BindingWarning {
                            beat_index: moment.beat_index,
                            mention: mention.clone(),
                        });
                        cast.push(Binding::Placeholder {
                            mention: mention.clone(),
                        });
                    }
                }
            }
        }
        cast
    }
}

fn push_canonical<'a>(cast: &mut Vec<Binding<'a>>, character: &'a Character) {
    let duplicate = cast
        .iter()
        .any(|b| matches!(b, Binding::Canonical(c) if c.name == character.name));
    if !duplicate {
        cast.push(Binding::Canonical(character));
    }
}

/// The nearest preceding named character: the last canonical binding
/// made so far within this beat. Pure over the preceding binding set.
fn nearest_antecedent<'a>(cast: &[Binding<'a>]) -> Option<&'a Character> {
    cast.iter().rev().find_map(|b| match b {
        Binding::Canonical(character) => Some(*character),
        Binding::Placeholder { .. } => None,
    })
}
