use serde::{Deserialize, Serialize};
use std::fmt;

/// One validated output block, ready to hand to an external
/// image-generation collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptBlock {
    /// Contiguous 1-based position matching moment narrative order.
    pub ordinal: u32,
    /// One-line description of the moment this prompt depicts.
    pub moment_summary: String,
    /// The fully composed, validated prompt text.
    pub prompt_body: String,
}

/// A non-fatal record of a character mention that could not be bound to
/// a canonical record; a placeholder descriptor was substituted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BindingWarning {
    pub beat_index: usize,
    pub mention: String,
}

impl fmt::Display for BindingWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unresolved mention '{}' in beat {}, placeholder substituted",
            self.mention, self.beat_index
        )
    }
}

/// The complete output of one pipeline invocation: the ordered prompt
/// blocks plus any binding warnings accumulated along the way.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Storyboard {
    pub blocks: Vec<PromptBlock>,
    pub warnings: Vec<BindingWarning>,
}
