/// Output formatting — the terminal validation gate.
///
/// Wraps composed prompt bodies into ordered blocks with contiguous
/// 1-based ordinals. No malformed block is ever emitted: validation
/// failure aborts the whole scene.
use thiserror::Error;

use crate::schema::moment::Moment;
use crate::schema::prompt::PromptBlock;

#[derive(Debug, Error)]
pub enum FormatError {
    #[error("moment {ordinal} has an empty summary")]
    EmptySummary { ordinal: u32 },
    #[error("moment {ordinal} has an empty prompt body")]
    EmptyBody { ordinal: u32 },
}

pub struct OutputFormatter;

impl OutputFormatter {
    /// Assign ordinals in moment order and validate every block.
    pub fn format(composed: Vec<(Moment, String)>) -> Result<Vec<PromptBlock>, FormatError> {
        let mut blocks = Vec::with_capacity(composed.len());
        for (i, (moment, body)) in composed.into_iter().enumerate() {
            let ordinal = (i + 1) as u32;
            if moment.summary.trim().is_empty() {
                return Err(FormatError::EmptySummary { ordinal });
            }
            if body.trim().is_empty() {
                return Err(FormatError::EmptyBody { ordinal });
            }
            blocks.push(PromptBlock {
                ordinal,
                moment_summary: moment.summary,
                prompt_body: body,
            });
        }
        Ok(blocks)
    }
}
