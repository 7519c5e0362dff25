//! Turning a model generation into the final answer text

use crate::error::{Error, Result};
use crate::providers::llm::{Generation, Part};

/// Join the first candidate's non-empty text parts with newlines
///
/// Zero candidates or any non-text part is an
/// [`Error::UnexpectedResponseShape`]; neither is coerced into text.
pub fn answer_from_generation(generation: Generation) -> Result<String> {
    let count = generation.candidates.len();
    let candidate = generation.candidates.into_iter().next().ok_or_else(|| {
        Error::UnexpectedResponseShape(format!("unexpected candidates count {}", count))
    })?;

    let mut segments = Vec::with_capacity(candidate.parts.len());
    for part in candidate.parts {
        match part {
            Part::Text(text) if text.is_empty() => {}
            Part::Text(text) => segments.push(text),
            Part::Other { kind } => {
                tracing::warn!(log_type = "application", kind = %kind, "Non-text content part in model output");
                return Err(Error::UnexpectedResponseShape(format!(
                    "unexpected content part type {}",
                    kind
                )));
            }
        }
    }

    Ok(segments.join("\n"))
}
