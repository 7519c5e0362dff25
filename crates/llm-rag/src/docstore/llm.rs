//! Single-prompt generation helper

use crate::error::Result;
use crate::generation::answer_from_generation;
use crate::providers::GenerativeModel;

/// Send one prompt and return the answer text
pub async fn generate_from_single_prompt(
    model: &dyn GenerativeModel,
    prompt: &str,
) -> Result<String> {
    let generation = model.generate(prompt).await?;
    answer_from_generation(generation)
}
