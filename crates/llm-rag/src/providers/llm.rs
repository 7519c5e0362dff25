//! Generative model trait and its typed response

use async_trait::async_trait;
use crate::error::Result;

/// Trait for prompt completion
///
/// Implementations:
/// - `GeminiClient`: Generative Language API (gemini-1.5-flash)
///
/// Transport and API failures are reported as [`crate::Error::Generation`].
/// The response is returned as-is; interpreting its shape is the caller's job.
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    /// Generate content for a single user prompt
    async fn generate(&self, prompt: &str) -> Result<Generation>;

    /// Release held connections
    async fn close(&self) {}

    /// Get provider name for logging
    fn name(&self) -> &str;

    /// Get the model being used
    fn model(&self) -> &str;
}

/// Full model output for one prompt
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Generation {
    pub candidates: Vec<Candidate>,
}

impl Generation {
    /// Single candidate made of text parts
    pub fn from_texts<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            candidates: vec![Candidate {
                parts: texts.into_iter().map(|t| Part::Text(t.into())).collect(),
                finish_reason: None,
            }],
        }
    }
}

/// One alternative completion
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Candidate {
    pub parts: Vec<Part>,
    pub finish_reason: Option<String>,
}

/// One segment of a candidate's content
#[derive(Debug, Clone, PartialEq)]
pub enum Part {
    /// Plain text output
    Text(String),
    /// Any non-text segment (function call, inline data, ...), by its wire name
    Other { kind: String },
}
