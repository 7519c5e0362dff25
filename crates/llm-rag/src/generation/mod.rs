//! Prompt rendering and answer shaping shared by both backends

pub mod prompt;
pub mod response;

pub use prompt::PromptBuilder;
pub use response::answer_from_generation;
