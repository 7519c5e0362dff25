//! Document representation used by the document-store layer

use serde::{Deserialize, Serialize};

/// A piece of text with optional metadata
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Text content
    pub page_content: String,
    /// Extra properties stored alongside the text
    #[serde(default)]
    pub metadata: serde_json::Map<String, serde_json::Value>,
    /// Relevance to the query (1 - distance), set on search hits only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f32>,
}

impl Document {
    /// Document with text only
    pub fn new(page_content: impl Into<String>) -> Self {
        Self {
            page_content: page_content.into(),
            ..Self::default()
        }
    }

    /// Attach a metadata entry
    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }
}

impl From<String> for Document {
    fn from(page_content: String) -> Self {
        Self::new(page_content)
    }
}
