//! Request bodies and their validation

use serde::Deserialize;

use crate::error::{Error, Result};

/// POST /add-documents body
#[derive(Debug, Clone, Deserialize)]
pub struct AddDocumentsRequest {
    pub documents: Vec<String>,
}

impl AddDocumentsRequest {
    /// Require at least one document and no empty entries
    pub fn validate(&self) -> Result<()> {
        if self.documents.is_empty() {
            return Err(Error::invalid_request("documents must not be empty"));
        }
        if let Some(index) = self.documents.iter().position(|d| d.is_empty()) {
            return Err(Error::invalid_request(format!(
                "documents[{}] must not be empty",
                index
            )));
        }
        Ok(())
    }
}

/// POST /ask body
#[derive(Debug, Clone, Deserialize)]
pub struct AskQuestionRequest {
    pub question: String,
}

impl AskQuestionRequest {
    /// Require a non-empty question
    pub fn validate(&self) -> Result<()> {
        if self.question.is_empty() {
            return Err(Error::invalid_request("question must not be empty"));
        }
        Ok(())
    }
}
