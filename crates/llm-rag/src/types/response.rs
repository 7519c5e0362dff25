//! Response bodies

use serde::{Deserialize, Serialize};

/// Message returned after a successful ingestion
pub const DOCUMENTS_ADDED: &str = "Documents added successfully.";

/// POST /add-documents success body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddDocumentsResponse {
    pub message: String,
}

impl Default for AddDocumentsResponse {
    fn default() -> Self {
        Self {
            message: DOCUMENTS_ADDED.to_string(),
        }
    }
}

/// POST /ask success body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AskQuestionResponse {
    pub answer: String,
}
