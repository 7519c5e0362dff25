//! Application state for the RAG server

use std::sync::Arc;

use crate::rag::RagService;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    rag: Arc<dyn RagService>,
}

impl AppState {
    /// Wrap the selected RAG backend
    pub fn new(rag: Arc<dyn RagService>) -> Self {
        Self { rag }
    }

    /// Get the RAG backend
    pub fn rag(&self) -> &Arc<dyn RagService> {
        &self.rag
    }
}
