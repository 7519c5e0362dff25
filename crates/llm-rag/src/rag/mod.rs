//! RAG engine: the orchestration contract and its two backends
//!
//! [`RagService`] is what the HTTP layer talks to. [`DirectRagService`]
//! drives each provider through its native protocol; [`DocStoreRagService`]
//! goes through the [`crate::docstore`] layer. Both return the same answer and
//! the same error kinds for the same inputs.

pub mod direct;
pub mod mediated;

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::{RagBackend, RagConfig};
use crate::error::Result;

pub use direct::DirectRagService;
pub use mediated::DocStoreRagService;

/// Vector store class every document is written to
pub const COLLECTION_CLASS: &str = "Document";

/// Property holding the document text
pub const TEXT_PROPERTY: &str = "text";

/// Number of nearest documents retrieved per question
pub const RETRIEVAL_LIMIT: usize = 4;

/// Question answering over a stored corpus
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RagService: Send + Sync {
    /// Embed and store documents, one record per entry, in order
    async fn add_documents(&self, documents: &[String]) -> Result<()>;

    /// Answer a question from the nearest stored documents
    async fn ask_question(&self, question: &str) -> Result<String>;

    /// Release provider connections; call once at shutdown
    async fn close(&self);
}

/// Build the backend selected by configuration
pub async fn build_rag_service(config: &RagConfig) -> Result<Arc<dyn RagService>> {
    config.validate()?;

    let service: Arc<dyn RagService> = match config.backend {
        RagBackend::Direct => {
            tracing::info!(log_type = "application", "Using direct provider backend");
            Arc::new(DirectRagService::connect(config).await?)
        }
        RagBackend::DocStore => {
            tracing::info!(log_type = "application", "Using document-store backend");
            Arc::new(DocStoreRagService::connect(config)?)
        }
    };

    Ok(service)
}
