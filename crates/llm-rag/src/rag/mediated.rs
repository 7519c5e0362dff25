//! Document-store backend: providers reached through the docstore layer

use async_trait::async_trait;
use std::sync::Arc;

use super::{RagService, COLLECTION_CLASS, RETRIEVAL_LIMIT, TEXT_PROPERTY};
use crate::config::RagConfig;
use crate::docstore::{generate_from_single_prompt, Document, Embedder, WeaviateStore};
use crate::error::Result;
use crate::generation::PromptBuilder;
use crate::providers::{
    EmbeddingProvider, GeminiClient, GenerativeModel, VectorStore, WeaviateClient,
};

/// RAG engine built on [`WeaviateStore`]
pub struct DocStoreRagService {
    store: WeaviateStore,
    generator: Arc<dyn GenerativeModel>,
}

impl DocStoreRagService {
    /// Create from provider handles
    pub fn new(
        embedder: Arc<dyn EmbeddingProvider>,
        store: Arc<dyn VectorStore>,
        generator: Arc<dyn GenerativeModel>,
    ) -> Result<Self> {
        let store = WeaviateStore::builder()
            .store(store)
            .embedder(Embedder::new(embedder))
            .index_name(COLLECTION_CLASS)
            .text_key(TEXT_PROPERTY)
            .build()?;
        Ok(Self { store, generator })
    }

    /// Create network clients from config
    pub fn connect(config: &RagConfig) -> Result<Self> {
        let gemini = Arc::new(GeminiClient::new(&config.gemini)?);
        let weaviate = Arc::new(WeaviateClient::new(&config.weaviate)?);
        Self::new(gemini.clone(), weaviate, gemini)
    }
}

#[async_trait]
impl RagService for DocStoreRagService {
    async fn add_documents(&self, documents: &[String]) -> Result<()> {
        let docs: Vec<Document> = documents.iter().cloned().map(Document::from).collect();
        let ids = self.store.add_documents(&docs).await?;
        tracing::info!(log_type = "application", count = ids.len(), "Documents added to vector store");
        Ok(())
    }

    async fn ask_question(&self, question: &str) -> Result<String> {
        let hits = self.store.similarity_search(question, RETRIEVAL_LIMIT).await?;
        let texts: Vec<String> = hits.into_iter().map(|d| d.page_content).collect();

        let prompt = PromptBuilder::build_rag_prompt(question, &PromptBuilder::build_context(&texts));
        generate_from_single_prompt(self.generator.as_ref(), &prompt).await
    }

    async fn close(&self) {
        tracing::info!(log_type = "application", "Closing document-store RAG backend");
        self.generator.close().await;
        self.store.close().await;
    }
}
