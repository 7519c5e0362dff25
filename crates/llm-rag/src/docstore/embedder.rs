//! Embedder wrapping an embedding provider

use std::sync::Arc;

use crate::error::{Error, Result};
use crate::providers::EmbeddingProvider;

/// Embeds documents and queries, checking batch results line up with input
#[derive(Clone)]
pub struct Embedder {
    provider: Arc<dyn EmbeddingProvider>,
}

impl Embedder {
    pub fn new(provider: Arc<dyn EmbeddingProvider>) -> Self {
        Self { provider }
    }

    /// Embed a batch; one vector per text, same order
    pub async fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let embeddings = self.provider.embed_batch(texts).await?;
        if embeddings.len() != texts.len() {
            return Err(Error::embedding(format!(
                "expected {} embeddings, got {}",
                texts.len(),
                embeddings.len()
            )));
        }
        Ok(embeddings)
    }

    /// Embed a search query
    pub async fn embed_query(&self, text: &str) -> Result<Vec<f32>> {
        self.provider.embed(text).await
    }

    pub(crate) async fn close(&self) {
        self.provider.close().await;
    }
}
