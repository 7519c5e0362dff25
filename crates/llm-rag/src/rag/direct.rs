//! Direct backend: each provider driven through its own protocol

use async_trait::async_trait;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::OnceCell;

use super::{RagService, COLLECTION_CLASS, RETRIEVAL_LIMIT, TEXT_PROPERTY};
use crate::config::RagConfig;
use crate::error::{Error, Result};
use crate::generation::{answer_from_generation, PromptBuilder};
use crate::providers::{
    ClassDefinition, EmbeddingProvider, GeminiClient, GenerativeModel, NearVectorQuery,
    StoredRecord, VectorStore, WeaviateClient,
};

/// RAG engine calling the embedding, vector store and generation providers directly
pub struct DirectRagService {
    embedder: Arc<dyn EmbeddingProvider>,
    store: Arc<dyn VectorStore>,
    generator: Arc<dyn GenerativeModel>,
    collection_ready: OnceCell<()>,
}

impl DirectRagService {
    /// Create from provider handles
    ///
    /// The collection is checked lazily on first use.
    pub fn new(
        embedder: Arc<dyn EmbeddingProvider>,
        store: Arc<dyn VectorStore>,
        generator: Arc<dyn GenerativeModel>,
    ) -> Self {
        Self {
            embedder,
            store,
            generator,
            collection_ready: OnceCell::new(),
        }
    }

    /// Create network clients from config and make sure the collection exists
    pub async fn connect(config: &RagConfig) -> Result<Self> {
        let gemini = Arc::new(GeminiClient::new(&config.gemini)?);
        let weaviate = Arc::new(WeaviateClient::new(&config.weaviate)?);

        let service = Self::new(gemini.clone(), weaviate, gemini);
        service.ensure_collection().await?;
        Ok(service)
    }

    /// Check for the collection and create it if absent, once per engine
    pub async fn ensure_collection(&self) -> Result<()> {
        self.collection_ready
            .get_or_try_init(|| async {
                if self.store.class_exists(COLLECTION_CLASS).await? {
                    return Ok::<(), Error>(());
                }
                self.store
                    .create_class(&ClassDefinition::text_class(COLLECTION_CLASS, TEXT_PROPERTY))
                    .await?;
                tracing::info!(log_type = "application", class = COLLECTION_CLASS, "Created collection");
                Ok(())
            })
            .await?;
        Ok(())
    }

    async fn retrieve(&self, vector: Vec<f32>) -> Result<Vec<String>> {
        let response = self
            .store
            .near_vector(&NearVectorQuery {
                class: COLLECTION_CLASS.to_string(),
                vector,
                fields: vec![TEXT_PROPERTY.to_string()],
                limit: RETRIEVAL_LIMIT,
            })
            .await?;

        if let Some(err) = response.query_error() {
            return Err(err);
        }

        extract_texts(response.data)
    }
}

#[derive(Deserialize)]
struct GetData {
    #[serde(rename = "Get")]
    get: HashMap<String, Option<Vec<TextHit>>>,
}

#[derive(Deserialize)]
struct TextHit {
    text: String,
}

/// Map the untyped `data` of a near-vector query to the hit texts, in order
pub fn extract_texts(data: Option<serde_json::Value>) -> Result<Vec<String>> {
    let data = data.ok_or_else(|| Error::decode("response has no data"))?;
    let mut parsed: GetData = serde_json::from_value(data)
        .map_err(|e| Error::decode(format!("unexpected result shape: {}", e)))?;

    let hits = parsed
        .get
        .remove(COLLECTION_CLASS)
        .ok_or_else(|| Error::decode(format!("missing Get.{} in response", COLLECTION_CLASS)))?;

    Ok(hits
        .unwrap_or_default()
        .into_iter()
        .map(|hit| hit.text)
        .collect())
}

#[async_trait]
impl RagService for DirectRagService {
    async fn add_documents(&self, documents: &[String]) -> Result<()> {
        if documents.is_empty() {
            return Ok(());
        }
        self.ensure_collection().await?;

        let embeddings = self.embedder.embed_batch(documents).await?;
        if embeddings.len() != documents.len() {
            return Err(Error::embedding(format!(
                "expected {} embeddings, got {}",
                documents.len(),
                embeddings.len()
            )));
        }
        tracing::info!(log_type = "application", count = embeddings.len(), "Embeddings generated successfully");

        let records = documents
            .iter()
            .zip(embeddings)
            .map(|(doc, vector)| {
                let mut properties = serde_json::Map::new();
                properties.insert(TEXT_PROPERTY.to_string(), serde_json::Value::String(doc.clone()));
                StoredRecord::new(COLLECTION_CLASS, properties, vector)
            })
            .collect();

        self.store.batch_objects(records).await?;
        tracing::info!(log_type = "application", count = documents.len(), "Documents added to vector store");
        Ok(())
    }

    async fn ask_question(&self, question: &str) -> Result<String> {
        self.ensure_collection().await?;

        let vector = self.embedder.embed(question).await?;
        let texts = self.retrieve(vector).await?;
        tracing::debug!(log_type = "application", hits = texts.len(), "Retrieved context");

        let prompt = PromptBuilder::build_rag_prompt(question, &PromptBuilder::build_context(&texts));
        let generation = self.generator.generate(&prompt).await?;
        answer_from_generation(generation)
    }

    async fn close(&self) {
        tracing::info!(log_type = "application", "Closing direct RAG backend");
        self.generator.close().await;
        self.embedder.close().await;
        self.store.close().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extract_texts_in_order() {
        let data = json!({"Get": {"Document": [{"text": "You are mastermind."}, {"text": "You are genius."}]}});
        assert_eq!(
            extract_texts(Some(data)).unwrap(),
            vec!["You are mastermind.", "You are genius."]
        );
    }

    #[test]
    fn test_extract_texts_empty_or_null() {
        assert!(extract_texts(Some(json!({"Get": {"Document": []}}))).unwrap().is_empty());
        assert!(extract_texts(Some(json!({"Get": {"Document": null}}))).unwrap().is_empty());
    }

    #[test]
    fn test_extract_texts_rejects_bad_shapes() {
        let cases = [
            None,
            Some(json!(null)),
            Some(json!({"Document": []})),
            Some(json!({"Get": {}})),
            Some(json!({"Get": {"Document": {"text": "x"}}})),
            Some(json!({"Get": {"Document": [{"body": "x"}]}})),
            Some(json!({"Get": {"Document": [{"text": 42}]}})),
        ];
        for data in cases {
            assert!(
                matches!(extract_texts(data.clone()), Err(Error::Decode(_))),
                "expected decode error for {:?}",
                data
            );
        }
    }
}
