//! Weaviate-backed document store
//!
//! Creates its class on first use, embeds and batches documents on write, and
//! decodes search hits back into [`Document`]s.

use std::sync::Arc;
use tokio::sync::OnceCell;
use uuid::Uuid;

use super::document::Document;
use super::embedder::Embedder;
use crate::error::{Error, Result};
use crate::providers::{ClassDefinition, NearVectorQuery, StoredRecord, VectorStore};

const DISTANCE_FIELD: &str = "_additional { distance }";

/// Document store over a [`VectorStore`]
pub struct WeaviateStore {
    store: Arc<dyn VectorStore>,
    embedder: Embedder,
    index_name: String,
    text_key: String,
    query_attrs: Vec<String>,
    index_ready: OnceCell<()>,
}

/// Builder for [`WeaviateStore`]
#[derive(Default)]
pub struct WeaviateStoreBuilder {
    store: Option<Arc<dyn VectorStore>>,
    embedder: Option<Embedder>,
    index_name: Option<String>,
    text_key: Option<String>,
    query_attrs: Vec<String>,
}

impl WeaviateStoreBuilder {
    /// Vector store client to write to and search
    pub fn store(mut self, store: Arc<dyn VectorStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Embedder for documents and queries
    pub fn embedder(mut self, embedder: Embedder) -> Self {
        self.embedder = Some(embedder);
        self
    }

    /// Class name (default: `Document`)
    pub fn index_name(mut self, name: impl Into<String>) -> Self {
        self.index_name = Some(name.into());
        self
    }

    /// Property holding the text (default: `text`)
    pub fn text_key(mut self, key: impl Into<String>) -> Self {
        self.text_key = Some(key.into());
        self
    }

    /// Extra properties to read back as metadata on search
    pub fn query_attrs<I, S>(mut self, attrs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.query_attrs = attrs.into_iter().map(Into::into).collect();
        self
    }

    pub fn build(self) -> Result<WeaviateStore> {
        let store = self
            .store
            .ok_or_else(|| Error::config("WeaviateStore requires a vector store"))?;
        let embedder = self
            .embedder
            .ok_or_else(|| Error::config("WeaviateStore requires an embedder"))?;

        Ok(WeaviateStore {
            store,
            embedder,
            index_name: self.index_name.unwrap_or_else(|| "Document".to_string()),
            text_key: self.text_key.unwrap_or_else(|| "text".to_string()),
            query_attrs: self.query_attrs,
            index_ready: OnceCell::new(),
        })
    }
}

impl WeaviateStore {
    pub fn builder() -> WeaviateStoreBuilder {
        WeaviateStoreBuilder::default()
    }

    pub fn index_name(&self) -> &str {
        &self.index_name
    }

    /// Create the class if missing, once per store
    async fn ensure_index(&self) -> Result<()> {
        self.index_ready
            .get_or_try_init(|| async {
                if !self.store.class_exists(&self.index_name).await? {
                    self.store
                        .create_class(&ClassDefinition::text_class(&self.index_name, &self.text_key))
                        .await?;
                    tracing::info!(log_type = "application", class = %self.index_name, "Created vector store class");
                }
                Ok::<(), Error>(())
            })
            .await?;
        Ok(())
    }

    /// Embed and store documents, returning the ids assigned to them
    pub async fn add_documents(&self, documents: &[Document]) -> Result<Vec<Uuid>> {
        if documents.is_empty() {
            return Ok(Vec::new());
        }
        self.ensure_index().await?;

        let texts: Vec<String> = documents.iter().map(|d| d.page_content.clone()).collect();
        let vectors = self.embedder.embed_documents(&texts).await?;

        let records: Vec<StoredRecord> = documents
            .iter()
            .zip(vectors)
            .map(|(doc, vector)| {
                let mut properties = doc.metadata.clone();
                properties.insert(
                    self.text_key.clone(),
                    serde_json::Value::String(doc.page_content.clone()),
                );
                StoredRecord::new(self.index_name.clone(), properties, vector)
            })
            .collect();
        let ids = records.iter().map(|r| r.id).collect();

        self.store.batch_objects(records).await?;
        Ok(ids)
    }

    /// Return up to `k` documents nearest to the query, best first
    pub async fn similarity_search(&self, query: &str, k: usize) -> Result<Vec<Document>> {
        self.ensure_index().await?;

        let vector = self.embedder.embed_query(query).await?;

        let mut fields = vec![self.text_key.clone()];
        fields.extend(self.query_attrs.iter().cloned());
        fields.push(DISTANCE_FIELD.to_string());

        let response = self
            .store
            .near_vector(&NearVectorQuery {
                class: self.index_name.clone(),
                vector,
                fields,
                limit: k,
            })
            .await?;

        if let Some(err) = response.query_error() {
            return Err(err);
        }

        self.decode_hits(response.data)
    }

    fn decode_hits(&self, data: Option<serde_json::Value>) -> Result<Vec<Document>> {
        let hits = data
            .as_ref()
            .and_then(|d| d.get("Get"))
            .and_then(|g| g.get(&self.index_name))
            .ok_or_else(|| Error::decode(format!("missing Get.{} in response", self.index_name)))?;

        let hits = match hits {
            serde_json::Value::Null => return Ok(Vec::new()),
            serde_json::Value::Array(hits) => hits,
            other => {
                return Err(Error::decode(format!(
                    "expected a list of hits, got {}",
                    other
                )))
            }
        };

        hits.iter().map(|hit| self.decode_hit(hit)).collect()
    }

    fn decode_hit(&self, hit: &serde_json::Value) -> Result<Document> {
        let object = hit
            .as_object()
            .ok_or_else(|| Error::decode(format!("expected an object hit, got {}", hit)))?;

        let page_content = object
            .get(&self.text_key)
            .and_then(|v| v.as_str())
            .ok_or_else(|| Error::decode(format!("hit has no string '{}' property", self.text_key)))?
            .to_string();

        let score = object
            .get("_additional")
            .and_then(|a| a.get("distance"))
            .and_then(|d| d.as_f64())
            .map(|distance| 1.0 - distance as f32);

        let metadata = object
            .iter()
            .filter(|(key, _)| *key != &self.text_key && key.as_str() != "_additional")
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();

        Ok(Document {
            page_content,
            metadata,
            score,
        })
    }

    /// Release the underlying clients
    pub async fn close(&self) {
        self.store.close().await;
        self.embedder.close().await;
    }
}
