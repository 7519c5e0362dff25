//! Vector store provider trait, modelled on the store's native protocol
//!
//! The query path returns the store's loosely typed GraphQL response; callers
//! map it to typed results.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};

/// Trait for a class-based vector store
///
/// Implementations:
/// - `WeaviateClient`: Weaviate REST + GraphQL API
///
/// Schema and write failures are [`crate::Error::Storage`]; query transport
/// failures are [`crate::Error::Retrieval`].
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Check whether a class exists
    async fn class_exists(&self, class: &str) -> Result<bool>;

    /// Create a class
    ///
    /// Creating a class that already exists succeeds.
    async fn create_class(&self, class: &ClassDefinition) -> Result<()>;

    /// Write objects in one batch, failing if any object was rejected
    async fn batch_objects(&self, objects: Vec<StoredRecord>) -> Result<()>;

    /// Run a near-vector `Get` query
    async fn near_vector(&self, query: &NearVectorQuery) -> Result<GraphQlResponse>;

    /// Release held connections
    async fn close(&self) {}

    /// Get provider name for logging
    fn name(&self) -> &str;
}

/// Schema definition for a class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassDefinition {
    pub class: String,
    pub vectorizer: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub properties: Vec<PropertyDefinition>,
}

impl ClassDefinition {
    /// Class holding externally computed vectors and one text property
    pub fn text_class(class: impl Into<String>, text_property: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            vectorizer: "none".to_string(),
            properties: vec![PropertyDefinition {
                name: text_property.into(),
                data_type: vec!["text".to_string()],
            }],
        }
    }
}

/// Property in a class schema
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyDefinition {
    pub name: String,
    #[serde(rename = "dataType")]
    pub data_type: Vec<String>,
}

/// One object to persist: vector plus properties in a class
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StoredRecord {
    pub class: String,
    pub id: Uuid,
    pub properties: serde_json::Map<String, serde_json::Value>,
    pub vector: Vec<f32>,
}

impl StoredRecord {
    /// Record with a fresh id
    pub fn new(
        class: impl Into<String>,
        properties: serde_json::Map<String, serde_json::Value>,
        vector: Vec<f32>,
    ) -> Self {
        Self {
            class: class.into(),
            id: Uuid::new_v4(),
            properties,
            vector,
        }
    }
}

/// Near-vector query against one class
#[derive(Debug, Clone, PartialEq)]
pub struct NearVectorQuery {
    pub class: String,
    pub vector: Vec<f32>,
    /// Selection set, e.g. `text` or `_additional { distance }`
    pub fields: Vec<String>,
    pub limit: usize,
}

impl NearVectorQuery {
    /// Render as a GraphQL `Get` query
    pub fn to_graphql(&self) -> String {
        let vector = serde_json::to_string(&self.vector).unwrap_or_else(|_| "[]".to_string());
        format!(
            "{{ Get {{ {class}(nearVector: {{vector: {vector}}}, limit: {limit}) {{ {fields} }} }} }}",
            class = self.class,
            vector = vector,
            limit = self.limit,
            fields = self.fields.join(" "),
        )
    }
}

/// Raw GraphQL response: untyped `data` plus any number of errors
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct GraphQlResponse {
    #[serde(default)]
    pub data: Option<serde_json::Value>,
    #[serde(default)]
    pub errors: Vec<GraphQlError>,
}

impl GraphQlResponse {
    /// All error messages joined into one, if there were any
    pub fn aggregated_errors(&self) -> Option<String> {
        if self.errors.is_empty() {
            return None;
        }
        Some(
            self.errors
                .iter()
                .map(|e| e.message.as_str())
                .collect::<Vec<_>>()
                .join("; "),
        )
    }

    /// The aggregated errors as an [`Error::Retrieval`]
    pub fn query_error(&self) -> Option<Error> {
        self.aggregated_errors()
            .map(|message| Error::retrieval(format!("Weaviate query error: {}", message)))
    }
}

/// One GraphQL error entry
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GraphQlError {
    pub message: String,
}
