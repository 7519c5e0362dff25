//! Weaviate vector store client
//!
//! Thin REST/GraphQL client: schema check and creation, batch object writes
//! and near-vector queries.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crate::config::WeaviateConfig;
use crate::error::{Error, Result};
use crate::providers::vector_store::{
    ClassDefinition, GraphQlResponse, NearVectorQuery, StoredRecord, VectorStore,
};

/// Weaviate client
pub struct WeaviateClient {
    http: reqwest::Client,
    base_url: String,
    closed: AtomicBool,
}

impl WeaviateClient {
    /// Create a new Weaviate client
    pub fn new(config: &WeaviateConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| Error::config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: config.base_url(),
            closed: AtomicBool::new(false),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn ensure_open(&self) -> std::result::Result<(), String> {
        if self.closed.load(Ordering::Acquire) {
            Err("Weaviate client is closed".to_string())
        } else {
            Ok(())
        }
    }
}

#[derive(Serialize)]
struct BatchRequest<'a> {
    objects: &'a [StoredRecord],
}

#[derive(Serialize)]
struct GraphQlRequest {
    query: String,
}

#[derive(Deserialize)]
struct BatchObjectResponse {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    result: Option<BatchObjectResult>,
}

#[derive(Deserialize)]
struct BatchObjectResult {
    #[serde(default)]
    errors: Option<ErrorList>,
}

#[derive(Deserialize)]
struct ErrorList {
    #[serde(default)]
    error: Vec<ErrorMessage>,
}

#[derive(Deserialize)]
struct ErrorMessage {
    message: String,
}

/// Collect per-object rejections from a batch reply
fn batch_failures(results: Vec<BatchObjectResponse>) -> Vec<String> {
    results
        .into_iter()
        .flat_map(|object| {
            let id = object.id.unwrap_or_else(|| "unknown".to_string());
            object
                .result
                .and_then(|r| r.errors)
                .map(|e| e.error)
                .unwrap_or_default()
                .into_iter()
                .map(move |e| format!("object {}: {}", id, e.message))
        })
        .collect()
}

fn is_already_exists(body: &str) -> bool {
    body.to_ascii_lowercase().contains("already exists")
}

#[async_trait]
impl VectorStore for WeaviateClient {
    async fn class_exists(&self, class: &str) -> Result<bool> {
        self.ensure_open().map_err(Error::Storage)?;

        let response = self
            .http
            .get(self.url(&format!("schema/{}", class)))
            .send()
            .await
            .map_err(|e| Error::storage(format!("Weaviate class check failed: {}", e)))?;

        match response.status() {
            status if status.is_success() => Ok(true),
            reqwest::StatusCode::NOT_FOUND => Ok(false),
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(Error::storage(format!(
                    "Weaviate class check failed ({}): {}",
                    status, body
                )))
            }
        }
    }

    async fn create_class(&self, class: &ClassDefinition) -> Result<()> {
        self.ensure_open().map_err(Error::Storage)?;

        let response = self
            .http
            .post(self.url("schema"))
            .json(class)
            .send()
            .await
            .map_err(|e| Error::storage(format!("Weaviate create class failed: {}", e)))?;

        if response.status().is_success() {
            return Ok(());
        }

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        if status == reqwest::StatusCode::UNPROCESSABLE_ENTITY && is_already_exists(&body) {
            tracing::debug!(log_type = "application", class = %class.class, "Class created concurrently");
            return Ok(());
        }

        Err(Error::storage(format!(
            "Weaviate create class failed ({}): {}",
            status, body
        )))
    }

    async fn batch_objects(&self, objects: Vec<StoredRecord>) -> Result<()> {
        self.ensure_open().map_err(Error::Storage)?;
        if objects.is_empty() {
            return Ok(());
        }

        let response = self
            .http
            .post(self.url("batch/objects"))
            .json(&BatchRequest { objects: &objects })
            .send()
            .await
            .map_err(|e| Error::storage(format!("Weaviate batch write failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::storage(format!(
                "Weaviate batch write failed ({}): {}",
                status, body
            )));
        }

        let results: Vec<BatchObjectResponse> = response
            .json()
            .await
            .map_err(|e| Error::storage(format!("Failed to parse Weaviate batch response: {}", e)))?;

        let failures = batch_failures(results);
        if !failures.is_empty() {
            return Err(Error::storage(format!(
                "Weaviate rejected {} object(s): {}",
                failures.len(),
                failures.join("; ")
            )));
        }

        Ok(())
    }

    async fn near_vector(&self, query: &NearVectorQuery) -> Result<GraphQlResponse> {
        self.ensure_open().map_err(Error::Retrieval)?;

        let response = self
            .http
            .post(self.url("graphql"))
            .json(&GraphQlRequest {
                query: query.to_graphql(),
            })
            .send()
            .await
            .map_err(|e| Error::retrieval(format!("Weaviate query failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::retrieval(format!(
                "Weaviate query failed ({}): {}",
                status, body
            )));
        }

        response
            .json()
            .await
            .map_err(|e| Error::retrieval(format!("Failed to parse Weaviate response: {}", e)))
    }

    async fn close(&self) {
        self.closed.store(true, Ordering::Release);
    }

    fn name(&self) -> &str {
        "weaviate"
    }
}
