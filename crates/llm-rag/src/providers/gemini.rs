//! Gemini client for embeddings and answer generation
//!
//! Talks to the Generative Language API with an API key. One client serves
//! both the embedding model and the generation model.

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crate::config::GeminiConfig;
use crate::error::{Error, Result};
use crate::providers::embedding::EmbeddingProvider;
use crate::providers::llm::{Candidate, Generation, GenerativeModel, Part};

/// Maximum requests accepted by one `batchEmbedContents` call
const MAX_EMBED_BATCH: usize = 100;

/// Gemini API client
pub struct GeminiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    generate_model: String,
    embed_model: String,
    closed: AtomicBool,
}

impl GeminiClient {
    /// Create a new Gemini client
    pub fn new(config: &GeminiConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(Error::config("Gemini API key is empty"));
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .pool_max_idle_per_host(5)
            .build()
            .map_err(|e| Error::config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            generate_model: config.generate_model.clone(),
            embed_model: config.embed_model.clone(),
            closed: AtomicBool::new(false),
        })
    }

    /// Get the API endpoint URL for a model method
    fn endpoint(&self, model: &str, method: &str) -> String {
        format!("{}/models/{}:{}", self.base_url, model, method)
    }

    fn embed_model_path(&self) -> String {
        format!("models/{}", self.embed_model)
    }

    /// POST a JSON body and decode the JSON reply
    ///
    /// Errors are plain messages so each caller can tag them with its own kind.
    async fn post<Req, Resp>(&self, url: &str, body: &Req) -> std::result::Result<Resp, String>
    where
        Req: Serialize + Sync,
        Resp: DeserializeOwned,
    {
        if self.closed.load(Ordering::Acquire) {
            return Err("Gemini client is closed".to_string());
        }

        let response = self
            .http
            .post(url)
            .header("x-goog-api-key", &self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| format!("Gemini request failed: {}", e))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(format!("Gemini request failed ({}): {}", status, body));
        }

        response
            .json()
            .await
            .map_err(|e| format!("Failed to parse Gemini response: {}", e))
    }
}

#[derive(Serialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: Vec<TextPart>,
}

impl Content {
    fn text(role: Option<&'static str>, text: &str) -> Self {
        Self {
            role,
            parts: vec![TextPart {
                text: text.to_string(),
            }],
        }
    }
}

#[derive(Serialize)]
struct TextPart {
    text: String,
}

#[derive(Serialize)]
struct EmbedRequest {
    model: String,
    content: Content,
}

#[derive(Serialize)]
struct BatchEmbedRequest {
    requests: Vec<EmbedRequest>,
}

#[derive(Deserialize)]
struct EmbedResponse {
    embedding: EmbeddingValues,
}

#[derive(Deserialize)]
struct BatchEmbedResponse {
    #[serde(default)]
    embeddings: Vec<EmbeddingValues>,
}

#[derive(Deserialize)]
struct EmbeddingValues {
    values: Vec<f32>,
}

#[derive(Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<RawCandidate>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCandidate {
    #[serde(default)]
    content: Option<RawContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct RawContent {
    #[serde(default)]
    parts: Vec<serde_json::Map<String, serde_json::Value>>,
}

/// Classify a wire part: `text` parts stay text, anything else keeps its key
fn part_from_wire(part: serde_json::Map<String, serde_json::Value>) -> Part {
    match part.get("text") {
        Some(serde_json::Value::String(text)) => Part::Text(text.clone()),
        _ => Part::Other {
            kind: part
                .keys()
                .find(|k| k.as_str() != "thought")
                .cloned()
                .unwrap_or_else(|| "empty".to_string()),
        },
    }
}

impl From<GenerateResponse> for Generation {
    fn from(response: GenerateResponse) -> Self {
        Generation {
            candidates: response
                .candidates
                .into_iter()
                .map(|c| Candidate {
                    parts: c
                        .content
                        .map(|content| content.parts.into_iter().map(part_from_wire).collect())
                        .unwrap_or_default(),
                    finish_reason: c.finish_reason,
                })
                .collect(),
        }
    }
}

#[async_trait]
impl EmbeddingProvider for GeminiClient {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let request = EmbedRequest {
            model: self.embed_model_path(),
            content: Content::text(None, text),
        };

        let response: EmbedResponse = self
            .post(&self.endpoint(&self.embed_model, "embedContent"), &request)
            .await
            .map_err(Error::Embedding)?;

        Ok(response.embedding.values)
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let url = self.endpoint(&self.embed_model, "batchEmbedContents");
        let mut all_embeddings = Vec::with_capacity(texts.len());

        for chunk in texts.chunks(MAX_EMBED_BATCH) {
            let request = BatchEmbedRequest {
                requests: chunk
                    .iter()
                    .map(|t| EmbedRequest {
                        model: self.embed_model_path(),
                        content: Content::text(None, t),
                    })
                    .collect(),
            };

            let response: BatchEmbedResponse =
                self.post(&url, &request).await.map_err(Error::Embedding)?;

            all_embeddings.extend(response.embeddings.into_iter().map(|e| e.values));
        }

        Ok(all_embeddings)
    }

    async fn close(&self) {
        self.closed.store(true, Ordering::Release);
    }

    fn name(&self) -> &str {
        "gemini"
    }
}

#[async_trait]
impl GenerativeModel for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<Generation> {
        let request = GenerateRequest {
            contents: vec![Content::text(Some("user"), prompt)],
        };

        tracing::debug!(log_type = "application", model = %self.generate_model, "Generating content");

        let response: GenerateResponse = self
            .post(&self.endpoint(&self.generate_model, "generateContent"), &request)
            .await
            .map_err(Error::Generation)?;

        Ok(response.into())
    }

    async fn close(&self) {
        self.closed.store(true, Ordering::Release);
    }

    fn name(&self) -> &str {
        "gemini"
    }

    fn model(&self) -> &str {
        &self.generate_model
    }
}
