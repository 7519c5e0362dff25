//! Configuration for the RAG system
//!
//! Loaded once at startup: defaults, then an optional TOML file named by
//! `RAG_CONFIG_FILE`, then environment variables.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{Error, Result};

/// Environment variable holding the Gemini API key
pub const API_KEY_ENV: &str = "GEMINI_FLASH_API_KEY";

/// Main RAG system configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RagConfig {
    /// Orchestration backend
    pub backend: RagBackend,
    /// Server configuration
    pub server: ServerConfig,
    /// Gemini embedding + generation configuration
    pub gemini: GeminiConfig,
    /// Weaviate vector store configuration
    pub weaviate: WeaviateConfig,
    /// Log output configuration
    pub logging: LoggingConfig,
}

impl RagConfig {
    /// Load configuration from the process environment
    ///
    /// Reads `RAG_CONFIG_FILE` (TOML) first when set, then applies
    /// environment overrides.
    pub fn from_env() -> Result<Self> {
        let mut config = match std::env::var("RAG_CONFIG_FILE") {
            Ok(path) if !path.is_empty() => Self::from_file(&path)?,
            _ => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::config(format!("Invalid TOML: {}", e)))
    }

    /// Apply environment-style overrides from a key lookup
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = get(API_KEY_ENV) {
            self.gemini.api_key = key;
        }
        if let Some(client) = get("RAG_CLIENT") {
            self.backend = RagBackend::from_name(&client);
        }
        if let Some(host) = get("WEAVIATE_DB_HOST") {
            self.weaviate.host = host;
        }
        if let Some(scheme) = get("WEAVIATE_DB_SCHEME") {
            self.weaviate.scheme = scheme;
        }
        if let Some(host) = get("RAG_HOST") {
            self.server.host = host;
        }
        if let Some(port) = get("RAG_PORT") {
            match port.parse() {
                Ok(port) => self.server.port = port,
                Err(_) => tracing::warn!(log_type = "application", "Ignoring invalid RAG_PORT: {}", port),
            }
        }
        if let Some(format) = get("RAG_LOG_FORMAT") {
            self.logging.format = LogFormat::from_name(&format);
        }
    }

    /// Reject configurations the process must not start with
    pub fn validate(&self) -> Result<()> {
        if self.gemini.api_key.trim().is_empty() {
            return Err(Error::config(format!("{} is not set", API_KEY_ENV)));
        }
        if self.weaviate.host.trim().is_empty() {
            return Err(Error::config("Weaviate host must not be empty"));
        }
        Ok(())
    }
}

/// Orchestration backend selection
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RagBackend {
    /// Direct calls to each provider's native protocol
    #[default]
    Direct,
    /// Calls mediated through the document-store layer
    DocStore,
}

impl RagBackend {
    /// Resolve a backend from its configured name
    ///
    /// Unknown names fall back to [`RagBackend::Direct`].
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "docstore" | "langchain" | "langchan" => RagBackend::DocStore,
            _ => RagBackend::Direct,
        }
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host address
    pub host: String,
    /// Port number
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
        }
    }
}

/// Gemini (Generative Language API) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeminiConfig {
    /// API key, never serialized back out
    #[serde(skip_serializing)]
    pub api_key: String,
    /// API base URL
    pub base_url: String,
    /// Generation model name
    pub generate_model: String,
    /// Embedding model name
    pub embed_model: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            generate_model: "gemini-1.5-flash".to_string(),
            embed_model: "text-embedding-004".to_string(),
            timeout_secs: 60,
        }
    }
}

/// Weaviate configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WeaviateConfig {
    /// Host and port, without scheme
    pub host: String,
    /// URL scheme
    pub scheme: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for WeaviateConfig {
    fn default() -> Self {
        Self {
            host: "localhost:5555".to_string(),
            scheme: "http".to_string(),
            timeout_secs: 30,
        }
    }
}

impl WeaviateConfig {
    /// Base URL of the REST API
    pub fn base_url(&self) -> String {
        format!("{}://{}/v1", self.scheme, self.host.trim_end_matches('/'))
    }
}

/// Log output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Output format
    pub format: LogFormat,
    /// Default filter directive when `RUST_LOG` is unset
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::Json,
            filter: "llm_rag=info,tower_http=info".to_string(),
        }
    }
}

/// Log line format
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// One JSON object per line
    #[default]
    Json,
    /// Human-readable output
    Pretty,
}

impl LogFormat {
    fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" => LogFormat::Pretty,
            _ => LogFormat::Json,
        }
    }
}
