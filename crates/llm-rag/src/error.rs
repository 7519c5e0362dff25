//! Error types for the RAG system

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Result type alias for RAG operations
pub type Result<T> = std::result::Result<T, Error>;

/// RAG system errors
///
/// Every provider failure maps onto exactly one of these kinds. Both
/// orchestration backends surface the same kinds for the same stage.
#[derive(Debug, Error)]
pub enum Error {
    /// Missing or invalid configuration, fatal at startup
    #[error("Configuration error: {0}")]
    Config(String),

    /// Embedding provider call failed or returned a mismatched count
    #[error("Embedding failed: {0}")]
    Embedding(String),

    /// Vector store write or collection check/create failed
    #[error("Storage error: {0}")]
    Storage(String),

    /// Similarity search failed or the store reported query errors
    #[error("Retrieval error: {0}")]
    Retrieval(String),

    /// Retrieval result did not have the expected text-bearing shape
    #[error("Decoding retrieval results failed: {0}")]
    Decode(String),

    /// Generative model call failed
    #[error("Generation failed: {0}")]
    Generation(String),

    /// Generative model answered with zero candidates or a non-text part
    #[error("Unexpected response shape: {0}")]
    UnexpectedResponseShape(String),

    /// Client input rejected at the HTTP boundary
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create an embedding error
    pub fn embedding(message: impl Into<String>) -> Self {
        Self::Embedding(message.into())
    }

    /// Create a storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }

    /// Create a retrieval error
    pub fn retrieval(message: impl Into<String>) -> Self {
        Self::Retrieval(message.into())
    }

    /// Create a decode error
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode(message.into())
    }

    /// Create a generation error
    pub fn generation(message: impl Into<String>) -> Self {
        Self::Generation(message.into())
    }

    /// Create an invalid request error
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    /// HTTP status this error maps to at the request boundary
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}
