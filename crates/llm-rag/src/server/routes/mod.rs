//! API routes for the RAG server

pub mod ingest;
pub mod query;

use axum::{extract::rejection::JsonRejection, routing::post, Router};

use crate::error::Error;
use crate::server::state::AppState;

/// Build all API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/add-documents", post(ingest::add_documents))
        .route("/ask", post(query::ask_question))
}

/// Any body that fails JSON extraction is the client's fault
pub(crate) fn bad_json(rejection: JsonRejection) -> Error {
    let message = rejection.body_text();
    tracing::error!(log_type = "application", "Failed to parse request JSON: {}", message);
    Error::invalid_request(message)
}
