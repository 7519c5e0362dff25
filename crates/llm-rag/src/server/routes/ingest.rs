//! Document ingestion endpoint

use axum::{extract::rejection::JsonRejection, extract::State, Json};

use super::bad_json;
use crate::error::Result;
use crate::server::state::AppState;
use crate::types::{AddDocumentsRequest, AddDocumentsResponse};

/// POST /add-documents - Embed and store documents
pub async fn add_documents(
    State(state): State<AppState>,
    payload: std::result::Result<Json<AddDocumentsRequest>, JsonRejection>,
) -> Result<Json<AddDocumentsResponse>> {
    let Json(request) = payload.map_err(bad_json)?;
    request.validate()?;

    tracing::info!(log_type = "application", count = request.documents.len(), "Adding documents");

    if let Err(e) = state.rag().add_documents(&request.documents).await {
        tracing::error!(log_type = "application", "Failed to add documents: {}", e);
        return Err(e);
    }

    Ok(Json(AddDocumentsResponse::default()))
}
