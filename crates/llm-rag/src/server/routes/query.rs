//! Question answering endpoint

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use std::time::Instant;

use super::bad_json;
use crate::error::Result;
use crate::server::state::AppState;
use crate::types::{AskQuestionRequest, AskQuestionResponse};

/// POST /ask - Answer a question from stored documents
pub async fn ask_question(
    State(state): State<AppState>,
    payload: std::result::Result<Json<AskQuestionRequest>, JsonRejection>,
) -> Result<Json<AskQuestionResponse>> {
    let Json(request) = payload.map_err(bad_json)?;
    request.validate()?;

    let start = Instant::now();
    tracing::info!(log_type = "application", "Question: \"{}\"", request.question);

    match state.rag().ask_question(&request.question).await {
        Ok(answer) => {
            tracing::info!(
                log_type = "application",
                elapsed_ms = start.elapsed().as_millis() as u64,
                "Answer generated"
            );
            Ok(Json(AskQuestionResponse { answer }))
        }
        Err(e) => {
            tracing::error!(log_type = "application", "Failed to answer question: {}", e);
            Err(e)
        }
    }
}
