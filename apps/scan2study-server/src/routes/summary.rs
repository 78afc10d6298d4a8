//! Summary endpoint
//!
//! `POST /api/summary` with `{ "text": ... }` returns a bullet-point synopsis
//! of the reading.

use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};

use super::require_text;
use crate::api::{SummaryRequest, SummaryResponse};
use crate::error::{AppError, Result};
use crate::llm::{prompts, LlmTask};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/", post(summarize))
}

async fn summarize(
    State(state): State<AppState>,
    payload: std::result::Result<Json<SummaryRequest>, JsonRejection>,
) -> Result<Json<SummaryResponse>> {
    let model = state.llm()?;

    let Json(request) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let text = require_text(
        request.text,
        "Text is required and must be a non-empty string.",
    )?;

    tracing::info!(chars = text.len(), model = model.name(), "Generating summary");

    let completion = model
        .complete(prompts::summary_request(
            &text,
            state.config().llm.summary_max_tokens,
        ))
        .await
        .map_err(|e| AppError::llm(LlmTask::Summary, e))?;

    Ok(Json(SummaryResponse {
        summary: LlmTask::Summary.extract(&completion),
    }))
}
