//! Question-answering endpoint
//!
//! `POST /api/qa` with `{ "text": ..., "question": ... }` answers the question
//! from the reading alone.

use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};

use super::require_text;
use crate::api::{AnswerResponse, QaRequest};
use crate::error::{AppError, Result};
use crate::llm::{prompts, LlmTask};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/", post(answer))
}

async fn answer(
    State(state): State<AppState>,
    payload: std::result::Result<Json<QaRequest>, JsonRejection>,
) -> Result<Json<AnswerResponse>> {
    let model = state.llm()?;

    let Json(request) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let text = require_text(
        request.text,
        "Text is required and must be a non-empty string.",
    )?;
    let question = require_text(
        request.question,
        "Question is required and must be a non-empty string.",
    )?;

    tracing::info!(
        chars = text.len(),
        question_len = question.len(),
        model = model.name(),
        "Answering question"
    );

    let completion = model
        .complete(prompts::answer_request(
            &text,
            &question,
            state.config().llm.answer_max_tokens,
        ))
        .await
        .map_err(|e| AppError::llm(LlmTask::Answer, e))?;

    Ok(Json(AnswerResponse {
        answer: LlmTask::Answer.extract(&completion),
    }))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::http::StatusCode;
    use serde_json::json;

    use super::super::test_support::{json_body, post_json, send, state};
    use crate::llm::prompts::UNSURE_ANSWER;
    use crate::llm::provider::MockModel;

    #[tokio::test]
    async fn test_answer_returned() {
        let model = Arc::new(MockModel::replying("Because of X."));
        let response = send(
            state(None, Some(model.clone())),
            post_json("/api/qa", json!({ "text": "Reading", "question": "Why?" })),
        )
        .await;

        let (status, body) = json_body(response).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["answer"], "Because of X.");

        let requests = model.requests.lock();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].max_tokens, 512);
        assert!(requests[0].system.contains(UNSURE_ANSWER));
        assert!(requests[0].prompt.contains("The student asks:\n\nWhy?"));
    }

    #[tokio::test]
    async fn test_blank_inputs_rejected_without_upstream_call() {
        let cases = [
            (json!({ "text": "", "question": "Why?" }), "Text is required"),
            (json!({ "text": "  ", "question": "Why?" }), "Text is required"),
            (json!({ "text": "Reading", "question": " \n" }), "Question is required"),
            (json!({ "text": "Reading" }), "Question is required"),
        ];

        for (body, expected) in cases {
            let model = Arc::new(MockModel::replying("unused"));
            let response = send(
                state(None, Some(model.clone())),
                post_json("/api/qa", body.clone()),
            )
            .await;

            let (status, json) = json_body(response).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
            assert!(json["error"].as_str().unwrap().starts_with(expected));
            assert_eq!(model.call_count(), 0);
        }
    }

    #[tokio::test]
    async fn test_upstream_failure_is_500() {
        let model = Arc::new(MockModel::failing());
        let response = send(
            state(None, Some(model.clone())),
            post_json("/api/qa", json!({ "text": "Reading", "question": "Why?" })),
        )
        .await;

        let (status, body) = json_body(response).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Failed to answer question.");
        assert_eq!(model.call_count(), 1);
    }
}
