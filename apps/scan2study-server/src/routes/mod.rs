//! Route modules for Scan2Study Server

pub mod health;
pub mod ocr;
pub mod qa;
pub mod summary;

use axum::{routing::get, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::api::{OCR_PATH, QA_PATH, SUMMARY_PATH};
use crate::error::AppError;
use crate::state::AppState;

/// Build the application router with tracing and CORS layers
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let max_upload = state.config().ocr.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_check))
        .route("/api/health", get(health::health_check))
        .nest(OCR_PATH, ocr::router(max_upload))
        .nest(SUMMARY_PATH, summary::router())
        .nest(QA_PATH, qa::router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Require a non-blank string field
pub(crate) fn require_text(value: Option<String>, message: &str) -> Result<String, AppError> {
    match value {
        Some(text) if !text.trim().is_empty() => Ok(text),
        _ => Err(AppError::BadRequest(message.to_string())),
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
        response::Response,
    };
    use tower::ServiceExt;

    use crate::config::Config;
    use crate::llm::provider::MockModel;
    use crate::llm::LanguageModel;
    use crate::ocr::provider::MockProvider;
    use crate::ocr::OcrProviderTrait;
    use crate::state::AppState;

    pub fn state(ocr: Option<Arc<MockProvider>>, llm: Option<Arc<MockModel>>) -> AppState {
        state_with(Config::with_credentials(), ocr, llm)
    }

    pub fn state_with(
        config: Config,
        ocr: Option<Arc<MockProvider>>,
        llm: Option<Arc<MockModel>>,
    ) -> AppState {
        AppState::with_providers(
            config,
            ocr.map(|p| p as Arc<dyn OcrProviderTrait>),
            llm.map(|m| m as Arc<dyn LanguageModel>),
        )
    }

    pub async fn send(state: AppState, request: Request<Body>) -> Response {
        super::app(state).oneshot(request).await.unwrap()
    }

    pub async fn json_body(response: Response) -> (StatusCode, serde_json::Value) {
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    pub fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    /// Hand-built multipart body with a single `file` field
    pub fn post_pdf(file_name: &str, content_type: &str, data: &[u8]) -> Request<Body> {
        let boundary = "scan2study-test-boundary";
        let mut body = format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
        )
        .into_bytes();
        body.extend_from_slice(data);
        body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri("/api/ocr")
            .header(
                "content-type",
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap()
    }
}
