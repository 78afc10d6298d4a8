//! OCR endpoint
//!
//! `POST /api/ocr` takes a multipart upload with a `file` field, forwards the
//! PDF to the OCR provider, and returns the extracted text.

use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        DefaultBodyLimit, Multipart, State,
    },
    http::StatusCode,
    routing::post,
    Json, Router,
};

use crate::api::{OcrResponse, UPLOAD_FIELD};
use crate::error::{AppError, Result};
use crate::ocr::{PdfUpload, UploadRejection};
use crate::state::AppState;

/// Name used when the client sends a PDF without a file name
const DEFAULT_FILE_NAME: &str = "document.pdf";

/// Slack above the upload ceiling for multipart framing and stray fields,
/// so that oversized files still reach the handler's own size check.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

pub fn router(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/", post(extract_text))
        .layer(DefaultBodyLimit::max(
            max_upload_bytes.saturating_mul(2) + MULTIPART_OVERHEAD,
        ))
}

/// Extract text from an uploaded PDF
async fn extract_text(
    State(state): State<AppState>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Json<OcrResponse>> {
    let provider = state.ocr()?;

    let multipart = multipart.map_err(|e| {
        tracing::debug!("Rejected non-multipart upload: {}", e);
        AppError::from(UploadRejection::Missing)
    })?;

    let max_upload_bytes = state.config().ocr.max_upload_bytes;
    let upload = read_upload(multipart, max_upload_bytes)
        .await?
        .ok_or(UploadRejection::Missing)?;
    upload.validate(max_upload_bytes)?;

    tracing::info!(
        file_name = %upload.file_name,
        size = upload.size(),
        provider = provider.name(),
        "Extracting text from PDF"
    );

    let document = provider.extract(&upload).await?;
    let text = document.joined_text();
    if text.is_empty() {
        tracing::warn!(
            file_name = %upload.file_name,
            pages = document.pages.len(),
            "OCR returned no usable text"
        );
        return Err(AppError::NoTextExtracted);
    }

    tracing::info!(
        file_name = %upload.file_name,
        pages = document.pages.len(),
        chars = text.len(),
        "Text extracted"
    );

    Ok(Json(OcrResponse {
        text,
        file_name: Some(upload.file_name),
    }))
}

/// A body cut off at the size limit is an oversized file, anything else is
/// a malformed upload
fn read_failed(e: MultipartError, max_upload_bytes: usize) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        tracing::info!(max = max_upload_bytes, "Upload exceeded body limit: {}", e);
        return UploadRejection::TooLarge {
            size: None,
            max: max_upload_bytes,
        }
        .into();
    }
    tracing::warn!("Failed to read upload: {}", e);
    AppError::InvalidUpload("Failed to read upload".to_string())
}

/// Pull the `file` field out of the multipart body, skipping anything else
async fn read_upload(
    mut multipart: Multipart,
    max_upload_bytes: usize,
) -> Result<Option<PdfUpload>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| read_failed(e, max_upload_bytes))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);

        // A plain text field named `file` is not an upload
        if file_name.is_none() && content_type.is_none() {
            return Ok(None);
        }

        let data = field
            .bytes()
            .await
            .map_err(|e| read_failed(e, max_upload_bytes))?;

        return Ok(Some(PdfUpload {
            file_name: file_name
                .filter(|name| !name.is_empty())
                .unwrap_or_else(|| DEFAULT_FILE_NAME.to_string()),
            content_type,
            data: data.to_vec(),
        }));
    }

    Ok(None)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};

    use super::super::test_support::{json_body, post_pdf, send, state, state_with};
    use crate::config::Config;
    use crate::ocr::provider::{MockOutcome, MockProvider};
    use crate::state::AppState;

    const PDF: &[u8] = b"%PDF-1.4 fake";

    #[tokio::test]
    async fn test_two_pages_joined() {
        let mock = Arc::new(MockProvider::with_pages(&[("Page1", true), ("Page2", true)]));
        let response = send(
            state(Some(mock.clone()), None),
            post_pdf("reading.pdf", "application/pdf", PDF),
        )
        .await;

        let (status, body) = json_body(response).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["text"], "Page1\n\nPage2");
        assert_eq!(body["fileName"], "reading.pdf");
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test]
    async fn test_non_pdf_rejected_without_upstream_call() {
        for (name, content_type) in [
            ("photo.png", "image/png"),
            ("notes.txt", "text/plain"),
            ("scan", "application/octet-stream"),
        ] {
            let mock = Arc::new(MockProvider::with_pages(&[("x", true)]));
            let response = send(
                state(Some(mock.clone()), None),
                post_pdf(name, content_type, PDF),
            )
            .await;

            let (status, body) = json_body(response).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "{name}");
            assert_eq!(body["error"], "Please upload a PDF file.");
            assert_eq!(mock.call_count(), 0);
        }
    }

    #[tokio::test]
    async fn test_pdf_extension_accepted_with_generic_type() {
        let mock = Arc::new(MockProvider::with_pages(&[("ok", true)]));
        let response = send(
            state(Some(mock.clone()), None),
            post_pdf("Scan.PDF", "application/octet-stream", PDF),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(mock.call_count(), 1);
    }

    #[tokio::test]
    async fn test_oversized_file_rejected_before_upload() {
        let mock = Arc::new(MockProvider::with_pages(&[("x", true)]));
        let data = vec![b'a'; 1024 * 1024 + 1];
        let response = send(
            state(Some(mock.clone()), None),
            post_pdf("big.pdf", "application/pdf", &data),
        )
        .await;

        let (status, body) = json_body(response).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["error"],
            "File size exceeds 1MB limit. Please upload a smaller file."
        );
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn test_body_over_limit_reports_file_size() {
        let mut config = Config::with_credentials();
        config.ocr.max_upload_bytes = 512 * 1024;
        let mock = Arc::new(MockProvider::with_pages(&[("x", true)]));

        // Past the body limit of 2 * 512KiB + 64KiB
        let data = vec![b'a'; 1_300_000];
        let response = send(
            state_with(config, Some(mock.clone()), None),
            post_pdf("huge.pdf", "application/pdf", &data),
        )
        .await;

        let (status, body) = json_body(response).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "FILE_TOO_LARGE");
        assert_eq!(
            body["error"],
            "File size exceeds 0.5MB limit. Please upload a smaller file."
        );
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn test_missing_file_field() {
        let mock = Arc::new(MockProvider::with_pages(&[("x", true)]));
        let boundary = "b";
        let body = format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"other\"\r\n\r\nvalue\r\n--{boundary}--\r\n"
        );
        let request = Request::builder()
            .method("POST")
            .uri("/api/ocr")
            .header(
                "content-type",
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap();

        let (status, body) = json_body(send(state(Some(mock.clone()), None), request).await).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "MISSING_FILE");
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn test_zero_usable_pages_is_400() {
        let mock = Arc::new(MockProvider::with_pages(&[("junk", false), ("  ", true)]));
        let response = send(
            state(Some(mock), None),
            post_pdf("blank.pdf", "application/pdf", PDF),
        )
        .await;

        let (status, body) = json_body(response).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "No text could be extracted from the PDF.");
    }

    #[tokio::test]
    async fn test_missing_credential_is_500() {
        let state = AppState::with_providers(Config::default(), None, None);
        let response = send(state, post_pdf("a.pdf", "application/pdf", PDF)).await;

        let (status, body) = json_body(response).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "OCR_API_KEY is not configured.");
    }

    #[tokio::test]
    async fn test_upstream_failures_are_500() {
        let mock = Arc::new(MockProvider::new(MockOutcome::Status(503)));
        let (status, body) = json_body(
            send(
                state(Some(mock), None),
                post_pdf("a.pdf", "application/pdf", PDF),
            )
            .await,
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Failed to process PDF. Please try again.");

        let mock = Arc::new(MockProvider::new(MockOutcome::Processing(None)));
        let (status, body) = json_body(
            send(
                state(Some(mock), None),
                post_pdf("a.pdf", "application/pdf", PDF),
            )
            .await,
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Failed to extract text from PDF.");
    }
}
