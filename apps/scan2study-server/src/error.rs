//! Error types for the Scan2Study server

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::llm::{LlmError, LlmTask};
use crate::ocr::{OcrError, UploadRejection};

/// Application-wide result type
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Rejected upload: {0}")]
    Upload(#[from] UploadRejection),

    #[error("Unreadable upload: {0}")]
    InvalidUpload(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("No text extracted")]
    NoTextExtracted,

    #[error("Missing credential: {0}")]
    MissingCredential(&'static str),

    #[error("OCR error: {0}")]
    Ocr(#[from] OcrError),

    #[error("Language model error ({task:?}): {source}")]
    Llm {
        task: LlmTask,
        #[source]
        source: LlmError,
    },

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

const NOT_A_PDF: &str = "Please upload a PDF file.";
const INTERNAL: &str = "Internal server error";

impl AppError {
    pub fn llm(task: LlmTask, source: LlmError) -> Self {
        Self::Llm { task, source }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Upload(_) | Self::InvalidUpload(_) | Self::BadRequest(_) | Self::NoTextExtracted => {
                StatusCode::BAD_REQUEST
            }
            Self::MissingCredential(_) | Self::Ocr(_) | Self::Llm { .. } | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn code(&self) -> &'static str {
        match self {
            Self::Upload(UploadRejection::Missing) => "MISSING_FILE",
            Self::Upload(UploadRejection::NotPdf) => "INVALID_FILE_TYPE",
            Self::Upload(UploadRejection::TooLarge { .. }) => "FILE_TOO_LARGE",
            Self::InvalidUpload(_) => "INVALID_UPLOAD",
            Self::BadRequest(_) => "BAD_REQUEST",
            Self::NoTextExtracted => "NO_TEXT_EXTRACTED",
            Self::MissingCredential(_) => "NOT_CONFIGURED",
            Self::Ocr(_) => "OCR_ERROR",
            Self::Llm { .. } => "LLM_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Message shown to the user. Upstream details stay in the logs.
    fn public_message(&self) -> String {
        match self {
            Self::Upload(UploadRejection::Missing | UploadRejection::NotPdf) => NOT_A_PDF.to_string(),
            Self::Upload(UploadRejection::TooLarge { max, .. }) => format!(
                "File size exceeds {}MB limit. Please upload a smaller file.",
                format_megabytes(*max)
            ),
            Self::InvalidUpload(msg) | Self::BadRequest(msg) => msg.clone(),
            Self::NoTextExtracted => "No text could be extracted from the PDF.".to_string(),
            Self::MissingCredential(var) => format!("{var} is not configured."),
            Self::Ocr(OcrError::Status { .. }) => {
                "Failed to process PDF. Please try again.".to_string()
            }
            Self::Ocr(OcrError::Processing(message)) => message
                .clone()
                .unwrap_or_else(|| "Failed to extract text from PDF.".to_string()),
            Self::Ocr(_) | Self::Internal(_) => INTERNAL.to_string(),
            Self::Llm { task, .. } => task.failure_message().to_string(),
        }
    }
}

fn format_megabytes(bytes: usize) -> String {
    let mb = bytes as f64 / (1024.0 * 1024.0);
    if mb.fract() == 0.0 {
        format!("{mb:.0}")
    } else {
        format!("{mb:.1}")
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(code = self.code(), "{}", self);
        } else {
            tracing::debug!(code = self.code(), "Rejected request: {}", self);
        }

        let body = Json(ErrorResponse {
            error: self.public_message(),
            code: self.code().to_string(),
        });

        (status, body).into_response()
    }
}
