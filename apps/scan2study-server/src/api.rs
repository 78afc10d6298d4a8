//! Request and response bodies of the HTTP API
//!
//! Shared by the route handlers and the typed client.

use serde::{Deserialize, Serialize};

/// Multipart field carrying the PDF
pub const UPLOAD_FIELD: &str = "file";

pub const OCR_PATH: &str = "/api/ocr";
pub const SUMMARY_PATH: &str = "/api/summary";
pub const QA_PATH: &str = "/api/qa";

/// Response of `POST /api/ocr`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OcrResponse {
    pub text: String,
    /// Absent in responses from older deployments
    #[serde(default)]
    pub file_name: Option<String>,
}

/// Body of `POST /api/summary`.
///
/// Fields are optional so that a missing value is reported as a
/// validation error rather than a deserialization failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SummaryRequest {
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryResponse {
    pub summary: String,
}

/// Body of `POST /api/qa`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QaRequest {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub question: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerResponse {
    pub answer: String,
}
