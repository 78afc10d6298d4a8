//! OCR Types
//!
//! Upload validation, the provider wire format, and the normalized
//! page model shared by all providers.

use serde::{Deserialize, Serialize};

pub const PDF_MIME_TYPE: &str = "application/pdf";

/// Separator placed between the text of consecutive pages
const PAGE_SEPARATOR: &str = "\n\n";

/// Exit code the OCR provider reports for a successfully parsed page
const PAGE_PARSED: i32 = 1;

// ============================================================================
// Upload
// ============================================================================

/// A PDF received from the client, held in memory for one request
#[derive(Debug, Clone)]
pub struct PdfUpload {
    /// Original file name as sent by the client
    pub file_name: String,
    /// Declared MIME type of the multipart field
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

impl PdfUpload {
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Validate type and size before anything leaves the server
    pub fn validate(&self, max_bytes: usize) -> Result<(), UploadRejection> {
        if !is_pdf(self.content_type.as_deref(), &self.file_name) {
            return Err(UploadRejection::NotPdf);
        }
        if self.size() > max_bytes {
            return Err(UploadRejection::TooLarge {
                size: Some(self.size()),
                max: max_bytes,
            });
        }
        Ok(())
    }
}

/// Reasons an upload is refused before reaching the provider
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UploadRejection {
    #[error("No file in upload")]
    Missing,

    #[error("Not a PDF")]
    NotPdf,

    /// `size` is unknown when the body was cut off before the file was read
    #[error("File too large (max: {max} bytes)")]
    TooLarge { size: Option<usize>, max: usize },
}

/// A file counts as a PDF when either its declared type or its extension says so
pub fn is_pdf(content_type: Option<&str>, file_name: &str) -> bool {
    let declared = content_type
        .and_then(|ct| ct.split(';').next())
        .map(|essence| essence.trim().eq_ignore_ascii_case(PDF_MIME_TYPE))
        .unwrap_or(false);

    declared
        || mime_guess::from_path(file_name.to_ascii_lowercase()).first_raw() == Some(PDF_MIME_TYPE)
}

// ============================================================================
// Normalized result
// ============================================================================

/// One page as reported by a provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OcrPage {
    pub text: String,
    /// False when the provider failed on this page
    pub parsed: bool,
}

/// Provider output for a whole document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OcrDocument {
    pub pages: Vec<OcrPage>,
}

impl OcrDocument {
    /// Text of every usable page, trimmed and separated by blank lines.
    /// Pages that failed to parse or came back blank are dropped.
    pub fn joined_text(&self) -> String {
        self.pages
            .iter()
            .filter(|page| page.parsed)
            .map(|page| page.text.trim())
            .filter(|text| !text.is_empty())
            .collect::<Vec<_>>()
            .join(PAGE_SEPARATOR)
    }
}

// ============================================================================
// OCR.space wire format
// ============================================================================

/// Response body of the OCR.space parse endpoint
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct OcrSpaceResponse {
    #[serde(default)]
    pub parsed_results: Vec<ParsedResult>,
    #[serde(default)]
    pub is_errored_on_processing: bool,
    #[serde(default)]
    pub error_message: Option<ProviderMessage>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ParsedResult {
    #[serde(default)]
    pub parsed_text: Option<String>,
    #[serde(default)]
    pub file_parse_exit_code: i32,
    #[serde(default)]
    pub error_message: Option<ProviderMessage>,
}

/// The provider sends error messages either as a string or a list of strings
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ProviderMessage {
    One(String),
    Many(Vec<String>),
}

impl ProviderMessage {
    /// Flatten into one line, `None` when there is nothing to show
    pub fn into_text(self) -> Option<String> {
        let text = match self {
            Self::One(message) => message,
            Self::Many(messages) => messages.join("; "),
        };
        let text = text.trim();
        (!text.is_empty()).then(|| text.to_string())
    }
}

impl From<OcrSpaceResponse> for OcrDocument {
    fn from(response: OcrSpaceResponse) -> Self {
        let pages = response
            .parsed_results
            .into_iter()
            .map(|result| OcrPage {
                parsed: result.file_parse_exit_code == PAGE_PARSED,
                text: result.parsed_text.unwrap_or_default(),
            })
            .collect();
        OcrDocument { pages }
    }
}

// ============================================================================
// Errors
// ============================================================================

/// OCR error types
#[derive(Debug, thiserror::Error)]
pub enum OcrError {
    #[error("Failed to call OCR provider: {0}")]
    Request(#[from] reqwest::Error),

    #[error("OCR provider returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("OCR processing failed: {}", .0.as_deref().unwrap_or("no message"))]
    Processing(Option<String>),

    #[error("Failed to parse OCR response: {0}")]
    Decode(String),
}
