//! OCR Module
//!
//! Sends uploaded PDFs to an external OCR provider and normalizes the
//! per-page results into a single block of text.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use scan2study_server::ocr::{OcrProviderTrait, OcrSpaceProvider, PdfUpload};
//!
//! let provider = OcrSpaceProvider::new(client, &config.ocr, api_key);
//! let document = provider.extract(&upload).await?;
//! let text = document.joined_text();
//! ```

pub(crate) mod provider;
mod types;

pub use provider::{OcrProviderTrait, OcrSpaceProvider};
pub use types::{
    is_pdf, OcrDocument, OcrError, OcrPage, OcrSpaceResponse, ParsedResult, PdfUpload,
    ProviderMessage, UploadRejection, PDF_MIME_TYPE,
};
