//! OCR Providers
//!
//! Defines the provider trait and the OCR.space implementation.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};

use super::types::{OcrDocument, OcrError, OcrSpaceResponse, PdfUpload, PDF_MIME_TYPE};
use crate::config::OcrConfig;

/// OCR provider trait
#[async_trait]
pub trait OcrProviderTrait: Send + Sync {
    /// Provider name for logs
    fn name(&self) -> &'static str;

    /// Extract per-page text from a PDF. Exactly one outbound call, no retry.
    async fn extract(&self, upload: &PdfUpload) -> Result<OcrDocument, OcrError>;
}

/// OCR.space HTTP provider
pub struct OcrSpaceProvider {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    language: String,
}

impl OcrSpaceProvider {
    pub fn new(client: reqwest::Client, config: &OcrConfig, api_key: &str) -> Self {
        Self {
            client,
            endpoint: config.endpoint.clone(),
            api_key: api_key.to_string(),
            language: config.language.clone(),
        }
    }

    fn form(&self, upload: &PdfUpload) -> Result<Form, OcrError> {
        let part = Part::bytes(upload.data.clone())
            .file_name(upload.file_name.clone())
            .mime_str(PDF_MIME_TYPE)?;

        Ok(Form::new()
            .part("file", part)
            .text("language", self.language.clone())
            // Plain text only, no word positions
            .text("isOverlayRequired", "false"))
    }
}

#[async_trait]
impl OcrProviderTrait for OcrSpaceProvider {
    fn name(&self) -> &'static str {
        "ocr.space"
    }

    async fn extract(&self, upload: &PdfUpload) -> Result<OcrDocument, OcrError> {
        tracing::debug!(
            file_name = %upload.file_name,
            size = upload.size(),
            "Sending PDF to OCR provider"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .header("apikey", &self.api_key)
            .multipart(self.form(upload)?)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(OcrError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: OcrSpaceResponse = response
            .json()
            .await
            .map_err(|e| OcrError::Decode(e.to_string()))?;

        if parsed.is_errored_on_processing {
            return Err(OcrError::Processing(
                parsed.error_message.and_then(|m| m.into_text()),
            ));
        }

        let document = OcrDocument::from(parsed);
        tracing::debug!(pages = document.pages.len(), "OCR provider responded");
        Ok(document)
    }
}

/// Mock provider for testing
#[cfg(test)]
pub struct MockProvider {
    pub outcome: MockOutcome,
    pub calls: std::sync::atomic::AtomicUsize,
}

#[cfg(test)]
pub enum MockOutcome {
    Document(OcrDocument),
    Status(u16),
    Processing(Option<String>),
}

#[cfg(test)]
impl MockProvider {
    pub fn new(outcome: MockOutcome) -> Self {
        Self {
            outcome,
            calls: std::sync::atomic::AtomicUsize::new(0),
        }
    }

    pub fn with_pages(pages: &[(&str, bool)]) -> Self {
        let pages = pages
            .iter()
            .map(|(text, parsed)| super::types::OcrPage {
                text: text.to_string(),
                parsed: *parsed,
            })
            .collect();
        Self::new(MockOutcome::Document(OcrDocument { pages }))
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[cfg(test)]
#[async_trait]
impl OcrProviderTrait for MockProvider {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn extract(&self, _upload: &PdfUpload) -> Result<OcrDocument, OcrError> {
        self.calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        match &self.outcome {
            MockOutcome::Document(doc) => Ok(doc.clone()),
            MockOutcome::Status(status) => Err(OcrError::Status {
                status: *status,
                body: String::new(),
            }),
            MockOutcome::Processing(message) => Err(OcrError::Processing(message.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn test_provider_uses_configured_endpoint() {
        let config = Config::default();
        let provider = OcrSpaceProvider::new(reqwest::Client::new(), &config.ocr, "key");

        assert_eq!(provider.endpoint, "https://api.ocr.space/parse/image");
        assert_eq!(provider.language, "eng");
        assert_eq!(provider.name(), "ocr.space");
    }

    #[tokio::test]
    async fn test_mock_counts_calls() {
        let mock = MockProvider::with_pages(&[("a", true)]);
        let upload = PdfUpload {
            file_name: "a.pdf".to_string(),
            content_type: None,
            data: vec![1, 2, 3],
        };

        let doc = mock.extract(&upload).await.unwrap();
        assert_eq!(doc.joined_text(), "a");
        assert_eq!(mock.call_count(), 1);
    }
}
