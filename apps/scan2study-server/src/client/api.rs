//! Typed HTTP client for the three endpoints

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::de::DeserializeOwned;

use crate::api::{
    AnswerResponse, OcrResponse, QaRequest, SummaryRequest, SummaryResponse, OCR_PATH, QA_PATH,
    SUMMARY_PATH, UPLOAD_FIELD,
};
use crate::error::ErrorResponse;
use crate::ocr::{is_pdf, PDF_MIME_TYPE};

const UNEXPECTED: &str = "An unexpected error occurred. Please try again.";

/// A file picked by the user, not yet sent anywhere
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, content_type: Option<&str>, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.map(str::to_string),
            data,
        }
    }

    pub fn is_pdf(&self) -> bool {
        is_pdf(self.content_type.as_deref(), &self.name)
    }

    /// Declared type if it parses as a MIME type, otherwise `application/pdf`
    pub fn upload_mime(&self) -> &str {
        self.content_type
            .as_deref()
            .filter(|declared| declared.parse::<mime_guess::mime::Mime>().is_ok())
            .unwrap_or(PDF_MIME_TYPE)
    }
}

/// Client error types
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The server answered with a non-success status
    #[error("Server returned {status}: {message}")]
    Server { status: u16, message: String },

    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

impl ClientError {
    /// Text to show the user
    pub fn user_message(&self) -> String {
        match self {
            Self::Server { message, .. } => message.clone(),
            Self::Transport(_) => UNEXPECTED.to_string(),
        }
    }
}

/// The server API as seen by the upload and study views
#[async_trait]
pub trait StudyApi: Send + Sync {
    async fn parse_pdf(&self, file: &SelectedFile) -> Result<OcrResponse, ClientError>;

    async fn summarize(&self, text: &str) -> Result<String, ClientError>;

    async fn ask(&self, text: &str, question: &str) -> Result<String, ClientError>;
}

/// `StudyApi` over HTTP
#[derive(Debug, Clone)]
pub struct HttpStudyApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpStudyApi {
    pub fn new(base_url: &str) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Decode a success body, or turn an error body into `ClientError::Server`
    async fn read<T: DeserializeOwned>(
        response: reqwest::Response,
        fallback: &str,
    ) -> Result<T, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json::<T>().await?);
        }

        let message = response
            .json::<ErrorResponse>()
            .await
            .ok()
            .map(|body| body.error)
            .filter(|error| !error.is_empty())
            .unwrap_or_else(|| fallback.to_string());

        tracing::debug!(status = status.as_u16(), %message, "Request rejected");
        Err(ClientError::Server {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl StudyApi for HttpStudyApi {
    async fn parse_pdf(&self, file: &SelectedFile) -> Result<OcrResponse, ClientError> {
        let part = Part::bytes(file.data.clone())
            .file_name(file.name.clone())
            .mime_str(file.upload_mime())?;

        let response = self
            .client
            .post(self.url(OCR_PATH))
            .multipart(Form::new().part(UPLOAD_FIELD, part))
            .send()
            .await?;

        Self::read(response, "Failed to parse PDF").await
    }

    async fn summarize(&self, text: &str) -> Result<String, ClientError> {
        let response = self
            .client
            .post(self.url(SUMMARY_PATH))
            .json(&SummaryRequest {
                text: Some(text.to_string()),
            })
            .send()
            .await?;

        let body: SummaryResponse = Self::read(response, "Failed to generate summary").await?;
        Ok(body.summary)
    }

    async fn ask(&self, text: &str, question: &str) -> Result<String, ClientError> {
        let response = self
            .client
            .post(self.url(QA_PATH))
            .json(&QaRequest {
                text: Some(text.to_string()),
                question: Some(question.to_string()),
            })
            .send()
            .await?;

        let body: AnswerResponse = Self::read(response, "Failed to answer question").await?;
        Ok(body.answer)
    }
}
