//! Application state management

use std::sync::Arc;

use crate::config::Config;
use crate::error::AppError;
use crate::llm::{AnthropicProvider, LanguageModel};
use crate::ocr::{OcrProviderTrait, OcrSpaceProvider};

/// Error type for state initialization
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,
    ocr: Option<Arc<dyn OcrProviderTrait>>,
    llm: Option<Arc<dyn LanguageModel>>,
}

impl AppState {
    /// Create application state from configuration.
    ///
    /// Providers are only built when their credential is present; the
    /// matching endpoint answers with a configuration error otherwise.
    pub fn new(config: Config) -> Result<Self, StateError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("scan2study-server/", env!("CARGO_PKG_VERSION")))
            .build()?;

        let ocr = config.ocr.api_key.as_deref().map(|key| {
            Arc::new(OcrSpaceProvider::new(client.clone(), &config.ocr, key))
                as Arc<dyn OcrProviderTrait>
        });
        let llm = config.llm.api_key.as_deref().map(|key| {
            Arc::new(AnthropicProvider::new(client.clone(), &config.llm, key))
                as Arc<dyn LanguageModel>
        });

        if ocr.is_none() {
            tracing::warn!("OCR_API_KEY is not set, /api/ocr will fail");
        }
        if llm.is_none() {
            tracing::warn!("ANTHROPIC_API_KEY is not set, /api/summary and /api/qa will fail");
        }

        Ok(Self::with_providers(config, ocr, llm))
    }

    /// Create application state with explicit providers
    pub fn with_providers(
        config: Config,
        ocr: Option<Arc<dyn OcrProviderTrait>>,
        llm: Option<Arc<dyn LanguageModel>>,
    ) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, ocr, llm }),
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Get the OCR provider, failing when its credential is missing
    pub fn ocr(&self) -> Result<&dyn OcrProviderTrait, AppError> {
        self.inner
            .ocr
            .as_deref()
            .ok_or(AppError::MissingCredential("OCR_API_KEY"))
    }

    /// Get the language model, failing when its credential is missing
    pub fn llm(&self) -> Result<&dyn LanguageModel, AppError> {
        self.inner
            .llm
            .as_deref()
            .ok_or(AppError::MissingCredential("ANTHROPIC_API_KEY"))
    }
}
