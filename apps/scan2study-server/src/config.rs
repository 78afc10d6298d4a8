//! Configuration management for Scan2Study Server

use serde::Deserialize;
use std::env;

/// Default upload ceiling: 1MB (OCR provider free tier)
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 1024 * 1024;

pub const DEFAULT_OCR_ENDPOINT: &str = "https://api.ocr.space/parse/image";
pub const DEFAULT_LLM_BASE_URL: &str = "https://api.anthropic.com";
pub const DEFAULT_LLM_MODEL: &str = "claude-sonnet-4-20250514";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub ocr: OcrConfig,
    pub llm: LlmConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OcrConfig {
    /// Credential for the OCR provider; the OCR endpoint refuses to run without it
    pub api_key: Option<String>,
    pub endpoint: String,
    pub language: String,
    pub max_upload_bytes: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    /// Credential for the language-model provider
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub summary_max_tokens: u32,
    pub answer_max_tokens: u32,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
            },
            ocr: OcrConfig {
                api_key: None,
                endpoint: DEFAULT_OCR_ENDPOINT.to_string(),
                language: "eng".to_string(),
                max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            },
            llm: LlmConfig {
                api_key: None,
                base_url: DEFAULT_LLM_BASE_URL.to_string(),
                model: DEFAULT_LLM_MODEL.to_string(),
                summary_max_tokens: 1024,
                answer_max_tokens: 512,
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, env::VarError> {
        let defaults = Config::default();

        Ok(Config {
            server: ServerConfig {
                host: env::var("SERVER_HOST").unwrap_or(defaults.server.host),
                port: env::var("SERVER_PORT")
                    .unwrap_or_else(|_| "3000".to_string())
                    .parse()
                    .unwrap_or(defaults.server.port),
            },
            ocr: OcrConfig {
                api_key: credential("OCR_API_KEY")?,
                endpoint: env::var("OCR_ENDPOINT").unwrap_or(defaults.ocr.endpoint),
                language: env::var("OCR_LANGUAGE").unwrap_or(defaults.ocr.language),
                max_upload_bytes: env::var("MAX_UPLOAD_BYTES")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(defaults.ocr.max_upload_bytes),
            },
            llm: LlmConfig {
                api_key: credential("ANTHROPIC_API_KEY")?,
                base_url: env::var("ANTHROPIC_BASE_URL").unwrap_or(defaults.llm.base_url),
                model: env::var("ANTHROPIC_MODEL").unwrap_or(defaults.llm.model),
                summary_max_tokens: defaults.llm.summary_max_tokens,
                answer_max_tokens: defaults.llm.answer_max_tokens,
            },
        })
    }

    /// Test configuration with both credentials set
    #[cfg(test)]
    pub fn with_credentials() -> Self {
        let mut config = Config::default();
        config.ocr.api_key = Some("test-ocr-key".to_string());
        config.llm.api_key = Some("test-llm-key".to_string());
        config
    }
}

/// Read an optional credential. Unset and blank values both count as absent,
/// a value that is not valid unicode is an error.
fn credential(name: &str) -> Result<Option<String>, env::VarError> {
    match env::var(name) {
        Ok(value) if value.trim().is_empty() => Ok(None),
        Ok(value) => Ok(Some(value)),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(e) => Err(e),
    }
}
