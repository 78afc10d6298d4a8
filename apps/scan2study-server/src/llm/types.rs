//! Language-model request/response types

use serde::{Deserialize, Serialize};

/// One single-turn completion: a system instruction and one user message
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompletionRequest {
    pub system: String,
    pub prompt: String,
    /// Output length ceiling
    pub max_tokens: u32,
}

/// Provider response, reduced to its content blocks
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Completion {
    #[serde(default)]
    pub content: Vec<ContentBlock>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    Text { text: String },
    #[serde(other)]
    Other,
}

impl Completion {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ContentBlock::Text { text: text.into() }],
        }
    }

    /// First text-typed block, if any
    pub fn first_text(&self) -> Option<&str> {
        self.content.iter().find_map(|block| match block {
            ContentBlock::Text { text } => Some(text.as_str()),
            ContentBlock::Other => None,
        })
    }
}

/// What a completion is for; decides fallback and error wording
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmTask {
    Summary,
    Answer,
}

impl LlmTask {
    /// Returned in place of the text when the response had no text block
    pub fn fallback_text(self) -> &'static str {
        match self {
            Self::Summary => "Failed to extract summary.",
            Self::Answer => "Failed to extract answer.",
        }
    }

    /// User-facing message when the call itself fails
    pub fn failure_message(self) -> &'static str {
        match self {
            Self::Summary => "Failed to generate summary.",
            Self::Answer => "Failed to answer question.",
        }
    }

    /// Text of a completion, or the fallback string
    pub fn extract(self, completion: &Completion) -> String {
        completion
            .first_text()
            .unwrap_or_else(|| self.fallback_text())
            .to_string()
    }
}

/// Language-model error types
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("Failed to call language model: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Language model returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Failed to parse language model response: {0}")]
    Decode(String),
}
