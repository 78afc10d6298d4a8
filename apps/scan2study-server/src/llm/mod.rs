//! Language-model integration
//!
//! A single-turn completion trait, the Anthropic Messages implementation,
//! and the fixed study-assistant prompts.

pub mod prompts;
pub(crate) mod provider;
mod types;

pub use provider::{AnthropicProvider, LanguageModel};
pub use types::{Completion, CompletionRequest, ContentBlock, LlmError, LlmTask};
