pub mod ollama;

pub use ollama::{MockLlmClient, OllamaClient};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config;

/// Model prefixes to prefer when no explicit model is configured.
/// Medical-domain models first; the Ollama registry has no "medical" tag,
/// so we maintain our own curated list.
const PREFERRED_MODEL_PREFIXES: &[&str] = &[
    "medgemma",
    "meditron",
    "biomistral",
    "llama3",
    "mistral",
];

/// Role tag on a chat message, serialized the way the Ollama chat API expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

/// One role-tagged message in a generation request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }
}

/// Errors from the generation collaborator.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Ollama is not running at {0}")]
    Connection(String),

    #[error("Ollama returned error (status {status}): {body}")]
    Api { status: u16, body: String },

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Response parsing error: {0}")]
    ResponseParsing(String),

    #[error("The model returned an empty completion")]
    EmptyCompletion,

    #[error("No AI model is available. Pull one with Ollama first.")]
    NoModelAvailable,
}

/// Generation collaborator abstraction (allows mocking).
pub trait LlmClient {
    /// Send an ordered list of role-tagged messages, get one completion back.
    fn chat(&self, model: &str, messages: &[ChatMessage]) -> Result<String, LlmError>;

    fn is_model_available(&self, model: &str) -> Result<bool, LlmError>;

    fn list_models(&self) -> Result<Vec<String>, LlmError>;
}

/// Resolve which model generation calls should use.
///
/// Resolution order:
/// 1. `RADSCRIBE_MODEL` env override (operator's explicit choice, used as-is)
/// 2. First installed model matching the preferred prefix list
/// 3. First installed model of any kind
/// 4. Error: nothing installed
pub fn resolve_model(client: &dyn LlmClient) -> Result<String, LlmError> {
    if let Some(model) = config::model_override() {
        tracing::debug!(model = %model, "using model from env override");
        return Ok(model);
    }

    let installed = client.list_models()?;
    for prefix in PREFERRED_MODEL_PREFIXES {
        if let Some(model) = installed.iter().find(|m| m.starts_with(prefix)) {
            return Ok(model.clone());
        }
    }
    installed.first().cloned().ok_or(LlmError::NoModelAvailable)
}
