use serde::{Deserialize, Serialize};

use super::{ChatMessage, LlmClient, LlmError};
use crate::config;

/// Ollama HTTP client for local LLM inference.
pub struct OllamaClient {
    base_url: String,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl OllamaClient {
    /// Create a new OllamaClient pointing at a local Ollama instance.
    pub fn new(base_url: &str, timeout_secs: u64) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            timeout_secs,
        }
    }

    /// Client configured from the environment (RADSCRIBE_OLLAMA_URL) with the
    /// long generation timeout.
    pub fn from_env() -> Self {
        Self::new(&config::ollama_url(), config::GENERATION_TIMEOUT_SECS)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

/// Request body for Ollama /api/chat
#[derive(Serialize)]
struct OllamaChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    stream: bool,
}

/// Response body from Ollama /api/chat
#[derive(Deserialize)]
struct OllamaChatResponse {
    message: OllamaChatMessage,
}

#[derive(Deserialize)]
struct OllamaChatMessage {
    content: String,
}

/// Response body from Ollama /api/tags
#[derive(Deserialize)]
struct OllamaTagsResponse {
    models: Vec<OllamaModel>,
}

#[derive(Deserialize)]
struct OllamaModel {
    name: String,
}

impl LlmClient for OllamaClient {
    fn chat(&self, model: &str, messages: &[ChatMessage]) -> Result<String, LlmError> {
        let url = format!("{}/api/chat", self.base_url);
        let body = OllamaChatRequest {
            model,
            messages,
            stream: false,
        };

        let response = self.client.post(&url).json(&body).send().map_err(|e| {
            if e.is_connect() {
                LlmError::Connection(self.base_url.clone())
            } else if e.is_timeout() {
                LlmError::HttpClient(format!("Request timed out after {}s", self.timeout_secs))
            } else {
                LlmError::HttpClient(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(LlmError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: OllamaChatResponse = response
            .json()
            .map_err(|e| LlmError::ResponseParsing(e.to_string()))?;

        Ok(parsed.message.content)
    }

    fn is_model_available(&self, model: &str) -> Result<bool, LlmError> {
        let models = self.list_models()?;
        Ok(models.iter().any(|m| m.starts_with(model)))
    }

    fn list_models(&self) -> Result<Vec<String>, LlmError> {
        let url = format!("{}/api/tags", self.base_url);

        let response = self.client.get(&url).send().map_err(|e| {
            if e.is_connect() {
                LlmError::Connection(self.base_url.clone())
            } else {
                LlmError::HttpClient(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(LlmError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: OllamaTagsResponse = response
            .json()
            .map_err(|e| LlmError::ResponseParsing(e.to_string()))?;

        Ok(parsed.models.into_iter().map(|m| m.name).collect())
    }
}

/// Mock LLM client for testing — returns a configurable response and records
/// what was sent to it.
pub struct MockLlmClient {
    response: Result<String, String>,
    available_models: Vec<String>,
    calls: std::sync::Mutex<Vec<Vec<ChatMessage>>>,
}

impl MockLlmClient {
    pub fn new(response: &str) -> Self {
        Self {
            response: Ok(response.to_string()),
            available_models: vec!["medgemma:latest".to_string()],
            calls: std::sync::Mutex::new(Vec::new()),
        }
    }

    /// A client whose chat calls fail with a connection error.
    pub fn failing() -> Self {
        Self {
            response: Err("http://localhost:11434".to_string()),
            available_models: vec!["medgemma:latest".to_string()],
            calls: std::sync::Mutex::new(Vec::new()),
        }
    }

    pub fn with_models(mut self, models: Vec<String>) -> Self {
        self.available_models = models;
        self
    }

    /// How many chat calls were made.
    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|c| c.len()).unwrap_or(0)
    }

    /// Messages of the most recent chat call.
    pub fn last_messages(&self) -> Option<Vec<ChatMessage>> {
        self.calls.lock().ok()?.last().cloned()
    }
}

impl LlmClient for MockLlmClient {
    fn chat(&self, _model: &str, messages: &[ChatMessage]) -> Result<String, LlmError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(messages.to_vec());
        }
        match &self.response {
            Ok(text) => Ok(text.clone()),
            Err(url) => Err(LlmError::Connection(url.clone())),
        }
    }

    fn is_model_available(&self, model: &str) -> Result<bool, LlmError> {
        Ok(self.available_models.iter().any(|m| m.starts_with(model)))
    }

    fn list_models(&self) -> Result<Vec<String>, LlmError> {
        Ok(self.available_models.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_client_returns_configured_response() {
        let client = MockLlmClient::new("test response");
        let messages = [ChatMessage::user("prompt")];
        let result = client.chat("model", &messages).unwrap();
        assert_eq!(result, "test response");
        assert_eq!(client.call_count(), 1);
    }

    #[test]
    fn mock_client_records_messages() {
        let client = MockLlmClient::new("ok");
        let messages = [ChatMessage::system("sys"), ChatMessage::user("payload")];
        client.chat("model", &messages).unwrap();
        let recorded = client.last_messages().unwrap();
        assert_eq!(recorded.len(), 2);
        assert_eq!(recorded[1].content, "payload");
    }

    #[test]
    fn failing_mock_returns_connection_error() {
        let client = MockLlmClient::failing();
        let result = client.chat("model", &[ChatMessage::user("x")]);
        assert!(matches!(result, Err(LlmError::Connection(_))));
    }

    #[test]
    fn mock_client_lists_models() {
        let client = MockLlmClient::new("")
            .with_models(vec!["medgemma:latest".into(), "llama3:8b".into()]);
        let models = client.list_models().unwrap();
        assert_eq!(models.len(), 2);
        assert!(client.is_model_available("medgemma").unwrap());
    }

    #[test]
    fn mock_client_model_not_available() {
        let client = MockLlmClient::new("").with_models(vec!["llama3:8b".into()]);
        assert!(!client.is_model_available("medgemma").unwrap());
    }

    #[test]
    fn ollama_client_constructor() {
        let client = OllamaClient::new("http://localhost:11434", 120);
        assert_eq!(client.base_url, "http://localhost:11434");
        assert_eq!(client.timeout_secs, 120);
    }

    #[test]
    fn ollama_client_trims_trailing_slash() {
        let client = OllamaClient::new("http://localhost:11434/", 60);
        assert_eq!(client.base_url, "http://localhost:11434");
    }

    #[test]
    fn chat_request_serializes_for_ollama() {
        let messages = vec![ChatMessage::system("sys"), ChatMessage::user("hello")];
        let body = OllamaChatRequest {
            model: "medgemma:4b",
            messages: &messages,
            stream: false,
        };
        let json = serde_json::to_string(&body).unwrap();
        assert!(json.contains(r#""model":"medgemma:4b""#));
        assert!(json.contains(r#""stream":false"#));
        assert!(json.contains(r#""role":"system""#));
    }
}
