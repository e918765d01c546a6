//! Ollama (local) client.

use super::{LlmHttpConfig, LlmProvider, build_http_client, transport_error};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Ollama local LLM client.
pub struct OllamaClient {
    /// API endpoint.
    endpoint: String,
    /// Model to use.
    model: String,
    /// HTTP client.
    client: reqwest::blocking::Client,
}

impl OllamaClient {
    /// Default API endpoint.
    pub const DEFAULT_ENDPOINT: &'static str = "http://localhost:11434";

    /// Default model.
    pub const DEFAULT_MODEL: &'static str = "llama3.2";

    /// Creates a new Ollama client.
    #[must_use]
    pub fn new() -> Self {
        let endpoint =
            std::env::var("OLLAMA_HOST").unwrap_or_else(|_| Self::DEFAULT_ENDPOINT.to_string());
        let model =
            std::env::var("OLLAMA_MODEL").unwrap_or_else(|_| Self::DEFAULT_MODEL.to_string());

        Self {
            endpoint,
            model,
            client: build_http_client(LlmHttpConfig::from_env()),
        }
    }

    /// Sets the API endpoint.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Sets the model.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets HTTP client timeouts for LLM requests.
    #[must_use]
    pub fn with_http_config(mut self, config: LlmHttpConfig) -> Self {
        self.client = build_http_client(config);
        self
    }

    /// Makes a chat request to the Ollama API.
    fn chat(&self, messages: Vec<ChatMessage>, format: Option<Value>) -> Result<String> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages,
            stream: false,
            format,
        };

        tracing::info!(provider = "ollama", model = %self.model, "Making LLM request");

        let response = self
            .client
            .post(format!("{}/api/chat", self.endpoint.trim_end_matches('/')))
            .json(&request)
            .send()
            .map_err(|e| transport_error("ollama", &self.model, &e))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().unwrap_or_default();
            tracing::error!(
                provider = "ollama",
                model = %self.model,
                status = %status,
                body = %body,
                "LLM chat API returned error status"
            );
            return Err(Error::Transport {
                provider: "ollama",
                cause: format!("API returned status: {status} - {body}"),
            });
        }

        let response: ChatResponse = response.json().map_err(|e| Error::MalformedResponse {
            provider: "ollama",
            cause: e.to_string(),
        })?;

        Ok(response.message.content)
    }

    fn messages(system: Option<&str>, user: &str) -> Vec<ChatMessage> {
        let mut messages = Vec::with_capacity(2);
        if let Some(system) = system {
            messages.push(ChatMessage {
                role: "system".to_string(),
                content: system.to_string(),
            });
        }
        messages.push(ChatMessage {
            role: "user".to_string(),
            content: user.to_string(),
        });
        messages
    }
}

impl Default for OllamaClient {
    fn default() -> Self {
        Self::new()
    }
}

impl LlmProvider for OllamaClient {
    fn name(&self) -> &'static str {
        "ollama"
    }

    fn complete(&self, prompt: &str) -> Result<String> {
        self.chat(Self::messages(None, prompt), None)
    }

    fn complete_with_system(&self, system: &str, user: &str) -> Result<String> {
        self.chat(Self::messages(Some(system), user), None)
    }

    fn complete_string_array(&self, system: &str, user: &str) -> Result<String> {
        let schema = json!({ "type": "array", "items": { "type": "string" } });
        self.chat(Self::messages(Some(system), user), Some(schema))
    }
}

/// Request to the chat API.
#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    stream: bool,
    /// JSON schema for structured output.
    #[serde(skip_serializing_if = "Option::is_none")]
    format: Option<Value>,
}

/// A message in the chat.
#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

/// Response from the chat API.
#[derive(Debug, Deserialize)]
struct ChatResponse {
    message: ChatMessage,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_configuration() {
        let client = OllamaClient::new()
            .with_endpoint("http://gpu-box:11434")
            .with_model("mistral");

        assert_eq!(client.name(), "ollama");
        assert_eq!(client.endpoint, "http://gpu-box:11434");
        assert_eq!(client.model, "mistral");
    }

    #[test]
    fn test_messages_with_system() {
        let messages = OllamaClient::messages(Some("be brief"), "hi");
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, "system");
        assert_eq!(messages[1].content, "hi");
    }

    #[test]
    fn test_request_serialization() {
        let request = ChatRequest {
            model: "llama3.2".to_string(),
            messages: OllamaClient::messages(None, "hi"),
            stream: false,
            format: Some(json!({"type": "array"})),
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["stream"], false);
        assert_eq!(value["format"]["type"], "array");
    }

    #[test]
    fn test_unreachable_endpoint_is_transport_error() {
        let client = OllamaClient::new()
            .with_endpoint("http://127.0.0.1:1")
            .with_http_config(LlmHttpConfig {
                timeout_ms: 500,
                connect_timeout_ms: 200,
            });

        assert!(matches!(
            client.complete("hi"),
            Err(Error::Transport {
                provider: "ollama",
                ..
            })
        ));
    }
}
