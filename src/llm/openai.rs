//! `OpenAI` client.

use super::{LlmHttpConfig, LlmProvider, build_http_client, transport_error};
use crate::{Error, Result};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

/// `OpenAI` LLM client.
pub struct OpenAiClient {
    /// API key.
    api_key: Option<SecretString>,
    /// API endpoint.
    endpoint: String,
    /// Model to use.
    model: String,
    /// HTTP client.
    client: reqwest::blocking::Client,
}

impl OpenAiClient {
    /// Default API endpoint.
    pub const DEFAULT_ENDPOINT: &'static str = "https://api.openai.com/v1";

    /// Default model.
    pub const DEFAULT_MODEL: &'static str = "gpt-4o-mini";

    /// Creates a new `OpenAI` client.
    #[must_use]
    pub fn new() -> Self {
        let api_key = std::env::var("OPENAI_API_KEY")
            .ok()
            .map(SecretString::from);
        Self {
            api_key,
            endpoint: Self::DEFAULT_ENDPOINT.to_string(),
            model: Self::DEFAULT_MODEL.to_string(),
            client: build_http_client(LlmHttpConfig::from_env()),
        }
    }

    /// Sets the API key.
    #[must_use]
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(SecretString::from(key.into()));
        self
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

    /// Checks if the model is a reasoning model.
    ///
    /// These take `max_completion_tokens` instead of `max_tokens` and only
    /// support the default temperature.
    fn is_reasoning_model(&self) -> bool {
        self.model.starts_with("gpt-5")
            || self.model.starts_with("o1")
            || self.model.starts_with("o3")
    }

    /// Makes a request to the Chat Completions API.
    fn request(&self, messages: Vec<ChatMessage>) -> Result<String> {
        let api_key = self.api_key.as_ref().ok_or_else(|| Error::Transport {
            provider: "openai",
            cause: "OPENAI_API_KEY not set".to_string(),
        })?;

        let request = if self.is_reasoning_model() {
            ChatCompletionRequest {
                model: self.model.clone(),
                messages,
                max_tokens: None,
                max_completion_tokens: Some(1024),
                temperature: None,
            }
        } else {
            ChatCompletionRequest {
                model: self.model.clone(),
                messages,
                max_tokens: Some(1024),
                max_completion_tokens: None,
                temperature: Some(0.2),
            }
        };

        tracing::info!(provider = "openai", model = %self.model, "Making LLM request");

        let response = self
            .client
            .post(format!(
                "{}/chat/completions",
                self.endpoint.trim_end_matches('/')
            ))
            .header("Authorization", format!("Bearer {}", api_key.expose_secret()))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .map_err(|e| transport_error("openai", &self.model, &e))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().unwrap_or_default();
            tracing::error!(
                provider = "openai",
                model = %self.model,
                status = %status,
                "LLM API returned error status"
            );
            return Err(Error::Transport {
                provider: "openai",
                cause: format!("API returned status: {status} - {body}"),
            });
        }

        let response: ChatCompletionResponse =
            response.json().map_err(|e| Error::MalformedResponse {
                provider: "openai",
                cause: e.to_string(),
            })?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| Error::MalformedResponse {
                provider: "openai",
                cause: "No choices in response".to_string(),
            })
    }
}

impl Default for OpenAiClient {
    fn default() -> Self {
        Self::new()
    }
}

impl LlmProvider for OpenAiClient {
    fn name(&self) -> &'static str {
        "openai"
    }

    fn complete(&self, prompt: &str) -> Result<String> {
        self.request(vec![ChatMessage::user(prompt)])
    }

    fn complete_with_system(&self, system: &str, user: &str) -> Result<String> {
        self.request(vec![
            ChatMessage {
                role: "system".to_string(),
                content: Some(system.to_string()),
            },
            ChatMessage::user(user),
        ])
    }
}

/// Request to the Chat Completions API.
#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_completion_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

/// A message in the chat.
#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    /// Absent on refusals and tool calls.
    content: Option<String>,
}

impl ChatMessage {
    fn user(content: &str) -> Self {
        Self {
            role: "user".to_string(),
            content: Some(content.to_string()),
        }
    }
}

/// Response from the Chat Completions API.
#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

/// A choice in the response.
#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_configuration() {
        let client = OpenAiClient::new()
            .with_api_key("test-key")
            .with_endpoint("https://custom.endpoint")
            .with_model("gpt-4");

        assert_eq!(client.name(), "openai");
        assert_eq!(
            client.api_key.as_ref().map(|key| key.expose_secret()),
            Some("test-key")
        );
        assert_eq!(client.endpoint, "https://custom.endpoint");
        assert_eq!(client.model, "gpt-4");
    }

    #[test]
    fn test_missing_key_is_transport_error() {
        let client = OpenAiClient {
            api_key: None,
            endpoint: OpenAiClient::DEFAULT_ENDPOINT.to_string(),
            model: OpenAiClient::DEFAULT_MODEL.to_string(),
            client: reqwest::blocking::Client::new(),
        };

        assert!(matches!(
            client.complete("hi"),
            Err(Error::Transport {
                provider: "openai",
                ..
            })
        ));
    }

    #[test]
    fn test_reasoning_model_detection() {
        for model in ["gpt-5-mini", "o1-preview", "o3-mini"] {
            assert!(OpenAiClient::new().with_model(model).is_reasoning_model());
        }
        for model in ["gpt-4o", "gpt-4o-mini", "gpt-3.5-turbo"] {
            assert!(!OpenAiClient::new().with_model(model).is_reasoning_model());
        }
    }

    #[test]
    fn test_response_with_null_content() {
        let response: ChatCompletionResponse = serde_json::from_str(
            r#"{"choices": [{"message": {"role": "assistant", "content": null}}]}"#,
        )
        .unwrap();
        assert!(response.choices[0].message.content.is_none());
    }
}
