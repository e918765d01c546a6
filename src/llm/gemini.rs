//! Google Gemini client.

use super::{LlmHttpConfig, LlmProvider, build_http_client, transport_error};
use crate::{Error, Result};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Google Gemini LLM client.
///
/// Talks to the Generative Language REST API. Match requests use structured
/// output so the service itself enforces the `ARRAY<STRING>` shape.
pub struct GeminiClient {
    /// API key.
    api_key: Option<SecretString>,
    /// API endpoint.
    endpoint: String,
    /// Model to use.
    model: String,
    /// HTTP client.
    client: reqwest::blocking::Client,
}

impl GeminiClient {
    /// Default API endpoint.
    pub const DEFAULT_ENDPOINT: &'static str = "https://generativelanguage.googleapis.com/v1beta";

    /// Default model.
    pub const DEFAULT_MODEL: &'static str = "gemini-2.5-flash";

    /// Creates a new Gemini client.
    ///
    /// Reads the key from `GEMINI_API_KEY`, then `API_KEY`.
    #[must_use]
    pub fn new() -> Self {
        let api_key = std::env::var("GEMINI_API_KEY")
            .or_else(|_| std::env::var("API_KEY"))
            .ok()
            .filter(|key| !key.trim().is_empty())
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

    /// Validates that the client has an API key.
    fn validate(&self) -> Result<&SecretString> {
        self.api_key.as_ref().ok_or_else(|| Error::Transport {
            provider: "gemini",
            cause: "GEMINI_API_KEY not set".to_string(),
        })
    }

    /// Makes a `generateContent` request.
    fn request(&self, request: &GenerateContentRequest) -> Result<String> {
        let api_key = self.validate()?;

        tracing::info!(provider = "gemini", model = %self.model, "Making LLM request");

        let response = self
            .client
            .post(format!(
                "{}/models/{}:generateContent",
                self.endpoint.trim_end_matches('/'),
                self.model
            ))
            .header("x-goog-api-key", api_key.expose_secret())
            .header("content-type", "application/json")
            .json(request)
            .send()
            .map_err(|e| transport_error("gemini", &self.model, &e))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().unwrap_or_default();
            tracing::error!(
                provider = "gemini",
                model = %self.model,
                status = %status,
                body = %body,
                "LLM API returned error status"
            );
            return Err(Error::Transport {
                provider: "gemini",
                cause: format!("API returned status: {status} - {body}"),
            });
        }

        let response: GenerateContentResponse =
            response.json().map_err(|e| Error::MalformedResponse {
                provider: "gemini",
                cause: e.to_string(),
            })?;

        response.text().ok_or_else(|| Error::MalformedResponse {
            provider: "gemini",
            cause: "No text in response".to_string(),
        })
    }
}

impl Default for GeminiClient {
    fn default() -> Self {
        Self::new()
    }
}

impl LlmProvider for GeminiClient {
    fn name(&self) -> &'static str {
        "gemini"
    }

    fn complete(&self, prompt: &str) -> Result<String> {
        self.request(&GenerateContentRequest::new(None, prompt))
    }

    fn complete_with_system(&self, system: &str, user: &str) -> Result<String> {
        self.request(&GenerateContentRequest::new(Some(system), user))
    }

    fn complete_string_array(&self, system: &str, user: &str) -> Result<String> {
        let request =
            GenerateContentRequest::new(Some(system), user).with_json_schema(json!({
                "type": "ARRAY",
                "items": { "type": "STRING" }
            }));
        self.request(&request)
    }
}

/// Request body for `generateContent`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

impl GenerateContentRequest {
    fn new(system: Option<&str>, user: &str) -> Self {
        Self {
            system_instruction: system.map(|text| Content {
                role: None,
                parts: vec![Part {
                    text: text.to_string(),
                }],
            }),
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: user.to_string(),
                }],
            }],
            generation_config: None,
        }
    }

    fn with_json_schema(mut self, schema: Value) -> Self {
        self.generation_config = Some(GenerationConfig {
            response_mime_type: "application/json".to_string(),
            response_schema: schema,
        });
        self
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: String,
    response_schema: Value,
}

/// Response from `generateContent`.
#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate, if it has any.
    fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content.parts.iter().map(|p| p.text.as_str()).collect();
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}
