//! LLM client abstraction.
//!
//! Provides a unified interface for the language-model providers that back
//! semantic search and listing copy.

mod gemini;
mod ollama;
mod openai;
pub mod system_prompt;

pub use gemini::GeminiClient;
pub use ollama::OllamaClient;
pub use openai::OpenAiClient;
pub use system_prompt::{
    DESCRIPTION_PROMPT, SERVICE_MATCH_PROMPT, build_description_request, build_match_request,
};

use crate::config::{LlmConfig, LlmProvider as ProviderKind};
use crate::{Error, Result};
use std::sync::Arc;
use std::time::Duration;

/// Trait for LLM providers.
pub trait LlmProvider: Send + Sync {
    /// The provider name.
    fn name(&self) -> &'static str;

    /// Generates a completion for the given prompt.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Transport`] when the provider cannot be reached and
    /// [`Error::MalformedResponse`] when the reply has no text.
    fn complete(&self, prompt: &str) -> Result<String>;

    /// Generates a completion with a system prompt.
    ///
    /// Default implementation concatenates system and user prompts.
    /// Providers should override this to use native system prompt support.
    ///
    /// # Errors
    ///
    /// Returns an error if the completion fails.
    fn complete_with_system(&self, system: &str, user: &str) -> Result<String> {
        let combined = format!("{system}\n\n---\n\nUser message:\n{user}");
        self.complete(&combined)
    }

    /// Generates a completion constrained to a JSON array of strings.
    ///
    /// Providers with structured output support override this to enforce the
    /// shape server-side. The default relies on the prompt alone.
    ///
    /// # Errors
    ///
    /// Returns an error if the completion fails.
    fn complete_string_array(&self, system: &str, user: &str) -> Result<String> {
        self.complete_with_system(system, user)
    }

    /// Asks the model which services in `index_json` match `query`.
    ///
    /// Returns the identifiers exactly as the model produced them; callers
    /// validate them against their own candidate set.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedResponse`] if the reply is not a JSON array of
    /// strings, or the underlying completion error.
    fn match_services(&self, query: &str, index_json: &str) -> Result<Vec<String>> {
        let user = build_match_request(query, index_json);
        let response = self.complete_string_array(SERVICE_MATCH_PROMPT, &user)?;
        parse_string_array(self.name(), &response)
    }

    /// Rewrites a seller's rough notes into a listing description.
    ///
    /// # Errors
    ///
    /// Returns the underlying completion error.
    fn enhance_description(&self, title: &str, rough_notes: &str) -> Result<String> {
        let user = build_description_request(title, rough_notes);
        self.complete_with_system(DESCRIPTION_PROMPT, &user)
    }
}

/// HTTP client configuration for LLM providers.
#[derive(Debug, Clone, Copy)]
pub struct LlmHttpConfig {
    /// Request timeout in milliseconds (0 to disable).
    pub timeout_ms: u64,
    /// Connect timeout in milliseconds (0 to disable).
    pub connect_timeout_ms: u64,
}

impl Default for LlmHttpConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 30_000,
            connect_timeout_ms: 3_000,
        }
    }
}

impl LlmHttpConfig {
    /// Loads HTTP configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Loads HTTP configuration from config file settings.
    #[must_use]
    pub fn from_config(config: &LlmConfig) -> Self {
        let mut settings = Self::default();
        if let Some(timeout_ms) = config.timeout_ms {
            settings.timeout_ms = timeout_ms;
        }
        if let Some(connect_timeout_ms) = config.connect_timeout_ms {
            settings.connect_timeout_ms = connect_timeout_ms;
        }
        settings
    }

    /// Applies environment variable overrides.
    #[must_use]
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(v) = std::env::var("SKILLSWAP_LLM_TIMEOUT_MS") {
            if let Ok(timeout_ms) = v.parse::<u64>() {
                self.timeout_ms = timeout_ms;
            }
        }
        if let Ok(v) = std::env::var("SKILLSWAP_LLM_CONNECT_TIMEOUT_MS") {
            if let Ok(connect_timeout_ms) = v.parse::<u64>() {
                self.connect_timeout_ms = connect_timeout_ms;
            }
        }
        self
    }
}

/// Builds a blocking HTTP client for LLM requests with configured timeouts.
#[must_use]
pub fn build_http_client(config: LlmHttpConfig) -> reqwest::blocking::Client {
    let mut builder = reqwest::blocking::Client::builder();
    if config.timeout_ms > 0 {
        builder = builder.timeout(Duration::from_millis(config.timeout_ms));
    }
    if config.connect_timeout_ms > 0 {
        builder = builder.connect_timeout(Duration::from_millis(config.connect_timeout_ms));
    }

    builder.build().unwrap_or_else(|err| {
        tracing::warn!("Failed to build LLM HTTP client: {err}");
        reqwest::blocking::Client::new()
    })
}

/// Builds the configured provider.
///
/// Returns `None` when the provider is set to `none`.
#[must_use]
pub fn build_provider(config: &LlmConfig) -> Option<Arc<dyn LlmProvider>> {
    let http = LlmHttpConfig::from_config(config).with_env_overrides();
    let provider: Arc<dyn LlmProvider> = match config.provider {
        ProviderKind::Gemini => {
            let mut client = GeminiClient::new();
            if let Some(ref api_key) = config.api_key {
                client = client.with_api_key(api_key);
            }
            if let Some(ref model) = config.model {
                client = client.with_model(model);
            }
            if let Some(ref base_url) = config.base_url {
                client = client.with_endpoint(base_url);
            }
            Arc::new(client.with_http_config(http))
        },
        ProviderKind::OpenAi => {
            let mut client = OpenAiClient::new();
            if let Some(ref api_key) = config.api_key {
                client = client.with_api_key(api_key);
            }
            if let Some(ref model) = config.model {
                client = client.with_model(model);
            }
            if let Some(ref base_url) = config.base_url {
                client = client.with_endpoint(base_url);
            }
            Arc::new(client.with_http_config(http))
        },
        ProviderKind::Ollama => {
            let mut client = OllamaClient::new();
            if let Some(ref model) = config.model {
                client = client.with_model(model);
            }
            if let Some(ref base_url) = config.base_url {
                client = client.with_endpoint(base_url);
            }
            Arc::new(client.with_http_config(http))
        },
        ProviderKind::None => return None,
    };
    Some(provider)
}

/// Maps a `reqwest` send error to a transport error, logging its kind.
pub(crate) fn transport_error(provider: &'static str, model: &str, e: &reqwest::Error) -> Error {
    let error_kind = if e.is_timeout() {
        "timeout"
    } else if e.is_connect() {
        "connect"
    } else if e.is_request() {
        "request"
    } else {
        "unknown"
    };
    tracing::error!(
        provider,
        model,
        error = %e,
        error_kind,
        "LLM request failed"
    );
    Error::Transport {
        provider,
        cause: format!("{error_kind} error: {e}"),
    }
}

/// Parses a JSON array of strings from LLM output.
///
/// Markdown code fences and leading chatter around the array are tolerated.
///
/// # Errors
///
/// Returns [`Error::MalformedResponse`] for any other shape.
pub fn parse_string_array(provider: &'static str, response: &str) -> Result<Vec<String>> {
    let json_str = extract_json_from_response(response);
    serde_json::from_str(json_str).map_err(|e| Error::MalformedResponse {
        provider,
        cause: format!("expected a JSON array of strings: {e}"),
    })
}

/// Extracts JSON from LLM response, handling markdown code blocks.
fn extract_json_from_response(response: &str) -> &str {
    let trimmed = response.trim();

    // ```json ... ``` or plain ``` ... ``` blocks
    if let Some(start) = trimmed.find("```") {
        let after_marker = &trimmed[start + 3..];
        let body_start = after_marker
            .find(['[', '{'])
            .map_or(start + 3, |pos| start + 3 + pos);
        if let Some(end) = trimmed[body_start..].find("```") {
            return trimmed[body_start..body_start + end].trim();
        }
    }

    // Only slice out a bare array; objects are left whole so they fail to parse
    if let Some(start) = trimmed.find(['[', '{']) {
        if trimmed[start..].starts_with('[') {
            if let Some(end) = trimmed.rfind(']').filter(|&end| end > start) {
                return &trimmed[start..=end];
            }
        }
    }

    trimmed
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_json_raw() {
        let response = r#"["s1", "s2"]"#;
        assert_eq!(extract_json_from_response(response), r#"["s1", "s2"]"#);
    }

    #[test]
    fn test_extract_json_markdown() {
        let response = "```json\n[\"s2\"]\n```";
        assert_eq!(extract_json_from_response(response), "[\"s2\"]");
    }

    #[test]
    fn test_extract_json_with_prefix() {
        let response = "Matches: [\"s4\"] hope this helps";
        assert_eq!(extract_json_from_response(response), "[\"s4\"]");
    }

    #[test]
    fn test_parse_string_array() {
        assert_eq!(
            parse_string_array("stub", r#"["s2", "s4"]"#).unwrap(),
            vec!["s2", "s4"]
        );
        assert!(parse_string_array("stub", "[]").unwrap().is_empty());
    }

    #[test]
    fn test_parse_string_array_rejects_other_shapes() {
        for response in ["", "no matches", r#"{"ids": ["s1"]}"#, "[1, 2]", "[\"s1\""] {
            let result = parse_string_array("stub", response);
            assert!(
                matches!(result, Err(Error::MalformedResponse { .. })),
                "accepted {response:?}"
            );
        }
    }

    #[test]
    fn test_build_provider_none() {
        let config = LlmConfig {
            provider: ProviderKind::None,
            ..Default::default()
        };
        assert!(build_provider(&config).is_none());
    }

    #[test]
    fn test_build_provider_names() {
        for (kind, name) in [
            (ProviderKind::Gemini, "gemini"),
            (ProviderKind::OpenAi, "openai"),
            (ProviderKind::Ollama, "ollama"),
        ] {
            let config = LlmConfig {
                provider: kind,
                ..Default::default()
            };
            let provider = build_provider(&config).unwrap();
            assert_eq!(provider.name(), name);
        }
    }
}
