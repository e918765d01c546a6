//! Configuration management.
//!
//! Settings come from three layers, later ones winning:
//!
//! 1. Built-in defaults
//! 2. `config.toml` (explicit path, or the platform config dir)
//! 3. `SKILLSWAP_*` environment variables
//!
//! ```toml
//! [features]
//! description_enhancement = true
//!
//! [search]
//! semantic_enabled = true
//! semantic_timeout_ms = 5000
//! empty_match_policy = "fallback"
//!
//! [llm]
//! provider = "gemini"
//! model = "gemini-2.5-flash"
//!
//! [logging]
//! format = "json"
//! ```

mod features;

pub use features::FeatureFlags;

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration for skillswap.
#[derive(Debug, Clone, Default)]
pub struct SkillswapConfig {
    /// Feature flags.
    pub features: FeatureFlags,
    /// Search configuration.
    pub search: SearchConfig,
    /// LLM provider configuration.
    pub llm: LlmConfig,
    /// Logging settings from the config file.
    pub logging: LoggingSettings,
}

/// What to do when the semantic matcher succeeds but matches nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmptyMatchPolicy {
    /// Substitute the substring matcher's result.
    #[default]
    Fallback,
    /// Trust the matcher and return an empty result.
    Terminate,
}

impl EmptyMatchPolicy {
    /// Parses a policy name.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "fallback" => Some(Self::Fallback),
            "terminate" | "empty" => Some(Self::Terminate),
            _ => None,
        }
    }
}

/// Search configuration.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Default for the semantic toggle when the caller does not choose.
    pub semantic_enabled: bool,
    /// Deadline for the semantic matcher in milliseconds.
    pub semantic_timeout_ms: u64,
    /// Handling of successful empty semantic matches.
    pub empty_match_policy: EmptyMatchPolicy,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            semantic_enabled: false,
            semantic_timeout_ms: 5_000,
            empty_match_policy: EmptyMatchPolicy::Fallback,
        }
    }
}

impl SearchConfig {
    /// Whether a search runs in semantic mode.
    ///
    /// `requested` is the caller's own toggle (the CLI's `--semantic`); the
    /// configured default turns semantic mode on when the caller did not.
    #[must_use]
    pub const fn use_semantic(&self, requested: bool) -> bool {
        requested || self.semantic_enabled
    }

    /// Applies environment variable overrides.
    #[must_use]
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(enabled) = parse_bool_env("SKILLSWAP_SEMANTIC_SEARCH") {
            self.semantic_enabled = enabled;
        }
        if let Ok(v) = std::env::var("SKILLSWAP_SEMANTIC_TIMEOUT_MS") {
            if let Ok(timeout_ms) = v.parse::<u64>() {
                self.semantic_timeout_ms = timeout_ms;
            }
        }
        if let Ok(v) = std::env::var("SKILLSWAP_EMPTY_MATCH_POLICY") {
            if let Some(policy) = EmptyMatchPolicy::parse(&v) {
                self.empty_match_policy = policy;
            }
        }
        self
    }
}

/// LLM provider configuration.
#[derive(Debug, Clone, Default)]
pub struct LlmConfig {
    /// Provider to use.
    pub provider: LlmProvider,
    /// Model name.
    pub model: Option<String>,
    /// API key (falls back to the provider's environment variable).
    pub api_key: Option<String>,
    /// Base URL for the provider (for self-hosted or proxied endpoints).
    pub base_url: Option<String>,
    /// HTTP request timeout in milliseconds.
    pub timeout_ms: Option<u64>,
    /// HTTP connect timeout in milliseconds.
    pub connect_timeout_ms: Option<u64>,
}

/// Available LLM providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LlmProvider {
    /// Google Gemini.
    #[default]
    Gemini,
    /// `OpenAI` GPT.
    OpenAi,
    /// Ollama (local).
    Ollama,
    /// No provider; semantic features stay off.
    None,
}

impl LlmProvider {
    /// Parses a provider string.
    #[must_use]
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "openai" => Self::OpenAi,
            "ollama" => Self::Ollama,
            "none" | "off" | "disabled" => Self::None,
            _ => Self::Gemini,
        }
    }

    /// Returns the string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Gemini => "gemini",
            Self::OpenAi => "openai",
            Self::Ollama => "ollama",
            Self::None => "none",
        }
    }
}

/// Logging section of the config file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoggingSettings {
    /// Output format: "pretty" or "json".
    pub format: Option<String>,
    /// Filter directive, e.g. "skillswap=debug".
    pub level: Option<String>,
    /// Append logs to this file instead of stderr.
    pub file: Option<String>,
}

/// Configuration file structure (for TOML parsing).
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    /// Feature flags.
    pub features: Option<ConfigFileFeatures>,
    /// Search section.
    pub search: Option<ConfigFileSearch>,
    /// LLM section.
    pub llm: Option<ConfigFileLlm>,
    /// Logging section.
    pub logging: Option<LoggingSettings>,
}

/// Features section in config file.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFileFeatures {
    /// Description enhancement.
    pub description_enhancement: Option<bool>,
}

/// Search section in config file.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFileSearch {
    /// Default semantic toggle.
    pub semantic_enabled: Option<bool>,
    /// Semantic deadline.
    pub semantic_timeout_ms: Option<u64>,
    /// Empty-match policy name.
    pub empty_match_policy: Option<String>,
}

/// LLM section in config file.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFileLlm {
    /// Provider name.
    pub provider: Option<String>,
    /// Model name.
    pub model: Option<String>,
    /// API key.
    pub api_key: Option<String>,
    /// Base URL.
    pub base_url: Option<String>,
    /// Request timeout.
    pub timeout_ms: Option<u64>,
    /// Connect timeout.
    pub connect_timeout_ms: Option<u64>,
}

impl SkillswapConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(path: &Path) -> crate::Result<Self> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| crate::Error::OperationFailed {
                operation: "read_config_file".to_string(),
                cause: format!("{}: {e}", path.display()),
            })?;

        Self::from_toml(&contents)
    }

    /// Parses configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid config TOML.
    pub fn from_toml(contents: &str) -> crate::Result<Self> {
        let file: ConfigFile =
            toml::from_str(contents).map_err(|e| crate::Error::OperationFailed {
                operation: "parse_config_file".to_string(),
                cause: e.to_string(),
            })?;

        Ok(Self::from_config_file(file))
    }

    /// Loads configuration from the default location.
    ///
    /// Checks the platform config dir, then `~/.config/skillswap/`. Returns the
    /// defaults if neither holds a readable `config.toml`.
    #[must_use]
    pub fn load_default() -> Self {
        let Some(base_dirs) = directories::BaseDirs::new() else {
            return Self::default();
        };

        let candidates = [
            base_dirs.config_dir().join("skillswap").join("config.toml"),
            base_dirs
                .home_dir()
                .join(".config")
                .join("skillswap")
                .join("config.toml"),
        ];

        for path in candidates {
            if !path.exists() {
                continue;
            }
            match Self::load_from_file(&path) {
                Ok(config) => return config,
                Err(e) => tracing::warn!(path = %path.display(), error = %e, "Ignoring config file"),
            }
        }

        Self::default()
    }

    /// Loads from an explicit path or the default location, then applies
    /// environment overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicit path cannot be loaded.
    pub fn load(path: Option<&Path>) -> crate::Result<Self> {
        let config = match path {
            Some(path) => Self::load_from_file(path)?,
            None => Self::load_default(),
        };
        Ok(config.with_env_overrides())
    }

    /// Applies `SKILLSWAP_*` environment variable overrides.
    #[must_use]
    pub fn with_env_overrides(mut self) -> Self {
        self.search = self.search.with_env_overrides();
        if let Ok(v) = std::env::var("SKILLSWAP_LLM_PROVIDER") {
            self.llm.provider = LlmProvider::parse(&v);
        }
        if let Ok(v) = std::env::var("SKILLSWAP_LLM_MODEL") {
            self.llm.model = Some(v);
        }
        self
    }

    /// Converts a `ConfigFile` to `SkillswapConfig`.
    fn from_config_file(file: ConfigFile) -> Self {
        let mut config = Self::default();

        if let Some(features) = file.features {
            if let Some(v) = features.description_enhancement {
                config.features.description_enhancement = v;
            }
        }
        if let Some(search) = file.search {
            if let Some(v) = search.semantic_enabled {
                config.search.semantic_enabled = v;
            }
            if let Some(v) = search.semantic_timeout_ms {
                config.search.semantic_timeout_ms = v;
            }
            if let Some(policy) = search
                .empty_match_policy
                .as_deref()
                .and_then(EmptyMatchPolicy::parse)
            {
                config.search.empty_match_policy = policy;
            }
        }
        if let Some(llm) = file.llm {
            if let Some(provider) = llm.provider {
                config.llm.provider = LlmProvider::parse(&provider);
            }
            config.llm.model = llm.model;
            config.llm.api_key = llm.api_key;
            config.llm.base_url = llm.base_url;
            config.llm.timeout_ms = llm.timeout_ms;
            config.llm.connect_timeout_ms = llm.connect_timeout_ms;
        }
        if let Some(logging) = file.logging {
            config.logging = logging;
        }

        config
    }

    /// Returns the default config file path for display purposes.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        directories::BaseDirs::new()
            .map(|dirs| dirs.config_dir().join("skillswap").join("config.toml"))
    }
}

/// Parses a boolean environment variable.
pub(crate) fn parse_bool_env(key: &str) -> Option<bool> {
    let value = std::env::var(key).ok()?;
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = SkillswapConfig::default();
        assert!(!config.search.semantic_enabled);
        assert_eq!(config.search.semantic_timeout_ms, 5_000);
        assert_eq!(config.search.empty_match_policy, EmptyMatchPolicy::Fallback);
        assert_eq!(config.llm.provider, LlmProvider::Gemini);
    }

    #[test]
    fn test_from_toml() {
        let config = SkillswapConfig::from_toml(
            r#"
            [search]
            semantic_enabled = true
            semantic_timeout_ms = 1500
            empty_match_policy = "terminate"

            [llm]
            provider = "ollama"
            model = "llama3.2"
            base_url = "http://localhost:11434"

            [logging]
            format = "json"
            "#,
        )
        .unwrap();

        assert!(config.search.semantic_enabled);
        assert_eq!(config.search.semantic_timeout_ms, 1500);
        assert_eq!(config.search.empty_match_policy, EmptyMatchPolicy::Terminate);
        assert_eq!(config.llm.provider, LlmProvider::Ollama);
        assert_eq!(config.llm.model.as_deref(), Some("llama3.2"));
        assert_eq!(config.logging.format.as_deref(), Some("json"));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[features]\ndescription_enhancement = true").unwrap();

        let config = SkillswapConfig::load_from_file(file.path()).unwrap();
        assert!(config.features.description_enhancement);
        assert!(!config.search.semantic_enabled);
    }

    #[test]
    fn test_semantic_enabled_turns_on_semantic_mode() {
        let config = SkillswapConfig::from_toml("[search]\nsemantic_enabled = true").unwrap();
        assert!(config.search.use_semantic(false));

        let request = crate::search::SearchRequest::new("fix sink", Vec::new())
            .with_semantic_match(config.search.use_semantic(false));
        assert!(request.use_semantic_match);
    }

    #[test]
    fn test_semantic_off_by_default() {
        let config = SkillswapConfig::from_toml("[llm]\nprovider = \"gemini\"").unwrap();
        assert!(!config.search.use_semantic(false));
        assert!(config.search.use_semantic(true));
    }

    #[test]
    fn test_load_from_missing_file() {
        let result = SkillswapConfig::load_from_file(Path::new("/nonexistent/skillswap.toml"));
        assert!(matches!(
            result,
            Err(crate::Error::OperationFailed { ref operation, .. }) if operation == "read_config_file"
        ));
    }

    #[test]
    fn test_invalid_toml() {
        assert!(SkillswapConfig::from_toml("[search\n").is_err());
    }

    #[test]
    fn test_provider_parse() {
        assert_eq!(LlmProvider::parse("OpenAI"), LlmProvider::OpenAi);
        assert_eq!(LlmProvider::parse("off"), LlmProvider::None);
        assert_eq!(LlmProvider::parse("anything"), LlmProvider::Gemini);
    }
}
