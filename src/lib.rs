//! # `SkillSwap`
//!
//! Core of a regional services marketplace.
//!
//! The interesting part is service search: a free-text query is matched against
//! a candidate set of [`ServiceRecord`]s either by an external language model
//! (semantic matching) or by a deterministic substring filter. The semantic path
//! fails soft: timeouts, transport errors and malformed responses all degrade to
//! the substring filter, so [`search::search_services`] has no error return.
//!
//! Around it sit the pieces of the marketplace prototype: the mock [`catalog`],
//! the platform fee split in [`models::payment`], the view-state machine in
//! [`navigation`] and LLM-backed listing copy in [`services`].
//!
//! ## Example
//!
//! ```rust
//! use skillswap::catalog;
//! use skillswap::config::SearchConfig;
//! use skillswap::search::{SearchRequest, search_services};
//!
//! let request = SearchRequest::new("math", catalog::mock_services());
//! let outcome = search_services(None, &request, &SearchConfig::default());
//! assert_eq!(outcome.ids.len(), 1);
//! assert_eq!(outcome.ids[0].as_str(), "s1");
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![warn(missing_docs)]
#![forbid(unsafe_code)]
#![allow(clippy::multiple_crate_versions)]

use thiserror::Error as ThisError;

pub mod catalog;
pub mod config;
pub mod llm;
pub mod models;
pub mod navigation;
pub mod observability;
pub mod search;
pub mod services;

pub use config::{FeatureFlags, SkillswapConfig};
pub use llm::LlmProvider;
pub use models::{FeeSplit, PaymentMethod, ServiceCategory, ServiceId, ServiceRecord};
pub use search::{SearchOutcome, SearchRequest, search_services};

/// Error type for skillswap operations.
///
/// # Error Variant Triggers
///
/// | Variant | Raised When |
/// |---------|-------------|
/// | `InvalidInput` | Unknown service id, bad CLI argument, unparseable enum value |
/// | `OperationFailed` | Config file I/O, observability init, provider misconfiguration |
/// | `Transport` | Network failure or non-2xx status talking to an LLM provider |
/// | `MalformedResponse` | Provider answered but the body has no usable content |
/// | `InvalidTransition` | A navigation event not allowed from the current view |
#[derive(Debug, ThisError)]
pub enum Error {
    /// Invalid input was provided.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// An operation failed.
    #[error("operation '{operation}' failed: {cause}")]
    OperationFailed {
        /// The operation that failed.
        operation: String,
        /// The underlying cause.
        cause: String,
    },

    /// The provider could not be reached or rejected the request.
    ///
    /// Raised when:
    /// - The API key is missing
    /// - Connect or request timeouts fire in the HTTP client
    /// - The provider returns a non-success status
    #[error("{provider} transport error: {cause}")]
    Transport {
        /// Provider name.
        provider: &'static str,
        /// The underlying cause.
        cause: String,
    },

    /// The provider answered with a body that could not be used.
    #[error("{provider} returned a malformed response: {cause}")]
    MalformedResponse {
        /// Provider name.
        provider: &'static str,
        /// The underlying cause.
        cause: String,
    },

    /// A view transition that the navigation table does not allow.
    #[error("no transition from '{from}' on '{event}'")]
    InvalidTransition {
        /// The view the transition started from.
        from: String,
        /// The rejected event.
        event: String,
    },
}

/// Result type alias for skillswap operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidInput("unknown service 's9'".to_string());
        assert_eq!(err.to_string(), "invalid input: unknown service 's9'");

        let err = Error::OperationFailed {
            operation: "read_config_file".to_string(),
            cause: "not found".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "operation 'read_config_file' failed: not found"
        );

        let err = Error::Transport {
            provider: "gemini",
            cause: "connect error".to_string(),
        };
        assert_eq!(err.to_string(), "gemini transport error: connect error");

        let err = Error::InvalidTransition {
            from: "landing".to_string(),
            event: "confirm_payment".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "no transition from 'landing' on 'confirm_payment'"
        );
    }
}
