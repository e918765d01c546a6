//! Types for service search.
//!
//! - [`SearchRequest`]: query, semantic toggle and candidate set
//! - [`SearchOutcome`]: matched ids plus how they were produced
//! - [`SemanticError`]: why a semantic attempt was abandoned
//! - [`SearchPhase`]: lifecycle of a search in a session

use crate::models::{ServiceId, ServiceRecord};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// A search over a candidate set.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    /// Raw query text as typed.
    pub query: String,
    /// Whether to try the semantic matcher first.
    pub use_semantic_match: bool,
    /// Records eligible for matching.
    pub candidates: Vec<ServiceRecord>,
}

impl SearchRequest {
    /// Creates a request with semantic matching off.
    #[must_use]
    pub fn new(query: impl Into<String>, candidates: Vec<ServiceRecord>) -> Self {
        Self {
            query: query.into(),
            use_semantic_match: false,
            candidates,
        }
    }

    /// Sets the semantic toggle.
    #[must_use]
    pub const fn with_semantic_match(mut self, enabled: bool) -> Self {
        self.use_semantic_match = enabled;
        self
    }

    /// Query text handed to the semantic matcher.
    ///
    /// Surrounding whitespace is trimmed unless nothing would remain.
    #[must_use]
    pub fn provider_query(&self) -> &str {
        match self.query.trim() {
            "" => &self.query,
            trimmed => trimmed,
        }
    }
}

/// How the ids in an outcome were chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchSource {
    /// Empty query; every candidate is returned.
    Unfiltered,
    /// Substring matching on title and category.
    Fallback,
    /// The semantic matcher's answer.
    Semantic,
}

impl MatchSource {
    /// Returns the string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Unfiltered => "unfiltered",
            Self::Fallback => "fallback",
            Self::Semantic => "semantic",
        }
    }
}

impl fmt::Display for MatchSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Why the semantic path was abandoned for substring matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackReason {
    /// Semantic matching was requested but no provider is configured.
    Unavailable,
    /// Network or protocol failure.
    Transport,
    /// The reply was not a JSON array of strings.
    MalformedResponse,
    /// The deadline passed first.
    Timeout,
    /// The matcher succeeded with no matches and policy says fall back.
    EmptyMatch,
    /// A newer search in the same session replaced this one.
    Superseded,
}

impl FallbackReason {
    /// Returns the string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Unavailable => "unavailable",
            Self::Transport => "transport",
            Self::MalformedResponse => "malformed_response",
            Self::Timeout => "timeout",
            Self::EmptyMatch => "empty_match",
            Self::Superseded => "superseded",
        }
    }
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Failure of a semantic match attempt.
///
/// Never escapes the orchestrator; each variant maps to a [`FallbackReason`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SemanticError {
    /// Network, status or configuration failure reaching the provider.
    #[error("transport failure: {0}")]
    Transport(String),
    /// The provider answered with something other than an id list.
    #[error("malformed response: {0}")]
    MalformedResponse(String),
    /// No answer within the deadline.
    #[error("no response within {0:?}")]
    Timeout(Duration),
    /// Superseded by a newer search.
    #[error("cancelled by a newer search")]
    Cancelled,
}

impl SemanticError {
    /// The fallback reason recorded for this failure.
    #[must_use]
    pub const fn fallback_reason(&self) -> FallbackReason {
        match self {
            Self::Transport(_) => FallbackReason::Transport,
            Self::MalformedResponse(_) => FallbackReason::MalformedResponse,
            Self::Timeout(_) => FallbackReason::Timeout,
            Self::Cancelled => FallbackReason::Superseded,
        }
    }
}

impl From<crate::Error> for SemanticError {
    fn from(err: crate::Error) -> Self {
        match err {
            crate::Error::MalformedResponse { .. } => Self::MalformedResponse(err.to_string()),
            other => Self::Transport(other.to_string()),
        }
    }
}

/// Result of a search.
///
/// `ids` is always a subset of the request's candidate ids, in candidate order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchOutcome {
    /// Matched ids.
    pub ids: Vec<ServiceId>,
    /// How the ids were chosen.
    pub source: MatchSource,
    /// Set when a semantic attempt was abandoned.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_reason: Option<FallbackReason>,
}

impl SearchOutcome {
    /// Number of matches.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether nothing matched.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Joins the ids back against a record set, keeping the set's order.
    #[must_use]
    pub fn records<'a>(&self, candidates: &'a [ServiceRecord]) -> Vec<&'a ServiceRecord> {
        let wanted: HashSet<&ServiceId> = self.ids.iter().collect();
        candidates
            .iter()
            .filter(|record| wanted.contains(&record.id))
            .collect()
    }
}

/// Lifecycle of a search within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SearchPhase {
    /// Nothing has been searched yet.
    #[default]
    Idle,
    /// A search is in flight.
    Pending,
    /// The latest search has an outcome.
    Resolved,
}

impl SearchPhase {
    /// Returns the string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Pending => "pending",
            Self::Resolved => "resolved",
        }
    }
}
