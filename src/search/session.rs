//! Cancellable search session.
//!
//! A session serves one search box. Starting a search supersedes whatever is
//! still in flight: the older call resolves at once with substring matches
//! tagged [`FallbackReason::Superseded`], so a slow semantic answer can never
//! overwrite a newer result.
//!
//! # Example
//!
//! ```rust,no_run
//! # async fn demo() {
//! use skillswap::catalog;
//! use skillswap::config::SearchConfig;
//! use skillswap::search::{SearchRequest, SearchSession};
//!
//! let session = SearchSession::new(None, SearchConfig::default());
//! let outcome = session
//!     .search(SearchRequest::new("plumbing", catalog::mock_services()))
//!     .await;
//! assert_eq!(outcome.ids[0].as_str(), "s2");
//! # }
//! ```

use super::orchestrator::{fallback, record_outcome, resolve, unfiltered};
use super::semantic::request_semantic_matches;
use super::types::{FallbackReason, SearchOutcome, SearchPhase, SearchRequest, SemanticError};
use crate::config::SearchConfig;
use crate::llm::LlmProvider as LlmProviderTrait;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};
use tokio::sync::watch;

/// Search state for a single query box.
pub struct SearchSession {
    provider: Option<Arc<dyn LlmProviderTrait>>,
    config: SearchConfig,
    phase: Mutex<SearchPhase>,
    /// Generation counter; every new search bumps it.
    generation: watch::Sender<u64>,
}

impl SearchSession {
    /// Creates an idle session.
    #[must_use]
    pub fn new(provider: Option<Arc<dyn LlmProviderTrait>>, config: SearchConfig) -> Self {
        let (generation, _) = watch::channel(0);
        Self {
            provider,
            config,
            phase: Mutex::new(SearchPhase::Idle),
            generation,
        }
    }

    /// Current phase of the latest search.
    #[must_use]
    pub fn phase(&self) -> SearchPhase {
        *self.phase.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Runs a search, superseding any search still in flight.
    ///
    /// Has the same outcomes as [`super::search_services`], plus
    /// [`FallbackReason::Superseded`] when a newer search starts first.
    pub async fn search(&self, request: SearchRequest) -> SearchOutcome {
        let start = Instant::now();
        let generation = self.begin();
        let mut superseded = self.generation.subscribe();

        let outcome = if request.query.is_empty() {
            unfiltered(&request.candidates)
        } else if !request.use_semantic_match {
            fallback(&request, None)
        } else if let Some(provider) = self.provider.clone() {
            let query = request.provider_query().to_string();
            let candidates = request.candidates.clone();
            let timeout = Duration::from_millis(self.config.semantic_timeout_ms);
            let task = tokio::task::spawn_blocking(move || {
                request_semantic_matches(provider.as_ref(), &query, &candidates)
            });

            let result = tokio::select! {
                joined = tokio::time::timeout(timeout, task) => match joined {
                    Ok(Ok(result)) => result,
                    Ok(Err(e)) => Err(SemanticError::Transport(format!("semantic worker failed: {e}"))),
                    Err(_) => Err(SemanticError::Timeout(timeout)),
                },
                _ = superseded.changed() => Err(SemanticError::Cancelled),
            };
            resolve(&request, result, self.config.empty_match_policy)
        } else {
            fallback(&request, Some(FallbackReason::Unavailable))
        };

        self.finish(generation);
        record_outcome(&outcome, start);
        outcome
    }

    /// Supersedes the in-flight search, if any, and returns to idle.
    pub fn cancel(&self) {
        self.generation.send_modify(|g| *g += 1);
        *self.phase.lock().unwrap_or_else(PoisonError::into_inner) = SearchPhase::Idle;
    }

    fn begin(&self) -> u64 {
        let mut current = 0;
        self.generation.send_modify(|g| {
            *g += 1;
            current = *g;
        });
        *self.phase.lock().unwrap_or_else(PoisonError::into_inner) = SearchPhase::Pending;
        current
    }

    /// Marks the session resolved unless a newer search has started.
    fn finish(&self, generation: u64) {
        let mut phase = self.phase.lock().unwrap_or_else(PoisonError::into_inner);
        if *self.generation.borrow() == generation {
            *phase = SearchPhase::Resolved;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;
    use crate::search::MatchSource;

    #[test]
    fn test_new_session_is_idle() {
        let session = SearchSession::new(None, SearchConfig::default());
        assert_eq!(session.phase(), SearchPhase::Idle);
    }

    #[tokio::test]
    async fn test_search_resolves() {
        let session = SearchSession::new(None, SearchConfig::default());
        let outcome = session
            .search(SearchRequest::new("plumbing", catalog::mock_services()))
            .await;

        assert_eq!(outcome.ids.len(), 1);
        assert_eq!(outcome.ids[0].as_str(), "s2");
        assert_eq!(outcome.source, MatchSource::Fallback);
        assert_eq!(session.phase(), SearchPhase::Resolved);
    }

    #[tokio::test]
    async fn test_cancel_returns_to_idle() {
        let session = SearchSession::new(None, SearchConfig::default());
        session
            .search(SearchRequest::new("", catalog::mock_services()))
            .await;
        session.cancel();
        assert_eq!(session.phase(), SearchPhase::Idle);
    }
}
