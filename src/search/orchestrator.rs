//! Search orchestration with timeout-bounded semantic matching.
//!
//! Picks a strategy for each request and degrades to substring matching when
//! the semantic path is off, unavailable or fails.

use super::fallback::match_ids;
use super::semantic::request_semantic_matches;
use super::types::{FallbackReason, MatchSource, SearchOutcome, SearchRequest, SemanticError};
use crate::config::{EmptyMatchPolicy, SearchConfig};
use crate::llm::LlmProvider as LlmProviderTrait;
use crate::models::{ServiceId, ServiceRecord};
use std::collections::HashSet;
use std::sync::{Arc, mpsc};
use std::time::{Duration, Instant};

/// Runs a search and never fails.
///
/// | Condition | Result |
/// |-----------|--------|
/// | Empty query | Every candidate, [`MatchSource::Unfiltered`] |
/// | Semantic off | Substring matches, no fallback reason |
/// | Semantic on, no provider | Substring matches, [`FallbackReason::Unavailable`] |
/// | Semantic error or timeout | Substring matches, reason from the error |
/// | Semantic success, empty | Depends on [`EmptyMatchPolicy`] |
/// | Semantic success | Matched ids in candidate order |
///
/// # Arguments
///
/// * `provider` - Optional LLM provider. If None, semantic requests fall back.
/// * `request` - Query, semantic toggle and candidates.
/// * `config` - Timeout and empty-match policy.
#[must_use]
pub fn search_services(
    provider: Option<Arc<dyn LlmProviderTrait>>,
    request: &SearchRequest,
    config: &SearchConfig,
) -> SearchOutcome {
    let start = Instant::now();
    let mode = if request.use_semantic_match {
        "semantic"
    } else {
        "substring"
    };
    metrics::counter!("search_requests_total", "mode" => mode).increment(1);

    let outcome = if request.query.is_empty() {
        unfiltered(&request.candidates)
    } else if !request.use_semantic_match {
        fallback(request, None)
    } else if let Some(provider) = provider {
        let timeout = Duration::from_millis(config.semantic_timeout_ms);
        let result = run_semantic_with_timeout(
            provider,
            request.provider_query().to_string(),
            request.candidates.clone(),
            timeout,
        );
        resolve(request, result, config.empty_match_policy)
    } else {
        fallback(request, Some(FallbackReason::Unavailable))
    };

    record_outcome(&outcome, start);
    outcome
}

/// Runs the semantic request on a worker thread with a deadline.
///
/// # Thread Lifecycle
///
/// On timeout the receiver gives up and the worker finishes its HTTP request
/// in the background; its result is dropped with the channel. The HTTP client's
/// own request timeout bounds how long such a worker lives.
fn run_semantic_with_timeout(
    provider: Arc<dyn LlmProviderTrait>,
    query: String,
    candidates: Vec<ServiceRecord>,
    timeout: Duration,
) -> Result<Vec<ServiceId>, SemanticError> {
    let (tx, rx) = mpsc::channel();
    let parent_span = tracing::Span::current();

    metrics::counter!("search_semantic_started").increment(1);

    std::thread::spawn(move || {
        let span = tracing::info_span!(parent: &parent_span, "search.semantic");
        let _guard = span.enter();
        let result = request_semantic_matches(provider.as_ref(), &query, &candidates);
        // Receiver is gone after a timeout
        let _ = tx.send(result);
    });

    match rx.recv_timeout(timeout) {
        Ok(result) => result,
        Err(mpsc::RecvTimeoutError::Timeout) => {
            tracing::debug!(
                timeout_ms = timeout.as_millis(),
                "Semantic match timed out, worker will complete in background"
            );
            Err(SemanticError::Timeout(timeout))
        },
        Err(mpsc::RecvTimeoutError::Disconnected) => Err(SemanticError::Transport(
            "semantic worker exited without a result".to_string(),
        )),
    }
}

/// Turns a semantic result into an outcome.
///
/// Shared by the blocking orchestrator and [`super::SearchSession`].
pub(crate) fn resolve(
    request: &SearchRequest,
    result: Result<Vec<ServiceId>, SemanticError>,
    policy: EmptyMatchPolicy,
) -> SearchOutcome {
    match result {
        Ok(ids) if ids.is_empty() => {
            metrics::counter!("search_semantic_completed", "status" => "empty").increment(1);
            match policy {
                EmptyMatchPolicy::Fallback => fallback(request, Some(FallbackReason::EmptyMatch)),
                EmptyMatchPolicy::Terminate => SearchOutcome {
                    ids: Vec::new(),
                    source: MatchSource::Semantic,
                    fallback_reason: None,
                },
            }
        },
        Ok(ids) => {
            metrics::counter!("search_semantic_completed", "status" => "success").increment(1);
            SearchOutcome {
                ids: in_candidate_order(&ids, &request.candidates),
                source: MatchSource::Semantic,
                fallback_reason: None,
            }
        },
        Err(err) => {
            let reason = err.fallback_reason();
            metrics::counter!("search_semantic_completed", "status" => reason.as_str())
                .increment(1);
            tracing::warn!(
                error = %err,
                reason = reason.as_str(),
                "Semantic match failed, using substring matching"
            );
            fallback(request, Some(reason))
        },
    }
}

/// Every candidate, for an empty query.
pub(crate) fn unfiltered(candidates: &[ServiceRecord]) -> SearchOutcome {
    SearchOutcome {
        ids: candidates.iter().map(|r| r.id.clone()).collect(),
        source: MatchSource::Unfiltered,
        fallback_reason: None,
    }
}

/// Substring matches, tagged with why the semantic path was skipped.
pub(crate) fn fallback(request: &SearchRequest, reason: Option<FallbackReason>) -> SearchOutcome {
    if let Some(reason) = reason {
        metrics::counter!("search_fallback_total", "reason" => reason.as_str()).increment(1);
    }
    SearchOutcome {
        ids: match_ids(&request.query, &request.candidates),
        source: MatchSource::Fallback,
        fallback_reason: reason,
    }
}

/// Reorders a validated id subset to follow the candidate list.
fn in_candidate_order(ids: &[ServiceId], candidates: &[ServiceRecord]) -> Vec<ServiceId> {
    let wanted: HashSet<&ServiceId> = ids.iter().collect();
    candidates
        .iter()
        .filter(|record| wanted.contains(&record.id))
        .map(|record| record.id.clone())
        .collect()
}

pub(crate) fn record_outcome(outcome: &SearchOutcome, start: Instant) {
    metrics::histogram!("search_duration_ms", "source" => outcome.source.as_str())
        .record(start.elapsed().as_secs_f64() * 1000.0);
    tracing::debug!(
        source = outcome.source.as_str(),
        fallback_reason = outcome.fallback_reason.map(|r| r.as_str()),
        matches = outcome.ids.len(),
        duration_ms = start.elapsed().as_millis(),
        "Search resolved"
    );
}
