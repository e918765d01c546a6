//! Search orchestration integration tests.
//!
//! Drives `search_services` and `SearchSession` end to end with stub providers:
//! - Blank queries and empty candidate sets
//! - Substring fallback on every semantic failure mode
//! - Semantic answers validated against the candidate set
//! - Empty-match policy
//! - Deadlines and superseded searches

// Integration tests use expect/unwrap for simplicity - panics are acceptable in tests
#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic, dead_code)]

use skillswap::catalog;
use skillswap::config::{EmptyMatchPolicy, SearchConfig};
use skillswap::llm::LlmProvider;
use skillswap::search::{
    FallbackReason, MatchSource, SearchOutcome, SearchPhase, SearchRequest, SearchSession,
    match_ids, search_services,
};
use skillswap::{Error, Result, ServiceCategory, ServiceId, ServiceRecord};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

// ============================================================================
// Stub Providers
// ============================================================================

/// Fails every request at the transport layer.
struct FailingProvider {
    calls: AtomicUsize,
}

impl FailingProvider {
    fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
        }
    }
}

impl LlmProvider for FailingProvider {
    fn name(&self) -> &'static str {
        "failing"
    }

    fn complete(&self, _prompt: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(Error::Transport {
            provider: "failing",
            cause: "connection refused".to_string(),
        })
    }
}

/// Answers with chatter instead of a JSON array.
struct ChattyProvider;

impl LlmProvider for ChattyProvider {
    fn name(&self) -> &'static str {
        "chatty"
    }

    fn complete(&self, _prompt: &str) -> Result<String> {
        Ok("Sure! The plumber looks like a good fit.".to_string())
    }
}

/// Returns a fixed id list after an optional delay, recording what it saw.
struct FixedProvider {
    ids: Vec<String>,
    delay: Duration,
    seen: Mutex<Option<(String, String)>>,
}

impl FixedProvider {
    fn new(ids: &[&str]) -> Self {
        Self {
            ids: ids.iter().map(ToString::to_string).collect(),
            delay: Duration::ZERO,
            seen: Mutex::new(None),
        }
    }

    fn slow(ids: &[&str], delay: Duration) -> Self {
        Self {
            delay,
            ..Self::new(ids)
        }
    }
}

impl LlmProvider for FixedProvider {
    fn name(&self) -> &'static str {
        "fixed"
    }

    fn complete(&self, _prompt: &str) -> Result<String> {
        Ok("[]".to_string())
    }

    fn match_services(&self, query: &str, index_json: &str) -> Result<Vec<String>> {
        *self.seen.lock().unwrap() = Some((query.to_string(), index_json.to_string()));
        if !self.delay.is_zero() {
            std::thread::sleep(self.delay);
        }
        Ok(self.ids.clone())
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn semantic(query: &str) -> SearchRequest {
    SearchRequest::new(query, catalog::mock_services()).with_semantic_match(true)
}

fn ids(outcome: &SearchOutcome) -> Vec<&str> {
    outcome.ids.iter().map(ServiceId::as_str).collect()
}

fn config_with_timeout(timeout_ms: u64) -> SearchConfig {
    SearchConfig {
        semantic_timeout_ms: timeout_ms,
        ..SearchConfig::default()
    }
}

fn fallback_ids(query: &str) -> Vec<ServiceId> {
    match_ids(query, catalog::services())
}

// ============================================================================
// Blank Queries and Empty Candidates
// ============================================================================

mod blank_and_empty {
    use super::*;

    #[test]
    fn test_empty_query_returns_everything_in_any_mode() {
        let provider = Arc::new(FailingProvider::new());
        let all: Vec<ServiceId> = catalog::services().iter().map(|s| s.id.clone()).collect();

        let plain = search_services(
            None,
            &SearchRequest::new("", catalog::mock_services()),
            &SearchConfig::default(),
        );
        let smart = search_services(Some(provider.clone()), &semantic(""), &SearchConfig::default());

        assert_eq!(plain.ids, all);
        assert_eq!(plain.source, MatchSource::Unfiltered);
        assert_eq!(smart.ids, all);
        assert_eq!(smart.source, MatchSource::Unfiltered);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_whitespace_query_is_matched_not_unfiltered() {
        let provider = Arc::new(FailingProvider::new());

        for query in [" ", "   ", "\t\n"] {
            let plain = search_services(
                None,
                &SearchRequest::new(query, catalog::mock_services()),
                &SearchConfig::default(),
            );
            let smart = search_services(
                Some(provider.clone()),
                &semantic(query),
                &SearchConfig::default(),
            );

            assert_eq!(plain.ids, fallback_ids(query));
            assert_eq!(plain.source, MatchSource::Fallback);
            assert_eq!(smart.ids, fallback_ids(query));
            assert_eq!(smart.fallback_reason, Some(FallbackReason::Transport));
        }
        assert_eq!(fallback_ids(" ").len(), catalog::services().len());
        assert!(fallback_ids("   ").is_empty());
        assert_eq!(provider.calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn test_empty_candidates_return_nothing_in_any_mode() {
        let provider: Arc<dyn LlmProvider> = Arc::new(FixedProvider::new(&["s1"]));

        for request in [
            SearchRequest::new("math", Vec::new()),
            SearchRequest::new("math", Vec::new()).with_semantic_match(true),
            SearchRequest::new("", Vec::new()).with_semantic_match(true),
        ] {
            let outcome =
                search_services(Some(provider.clone()), &request, &SearchConfig::default());
            assert!(outcome.is_empty());
        }
    }
}

// ============================================================================
// Substring Fallback
// ============================================================================

mod fallback {
    use super::*;

    #[test]
    fn test_plain_search_matches_title() {
        let outcome = search_services(
            None,
            &SearchRequest::new("Math", catalog::mock_services()),
            &SearchConfig::default(),
        );
        assert_eq!(ids(&outcome), vec!["s1"]);
        assert_eq!(outcome.source, MatchSource::Fallback);
        assert_eq!(outcome.fallback_reason, None);
    }

    #[test]
    fn test_plain_search_misses_semantic_phrasing() {
        let outcome = search_services(
            None,
            &SearchRequest::new("fix sink", catalog::mock_services()),
            &SearchConfig::default(),
        );
        assert!(outcome.is_empty());
    }

    #[test]
    fn test_transport_failure_equals_fallback() {
        let provider = Arc::new(FailingProvider::new());
        for query in ["Math", "repair", "Beauty", "fix sink"] {
            let outcome =
                search_services(Some(provider.clone()), &semantic(query), &SearchConfig::default());
            assert_eq!(outcome.ids, fallback_ids(query), "query {query:?}");
            assert_eq!(outcome.fallback_reason, Some(FallbackReason::Transport));
        }
        assert_eq!(provider.calls.load(Ordering::SeqCst), 4);
    }

    #[test]
    fn test_malformed_response_equals_fallback() {
        let outcome = search_services(
            Some(Arc::new(ChattyProvider)),
            &semantic("repair"),
            &SearchConfig::default(),
        );
        assert_eq!(ids(&outcome), vec!["s2", "s4"]);
        assert_eq!(outcome.fallback_reason, Some(FallbackReason::MalformedResponse));
    }

    #[test]
    fn test_missing_provider_is_unavailable() {
        let outcome = search_services(None, &semantic("Math"), &SearchConfig::default());
        assert_eq!(ids(&outcome), vec!["s1"]);
        assert_eq!(outcome.fallback_reason, Some(FallbackReason::Unavailable));
    }
}

// ============================================================================
// Semantic Matches
// ============================================================================

mod semantic_matches {
    use super::*;

    #[test]
    fn test_semantic_ids_are_returned_in_candidate_order() {
        let provider = Arc::new(FixedProvider::new(&["s4", "s2"]));
        let outcome =
            search_services(Some(provider), &semantic("fix sink"), &SearchConfig::default());

        assert_eq!(ids(&outcome), vec!["s2", "s4"]);
        assert_eq!(outcome.source, MatchSource::Semantic);
        assert_eq!(outcome.fallback_reason, None);
    }

    #[test]
    fn test_unknown_and_duplicate_ids_are_dropped() {
        let provider = Arc::new(FixedProvider::new(&["s99", "s4", "s4", "S2"]));
        let outcome = search_services(Some(provider), &semantic("laptop"), &SearchConfig::default());
        assert_eq!(ids(&outcome), vec!["s4"]);
    }

    #[test]
    fn test_provider_sees_trimmed_query_and_compact_index() {
        let provider = Arc::new(FixedProvider::new(&["s1"]));
        let _ = search_services(
            Some(provider.clone()),
            &semantic("  algebra help "),
            &SearchConfig::default(),
        );

        let (query, index) = provider.seen.lock().unwrap().clone().unwrap();
        assert_eq!(query, "algebra help");

        let entries: Vec<serde_json::Value> = serde_json::from_str(&index).unwrap();
        assert_eq!(entries.len(), 6);
        assert_eq!(entries[1]["id"], "s2");
        assert_eq!(entries[1]["category"], "Home Repair");
        assert!(entries[1]["tags"].as_array().unwrap().contains(&"plumbing".into()));
        assert!(entries[1].get("price").is_none());
    }

    #[test]
    fn test_semantic_search_over_custom_candidates() {
        let candidates = vec![
            ServiceRecord::new("a", "Boda delivery", ServiceCategory::Transport),
            ServiceRecord::new("b", "Wedding photography", ServiceCategory::Creative),
        ];
        let provider = Arc::new(FixedProvider::new(&["a"]));
        let request = SearchRequest::new("send a parcel", candidates).with_semantic_match(true);

        let outcome = search_services(Some(provider), &request, &SearchConfig::default());
        assert_eq!(ids(&outcome), vec!["a"]);
        assert_eq!(outcome.records(&request.candidates)[0].title, "Boda delivery");
    }
}

// ============================================================================
// Empty-Match Policy
// ============================================================================

mod empty_match {
    use super::*;

    #[test]
    fn test_empty_match_falls_back_by_default() {
        let provider = Arc::new(FixedProvider::new(&[]));
        let outcome = search_services(Some(provider), &semantic("Math"), &SearchConfig::default());

        assert_eq!(ids(&outcome), vec!["s1"]);
        assert_eq!(outcome.fallback_reason, Some(FallbackReason::EmptyMatch));
    }

    #[test]
    fn test_empty_match_terminates_when_configured() {
        let provider = Arc::new(FixedProvider::new(&[]));
        let config = SearchConfig {
            empty_match_policy: EmptyMatchPolicy::Terminate,
            ..SearchConfig::default()
        };
        let outcome = search_services(Some(provider), &semantic("Math"), &config);

        assert!(outcome.is_empty());
        assert_eq!(outcome.source, MatchSource::Semantic);
    }

    #[test]
    fn test_only_unknown_ids_count_as_empty() {
        let provider = Arc::new(FixedProvider::new(&["s42"]));
        let outcome = search_services(Some(provider), &semantic("Math"), &SearchConfig::default());

        assert_eq!(ids(&outcome), vec!["s1"]);
        assert_eq!(outcome.fallback_reason, Some(FallbackReason::EmptyMatch));
    }
}

// ============================================================================
// Deadlines
// ============================================================================

mod deadlines {
    use super::*;

    #[test]
    fn test_slow_provider_times_out_to_fallback() {
        let provider = Arc::new(FixedProvider::slow(&["s3"], Duration::from_millis(800)));
        let start = Instant::now();
        let outcome = search_services(Some(provider), &semantic("plumbing"), &config_with_timeout(50));

        assert!(start.elapsed() < Duration::from_millis(600));
        assert_eq!(ids(&outcome), vec!["s2"]);
        assert_eq!(outcome.fallback_reason, Some(FallbackReason::Timeout));
    }

    #[test]
    fn test_fast_provider_beats_deadline() {
        let provider = Arc::new(FixedProvider::slow(&["s3"], Duration::from_millis(10)));
        let outcome = search_services(Some(provider), &semantic("hair"), &config_with_timeout(2_000));

        assert_eq!(ids(&outcome), vec!["s3"]);
        assert_eq!(outcome.source, MatchSource::Semantic);
    }
}

// ============================================================================
// Sessions
// ============================================================================

mod sessions {
    use super::*;

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_newer_search_supersedes_pending() {
        let provider = Arc::new(FixedProvider::slow(&["s3"], Duration::from_millis(800)));
        let session = Arc::new(SearchSession::new(Some(provider), config_with_timeout(5_000)));

        let first = {
            let session = Arc::clone(&session);
            tokio::spawn(async move { session.search(semantic("plumbing")).await })
        };
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(session.phase(), SearchPhase::Pending);

        let second = session
            .search(SearchRequest::new("Math", catalog::mock_services()))
            .await;
        let first = first.await.unwrap();

        assert_eq!(ids(&first), vec!["s2"]);
        assert_eq!(first.fallback_reason, Some(FallbackReason::Superseded));
        assert_eq!(ids(&second), vec!["s1"]);
        assert_eq!(session.phase(), SearchPhase::Resolved);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_session_deadline() {
        let provider = Arc::new(FixedProvider::slow(&["s3"], Duration::from_millis(800)));
        let session = SearchSession::new(Some(provider), config_with_timeout(50));

        let outcome = session.search(semantic("repair")).await;

        assert_eq!(ids(&outcome), vec!["s2", "s4"]);
        assert_eq!(outcome.fallback_reason, Some(FallbackReason::Timeout));
        assert_eq!(session.phase(), SearchPhase::Resolved);
    }

    #[tokio::test]
    async fn test_session_semantic_success() {
        let provider = Arc::new(FixedProvider::new(&["s5"]));
        let session = SearchSession::new(Some(provider), SearchConfig::default());

        let outcome = session.search(semantic("logo for my shop")).await;
        assert_eq!(ids(&outcome), vec!["s5"]);
        assert_eq!(outcome.source, MatchSource::Semantic);
    }

    #[tokio::test]
    async fn test_session_cancel_supersedes() {
        let provider = Arc::new(FixedProvider::slow(&["s3"], Duration::from_millis(800)));
        let session = Arc::new(SearchSession::new(Some(provider), config_with_timeout(5_000)));

        let pending = {
            let session = Arc::clone(&session);
            tokio::spawn(async move { session.search(semantic("braids")).await })
        };
        tokio::time::sleep(Duration::from_millis(100)).await;
        session.cancel();

        let outcome = pending.await.unwrap();
        assert_eq!(outcome.fallback_reason, Some(FallbackReason::Superseded));
        assert_eq!(session.phase(), SearchPhase::Idle);
    }
}
