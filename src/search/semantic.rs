//! Semantic match requests.
//!
//! Serializes the candidates into a compact JSON index, asks the provider which
//! ids match the query, and validates the answer against the candidate set.

use super::types::SemanticError;
use crate::llm::LlmProvider as LlmProviderTrait;
use crate::models::{CompactServiceEntry, ServiceId, ServiceRecord};
use std::collections::HashSet;

/// Builds the compact JSON index sent to the provider.
///
/// # Errors
///
/// Returns [`SemanticError::Transport`] if the index cannot be serialized.
pub fn build_index(candidates: &[ServiceRecord]) -> Result<String, SemanticError> {
    let entries: Vec<CompactServiceEntry<'_>> =
        candidates.iter().map(ServiceRecord::compact).collect();
    serde_json::to_string(&entries)
        .map_err(|e| SemanticError::Transport(format!("failed to encode service index: {e}")))
}

/// Asks the provider which candidates match `query`.
///
/// The returned ids are a duplicate-free subset of the candidate ids, in the
/// order the provider listed them. Ids the provider invented are dropped with a
/// warning. An empty candidate set short-circuits without a request.
///
/// # Errors
///
/// Returns [`SemanticError::Transport`] or [`SemanticError::MalformedResponse`]
/// when the provider call fails.
pub fn request_semantic_matches<P: LlmProviderTrait + ?Sized>(
    provider: &P,
    query: &str,
    candidates: &[ServiceRecord],
) -> Result<Vec<ServiceId>, SemanticError> {
    if candidates.is_empty() {
        return Ok(Vec::new());
    }

    let index = build_index(candidates)?;
    tracing::debug!(
        provider = provider.name(),
        candidates = candidates.len(),
        index_bytes = index.len(),
        "Requesting semantic matches"
    );

    let returned = provider.match_services(query, &index)?;
    Ok(retain_known_ids(provider.name(), returned, candidates))
}

/// Keeps only ids present in `candidates`, first occurrence wins.
fn retain_known_ids(
    provider: &str,
    returned: Vec<String>,
    candidates: &[ServiceRecord],
) -> Vec<ServiceId> {
    let known: HashSet<&str> = candidates.iter().map(|r| r.id.as_str()).collect();
    let mut seen = HashSet::with_capacity(returned.len());
    let mut kept = Vec::with_capacity(returned.len());
    let mut unknown = Vec::new();

    for id in returned {
        if !known.contains(id.as_str()) {
            unknown.push(id);
        } else if seen.insert(id.clone()) {
            kept.push(ServiceId::new(id));
        }
    }

    if !unknown.is_empty() {
        metrics::counter!("search_semantic_unknown_ids_total").increment(unknown.len() as u64);
        tracing::warn!(
            provider,
            dropped = ?unknown,
            "Provider returned ids outside the candidate set"
        );
    }

    kept
}
