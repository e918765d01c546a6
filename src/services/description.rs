//! Listing description enhancement.
//!
//! Turns a seller's rough notes into a short professional paragraph using the
//! LLM. Failures never reach the seller: the notes come back unchanged.

use crate::llm::LlmProvider;

/// Rewrites `rough_notes` into a listing description.
///
/// Returns the notes unchanged when no provider is configured, the notes are
/// blank, the call fails, or the model answers with nothing.
#[must_use]
pub fn enhance_description(
    provider: Option<&dyn LlmProvider>,
    title: &str,
    rough_notes: &str,
) -> String {
    if rough_notes.trim().is_empty() {
        return rough_notes.to_string();
    }
    let Some(provider) = provider else {
        metrics::counter!("description_enhance_total", "status" => "unavailable").increment(1);
        return rough_notes.to_string();
    };

    match provider.enhance_description(title, rough_notes) {
        Ok(text) => match clean(&text) {
            Some(enhanced) => {
                metrics::counter!("description_enhance_total", "status" => "success")
                    .increment(1);
                enhanced
            },
            None => {
                metrics::counter!("description_enhance_total", "status" => "empty").increment(1);
                tracing::warn!(provider = provider.name(), "Description enhancement was blank");
                rough_notes.to_string()
            },
        },
        Err(e) => {
            metrics::counter!("description_enhance_total", "status" => "error").increment(1);
            tracing::warn!(
                provider = provider.name(),
                error = %e,
                "Description enhancement failed, keeping notes"
            );
            rough_notes.to_string()
        },
    }
}

/// Trims whitespace and a pair of wrapping quotes.
fn clean(text: &str) -> Option<String> {
    let trimmed = text.trim();
    let unquoted = trimmed
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .unwrap_or(trimmed)
        .trim();
    if unquoted.is_empty() {
        None
    } else {
        Some(unquoted.to_string())
    }
}
