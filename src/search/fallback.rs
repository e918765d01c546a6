//! Substring fallback matching.
//!
//! Always available and total: a record matches when the case-folded query is
//! a substring of its case-folded title or category label. Descriptions and
//! tags are only seen by the semantic matcher.

use crate::models::{ServiceId, ServiceRecord};

/// Case-folds a query for matching.
///
/// Whitespace is kept: `" math"` only matches text containing a space before
/// "math".
#[must_use]
pub fn normalize_query(query: &str) -> String {
    query.to_lowercase()
}

/// Whether a record matches an already-normalized query.
#[must_use]
pub fn record_matches(normalized_query: &str, record: &ServiceRecord) -> bool {
    record.title.to_lowercase().contains(normalized_query)
        || record
            .category
            .label()
            .to_lowercase()
            .contains(normalized_query)
}

/// Returns the matching records in candidate order.
#[must_use]
pub fn match_candidates<'a>(query: &str, candidates: &'a [ServiceRecord]) -> Vec<&'a ServiceRecord> {
    let normalized = normalize_query(query);
    candidates
        .iter()
        .filter(|record| record_matches(&normalized, record))
        .collect()
}

/// Returns the ids of the matching records in candidate order.
#[must_use]
pub fn match_ids(query: &str, candidates: &[ServiceRecord]) -> Vec<ServiceId> {
    match_candidates(query, candidates)
        .into_iter()
        .map(|record| record.id.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;
    use crate::models::ServiceCategory;
    use test_case::test_case;

    fn ids(query: &str) -> Vec<String> {
        match_ids(query, catalog::services())
            .into_iter()
            .map(|id| id.to_string())
            .collect()
    }

    #[test_case("Math", &["s1"] ; "title word")]
    #[test_case("math", &["s1"] ; "case folded")]
    #[test_case(" MATH ", &["s1"] ; "inner spaces count")]
    #[test_case("  math", &[] ; "surrounding whitespace is not trimmed")]
    #[test_case(" ", &["s1", "s2", "s3", "s4", "s5", "s6"] ; "single space is a filter")]
    #[test_case("   ", &[] ; "run of spaces")]
    #[test_case("repair", &["s2", "s4"] ; "title and category")]
    #[test_case("Beauty", &["s3"] ; "category only")]
    #[test_case("tech support", &["s4"] ; "multi word category")]
    #[test_case("fix sink", &[] ; "semantic phrasing misses")]
    #[test_case("plumbing", &["s2"] ; "tag also in title")]
    #[test_case("catering", &["s6"] ; "title")]
    #[test_case("chapati", &[] ; "description is ignored")]
    #[test_case("food", &[] ; "tags are ignored")]
    fn test_match_ids(query: &str, expected: &[&str]) {
        assert_eq!(ids(query), expected);
    }

    #[test]
    fn test_empty_candidates() {
        assert!(match_ids("math", &[]).is_empty());
    }

    #[test]
    fn test_empty_query_matches_everything() {
        assert_eq!(ids("").len(), catalog::services().len());
    }

    #[test]
    fn test_unicode_folding() {
        let records = vec![ServiceRecord::new("x", "ÉCOLE Tutoring", ServiceCategory::Tutoring)];
        assert_eq!(match_ids("école", &records).len(), 1);
    }
}
