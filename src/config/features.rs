//! Feature flags for optional functionality.

/// Feature flags for controlling optional skillswap features.
///
/// Semantic search is switched by [`super::SearchConfig::semantic_enabled`].
#[derive(Debug, Clone, Default)]
pub struct FeatureFlags {
    /// Let sellers polish listing descriptions with the LLM.
    pub description_enhancement: bool,
}
