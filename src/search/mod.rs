//! Service search.
//!
//! Matches a free-text query against a candidate set of listings.
//!
//! # Architecture
//!
//! - [`types`]: Requests, outcomes and the semantic error taxonomy
//! - [`fallback`]: Substring matching on title and category, always available
//! - [`semantic`]: One LLM request per query, answer validated against candidates
//! - [`orchestrator`]: Blocking entry point with a deadline on the semantic path
//! - [`session`]: Async entry point where a new search supersedes the last
//!
//! # Matching Modes
//!
//! | Mode | Latency | Sees | Use Case |
//! |------|---------|------|----------|
//! | Substring | <1ms | title, category | Default, offline |
//! | Semantic | one LLM round trip | title, description, category, location, tags | Natural phrasing ("fix sink") |
//!
//! # Flow
//!
//! ```text
//! Query
//!   │
//!   ├─ empty ──────────────► every candidate
//!   │
//!   ├─ semantic off ───────► substring matches
//!   │
//!   └─ semantic on ──► LLM (deadline)
//!                        │
//!                        ├─ ids ─────────► validated subset, candidate order
//!                        ├─ [] ──────────► policy: substring or empty
//!                        └─ error/timeout ► substring matches + reason
//! ```
//!
//! # Configuration
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | `SKILLSWAP_SEMANTIC_SEARCH` | `false` | Default for the semantic toggle |
//! | `SKILLSWAP_SEMANTIC_TIMEOUT_MS` | `5000` | Semantic deadline |
//! | `SKILLSWAP_EMPTY_MATCH_POLICY` | `fallback` | `fallback` or `terminate` |

pub mod fallback;
pub mod orchestrator;
pub mod semantic;
pub mod session;
pub mod types;

pub use fallback::{match_candidates, match_ids};
pub use orchestrator::search_services;
pub use semantic::request_semantic_matches;
pub use session::SearchSession;
pub use types::{
    FallbackReason, MatchSource, SearchOutcome, SearchPhase, SearchRequest, SemanticError,
};
