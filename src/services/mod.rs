//! Business logic services.
//!
//! Services sit between the CLI and the LLM providers and never surface
//! provider failures to the seller.

pub mod description;

pub use description::enhance_description;
