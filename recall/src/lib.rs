//! # Recall
//!
//! Tiered recall context engine: selects, per conversational turn, what
//! portion of a user's interaction history is exposed as context to a
//! downstream language model, under four escalating memory policies.
//!
//! - **NoRetention**: empty context regardless of history
//! - **BoundedRecency**: the most recent N turns, verbatim
//! - **ProfileRecency**: consolidated user profile + recent M turns
//! - **HybridRetrieval**: profile + recent turns + forgetting-curve
//!   retrieval over memory traces
//!
//! The engine consumes external providers (embeddings, salience scoring,
//! fact extraction) through the `recall-providers` traits; every provider
//! call is wrapped in a bounded timeout with a documented fallback, so
//! context assembly always returns a valid, possibly degraded, bundle.
//!
//! ## Entry points
//!
//! - [`engine::RecallEngine::get_context`]: per-turn context assembly
//! - [`consolidation::ConsolidationService::consolidate_session`]: the
//!   once-per-session-close transaction turning raw conversation into
//!   profile facts and memory traces

pub mod config;
pub mod consolidation;
pub mod context;
pub mod engine;
pub mod policy;
pub mod salience;

pub use config::RecallConfig;
pub use consolidation::{ConsolidationOutcome, ConsolidationService};
pub use context::{Context, ContextBuilder, ContextMetadata};
pub use engine::{MemoryStats, RecallEngine};
pub use policy::{MemoryPolicy, PolicyError};
