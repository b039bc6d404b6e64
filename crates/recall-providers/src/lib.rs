//! # Provider Seams
//!
//! Trait interfaces for the external services the engine consumes:
//! embedding generation, emotional-salience scoring, and profile fact
//! extraction. Production implementations (LLM- or API-backed) live outside
//! this repository; tests use mocks.
//!
//! Failure policy is the caller's: consolidation and retrieval wrap these
//! calls in bounded timeouts and degrade with documented fallbacks
//! (salience 0.0, message excluded from traces, empty profile increment).

use std::collections::BTreeMap;

use async_trait::async_trait;
use recall_core::{ProfileFacet, UserProfile};

mod salience;

pub use salience::SalienceScore;

/// Service for generating text embeddings.
#[async_trait]
pub trait EmbeddingService: Send + Sync {
    /// Generates an embedding vector for a single text string.
    async fn embed(&self, text: &str) -> Result<Vec<f32>, anyhow::Error>;

    /// Generates embedding vectors for multiple texts in a single call.
    /// More efficient than calling `embed` per text.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, anyhow::Error>;
}

/// Service scoring the emotional salience of a message.
///
/// The contract is a pure function from text to three sub-scores; the
/// result is frozen into the message's trace at consolidation time and
/// never recomputed.
#[async_trait]
pub trait SalienceScorer: Send + Sync {
    /// Scores a message. `is_user` distinguishes the user's own disclosures
    /// from assistant output; the contract accepts any role.
    async fn score(&self, text: &str, is_user: bool) -> Result<SalienceScore, anyhow::Error>;
}

/// New profile facts extracted from a closed session, keyed by facet.
pub type FactIncrement = BTreeMap<ProfileFacet, Vec<String>>;

/// Service extracting long-term user facts from a session's turns.
#[async_trait]
pub trait FactExtractor: Send + Sync {
    /// Extracts facts that are new relative to `existing`. The returned
    /// strings are untagged; the consolidator adds session provenance.
    async fn extract(
        &self,
        turns: &[recall_core::ConversationTurn],
        existing: &UserProfile,
    ) -> Result<FactIncrement, anyhow::Error>;
}
