//! Context building strategy trait.
//!
//! Defines the interface all context strategies implement. Strategies read
//! from the store seams and return a [`ContextSection`]; the ContextBuilder
//! in the `recall` crate assembles the sections.

use async_trait::async_trait;
use recall_core::{ContextSection, StoreSet};

/// Per-request inputs shared by all strategies.
///
/// The session id is an explicit parameter rather than process-wide state;
/// `current_turn` bounds history so the current unanswered user message is
/// never part of its own context.
#[derive(Debug, Clone)]
pub struct ContextRequest {
    /// User the context is built for
    pub user_id: String,
    /// Index of the turn being answered; history is read strictly before it
    pub current_turn: u32,
    /// Current session; its traces are excluded from retrieval candidates
    pub current_session: Option<String>,
    /// The current turn's user message, used as the retrieval query
    pub query: Option<String>,
}

/// Trait for context building strategies.
#[async_trait]
pub trait ContextStrategy: Send + Sync {
    /// Strategy name for logging.
    fn name(&self) -> &'static str;

    /// Builds this strategy's contribution to the context.
    async fn build_context(
        &self,
        stores: &StoreSet,
        request: &ContextRequest,
    ) -> Result<ContextSection, anyhow::Error>;
}
