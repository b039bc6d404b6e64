//! The tiered recall engine.
//!
//! Maps each memory policy to its strategy stack and assembles the per-turn
//! context through the [`ContextBuilder`].

use std::sync::Arc;

use recall_core::{segment, StoreSet};
use recall_providers::EmbeddingService;
use recall_strategies::{ForgettingCurveStrategy, ProfileFacetsStrategy, RecentTurnsStrategy};
use tracing::{info, instrument};

use crate::config::RecallConfig;
use crate::context::{Context, ContextBuilder, ContextMetadata};
use crate::policy::MemoryPolicy;

/// Aggregate counts over one user's stored history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryStats {
    pub total_messages: usize,
    pub total_turns: usize,
    pub user_messages: usize,
    pub assistant_messages: usize,
}

/// Per-turn context assembly under the four memory policies.
///
/// The strategy stack per policy:
/// - `NoRetention`: none, the context is empty by construction
/// - `BoundedRecency`: recent turns (window N)
/// - `ProfileRecency`: profile facets + recent turns (window M)
/// - `HybridRetrieval`: profile facets + recent turns (window M) +
///   forgetting-curve retrieval over memory traces
///
/// Missing sources degrade the context rather than failing it: a user
/// without a profile under `ProfileRecency` gets recency only, and an
/// empty trace pool under `HybridRetrieval` yields no retrieved section.
pub struct RecallEngine {
    stores: StoreSet,
    embedding: Arc<dyn EmbeddingService>,
    config: RecallConfig,
}

impl RecallEngine {
    pub fn new(
        stores: StoreSet,
        embedding: Arc<dyn EmbeddingService>,
        config: RecallConfig,
    ) -> Self {
        Self {
            stores,
            embedding,
            config,
        }
    }

    /// Assembles the context for the turn about to be answered.
    ///
    /// `current_turn` is the index of the pending turn; history is read
    /// strictly before it, so the unanswered user message never appears in
    /// its own context. `query` is that message's text, used as the
    /// retrieval query under `HybridRetrieval`.
    #[instrument(skip(self, query), fields(policy = %policy))]
    pub async fn get_context(
        &self,
        user_id: &str,
        policy: MemoryPolicy,
        current_turn: u32,
        current_session: Option<&str>,
        query: Option<&str>,
    ) -> Result<Context, anyhow::Error> {
        if policy == MemoryPolicy::NoRetention {
            info!(user_id, "no-retention policy, returning empty context");
            return Ok(empty_context(user_id, policy));
        }

        let mut builder = ContextBuilder::new(self.stores.clone())
            .with_policy(policy)
            .for_user(user_id)
            .at_turn(current_turn);
        if let Some(session_id) = current_session {
            builder = builder.for_session(session_id);
        }
        if let Some(query) = query {
            builder = builder.with_query(query);
        }

        builder = match policy {
            MemoryPolicy::NoRetention => unreachable!("handled above"),
            MemoryPolicy::BoundedRecency => builder.with_strategy(Box::new(
                RecentTurnsStrategy::new(self.config.recency_turns),
            )),
            MemoryPolicy::ProfileRecency => builder
                .with_strategy(Box::new(ProfileFacetsStrategy::new()))
                .with_strategy(Box::new(RecentTurnsStrategy::new(
                    self.config.verbatim_turns,
                ))),
            MemoryPolicy::HybridRetrieval => builder
                .with_strategy(Box::new(ProfileFacetsStrategy::new()))
                .with_strategy(Box::new(RecentTurnsStrategy::new(
                    self.config.verbatim_turns,
                )))
                .with_strategy(Box::new(ForgettingCurveStrategy::new(
                    self.config.retrieval_top_k,
                    self.config.recall_threshold,
                    Arc::clone(&self.embedding),
                ))),
        };

        builder.build().await
    }

    /// Aggregate counts over the user's full stored history.
    pub async fn memory_stats(&self, user_id: &str) -> Result<MemoryStats, anyhow::Error> {
        let messages = self.stores.history.messages_before(user_id, None).await?;
        let user_messages = messages.iter().filter(|m| m.is_user()).count();
        let total_turns = segment(&messages).len();
        Ok(MemoryStats {
            total_messages: messages.len(),
            total_turns,
            user_messages,
            assistant_messages: messages.len() - user_messages,
        })
    }
}

fn empty_context(user_id: &str, policy: MemoryPolicy) -> Context {
    Context {
        policy,
        profile: None,
        recent_messages: Vec::new(),
        retrieved: Vec::new(),
        metadata: ContextMetadata {
            user_id: user_id.to_string(),
            total_tokens: 0,
            message_count: 0,
            created_at: chrono::Utc::now(),
        },
    }
}
