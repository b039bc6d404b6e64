//! Context builder assembling per-turn context from strategies.
//!
//! Runs the configured strategies in sequence against the store seams and
//! folds their sections into the final [`Context`].

use chrono::Utc;
use recall_core::{ContextSection, StoreSet};
use recall_strategies::{ContextRequest, ContextStrategy};
use tracing::{debug, error, info, instrument};

use super::types::{Context, ContextMetadata};
use super::utils::estimate_tokens;
use crate::policy::MemoryPolicy;

/// Builder for per-turn context.
///
/// Strategies execute in the order they were added; each contributes one
/// section kind:
/// - Profile replaces any previous profile (last strategy wins)
/// - Recent lines append to recent_messages
/// - Retrieved lines append to retrieved
/// - Empty results are ignored
///
/// A strategy error aborts the build; strategies themselves degrade to
/// `Empty` for provider failures, so an error here means a store failure.
pub struct ContextBuilder {
    stores: StoreSet,
    strategies: Vec<Box<dyn ContextStrategy>>,
    policy: MemoryPolicy,
    user_id: Option<String>,
    current_turn: u32,
    current_session: Option<String>,
    query: Option<String>,
}

impl ContextBuilder {
    /// Creates a builder over the given stores.
    pub fn new(stores: StoreSet) -> Self {
        Self {
            stores,
            strategies: Vec::new(),
            policy: MemoryPolicy::NoRetention,
            user_id: None,
            current_turn: 0,
            current_session: None,
            query: None,
        }
    }

    /// Adds a context strategy.
    pub fn with_strategy(mut self, strategy: Box<dyn ContextStrategy>) -> Self {
        self.strategies.push(strategy);
        self
    }

    /// Records the policy the assembled context is attributed to.
    pub fn with_policy(mut self, policy: MemoryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Sets the user the context is built for.
    pub fn for_user(mut self, user_id: &str) -> Self {
        self.user_id = Some(user_id.to_string());
        self
    }

    /// Sets the turn being answered; history is read strictly before it.
    pub fn at_turn(mut self, current_turn: u32) -> Self {
        self.current_turn = current_turn;
        self
    }

    /// Sets the current session, excluded from retrieval candidates.
    pub fn for_session(mut self, session_id: &str) -> Self {
        self.current_session = Some(session_id.to_string());
        self
    }

    /// Sets the current user message, used as the retrieval query.
    pub fn with_query(mut self, query: &str) -> Self {
        self.query = Some(query.to_string());
        self
    }

    /// Runs all strategies and assembles the context.
    #[instrument(
        skip(self),
        fields(
            user_id = ?self.user_id,
            policy = %self.policy,
            current_turn = self.current_turn,
            strategy_count = self.strategies.len()
        )
    )]
    pub async fn build(&self) -> Result<Context, anyhow::Error> {
        debug!("starting context build");

        let user_id = self
            .user_id
            .clone()
            .ok_or_else(|| anyhow::anyhow!("context build requires a user id"))?;
        let request = ContextRequest {
            user_id: user_id.clone(),
            current_turn: self.current_turn,
            current_session: self.current_session.clone(),
            query: self.query.clone(),
        };

        let mut profile: Option<String> = None;
        let mut recent_messages = Vec::new();
        let mut retrieved = Vec::new();

        for (strategy_index, strategy) in self.strategies.iter().enumerate() {
            let strategy_name = strategy.name();
            info!(strategy_index, strategy_name, "executing context strategy");
            let section = strategy
                .build_context(&self.stores, &request)
                .await
                .map_err(|e| {
                    error!(strategy_index, strategy_name, error = %e, "context strategy failed");
                    e
                })?;
            apply_section(
                strategy_name,
                section,
                &mut profile,
                &mut recent_messages,
                &mut retrieved,
            );
        }

        let message_count = recent_messages.len() + retrieved.len();
        let total_tokens = profile
            .iter()
            .chain(recent_messages.iter())
            .chain(retrieved.iter())
            .map(|s| estimate_tokens(s))
            .sum();

        let metadata = ContextMetadata {
            user_id,
            total_tokens,
            message_count,
            created_at: Utc::now(),
        };

        debug!(
            total_tokens = metadata.total_tokens,
            message_count = metadata.message_count,
            "finished context build"
        );

        Ok(Context {
            policy: self.policy,
            profile,
            recent_messages,
            retrieved,
            metadata,
        })
    }
}

/// Folds one strategy section into the context accumulators.
fn apply_section(
    strategy_name: &str,
    section: ContextSection,
    profile: &mut Option<String>,
    recent_messages: &mut Vec<String>,
    retrieved: &mut Vec<String>,
) {
    match section {
        ContextSection::Profile(text) => {
            info!(strategy_name, profile_len = text.len(), "strategy returned profile");
            *profile = Some(text);
        }
        ContextSection::Recent(lines) => {
            info!(
                strategy_name,
                line_count = lines.len(),
                "strategy returned recent lines"
            );
            recent_messages.extend(lines);
        }
        ContextSection::Retrieved(lines) => {
            info!(
                strategy_name,
                line_count = lines.len(),
                "strategy returned retrieved lines"
            );
            retrieved.extend(lines);
        }
        ContextSection::Empty => {
            info!(strategy_name, "strategy returned empty");
        }
    }
}
