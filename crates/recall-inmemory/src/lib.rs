//! # In-Memory Stores
//!
//! In-memory implementations of the `recall-core` store traits: history,
//! traces, and profiles. Data is lost on restart; intended for tests,
//! prototyping, and development. A persistent backend implements the same
//! traits.
//!
//! ## Thread Safety
//!
//! All three stores use `Arc<RwLock<_>>` for safe concurrent access. The
//! trace store's `record_recall` performs its compare-and-update under the
//! write lock, so a conflicting concurrent update is reported to the caller
//! rather than silently overwritten.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

use recall_core::{
    ConversationMessage, HistoryStore, MemoryTrace, ProfileIncrement, ProfileStore, StoreSet,
    TraceStore, UserProfile,
};

/// Builds a [`StoreSet`] backed entirely by fresh in-memory stores.
pub fn in_memory_stores() -> StoreSet {
    StoreSet::new(
        Arc::new(InMemoryHistoryStore::new()),
        Arc::new(InMemoryTraceStore::new()),
        Arc::new(InMemoryProfileStore::new()),
    )
}

/// Append-only in-memory conversation history, keyed by user.
#[derive(Debug, Clone, Default)]
pub struct InMemoryHistoryStore {
    messages: Arc<RwLock<HashMap<String, Vec<ConversationMessage>>>>,
}

impl InMemoryHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored messages for a user.
    pub async fn len(&self, user_id: &str) -> usize {
        let messages = self.messages.read().await;
        messages.get(user_id).map(Vec::len).unwrap_or(0)
    }
}

#[async_trait]
impl HistoryStore for InMemoryHistoryStore {
    async fn append(&self, message: ConversationMessage) -> Result<(), anyhow::Error> {
        debug!(
            id = %message.id,
            user_id = %message.user_id,
            session_id = %message.session_id,
            turn_index = message.turn_index,
            "Appending message to in-memory history"
        );
        let mut messages = self.messages.write().await;
        let user_messages = messages.entry(message.user_id.clone()).or_default();
        user_messages.push(message);
        user_messages.sort_by(|a, b| {
            a.turn_index
                .cmp(&b.turn_index)
                .then(a.created_at.cmp(&b.created_at))
        });
        Ok(())
    }

    async fn get_message(&self, id: Uuid) -> Result<Option<ConversationMessage>, anyhow::Error> {
        let messages = self.messages.read().await;
        Ok(messages
            .values()
            .flatten()
            .find(|m| m.id == id)
            .cloned())
    }

    async fn messages_before(
        &self,
        user_id: &str,
        before_turn: Option<u32>,
    ) -> Result<Vec<ConversationMessage>, anyhow::Error> {
        let messages = self.messages.read().await;
        let results: Vec<ConversationMessage> = messages
            .get(user_id)
            .map(|msgs| {
                msgs.iter()
                    .filter(|m| before_turn.map_or(true, |bound| m.turn_index < bound))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        debug!(
            user_id = %user_id,
            before_turn = ?before_turn,
            count = results.len(),
            "In-memory history messages_before returned"
        );
        Ok(results)
    }

    async fn session_messages(
        &self,
        user_id: &str,
        session_id: &str,
    ) -> Result<Vec<ConversationMessage>, anyhow::Error> {
        let messages = self.messages.read().await;
        Ok(messages
            .get(user_id)
            .map(|msgs| {
                msgs.iter()
                    .filter(|m| m.session_id == session_id)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }
}

/// In-memory memory-trace store, keyed by message id.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTraceStore {
    traces: Arc<RwLock<HashMap<Uuid, MemoryTrace>>>,
}

impl InMemoryTraceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.traces.read().await.len()
    }
}

#[async_trait]
impl TraceStore for InMemoryTraceStore {
    async fn put(&self, trace: MemoryTrace) -> Result<(), anyhow::Error> {
        debug!(
            message_id = %trace.message_id,
            user_id = %trace.user_id,
            session_id = %trace.session_id,
            salience = trace.emotional_salience,
            consolidation_g = trace.consolidation_g,
            "Writing trace to in-memory store"
        );
        let mut traces = self.traces.write().await;
        traces.insert(trace.message_id, trace);
        Ok(())
    }

    async fn get(&self, message_id: Uuid) -> Result<Option<MemoryTrace>, anyhow::Error> {
        let traces = self.traces.read().await;
        Ok(traces.get(&message_id).cloned())
    }

    async fn candidates_for(
        &self,
        user_id: &str,
        exclude_session: Option<&str>,
    ) -> Result<Vec<MemoryTrace>, anyhow::Error> {
        let traces = self.traces.read().await;
        let results: Vec<MemoryTrace> = traces
            .values()
            .filter(|t| t.user_id == user_id)
            .filter(|t| exclude_session.map_or(true, |session| t.session_id != session))
            .cloned()
            .collect();
        debug!(
            user_id = %user_id,
            exclude_session = ?exclude_session,
            count = results.len(),
            "In-memory trace candidates returned"
        );
        Ok(results)
    }

    async fn record_recall(
        &self,
        message_id: Uuid,
        expected_g: f64,
        new_g: f64,
        recalled_at: DateTime<Utc>,
    ) -> Result<bool, anyhow::Error> {
        let mut traces = self.traces.write().await;
        let trace = match traces.get_mut(&message_id) {
            Some(trace) => trace,
            None => anyhow::bail!("trace {message_id} not found"),
        };

        // Compare-and-update: reject when another recall got there first.
        if trace.consolidation_g.to_bits() != expected_g.to_bits() {
            debug!(
                message_id = %message_id,
                expected_g,
                current_g = trace.consolidation_g,
                "record_recall conflict"
            );
            return Ok(false);
        }

        trace.consolidation_g = new_g;
        trace.recall_count += 1;
        trace.last_recall_at = Some(recalled_at);
        Ok(true)
    }
}

/// In-memory profile store with the consolidated-sessions set per user.
#[derive(Debug, Clone, Default)]
pub struct InMemoryProfileStore {
    profiles: Arc<RwLock<HashMap<String, UserProfile>>>,
    consolidated: Arc<RwLock<HashMap<String, HashSet<String>>>>,
}

impl InMemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProfileStore for InMemoryProfileStore {
    async fn load(&self, user_id: &str) -> Result<Option<UserProfile>, anyhow::Error> {
        let profiles = self.profiles.read().await;
        Ok(profiles.get(user_id).cloned())
    }

    async fn append_facts(
        &self,
        user_id: &str,
        increment: &ProfileIncrement,
    ) -> Result<(), anyhow::Error> {
        let mut profiles = self.profiles.write().await;
        let profile = profiles.entry(user_id.to_string()).or_default();
        let added = profile.apply_increment(increment);
        debug!(user_id = %user_id, added, "Applied profile increment");
        Ok(())
    }

    async fn is_consolidated(
        &self,
        user_id: &str,
        session_id: &str,
    ) -> Result<bool, anyhow::Error> {
        let consolidated = self.consolidated.read().await;
        Ok(consolidated
            .get(user_id)
            .map_or(false, |sessions| sessions.contains(session_id)))
    }

    async fn mark_consolidated(
        &self,
        user_id: &str,
        session_id: &str,
    ) -> Result<(), anyhow::Error> {
        let mut consolidated = self.consolidated.write().await;
        consolidated
            .entry(user_id.to_string())
            .or_default()
            .insert(session_id.to_string());
        Ok(())
    }
}
