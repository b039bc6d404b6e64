//! # Store Traits
//!
//! Storage seams for the engine: conversation history, memory traces, and
//! user profiles. Implemented by storage backends (in-memory for tests and
//! development; a persistent backend slots in behind the same traits).

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::profile::{ProfileIncrement, UserProfile};
use crate::trace::MemoryTrace;
use crate::types::ConversationMessage;

/// Append-only conversation history, ordered per user.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Appends a message to the owning user's history.
    async fn append(&self, message: ConversationMessage) -> Result<(), anyhow::Error>;

    /// Looks up a single message by id.
    async fn get_message(&self, id: Uuid) -> Result<Option<ConversationMessage>, anyhow::Error>;

    /// Returns the user's messages ordered by turn index then creation time,
    /// optionally bounded to turns strictly before `before_turn`.
    async fn messages_before(
        &self,
        user_id: &str,
        before_turn: Option<u32>,
    ) -> Result<Vec<ConversationMessage>, anyhow::Error>;

    /// Returns the ordered messages of one session.
    async fn session_messages(
        &self,
        user_id: &str,
        session_id: &str,
    ) -> Result<Vec<ConversationMessage>, anyhow::Error>;
}

/// Long-horizon memory trace storage.
#[async_trait]
pub trait TraceStore: Send + Sync {
    /// Inserts or replaces a trace, keyed by message id.
    async fn put(&self, trace: MemoryTrace) -> Result<(), anyhow::Error>;

    /// Looks up a trace by its message id.
    async fn get(&self, message_id: Uuid) -> Result<Option<MemoryTrace>, anyhow::Error>;

    /// Returns the user's candidate traces, optionally excluding one session
    /// (the current one never competes as a retrieval candidate).
    async fn candidates_for(
        &self,
        user_id: &str,
        exclude_session: Option<&str>,
    ) -> Result<Vec<MemoryTrace>, anyhow::Error>;

    /// Records a successful recall with an optimistic compare-and-update.
    ///
    /// Writes `new_g`, increments `recall_count`, and stamps `last_recall_at`
    /// only when the stored coefficient still equals `expected_g`. Returns
    /// false on conflict so the caller can re-read and retry; concurrent
    /// recalls can therefore never lose a consolidation increment.
    async fn record_recall(
        &self,
        message_id: Uuid,
        expected_g: f64,
        new_g: f64,
        recalled_at: DateTime<Utc>,
    ) -> Result<bool, anyhow::Error>;
}

/// User-profile storage with the consolidated-sessions idempotency set.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Loads a user's profile; None when no consolidation has run yet.
    async fn load(&self, user_id: &str) -> Result<Option<UserProfile>, anyhow::Error>;

    /// Applies a whole profile increment in one call. There are no partial
    /// profile writes: the increment lands atomically or not at all.
    async fn append_facts(
        &self,
        user_id: &str,
        increment: &ProfileIncrement,
    ) -> Result<(), anyhow::Error>;

    /// True when the session has already been consolidated for this user.
    async fn is_consolidated(&self, user_id: &str, session_id: &str)
        -> Result<bool, anyhow::Error>;

    /// Marks a session consolidated. Called after all consolidation writes.
    async fn mark_consolidated(
        &self,
        user_id: &str,
        session_id: &str,
    ) -> Result<(), anyhow::Error>;
}

/// The three store seams bundled for strategies and the engine.
#[derive(Clone)]
pub struct StoreSet {
    pub history: Arc<dyn HistoryStore>,
    pub traces: Arc<dyn TraceStore>,
    pub profiles: Arc<dyn ProfileStore>,
}

impl StoreSet {
    pub fn new(
        history: Arc<dyn HistoryStore>,
        traces: Arc<dyn TraceStore>,
        profiles: Arc<dyn ProfileStore>,
    ) -> Self {
        Self {
            history,
            traces,
            profiles,
        }
    }
}
