//! Shared test utilities for strategy integration tests.
//!
//! Provides a deterministic MockEmbeddingService and helpers for seeding
//! history and trace stores. Stores come from recall-inmemory.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use recall_core::{AuthorRole, ConversationMessage, MemoryTrace, StoreSet};
use recall_providers::EmbeddingService;
use tokio::sync::RwLock;

/// Mock embedding service returning preconfigured vectors by exact text.
/// Unknown texts get the default vector; a poisoned service always errors.
pub struct MockEmbeddingService {
    vectors: RwLock<HashMap<String, Vec<f32>>>,
    default: Vec<f32>,
    fail: bool,
}

#[allow(dead_code)]
impl MockEmbeddingService {
    pub fn new() -> Self {
        Self {
            vectors: RwLock::new(HashMap::new()),
            default: vec![1.0, 0.0, 0.0],
            fail: false,
        }
    }

    /// A service whose every call fails, for degradation tests.
    pub fn failing() -> Self {
        Self {
            vectors: RwLock::new(HashMap::new()),
            default: vec![],
            fail: true,
        }
    }

    pub async fn map(&self, text: &str, vector: Vec<f32>) {
        self.vectors
            .write()
            .await
            .insert(text.to_string(), vector);
    }
}

#[async_trait]
impl EmbeddingService for MockEmbeddingService {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, anyhow::Error> {
        if self.fail {
            anyhow::bail!("embedding service unavailable");
        }
        let vectors = self.vectors.read().await;
        Ok(vectors.get(text).cloned().unwrap_or_else(|| self.default.clone()))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, anyhow::Error> {
        if self.fail {
            anyhow::bail!("embedding service unavailable");
        }
        let vectors = self.vectors.read().await;
        Ok(texts
            .iter()
            .map(|t| vectors.get(t).cloned().unwrap_or_else(|| self.default.clone()))
            .collect())
    }
}

/// Fresh in-memory StoreSet.
pub fn stores() -> StoreSet {
    recall_inmemory::in_memory_stores()
}

/// Appends a user/assistant exchange at the given turn index.
#[allow(dead_code)]
pub async fn seed_turn(
    stores: &StoreSet,
    user_id: &str,
    session_id: &str,
    turn_index: u32,
    user_text: &str,
    assistant_text: &str,
) -> ConversationMessage {
    let user_msg =
        ConversationMessage::new(user_id, session_id, AuthorRole::User, user_text, turn_index);
    stores.history.append(user_msg.clone()).await.unwrap();
    stores
        .history
        .append(ConversationMessage::new(
            user_id,
            session_id,
            AuthorRole::Assistant,
            assistant_text,
            turn_index,
        ))
        .await
        .unwrap();
    user_msg
}

/// Seeds a user message plus its trace, returning the trace.
#[allow(dead_code)]
pub async fn seed_trace(
    stores: &StoreSet,
    user_id: &str,
    session_id: &str,
    turn_index: u32,
    text: &str,
    embedding: Vec<f32>,
    salience: f64,
) -> MemoryTrace {
    let message =
        ConversationMessage::new(user_id, session_id, AuthorRole::User, text, turn_index);
    stores.history.append(message.clone()).await.unwrap();

    let trace = MemoryTrace::new(
        message.id,
        user_id,
        session_id,
        embedding,
        salience,
        recall_curve::initial_consolidation(salience),
    );
    stores.traces.put(trace.clone()).await.unwrap();
    trace
}

/// Seeds a trace with explicit forgetting-curve state (for decay tests).
#[allow(dead_code)]
pub async fn seed_trace_with_state(stores: &StoreSet, trace: MemoryTrace, text: &str) {
    let message = ConversationMessage {
        id: trace.message_id,
        user_id: trace.user_id.clone(),
        session_id: trace.session_id.clone(),
        role: AuthorRole::User,
        text: text.to_string(),
        created_at: trace.created_at,
        turn_index: 0,
    };
    stores.history.append(message).await.unwrap();
    stores.traces.put(trace).await.unwrap();
}
