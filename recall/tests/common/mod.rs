//! Shared test utilities for engine integration tests.
//!
//! Deterministic provider mocks (embedding, salience scoring, fact
//! extraction) plus store seeding helpers. Stores come from recall-inmemory.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use recall_core::{
    AuthorRole, ConversationMessage, ConversationTurn, MemoryTrace, ProfileFacet, StoreSet,
    UserProfile,
};
use recall_providers::{EmbeddingService, FactExtractor, FactIncrement, SalienceScorer, SalienceScore};
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
        self.vectors.write().await.insert(text.to_string(), vector);
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

/// Scorer returning the same sub-scores for every user message.
#[allow(dead_code)]
pub struct FixedScorer(pub SalienceScore);

#[async_trait]
impl SalienceScorer for FixedScorer {
    async fn score(&self, _text: &str, _is_user: bool) -> Result<SalienceScore, anyhow::Error> {
        Ok(self.0)
    }
}

/// Scorer whose every call fails, for the salience-zero fallback.
#[allow(dead_code)]
pub struct BrokenScorer;

#[async_trait]
impl SalienceScorer for BrokenScorer {
    async fn score(&self, _text: &str, _is_user: bool) -> Result<SalienceScore, anyhow::Error> {
        anyhow::bail!("scoring service unavailable")
    }
}

/// Extractor returning a preconfigured increment regardless of input.
#[allow(dead_code)]
pub struct FixedExtractor(pub FactIncrement);

#[allow(dead_code)]
impl FixedExtractor {
    pub fn empty() -> Self {
        Self(FactIncrement::new())
    }

    pub fn single(facet: ProfileFacet, text: &str) -> Self {
        let mut increment = FactIncrement::new();
        increment.insert(facet, vec![text.to_string()]);
        Self(increment)
    }
}

#[async_trait]
impl FactExtractor for FixedExtractor {
    async fn extract(
        &self,
        _turns: &[ConversationTurn],
        _existing: &UserProfile,
    ) -> Result<FactIncrement, anyhow::Error> {
        Ok(self.0.clone())
    }
}

/// Extractor whose every call fails, for the empty-increment fallback.
#[allow(dead_code)]
pub struct BrokenExtractor;

#[async_trait]
impl FactExtractor for BrokenExtractor {
    async fn extract(
        &self,
        _turns: &[ConversationTurn],
        _existing: &UserProfile,
    ) -> Result<FactIncrement, anyhow::Error> {
        anyhow::bail!("extraction service unavailable")
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

/// An embedding service with no mappings, all texts resolve to the default.
#[allow(dead_code)]
pub fn default_embedding() -> Arc<MockEmbeddingService> {
    Arc::new(MockEmbeddingService::new())
}
