//! Session-close consolidation.
//!
//! The transaction that turns a closed session's raw conversation into
//! long-term memory: one profile increment (facet facts tagged with the
//! session id) and zero or more complete memory traces (embedding +
//! frozen salience + initial consolidation coefficient).
//!
//! Guarantees:
//! - serialized per user (per-user async lock) and idempotent per session
//!   (consolidated-sessions set; a second run is a detected no-op);
//! - a trace is only ever persisted complete; embedding failure excludes
//!   the affected messages instead of storing a partial record;
//! - the session is marked consolidated only after all writes, so a re-run
//!   after a mid-flight failure converges (facts dedupe by exact text,
//!   traces upsert by message id).

use std::collections::HashMap;
use std::sync::Arc;

use recall_core::{
    segment, ConversationMessage, MemoryTrace, ProfileFact, ProfileIncrement, StoreSet,
};
use recall_curve::initial_consolidation;
use recall_providers::{EmbeddingService, FactExtractor, SalienceScorer};
use tokio::sync::Mutex;
use tokio::time::timeout;
use tracing::{info, warn};

use crate::config::RecallConfig;
use crate::salience::score_salience;

/// Result of one consolidation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsolidationOutcome {
    /// The session was already consolidated; the call was a no-op.
    AlreadyConsolidated,
    /// The session had no messages; nothing to consolidate.
    NoMessages,
    /// Consolidation ran.
    Consolidated {
        /// Facts extracted into the profile increment
        facts_extracted: usize,
        /// Traces written to the trace store
        traces_created: usize,
        /// Messages excluded from the trace store (embedding unavailable)
        messages_skipped: usize,
    },
}

/// Runs the once-per-session-close consolidation transaction.
pub struct ConsolidationService {
    stores: StoreSet,
    extractor: Arc<dyn FactExtractor>,
    scorer: Arc<dyn SalienceScorer>,
    embedding: Arc<dyn EmbeddingService>,
    config: RecallConfig,
    user_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl ConsolidationService {
    pub fn new(
        stores: StoreSet,
        extractor: Arc<dyn FactExtractor>,
        scorer: Arc<dyn SalienceScorer>,
        embedding: Arc<dyn EmbeddingService>,
        config: RecallConfig,
    ) -> Self {
        Self {
            stores,
            extractor,
            scorer,
            embedding,
            config,
            user_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Consolidates one closed session for one user.
    ///
    /// Safe to call more than once for the same session id: the second call
    /// is a no-op, not an error.
    pub async fn consolidate_session(
        &self,
        user_id: &str,
        session_id: &str,
    ) -> Result<ConsolidationOutcome, anyhow::Error> {
        let lock = self.user_lock(user_id).await;
        let _guard = lock.lock().await;

        if self
            .stores
            .profiles
            .is_consolidated(user_id, session_id)
            .await?
        {
            info!(user_id, session_id, "session already consolidated, skipping");
            return Ok(ConsolidationOutcome::AlreadyConsolidated);
        }

        let messages = self
            .stores
            .history
            .session_messages(user_id, session_id)
            .await?;
        if messages.is_empty() {
            info!(user_id, session_id, "no messages in session, nothing to consolidate");
            return Ok(ConsolidationOutcome::NoMessages);
        }

        let increment = self.extract_increment(user_id, session_id, &messages).await?;
        let facts_extracted = increment.values().map(Vec::len).sum();

        let (traces, messages_skipped) = self.build_traces(user_id, session_id, &messages).await;

        // Writes, then the idempotency mark last.
        if !increment.is_empty() {
            self.stores.profiles.append_facts(user_id, &increment).await?;
        }
        let traces_created = traces.len();
        for trace in traces {
            self.stores.traces.put(trace).await?;
        }
        self.stores
            .profiles
            .mark_consolidated(user_id, session_id)
            .await?;

        info!(
            user_id,
            session_id,
            facts_extracted,
            traces_created,
            messages_skipped,
            "session consolidated"
        );

        Ok(ConsolidationOutcome::Consolidated {
            facts_extracted,
            traces_created,
            messages_skipped,
        })
    }

    /// Extracts the profile increment and tags every fact with the session.
    /// Extraction failure or timeout yields an empty increment.
    async fn extract_increment(
        &self,
        user_id: &str,
        session_id: &str,
        messages: &[ConversationMessage],
    ) -> Result<ProfileIncrement, anyhow::Error> {
        let turns = segment(messages);
        let existing = self
            .stores
            .profiles
            .load(user_id)
            .await?
            .unwrap_or_default();

        let raw = match timeout(
            self.config.provider_timeout,
            self.extractor.extract(&turns, &existing),
        )
        .await
        {
            Ok(Ok(increment)) => increment,
            Ok(Err(e)) => {
                warn!(user_id, session_id, error = %e, "fact extraction failed, profile unchanged");
                Default::default()
            }
            Err(_) => {
                warn!(user_id, session_id, "fact extraction timed out, profile unchanged");
                Default::default()
            }
        };

        let mut increment = ProfileIncrement::new();
        for (facet, facts) in raw {
            let tagged: Vec<ProfileFact> = facts
                .into_iter()
                .map(|text| ProfileFact::new(text, session_id))
                .collect();
            if !tagged.is_empty() {
                increment.insert(facet, tagged);
            }
        }
        Ok(increment)
    }

    /// Scores and embeds the session's messages and builds complete traces.
    /// Embedding failure excludes the messages rather than storing partial
    /// records. Returns (traces, skipped count).
    async fn build_traces(
        &self,
        user_id: &str,
        session_id: &str,
        messages: &[ConversationMessage],
    ) -> (Vec<MemoryTrace>, usize) {
        let mut saliences = Vec::with_capacity(messages.len());
        for message in messages {
            let salience = score_salience(
                self.scorer.as_ref(),
                &message.text,
                message.is_user(),
                self.config.provider_timeout,
            )
            .await;
            saliences.push(salience);
        }

        let texts: Vec<String> = messages.iter().map(|m| m.text.clone()).collect();
        let embeddings = match timeout(
            self.config.provider_timeout,
            self.embedding.embed_batch(&texts),
        )
        .await
        {
            Ok(Ok(embeddings)) if embeddings.len() == messages.len() => embeddings,
            Ok(Ok(embeddings)) => {
                warn!(
                    user_id,
                    session_id,
                    expected = messages.len(),
                    got = embeddings.len(),
                    "embedding batch size mismatch, excluding session from traces"
                );
                return (Vec::new(), messages.len());
            }
            Ok(Err(e)) => {
                warn!(user_id, session_id, error = %e, "embedding failed, excluding session from traces");
                return (Vec::new(), messages.len());
            }
            Err(_) => {
                warn!(user_id, session_id, "embedding timed out, excluding session from traces");
                return (Vec::new(), messages.len());
            }
        };

        let mut traces = Vec::with_capacity(messages.len());
        let mut skipped = 0;
        for ((message, embedding), salience) in
            messages.iter().zip(embeddings).zip(saliences)
        {
            if embedding.is_empty() {
                skipped += 1;
                continue;
            }
            traces.push(MemoryTrace::new(
                message.id,
                user_id,
                session_id,
                embedding,
                salience,
                initial_consolidation(salience),
            ));
        }
        (traces, skipped)
    }

    async fn user_lock(&self, user_id: &str) -> Arc<Mutex<()>> {
        let mut locks = self.user_locks.lock().await;
        locks
            .entry(user_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}
