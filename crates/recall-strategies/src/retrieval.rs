//! Forgetting-curve retrieval strategy (the retrieval selector).
//!
//! Scores every candidate trace with the forgetting-curve model: cosine
//! similarity to the query modulated by the trace's frozen salience, decayed
//! by elapsed time against the trace's current consolidation coefficient.
//! Candidates below the probability threshold are discarded; the survivors
//! are ranked and truncated, and each selected trace gets its post-recall
//! consolidation update persisted through the store's compare-and-update.

use std::cmp::Ordering;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use recall_core::{ContextSection, MemoryTrace, StoreSet};
use recall_curve::{effective_relevance, recall_probability, update_consolidation};
use recall_providers::EmbeddingService;
use tracing::{debug, warn};
use uuid::Uuid;

use super::strategy::{ContextRequest, ContextStrategy};
use super::utils::cosine_similarity;

/// Attempts before a conflicting consolidation update is abandoned. The
/// read path must keep working even under heavy contention.
const RECALL_UPDATE_RETRIES: usize = 3;

/// One selected trace with its scores at selection time.
#[derive(Debug, Clone)]
pub struct RecalledTrace {
    pub message_id: Uuid,
    /// Originating session, rendered as the provenance tag
    pub session_id: String,
    /// The recalled message text
    pub text: String,
    /// Raw cosine similarity to the query
    pub similarity: f64,
    /// Recall probability at selection time
    pub probability: f64,
}

impl RecalledTrace {
    /// Renders the trace with its session tag and recall probability,
    /// e.g. `[session-2] (p=0.73) I finally told my advisor`.
    pub fn render(&self) -> String {
        format!("[{}] (p={:.2}) {}", self.session_id, self.probability, self.text)
    }
}

/// Strategy performing dynamic retrieval over the user's memory traces.
pub struct ForgettingCurveStrategy {
    top_k: usize,
    threshold: f64,
    embedding: Arc<dyn EmbeddingService>,
}

impl ForgettingCurveStrategy {
    /// Creates a new strategy.
    ///
    /// # Arguments
    ///
    /// * `top_k` - Maximum number of traces to recall.
    /// * `threshold` - Minimum recall probability; lower candidates are discarded.
    /// * `embedding` - Service generating the query embedding.
    pub fn new(top_k: usize, threshold: f64, embedding: Arc<dyn EmbeddingService>) -> Self {
        Self {
            top_k,
            threshold,
            embedding,
        }
    }

    /// Runs selection against a precomputed query embedding.
    ///
    /// Deterministic with respect to its output for fixed store state; the
    /// consolidation updates on selected traces are the deliberate side
    /// effect of a successful recall.
    pub async fn select(
        &self,
        stores: &StoreSet,
        user_id: &str,
        exclude_session: Option<&str>,
        query_embedding: &[f32],
        now: DateTime<Utc>,
    ) -> Result<Vec<RecalledTrace>, anyhow::Error> {
        let candidates = stores.traces.candidates_for(user_id, exclude_session).await?;

        if candidates.is_empty() {
            debug!(user_id = %user_id, "ForgettingCurveStrategy: empty trace pool");
            return Ok(Vec::new());
        }

        let mut scored: Vec<(RecalledTrace, MemoryTrace)> = Vec::new();
        for trace in candidates {
            // A trace whose message vanished from history is skipped, not fatal.
            let message = match stores.history.get_message(trace.message_id).await? {
                Some(message) => message,
                None => {
                    warn!(
                        message_id = %trace.message_id,
                        "ForgettingCurveStrategy: trace references missing message, skipping"
                    );
                    continue;
                }
            };

            let similarity = cosine_similarity(query_embedding, &trace.embedding);
            let relevance = effective_relevance(similarity, trace.emotional_salience);
            let elapsed_days = elapsed_days(trace.decay_anchor(), now);
            let probability =
                recall_probability(relevance, elapsed_days, trace.consolidation_g);

            if probability < self.threshold {
                continue;
            }

            scored.push((
                RecalledTrace {
                    message_id: trace.message_id,
                    session_id: trace.session_id.clone(),
                    text: message.text,
                    similarity,
                    probability,
                },
                trace,
            ));
        }

        // Rank: probability desc, ties by raw similarity desc, then newer trace.
        scored.sort_by(|(a, ta), (b, tb)| {
            b.probability
                .partial_cmp(&a.probability)
                .unwrap_or(Ordering::Equal)
                .then(
                    b.similarity
                        .partial_cmp(&a.similarity)
                        .unwrap_or(Ordering::Equal),
                )
                .then(tb.created_at.cmp(&ta.created_at))
        });
        scored.truncate(self.top_k);

        for (_, trace) in &scored {
            self.reinforce(stores, trace, now).await?;
        }

        debug!(
            user_id = %user_id,
            selected = scored.len(),
            top_k = self.top_k,
            threshold = self.threshold,
            "ForgettingCurveStrategy: selection complete"
        );

        Ok(scored.into_iter().map(|(recalled, _)| recalled).collect())
    }

    /// Persists the post-recall consolidation update for one selected trace.
    ///
    /// Optimistic loop: compute `g_new` from the trace's current coefficient
    /// and retry from a fresh read when a concurrent recall won the race.
    async fn reinforce(
        &self,
        stores: &StoreSet,
        trace: &MemoryTrace,
        now: DateTime<Utc>,
    ) -> Result<(), anyhow::Error> {
        let mut current = trace.clone();

        for _ in 0..RECALL_UPDATE_RETRIES {
            let elapsed = elapsed_days(current.decay_anchor(), now);
            let new_g = update_consolidation(
                current.consolidation_g,
                elapsed,
                current.emotional_salience,
            );

            if stores
                .traces
                .record_recall(current.message_id, current.consolidation_g, new_g, now)
                .await?
            {
                return Ok(());
            }

            current = match stores.traces.get(current.message_id).await? {
                Some(trace) => trace,
                None => return Ok(()),
            };
        }

        warn!(
            message_id = %trace.message_id,
            "ForgettingCurveStrategy: consolidation update abandoned after conflicts"
        );
        Ok(())
    }
}

fn elapsed_days(anchor: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    let seconds = (now - anchor).num_seconds();
    (seconds.max(0) as f64) / 86_400.0
}

#[async_trait]
impl ContextStrategy for ForgettingCurveStrategy {
    fn name(&self) -> &'static str {
        "forgetting_curve"
    }

    /// Embeds the query and runs selection. Embedding failure or an absent
    /// query degrades to Empty; retrieval never fails the context build.
    async fn build_context(
        &self,
        stores: &StoreSet,
        request: &ContextRequest,
    ) -> Result<ContextSection, anyhow::Error> {
        let query = match &request.query {
            Some(q) if !q.trim().is_empty() => q.trim(),
            _ => {
                debug!("ForgettingCurveStrategy: no query text, skipping retrieval");
                return Ok(ContextSection::Empty);
            }
        };

        let query_embedding = match self.embedding.embed(query).await {
            Ok(embedding) => embedding,
            Err(e) => {
                warn!(error = %e, "ForgettingCurveStrategy: query embedding failed, skipping retrieval");
                return Ok(ContextSection::Empty);
            }
        };

        let selected = self
            .select(
                stores,
                &request.user_id,
                request.current_session.as_deref(),
                &query_embedding,
                Utc::now(),
            )
            .await?;

        if selected.is_empty() {
            return Ok(ContextSection::Empty);
        }

        Ok(ContextSection::Retrieved(
            selected.iter().map(RecalledTrace::render).collect(),
        ))
    }
}
