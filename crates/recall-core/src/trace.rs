//! # Memory Traces
//!
//! Per-message long-horizon record: the embedding, the frozen emotional
//! salience, and the forgetting-curve state (consolidation coefficient,
//! recall statistics).
//!
//! A trace references its message (the history store owns the message) and
//! owns its embedding. `emotional_salience` is set once at creation and is
//! immutable; `consolidation_g` is monotonically non-decreasing and only
//! moves through the store's compare-and-update recall path.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One historical message selected for long-horizon storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryTrace {
    /// Owning reference to the message; the message itself lives in history
    pub message_id: Uuid,
    /// User the trace belongs to
    pub user_id: String,
    /// Session (task) the message came from; rendered as the provenance tag
    pub session_id: String,
    /// Fixed-length embedding vector, owned by the trace
    pub embedding: Vec<f32>,
    /// Frozen emotional salience in [0, 1], set once at creation
    pub emotional_salience: f64,
    /// Consolidation coefficient; resistance to decay, never decreases
    pub consolidation_g: f64,
    /// Number of successful recalls
    pub recall_count: u32,
    /// When the trace was last recalled; None until first recall
    pub last_recall_at: Option<DateTime<Utc>>,
    /// When the trace was created (consolidation time)
    pub created_at: DateTime<Utc>,
}

impl MemoryTrace {
    /// Creates a fresh trace. `consolidation_g` is the initial coefficient
    /// computed by the forgetting-curve model from the salience.
    pub fn new(
        message_id: Uuid,
        user_id: impl Into<String>,
        session_id: impl Into<String>,
        embedding: Vec<f32>,
        emotional_salience: f64,
        consolidation_g: f64,
    ) -> Self {
        Self {
            message_id,
            user_id: user_id.into(),
            session_id: session_id.into(),
            embedding,
            emotional_salience: emotional_salience.clamp(0.0, 1.0),
            consolidation_g,
            recall_count: 0,
            last_recall_at: None,
            created_at: Utc::now(),
        }
    }

    /// The timestamp decay is measured from: the last recall, or creation
    /// if the trace has never been recalled.
    pub fn decay_anchor(&self) -> DateTime<Utc> {
        self.last_recall_at.unwrap_or(self.created_at)
    }
}
