//! Recent turns context strategy.
//!
//! Returns the most recent conversation turns verbatim, oldest first. Turns
//! beyond the window are excluded outright, never summarized.

use async_trait::async_trait;
use recall_core::{segment, ContextSection, StoreSet};
use tracing::debug;

use super::strategy::{ContextRequest, ContextStrategy};
use super::utils::format_turn;

/// Strategy returning the most recent `limit` turns verbatim.
#[derive(Debug, Clone)]
pub struct RecentTurnsStrategy {
    limit: usize,
}

impl RecentTurnsStrategy {
    /// Creates a new RecentTurnsStrategy keeping at most `limit` turns.
    pub fn new(limit: usize) -> Self {
        Self { limit }
    }
}

#[async_trait]
impl ContextStrategy for RecentTurnsStrategy {
    fn name(&self) -> &'static str {
        "recent_turns"
    }

    /// Reads the user's history strictly before the current turn, segments
    /// it, and keeps the trailing `limit` turns in chronological order.
    async fn build_context(
        &self,
        stores: &StoreSet,
        request: &ContextRequest,
    ) -> Result<ContextSection, anyhow::Error> {
        let messages = stores
            .history
            .messages_before(&request.user_id, Some(request.current_turn))
            .await?;

        if messages.is_empty() {
            debug!(user_id = %request.user_id, "RecentTurnsStrategy: no history, returning Empty");
            return Ok(ContextSection::Empty);
        }

        let turns = segment(&messages);
        let start = turns.len().saturating_sub(self.limit);
        let lines: Vec<String> = turns[start..].iter().flat_map(|t| format_turn(t)).collect();

        debug!(
            user_id = %request.user_id,
            turn_count = turns.len() - start,
            limit = self.limit,
            "RecentTurnsStrategy: built recent window"
        );

        if lines.is_empty() {
            Ok(ContextSection::Empty)
        } else {
            Ok(ContextSection::Recent(lines))
        }
    }
}
