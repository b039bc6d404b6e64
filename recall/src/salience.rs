//! Salience scoring integration.
//!
//! Wraps the external scorer in a bounded timeout and applies the failure
//! policy: when the scorer is unavailable the salience is exactly 0.0, no
//! heuristic substitute, since mixing scoring methods would corrupt the
//! numeric scale frozen into the traces. Assistant messages are never sent
//! to the scorer; their salience is 0.0 by construction.

use std::time::Duration;

use recall_providers::SalienceScorer;
use tokio::time::timeout;
use tracing::warn;

/// Scores a message's emotional salience, combined to a single [0, 1]
/// value, with the documented fallback to exactly 0.0.
pub async fn score_salience(
    scorer: &dyn SalienceScorer,
    text: &str,
    is_user: bool,
    bound: Duration,
) -> f64 {
    if !is_user {
        return 0.0;
    }

    match timeout(bound, scorer.score(text, is_user)).await {
        Ok(Ok(score)) => score.combined(),
        Ok(Err(e)) => {
            warn!(error = %e, "salience scoring failed, falling back to 0.0");
            0.0
        }
        Err(_) => {
            warn!(timeout_secs = bound.as_secs(), "salience scoring timed out, falling back to 0.0");
            0.0
        }
    }
}
