//! Engine configuration: documented defaults plus environment overrides.

use std::env;
use std::time::Duration;

/// Tier 2 recency window, in turns.
const DEFAULT_RECENCY_TURNS: usize = 7;
/// Tiers 3/4 verbatim window, in turns.
const DEFAULT_VERBATIM_TURNS: usize = 3;
/// Retrieval result cap.
const DEFAULT_RETRIEVAL_TOP_K: usize = 5;
/// Minimum recall probability for a trace to be surfaced.
const DEFAULT_RECALL_THRESHOLD: f64 = 0.60;
/// Bound on every external provider call.
const DEFAULT_PROVIDER_TIMEOUT_SECS: u64 = 30;

/// Engine configuration.
#[derive(Debug, Clone)]
pub struct RecallConfig {
    /// Turns kept verbatim by the bounded-recency tier
    pub recency_turns: usize,
    /// Turns kept verbatim by the profile tiers
    pub verbatim_turns: usize,
    /// Maximum traces returned by forgetting-curve retrieval
    pub retrieval_top_k: usize,
    /// Recall-probability threshold for retrieval
    pub recall_threshold: f64,
    /// Timeout applied to embedding/scoring/extraction calls
    pub provider_timeout: Duration,
}

impl Default for RecallConfig {
    fn default() -> Self {
        Self {
            recency_turns: DEFAULT_RECENCY_TURNS,
            verbatim_turns: DEFAULT_VERBATIM_TURNS,
            retrieval_top_k: DEFAULT_RETRIEVAL_TOP_K,
            recall_threshold: DEFAULT_RECALL_THRESHOLD,
            provider_timeout: Duration::from_secs(DEFAULT_PROVIDER_TIMEOUT_SECS),
        }
    }
}

impl RecallConfig {
    /// Loads the config from `RECALL_*` environment variables, falling back
    /// to the documented defaults for unset or unparsable values.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            recency_turns: parse_env("RECALL_RECENCY_TURNS", defaults.recency_turns),
            verbatim_turns: parse_env("RECALL_VERBATIM_TURNS", defaults.verbatim_turns),
            retrieval_top_k: parse_env("RECALL_RETRIEVAL_TOP_K", defaults.retrieval_top_k),
            recall_threshold: parse_env("RECALL_THRESHOLD", defaults.recall_threshold),
            provider_timeout: Duration::from_secs(parse_env(
                "RECALL_PROVIDER_TIMEOUT_SECS",
                DEFAULT_PROVIDER_TIMEOUT_SECS,
            )),
        }
    }
}

fn parse_env<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}
