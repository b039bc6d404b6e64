//! Memory policies (tiers) and the unknown-policy configuration error.
//!
//! A user's policy is fixed for the duration of an experiment; there are no
//! transitions between tiers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The four escalating memory policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MemoryPolicy {
    /// Tier 1: empty context regardless of history
    NoRetention,
    /// Tier 2: most recent N turns, verbatim
    BoundedRecency,
    /// Tier 3: user profile + recent M turns
    ProfileRecency,
    /// Tier 4: profile + recent turns + forgetting-curve retrieval
    HybridRetrieval,
}

impl MemoryPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            MemoryPolicy::NoRetention => "no_retention",
            MemoryPolicy::BoundedRecency => "bounded_recency",
            MemoryPolicy::ProfileRecency => "profile_recency",
            MemoryPolicy::HybridRetrieval => "hybrid_retrieval",
        }
    }
}

impl fmt::Display for MemoryPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An unrecognized policy name: a configuration error, fatal for the
/// request that carried it but never for the service.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown memory policy '{0}'")]
pub struct PolicyError(pub String);

impl FromStr for MemoryPolicy {
    type Err = PolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "no_retention" => Ok(MemoryPolicy::NoRetention),
            "bounded_recency" => Ok(MemoryPolicy::BoundedRecency),
            "profile_recency" => Ok(MemoryPolicy::ProfileRecency),
            "hybrid_retrieval" => Ok(MemoryPolicy::HybridRetrieval),
            other => Err(PolicyError(other.to_string())),
        }
    }
}
