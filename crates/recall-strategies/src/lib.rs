//! # Context Strategies
//!
//! This crate provides the strategies the tier router composes into per-turn
//! context:
//!
//! - `RecentTurnsStrategy`: the most recent conversation turns, verbatim
//! - `ProfileFacetsStrategy`: the consolidated user profile as a facet listing
//! - `ForgettingCurveStrategy`: dynamic retrieval over memory traces using
//!   the forgetting-curve model (similarity, salience, time decay), with
//!   post-recall consolidation updates
//!
//! ## Logging
//!
//! Strategies emit `tracing` debug logs so memory behavior can be inspected
//! in production: the retrieval path taken, candidate/selection counts, and
//! degradation events (missing profile, embedding failure, empty trace pool).

mod profile_facets;
mod recent_turns;
mod retrieval;
mod strategy;
mod utils;

pub use profile_facets::ProfileFacetsStrategy;
pub use recent_turns::RecentTurnsStrategy;
pub use retrieval::{ForgettingCurveStrategy, RecalledTrace};
pub use strategy::{ContextRequest, ContextStrategy};
pub use utils::cosine_similarity;
