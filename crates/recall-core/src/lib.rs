//! # Recall Core
//!
//! Core types and traits for the tiered recall context engine.
//! Used by the `recall` crate and the `recall-strategies` crate.
//!
//! ## Modules
//!
//! - [`types`] - ConversationMessage, AuthorRole
//! - [`turns`] - ConversationTurn and turn segmentation
//! - [`profile`] - UserProfile, ProfileFacet, ProfileFact
//! - [`trace`] - MemoryTrace (long-horizon per-message record)
//! - [`store`] - HistoryStore / TraceStore / ProfileStore traits, StoreSet
//! - [`section`] - ContextSection (return type of context strategies)

pub mod profile;
pub mod section;
pub mod store;
pub mod trace;
pub mod turns;
pub mod types;

pub use profile::*;
pub use section::*;
pub use store::*;
pub use trace::*;
pub use turns::*;
pub use types::*;
