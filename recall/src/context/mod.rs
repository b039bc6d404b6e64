//! Context assembly.
//!
//! The [`ContextBuilder`] runs configured strategies in order and folds
//! their sections into a [`Context`]; the context renders itself as the
//! labeled text block handed to the downstream model.

mod builder;
mod types;
mod utils;

pub use builder::ContextBuilder;
pub use types::{Context, ContextMetadata};
pub use utils::estimate_tokens;
