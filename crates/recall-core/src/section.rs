//! # Context Sections
//!
//! Result type returned by context strategies when building per-turn
//! context. Consumed by the ContextBuilder in the `recall` crate.

/// Result type for context strategies.
///
/// Each strategy returns one of:
/// - **Profile**: rendered user-profile facet listing
/// - **Recent**: verbatim recent turns, oldest first
/// - **Retrieved**: recalled historical traces with provenance and probability
/// - **Empty**: no content to add
#[derive(Debug, Clone)]
pub enum ContextSection {
    /// Rendered user profile (facet listing)
    Profile(String),
    /// Verbatim recent conversation lines (e.g. "User: hello", "Assistant: hi")
    Recent(Vec<String>),
    /// Recalled historical lines with session tag and recall probability
    Retrieved(Vec<String>),
    /// No content from this strategy
    Empty,
}

impl ContextSection {
    pub fn is_empty(&self) -> bool {
        match self {
            ContextSection::Profile(text) => text.is_empty(),
            ContextSection::Recent(lines) | ContextSection::Retrieved(lines) => lines.is_empty(),
            ContextSection::Empty => true,
        }
    }
}
