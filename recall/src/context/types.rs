//! Context and metadata types.
//!
//! The assembled per-turn context bundle and its formatting for model
//! consumption.

use chrono::{DateTime, Utc};

use crate::policy::MemoryPolicy;

/// Context assembled for one conversational turn.
///
/// Up to three sections, each present only when the active policy includes
/// it and the corresponding source had content:
///
/// - `profile`: rendered user-profile facet listing
/// - `recent_messages`: verbatim recent turns, oldest first
/// - `retrieved`: recalled historical lines with session tag and recall
///   probability
///
/// A degraded context (missing sections) is still valid; the guarantee is
/// that assembly always produces a bundle, never an error surfaced to the
/// conversation loop.
#[derive(Debug, Clone)]
pub struct Context {
    /// Policy that produced this context
    pub policy: MemoryPolicy,
    /// Rendered user profile, when the policy includes it and one exists
    pub profile: Option<String>,
    /// Recent conversation lines ("User: ...", "Assistant: ...")
    pub recent_messages: Vec<String>,
    /// Retrieved historical lines from forgetting-curve recall
    pub retrieved: Vec<String>,
    /// Metadata about the context
    pub metadata: ContextMetadata,
}

/// Metadata about the assembled context.
///
/// Diagnostic information for logging and token budgeting.
#[derive(Debug, Clone)]
pub struct ContextMetadata {
    /// User the context was built for
    pub user_id: String,
    /// Total estimated token count across all sections
    pub total_tokens: usize,
    /// Number of conversation lines (recent + retrieved)
    pub message_count: usize,
    /// When the context was built
    pub created_at: DateTime<Utc>,
}

impl Context {
    /// Renders the context as a single labeled text block.
    ///
    /// Sections appear in profile, recent, retrieved order, each under its
    /// header, separated by blank lines. Empty sections are omitted; an
    /// entirely empty context renders as an empty string.
    pub fn render(&self) -> String {
        let mut blocks = Vec::new();
        if let Some(profile) = &self.profile {
            if !profile.is_empty() {
                blocks.push(format!("[User profile]\n{}", profile));
            }
        }
        if !self.recent_messages.is_empty() {
            blocks.push(format!(
                "[Recent conversation]\n{}",
                self.recent_messages.join("\n")
            ));
        }
        if !self.retrieved.is_empty() {
            blocks.push(format!("[Relevant history]\n{}", self.retrieved.join("\n")));
        }
        blocks.join("\n\n")
    }

    /// Returns true when no section has content.
    pub fn is_empty(&self) -> bool {
        self.profile.as_deref().map_or(true, str::is_empty)
            && self.recent_messages.is_empty()
            && self.retrieved.is_empty()
    }
}
