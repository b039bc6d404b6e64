//! # Conversation Messages
//!
//! This module defines the immutable conversation history record.
//!
//! Messages are append-only: once a message is written to the history store
//! it is never mutated or deleted while the owning user exists. Everything
//! else in the engine (turns, traces, profiles) is derived from this record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Author of a conversation message.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum AuthorRole {
    User,
    Assistant,
}

/// A single immutable message in a user's conversation history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationMessage {
    /// Unique identifier
    pub id: Uuid,
    /// Owning user
    pub user_id: String,
    /// Session (task) the message belongs to; provenance key for
    /// consolidation and traces
    pub session_id: String,
    /// Who authored the message
    pub role: AuthorRole,
    /// The message text
    pub text: String,
    /// When the message was created
    pub created_at: DateTime<Utc>,
    /// Index of the conversational turn the message belongs to
    pub turn_index: u32,
}

impl ConversationMessage {
    /// Creates a new message with a generated UUID, stamped now.
    pub fn new(
        user_id: impl Into<String>,
        session_id: impl Into<String>,
        role: AuthorRole,
        text: impl Into<String>,
        turn_index: u32,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: user_id.into(),
            session_id: session_id.into(),
            role,
            text: text.into(),
            created_at: Utc::now(),
            turn_index,
        }
    }

    /// True when the message was written by the user.
    pub fn is_user(&self) -> bool {
        self.role == AuthorRole::User
    }
}
