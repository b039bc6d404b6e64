//! # Turn Segmentation
//!
//! Groups a flat, ordered message sequence into user/assistant turn pairs.
//!
//! A turn is user-anchored: a user message opens a turn and the next
//! assistant message closes it. A second user message while a turn is still
//! open flushes the open turn as unanswered. An assistant message with no
//! open turn has nothing to attach to and is dropped.
//!
//! Turns are a derived view, recomputed on demand and never persisted.
//! Segmentation is pure: the same input always yields the same output.

use serde::{Deserialize, Serialize};

use crate::types::ConversationMessage;

/// A derived user/assistant pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationTurn {
    /// The user side of the turn
    pub user: ConversationMessage,
    /// The assistant reply, if the turn was answered
    pub assistant: Option<ConversationMessage>,
}

impl ConversationTurn {
    /// Turn index, taken from the user side.
    pub fn turn_index(&self) -> u32 {
        self.user.turn_index
    }

    /// Session the turn belongs to.
    pub fn session_id(&self) -> &str {
        &self.user.session_id
    }
}

/// Segments an ordered message sequence into turns.
pub fn segment(messages: &[ConversationMessage]) -> Vec<ConversationTurn> {
    let mut turns = Vec::new();
    let mut open: Option<ConversationMessage> = None;

    for message in messages {
        if message.is_user() {
            if let Some(user) = open.take() {
                turns.push(ConversationTurn {
                    user,
                    assistant: None,
                });
            }
            open = Some(message.clone());
        } else if let Some(user) = open.take() {
            turns.push(ConversationTurn {
                user,
                assistant: Some(message.clone()),
            });
        }
        // An assistant message with no open turn is dropped.
    }

    if let Some(user) = open {
        turns.push(ConversationTurn {
            user,
            assistant: None,
        });
    }

    turns
}

/// Segments only the messages strictly before `before_turn`.
///
/// Used by context assembly so the current unanswered user message never
/// appears in its own history.
pub fn segment_before(messages: &[ConversationMessage], before_turn: u32) -> Vec<ConversationTurn> {
    let bounded: Vec<ConversationMessage> = messages
        .iter()
        .filter(|m| m.turn_index < before_turn)
        .cloned()
        .collect();
    segment(&bounded)
}
