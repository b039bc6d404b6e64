//! Shared utilities for context strategies.
//!
//! Vector similarity and turn formatting used by multiple strategies.

use recall_core::ConversationTurn;

/// Cosine similarity between two vectors.
///
/// Returns 0.0 for empty or zero-norm inputs. The raw value can be negative;
/// the forgetting-curve model floors effective relevance at zero.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }

    let dot: f64 = a.iter().zip(b.iter()).map(|(x, y)| (x * y) as f64).sum();
    let norm_a: f64 = a.iter().map(|x| (x * x) as f64).sum::<f64>().sqrt();
    let norm_b: f64 = b.iter().map(|x| (x * x) as f64).sum::<f64>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a * norm_b)
}

/// Formats a turn as verbatim conversation lines.
///
/// One line per side: `User: {text}` and, when answered, `Assistant: {text}`.
pub fn format_turn(turn: &ConversationTurn) -> Vec<String> {
    let mut lines = vec![format!("User: {}", turn.user.text)];
    if let Some(assistant) = &turn.assistant {
        lines.push(format!("Assistant: {}", assistant.text));
    }
    lines
}
