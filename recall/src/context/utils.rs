//! Utility functions for context assembly.

/// Estimates the token count for a text string.
///
/// Rough approximation: 1 token ≈ 4 characters. Divides text length by 4
/// and rounds up, with a minimum of 1 token.
pub fn estimate_tokens(text: &str) -> usize {
    ((text.len() as f64) / 4.0).ceil().max(1.0) as usize
}
