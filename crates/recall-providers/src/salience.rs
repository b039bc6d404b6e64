//! Salience sub-scores and their weighted combination.

use serde::{Deserialize, Serialize};

/// Weight of the emotional-intensity sub-score.
const INTENSITY_WEIGHT: f64 = 0.4;
/// Weight of the self-disclosure-depth sub-score.
const DISCLOSURE_WEIGHT: f64 = 0.4;
/// Weight of the value-relevance sub-score.
const VALUE_WEIGHT: f64 = 0.2;

/// The three sub-dimensions of emotional salience, each in [0, 1].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SalienceScore {
    /// Emotional intensity of the message
    pub intensity: f64,
    /// Depth of self-disclosure
    pub disclosure: f64,
    /// Relevance to the user's core values
    pub value: f64,
}

impl SalienceScore {
    pub fn new(intensity: f64, disclosure: f64, value: f64) -> Self {
        Self {
            intensity: intensity.clamp(0.0, 1.0),
            disclosure: disclosure.clamp(0.0, 1.0),
            value: value.clamp(0.0, 1.0),
        }
    }

    /// A score of exactly zero, the documented scoring-unavailable fallback.
    pub fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    /// Combined salience: `0.4·intensity + 0.4·disclosure + 0.2·value`.
    pub fn combined(&self) -> f64 {
        let s = INTENSITY_WEIGHT * self.intensity
            + DISCLOSURE_WEIGHT * self.disclosure
            + VALUE_WEIGHT * self.value;
        s.clamp(0.0, 1.0)
    }
}
