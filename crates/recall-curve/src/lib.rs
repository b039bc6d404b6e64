//! # Forgetting Curve
//!
//! Pure numeric core of the dynamic forgetting model. Computes the recall
//! probability of a memory trace from elapsed time and query relevance, and
//! the consolidation-coefficient updates applied at trace creation and
//! after each successful recall.
//!
//! All functions are pure and clamp their inputs to the documented domains,
//! so the probability range stays closed over [0, 1] regardless of caller
//! behavior.

/// Lower bound for the consolidation coefficient. Values below the floor
/// would produce pathologically fast decay and are clamped up.
pub const CONSOLIDATION_FLOOR: f64 = 3.0;

/// How strongly salience boosts relevance at retrieval time.
pub const SALIENCE_RELEVANCE_BOOST: f64 = 0.3;

/// How strongly salience raises the initial consolidation coefficient.
pub const SALIENCE_INITIAL_GAIN: f64 = 1.5;

/// How strongly salience accelerates post-recall consolidation.
pub const SALIENCE_RECALL_GAIN: f64 = 0.5;

/// Recall probability of a trace.
///
/// `p = (1 - exp(-r * exp(-t/g))) / (1 - exp(-1))`
///
/// - `relevance` is clamped to [0, 1]; zero relevance yields zero
///   probability regardless of recency or consolidation strength.
/// - `elapsed_days` is clamped to >= 0; at `t = 0` the inner factor is
///   `exp(0) = 1`, the curve's maximum for the given `r` and `g`.
/// - `consolidation_g` is clamped to [`CONSOLIDATION_FLOOR`].
pub fn recall_probability(relevance: f64, elapsed_days: f64, consolidation_g: f64) -> f64 {
    let r = relevance.clamp(0.0, 1.0);
    let t = elapsed_days.max(0.0);
    let g = consolidation_g.max(CONSOLIDATION_FLOOR);

    let p = (1.0 - (-r * (-t / g).exp()).exp()) / (1.0 - (-1.0_f64).exp());
    p.clamp(0.0, 1.0)
}

/// Folds emotional salience into query relevance.
///
/// `r_eff = min(1, sim * (1 + 0.3 * e))`
///
/// Salience modulates relevance rather than being added to the probability
/// afterwards, so [`recall_probability`] keeps its closed [0, 1] range.
/// Negative similarities (possible with raw cosine) floor at zero.
pub fn effective_relevance(similarity: f64, salience: f64) -> f64 {
    let sim = similarity.max(0.0);
    let e = salience.clamp(0.0, 1.0);
    (sim * (1.0 + SALIENCE_RELEVANCE_BOOST * e)).min(1.0)
}

/// Post-recall consolidation update.
///
/// `g_new = g_prev + tanh(t/2) * (1 + 0.5 * e)`
///
/// Strictly increasing in `t` for `t > 0`; `t = 0` is an exact no-op
/// (same-instant re-recall). The coefficient never decreases.
pub fn update_consolidation(g_prev: f64, elapsed_days: f64, salience: f64) -> f64 {
    let g = g_prev.max(CONSOLIDATION_FLOOR);
    let t = elapsed_days.max(0.0);
    let e = salience.clamp(0.0, 1.0);

    g + (t / 2.0).tanh() * (1.0 + SALIENCE_RECALL_GAIN * e)
}

/// Initial consolidation coefficient, applied exactly once at trace
/// creation.
///
/// `g0 = 3.0 + 1.5 * e`
pub fn initial_consolidation(salience: f64) -> f64 {
    let e = salience.clamp(0.0, 1.0);
    CONSOLIDATION_FLOOR + SALIENCE_INITIAL_GAIN * e
}
