//! Similarity scorer — cosine similarity mapped to a bounded 0–100 score.
//!
//! The mapping `round(cos * 50 + 50)` stretches the cosine range [-1, 1] onto
//! [0, 100]. It assumes the embedding model's similarity distribution skews
//! positive, so no further calibration is applied; this is a product score,
//! not a general similarity metric.

use modelmux_core::GatewayError;

/// Score how similar two embedding vectors are, as an integer in `[0, 100]`.
///
/// Requires equal, non-zero dimensionality ([`GatewayError::DimensionMismatch`])
/// and non-zero norms ([`GatewayError::DegenerateVector`] — a zero vector has no
/// direction to compare).
pub fn score(a: &[f64], b: &[f64]) -> Result<u8, GatewayError> {
    if a.len() != b.len() || a.is_empty() {
        return Err(GatewayError::DimensionMismatch {
            left: a.len(),
            right: b.len(),
        });
    }

    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f64>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return Err(GatewayError::DegenerateVector);
    }

    let cosine = dot / (norm_a * norm_b);
    // Rounding noise can push |cosine| a hair past 1; clamp before the cast.
    Ok((cosine * 50.0 + 50.0).round().clamp(0.0, 100.0) as u8)
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
