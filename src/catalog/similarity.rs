// similarity.rs — Cosine similarity between two embedding vectors.
//
// Accumulates in f64 so long f32 vectors don't drift past the [-1, 1] bounds,
// and clamps the result anyway.

use crate::catalog::CatalogError;

/// Cosine similarity in [-1, 1].
///
/// An empty or zero-magnitude vector scores 0.0 against anything.
/// Vectors of different lengths are a `DimensionMismatch` (`expected` is `a`'s length).
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> Result<f64, CatalogError> {
    if a.is_empty() || b.is_empty() {
        return Ok(0.0);
    }
    if a.len() != b.len() {
        return Err(CatalogError::DimensionMismatch {
            expected: a.len(),
            got: b.len(),
        });
    }

    let mut dot = 0.0f64;
    let mut norm_a = 0.0f64;
    let mut norm_b = 0.0f64;

    for (&x, &y) in a.iter().zip(b.iter()) {
        let (x, y) = (f64::from(x), f64::from(y));
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return Ok(0.0);
    }

    let score = dot / (norm_a.sqrt() * norm_b.sqrt());
    if !score.is_finite() {
        return Ok(0.0);
    }
    Ok(score.clamp(-1.0, 1.0))
}
