//! Distance and similarity functions over weighted skill vectors
//!
//! Pure numeric helpers; both inputs must have the same length.

/// Euclidean (L2) distance between two equal-length vectors
#[inline]
#[must_use]
pub fn euclidean(a: &[f64], b: &[f64]) -> f64 {
    debug_assert_eq!(a.len(), b.len());
    a.iter()
        .zip(b)
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}

/// Cosine distance: `1 - dot(a, b) / (|a| * |b|)`
///
/// When either vector has zero norm the distance is defined as `1.0`
/// (maximum distance) instead of dividing by zero.
#[inline]
#[must_use]
pub fn cosine_distance(a: &[f64], b: &[f64]) -> f64 {
    debug_assert_eq!(a.len(), b.len());
    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norms = norm(a) * norm(b);
    if norms == 0.0 {
        return 1.0;
    }
    1.0 - dot / norms
}

/// Map a euclidean distance into a similarity in `(0, 1]`
#[inline]
#[must_use]
pub fn euclidean_similarity(distance: f64) -> f64 {
    1.0 / (1.0 + distance)
}

/// Map a cosine distance into the usual cosine similarity
#[inline]
#[must_use]
pub fn cosine_similarity(distance: f64) -> f64 {
    1.0 - distance
}

#[inline]
fn norm(v: &[f64]) -> f64 {
    v.iter().map(|x| x * x).sum::<f64>().sqrt()
}
