/// Squared Euclidean distance between two equal-length vectors.
///
/// Length equality is the caller's responsibility: point sets are validated
/// once when the matrix is built, not on every pair.
pub fn squared_distance(a: &[f64], b: &[f64]) -> f64 {
    debug_assert_eq!(a.len(), b.len());
    a.iter()
        .zip(b)
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}

/// Euclidean distance (square root of [`squared_distance`]).
pub fn euclidean_distance(a: &[f64], b: &[f64]) -> f64 {
    squared_distance(a, b).sqrt()
}
