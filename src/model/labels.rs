//! Ground-truth safety labels derived from human ratings.

use ndarray::Array1;

/// Class index of locations rated unsafe.
pub const UNSAFE: usize = 0;
/// Class index of locations rated safe.
pub const SAFE: usize = 1;

/// `SAFE` iff `rating >= threshold`.
pub fn derive_label(rating: f64, threshold: f64) -> usize {
    if rating >= threshold {
        SAFE
    } else {
        UNSAFE
    }
}

pub fn derive_labels(ratings: &[f64], threshold: f64) -> Array1<usize> {
    ratings
        .iter()
        .map(|&rating| derive_label(rating, threshold))
        .collect()
}
