use crate::base::Sequence;
use nalgebra::DVector;
use rand::Rng;

/// Draw an index from unnormalized categorical `weights` by inverse CDF.
///
/// One uniform `u` in `[0, 1)` is drawn and scaled by the total weight; the
/// first index whose cumulative weight exceeds it is returned. Rounding can
/// leave the cumulative sum short of the scaled draw, in which case the last
/// index with positive weight is returned, so the result is never out of
/// range. If no weight is positive the last index is returned.
///
/// # Panics
/// Panics if `weights` is empty.
pub fn sample_index<R: Rng + ?Sized>(weights: &[f64], rng: &mut R) -> usize {
    assert!(!weights.is_empty(), "cannot sample from an empty distribution");

    let total: f64 = weights.iter().sum();
    let u: f64 = rng.random::<f64>() * total;

    let mut cumulative = 0.0;
    for (i, &w) in weights.iter().enumerate() {
        cumulative += w;
        if u < cumulative {
            return i;
        }
    }

    weights
        .iter()
        .rposition(|&w| w > 0.0)
        .unwrap_or(weights.len() - 1)
}

/// Draw `length` independent states from the distribution `pi`.
pub fn generate_sequence<R: Rng + ?Sized>(
    length: usize,
    pi: &DVector<f64>,
    rng: &mut R,
) -> Sequence {
    let weights = pi.as_slice();
    let mut seq = Sequence::with_capacity(length);
    for _ in 0..length {
        seq.push(sample_index(weights, rng) as u8);
    }
    seq
}
