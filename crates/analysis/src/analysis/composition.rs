//! Sequence composition analysis
//!
//! State counts and frequencies of simulated sequences, and a chi-squared
//! goodness-of-fit statistic against expected state probabilities.

use treesim_sim::base::Sequence;

/// Count how many sites are in each of `states` states.
///
/// Sites holding an index outside `0..states` are ignored.
pub fn state_counts(seq: &Sequence, states: usize) -> Vec<usize> {
    let mut counts = vec![0; states];
    for &s in seq.as_slice() {
        if let Some(c) = counts.get_mut(s as usize) {
            *c += 1;
        }
    }
    counts
}

/// Proportion of sites in each state (all zeros for an empty sequence).
pub fn state_frequencies(seq: &Sequence, states: usize) -> Vec<f64> {
    let counts = state_counts(seq, states);
    let total: usize = counts.iter().sum();
    if total == 0 {
        return vec![0.0; states];
    }
    counts.iter().map(|&c| c as f64 / total as f64).collect()
}

/// Pearson chi-squared statistic of observed `counts` against `probabilities`.
///
/// Categories with zero expected count contribute nothing when unobserved
/// and make the statistic infinite when observed.
pub fn chi_squared(counts: &[usize], probabilities: &[f64]) -> f64 {
    let total: usize = counts.iter().sum();
    counts
        .iter()
        .zip(probabilities)
        .map(|(&observed, &p)| {
            let expected = p * total as f64;
            let observed = observed as f64;
            if expected > 0.0 {
                (observed - expected).powi(2) / expected
            } else if observed > 0.0 {
                f64::INFINITY
            } else {
                0.0
            }
        })
        .sum()
}
