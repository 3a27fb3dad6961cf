//! Utility functions for analysis module
//!
//! Shared helper functions used across analysis submodules.

use serde::Serialize;

/// Calculate mean of a vector
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Mean and population variance of a sample.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Summary {
    pub mean: f64,
    pub variance: f64,
}

impl Summary {
    /// Summarize `values`; an empty sample yields zeros.
    pub fn from_values(values: &[f64]) -> Self {
        if values.is_empty() {
            return Self::default();
        }
        let mean = mean(values);
        let variance =
            values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
        Self { mean, variance }
    }

    /// Summarize integer counts.
    pub fn from_counts(counts: &[usize]) -> Self {
        let values: Vec<f64> = counts.iter().map(|&c| c as f64).collect();
        Self::from_values(&values)
    }

    pub fn std_dev(&self) -> f64 {
        self.variance.sqrt()
    }
}

/// Number of sites at which `a` and `b` differ.
///
/// Positions beyond the shorter input all count as differences.
#[inline]
pub fn count_diff<T: PartialEq>(a: &[T], b: &[T]) -> usize {
    let mismatches = a.iter().zip(b).filter(|(x, y)| x != y).count();
    mismatches + a.len().abs_diff(b.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(mean(&[1.0, 2.0, 3.0]), 2.0);
    }

    #[test]
    fn test_summary_population_variance() {
        let summary = Summary::from_values(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        assert_eq!(summary.mean, 5.0);
        assert_eq!(summary.variance, 4.0);
        assert_eq!(summary.std_dev(), 2.0);
    }

    #[test]
    fn test_summary_counts_and_empty() {
        let summary = Summary::from_counts(&[1, 3]);
        assert_eq!(summary, Summary { mean: 2.0, variance: 1.0 });
        assert_eq!(Summary::from_values(&[]), Summary::default());
    }

    #[test]
    fn test_count_diff() {
        assert_eq!(count_diff(b"0120", b"0120"), 0);
        assert_eq!(count_diff(b"0120", b"2100"), 2);
        assert_eq!(count_diff(b"012", b"01210"), 2);
        assert_eq!(count_diff::<u8>(&[], &[1, 2]), 2);
    }
}
