//! The substitution model capability.
//!
//! A substitution model is a continuous-time Markov chain over a finite
//! alphabet. It exposes the equilibrium distribution π, the normalized
//! generator Q and, derived from it, the transition matrix P(t) = exp(Q t).
//! Implementations only provide the alphabet, π and Q; everything else the
//! mutation engine and the tree simulator need is derived here, so new models
//! plug in without touching either.

use crate::base::Alphabet;
use crate::errors::ModelError;
use nalgebra::{DMatrix, DVector};
use std::fmt;

/// Tolerance used when validating generators and probability vectors.
pub const VALIDATION_TOLERANCE: f64 = 1e-9;

/// A finite-state continuous-time substitution model.
pub trait SubstitutionModel: fmt::Debug {
    /// Short model name used in logs and reports.
    fn name(&self) -> &str;

    /// Ordered state symbols; a state's index is its position.
    fn alphabet(&self) -> &Alphabet;

    /// Equilibrium state frequencies π.
    fn pi(&self) -> DVector<f64>;

    /// Normalized instantaneous rate matrix Q.
    fn q(&self) -> DMatrix<f64>;

    /// Transition probability matrix P(t) = exp(Q t) for t >= 0.
    fn p(&self, t: f64) -> DMatrix<f64> {
        (self.q() * t).exp()
    }

    /// Number of states.
    fn state_count(&self) -> usize {
        self.alphabet().len()
    }

    /// Holding rate -Q[i,i] of every state.
    fn holding_rates(&self) -> DVector<f64> {
        -self.q().diagonal()
    }

    /// Expected substitution rate at stationarity, Σ π_i · (-Q[i,i]).
    fn mean_rate(&self) -> f64 {
        self.pi().dot(&self.holding_rates())
    }
}

/// Check that a rate parameter is finite and strictly positive.
pub(crate) fn check_rate(name: &'static str, value: f64) -> Result<f64, ModelError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(ModelError::InvalidParameter { name, value })
    }
}

/// Scale a raw generator so its stationarity-weighted mean holding rate is 1.
///
/// Returns the scaled matrix and the factor applied. When the mean rate is not
/// positive (every weighted state is absorbing) the raw matrix is returned with
/// a factor of 1.
pub(crate) fn normalize_generator(raw: DMatrix<f64>, pi: &DVector<f64>) -> (DMatrix<f64>, f64) {
    let mean = pi.dot(&(-raw.diagonal()));
    if mean.is_finite() && mean > 0.0 {
        let beta = 1.0 / mean;
        (raw * beta, beta)
    } else {
        (raw, 1.0)
    }
}

/// Validate that `q` is an `n`×`n` infinitesimal generator.
pub(crate) fn validate_generator(q: &DMatrix<f64>, n: usize) -> Result<(), ModelError> {
    if q.nrows() != n || q.ncols() != n {
        return Err(ModelError::InvalidRateMatrix(format!(
            "expected {n}x{n} matrix, got {}x{}",
            q.nrows(),
            q.ncols()
        )));
    }

    for i in 0..n {
        let mut row_sum = 0.0;
        for j in 0..n {
            let rate = q[(i, j)];
            if !rate.is_finite() {
                return Err(ModelError::InvalidRateMatrix(format!(
                    "entry ({i}, {j}) is not finite"
                )));
            }
            if i != j && rate < 0.0 {
                return Err(ModelError::InvalidRateMatrix(format!(
                    "off-diagonal entry ({i}, {j}) is negative: {rate}"
                )));
            }
            row_sum += rate;
        }
        if row_sum.abs() > VALIDATION_TOLERANCE {
            return Err(ModelError::InvalidRateMatrix(format!(
                "row {i} sums to {row_sum}, expected 0"
            )));
        }
    }

    Ok(())
}

/// Validate that `pi` is a probability vector of length `n`.
pub(crate) fn validate_frequencies(pi: &DVector<f64>, n: usize) -> Result<(), ModelError> {
    if pi.len() != n {
        return Err(ModelError::InvalidFrequencies(format!(
            "expected {n} frequencies, got {}",
            pi.len()
        )));
    }
    if let Some(f) = pi.iter().find(|f| !f.is_finite() || **f < 0.0) {
        return Err(ModelError::InvalidFrequencies(format!(
            "frequency {f} is negative or not finite"
        )));
    }
    let total = pi.sum();
    if (total - 1.0).abs() > VALIDATION_TOLERANCE {
        return Err(ModelError::InvalidFrequencies(format!(
            "frequencies sum to {total}, expected 1"
        )));
    }
    Ok(())
}
