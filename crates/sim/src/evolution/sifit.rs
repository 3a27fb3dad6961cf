//! SiFit genotype substitution models (Zafar et al. 2017).
//!
//! SiFit: inferring tumor trees from single-cell sequencing data under
//! finite-sites models. <https://doi.org/10.1186/s13059-017-1311-2>

use super::model::{check_rate, normalize_generator, SubstitutionModel};
use crate::base::Alphabet;
use crate::errors::ModelError;
use nalgebra::{DMatrix, DVector};
use tracing::trace;

/// Three-state SiFit model for ternary genotypes.
///
/// States are `0` (wildtype), `1` (novel non-base) and `2` (other variant).
/// The raw generator is a birth-death chain:
///
/// ```text
///              0            1            2
///   0 |       -1,           1,           0 |
///   1 | (D+L)/2,        -(D+L),      (D+L)/2 |
///   2 |        0,            D,          -D |
/// ```
///
/// with `D = lambda_d` (deletion) and `L = lambda_l` (loss of heterozygosity),
/// scaled by `beta = 1 / (π · [1, D+L, D])` so that the mean substitution
/// rate at stationarity is 1.
#[derive(Debug, Clone, PartialEq)]
pub struct SiFit3 {
    lambda_d: f64,
    lambda_l: f64,
    alphabet: Alphabet,
}

impl SiFit3 {
    /// Create a SiFit3 model.
    ///
    /// # Errors
    /// Returns `ModelError::InvalidParameter` if either rate is not a finite,
    /// strictly positive number.
    pub fn new(lambda_d: f64, lambda_l: f64) -> Result<Self, ModelError> {
        let lambda_d = check_rate("lambda_d", lambda_d)?;
        let lambda_l = check_rate("lambda_l", lambda_l)?;
        trace!(lambda_d, lambda_l, "constructed SiFit3 model");
        Ok(Self {
            lambda_d,
            lambda_l,
            alphabet: Alphabet::ternary(),
        })
    }

    /// Deletion rate.
    pub fn lambda_d(&self) -> f64 {
        self.lambda_d
    }

    /// Loss-of-heterozygosity rate.
    pub fn lambda_l(&self) -> f64 {
        self.lambda_l
    }

    /// Normalization constant applied to the raw generator.
    pub fn beta(&self) -> f64 {
        let d = self.lambda_d;
        let diag = DVector::from_vec(vec![1.0, d + self.lambda_l, d]);
        1.0 / self.pi().dot(&diag)
    }

    fn raw_q(&self) -> DMatrix<f64> {
        let d = self.lambda_d;
        let sum = d + self.lambda_l;
        #[rustfmt::skip]
        let rates = [
            -1.0,      1.0,      0.0,
            sum / 2.0, -sum,     sum / 2.0,
            0.0,       d,        -d,
        ];
        DMatrix::from_row_slice(3, 3, &rates)
    }
}

impl SubstitutionModel for SiFit3 {
    fn name(&self) -> &str {
        "SiFit3"
    }

    fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    fn pi(&self) -> DVector<f64> {
        let d = self.lambda_d;
        let sum = d + self.lambda_l;
        let x = 1.0 + 2.0 / sum + 1.0 / d;
        DVector::from_vec(vec![1.0 / x, 2.0 / (x * sum), 1.0 / (x * d)])
    }

    fn q(&self) -> DMatrix<f64> {
        self.raw_q() * self.beta()
    }
}

/// Five-state SiFit model.
///
/// States `0` and `3` are absorbing. Its equilibrium places all mass on
/// state `3`, so the stationarity-weighted mean rate is zero and the raw
/// generator is used without rescaling.
///
/// ```text
///          0        1         2        3        4
///   0 |    0,       0,        0,       0,       0 |
///   1 |    L,    -1-L,        1,       0,       0 |
///   2 |  L/2,     D/2,   -(D+L),     L/2,     D/2 |
///   3 |    0,       0,        0,       0,       0 |
///   4 |    0,       0,        D,       L,  -(D+L) |
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SiFit5 {
    lambda_d: f64,
    lambda_l: f64,
    alphabet: Alphabet,
}

impl SiFit5 {
    /// Create a SiFit5 model.
    ///
    /// # Errors
    /// Returns `ModelError::InvalidParameter` if either rate is not a finite,
    /// strictly positive number.
    pub fn new(lambda_d: f64, lambda_l: f64) -> Result<Self, ModelError> {
        let lambda_d = check_rate("lambda_d", lambda_d)?;
        let lambda_l = check_rate("lambda_l", lambda_l)?;
        trace!(lambda_d, lambda_l, "constructed SiFit5 model");
        Ok(Self {
            lambda_d,
            lambda_l,
            alphabet: Alphabet::quinary(),
        })
    }

    /// Rate of recurrent point mutation.
    pub fn lambda_d(&self) -> f64 {
        self.lambda_d
    }

    /// Combined rate of deletion and loss of heterozygosity.
    pub fn lambda_l(&self) -> f64 {
        self.lambda_l
    }

    /// Scaling applied to the raw generator; 1 while the mean rate is zero.
    pub fn beta(&self) -> f64 {
        normalize_generator(self.raw_q(), &self.pi()).1
    }

    fn raw_q(&self) -> DMatrix<f64> {
        let d = self.lambda_d;
        let l = self.lambda_l;
        let sum = d + l;
        #[rustfmt::skip]
        let rates = [
            0.0,     0.0,     0.0,   0.0,     0.0,
            l,       -1.0 - l, 1.0,  0.0,     0.0,
            l / 2.0, d / 2.0, -sum,  l / 2.0, d / 2.0,
            0.0,     0.0,     0.0,   0.0,     0.0,
            0.0,     0.0,     d,     l,       -sum,
        ];
        DMatrix::from_row_slice(5, 5, &rates)
    }
}

impl SubstitutionModel for SiFit5 {
    fn name(&self) -> &str {
        "SiFit5"
    }

    fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    fn pi(&self) -> DVector<f64> {
        DVector::from_vec(vec![0.0, 0.0, 0.0, 1.0, 0.0])
    }

    fn q(&self) -> DMatrix<f64> {
        normalize_generator(self.raw_q(), &self.pi()).0
    }
}
