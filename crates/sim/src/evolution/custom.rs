use super::model::{normalize_generator, validate_frequencies, validate_generator, SubstitutionModel};
use crate::base::Alphabet;
use crate::errors::ModelError;
use nalgebra::{DMatrix, DVector};
use tracing::{trace, warn};

/// Largest |π Q| component tolerated before a non-stationary warning is logged.
const STATIONARITY_TOLERANCE: f64 = 1e-6;

/// Substitution model over an arbitrary alphabet with a user-supplied
/// generator and equilibrium frequencies.
///
/// The generator is rescaled so that the mean rate at the supplied
/// frequencies is 1, unless that mean is zero.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomModel {
    name: String,
    alphabet: Alphabet,
    pi: DVector<f64>,
    q: DMatrix<f64>,
    beta: f64,
}

impl CustomModel {
    /// Build a model from an alphabet, frequencies and raw generator.
    ///
    /// # Errors
    /// Returns `ModelError::InvalidFrequencies` or `ModelError::InvalidRateMatrix`
    /// if the inputs do not match the alphabet or are not a valid probability
    /// vector and generator.
    pub fn new(
        alphabet: Alphabet,
        frequencies: DVector<f64>,
        rates: DMatrix<f64>,
    ) -> Result<Self, ModelError> {
        let n = alphabet.len();
        validate_frequencies(&frequencies, n)?;
        validate_generator(&rates, n)?;

        let (q, beta) = normalize_generator(rates, &frequencies);

        let drift = (frequencies.transpose() * &q).abs().max();
        if drift > STATIONARITY_TOLERANCE {
            warn!(
                drift,
                "equilibrium frequencies are not stationary under the generator"
            );
        }
        trace!(states = n, beta, "constructed custom model");

        Ok(Self {
            name: "Custom".to_string(),
            alphabet,
            pi: frequencies,
            q,
            beta,
        })
    }

    /// Build a model from a symbol string, a frequency list and generator rows.
    ///
    /// # Errors
    /// Returns a `ModelError` if the symbols are not a valid alphabet, or the
    /// frequencies and rows do not form a valid model over it.
    pub fn from_rows(
        states: &str,
        frequencies: &[f64],
        rates: &[Vec<f64>],
    ) -> Result<Self, ModelError> {
        let alphabet = Alphabet::new(states.chars().collect::<Vec<_>>())?;
        let n = alphabet.len();
        if rates.len() != n || rates.iter().any(|row| row.len() != n) {
            return Err(ModelError::InvalidRateMatrix(format!(
                "expected {n} rows of {n} rates"
            )));
        }
        let flat: Vec<f64> = rates.iter().flatten().copied().collect();
        Self::new(
            alphabet,
            DVector::from_column_slice(frequencies),
            DMatrix::from_row_slice(n, n, &flat),
        )
    }

    /// Replace the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Scale factor applied to the supplied generator.
    pub fn beta(&self) -> f64 {
        self.beta
    }
}

impl SubstitutionModel for CustomModel {
    fn name(&self) -> &str {
        &self.name
    }

    fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    fn pi(&self) -> DVector<f64> {
        self.pi.clone()
    }

    fn q(&self) -> DMatrix<f64> {
        self.q.clone()
    }
}
