use super::Alphabet;
use crate::errors::ModelError;
use serde::{Deserialize, Serialize};

/// Fixed-length sequence of state indices.
///
/// `Sequence` is a value type: every node of a simulated tree owns its own
/// copy, and mutation always produces a fresh `Sequence` rather than editing
/// the ancestor in place. Indices refer to positions in an [`Alphabet`]; use
/// [`Sequence::render`] to turn them into symbols.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Sequence(Vec<u8>);

impl Sequence {
    /// Create a new, empty `Sequence`.
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Create a `Sequence` with reserved capacity for `capacity` sites.
    pub fn with_capacity(capacity: usize) -> Self {
        Self(Vec::with_capacity(capacity))
    }

    /// Create a `Sequence` from a vector of state indices.
    pub fn from_indices(indices: Vec<u8>) -> Self {
        Self(indices)
    }

    /// Create a sequence of `len` sites all in `state`.
    pub fn uniform(state: u8, len: usize) -> Self {
        Self(vec![state; len])
    }

    /// Parse symbols against `alphabet`.
    ///
    /// # Errors
    /// Returns `ModelError::InvalidAlphabet` naming the first symbol that is
    /// not part of `alphabet`.
    pub fn parse(text: &str, alphabet: &Alphabet) -> Result<Self, ModelError> {
        text.chars()
            .map(|c| {
                alphabet.get_index(c).ok_or_else(|| {
                    ModelError::InvalidAlphabet(format!("symbol '{c}' is not a state"))
                })
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }

    /// Return the length of the sequence in sites.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Return `true` if the sequence contains no sites.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Return the state at `index`, or `None` if out of range.
    #[inline]
    pub fn get(&self, index: usize) -> Option<u8> {
        self.0.get(index).copied()
    }

    /// Borrow the underlying state slice.
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    /// Borrow the mutable underlying state slice.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.0
    }

    /// Append `state` to the end of the sequence.
    #[inline]
    pub fn push(&mut self, state: u8) {
        self.0.push(state);
    }

    /// Consume the sequence and return its state indices.
    pub fn into_indices(self) -> Vec<u8> {
        self.0
    }

    /// Translate the state indices into symbols of `alphabet`.
    ///
    /// Indices outside the alphabet render as `'?'`, the missing-data symbol;
    /// simulated sequences never contain such indices.
    pub fn render(&self, alphabet: &Alphabet) -> String {
        self.0
            .iter()
            .map(|&i| alphabet.get_char(i).unwrap_or('?'))
            .collect()
    }
}

impl From<Vec<u8>> for Sequence {
    fn from(indices: Vec<u8>) -> Self {
        Self(indices)
    }
}
