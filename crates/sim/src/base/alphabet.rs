use crate::errors::ModelError;
use std::collections::HashMap;
use std::sync::Arc;

/// Ordered, immutable set of state symbols.
///
/// The position of a symbol is its state index, so `Alphabet::ternary()`
/// maps `'0' -> 0`, `'1' -> 1`, `'2' -> 2`. Cloning is cheap: the symbol table
/// is shared behind an `Arc`.
#[derive(Debug, Clone)]
pub struct Alphabet {
    /// Character representation of states
    chars: Arc<[char]>,
    /// Mapping from char to index for fast lookup
    char_to_index: Arc<HashMap<char, u8>>,
}

impl Alphabet {
    /// Create a new alphabet from characters.
    /// The order determines the index mapping.
    ///
    /// # Errors
    /// Returns `ModelError::InvalidAlphabet` if `chars` is empty, has more than
    /// 256 symbols, or contains a duplicate symbol.
    pub fn new(chars: impl Into<Vec<char>>) -> Result<Self, ModelError> {
        let chars: Vec<char> = chars.into();
        if chars.is_empty() {
            return Err(ModelError::InvalidAlphabet("no states".into()));
        }
        if chars.len() > u8::MAX as usize + 1 {
            return Err(ModelError::InvalidAlphabet(format!(
                "{} states exceeds the maximum of 256",
                chars.len()
            )));
        }

        let mut char_to_index = HashMap::with_capacity(chars.len());
        for (i, &c) in chars.iter().enumerate() {
            if char_to_index.insert(c, i as u8).is_some() {
                return Err(ModelError::InvalidAlphabet(format!(
                    "duplicate symbol '{c}'"
                )));
            }
        }

        Ok(Self {
            chars: chars.into(),
            char_to_index: Arc::new(char_to_index),
        })
    }

    /// Ternary genotype alphabet: 0 (wildtype), 1 (novel non-base), 2 (other variant).
    pub fn ternary() -> Self {
        Self::from_digits(3)
    }

    /// Five-state genotype alphabet (`0`..`4`).
    pub fn quinary() -> Self {
        Self::from_digits(5)
    }

    fn from_digits(n: u32) -> Self {
        let chars: Vec<char> = (0..n).filter_map(|d| char::from_digit(d, 10)).collect();
        let char_to_index = chars.iter().enumerate().map(|(i, &c)| (c, i as u8)).collect();
        Self {
            chars: chars.into(),
            char_to_index: Arc::new(char_to_index),
        }
    }

    /// Get the number of states in this alphabet
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    /// Always false for a constructed alphabet.
    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    /// Get character by index
    #[inline]
    pub fn get_char(&self, index: u8) -> Option<char> {
        self.chars.get(index as usize).copied()
    }

    /// Get index by character
    #[inline]
    pub fn get_index(&self, c: char) -> Option<u8> {
        self.char_to_index.get(&c).copied()
    }

    /// Get all characters as slice
    #[inline]
    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    /// Check if character is in alphabet
    #[inline]
    pub fn contains(&self, c: char) -> bool {
        self.char_to_index.contains_key(&c)
    }
}

impl Default for Alphabet {
    fn default() -> Self {
        Self::ternary()
    }
}

impl PartialEq for Alphabet {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.chars, &other.chars) || self.chars == other.chars
    }
}

impl Eq for Alphabet {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alphabet_ternary() {
        let alphabet = Alphabet::ternary();
        assert_eq!(alphabet.len(), 3);
        assert_eq!(alphabet.chars(), &['0', '1', '2']);
        assert_eq!(alphabet, Alphabet::default());
    }

    #[test]
    fn test_alphabet_quinary() {
        let alphabet = Alphabet::quinary();
        assert_eq!(alphabet.chars(), &['0', '1', '2', '3', '4']);
    }

    #[test]
    fn test_alphabet_lookup() {
        let alphabet = Alphabet::ternary();
        assert_eq!(alphabet.get_char(0), Some('0'));
        assert_eq!(alphabet.get_char(2), Some('2'));
        assert_eq!(alphabet.get_char(3), None);
        assert_eq!(alphabet.get_index('1'), Some(1));
        assert_eq!(alphabet.get_index('?'), None);
        assert!(alphabet.contains('2'));
        assert!(!alphabet.contains('A'));
    }

    #[test]
    fn test_alphabet_custom() {
        let alphabet = Alphabet::new(vec!['A', 'C', 'G', 'T']).unwrap();
        assert_eq!(alphabet.len(), 4);
        assert_eq!(alphabet.get_index('T'), Some(3));
        assert_ne!(alphabet, Alphabet::ternary());
    }

    #[test]
    fn test_alphabet_rejects_empty() {
        assert!(matches!(
            Alphabet::new(Vec::<char>::new()),
            Err(ModelError::InvalidAlphabet(_))
        ));
    }

    #[test]
    fn test_alphabet_rejects_duplicates() {
        let err = Alphabet::new(vec!['0', '1', '0']).unwrap_err();
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn test_alphabet_clone_is_cheap() {
        let alphabet1 = Alphabet::ternary();
        let alphabet2 = alphabet1.clone();
        assert!(Arc::ptr_eq(&alphabet1.chars, &alphabet2.chars));
    }
}
