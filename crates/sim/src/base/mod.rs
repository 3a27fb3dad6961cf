//! Base types for sequence representation.
//!
//! This module provides the foundational types for representing state
//! alphabets and sequences of state indices.

mod alphabet;
mod sequence;

pub use alphabet::Alphabet;
pub use sequence::Sequence;
