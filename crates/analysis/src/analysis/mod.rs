//! Analysis tools for treesim
//!
//! This module provides the statistics used to validate simulated sequences:
//! - Sequence composition (state counts, frequencies, chi-squared fit)
//! - Theoretical expectations (differing sites, substitution events)
//! - Benchmarking of the two mutation modes against each other

pub mod comparison;
pub mod composition;
pub mod expectation;
pub mod utils;

// Re-export commonly used functions
pub use comparison::{compare_modes, ModeComparison};
pub use composition::{chi_squared, state_counts, state_frequencies};
pub use expectation::{expected_differences, expected_events};
pub use utils::{count_diff, mean, Summary};
