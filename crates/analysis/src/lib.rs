//! # Analysis Crate
//!
//! Statistics for checking simulated sequence evolution against the
//! substitution model it was generated under.

pub mod analysis;

pub use analysis::*;
