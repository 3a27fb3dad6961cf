//! # Simulation Crate
//!
//! The `sim` crate provides the core logic for simulating discrete-state
//! sequence evolution along a phylogenetic tree. It includes modules for
//! alphabets and sequences, substitution models and branch mutation, rooted
//! trees with a newick reader, and the tree simulation engine.

pub mod base;
pub mod errors;
pub mod evolution;
pub mod prelude;
pub mod simulation;
pub mod tree;

pub use base::{Alphabet, Sequence};
