//! Commonly used imports for convenience.
//!
//! This prelude module provides a convenient way to import the most commonly
//! used types and traits in the treesim library.
//!
//! # Example
//!
//! ```
//! use treesim_sim::prelude::*;
//! use rand::SeedableRng;
//! use rand_xoshiro::Xoshiro256PlusPlus;
//!
//! let tree = Tree::from_newick("((A:0.5,B:0.5)D:0.5,C:1)E;").unwrap();
//! let model = SiFit3::new(3.0, 2.0).unwrap();
//! let mut rng = Xoshiro256PlusPlus::seed_from_u64(42);
//!
//! let sequences = simulate_tree(&tree, &model, 10, MutationMode::Expm, &mut rng).unwrap();
//! assert_eq!(sequences.len(), 5);
//! ```

pub use crate::base::{Alphabet, Sequence};
pub use crate::errors::{self, ModelError, NewickError, SimulationError};
pub use crate::evolution::{CustomModel, MutationMode, SiFit3, SiFit5, SubstitutionModel};
pub use crate::simulation::{simulate_tree, Configuration, Simulation, SimulationBuilder, TreeSimulator};
pub use crate::tree::{Node, NodeId, Tree};
