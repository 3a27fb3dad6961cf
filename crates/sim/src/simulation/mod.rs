//! Tree simulation engine and run configuration.
//!
//! - `TreeSimulator`: propagates a stationary root sequence down a tree,
//!   mutating along every branch.
//! - `Simulation`: runs the replicates of a [`Configuration`] from one seeded
//!   random stream.
//! - `SimulationBuilder`: fluent builder for validated configurations.

pub mod builder;
pub mod configs;
pub mod engine;

pub use builder::SimulationBuilder;
pub use configs::{Configuration, ExecutionConfig, ModelConfig, RatePrior, DEFAULT_TREE};
pub use engine::{simulate_tree, ReplicateResult, Simulation, TreeSimulation, TreeSimulator};
