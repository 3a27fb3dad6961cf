//! Evolution module providing substitution models and mutation.
//!
//! This module implements the stochastic core of the simulator:
//! - **Models**: the [`SubstitutionModel`] capability with SiFit and custom models
//! - **Sampling**: categorical draws and stationary ancestral sequences
//! - **Mutation**: matrix-exponentiation and Poisson jump-chain branch mutation

mod custom;
mod model;
pub mod mutation;
pub mod sampling;
mod sifit;

pub use custom::CustomModel;
pub use model::{SubstitutionModel, VALIDATION_TOLERANCE};
pub use mutation::{
    jump_distribution, mutate, mutate_expm, mutate_poisson, JumpChain, MutationMode,
    MutationOutcome,
};
pub use sampling::{generate_sequence, sample_index};
pub use sifit::{SiFit3, SiFit5};
