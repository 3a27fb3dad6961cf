//! Builder pattern for creating simulations.
//!
//! Provides a fluent API for assembling a validated [`Configuration`].

use crate::errors::SimulationError;
use crate::evolution::MutationMode;
use crate::simulation::{Configuration, ExecutionConfig, ModelConfig, RatePrior, Simulation};

/// Builder for constructing simulation configurations with a fluent API.
///
/// # Examples
///
/// ```
/// use treesim_sim::simulation::SimulationBuilder;
/// use treesim_sim::evolution::MutationMode;
///
/// let config = SimulationBuilder::new()
///     .tree("((A:0.5,B:0.5)D:0.5,C:1)E;")
///     .sifit3(3.0, 2.0)
///     .length(20)
///     .mode(MutationMode::Poisson)
///     .seed(42)
///     .build()
///     .unwrap();
///
/// assert_eq!(config.execution.length, 20);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SimulationBuilder {
    // Required parameters
    tree: Option<String>,
    length: Option<usize>,

    model: ModelConfig,        // Default: SiFit3(3, 2)
    mode: MutationMode,        // Default: expm
    seed: Option<u64>,         // Default: None (random)
    replicates: Option<usize>, // Default: 1
    rate_prior: Option<RatePrior>,
}

impl SimulationBuilder {
    /// Create a new builder with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the newick tree (required).
    pub fn tree(mut self, newick: impl Into<String>) -> Self {
        self.tree = Some(newick.into());
        self
    }

    /// Set the number of sites per sequence (required).
    pub fn length(mut self, length: usize) -> Self {
        self.length = Some(length);
        self
    }

    /// Set the substitution model.
    pub fn model(mut self, model: ModelConfig) -> Self {
        self.model = model;
        self
    }

    /// Use a SiFit3 model with the given rates.
    pub fn sifit3(self, lambda_d: f64, lambda_l: f64) -> Self {
        self.model(ModelConfig::SiFit3 { lambda_d, lambda_l })
    }

    /// Set the mutation mode (default: expm).
    pub fn mode(mut self, mode: MutationMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the random seed for reproducibility (default: None = random).
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the number of replicates (default: 1).
    pub fn replicates(mut self, replicates: usize) -> Self {
        self.replicates = Some(replicates);
        self
    }

    /// Draw the SiFit rates from `prior` at the start of each replicate.
    pub fn rate_prior(mut self, prior: RatePrior) -> Self {
        self.rate_prior = Some(prior);
        self
    }

    /// Build and validate the configuration.
    ///
    /// # Errors
    /// Returns `SimulationError::MissingRequired` if the tree or length was not
    /// set, or the validation error of the assembled configuration.
    pub fn build(self) -> Result<Configuration, SimulationError> {
        let tree = self.tree.ok_or(SimulationError::MissingRequired("tree"))?;
        let length = self.length.ok_or(SimulationError::MissingRequired("length"))?;

        let config = Configuration {
            tree,
            model: self.model,
            execution: ExecutionConfig {
                length,
                mode: self.mode,
                seed: self.seed,
                replicates: self.replicates.unwrap_or(1),
                rate_prior: self.rate_prior,
            },
        };
        config.validate()?;
        Ok(config)
    }

    /// Build the configuration and create a ready-to-run [`Simulation`].
    ///
    /// # Errors
    /// See [`SimulationBuilder::build`].
    pub fn build_simulation(self) -> Result<Simulation, SimulationError> {
        Simulation::new(self.build()?)
    }
}
