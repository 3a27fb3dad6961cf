//! Simulation configuration.
//!
//! A [`Configuration`] fully describes a run: the tree, the substitution
//! model and the execution settings. It can be serialized to JSON and loaded
//! back to reproduce a simulation setup exactly (given a seed).

use crate::errors::{ConfigError, ModelError, SimulationError};
use crate::evolution::{CustomModel, MutationMode, SiFit3, SiFit5, SubstitutionModel};
use crate::tree::Tree;
use rand::Rng;
use rand_distr::{Distribution, LogNormal};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Tree used when no other tree is given.
pub const DEFAULT_TREE: &str = "((A:0.5,B:0.5)D:0.5,C:1)E;";

/// The master configuration struct.
/// Can be deserialized from a file to fully reproduce a simulation setup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Configuration {
    /// Newick description of the tree.
    pub tree: String,
    pub model: ModelConfig,
    pub execution: ExecutionConfig,
}

/// Substitution model selection and parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ModelConfig {
    SiFit3 { lambda_d: f64, lambda_l: f64 },
    SiFit5 { lambda_d: f64, lambda_l: f64 },
    /// Arbitrary alphabet; `states` lists one symbol per state.
    Custom {
        states: String,
        frequencies: Vec<f64>,
        rates: Vec<Vec<f64>>,
    },
}

/// Run-level settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionConfig {
    /// Number of sites per sequence.
    pub length: usize,
    #[serde(default)]
    pub mode: MutationMode,
    /// Optional RNG seed for reproducibility
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default = "default_replicates")]
    pub replicates: usize,
    /// Per-replicate prior on the SiFit rates, replacing the fixed rates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate_prior: Option<RatePrior>,
}

fn default_replicates() -> usize {
    1
}

/// Distribution the SiFit rates are drawn from at the start of each replicate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "distribution")]
pub enum RatePrior {
    LogNormal { mu: f64, sigma: f64 },
}

impl RatePrior {
    /// Check the distribution parameters.
    ///
    /// # Errors
    /// Returns `SimulationError::InvalidParameter` if the parameters do not
    /// describe a proper distribution.
    pub fn validate(&self) -> Result<(), SimulationError> {
        match *self {
            Self::LogNormal { mu, sigma } => {
                if !mu.is_finite() || !sigma.is_finite() || sigma < 0.0 {
                    return Err(SimulationError::InvalidParameter(format!(
                        "lognormal prior needs finite mu and sigma >= 0, got mu={mu}, sigma={sigma}"
                    )));
                }
                Ok(())
            }
        }
    }

    /// Draw `(lambda_d, lambda_l)`, in that order.
    ///
    /// # Errors
    /// Returns `SimulationError::InvalidParameter` if the prior is invalid.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<(f64, f64), SimulationError> {
        match *self {
            Self::LogNormal { mu, sigma } => {
                let dist = LogNormal::new(mu, sigma).map_err(|e| {
                    SimulationError::InvalidParameter(format!("lognormal prior: {e}"))
                })?;
                let lambda_d = dist.sample(rng);
                let lambda_l = dist.sample(rng);
                Ok((lambda_d, lambda_l))
            }
        }
    }
}

impl ModelConfig {
    /// Construct the substitution model.
    ///
    /// # Errors
    /// Returns the model's construction error.
    pub fn build(&self) -> Result<Box<dyn SubstitutionModel>, ModelError> {
        Ok(match self {
            Self::SiFit3 { lambda_d, lambda_l } => Box::new(SiFit3::new(*lambda_d, *lambda_l)?),
            Self::SiFit5 { lambda_d, lambda_l } => Box::new(SiFit5::new(*lambda_d, *lambda_l)?),
            Self::Custom {
                states,
                frequencies,
                rates,
            } => Box::new(CustomModel::from_rows(states, frequencies, rates)?),
        })
    }

    /// SiFit rates `(lambda_d, lambda_l)`, or `None` for a custom model.
    pub fn rates(&self) -> Option<(f64, f64)> {
        match *self {
            Self::SiFit3 { lambda_d, lambda_l } | Self::SiFit5 { lambda_d, lambda_l } => {
                Some((lambda_d, lambda_l))
            }
            Self::Custom { .. } => None,
        }
    }

    /// Same model family with the rates replaced.
    ///
    /// # Errors
    /// Returns `SimulationError::InvalidParameter` for a custom model, which
    /// has no rate parameters.
    pub fn with_rates(&self, lambda_d: f64, lambda_l: f64) -> Result<Self, SimulationError> {
        match self {
            Self::SiFit3 { .. } => Ok(Self::SiFit3 { lambda_d, lambda_l }),
            Self::SiFit5 { .. } => Ok(Self::SiFit5 { lambda_d, lambda_l }),
            Self::Custom { .. } => Err(SimulationError::InvalidParameter(
                "a rate prior cannot be applied to a custom model".into(),
            )),
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self::SiFit3 {
            lambda_d: 3.0,
            lambda_l: 2.0,
        }
    }
}

impl ExecutionConfig {
    /// Create a new execution configuration with a single replicate.
    pub fn new(length: usize, mode: MutationMode, seed: Option<u64>) -> Self {
        Self {
            length,
            mode,
            seed,
            replicates: 1,
            rate_prior: None,
        }
    }
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self::new(10, MutationMode::Expm, None)
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            tree: DEFAULT_TREE.to_string(),
            model: ModelConfig::default(),
            execution: ExecutionConfig::default(),
        }
    }
}

impl Configuration {
    /// Load a configuration from a JSON file.
    ///
    /// # Errors
    /// Returns a `ConfigError` if the file cannot be read or is not a valid
    /// configuration document.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Parse a configuration from JSON text.
    ///
    /// # Errors
    /// Returns `ConfigError::Json` if the text is not a configuration document.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Serialize as pretty-printed JSON.
    ///
    /// # Errors
    /// Returns `ConfigError::Json` if serialization fails.
    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the configuration as JSON to `path`.
    ///
    /// # Errors
    /// Returns a `ConfigError` if the file cannot be written.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        fs::write(path, self.to_json_string()?).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })
    }

    /// Check every setting and return the parsed tree.
    ///
    /// Nothing here consumes randomness, so a configuration is always fully
    /// checked before the first draw.
    ///
    /// # Errors
    /// Returns the first problem found as a `SimulationError`.
    pub fn validate(&self) -> Result<Tree, SimulationError> {
        let tree = Tree::from_newick(&self.tree)?;
        tree.validate()?;

        self.model.build()?;

        if self.execution.replicates == 0 {
            return Err(SimulationError::InvalidParameter(
                "replicates must be at least 1".into(),
            ));
        }
        if let Some(prior) = &self.execution.rate_prior {
            prior.validate()?;
            if self.model.rates().is_none() {
                return Err(SimulationError::InvalidParameter(
                    "a rate prior cannot be applied to a custom model".into(),
                ));
            }
        }

        Ok(tree)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;

    #[test]
    fn test_default_configuration_is_valid() {
        let config = Configuration::default();
        let tree = config.validate().unwrap();
        assert_eq!(tree.len(), 5);
        assert_eq!(config.execution.replicates, 1);
    }

    #[test]
    fn test_configuration_json_roundtrip() {
        let mut config = Configuration::default();
        config.execution.seed = Some(7);
        config.execution.rate_prior = Some(RatePrior::LogNormal {
            mu: 0.0,
            sigma: 0.5,
        });
        let json = config.to_json_string().unwrap();
        assert!(json.contains("\"type\": \"SiFit3\""));
        assert!(json.contains("\"distribution\": \"LogNormal\""));
        let back = Configuration::from_json_str(&json).unwrap();
        assert_eq!(back, config);
    }

    #[test]
    fn test_configuration_defaults_when_missing() {
        let json = r#"{
            "tree": "(A:1,B:1)R;",
            "model": {"type": "SiFit5", "lambda_d": 1.0, "lambda_l": 0.5},
            "execution": {"length": 25}
        }"#;
        let config = Configuration::from_json_str(json).unwrap();
        assert_eq!(config.execution.mode, MutationMode::Expm);
        assert_eq!(config.execution.seed, None);
        assert_eq!(config.execution.replicates, 1);
        assert!(config.execution.rate_prior.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_configuration_custom_model() {
        let json = r#"{
            "tree": "(A:1,B:1)R;",
            "model": {"type": "Custom", "states": "AB",
                      "frequencies": [0.5, 0.5], "rates": [[-1, 1], [1, -1]]},
            "execution": {"length": 4, "mode": "poisson"}
        }"#;
        let config = Configuration::from_json_str(json).unwrap();
        config.validate().unwrap();
        let model = config.model.build().unwrap();
        assert_eq!(model.alphabet().chars(), &['A', 'B']);
    }

    #[test]
    fn test_validate_rejects_bad_model() {
        let config = Configuration {
            model: ModelConfig::SiFit3 {
                lambda_d: -1.0,
                lambda_l: 2.0,
            },
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(SimulationError::Model(ModelError::InvalidParameter { .. }))
        ));
    }

    #[test]
    fn test_validate_rejects_bad_tree() {
        let config = Configuration {
            tree: "(A:1,A:1)R;".into(),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(SimulationError::InvalidTree(_))
        ));

        let config = Configuration {
            tree: "(A:1,B:1".into(),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(SimulationError::Newick(_))
        ));
    }

    #[test]
    fn test_validate_rejects_zero_replicates() {
        let mut config = Configuration::default();
        config.execution.replicates = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_prior_on_custom_model() {
        let mut config = Configuration {
            model: ModelConfig::Custom {
                states: "AB".into(),
                frequencies: vec![0.5, 0.5],
                rates: vec![vec![-1.0, 1.0], vec![1.0, -1.0]],
            },
            ..Default::default()
        };
        config.execution.rate_prior = Some(RatePrior::LogNormal {
            mu: 0.0,
            sigma: 1.0,
        });
        assert!(matches!(
            config.validate(),
            Err(SimulationError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_rate_prior_sample_positive_and_seeded() {
        let prior = RatePrior::LogNormal {
            mu: 0.5,
            sigma: 0.25,
        };
        let mut rng1 = Xoshiro256PlusPlus::seed_from_u64(3);
        let mut rng2 = Xoshiro256PlusPlus::seed_from_u64(3);
        let (d, l) = prior.sample(&mut rng1).unwrap();
        assert!(d > 0.0 && l > 0.0);
        assert_ne!(d, l);
        assert_eq!(prior.sample(&mut rng2).unwrap(), (d, l));
    }

    #[test]
    fn test_rate_prior_zero_sigma_is_constant() {
        let prior = RatePrior::LogNormal {
            mu: 1.0,
            sigma: 0.0,
        };
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(0);
        let (d, l) = prior.sample(&mut rng).unwrap();
        assert!((d - 1f64.exp()).abs() < 1e-12);
        assert!((l - 1f64.exp()).abs() < 1e-12);
    }

    #[test]
    fn test_rate_prior_invalid() {
        let prior = RatePrior::LogNormal {
            mu: 0.0,
            sigma: -1.0,
        };
        assert!(prior.validate().is_err());
    }

    #[test]
    fn test_model_config_with_rates() {
        let model = ModelConfig::default().with_rates(1.0, 4.0).unwrap();
        assert_eq!(model.rates(), Some((1.0, 4.0)));
        assert!(matches!(model, ModelConfig::SiFit3 { .. }));
    }

    #[test]
    fn test_from_json_file_missing() {
        let err = Configuration::from_json_file("/nonexistent/treesim.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
