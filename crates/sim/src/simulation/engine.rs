use crate::base::Sequence;
use crate::errors::SimulationError;
use crate::evolution::{generate_sequence, mutate, MutationMode, SubstitutionModel};
use crate::simulation::Configuration;
use crate::tree::{NodeId, Tree};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Sequences simulated along one tree.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct TreeSimulation {
    /// Node name to rendered sequence, one entry per node.
    pub sequences: BTreeMap<String, String>,
    /// Node name to the number of events on the branch above it.
    /// Only filled in Poisson mode.
    pub events: BTreeMap<String, usize>,
}

impl TreeSimulation {
    /// Total number of events over all branches.
    pub fn total_events(&self) -> usize {
        self.events.values().sum()
    }
}

/// Propagates a stationary root sequence down a tree.
///
/// Nodes are processed depth first from an explicit worklist: the list starts
/// with the root's children, the last entry is taken next, and a processed
/// node's children are appended in declaration order. Every node is mutated
/// from its parent's sequence only, and the parent is always finished first.
#[derive(Debug)]
pub struct TreeSimulator<'a, M: SubstitutionModel + ?Sized> {
    tree: &'a Tree,
    model: &'a M,
    length: usize,
    mode: MutationMode,
}

impl<'a, M: SubstitutionModel + ?Sized> TreeSimulator<'a, M> {
    pub fn new(tree: &'a Tree, model: &'a M, length: usize, mode: MutationMode) -> Self {
        Self {
            tree,
            model,
            length,
            mode,
        }
    }

    /// Simulate one set of sequences.
    ///
    /// The tree is validated before any random draw.
    ///
    /// # Errors
    /// Returns `SimulationError::InvalidTree` for a tree without a named root
    /// or with unnamed or duplicate nodes, and `SimulationError::InvalidTraversal`
    /// if a node is reached before its parent.
    pub fn run<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<TreeSimulation, SimulationError> {
        let root = self.tree.validate()?;
        info!(
            model = self.model.name(),
            nodes = self.tree.len(),
            length = self.length,
            mode = %self.mode,
            "simulating sequences along tree"
        );

        let mut sequences: Vec<Option<Sequence>> = vec![None; self.tree.len()];
        sequences[root.index()] = Some(generate_sequence(self.length, &self.model.pi(), rng));

        let mut events = BTreeMap::new();
        let mut worklist: Vec<NodeId> = self.tree.node(root).children().to_vec();

        while let Some(id) = worklist.pop() {
            let node = self.tree.node(id);
            let name = self.name(id)?;

            let ancestor = node
                .parent()
                .and_then(|p| sequences[p.index()].as_ref())
                .ok_or_else(|| {
                    SimulationError::InvalidTraversal(format!(
                        "node '{name}' was reached before its ancestor"
                    ))
                })?;

            let outcome = mutate(ancestor, self.model, node.length(), self.mode, rng)?;
            debug!(
                node = name,
                branch_length = node.length(),
                events = ?outcome.events,
                "mutated branch"
            );

            if let Some(n) = outcome.events {
                events.insert(name.to_string(), n);
            }
            sequences[id.index()] = Some(outcome.sequence);
            worklist.extend_from_slice(node.children());
        }

        let alphabet = self.model.alphabet();
        let mut rendered = BTreeMap::new();
        for (id, _) in self.tree.iter() {
            let name = self.name(id)?;
            let seq = sequences[id.index()].as_ref().ok_or_else(|| {
                SimulationError::InvalidTraversal(format!("node '{name}' was never reached"))
            })?;
            rendered.insert(name.to_string(), seq.render(alphabet));
        }

        info!(sequences = rendered.len(), "tree simulation finished");
        Ok(TreeSimulation {
            sequences: rendered,
            events,
        })
    }

    fn name(&self, id: NodeId) -> Result<&'a str, SimulationError> {
        self.tree
            .node(id)
            .name()
            .ok_or_else(|| SimulationError::InvalidTree(format!("node {id} has no name")))
    }
}

/// Simulate sequences along `tree` and return the node name to sequence map.
///
/// # Errors
/// See [`TreeSimulator::run`].
pub fn simulate_tree<M, R>(
    tree: &Tree,
    model: &M,
    length: usize,
    mode: MutationMode,
    rng: &mut R,
) -> Result<BTreeMap<String, String>, SimulationError>
where
    M: SubstitutionModel + ?Sized,
    R: Rng + ?Sized,
{
    Ok(TreeSimulator::new(tree, model, length, mode).run(rng)?.sequences)
}

/// Output of one replicate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplicateResult {
    pub replicate: usize,
    /// Rates the replicate ran with; `None` for custom models.
    pub lambda_d: Option<f64>,
    pub lambda_l: Option<f64>,
    pub sequences: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub events: BTreeMap<String, usize>,
}

/// A configured run of one or more replicates sharing one random stream.
#[derive(Debug)]
pub struct Simulation {
    config: Configuration,
    tree: Tree,
    rng: Xoshiro256PlusPlus,
    next_replicate: usize,
}

impl Simulation {
    /// Validate `config` and seed the generator.
    ///
    /// # Errors
    /// Returns the validation error of `config`.
    pub fn new(config: Configuration) -> Result<Self, SimulationError> {
        let tree = config.validate()?;

        // Create RNG from seed or thread_rng
        let rng = match config.execution.seed {
            Some(seed) => Xoshiro256PlusPlus::seed_from_u64(seed),
            None => Xoshiro256PlusPlus::from_rng(&mut rand::rng()),
        };

        Ok(Self {
            config,
            tree,
            rng,
            next_replicate: 0,
        })
    }

    pub fn config(&self) -> &Configuration {
        &self.config
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    /// Number of replicates already run.
    pub fn completed(&self) -> usize {
        self.next_replicate
    }

    /// Whether every configured replicate has run.
    pub fn is_finished(&self) -> bool {
        self.next_replicate >= self.config.execution.replicates
    }

    /// Run the next replicate.
    ///
    /// With a rate prior, the replicate's rates are drawn first and the model
    /// is rebuilt from them.
    ///
    /// # Errors
    /// Returns a `SimulationError` if the drawn rates produce an invalid model
    /// or the simulation fails.
    pub fn run_replicate(&mut self) -> Result<ReplicateResult, SimulationError> {
        let replicate = self.next_replicate;
        let model_config = match &self.config.execution.rate_prior {
            Some(prior) => {
                let (lambda_d, lambda_l) = prior.sample(&mut self.rng)?;
                debug!(replicate, lambda_d, lambda_l, "drew replicate rates");
                self.config.model.with_rates(lambda_d, lambda_l)?
            }
            None => self.config.model.clone(),
        };
        let model = model_config.build()?;

        let execution = &self.config.execution;
        let simulation = TreeSimulator::new(&self.tree, model.as_ref(), execution.length, execution.mode)
            .run(&mut self.rng)?;

        self.next_replicate += 1;
        let rates = model_config.rates();
        Ok(ReplicateResult {
            replicate,
            lambda_d: rates.map(|(d, _)| d),
            lambda_l: rates.map(|(_, l)| l),
            sequences: simulation.sequences,
            events: simulation.events,
        })
    }

    /// Run all remaining replicates.
    ///
    /// # Errors
    /// Stops at and returns the first failing replicate's error.
    pub fn run(&mut self) -> Result<Vec<ReplicateResult>, SimulationError> {
        let mut results = Vec::with_capacity(self.config.execution.replicates);
        while !self.is_finished() {
            results.push(self.run_replicate()?);
        }
        Ok(results)
    }
}
