//! Mutation of sequences along a branch.
//!
//! Two interchangeable procedures evolve every site of a sequence for an
//! elapsed time `t` under a [`SubstitutionModel`]:
//!
//! ## Matrix exponentiation
//! P(t) = exp(Q t) is computed once and each site draws its new state from
//! row `P(t)[state, :]`. One uniform draw per site.
//!
//! ## Poisson process
//! The jump chain is reconstructed explicitly. At a site in state `s` with
//! time `τ` left, the number of events at `s`'s holding rate is drawn from
//! Poisson(h_s τ). If it is zero the site is done; otherwise the first of
//! those events is placed at τ(1 − U^{1/N}), the site jumps according to the
//! jump distribution of `s`, and the process restarts from the new state with
//! the time that remains. Both the rate and the jump distribution are always
//! those of the current state, so the final state has exactly the law of
//! P(t) and the number of jumps is the number of substitution events.
//!
//! Sites evolve independently. States with no outgoing rate are absorbing
//! and consume no random draws.

use super::model::SubstitutionModel;
use super::sampling::sample_index;
use crate::base::Sequence;
use crate::errors::SimulationError;
use nalgebra::DMatrix;
use rand::Rng;
use rand_distr::{Distribution, Poisson};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Strategy used to evolve sites along a branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MutationMode {
    /// Draw each site's state from the transition matrix P(t).
    #[default]
    Expm,
    /// Simulate the jump chain with Poisson-distributed event counts.
    Poisson,
}

impl fmt::Display for MutationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Expm => write!(f, "expm"),
            Self::Poisson => write!(f, "poisson"),
        }
    }
}

impl FromStr for MutationMode {
    type Err = SimulationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "expm" | "matrix" => Ok(Self::Expm),
            "poisson" => Ok(Self::Poisson),
            other => Err(SimulationError::InvalidParameter(format!(
                "unknown mutation mode '{other}' (expected 'expm' or 'poisson')"
            ))),
        }
    }
}

/// Result of mutating one sequence along one branch.
#[derive(Debug, Clone, PartialEq)]
pub struct MutationOutcome {
    /// The descendant sequence.
    pub sequence: Sequence,
    /// Number of substitution events; only known in Poisson mode.
    pub events: Option<usize>,
}

/// Jump distribution of `state`: the off-diagonal entries of row `state` of
/// `q`, renormalized to sum to 1.
///
/// Returns `None` when the state has no outgoing rate (absorbing).
pub fn jump_distribution(q: &DMatrix<f64>, state: usize) -> Option<Vec<f64>> {
    let mut row: Vec<f64> = q.row(state).iter().copied().collect();
    row[state] = 0.0;
    let total: f64 = row.iter().sum();
    if !(total.is_finite() && total > 0.0) {
        return None;
    }
    for w in &mut row {
        *w /= total;
    }
    Some(row)
}

/// Holding rates and jump distributions of every state of a model.
///
/// Built once per branch so each site only pays for its own draws.
#[derive(Debug, Clone)]
pub struct JumpChain {
    holding: Vec<f64>,
    jumps: Vec<Option<Vec<f64>>>,
}

impl JumpChain {
    pub fn new<M: SubstitutionModel + ?Sized>(model: &M) -> Self {
        Self::from_generator(&model.q())
    }

    pub fn from_generator(q: &DMatrix<f64>) -> Self {
        let n = q.nrows();
        let holding = (0..n).map(|i| (-q[(i, i)]).max(0.0)).collect();
        let jumps = (0..n).map(|i| jump_distribution(q, i)).collect();
        Self { holding, jumps }
    }

    /// Number of states.
    pub fn len(&self) -> usize {
        self.holding.len()
    }

    pub fn is_empty(&self) -> bool {
        self.holding.is_empty()
    }

    /// Holding rate of `state`.
    pub fn holding_rate(&self, state: usize) -> f64 {
        self.holding[state]
    }

    /// Whether `state` has no outgoing transitions.
    pub fn is_absorbing(&self, state: usize) -> bool {
        self.holding[state] <= 0.0 || self.jumps[state].is_none()
    }

    /// Evolve one site from `state` for time `t`.
    ///
    /// Returns the final state and the number of jumps made.
    ///
    /// # Errors
    /// Returns `SimulationError::InvalidParameter` if an event count cannot be
    /// drawn for the current holding rate.
    pub fn evolve_site<R: Rng + ?Sized>(
        &self,
        state: u8,
        t: f64,
        rng: &mut R,
    ) -> Result<(u8, usize), SimulationError> {
        let mut current = state as usize;
        let mut remaining = t;
        let mut jumps = 0;

        while remaining > 0.0 {
            let Some(targets) = &self.jumps[current] else {
                break;
            };
            let rate = self.holding[current];
            if rate <= 0.0 {
                break;
            }

            let count = draw_event_count(rate * remaining, rng)?;
            if count == 0 {
                break;
            }

            let u: f64 = rng.random();
            remaining *= u.powf(1.0 / count as f64);
            current = sample_index(targets, rng);
            jumps += 1;
        }

        Ok((current as u8, jumps))
    }
}

fn draw_event_count<R: Rng + ?Sized>(expected: f64, rng: &mut R) -> Result<u64, SimulationError> {
    // rate * time can underflow to zero on tiny branches
    if expected == 0.0 {
        return Ok(0);
    }
    let poisson = Poisson::new(expected).map_err(|e| {
        SimulationError::InvalidParameter(format!("cannot draw events at rate {expected}: {e}"))
    })?;
    Ok(poisson.sample(rng) as u64)
}

fn check_branch(sequence: &Sequence, states: usize, t: f64) -> Result<(), SimulationError> {
    if !(t.is_finite() && t >= 0.0) {
        return Err(SimulationError::InvalidParameter(format!(
            "elapsed time must be finite and non-negative, got {t}"
        )));
    }
    if let Some(s) = sequence.as_slice().iter().find(|&&s| s as usize >= states) {
        return Err(SimulationError::InvalidParameter(format!(
            "state {s} is outside a {states}-state model"
        )));
    }
    Ok(())
}

/// Mutate `sequence` for time `t` by sampling every site from P(t).
///
/// # Errors
/// Returns `SimulationError::InvalidParameter` if `t` is negative or not
/// finite, or the sequence holds a state the model does not have.
pub fn mutate_expm<M, R>(
    sequence: &Sequence,
    model: &M,
    t: f64,
    rng: &mut R,
) -> Result<Sequence, SimulationError>
where
    M: SubstitutionModel + ?Sized,
    R: Rng + ?Sized,
{
    let n = model.state_count();
    check_branch(sequence, n, t)?;

    let p = model.p(t);
    let rows: Vec<Vec<f64>> = (0..n).map(|i| p.row(i).iter().copied().collect()).collect();

    let mut mutated = Sequence::with_capacity(sequence.len());
    for &state in sequence.as_slice() {
        mutated.push(sample_index(&rows[state as usize], rng) as u8);
    }
    Ok(mutated)
}

/// Mutate `sequence` for time `t` by simulating the jump chain at each site.
///
/// Returns the descendant sequence and the total number of events. The count
/// is Poisson(L·t·rate) only when every state has the same holding rate;
/// with unequal holding rates (as in SiFit3) it is overdispersed, with a
/// variance above its mean.
///
/// # Errors
/// Returns `SimulationError::InvalidParameter` if `t` is negative or not
/// finite, or the sequence holds a state the model does not have.
pub fn mutate_poisson<M, R>(
    sequence: &Sequence,
    model: &M,
    t: f64,
    rng: &mut R,
) -> Result<(Sequence, usize), SimulationError>
where
    M: SubstitutionModel + ?Sized,
    R: Rng + ?Sized,
{
    check_branch(sequence, model.state_count(), t)?;
    let chain = JumpChain::new(model);

    let mut mutated = Sequence::with_capacity(sequence.len());
    let mut events = 0;
    for &state in sequence.as_slice() {
        let (next, jumps) = chain.evolve_site(state, t, rng)?;
        mutated.push(next);
        events += jumps;
    }
    Ok((mutated, events))
}

/// Mutate `sequence` for time `t` using `mode`.
///
/// # Errors
/// See [`mutate_expm`] and [`mutate_poisson`].
pub fn mutate<M, R>(
    sequence: &Sequence,
    model: &M,
    t: f64,
    mode: MutationMode,
    rng: &mut R,
) -> Result<MutationOutcome, SimulationError>
where
    M: SubstitutionModel + ?Sized,
    R: Rng + ?Sized,
{
    match mode {
        MutationMode::Expm => Ok(MutationOutcome {
            sequence: mutate_expm(sequence, model, t, rng)?,
            events: None,
        }),
        MutationMode::Poisson => {
            let (sequence, events) = mutate_poisson(sequence, model, t, rng)?;
            Ok(MutationOutcome {
                sequence,
                events: Some(events),
            })
        }
    }
}
