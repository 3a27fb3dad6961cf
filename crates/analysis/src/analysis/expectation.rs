//! Theoretical expectations under a substitution model
//!
//! Closed-form or numerically integrated quantities that simulated sequences
//! are checked against.

use nalgebra::DVector;
use treesim_sim::base::Sequence;
use treesim_sim::evolution::SubstitutionModel;

/// Number of Simpson intervals used to integrate the event rate.
const SIMPSON_INTERVALS: usize = 64;

/// Expected number of sites that differ from `ancestor` after time `t`:
/// Σ over sites of 1 − P(t)[s, s].
pub fn expected_differences<M>(model: &M, ancestor: &Sequence, t: f64) -> f64
where
    M: SubstitutionModel + ?Sized,
{
    let p = model.p(t);
    ancestor
        .as_slice()
        .iter()
        .map(|&s| 1.0 - p[(s as usize, s as usize)])
        .sum()
}

/// Expected number of substitution events along a branch of length `t`
/// starting from `ancestor`.
///
/// For a site starting in state `s` this is ∫₀ᵗ (P(u) h)[s] du where `h` is
/// the vector of holding rates, integrated with the composite Simpson rule.
/// From a stationary ancestor the result is `len · t`, since the mean rate
/// is normalized to one.
pub fn expected_events<M>(model: &M, ancestor: &Sequence, t: f64) -> f64
where
    M: SubstitutionModel + ?Sized,
{
    let per_state = integrated_event_rates(model, t);
    ancestor
        .as_slice()
        .iter()
        .map(|&s| per_state[s as usize])
        .sum()
}

/// ∫₀ᵗ P(u) h du for every starting state.
fn integrated_event_rates<M>(model: &M, t: f64) -> DVector<f64>
where
    M: SubstitutionModel + ?Sized,
{
    let holding = model.holding_rates();
    let n = holding.len();
    if t <= 0.0 {
        return DVector::zeros(n);
    }

    let step = t / SIMPSON_INTERVALS as f64;
    let mut integral = DVector::zeros(n);
    for k in 0..=SIMPSON_INTERVALS {
        let weight = if k == 0 || k == SIMPSON_INTERVALS {
            1.0
        } else if k % 2 == 1 {
            4.0
        } else {
            2.0
        };
        integral += model.p(k as f64 * step) * &holding * weight;
    }
    integral * (step / 3.0)
}
