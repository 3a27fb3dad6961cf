//! Benchmarking of the two mutation modes against each other and theory.

use super::expectation::{expected_differences, expected_events};
use super::utils::{count_diff, Summary};
use rand::Rng;
use serde::Serialize;
use tracing::debug;
use treesim_sim::base::Sequence;
use treesim_sim::errors::SimulationError;
use treesim_sim::evolution::{mutate_expm, mutate_poisson, SubstitutionModel};

/// Observed and expected statistics from repeatedly mutating one ancestor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModeComparison {
    pub model: String,
    pub time: f64,
    pub length: usize,
    pub trials: usize,
    /// Expected number of differing sites.
    pub expected_differences: f64,
    pub expm_differences: Summary,
    pub poisson_differences: Summary,
    /// Expected number of substitution events.
    pub expected_events: f64,
    pub poisson_events: Summary,
}

/// Mutate `ancestor` for time `t` `trials` times with each mode.
///
/// Each trial runs the matrix-exponentiation mode and then the Poisson mode
/// from the same ancestor.
///
/// # Errors
/// Returns the first mutation error.
pub fn compare_modes<M, R>(
    model: &M,
    ancestor: &Sequence,
    t: f64,
    trials: usize,
    rng: &mut R,
) -> Result<ModeComparison, SimulationError>
where
    M: SubstitutionModel + ?Sized,
    R: Rng + ?Sized,
{
    let mut expm_diffs = Vec::with_capacity(trials);
    let mut poisson_diffs = Vec::with_capacity(trials);
    let mut events = Vec::with_capacity(trials);

    for trial in 0..trials {
        let expm = mutate_expm(ancestor, model, t, rng)?;
        let (poisson, n) = mutate_poisson(ancestor, model, t, rng)?;

        expm_diffs.push(count_diff(ancestor.as_slice(), expm.as_slice()));
        poisson_diffs.push(count_diff(ancestor.as_slice(), poisson.as_slice()));
        events.push(n);
        debug!(trial, events = n, "compared mutation modes");
    }

    Ok(ModeComparison {
        model: model.name().to_string(),
        time: t,
        length: ancestor.len(),
        trials,
        expected_differences: expected_differences(model, ancestor, t),
        expm_differences: Summary::from_counts(&expm_diffs),
        poisson_differences: Summary::from_counts(&poisson_diffs),
        expected_events: expected_events(model, ancestor, t),
        poisson_events: Summary::from_counts(&events),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;
    use treesim_sim::evolution::{generate_sequence, SiFit3};

    #[test]
    fn test_compare_modes_against_expectation() {
        let model = SiFit3::new(3.0, 2.0).unwrap();
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(21);
        let ancestor = generate_sequence(500, &model.pi(), &mut rng);
        let report = compare_modes(&model, &ancestor, 0.5, 200, &mut rng).unwrap();

        assert_eq!(report.length, 500);
        assert_eq!(report.trials, 200);
        assert_eq!(report.model, "SiFit3");

        let tolerance = 0.05 * report.expected_differences;
        assert!((report.expm_differences.mean - report.expected_differences).abs() < tolerance);
        assert!((report.poisson_differences.mean - report.expected_differences).abs() < tolerance);
        assert!(
            (report.poisson_events.mean - report.expected_events).abs()
                < 0.05 * report.expected_events
        );
    }

    #[test]
    fn test_compare_modes_serializes() {
        let model = SiFit3::new(1.0, 1.0).unwrap();
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(2);
        let ancestor = Sequence::uniform(0, 10);
        let report = compare_modes(&model, &ancestor, 0.1, 3, &mut rng).unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["trials"], 3);
        assert!(json["poisson_events"]["variance"].is_number());
    }

    #[test]
    fn test_compare_modes_propagates_errors() {
        let model = SiFit3::new(1.0, 1.0).unwrap();
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(2);
        let ancestor = Sequence::uniform(0, 10);
        assert!(compare_modes(&model, &ancestor, -1.0, 3, &mut rng).is_err());
    }
}
