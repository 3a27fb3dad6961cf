use anyhow::{bail, Result};
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;
use treesim_analysis::compare_modes as run_comparison;
use treesim_sim::evolution::{generate_sequence, SiFit3, SubstitutionModel};

use crate::args::{CompareArgs, ReportFormat};
use crate::printing::print_comparison;

pub fn compare_modes(args: &CompareArgs) -> Result<()> {
    if args.trials == 0 {
        bail!("--trials must be at least 1");
    }

    let model = SiFit3::new(args.lambda_d, args.lambda_l)?;
    let mut rng = match args.seed {
        Some(seed) => Xoshiro256PlusPlus::seed_from_u64(seed),
        None => Xoshiro256PlusPlus::from_rng(&mut rand::rng()),
    };

    let ancestor = generate_sequence(args.length, &model.pi(), &mut rng);
    let report = run_comparison(&model, &ancestor, args.time, args.trials, &mut rng)?;

    match args.format {
        ReportFormat::Pretty => print_comparison(&report),
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }

    Ok(())
}
