use anyhow::{bail, Result};
use treesim_sim::evolution::{SiFit3, SiFit5, SubstitutionModel};

use crate::args::{ModelArgs, ModelKind};
use crate::printing::print_model;

pub fn show_model(args: &ModelArgs) -> Result<()> {
    if !args.time.is_finite() || args.time < 0.0 {
        bail!("--time must be a finite, non-negative branch length");
    }

    match args.model {
        ModelKind::Sifit3 => {
            let model = SiFit3::new(args.lambda_d, args.lambda_l)?;
            print_model(&model, model.beta(), args.time);
        }
        ModelKind::Sifit5 => {
            let model = SiFit5::new(args.lambda_d, args.lambda_l)?;
            print_model(&model, model.beta(), args.time);
        }
    }

    Ok(())
}
