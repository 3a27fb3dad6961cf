use anyhow::{bail, Context, Result};
use treesim_sim::simulation::Configuration;

use crate::args::InitArgs;
use crate::printing::print_configuration;

pub fn init_config(args: &InitArgs) -> Result<()> {
    println!("🌳 Treesim - Writing Configuration");
    println!("============================================");

    let output = &args.output;
    if output.exists() && !args.force {
        bail!(
            "{} already exists. Use --force to overwrite it",
            output.display()
        );
    }

    let config = Configuration::default();
    config
        .save(output)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    print_configuration(&config);
    println!("✓ Configuration written to: {}", output.display());
    println!("\nEdit it, then run:");
    println!("  treesim simulate --config {}", output.display());

    Ok(())
}
