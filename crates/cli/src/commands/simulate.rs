use anyhow::{bail, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use std::fmt::Write as _;
use std::fs;
use treesim_sim::simulation::{
    Configuration, ModelConfig, RatePrior, ReplicateResult, Simulation,
};
use tracing::info;

use crate::args::{ModelKind, OutputFormat, SimulateArgs};
use crate::defaults;
use crate::printing::print_configuration;

pub fn run_simulation(args: &SimulateArgs) -> Result<()> {
    let config = build_configuration(args)?;
    let mut sim = Simulation::new(config).context("Invalid simulation setup")?;
    let replicates = sim.config().execution.replicates;
    info!(replicates, nodes = sim.tree().len(), "starting simulation");

    if args.output.is_some() {
        println!("🌳 Treesim - Simulating Sequences");
        println!("============================================");
        print_configuration(sim.config());
    }

    let pb = if args.progress {
        let pb = ProgressBar::new(replicates as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
                .progress_chars("#>-"),
        );
        Some(pb)
    } else {
        None
    };

    let mut results = Vec::with_capacity(replicates);
    while !sim.is_finished() {
        let replicate = sim.completed();
        let result = sim
            .run_replicate()
            .with_context(|| format!("Replicate {replicate} failed"))?;
        results.push(result);
        if let Some(pb) = &pb {
            pb.inc(1);
        }
    }
    if let Some(pb) = pb {
        pb.finish_and_clear();
    }

    let content = match args.format {
        OutputFormat::Csv => render_csv(&results),
        OutputFormat::Fasta => render_fasta(&results),
        OutputFormat::Json => {
            let mut json = serde_json::to_string_pretty(&results)?;
            json.push('\n');
            json
        }
    };

    if let Some(path) = &args.output {
        fs::write(path, content)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        println!("✓ {} replicate(s) written to: {}", results.len(), path.display());
    } else {
        print!("{content}");
    }

    Ok(())
}

/// Assemble the configuration from a config file (if any) and the flags.
fn build_configuration(args: &SimulateArgs) -> Result<Configuration> {
    let mut config = match &args.config {
        Some(path) => Configuration::from_json_file(path)
            .with_context(|| format!("Failed to load configuration {}", path.display()))?,
        None => Configuration::default(),
    };

    if let Some(tree) = &args.tree {
        config.tree = tree.clone();
    } else if let Some(path) = &args.tree_file {
        config.tree = fs::read_to_string(path)
            .with_context(|| format!("Failed to read tree file {}", path.display()))?
            .trim()
            .to_string();
    } else if args.config.is_none() {
        bail!("No tree given. Use --tree, --tree-file or --config");
    }

    config.model = override_model(&config.model, args)?;

    let execution = &mut config.execution;
    if let Some(length) = args.length {
        execution.length = length;
    }
    if let Some(mode) = args.mode {
        execution.mode = mode;
    }
    if args.seed.is_some() {
        execution.seed = args.seed;
    }
    if let Some(replicates) = args.replicates {
        execution.replicates = replicates;
    }
    if let (Some(mu), Some(sigma)) = (args.lognormal_mu, args.lognormal_sigma) {
        execution.rate_prior = Some(RatePrior::LogNormal { mu, sigma });
    }

    Ok(config)
}

fn override_model(current: &ModelConfig, args: &SimulateArgs) -> Result<ModelConfig> {
    if args.model.is_none() && args.lambda_d.is_none() && args.lambda_l.is_none() {
        return Ok(current.clone());
    }

    let (lambda_d, lambda_l) = match current.rates() {
        Some(rates) => rates,
        None if args.model.is_none() => {
            bail!("--lambda-d/--lambda-l do not apply to a custom model; pass --model as well")
        }
        None => (defaults::LAMBDA_D, defaults::LAMBDA_L),
    };
    let lambda_d = args.lambda_d.unwrap_or(lambda_d);
    let lambda_l = args.lambda_l.unwrap_or(lambda_l);

    Ok(match args.model {
        Some(ModelKind::Sifit3) => ModelConfig::SiFit3 { lambda_d, lambda_l },
        Some(ModelKind::Sifit5) => ModelConfig::SiFit5 { lambda_d, lambda_l },
        None => current.with_rates(lambda_d, lambda_l)?,
    })
}

fn format_rate(rate: Option<f64>) -> String {
    rate.map(|r| r.to_string()).unwrap_or_default()
}

fn render_csv(results: &[ReplicateResult]) -> String {
    let mut content = String::from("replicate,lambda_d,lambda_l,node,sequence\n");
    for result in results {
        let lambda_d = format_rate(result.lambda_d);
        let lambda_l = format_rate(result.lambda_l);
        for (node, sequence) in &result.sequences {
            let _ = writeln!(
                content,
                "{},{lambda_d},{lambda_l},{node},{sequence}",
                result.replicate
            );
        }
    }
    content
}

fn render_fasta(results: &[ReplicateResult]) -> String {
    let mut content = String::new();
    for result in results {
        for (node, sequence) in &result.sequences {
            let _ = writeln!(content, ">{node} replicate={}", result.replicate);
            let _ = writeln!(content, "{sequence}");
        }
    }
    content
}
