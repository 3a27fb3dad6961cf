mod args;
mod commands;
pub mod defaults;
mod printing;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use args::{CompareArgs, InitArgs, ModelArgs, SimulateArgs};
use commands::{compare, init, model, simulate};

/// Treesim: sequence evolution along a phylogenetic tree
///
/// Generates a root sequence from the equilibrium frequencies of a
/// continuous-time substitution model and evolves it down every branch of
/// a newick tree, either through the transition matrix P(t) = exp(Qt) or
/// by simulating the substitution process event by event.
#[derive(Parser, Debug)]
#[command(name = "treesim")]
#[command(author, version, about = "Simulates sequence evolution along a tree", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    ///
    /// `RUST_LOG` overrides this when set.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Simulate sequences for every node of a tree.
    ///
    /// The tree comes from --tree, --tree-file or a configuration file
    /// written by `treesim init`.
    Simulate(Box<SimulateArgs>),

    /// Benchmark both mutation modes against theory.
    ///
    /// Mutates one stationary ancestor many times with each mode and reports
    /// observed against expected differing sites and event counts.
    Compare(CompareArgs),

    /// Print a substitution model: alphabet, frequencies, generator and P(t).
    Model(ModelArgs),

    /// Write a default configuration file to edit and pass to `simulate`.
    Init(InitArgs),
}

fn setup_logging(verbosity: u8) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true);

    tracing_subscriber::registry()
        .with(fmt_layer.with_filter(filter))
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    match cli.command {
        Commands::Simulate(args) => simulate::run_simulation(&args)?,
        Commands::Compare(args) => compare::compare_modes(&args)?,
        Commands::Model(args) => model::show_model(&args)?,
        Commands::Init(args) => init::init_config(&args)?,
    }

    Ok(())
}
