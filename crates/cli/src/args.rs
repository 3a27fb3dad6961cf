use clap::{Args, ValueEnum};
use std::path::PathBuf;
use treesim_sim::evolution::MutationMode;

use crate::defaults;

/// Built-in substitution models selectable from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ModelKind {
    /// Three-state SiFit model (alphabet 0,1,2)
    Sifit3,
    /// Five-state SiFit genotype model with absorbing states 0 and 3
    Sifit5,
}

/// Output format of simulated sequences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// replicate,lambda_d,lambda_l,node,sequence
    Csv,
    /// One record per node, headers carry the replicate
    Fasta,
    /// Array of replicate objects
    Json,
}

/// Report format for `compare`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    Pretty,
    Json,
}

#[derive(Args, Debug)]
pub struct SimulateArgs {
    /// Newick tree text, e.g. "((A:0.5,B:0.5)D:0.5,C:1)E;"
    #[arg(long, conflicts_with_all = ["tree_file", "config"])]
    pub tree: Option<String>,

    /// File holding a newick tree
    #[arg(long, conflicts_with = "config")]
    pub tree_file: Option<PathBuf>,

    /// JSON configuration file (see `treesim init`)
    ///
    /// Flags given alongside override the corresponding configuration values.
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Substitution model
    #[arg(long, value_enum)]
    pub model: Option<ModelKind>,

    /// Deletion rate of the SiFit model
    #[arg(long)]
    pub lambda_d: Option<f64>,

    /// LOH rate of the SiFit model
    #[arg(long)]
    pub lambda_l: Option<f64>,

    /// Number of sites per sequence
    #[arg(short = 'L', long)]
    pub length: Option<usize>,

    /// Mutation mode: expm (transition matrix) or poisson (event by event)
    #[arg(short, long)]
    pub mode: Option<MutationMode>,

    /// Random seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// Number of replicates
    #[arg(short = 'n', long)]
    pub replicates: Option<usize>,

    /// Draw both SiFit rates per replicate from LogNormal(mu, sigma)
    #[arg(long, requires = "lognormal_sigma")]
    pub lognormal_mu: Option<f64>,

    /// Scale of the lognormal rate prior
    #[arg(long, requires = "lognormal_mu")]
    pub lognormal_sigma: Option<f64>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Csv)]
    pub format: OutputFormat,

    /// Output file (stdout if omitted)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Show a progress bar over replicates
    #[arg(long)]
    pub progress: bool,
}

#[derive(Args, Debug)]
pub struct CompareArgs {
    /// Branch length to mutate across
    #[arg(short, long, default_value_t = defaults::COMPARE_TIME)]
    pub time: f64,

    /// Number of sites of the ancestor
    #[arg(short = 'L', long, default_value_t = defaults::COMPARE_LENGTH)]
    pub length: usize,

    /// Number of trials per mode
    #[arg(short = 'n', long, default_value_t = defaults::COMPARE_TRIALS)]
    pub trials: usize,

    /// Deletion rate of the SiFit model
    #[arg(long, default_value_t = defaults::LAMBDA_D)]
    pub lambda_d: f64,

    /// LOH rate of the SiFit model
    #[arg(long, default_value_t = defaults::LAMBDA_L)]
    pub lambda_l: f64,

    /// Random seed
    #[arg(long)]
    pub seed: Option<u64>,

    /// Report format
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Pretty)]
    pub format: ReportFormat,
}

#[derive(Args, Debug)]
pub struct ModelArgs {
    /// Substitution model
    #[arg(long, value_enum, default_value_t = ModelKind::Sifit3)]
    pub model: ModelKind,

    /// Deletion rate of the SiFit model
    #[arg(long, default_value_t = defaults::LAMBDA_D)]
    pub lambda_d: f64,

    /// LOH rate of the SiFit model
    #[arg(long, default_value_t = defaults::LAMBDA_L)]
    pub lambda_l: f64,

    /// Branch length at which to print P(t)
    #[arg(short, long, default_value_t = defaults::MODEL_TIME)]
    pub time: f64,
}

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Output configuration path
    #[arg(short, long, default_value = defaults::CONFIG_PATH)]
    pub output: PathBuf,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}
