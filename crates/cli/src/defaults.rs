//! Shared default values for the command-line front end.

pub const CONFIG_PATH: &str = "treesim.json";

// SiFit rates
pub const LAMBDA_D: f64 = 3.0;
pub const LAMBDA_L: f64 = 2.0;

pub const COMPARE_TIME: f64 = 0.5;
pub const COMPARE_LENGTH: usize = 1000;
pub const COMPARE_TRIALS: usize = 200;

pub const MODEL_TIME: f64 = 1.0;
