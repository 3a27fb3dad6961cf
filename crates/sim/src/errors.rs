use thiserror::Error;

/// Errors raised while constructing a substitution model.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    /// A rate parameter was zero, negative, or not finite.
    #[error("Invalid model parameter {name}: {value} (must be finite and greater than zero)")]
    InvalidParameter { name: &'static str, value: f64 },

    /// The supplied matrix is not a valid infinitesimal generator.
    #[error("Invalid rate matrix: {0}")]
    InvalidRateMatrix(String),

    /// The state alphabet is empty or contains duplicate symbols.
    #[error("Invalid alphabet: {0}")]
    InvalidAlphabet(String),

    /// The supplied equilibrium frequencies are not a probability vector.
    #[error("Invalid equilibrium frequencies: {0}")]
    InvalidFrequencies(String),
}

/// Errors raised while reading a newick tree description.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NewickError {
    /// A character other than the expected one was found.
    #[error("Unexpected character {found:?} at position {position} (expected {expected})")]
    UnexpectedChar {
        position: usize,
        found: char,
        expected: &'static str,
    },

    /// Input ended before the tree was complete.
    #[error("Unexpected end of input (expected {expected})")]
    UnexpectedEnd { expected: &'static str },

    /// A branch length could not be parsed as a number.
    #[error("Invalid branch length {text:?} at position {position}")]
    InvalidBranchLength { position: usize, text: String },

    /// Non-whitespace input follows the terminating semicolon.
    #[error("Unexpected input after ';' at position {position}")]
    TrailingInput { position: usize },
}

/// Errors that can occur while configuring or running a tree simulation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
    /// An invalid parameter value was provided.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// A required parameter is missing.
    #[error("Missing required parameter: {0}")]
    MissingRequired(&'static str),

    /// The tree cannot be simulated on (no root, unnamed or duplicate nodes, bad lengths).
    #[error("Invalid tree: {0}")]
    InvalidTree(String),

    /// A node was scheduled before its ancestor's sequence existed.
    #[error("Invalid traversal: {0}")]
    InvalidTraversal(String),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Newick(#[from] NewickError),
}

/// Errors raised while loading or saving a configuration document.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read or written.
    #[error("IO error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The document is not valid configuration JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The document parsed but describes an invalid simulation.
    #[error(transparent)]
    Invalid(#[from] SimulationError),
}
