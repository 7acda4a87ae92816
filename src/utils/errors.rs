use thiserror::Error;

/// `SimulationError` enumerates all possible errors returned by simlab
#[derive(Error, Debug)]
pub enum SimulationError {
    /// Represents a grid or automaton built with unusable dimensions
    #[error("Invalid dimensions {rows}x{cols}: {reason}")]
    InvalidDimensions {
        rows: usize,
        cols: usize,
        reason: &'static str,
    },

    /// Represents a probability configured outside of [0, 1]
    #[error("Probability `{name}` must be within [0, 1], but {value} was supplied")]
    InvalidProbability { name: &'static str, value: f64 },

    /// Represents a distribution or model parameter outside of its domain
    #[error("Parameter `{name}` is invalid ({value}): {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f64,
        reason: &'static str,
    },

    /// Represents a parameter string that could not be interpreted
    #[error("Unable to parse parameter `{input}`: {reason}")]
    ParameterParse { input: String, reason: &'static str },

    /// Represents a distribution name without a registered constructor
    #[error("Unsupported distribution `{name}` (expected one of: {expected})")]
    UnsupportedDistribution { name: String, expected: String },

    /// Represents a cell access outside of the grid
    #[error("Cell ({row}, {col}) is outside of the {rows}x{cols} grid")]
    CellOutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    /// Represents a request for more distinct initial infections than cells
    #[error("Cannot place {requested} distinct initial infections on {cells} cells")]
    TooManyInitialInfections { requested: usize, cells: usize },

    /// Represents an analysis requested on an empty set of points
    #[error("An empty sample was supplied where at least one point is required")]
    EmptySample,

    /// Represents a failed conversion to num-traits Float
    #[error("Failed to convert to a Float value")]
    FloatConvError,

    /// Represents a consistency check failing after a step - a defect, not
    /// a recoverable condition
    #[error("An internal invariant was violated: {0}")]
    InvariantViolation(String),

    /// Transparent serde_json errors
    #[error(transparent)]
    JSONError(#[from] serde_json::error::Error),

    /// Transparent serde_yaml errors
    #[error(transparent)]
    YAMLError(#[from] serde_yaml::Error),

    /// Transparent Gamma distribution errors
    #[error(transparent)]
    GammaError(#[from] rand_distr::GammaError),

    /// Transparent Normal distribution errors
    #[error(transparent)]
    NormalError(#[from] rand_distr::NormalError),

    /// Transparent Bernoulli distribution errors
    #[error(transparent)]
    BernoulliError(#[from] rand_distr::BernoulliError),

    /// Transparent Binomial distribution errors
    #[error(transparent)]
    BinomialError(#[from] rand_distr::BinomialError),

    /// Transparent Poisson distribution errors
    #[error(transparent)]
    PoissonError(#[from] rand_distr::PoissonError),
}
