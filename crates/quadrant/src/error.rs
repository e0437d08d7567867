//! Error types for the calculator.

use std::fmt;

use quadrant_core::ParseError;
use quadrant_integrate::IntegrateError;
use quadrant_plot::PlotError;
use thiserror::Error;

/// Input validation failures.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    /// A required field was blank.
    #[error("{what} cannot be empty")]
    EmptyInput {
        /// Which input: `"function"`, `"lower bound"` or `"upper bound"`.
        what: &'static str,
    },
    /// The text could not be parsed.
    #[error("could not parse {what} '{text}': {source}")]
    ParseFailure {
        /// Which input failed.
        what: &'static str,
        /// The text after normalization.
        text: String,
        /// The parser's reason.
        source: ParseError,
    },
    /// The function mentions symbols other than the variable.
    #[error("function contains unrecognized variables: {names}. Use '{variable}' as the variable")]
    UnrecognizedVariable {
        /// Offending names, sorted and comma-separated.
        names: String,
        /// The expected variable.
        variable: String,
    },
    /// Both bounds are numeric and `lower >= upper`.
    #[error("lower bound must be less than upper bound ({lower} >= {upper})")]
    InvertedBounds {
        /// Numeric value of the lower bound.
        lower: f64,
        /// Numeric value of the upper bound.
        upper: f64,
    },
}

/// The two quantities the calculator computes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityKind {
    /// Area under the curve.
    Area,
    /// Disk-method volume of revolution.
    Volume,
}

impl fmt::Display for QuantityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Area => "area",
            Self::Volume => "volume",
        })
    }
}

/// Errors from a calculation.
#[derive(Debug, Error)]
pub enum CalcError {
    /// Invalid function or bounds.
    #[error(transparent)]
    Input(#[from] InputError),
    /// An integral could not be set up.
    #[error("could not compute the {quantity}: {source}")]
    IntegrationFailure {
        /// Which quantity failed.
        quantity: QuantityKind,
        /// The cause.
        source: IntegrateError,
    },
    /// The plot could not be rendered.
    #[error("could not render the plot: {0}")]
    PlotFailure(#[from] PlotError),
    /// Neither area nor volume was requested.
    #[error("select at least one computation (area or volume)")]
    NoComputationSelected,
    /// No preset has this name.
    #[error("example not found: {0}")]
    UnknownExample(String),
}
