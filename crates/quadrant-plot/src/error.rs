//! Plot errors.

use quadrant_core::EvalError;
use thiserror::Error;

/// Errors from rendering a plot.
#[derive(Debug, Error)]
pub enum PlotError {
    /// A bound could not be evaluated to a number.
    #[error("{which} bound is not numeric: {source}")]
    BoundNotNumeric {
        /// `"lower"` or `"upper"`.
        which: &'static str,
        /// Why evaluation failed.
        source: EvalError,
    },
    /// A bound is infinite.
    #[error("{which} bound must be finite to plot")]
    InfiniteBound {
        /// `"lower"` or `"upper"`.
        which: &'static str,
    },
    /// The lower bound is not below the upper bound.
    #[error("empty plot range [{lower}, {upper}]")]
    EmptyRange {
        /// Lower end.
        lower: f64,
        /// Upper end.
        upper: f64,
    },
    /// No sample of the function was finite.
    #[error("function has no finite values on the plot range")]
    NoFiniteSamples,
    /// The embedded font could not be loaded.
    #[error("embedded font could not be loaded")]
    Font,
    /// The drawing backend failed.
    #[error("drawing failed: {0}")]
    Drawing(String),
    /// PNG encoding failed.
    #[error("png encoding failed: {0}")]
    Encoding(#[from] image::ImageError),
}
