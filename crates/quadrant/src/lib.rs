//! # Quadrant
//!
//! Integral calculator: validates a function of one variable and two
//! bounds, computes the area under the curve and the volume of revolution
//! with optional step-by-step derivations, and renders a plot.
//!
//! ## Quick Start
//!
//! ```
//! use quadrant::{CalculationRequest, Calculator};
//!
//! let request = CalculationRequest {
//!     function: "x^2".into(),
//!     lower: "0".into(),
//!     upper: "2".into(),
//!     compute_area: true,
//!     ..CalculationRequest::default()
//! };
//! let response = Calculator::new().calculate(&request).unwrap();
//! assert_eq!(response.area.unwrap().symbolic, "8/3");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod calculator;
pub mod calculus;
pub mod error;
pub mod presets;
pub mod steps;
pub mod validate;

pub use quadrant_core as core;
pub use quadrant_integrate as integrate;
pub use quadrant_plot as plot;

pub use calculator::{CalculationRequest, CalculationResponse, Calculator, CalculatorConfig};
pub use calculus::{compute_area, compute_volume, Quantity};
pub use error::{CalcError, InputError, QuantityKind};
pub use presets::{example_names, load_example, ExamplePreset};
pub use steps::Step;
pub use validate::{
    normalize_function, parse_numeric_literal, validate_bounds, validate_function, Bounds,
    UnivariateFunction,
};
