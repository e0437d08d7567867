//! Unified integration API.
//!
//! [`integrate`] classifies the integrand and routes it to the rule family
//! that can handle it, returning either a symbolic antiderivative or the
//! reason no rule applied.
//!
//! # Example
//!
//! ```
//! use quadrant_core::ExprArena;
//! use quadrant_integrate::{integrate, IntegrationOptions};
//!
//! let mut arena = ExprArena::new();
//! let x = arena.symbol("x");
//! let f = arena.parse("x**2").unwrap();
//!
//! let result = integrate(&mut arena, f, x, &IntegrationOptions::default());
//! let antiderivative = result.antiderivative().unwrap();
//! assert_eq!(arena.to_text(antiderivative), "x**3/3");
//! ```

pub mod dispatch;
pub mod result;

use quadrant_core::{ExprArena, ExprHandle};

pub use dispatch::{verify_antiderivative, IntegrationDispatcher, IntegrationOptions};
pub use result::{IntegrationMethod, IntegrationResult, SymbolicAntiderivative, UnknownReason};

/// Computes an antiderivative of `expr` with respect to `var`.
pub fn integrate(
    arena: &mut ExprArena,
    expr: ExprHandle,
    var: ExprHandle,
    options: &IntegrationOptions,
) -> IntegrationResult {
    IntegrationDispatcher::with_options(arena, options.clone()).integrate(expr, var)
}
