//! Symbolic and numerical integration for Quadrant.
//!
//! This crate computes antiderivatives of single-variable elementary
//! functions and evaluates definite integrals, cross-checking the exact
//! result against adaptive Gauss-Kronrod quadrature.
//!
//! # Quick Start
//!
//! ```
//! use quadrant_core::ExprArena;
//! use quadrant_integrate::{integrate, integrate_definite, IntegrationOptions};
//!
//! let mut arena = ExprArena::new();
//! let x = arena.symbol("x");
//! let f = arena.parse("x**2").unwrap();
//! let options = IntegrationOptions::default();
//!
//! // Indefinite: ∫ x² dx = x³/3
//! let result = integrate(&mut arena, f, x, &options);
//! assert!(result.is_symbolic());
//!
//! // Definite: ∫₀¹ x² dx = 1/3
//! let zero = arena.zero();
//! let one = arena.one();
//! let result = integrate_definite(&mut arena, f, x, zero, one, &options).unwrap();
//! assert_eq!(arena.to_text(result.value), "1/3");
//! ```
//!
//! # Rule families
//!
//! - **Power rule**: polynomials with symbolic coefficients
//! - **Table lookup**: elementary functions of a linear argument, reciprocal
//!   quadratics and their square roots
//! - **Substitution**: derivative-divides on products
//! - **By parts**: polynomial times `sin cos exp sinh cosh log`, and
//!   `exp·sin`, `exp·cos`
//! - **Numerical**: adaptive Gauss-Kronrod quadrature on finite and
//!   infinite ranges

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod definite;
pub mod numerical;
pub mod parts;
pub mod polynomial;
pub mod substitution;
pub mod table;
pub mod unified;

mod proptests;

pub use definite::{integrate_definite, DefiniteIntegral, IntegrateError};
pub use numerical::{integrate_between, Bound, Quadrature, QuadratureOptions};
pub use polynomial::{LinearForm, Polynomial};
pub use unified::{
    integrate, verify_antiderivative, IntegrationDispatcher, IntegrationMethod,
    IntegrationOptions, IntegrationResult, SymbolicAntiderivative, UnknownReason,
};
