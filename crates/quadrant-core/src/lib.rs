//! # quadrant-core
//!
//! Expression engine for the Quadrant integral calculator.
//!
//! This crate provides:
//! - Arena-allocated expression storage with hash-consing
//! - Exact rational arithmetic and canonicalizing constructors
//! - A parser for Python-style input (`x**2 + sin(x)`)
//! - Floating-point evaluation, substitution and differentiation
//! - Plain-text and LaTeX printers
//!
//! ## Design Principles
//!
//! - **Data-Oriented Design**: Expressions stored contiguously in arena for cache efficiency
//! - **Hash-Consing**: Every structurally unique expression stored exactly once
//! - **Canonical Forms**: `a + b` and `b + a` are the same handle
//! - **Zero-Cost Handles**: 32-bit indices instead of pointers

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod arena;
mod build;
mod diff;
pub mod display;
pub mod eval;
mod expand;
pub mod expr;
pub mod handle;
pub mod intern;
mod latex;
pub mod number;
mod order;
pub mod parse;
mod special;
mod subs;

mod proptests;

pub use arena::ExprArena;
pub use display::ExprDisplay;
pub use eval::{EvalError, EvalResult};
pub use expand::MAX_EXPAND_POWER;
pub use expr::{Constant, ExprNode, Func, Parity, SymbolId};
pub use handle::ExprHandle;
pub use intern::SymbolTable;
pub use number::Number;
pub use parse::ParseError;
