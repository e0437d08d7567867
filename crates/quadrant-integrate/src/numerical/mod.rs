//! Numerical Integration Methods
//!
//! Adaptive Gauss-Kronrod quadrature used to cross-check symbolic results
//! and to supply a value when no antiderivative is found.
//!
//! # Methods
//!
//! - **Gauss-Kronrod**: G7K15 and G15K31 panel rules with embedded error estimates
//! - **Adaptive**: global bisection driven by a max-heap of panel errors
//! - **Infinite ranges**: `[a, ∞)`, `(-∞, b]` and `(-∞, ∞)` by variable transformation

use std::cmp::Ordering;

pub mod adaptive;
pub mod gauss_kronrod;

pub use adaptive::{
    adaptive_integrate, adaptive_integrate_from_neg_infinity, adaptive_integrate_full_line,
    adaptive_integrate_to_infinity, integrate_between, Quadrature, QuadratureOptions,
};
pub use gauss_kronrod::{GaussKronrodRule, PanelEstimate};

/// An integration bound on the extended real line.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Bound {
    /// A finite bound value.
    Finite(f64),
    /// Positive infinity (+∞).
    PosInfinity,
    /// Negative infinity (-∞).
    NegInfinity,
}

impl Bound {
    /// Classifies a float, mapping ±inf onto the infinite bounds.
    ///
    /// Returns `None` for NaN.
    #[must_use]
    pub fn from_f64(value: f64) -> Option<Self> {
        if value.is_nan() {
            None
        } else if value == f64::INFINITY {
            Some(Self::PosInfinity)
        } else if value == f64::NEG_INFINITY {
            Some(Self::NegInfinity)
        } else {
            Some(Self::Finite(value))
        }
    }

    /// True for a finite bound.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        matches!(self, Self::Finite(_))
    }

    fn rank(self) -> i8 {
        match self {
            Self::NegInfinity => -1,
            Self::Finite(_) => 0,
            Self::PosInfinity => 1,
        }
    }
}

impl PartialOrd for Bound {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Finite(a), Self::Finite(b)) => a.partial_cmp(b),
            _ => Some(self.rank().cmp(&other.rank())),
        }
    }
}
