//! Definite integral evaluation.
//!
//! The antiderivative is evaluated at both bounds (Fundamental Theorem of
//! Calculus), with one-sided limits where substitution is indeterminate.
//! When both bounds are numeric the result is cross-checked against
//! adaptive Gauss-Kronrod quadrature, which catches antiderivatives that
//! are not continuous on the interval (a pole inside `[a, b]`).
//!
//! # Example
//!
//! ```
//! use quadrant_core::ExprArena;
//! use quadrant_integrate::{integrate_definite, IntegrationOptions};
//!
//! // ∫₀^∞ e^(-x) dx = 1
//! let mut arena = ExprArena::new();
//! let x = arena.symbol("x");
//! let f = arena.parse("exp(-x)").unwrap();
//! let zero = arena.zero();
//! let oo = arena.infinity();
//!
//! let result = integrate_definite(&mut arena, f, x, zero, oo, &IntegrationOptions::default()).unwrap();
//! assert_eq!(arena.to_text(result.value), "1");
//! ```

pub mod limits;

use thiserror::Error;
use tracing::debug;

use quadrant_core::{ExprArena, ExprHandle, ExprNode};

use crate::numerical::{adaptive_integrate, integrate_between, Bound, Quadrature};
use crate::unified::{integrate, IntegrationOptions, SymbolicAntiderivative};
use limits::{value_at, Approach};

/// Errors from setting up a definite integral.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum IntegrateError {
    /// The integration variable is not a symbol.
    #[error("integration variable must be a symbol")]
    NotASymbol,
    /// A bound contains the integration variable.
    #[error("integration bounds must not depend on the integration variable")]
    BoundDependsOnVariable,
}

/// Result of a definite integral.
#[derive(Clone, Debug, PartialEq)]
pub struct DefiniteIntegral {
    /// The exact value, or an unevaluated `Integral(...)`.
    pub value: ExprHandle,
    /// The antiderivative used, if one was found and accepted.
    pub antiderivative: Option<SymbolicAntiderivative>,
    /// `F(b)`, when the antiderivative was accepted.
    pub upper_value: Option<ExprHandle>,
    /// `F(a)`, when the antiderivative was accepted.
    pub lower_value: Option<ExprHandle>,
    /// Finite numeric value of the integral, if known.
    pub numeric: Option<f64>,
}

impl DefiniteIntegral {
    /// True when `value` is a closed form rather than an unevaluated integral.
    #[must_use]
    pub fn is_evaluated(&self, arena: &ExprArena) -> bool {
        !arena.contains_integral(self.value)
    }

    fn unevaluated(
        arena: &mut ExprArena,
        f: ExprHandle,
        var: ExprHandle,
        lower: ExprHandle,
        upper: ExprHandle,
        numeric: Option<f64>,
    ) -> Self {
        Self {
            value: arena.integral(f, var, lower, upper),
            antiderivative: None,
            upper_value: None,
            lower_value: None,
            numeric,
        }
    }
}

/// Computes `∫[lower, upper] f d(var)`.
///
/// # Errors
///
/// Fails when `var` is not a symbol or a bound depends on `var`. An
/// integral that cannot be computed is not an error: it comes back as an
/// unevaluated `Integral(...)` with the quadrature value when available.
pub fn integrate_definite(
    arena: &mut ExprArena,
    f: ExprHandle,
    var: ExprHandle,
    lower: ExprHandle,
    upper: ExprHandle,
    options: &IntegrationOptions,
) -> Result<DefiniteIntegral, IntegrateError> {
    if !matches!(arena.get(var), ExprNode::Symbol(_)) {
        return Err(IntegrateError::NotASymbol);
    }
    if !arena.is_free_of(lower, var) || !arena.is_free_of(upper, var) {
        return Err(IntegrateError::BoundDependsOnVariable);
    }

    let bounds = numeric_bounds(arena, lower, upper);
    let quadrature = match bounds {
        Some((a, b)) if options.numerical_fallback => {
            let arena: &ExprArena = arena;
            let integrand = |x: f64| arena.evaluate_at(f, var, x).unwrap_or(f64::NAN);
            Some(integrate_between(&integrand, a, b, &options.quadrature()))
        }
        _ => None,
    };
    let fallback = quadrature.as_ref().and_then(Quadrature::converged_value);

    let Some(anti) = integrate(arena, f, var, options).as_symbolic().copied() else {
        debug!("no antiderivative, leaving integral unevaluated");
        return Ok(DefiniteIntegral::unevaluated(arena, f, var, lower, upper, fallback));
    };

    let (to_upper, to_lower) = (Approach::upper(arena, upper), Approach::lower(arena, lower));
    let upper_value = value_at(arena, anti.result, var, to_upper);
    let lower_value = value_at(arena, anti.result, var, to_lower);
    let value = arena.sub(upper_value, lower_value);
    if arena.contains_undefined(value) {
        debug!("antiderivative indeterminate at a bound");
        return Ok(DefiniteIntegral::unevaluated(arena, f, var, lower, upper, fallback));
    }

    let exact = arena.evaluate(value);
    let accepted = match (&exact, bounds, &quadrature) {
        // Symbolic bounds cannot be checked.
        (_, None, _) => true,
        (Err(_), Some(_), _) => false,
        (Ok(_), Some(_), None) => true,
        (Ok(v), Some((a, b)), Some(q)) if v.is_finite() => {
            let agrees = q.finite
                && q.value.is_finite()
                && within(*v, q.value, options.cross_check_tolerance);
            agrees
                || (q.converged_value().is_none()
                    && interior_agrees(arena, f, anti.result, var, (a, b), options))
        }
        // A divergent integral agrees with quadrature that failed to converge.
        (Ok(_), Some(_), Some(q)) => q.converged_value().is_none(),
    };

    if !accepted {
        debug!(
            exact = ?exact.as_ref().ok(),
            quadrature = ?quadrature.as_ref().map(|q| q.value),
            "antiderivative rejected by quadrature cross-check"
        );
        return Ok(DefiniteIntegral::unevaluated(arena, f, var, lower, upper, fallback));
    }

    Ok(DefiniteIntegral {
        value: shortest_form(arena, value),
        antiderivative: Some(anti),
        upper_value: Some(shortest_form(arena, upper_value)),
        lower_value: Some(shortest_form(arena, lower_value)),
        numeric: exact.ok().filter(|v| v.is_finite()),
    })
}

/// `h` or its expansion, whichever prints shorter.
fn shortest_form(arena: &mut ExprArena, h: ExprHandle) -> ExprHandle {
    let expanded = arena.expand(h);
    if expanded != h && arena.to_text(expanded).len() < arena.to_text(h).len() {
        expanded
    } else {
        h
    }
}

/// Fraction of a finite interval trimmed from each end by [`interior_agrees`].
const INTERIOR_MARGIN: f64 = 1e-6;

fn within(value: f64, reference: f64, tolerance: f64) -> bool {
    (value - reference).abs() <= tolerance * reference.abs().max(1.0)
}

/// Checks `F(b - δ) - F(a + δ)` against quadrature on the trimmed interval.
///
/// Quadrature over the full interval fails on integrable endpoint
/// singularities such as `1/sqrt(1 - x**2)` on `[0, 1]`. Away from the
/// endpoints it converges, and a pole inside the interval still makes it
/// fail there.
fn interior_agrees(
    arena: &ExprArena,
    f: ExprHandle,
    anti: ExprHandle,
    var: ExprHandle,
    (lower, upper): (Bound, Bound),
    options: &IntegrationOptions,
) -> bool {
    let (Bound::Finite(a), Bound::Finite(b)) = (lower, upper) else {
        return false;
    };
    let delta = (b - a) * INTERIOR_MARGIN;
    let (lo, hi) = (a + delta, b - delta);
    let (Ok(f_lo), Ok(f_hi)) = (arena.evaluate_at(anti, var, lo), arena.evaluate_at(anti, var, hi))
    else {
        return false;
    };
    let integrand = |x: f64| arena.evaluate_at(f, var, x).unwrap_or(f64::NAN);
    let Some(q) = adaptive_integrate(&integrand, lo, hi, &options.quadrature()).converged_value()
    else {
        return false;
    };
    debug!(lo, hi, quadrature = q, "checking antiderivative on the trimmed interval");
    within(f_hi - f_lo, q, options.cross_check_tolerance)
}

fn numeric_bounds(arena: &ExprArena, lower: ExprHandle, upper: ExprHandle) -> Option<(Bound, Bound)> {
    let a = Bound::from_f64(arena.evaluate(lower).ok()?)?;
    let b = Bound::from_f64(arena.evaluate(upper).ok()?)?;
    Some((a, b))
}
