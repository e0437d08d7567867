//! Integration dispatcher.
//!
//! Tries each rule family in a fixed order and recurses through sums and
//! constant factors:
//!
//! 1. constants
//! 2. polynomials (after expansion)
//! 3. sums, term by term
//! 4. constant factors pulled out of products
//! 5. table lookup
//! 6. derivative-divides substitution
//! 7. integration by parts
//! 8. expansion of products of sums, then retry

use smallvec::SmallVec;
use tracing::trace;

use quadrant_core::{ExprArena, ExprHandle, ExprNode};

use super::result::{IntegrationMethod, IntegrationResult, SymbolicAntiderivative, UnknownReason};
use crate::numerical::QuadratureOptions;
use crate::parts::integrate_by_parts;
use crate::polynomial::Polynomial;
use crate::substitution::derivative_divides;
use crate::table::integrate_table;

/// Maximum nesting of sums and products the dispatcher walks into.
const MAX_DEPTH: usize = 32;

/// Points at which an antiderivative is checked against the integrand.
const VERIFY_POINTS: [f64; 7] = [-1.7, -0.6, 0.3, 0.9, 1.4, 2.3, 3.1];

/// Integration options for customizing behavior.
#[derive(Clone, Debug)]
pub struct IntegrationOptions {
    /// Use quadrature to cross-check definite integrals and to supply a
    /// value when no antiderivative is found.
    pub numerical_fallback: bool,
    /// Tolerance for numerical integration.
    pub numerical_tolerance: f64,
    /// Maximum subdivisions for numerical integration.
    pub max_subdivisions: usize,
    /// Relative tolerance when comparing the Fundamental Theorem of Calculus
    /// against quadrature.
    pub cross_check_tolerance: f64,
    /// Verify results by differentiation.
    pub verify: bool,
}

impl Default for IntegrationOptions {
    fn default() -> Self {
        Self {
            numerical_fallback: true,
            numerical_tolerance: 1e-10,
            max_subdivisions: 1000,
            cross_check_tolerance: 1e-6,
            verify: false,
        }
    }
}

impl IntegrationOptions {
    /// Quadrature settings derived from these options.
    #[must_use]
    pub fn quadrature(&self) -> QuadratureOptions {
        QuadratureOptions::with_tolerance(self.numerical_tolerance, self.max_subdivisions)
    }
}

/// Integration dispatcher that routes to the rule families.
pub struct IntegrationDispatcher<'a> {
    arena: &'a mut ExprArena,
    options: IntegrationOptions,
    depth: usize,
}

impl<'a> IntegrationDispatcher<'a> {
    /// Creates a new dispatcher with default options.
    pub fn new(arena: &'a mut ExprArena) -> Self {
        Self::with_options(arena, IntegrationOptions::default())
    }

    /// Creates a dispatcher with custom options.
    pub fn with_options(arena: &'a mut ExprArena, options: IntegrationOptions) -> Self {
        Self {
            arena,
            options,
            depth: 0,
        }
    }

    /// Main entry point for indefinite integration.
    pub fn integrate(&mut self, expr: ExprHandle, var: ExprHandle) -> IntegrationResult {
        if !matches!(self.arena.get(var), ExprNode::Symbol(_)) {
            return IntegrationResult::Unknown(UnknownReason::VariableNotSymbol);
        }
        if self.arena.contains_undefined(expr) {
            return IntegrationResult::Unknown(UnknownReason::UndefinedIntegrand);
        }

        self.depth = 0;
        match self.antiderivative(expr, var) {
            Ok((result, method)) => {
                let verified =
                    self.options.verify && verify_antiderivative(self.arena, expr, result, var);
                trace!(method = %method, verified, "antiderivative found");
                IntegrationResult::Symbolic(
                    SymbolicAntiderivative::new(result, method).with_verified(verified),
                )
            }
            Err(reason) => IntegrationResult::Unknown(reason),
        }
    }

    fn antiderivative(
        &mut self,
        h: ExprHandle,
        var: ExprHandle,
    ) -> Result<(ExprHandle, IntegrationMethod), UnknownReason> {
        if self.depth >= MAX_DEPTH {
            return Err(UnknownReason::ComplexityLimit);
        }
        self.depth += 1;
        let result = self.dispatch(h, var);
        self.depth -= 1;
        result
    }

    fn dispatch(
        &mut self,
        h: ExprHandle,
        var: ExprHandle,
    ) -> Result<(ExprHandle, IntegrationMethod), UnknownReason> {
        let arena = &mut *self.arena;

        if arena.is_free_of(h, var) {
            // ∫c dx = c·x
            return Ok((arena.mul(&[h, var]), IntegrationMethod::Constant));
        }

        if let Some(poly) = Polynomial::from_expr(arena, h, var) {
            let result = poly.integrate(arena).to_expr(arena, var);
            return Ok((result, IntegrationMethod::PowerRule));
        }

        match arena.get(h).clone() {
            ExprNode::Add(terms) => {
                let mut parts: SmallVec<[ExprHandle; 4]> = SmallVec::new();
                for t in terms {
                    parts.push(self.antiderivative(t, var)?.0);
                }
                return Ok((self.arena.add(&parts), IntegrationMethod::Linearity));
            }
            ExprNode::Mul(factors) => {
                let (constant, body): (SmallVec<[ExprHandle; 4]>, SmallVec<[ExprHandle; 4]>) =
                    factors.iter().copied().partition(|&f| arena.is_free_of(f, var));
                if !constant.is_empty() {
                    let c = arena.mul(&constant);
                    let body = arena.mul(&body);
                    let (inner, method) = self.antiderivative(body, var)?;
                    return Ok((self.arena.mul(&[c, inner]), method));
                }
            }
            _ => {}
        }

        let arena = &mut *self.arena;
        if let Some(r) = integrate_table(arena, h, var) {
            return Ok((r, IntegrationMethod::TableLookup));
        }
        if let Some(r) = derivative_divides(arena, h, var) {
            return Ok((r, IntegrationMethod::Substitution));
        }
        if let Some(r) = integrate_by_parts(arena, h, var) {
            return Ok((r, IntegrationMethod::ByParts));
        }

        let expanded = arena.expand(h);
        if expanded != h {
            let (result, _) = self.antiderivative(expanded, var)?;
            return Ok((result, IntegrationMethod::Linearity));
        }
        Err(UnknownReason::UnsupportedForm)
    }
}

/// Checks `d/dvar antiderivative == integrand` at a handful of points.
///
/// Points where either side cannot be evaluated are skipped; at least two
/// points must be comparable.
pub fn verify_antiderivative(
    arena: &mut ExprArena,
    integrand: ExprHandle,
    antiderivative: ExprHandle,
    var: ExprHandle,
) -> bool {
    let derivative = arena.diff(antiderivative, var);
    let mut compared = 0;
    for &p in &VERIFY_POINTS {
        let (Ok(want), Ok(got)) = (
            arena.evaluate_at(integrand, var, p),
            arena.evaluate_at(derivative, var, p),
        ) else {
            continue;
        };
        if !(want.is_finite() && got.is_finite()) {
            continue;
        }
        if (want - got).abs() > 1e-6 * want.abs().max(1.0) {
            return false;
        }
        compared += 1;
    }
    compared >= 2
}

#[cfg(test)]
mod tests {
    use super::*;

    fn integrate_text(src: &str) -> (Option<String>, Option<IntegrationMethod>) {
        let mut arena = ExprArena::new();
        let x = arena.symbol("x");
        let h = arena.parse(src).unwrap();
        let result = IntegrationDispatcher::new(&mut arena).integrate(h, x);
        match result {
            IntegrationResult::Symbolic(s) => (Some(arena.to_text(s.result)), Some(s.method)),
            IntegrationResult::Unknown(_) => (None, None),
        }
    }

    #[test]
    fn test_constant() {
        let (text, method) = integrate_text("5");
        assert_eq!(text.as_deref(), Some("5*x"));
        assert_eq!(method, Some(IntegrationMethod::Constant));

        let (text, _) = integrate_text("pi");
        assert_eq!(text.as_deref(), Some("pi*x"));
    }

    #[test]
    fn test_power_rule() {
        let (text, method) = integrate_text("x**2");
        assert_eq!(text.as_deref(), Some("x**3/3"));
        assert_eq!(method, Some(IntegrationMethod::PowerRule));
    }

    #[test]
    fn test_linearity() {
        let (text, method) = integrate_text("sin(x) + x");
        assert_eq!(text.as_deref(), Some("x**2/2 - cos(x)"));
        assert_eq!(method, Some(IntegrationMethod::Linearity));
    }

    #[test]
    fn test_constant_factor_keeps_inner_method() {
        let (text, method) = integrate_text("3*cos(x)");
        assert_eq!(text.as_deref(), Some("3*sin(x)"));
        assert_eq!(method, Some(IntegrationMethod::TableLookup));
    }

    #[test]
    fn test_methods() {
        assert_eq!(integrate_text("x*exp(x**2)").1, Some(IntegrationMethod::Substitution));
        assert_eq!(integrate_text("x*sin(x)").1, Some(IntegrationMethod::ByParts));
        assert_eq!(integrate_text("x*(x + sin(x))").1, Some(IntegrationMethod::Linearity));
    }

    #[test]
    fn test_unknown() {
        let mut arena = ExprArena::new();
        let x = arena.symbol("x");
        let h = arena.parse("exp(x**2)").unwrap();
        let result = IntegrationDispatcher::new(&mut arena).integrate(h, x);
        assert_eq!(result, IntegrationResult::Unknown(UnknownReason::UnsupportedForm));

        let two = arena.integer(2);
        let result = IntegrationDispatcher::new(&mut arena).integrate(h, two);
        assert_eq!(result, IntegrationResult::Unknown(UnknownReason::VariableNotSymbol));
    }

    #[test]
    fn test_verification() {
        let mut arena = ExprArena::new();
        let x = arena.symbol("x");
        let h = arena.parse("x**2*cos(x) + 1/(x**2 + 1)").unwrap();
        let options = IntegrationOptions {
            verify: true,
            ..IntegrationOptions::default()
        };
        let result = IntegrationDispatcher::with_options(&mut arena, options).integrate(h, x);
        assert!(result.as_symbolic().is_some_and(|s| s.verified));

        // A wrong antiderivative fails the check.
        let wrong = arena.parse("x**3").unwrap();
        assert!(!verify_antiderivative(&mut arena, h, wrong, x));
    }
}
