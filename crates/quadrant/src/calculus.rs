//! Area and volume of revolution.

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};
use tracing::debug;

use quadrant_core::{ExprArena, ExprHandle};
use quadrant_integrate::{integrate, integrate_definite, DefiniteIntegral, IntegrationOptions};

use crate::error::{CalcError, QuantityKind};
use crate::steps::{definite_integral, Step, Steps};
use crate::validate::{Bounds, UnivariateFunction};

/// A computed quantity: exact value, numeric value and optional steps.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Quantity {
    /// Exact value in plain text.
    pub symbolic: String,
    /// Numeric value, or `None` when it could not be evaluated.
    pub numeric: Option<f64>,
    /// Derivation, when requested.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub steps: Option<Vec<Step>>,
}

/// Area under `f` over the bounds.
///
/// # Errors
///
/// `IntegrationFailure` when the integral cannot be set up, for instance
/// when a bound mentions the variable.
pub fn compute_area(
    arena: &mut ExprArena,
    f: &UnivariateFunction,
    bounds: &Bounds,
    with_steps: bool,
    options: &IntegrationOptions,
) -> Result<Quantity, CalcError> {
    let result = definite(arena, f.expr, f, bounds, options, QuantityKind::Area)?;
    debug!(value = %arena.display(result.value), numeric = ?result.numeric, "area computed");

    let steps = with_steps.then(|| area_steps(arena, f, bounds, &result, options));
    Ok(Quantity {
        symbolic: arena.to_text(result.value),
        numeric: result.numeric,
        steps,
    })
}

/// Disk-method volume `π·∫ f(x)² dx` over the bounds.
///
/// # Errors
///
/// `IntegrationFailure` when the integral cannot be set up.
pub fn compute_volume(
    arena: &mut ExprArena,
    f: &UnivariateFunction,
    bounds: &Bounds,
    with_steps: bool,
    options: &IntegrationOptions,
) -> Result<Quantity, CalcError> {
    let square = arena.powi(f.expr, 2);
    let inner = definite(arena, square, f, bounds, options, QuantityKind::Volume)?;
    let pi = arena.pi();
    let volume = arena.mul(&[pi, inner.value]);
    let numeric = inner.numeric.map(|v| PI * v);
    debug!(value = %arena.display(volume), ?numeric, "volume computed");

    let steps = with_steps.then(|| {
        let a = arena.to_latex(bounds.lower);
        let b = arena.to_latex(bounds.upper);
        let f_tex = arena.to_latex(f.expr);
        let expanded = arena.expand(square);
        let square_tex = arena.to_latex(expanded);

        let mut steps = Steps::default();
        steps.push("Function rotated about the x-axis:", format!("f(x) = {f_tex}"));
        steps.push(
            "Volume of revolution (disk method):",
            format!("V = \\pi {}", definite_integral(&a, &b, "[f(x)]^2")),
        );
        steps.push(
            "Substituting f(x):",
            format!("V = \\pi {}", definite_integral(&a, &b, &format!("[{f_tex}]^2"))),
        );
        steps.push(
            "Expanding the square:",
            format!("V = \\pi {}", definite_integral(&a, &b, &square_tex)),
        );
        if inner.is_evaluated(arena) {
            steps.push(
                "Evaluating the integral:",
                format!(
                    "{} = {}",
                    definite_integral(&a, &b, &square_tex),
                    arena.to_latex(inner.value)
                ),
            );
        }
        steps.push("Final volume:", format!("V = {}", arena.to_latex(volume)));
        if let Some(v) = numeric {
            steps.push("Numeric value:", format!("V \\approx {v:.6} \\text{{ cubic units}}"));
        }
        steps.into_vec()
    });

    Ok(Quantity {
        symbolic: arena.to_text(volume),
        numeric,
        steps,
    })
}

fn definite(
    arena: &mut ExprArena,
    integrand: ExprHandle,
    f: &UnivariateFunction,
    bounds: &Bounds,
    options: &IntegrationOptions,
    quantity: QuantityKind,
) -> Result<DefiniteIntegral, CalcError> {
    integrate_definite(arena, integrand, f.var, bounds.lower, bounds.upper, options)
        .map_err(|source| CalcError::IntegrationFailure { quantity, source })
}

fn area_steps(
    arena: &mut ExprArena,
    f: &UnivariateFunction,
    bounds: &Bounds,
    result: &DefiniteIntegral,
    options: &IntegrationOptions,
) -> Vec<Step> {
    let a = arena.to_latex(bounds.lower);
    let b = arena.to_latex(bounds.upper);
    let f_tex = arena.to_latex(f.expr);
    let mut steps = Steps::default();

    steps.push("Function to integrate:", format!("f(x) = {f_tex}"));

    // The indefinite integral exists even when the definite one was left
    // unevaluated because of a pole inside the interval.
    let antiderivative = integrate(arena, f.expr, f.var, options).antiderivative();
    match antiderivative {
        Some(anti) => steps.push(
            "Antiderivative (indefinite integral):",
            format!("\\int f(x) \\, dx = {} + C", arena.to_latex(anti)),
        ),
        None => steps.push("The antiderivative could not be found analytically", ""),
    }

    steps.push("Definite integral:", definite_integral(&a, &b, &f_tex));

    if let Some(anti) = antiderivative {
        let upper = result
            .upper_value
            .unwrap_or_else(|| arena.substitute(anti, f.var, bounds.upper));
        let lower = result
            .lower_value
            .unwrap_or_else(|| arena.substitute(anti, f.var, bounds.lower));
        steps.push(
            "Applying the Fundamental Theorem of Calculus:",
            format!(
                "F({b}) - F({a}) = {} - {}",
                arena.to_latex(upper),
                arena.to_latex(lower)
            ),
        );
    }

    steps.push("Result:", format!("= {}", arena.to_latex(result.value)));
    if let Some(v) = result.numeric {
        steps.push("Numeric value:", format!("\\approx {v:.6}"));
    }
    steps.into_vec()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::{validate_bounds, validate_function};

    fn setup(src: &str, lower: &str, upper: &str) -> (ExprArena, UnivariateFunction, Bounds) {
        let mut arena = ExprArena::new();
        let f = validate_function(&mut arena, src, "x").unwrap();
        let bounds = validate_bounds(&mut arena, lower, upper).unwrap();
        (arena, f, bounds)
    }

    fn area(src: &str, lower: &str, upper: &str, with_steps: bool) -> Quantity {
        let (mut arena, f, bounds) = setup(src, lower, upper);
        compute_area(&mut arena, &f, &bounds, with_steps, &IntegrationOptions::default()).unwrap()
    }

    #[test]
    fn test_parabola_area_round_trips() {
        let q = area("x**2", "0", "2", false);
        assert_eq!(q.symbolic, "8/3");
        assert!((q.numeric.unwrap() - 2.666_667).abs() < 1e-6);
        assert!(q.steps.is_none());

        // The printed value parses back to the same rational.
        let mut arena = ExprArena::new();
        let parsed = arena.parse(&q.symbolic).unwrap();
        assert_eq!(parsed, arena.rational(8, 3));
    }

    #[test]
    fn test_area_matches_quadrature() {
        for (src, lower, upper, expected) in [
            ("sin(x)", "0", "pi", 2.0),
            ("x**3 - 2*x + 1", "-1", "2", 3.75),
            ("exp(x)", "0", "1", std::f64::consts::E - 1.0),
        ] {
            let q = area(src, lower, upper, false);
            assert!((q.numeric.unwrap() - expected).abs() < 1e-4, "{src}");
        }
    }

    #[test]
    fn test_area_steps() {
        let q = area("x**2", "0", "2", true);
        let steps = q.steps.unwrap();
        let descriptions: Vec<&str> = steps.iter().map(|s| s.description.as_str()).collect();
        assert_eq!(
            descriptions,
            [
                "Function to integrate:",
                "Antiderivative (indefinite integral):",
                "Definite integral:",
                "Applying the Fundamental Theorem of Calculus:",
                "Result:",
                "Numeric value:",
            ]
        );
        assert_eq!(steps[0].formula, "f(x) = x^{2}");
        assert_eq!(steps[1].formula, "\\int f(x) \\, dx = \\frac{x^{3}}{3} + C");
        assert_eq!(steps[2].formula, "\\int_{0}^{2} x^{2} \\, dx");
        assert_eq!(steps[3].formula, "F(2) - F(0) = \\frac{8}{3} - 0");
        assert_eq!(steps[4].formula, "= \\frac{8}{3}");
        assert_eq!(steps[5].formula, "\\approx 2.666667");
    }

    #[test]
    fn test_area_without_antiderivative() {
        let q = area("exp(-x**2)", "0", "1", true);
        assert!(q.symbolic.starts_with("Integral("));
        assert!((q.numeric.unwrap() - 0.746_824_132_812_427).abs() < 1e-9);
        let steps = q.steps.unwrap();
        assert_eq!(steps[1].description, "The antiderivative could not be found analytically");
        assert_eq!(steps[1].formula, "");
        assert!(steps.iter().all(|s| !s.description.starts_with("Applying")));
    }

    #[test]
    fn test_divergent_area_has_no_numeric() {
        let q = area("1/x", "1", "oo", false);
        assert_eq!(q.symbolic, "oo");
        assert_eq!(q.numeric, None);
    }

    #[test]
    fn test_volume_of_cone() {
        let (mut arena, f, bounds) = setup("x", "0", "1");
        let q = compute_volume(&mut arena, &f, &bounds, true, &IntegrationOptions::default())
            .unwrap();
        assert_eq!(q.symbolic, "pi/3");
        assert!((q.numeric.unwrap() - 1.047_198).abs() < 1e-6);

        let steps = q.steps.unwrap();
        assert_eq!(steps.len(), 7);
        assert_eq!(steps[1].formula, "V = \\pi \\int_{0}^{1} [f(x)]^2 \\, dx");
        assert_eq!(steps[5].formula, "V = \\frac{\\pi}{3}");
        assert_eq!(steps[6].formula, "V \\approx 1.047198 \\text{ cubic units}");
    }

    fn volume(src: &str, lower: &str, upper: &str) -> Quantity {
        let (mut arena, f, bounds) = setup(src, lower, upper);
        compute_volume(&mut arena, &f, &bounds, false, &IntegrationOptions::default()).unwrap()
    }

    fn assert_relative(actual: Option<f64>, expected: f64) {
        let v = actual.expect("numeric value");
        assert!((v - expected).abs() <= 1e-9 * expected.abs(), "{v} vs {expected}");
    }

    #[test]
    fn test_extreme_magnitudes_stay_exact() {
        let q = area("x", "0", "1e-20", false);
        assert!(q.symbolic.starts_with("1/2"), "{}", q.symbolic);
        assert_relative(q.numeric, 5e-41);

        let q = area("1", "0", "1e19", false);
        assert_eq!(q.symbolic, "10000000000000000000");

        let q = area("1", "0", "99999999999999999999999", false);
        assert_eq!(q.symbolic, "99999999999999999999999");

        let q = area("1e300*x", "0", "1", false);
        assert!(!q.symbolic.starts_with("Integral("));
        assert_relative(q.numeric, 5e299);

        let q = area("x", "1e15", "1e15 + 1", false);
        assert_eq!(q.symbolic, "2000000000000001/2");
    }

    #[test]
    fn test_powers_of_functions_integrate_symbolically() {
        use std::f64::consts::{E, PI};

        let cases = [
            ("sinh(x)", "0", "1", PI * (2f64.sinh() / 4.0 - 0.5)),
            ("cos(x)", "0", "pi", PI * PI / 2.0),
            ("cos(x)**2", "0", "pi", PI * 3.0 * PI / 8.0),
            ("x*sin(x)", "0", "pi", PI * (PI.powi(3) / 6.0 - PI / 4.0)),
        ];
        for (src, lower, upper, expected) in cases {
            let q = volume(src, lower, upper);
            assert!(!q.symbolic.starts_with("Integral("), "{src}: {}", q.symbolic);
            assert_relative(q.numeric, expected);
        }

        let q = area("log(x)**2", "1", "E", false);
        assert!(!q.symbolic.starts_with("Integral("), "{}", q.symbolic);
        assert_relative(q.numeric, E - 2.0);
    }

    #[test]
    fn test_log_with_base_collects() {
        let q = area("log(x, 2)", "1", "2", false);
        assert_eq!(q.symbolic, "2 - 1/log(2)");
    }

    #[test]
    fn test_bound_mentioning_variable_fails() {
        let (mut arena, f, bounds) = setup("x", "0", "x");
        let err = compute_area(&mut arena, &f, &bounds, false, &IntegrationOptions::default())
            .unwrap_err();
        assert!(matches!(
            err,
            CalcError::IntegrationFailure {
                quantity: QuantityKind::Area,
                ..
            }
        ));
    }
}
