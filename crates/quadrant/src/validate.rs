//! Input validation.
//!
//! Function and bound text is normalized (`^` to `**`, `sen` to `sin`,
//! `ln`/`lg` to `log`, `π` to `pi`, `∞` to `oo`) and parsed into the
//! caller's arena.

use quadrant_core::{ExprArena, ExprHandle};

use crate::error::InputError;

/// A validated function of a single variable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UnivariateFunction {
    /// The expression; free of every symbol except `var`.
    pub expr: ExprHandle,
    /// The variable.
    pub var: ExprHandle,
}

impl UnivariateFunction {
    /// Evaluates the function at `x`. A constant function ignores `x`.
    ///
    /// # Errors
    ///
    /// Returns the evaluation error when `x` is outside the domain.
    pub fn evaluate_at(&self, arena: &ExprArena, x: f64) -> quadrant_core::EvalResult {
        arena.evaluate_at(self.expr, self.var, x)
    }
}

/// Validated integration bounds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Bounds {
    /// Lower bound.
    pub lower: ExprHandle,
    /// Upper bound.
    pub upper: ExprHandle,
}

/// Rewrites common spellings of functions and operators.
#[must_use]
pub fn normalize_function(text: &str) -> String {
    text.replace('^', "**")
        .replace('π', "pi")
        .replace("sen", "sin")
        .replace("ln", "log")
        .replace("lg", "log")
}

/// Parses a bound or other numeric literal.
///
/// # Errors
///
/// `EmptyInput` for blank text, `ParseFailure` when the parser rejects it.
pub fn parse_numeric_literal(
    arena: &mut ExprArena,
    text: &str,
    what: &'static str,
) -> Result<ExprHandle, InputError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(InputError::EmptyInput { what });
    }
    let text = text.replace('π', "pi").replace('∞', "oo");
    arena.parse(&text).map_err(|source| InputError::ParseFailure {
        what,
        text,
        source,
    })
}

/// Parses function text as a function of `variable`.
///
/// An expression without the variable is accepted when it is constant,
/// and then stands for the constant function.
///
/// # Errors
///
/// `EmptyInput`, `ParseFailure`, or `UnrecognizedVariable` naming every
/// symbol other than `variable`.
pub fn validate_function(
    arena: &mut ExprArena,
    text: &str,
    variable: &str,
) -> Result<UnivariateFunction, InputError> {
    if text.trim().is_empty() {
        return Err(InputError::EmptyInput { what: "function" });
    }
    let normalized = normalize_function(text);
    let expr = arena
        .parse(&normalized)
        .map_err(|source| InputError::ParseFailure {
            what: "function",
            text: normalized.clone(),
            source,
        })?;
    let var = arena.symbol(variable);

    let others: Vec<String> = arena
        .free_symbols(expr)
        .into_iter()
        .filter(|name| name != variable)
        .collect();
    if !others.is_empty() {
        return Err(InputError::UnrecognizedVariable {
            names: others.join(", "),
            variable: variable.to_owned(),
        });
    }
    Ok(UnivariateFunction { expr, var })
}

/// Parses both bounds and checks their order when both are numeric.
///
/// # Errors
///
/// Errors from [`parse_numeric_literal`] tagged with the failing bound,
/// or `InvertedBounds` when `lower >= upper`.
pub fn validate_bounds(arena: &mut ExprArena, lower: &str, upper: &str) -> Result<Bounds, InputError> {
    let lo = parse_numeric_literal(arena, lower, "lower bound")?;
    let hi = parse_numeric_literal(arena, upper, "upper bound")?;

    // Symbolic bounds skip the ordering check.
    if let (Ok(a), Ok(b)) = (arena.evaluate(lo), arena.evaluate(hi)) {
        if a >= b {
            return Err(InputError::InvertedBounds { lower: a, upper: b });
        }
    }
    Ok(Bounds { lower: lo, upper: hi })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize() {
        assert_eq!(normalize_function("x^2 + sen(x)"), "x**2 + sin(x)");
        assert_eq!(normalize_function("ln(x) + lg(x)"), "log(x) + log(x)");
        assert_eq!(normalize_function("2*π*x"), "2*pi*x");
    }

    #[test]
    fn test_function_with_other_variables() {
        let mut arena = ExprArena::new();
        let err = validate_function(&mut arena, "x + y", "x").unwrap_err();
        assert_eq!(
            err,
            InputError::UnrecognizedVariable {
                names: "y".into(),
                variable: "x".into()
            }
        );

        let err = validate_function(&mut arena, "z*x + b", "x").unwrap_err();
        assert!(matches!(err, InputError::UnrecognizedVariable { ref names, .. } if names == "b, z"));
    }

    #[test]
    fn test_constant_function() {
        let mut arena = ExprArena::new();
        let f = validate_function(&mut arena, "5", "x").unwrap();
        for x in [-3.0, 0.0, 7.5] {
            assert_eq!(f.evaluate_at(&arena, x), Ok(5.0));
        }
        let g = validate_function(&mut arena, "pi", "x").unwrap();
        assert_eq!(g.evaluate_at(&arena, 1.0), Ok(std::f64::consts::PI));
    }

    #[test]
    fn test_function_errors() {
        let mut arena = ExprArena::new();
        assert_eq!(
            validate_function(&mut arena, "   ", "x"),
            Err(InputError::EmptyInput { what: "function" })
        );
        assert!(matches!(
            validate_function(&mut arena, "x +* 2", "x"),
            Err(InputError::ParseFailure { what: "function", .. })
        ));
    }

    #[test]
    fn test_normalized_function_parses() {
        let mut arena = ExprArena::new();
        let f = validate_function(&mut arena, "x^2 + ln(x)", "x").unwrap();
        assert_eq!(arena.to_text(f.expr), "x**2 + log(x)");
    }

    #[test]
    fn test_bounds() {
        let mut arena = ExprArena::new();
        let b = validate_bounds(&mut arena, " 0 ", "π").unwrap();
        assert_eq!(arena.to_text(b.upper), "pi");

        assert!(matches!(
            validate_bounds(&mut arena, "2", "0"),
            Err(InputError::InvertedBounds { .. })
        ));
        assert!(matches!(
            validate_bounds(&mut arena, "1", "1"),
            Err(InputError::InvertedBounds { .. })
        ));
        assert_eq!(
            validate_bounds(&mut arena, "", "1"),
            Err(InputError::EmptyInput { what: "lower bound" })
        );
        assert!(matches!(
            validate_bounds(&mut arena, "0", "1/"),
            Err(InputError::ParseFailure { what: "upper bound", .. })
        ));
    }

    #[test]
    fn test_infinite_and_symbolic_bounds() {
        let mut arena = ExprArena::new();
        assert!(validate_bounds(&mut arena, "-∞", "∞").is_ok());
        assert!(validate_bounds(&mut arena, "0", "oo").is_ok());
        // Not numeric, so the order is not checked.
        assert!(validate_bounds(&mut arena, "t", "0").is_ok());
    }
}
