//! Integration result types.
//!
//! `IntegrationResult` captures the outcome of indefinite integration: a
//! closed-form antiderivative, or the reason none was produced.

use quadrant_core::ExprHandle;

/// Result of indefinite integration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IntegrationResult {
    /// A closed-form symbolic antiderivative was found.
    Symbolic(SymbolicAntiderivative),

    /// No rule applied.
    Unknown(UnknownReason),
}

impl IntegrationResult {
    /// Returns true if a symbolic result was found.
    #[must_use]
    pub fn is_symbolic(&self) -> bool {
        matches!(self, IntegrationResult::Symbolic(_))
    }

    /// Extracts the symbolic antiderivative if available.
    #[must_use]
    pub fn as_symbolic(&self) -> Option<&SymbolicAntiderivative> {
        match self {
            IntegrationResult::Symbolic(s) => Some(s),
            IntegrationResult::Unknown(_) => None,
        }
    }

    /// The antiderivative expression, if one was found.
    #[must_use]
    pub fn antiderivative(&self) -> Option<ExprHandle> {
        self.as_symbolic().map(|s| s.result)
    }
}

/// Symbolic antiderivative in closed form, without the constant of
/// integration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SymbolicAntiderivative {
    /// The antiderivative expression.
    pub result: ExprHandle,

    /// Rule applied at the top level.
    pub method: IntegrationMethod,

    /// Whether differentiation reproduced the integrand at sample points.
    /// Always false when verification is switched off.
    pub verified: bool,
}

impl SymbolicAntiderivative {
    /// Creates an unverified antiderivative.
    #[must_use]
    pub fn new(result: ExprHandle, method: IntegrationMethod) -> Self {
        Self {
            result,
            method,
            verified: false,
        }
    }

    /// Sets the verified flag.
    #[must_use]
    pub fn with_verified(mut self, verified: bool) -> Self {
        self.verified = verified;
        self
    }
}

/// Method used for integration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IntegrationMethod {
    /// Integrand free of the variable: ∫c dx = c·x
    Constant,
    /// Simple power rule on an expanded polynomial: ∫x^n dx = x^(n+1)/(n+1)
    PowerRule,
    /// Term-by-term integration of a sum
    Linearity,
    /// Table lookup for functions of a linear argument
    TableLookup,
    /// Derivative-divides substitution
    Substitution,
    /// Integration by parts
    ByParts,
}

impl std::fmt::Display for IntegrationMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IntegrationMethod::Constant => write!(f, "constant rule"),
            IntegrationMethod::PowerRule => write!(f, "power rule"),
            IntegrationMethod::Linearity => write!(f, "linearity"),
            IntegrationMethod::TableLookup => write!(f, "table lookup"),
            IntegrationMethod::Substitution => write!(f, "substitution"),
            IntegrationMethod::ByParts => write!(f, "integration by parts"),
        }
    }
}

/// Reason why integration could not determine a result.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnknownReason {
    /// The integration variable is not a symbol
    VariableNotSymbol,
    /// The integrand contains an undefined value
    UndefinedIntegrand,
    /// Recursion went deeper than the dispatcher allows
    ComplexityLimit,
    /// No rule matched the integrand
    UnsupportedForm,
}

impl std::fmt::Display for UnknownReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnknownReason::VariableNotSymbol => write!(f, "integration variable is not a symbol"),
            UnknownReason::UndefinedIntegrand => write!(f, "integrand is undefined"),
            UnknownReason::ComplexityLimit => write!(f, "expression too complex"),
            UnknownReason::UnsupportedForm => write!(f, "unsupported expression form"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quadrant_core::ExprArena;

    #[test]
    fn test_result_accessors() {
        let mut arena = ExprArena::new();
        let x = arena.symbol("x");
        let found = IntegrationResult::Symbolic(
            SymbolicAntiderivative::new(x, IntegrationMethod::Constant).with_verified(true),
        );
        assert!(found.is_symbolic());
        assert_eq!(found.antiderivative(), Some(x));
        assert!(found.as_symbolic().is_some_and(|s| s.verified));

        let missing = IntegrationResult::Unknown(UnknownReason::UnsupportedForm);
        assert_eq!(missing.antiderivative(), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(IntegrationMethod::ByParts.to_string(), "integration by parts");
        assert_eq!(
            UnknownReason::UnsupportedForm.to_string(),
            "unsupported expression form"
        );
    }
}
