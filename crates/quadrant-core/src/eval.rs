//! Floating-point evaluation.

use thiserror::Error;

use crate::arena::ExprArena;
use crate::expr::{Constant, ExprNode, Func, SymbolId};
use crate::handle::ExprHandle;

/// Errors that can occur while evaluating an expression numerically.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    /// A symbol had no binding.
    #[error("free symbol '{0}' has no value")]
    FreeSymbol(String),

    /// A function was applied outside its real domain.
    #[error("{func} is not defined at {value}")]
    Domain {
        /// The function name.
        func: &'static str,
        /// The offending argument.
        value: f64,
    },

    /// A negative base raised to a non-integer power.
    #[error("({base})**({exp}) is not a real number")]
    ComplexPower {
        /// The base.
        base: f64,
        /// The exponent.
        exp: f64,
    },

    /// The expression is, or evaluates to, an undefined value.
    #[error("expression is undefined")]
    Undefined,

    /// An unevaluated integral cannot be evaluated pointwise.
    #[error("unevaluated integral has no pointwise value")]
    Unevaluated,
}

/// Result type for evaluation.
pub type EvalResult = Result<f64, EvalError>;

fn defined(v: f64) -> EvalResult {
    if v.is_nan() {
        Err(EvalError::Undefined)
    } else {
        Ok(v)
    }
}

impl ExprArena {
    /// Evaluates an expression with no free symbols.
    ///
    /// # Errors
    ///
    /// Returns an error if a symbol is free or a domain is violated.
    pub fn evaluate(&self, h: ExprHandle) -> EvalResult {
        self.eval_with(h, &[])
    }

    /// Evaluates `h` with the symbol `var` bound to `value`.
    ///
    /// Infinite results (a pole, `exp` overflow) are returned as values.
    ///
    /// # Errors
    ///
    /// Returns an error if another symbol is free, a domain is violated, or
    /// the result is undefined.
    pub fn evaluate_at(&self, h: ExprHandle, var: ExprHandle, value: f64) -> EvalResult {
        match self.get(var) {
            ExprNode::Symbol(id) => self.eval_with(h, &[(*id, value)]),
            _ => self.eval_with(h, &[]),
        }
    }

    fn eval_with(&self, h: ExprHandle, env: &[(SymbolId, f64)]) -> EvalResult {
        match self.get(h) {
            ExprNode::Number(n) => Ok(n.to_f64()),
            ExprNode::Constant(Constant::Undefined) => Err(EvalError::Undefined),
            ExprNode::Constant(c) => Ok(c.value()),
            ExprNode::Symbol(id) => env
                .iter()
                .find(|(bound, _)| bound == id)
                .map(|(_, v)| *v)
                .ok_or_else(|| EvalError::FreeSymbol(self.symbol_name(*id).to_owned())),
            ExprNode::Add(args) => {
                let mut sum = 0.0;
                for &a in args {
                    sum += self.eval_with(a, env)?;
                }
                defined(sum)
            }
            ExprNode::Mul(args) => {
                let mut product = 1.0;
                for &a in args {
                    product *= self.eval_with(a, env)?;
                }
                defined(product)
            }
            ExprNode::Pow { base, exp } => {
                let b = self.eval_with(*base, env)?;
                let e = self.eval_with(*exp, env)?;
                self.eval_pow(b, *exp, e)
            }
            ExprNode::Function { func, arg } => {
                let v = self.eval_with(*arg, env)?;
                eval_function(*func, v)
            }
            ExprNode::Integral { .. } => Err(EvalError::Unevaluated),
        }
    }

    fn eval_pow(&self, b: f64, exp: ExprHandle, e: f64) -> EvalResult {
        if let Some(n) = self.as_number(exp).and_then(|n| n.to_integer()) {
            if let Ok(n) = i32::try_from(n) {
                return defined(b.powi(n));
            }
        }
        if b < 0.0 && e.fract() != 0.0 {
            return Err(EvalError::ComplexPower { base: b, exp: e });
        }
        defined(b.powf(e))
    }
}

fn eval_function(func: Func, v: f64) -> EvalResult {
    let domain = || EvalError::Domain {
        func: func.name(),
        value: v,
    };
    match func {
        Func::Log if v < 0.0 => return Err(domain()),
        Func::Asin | Func::Acos if !(-1.0..=1.0).contains(&v) => return Err(domain()),
        _ => {}
    }
    let out = func.apply(v);
    if out.is_nan() {
        Err(domain())
    } else {
        Ok(out)
    }
}
