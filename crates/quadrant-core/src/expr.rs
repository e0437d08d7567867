//! Expression node types.
//!
//! This module defines the nodes stored in the arena together with the
//! named constants and the elementary functions the engine understands.

use smallvec::SmallVec;

use crate::handle::ExprHandle;
use crate::number::Number;

/// Unique identifier for a symbol within one arena.
pub type SymbolId = u32;

/// Named mathematical constants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Constant {
    /// π.
    Pi,
    /// Euler's number.
    E,
    /// Positive infinity (`oo`). Negative infinity is `-1 * oo`.
    Infinity,
    /// An undefined value such as `oo - oo`, `0 * oo` or `1/0`.
    Undefined,
}

impl Constant {
    /// Name used by the plain-text printer and the parser.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Constant::Pi => "pi",
            Constant::E => "E",
            Constant::Infinity => "oo",
            Constant::Undefined => "nan",
        }
    }

    /// Floating-point value.
    #[must_use]
    pub const fn value(self) -> f64 {
        match self {
            Constant::Pi => std::f64::consts::PI,
            Constant::E => std::f64::consts::E,
            Constant::Infinity => f64::INFINITY,
            Constant::Undefined => f64::NAN,
        }
    }
}

/// Symmetry of a function under `u -> -u`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Parity {
    /// `f(-u) = -f(u)`
    Odd,
    /// `f(-u) = f(u)`
    Even,
    /// Neither.
    None,
}

/// Elementary functions of one argument.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Func {
    Sin,
    Cos,
    Tan,
    Cot,
    Sec,
    Csc,
    Asin,
    Acos,
    Atan,
    Sinh,
    Cosh,
    Tanh,
    Exp,
    /// Natural logarithm.
    Log,
    Abs,
}

impl Func {
    /// Every supported function, in canonical order.
    pub const ALL: [Func; 15] = [
        Func::Sin,
        Func::Cos,
        Func::Tan,
        Func::Cot,
        Func::Sec,
        Func::Csc,
        Func::Asin,
        Func::Acos,
        Func::Atan,
        Func::Sinh,
        Func::Cosh,
        Func::Tanh,
        Func::Exp,
        Func::Log,
        Func::Abs,
    ];

    /// Name used by the plain-text printer.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Func::Sin => "sin",
            Func::Cos => "cos",
            Func::Tan => "tan",
            Func::Cot => "cot",
            Func::Sec => "sec",
            Func::Csc => "csc",
            Func::Asin => "asin",
            Func::Acos => "acos",
            Func::Atan => "atan",
            Func::Sinh => "sinh",
            Func::Cosh => "cosh",
            Func::Tanh => "tanh",
            Func::Exp => "exp",
            Func::Log => "log",
            Func::Abs => "Abs",
        }
    }

    /// Resolves a function name as written by a user.
    ///
    /// Accepts the printer names plus the aliases `ln` and `abs`.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Func> {
        match name {
            "ln" => Some(Func::Log),
            "abs" => Some(Func::Abs),
            _ => Func::ALL.into_iter().find(|f| f.name() == name),
        }
    }

    /// Symmetry under negation of the argument.
    #[must_use]
    pub const fn parity(self) -> Parity {
        match self {
            Func::Sin
            | Func::Tan
            | Func::Cot
            | Func::Csc
            | Func::Asin
            | Func::Atan
            | Func::Sinh
            | Func::Tanh => Parity::Odd,
            Func::Cos | Func::Sec | Func::Cosh | Func::Abs => Parity::Even,
            Func::Acos | Func::Exp | Func::Log => Parity::None,
        }
    }

    /// Applies the function to a float. Out-of-domain inputs give NaN.
    #[must_use]
    pub fn apply(self, v: f64) -> f64 {
        match self {
            Func::Sin => v.sin(),
            Func::Cos => v.cos(),
            Func::Tan => v.tan(),
            Func::Cot => 1.0 / v.tan(),
            Func::Sec => 1.0 / v.cos(),
            Func::Csc => 1.0 / v.sin(),
            Func::Asin => v.asin(),
            Func::Acos => v.acos(),
            Func::Atan => v.atan(),
            Func::Sinh => v.sinh(),
            Func::Cosh => v.cosh(),
            Func::Tanh => v.tanh(),
            Func::Exp => v.exp(),
            Func::Log => {
                if v < 0.0 {
                    f64::NAN
                } else {
                    v.ln()
                }
            }
            Func::Abs => v.abs(),
        }
    }
}

/// An expression node stored in the arena.
///
/// Compound nodes only ever reference canonical children; the invariants
/// below hold for every node produced by the arena's constructors.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ExprNode {
    /// An exact rational number.
    Number(Number),

    /// A symbolic variable.
    Symbol(SymbolId),

    /// A named constant.
    Constant(Constant),

    /// Sum of expressions.
    ///
    /// Invariant: at least 2 arguments, no nested sums, sorted.
    Add(SmallVec<[ExprHandle; 4]>),

    /// Product of expressions.
    ///
    /// Invariant: at least 2 arguments, no nested products, at most one
    /// numeric coefficient which sorts first.
    Mul(SmallVec<[ExprHandle; 4]>),

    /// Power expression: base^exp. Division is `a * b^-1`.
    Pow {
        /// The base of the power.
        base: ExprHandle,
        /// The exponent.
        exp: ExprHandle,
    },

    /// An elementary function applied to one argument.
    Function {
        /// Which function.
        func: Func,
        /// The argument.
        arg: ExprHandle,
    },

    /// A definite integral with no closed form, kept unevaluated.
    ///
    /// `var` is bound inside `integrand` and is not free in the node.
    Integral {
        /// The integrand.
        integrand: ExprHandle,
        /// The integration variable (a symbol).
        var: ExprHandle,
        /// Lower bound.
        lower: ExprHandle,
        /// Upper bound.
        upper: ExprHandle,
    },
}

impl ExprNode {
    /// Returns true if this node is an atom (no children).
    #[must_use]
    pub fn is_atom(&self) -> bool {
        matches!(
            self,
            ExprNode::Number(_) | ExprNode::Symbol(_) | ExprNode::Constant(_)
        )
    }

    /// Returns the number if this node is one.
    #[must_use]
    pub fn as_number(&self) -> Option<Number> {
        match self {
            ExprNode::Number(n) => Some(n.clone()),
            _ => None,
        }
    }

    /// Returns the children of this node.
    #[must_use]
    pub fn children(&self) -> SmallVec<[ExprHandle; 4]> {
        match self {
            ExprNode::Number(_) | ExprNode::Symbol(_) | ExprNode::Constant(_) => SmallVec::new(),
            ExprNode::Add(args) | ExprNode::Mul(args) => args.clone(),
            ExprNode::Pow { base, exp } => smallvec::smallvec![*base, *exp],
            ExprNode::Function { arg, .. } => smallvec::smallvec![*arg],
            ExprNode::Integral {
                integrand,
                var,
                lower,
                upper,
            } => smallvec::smallvec![*integrand, *var, *lower, *upper],
        }
    }
}
