//! One-sided values of an antiderivative at an integration bound.
//!
//! Plain substitution handles most bounds. When it produces an undefined
//! value (`0*log(0)`, `oo*exp(-oo)`, `oo - oo`), the antiderivative is
//! examined term by term with a few growth-rate rules:
//!
//! - `x**k * log(x)**m` with `k > 0` tends to 0 as `x → 0⁺`
//! - `c*log(x)` tends to `-sign(c)*oo` as `x → 0⁺`
//! - `P(x) * log(x)**m * exp(u)` tends to 0 when `u → -∞`
//! - `log(x)**m * x**k` with `k < 0` tends to 0 as `x → ±∞`
//! - a polynomial tends to `±oo` following its leading term

use smallvec::SmallVec;

use quadrant_core::{ExprArena, ExprHandle, ExprNode, Func};

use crate::polynomial::{LinearForm, Polynomial};

/// The side from which a bound is approached.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Approach {
    /// x → +∞
    PosInfinity,
    /// x → -∞
    NegInfinity,
    /// x → a from the right (a lower bound)
    Right(ExprHandle),
    /// x → a from the left (an upper bound)
    Left(ExprHandle),
}

impl Approach {
    /// The approach for a lower integration bound.
    pub fn lower(arena: &ExprArena, bound: ExprHandle) -> Self {
        if arena.is_pos_infinity(bound) {
            Self::PosInfinity
        } else if arena.is_neg_infinity(bound) {
            Self::NegInfinity
        } else {
            Self::Right(bound)
        }
    }

    /// The approach for an upper integration bound.
    pub fn upper(arena: &ExprArena, bound: ExprHandle) -> Self {
        if arena.is_pos_infinity(bound) {
            Self::PosInfinity
        } else if arena.is_neg_infinity(bound) {
            Self::NegInfinity
        } else {
            Self::Left(bound)
        }
    }

    fn point(self, arena: &mut ExprArena) -> ExprHandle {
        match self {
            Self::PosInfinity => arena.infinity(),
            Self::NegInfinity => arena.neg_infinity(),
            Self::Right(p) | Self::Left(p) => p,
        }
    }

    fn is_infinite(self) -> bool {
        matches!(self, Self::PosInfinity | Self::NegInfinity)
    }

    fn is_zero_from_right(self, arena: &ExprArena) -> bool {
        matches!(self, Self::Right(p) if arena.as_number(p).is_some_and(|n| n.is_zero()))
    }

    fn is_zero(self, arena: &ExprArena) -> bool {
        matches!(self, Self::Right(p) | Self::Left(p) if arena.as_number(p).is_some_and(|n| n.is_zero()))
    }
}

/// Value of `f` as `var` approaches the bound.
///
/// Returns the undefined value when no rule resolves an indeterminate form.
pub fn value_at(arena: &mut ExprArena, f: ExprHandle, var: ExprHandle, approach: Approach) -> ExprHandle {
    let point = approach.point(arena);
    let direct = arena.substitute(f, var, point);
    if !arena.contains_undefined(direct) {
        return direct;
    }
    if let Some(v) = polynomial_limit(arena, f, var, approach) {
        return v;
    }

    let expanded = arena.expand(f);
    let mut parts: SmallVec<[ExprHandle; 4]> = SmallVec::new();
    for term in arena.terms_of(expanded) {
        let v = arena.substitute(term, var, point);
        if !arena.contains_undefined(v) {
            parts.push(v);
            continue;
        }
        match term_limit(arena, term, var, approach) {
            Some(v) => parts.push(v),
            None => return arena.undefined(),
        }
    }
    arena.add(&parts)
}

/// `±oo` for a non-constant polynomial at an infinite bound.
fn polynomial_limit(
    arena: &mut ExprArena,
    f: ExprHandle,
    var: ExprHandle,
    approach: Approach,
) -> Option<ExprHandle> {
    if !approach.is_infinite() {
        return None;
    }
    let poly = Polynomial::from_expr(arena, f, var)?;
    if poly.degree() == 0 {
        return None;
    }
    let lead = arena.evaluate(poly.leading()?).ok()?;
    if lead == 0.0 || !lead.is_finite() {
        return None;
    }
    let odd = poly.degree() % 2 == 1;
    let positive = (lead > 0.0) != (approach == Approach::NegInfinity && odd);
    Some(signed_infinity(arena, positive))
}

fn signed_infinity(arena: &mut ExprArena, positive: bool) -> ExprHandle {
    if positive {
        arena.infinity()
    } else {
        arena.neg_infinity()
    }
}

/// Shape of one product term, as seen by the growth-rate rules.
#[derive(Default)]
struct TermShape {
    /// Total exponent of the variable.
    power: f64,
    /// Total exponent of `log(a*x)` factors.
    logs: u32,
    /// An `exp(u)` factor with `u → -∞` at the bound.
    decaying: bool,
    /// An `exp(u)` factor with `u → +∞` at the bound.
    growing: bool,
    /// Product of the factors free of the variable.
    coeff: f64,
}

fn term_limit(arena: &mut ExprArena, term: ExprHandle, var: ExprHandle, approach: Approach) -> Option<ExprHandle> {
    let shape = classify(arena, term, var, approach)?;

    if approach.is_zero(arena) && shape.power > 0.0 && !shape.growing {
        return Some(arena.zero());
    }
    if approach.is_zero_from_right(arena) && shape.power == 0.0 && shape.logs == 1 {
        // log(x) → -∞
        return (shape.coeff != 0.0).then(|| signed_infinity(arena, shape.coeff < 0.0));
    }
    if approach.is_infinite() {
        if shape.decaying && !shape.growing {
            return Some(arena.zero());
        }
        if !shape.growing && shape.power < 0.0 {
            return Some(arena.zero());
        }
    }
    None
}

fn classify(arena: &mut ExprArena, term: ExprHandle, var: ExprHandle, approach: Approach) -> Option<TermShape> {
    let mut shape = TermShape {
        coeff: 1.0,
        ..TermShape::default()
    };
    for factor in arena.factors_of(term) {
        if arena.is_free_of(factor, var) {
            shape.coeff *= arena.evaluate(factor).ok()?;
            continue;
        }
        if factor == var {
            shape.power += 1.0;
            continue;
        }
        match arena.get(factor).clone() {
            ExprNode::Pow { base, exp } if base == var => {
                shape.power += arena.as_number(exp)?.to_f64();
            }
            ExprNode::Pow { base, exp } => {
                let n = arena.as_number(exp)?.to_integer()?;
                if n <= 0 || !is_log_of_multiple(arena, base, var) {
                    return None;
                }
                shape.logs += u32::try_from(n).ok()?;
            }
            ExprNode::Function { func: Func::Log, .. } if is_log_of_multiple(arena, factor, var) => {
                shape.logs += 1;
            }
            ExprNode::Function { func: Func::Exp, arg } => {
                if !approach.is_infinite() {
                    return None;
                }
                let slope = LinearForm::from_expr(arena, arg, var)?.slope;
                let slope = arena.evaluate(slope).ok()?;
                let toward_minus = (slope < 0.0) == (approach == Approach::PosInfinity);
                if toward_minus {
                    shape.decaying = true;
                } else {
                    shape.growing = true;
                }
            }
            _ => return None,
        }
    }
    Some(shape)
}

/// True for `log(a*x)` with `a` free of `x`.
fn is_log_of_multiple(arena: &mut ExprArena, h: ExprHandle, var: ExprHandle) -> bool {
    let ExprNode::Function { func: Func::Log, arg } = *arena.get(h) else {
        return false;
    };
    LinearForm::from_expr(arena, arg, var).is_some_and(|lin| lin.is_homogeneous(arena))
}
