//! Derivative-divides substitution.
//!
//! An integrand `f(g(x)) * r(x)` where `r / g'` is free of `x` integrates
//! to `(r / g') * F(g(x))`. Each factor of a product is tried as the outer
//! function in turn:
//!
//! - `func(g)` uses the elementary table entry for `func`
//! - `g**n` with constant `n` uses the power rule (`log(g)` for `n = -1`)
//! - the factor itself as `g` (that is `g**1`) gives `g**2/2`

use smallvec::SmallVec;

use quadrant_core::{ExprArena, ExprHandle, ExprNode, Number};

use crate::table::elementary_antiderivative;

/// Tries each factor of `h` as the outer function of a substitution.
pub fn derivative_divides(arena: &mut ExprArena, h: ExprHandle, var: ExprHandle) -> Option<ExprHandle> {
    let factors = arena.factors_of(h);
    for i in 0..factors.len() {
        let rest: SmallVec<[ExprHandle; 4]> = factors
            .iter()
            .enumerate()
            .filter(|&(j, _)| j != i)
            .map(|(_, &f)| f)
            .collect();
        let rest = arena.mul(&rest);
        if let Some(r) = substitute_factor(arena, factors[i], rest, var) {
            return Some(r);
        }
    }
    None
}

fn substitute_factor(
    arena: &mut ExprArena,
    factor: ExprHandle,
    rest: ExprHandle,
    var: ExprHandle,
) -> Option<ExprHandle> {
    match arena.get(factor).clone() {
        ExprNode::Function { func, arg } => {
            if let Some(k) = ratio_to_derivative(arena, rest, arg, var) {
                let f = elementary_antiderivative(arena, func, arg);
                return Some(arena.mul(&[k, f]));
            }
        }
        ExprNode::Pow { base, exp } if arena.is_free_of(exp, var) => {
            if let Some(k) = ratio_to_derivative(arena, rest, base, var) {
                let f = power_antiderivative(arena, base, exp);
                return Some(arena.mul(&[k, f]));
            }
        }
        _ => {}
    }
    // The factor itself as the inner function: ∫g*g' = g²/2.
    let k = ratio_to_derivative(arena, rest, factor, var)?;
    let sq = arena.powi(factor, 2);
    let half = arena.number(Number::half());
    Some(arena.mul(&[k, half, sq]))
}

/// `rest / g'`, if that is free of `var`.
fn ratio_to_derivative(
    arena: &mut ExprArena,
    rest: ExprHandle,
    g: ExprHandle,
    var: ExprHandle,
) -> Option<ExprHandle> {
    if arena.is_free_of(g, var) {
        return None;
    }
    let dg = arena.diff(g, var);
    if arena.as_number(dg).is_some_and(|n| n.is_zero()) {
        return None;
    }
    let k = arena.div(rest, dg);
    if arena.is_free_of(k, var) && !arena.contains_undefined(k) {
        return Some(k);
    }
    // Products of sums rarely cancel before expansion.
    let expanded = arena.expand(k);
    (arena.is_free_of(expanded, var) && !arena.contains_undefined(expanded)).then_some(expanded)
}

/// ∫u**n du.
fn power_antiderivative(arena: &mut ExprArena, u: ExprHandle, n: ExprHandle) -> ExprHandle {
    if arena.as_number(n) == Some(Number::minus_one()) {
        return arena.log(u);
    }
    let one = arena.one();
    let n1 = arena.add(&[n, one]);
    let raised = arena.pow(u, n1);
    arena.div(raised, n1)
}
