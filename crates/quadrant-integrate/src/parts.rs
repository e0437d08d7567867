//! Integration by parts.
//!
//! Four shapes are handled:
//!
//! - `P(x) * T(u)` with `P` a polynomial and `T` one of `sin cos exp sinh
//!   cosh` (or `c**u`) of a linear `u`, by the tabular method:
//!   ∫P·T = Σ (-1)^k P^(k) T_(k+1), where T_(k+1) is the (k+1)-fold
//!   antiderivative of T. The sum stops when the derivative of P vanishes.
//! - `P(x) * f(u)**2` for `f` in `sin cos sinh cosh`, rewritten through the
//!   double angle (`sin(u)**2 = (1 - cos(2u))/2`) into the tabular case.
//! - `P(x) * log(a*x)**n`, repeatedly: ∫P·logⁿ = Q·logⁿ - n∫(Q/x)·logⁿ⁻¹
//!   with Q = ∫P. A bare `log(a*x)**n` has `P = 1`.
//! - `exp(u) * sin(v)` and `exp(u) * cos(v)` for linear `u`, `v`, whose
//!   parts integration cycles back to the start and closes in one step.

use smallvec::SmallVec;

use quadrant_core::{ExprArena, ExprHandle, ExprNode, Func, Number};

use crate::polynomial::{LinearForm, Polynomial};
use crate::table::integrate_table;

/// Integrates `h` by parts, if it has one of the supported shapes.
pub fn integrate_by_parts(arena: &mut ExprArena, h: ExprHandle, var: ExprHandle) -> Option<ExprHandle> {
    let factors = arena.factors_of(h);
    if factors.len() == 2 {
        if let Some(r) = exp_trig_cycle(arena, factors[0], factors[1], var) {
            return Some(r);
        }
    }

    // Exactly one factor may fall outside the polynomial part.
    let mut outside = None;
    let mut poly_factors: SmallVec<[ExprHandle; 4]> = SmallVec::new();
    for &f in &factors {
        if is_polynomial_factor(arena, f, var) {
            poly_factors.push(f);
        } else if outside.replace(f).is_some() {
            return None;
        }
    }
    let t = outside?;
    let p = arena.mul(&poly_factors);
    if let Some((arg, n)) = log_power(arena, t) {
        return polynomial_times_log_power(arena, p, arg, n, var);
    }
    if arena.is_free_of(p, var) {
        return None;
    }

    if let Some(r) = polynomial_times_square(arena, p, t, var) {
        return Some(r);
    }
    if is_tabular_kernel(arena, t, var) {
        return tabular(arena, p, t, var);
    }
    None
}

/// Highest power of a logarithm integrated by repeated parts.
const MAX_LOG_POWER: i64 = 8;

/// `(a*x, n)` for `log(a*x)**n` with `1 <= n <= MAX_LOG_POWER`.
fn log_power(arena: &ExprArena, t: ExprHandle) -> Option<(ExprHandle, i64)> {
    match arena.get(t) {
        ExprNode::Function {
            func: Func::Log,
            arg,
        } => Some((*arg, 1)),
        ExprNode::Pow { base, exp } => {
            let ExprNode::Function {
                func: Func::Log,
                arg,
            } = arena.get(*base)
            else {
                return None;
            };
            let n = arena.as_number(*exp)?.to_integer()?;
            (1..=MAX_LOG_POWER).contains(&n).then_some((*arg, n))
        }
        _ => None,
    }
}

fn is_polynomial_factor(arena: &ExprArena, f: ExprHandle, var: ExprHandle) -> bool {
    if f == var || arena.is_free_of(f, var) {
        return true;
    }
    match arena.get(f) {
        ExprNode::Pow { base, exp } => {
            arena.as_number(*exp).is_some_and(|n| n.is_integer() && n.is_positive())
                && is_polynomial_factor(arena, *base, var)
        }
        ExprNode::Add(args) | ExprNode::Mul(args) => {
            args.iter().all(|&c| is_polynomial_factor(arena, c, var))
        }
        _ => false,
    }
}

/// Functions whose repeated antiderivatives stay in the table.
fn is_tabular_kernel(arena: &ExprArena, t: ExprHandle, var: ExprHandle) -> bool {
    match arena.get(t) {
        ExprNode::Function { func, .. } => matches!(
            func,
            Func::Sin | Func::Cos | Func::Exp | Func::Sinh | Func::Cosh
        ),
        ExprNode::Pow { base, .. } => arena.is_free_of(*base, var),
        _ => false,
    }
}

/// Antiderivative of `c * k(u)` for a tabular kernel `k`.
fn integrate_scaled(arena: &mut ExprArena, t: ExprHandle, var: ExprHandle) -> Option<ExprHandle> {
    let (constant, body): (SmallVec<[ExprHandle; 4]>, SmallVec<[ExprHandle; 4]>) = arena
        .factors_of(t)
        .into_iter()
        .partition(|&f| arena.is_free_of(f, var));
    let body = arena.mul(&body);
    let integrated = integrate_table(arena, body, var)?;
    let c = arena.mul(&constant);
    Some(arena.mul(&[c, integrated]))
}

fn tabular(arena: &mut ExprArena, p: ExprHandle, t: ExprHandle, var: ExprHandle) -> Option<ExprHandle> {
    let poly = Polynomial::from_expr(arena, p, var)?;
    let mut derivative = poly;
    let mut antiderivative = integrate_scaled(arena, t, var)?;
    let mut terms = Vec::with_capacity(derivative.degree() + 1);
    let mut negative = false;

    while !derivative.is_zero() {
        let pk = derivative.to_expr(arena, var);
        let mut term = arena.mul(&[pk, antiderivative]);
        if negative {
            term = arena.neg(term);
        }
        terms.push(term);

        derivative = derivative.derivative(arena);
        if derivative.is_zero() {
            break;
        }
        antiderivative = integrate_scaled(arena, antiderivative, var)?;
        negative = !negative;
    }
    Some(arena.add(&terms))
}

/// ∫P·log(a*x)**n = Q·log(a*x)**n - n·∫(Q/x)·log(a*x)**(n-1), where
/// Q = ∫P has no constant term, so Q/x is again a polynomial.
fn polynomial_times_log_power(
    arena: &mut ExprArena,
    p: ExprHandle,
    arg: ExprHandle,
    n: i64,
    var: ExprHandle,
) -> Option<ExprHandle> {
    let lin = LinearForm::from_expr(arena, arg, var)?;
    if !lin.is_homogeneous(arena) {
        return None;
    }
    let q = Polynomial::from_expr(arena, p, var)?.integrate(arena);
    let q_expr = q.to_expr(arena, var);
    if n == 0 {
        return Some(q_expr);
    }
    let inv = arena.recip(var);
    let quotient = arena.mul(&[q_expr, inv]);
    let rest = polynomial_times_log_power(arena, quotient, arg, n - 1, var)?;

    let log = arena.log(arg);
    let log_n = arena.powi(log, n);
    let main = arena.mul(&[q_expr, log_n]);
    let k = arena.integer(n);
    let scaled = arena.mul(&[k, rest]);
    Some(arena.sub(main, scaled))
}

/// ∫P·f(u)**2 through the double-angle identities
///
/// ```text
/// sin(u)**2  = 1/2 - cos(2u)/2     cos(u)**2  = 1/2 + cos(2u)/2
/// sinh(u)**2 = cosh(2u)/2 - 1/2    cosh(u)**2 = cosh(2u)/2 + 1/2
/// ```
fn polynomial_times_square(
    arena: &mut ExprArena,
    p: ExprHandle,
    t: ExprHandle,
    var: ExprHandle,
) -> Option<ExprHandle> {
    let ExprNode::Pow { base, exp } = arena.get(t).clone() else {
        return None;
    };
    if arena.as_number(exp) != Some(Number::integer(2)) {
        return None;
    }
    let ExprNode::Function { func, arg: u } = arena.get(base).clone() else {
        return None;
    };
    let (double_func, constant_sign) = match func {
        Func::Sin | Func::Cos => (Func::Cos, 1),
        Func::Sinh => (Func::Cosh, -1),
        Func::Cosh => (Func::Cosh, 1),
        _ => return None,
    };
    LinearForm::from_expr(arena, u, var)?;

    let two = arena.integer(2);
    let double = arena.mul(&[two, u]);
    let kernel = arena.func(double_func, double);
    let oscillating = tabular(arena, p, kernel, var)?;
    let oscillating = if func == Func::Sin {
        arena.neg(oscillating)
    } else {
        oscillating
    };
    let mut constant = Polynomial::from_expr(arena, p, var)?
        .integrate(arena)
        .to_expr(arena, var);
    if constant_sign < 0 {
        constant = arena.neg(constant);
    }
    let sum = arena.add(&[constant, oscillating]);
    let half = arena.number(Number::half());
    Some(arena.mul(&[half, sum]))
}

/// ∫exp(u)·sin(v) = exp(u)·(a·sin(v) - c·cos(v))/(a² + c²)
/// ∫exp(u)·cos(v) = exp(u)·(a·cos(v) + c·sin(v))/(a² + c²)
/// with `a`, `c` the slopes of `u`, `v`.
fn exp_trig_cycle(
    arena: &mut ExprArena,
    f: ExprHandle,
    g: ExprHandle,
    var: ExprHandle,
) -> Option<ExprHandle> {
    let (ExprNode::Function { func: ff, arg: fa }, ExprNode::Function { func: gf, arg: ga }) =
        (arena.get(f).clone(), arena.get(g).clone())
    else {
        return None;
    };
    let (u, trig, v) = match (ff, gf) {
        (Func::Exp, Func::Sin | Func::Cos) => (fa, gf, ga),
        (Func::Sin | Func::Cos, Func::Exp) => (ga, ff, fa),
        _ => return None,
    };
    let a = LinearForm::from_expr(arena, u, var)?.slope;
    let c = LinearForm::from_expr(arena, v, var)?.slope;

    let e = arena.exp(u);
    let s = arena.sin(v);
    let co = arena.cos(v);
    let inner = if trig == Func::Sin {
        let a_s = arena.mul(&[a, s]);
        let c_co = arena.mul(&[c, co]);
        arena.sub(a_s, c_co)
    } else {
        let a_co = arena.mul(&[a, co]);
        let c_s = arena.mul(&[c, s]);
        arena.add(&[a_co, c_s])
    };
    let a2 = arena.powi(a, 2);
    let c2 = arena.powi(c, 2);
    let denom = arena.add(&[a2, c2]);
    let num = arena.mul(&[e, inner]);
    Some(arena.div(num, denom))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parts(src: &str) -> Option<String> {
        let mut arena = ExprArena::new();
        let x = arena.symbol("x");
        let h = arena.parse(src).unwrap();
        integrate_by_parts(&mut arena, h, x).map(|r| arena.to_text(r))
    }

    fn check(src: &str, points: &[f64]) {
        let mut arena = ExprArena::new();
        let x = arena.symbol("x");
        let h = arena.parse(src).unwrap();
        let f = integrate_by_parts(&mut arena, h, x).unwrap_or_else(|| panic!("{src}"));
        let d = arena.diff(f, x);
        for &p in points {
            let want = arena.evaluate_at(h, x, p).unwrap();
            let got = arena.evaluate_at(d, x, p).unwrap();
            assert!(
                (want - got).abs() < 1e-9 * (1.0 + want.abs()),
                "{src} at {p}: {got} vs {want}"
            );
        }
    }

    #[test]
    fn test_x_exp() {
        assert_eq!(parts("x*exp(x)").as_deref(), Some("x*exp(x) - exp(x)"));
    }

    #[test]
    fn test_log_powers() {
        assert!(parts("log(x)").is_some());

        // ∫₁ᵉ log(x)² dx = e - 2
        let mut arena = ExprArena::new();
        let x = arena.symbol("x");
        let h = arena.parse("log(x)**2").unwrap();
        let f = integrate_by_parts(&mut arena, h, x).unwrap();
        let e = std::f64::consts::E;
        let value = arena.evaluate_at(f, x, e).unwrap() - arena.evaluate_at(f, x, 1.0).unwrap();
        assert!((value - (e - 2.0)).abs() < 1e-12);
    }

    #[test]
    fn test_not_applicable() {
        assert_eq!(parts("sin(x)"), None);
        assert_eq!(parts("sin(x)**2"), None);
        assert_eq!(parts("x**2"), None);
        assert_eq!(parts("log(x)**9"), None);
        assert_eq!(parts("exp(x)*log(x)"), None);
        assert_eq!(parts("x*log(x + 1)"), None);
    }

    #[test]
    fn test_parts_differentiate_back() {
        for src in [
            "x*sin(x)",
            "x**2*cos(x)",
            "x**3*exp(-x)",
            "(x + 1)*exp(2*x)",
            "x*sinh(x)",
            "x*2**x",
            "x*log(x)",
            "x**2*log(3*x)",
            "exp(x)*sin(x)",
            "exp(2*x)*cos(3*x + 1)",
            "x**2*sin(x)**2",
            "x*cos(2*x + 1)**2",
            "x*sinh(x)**2",
            "(x + 1)*cosh(x)**2",
            "(x + 1)**2*sin(x)",
            "log(x)**2",
            "log(2*x)**3",
            "x*log(x)**2",
            "(x**2 + 1)*log(x)**2",
        ] {
            check(src, &[0.5, 1.2, 2.0]);
        }
    }
}
