//! Table of standard antiderivatives.
//!
//! Entries cover an elementary function of a linear argument `u = a*x + b`,
//! where ∫f(u) dx = F(u)/a, plus a handful of fixed shapes:
//!
//! | integrand            | antiderivative                     |
//! |----------------------|------------------------------------|
//! | `u**n`, `n != -1`    | `u**(n+1)/((n+1)*a)`               |
//! | `1/u`                | `log(u)/a`                         |
//! | `c**u`               | `c**u/(a*log(c))`                  |
//! | `sin(u)**2`          | `u/2 - sin(u)*cos(u)/2`, over `a`  |
//! | `cos(u)**2`          | `u/2 + sin(u)*cos(u)/2`, over `a`  |
//! | `sinh(u)**2`         | `sinh(u)*cosh(u)/2 - u/2`, over `a` |
//! | `cosh(u)**2`         | `sinh(u)*cosh(u)/2 + u/2`, over `a` |
//! | `tanh(u)**2`         | `u - tanh(u)`, over `a`            |
//! | `f(u)**n`, `f` in `sin cos sinh cosh`, `n >= 3` | power reduction |
//! | `sin(u)*cos(u)`      | `sin(u)**2/(2*a)`                  |
//! | `1/(p*x**2 + s*x + q)` | `atan` or `log` form by discriminant |
//! | `1/sqrt(q - p*x**2)` | `asin(x*sqrt(p/q))/sqrt(p)`        |
//! | `1/sqrt(p*x**2 + q)` | `log(sqrt(p)*x + sqrt(p*x**2 + q))/sqrt(p)` |

use quadrant_core::{ExprArena, ExprHandle, ExprNode, Func, Number};

use crate::polynomial::{LinearForm, Polynomial};

/// Looks up `h` in the table.
///
/// `h` should already be stripped of factors free of `var`.
pub fn integrate_table(arena: &mut ExprArena, h: ExprHandle, var: ExprHandle) -> Option<ExprHandle> {
    match arena.get(h).clone() {
        ExprNode::Function { func, arg } => {
            let lin = LinearForm::from_expr(arena, arg, var)?;
            let f = elementary_antiderivative(arena, func, arg);
            Some(arena.div(f, lin.slope))
        }
        ExprNode::Pow { base, exp } => integrate_power(arena, base, exp, var),
        ExprNode::Mul(factors) if factors.len() == 2 => {
            sin_cos_product(arena, factors[0], factors[1], var)
        }
        _ => None,
    }
}

/// F(u) with F' = f, for an elementary function `f` of `u`.
pub fn elementary_antiderivative(arena: &mut ExprArena, func: Func, u: ExprHandle) -> ExprHandle {
    match func {
        Func::Sin => {
            let c = arena.cos(u);
            arena.neg(c)
        }
        Func::Cos => arena.sin(u),
        Func::Tan => {
            let c = arena.cos(u);
            let l = arena.log(c);
            arena.neg(l)
        }
        Func::Cot => {
            let s = arena.sin(u);
            arena.log(s)
        }
        Func::Sec => {
            let s = arena.func(Func::Sec, u);
            let t = arena.func(Func::Tan, u);
            let sum = arena.add(&[s, t]);
            arena.log(sum)
        }
        Func::Csc => {
            let c = arena.func(Func::Csc, u);
            let t = arena.func(Func::Cot, u);
            let sum = arena.add(&[c, t]);
            let l = arena.log(sum);
            arena.neg(l)
        }
        Func::Asin | Func::Acos => {
            // u*asin(u) + sqrt(1 - u**2), u*acos(u) - sqrt(1 - u**2)
            let f = arena.func(func, u);
            let uf = arena.mul(&[u, f]);
            let root = one_minus_square_root(arena, u);
            if func == Func::Asin {
                arena.add(&[uf, root])
            } else {
                arena.sub(uf, root)
            }
        }
        Func::Atan => {
            // u*atan(u) - log(u**2 + 1)/2
            let f = arena.func(Func::Atan, u);
            let uf = arena.mul(&[u, f]);
            let u2 = arena.powi(u, 2);
            let one = arena.one();
            let sum = arena.add(&[u2, one]);
            let l = arena.log(sum);
            let half = arena.number(Number::half());
            let hl = arena.mul(&[half, l]);
            arena.sub(uf, hl)
        }
        Func::Sinh => arena.func(Func::Cosh, u),
        Func::Cosh => arena.func(Func::Sinh, u),
        Func::Tanh => {
            let c = arena.func(Func::Cosh, u);
            arena.log(c)
        }
        Func::Exp => arena.exp(u),
        Func::Log => {
            // u*log(u) - u
            let l = arena.log(u);
            let ul = arena.mul(&[u, l]);
            arena.sub(ul, u)
        }
        Func::Abs => {
            // u*|u|/2
            let a = arena.func(Func::Abs, u);
            let half = arena.number(Number::half());
            arena.mul(&[half, u, a])
        }
    }
}

fn one_minus_square_root(arena: &mut ExprArena, u: ExprHandle) -> ExprHandle {
    let u2 = arena.powi(u, 2);
    let one = arena.one();
    let diff = arena.sub(one, u2);
    arena.sqrt(diff)
}

fn integrate_power(
    arena: &mut ExprArena,
    base: ExprHandle,
    exp: ExprHandle,
    var: ExprHandle,
) -> Option<ExprHandle> {
    if arena.is_free_of(exp, var) {
        if let Some(lin) = LinearForm::from_expr(arena, base, var) {
            return Some(linear_power(arena, base, exp, lin));
        }
        if let Some(r) = squared_function(arena, base, exp, var) {
            return Some(r);
        }
        if let Some(r) = reduced_power(arena, base, exp, var) {
            return Some(r);
        }
        let n = arena.as_number(exp)?;
        if n == Number::minus_one() {
            return reciprocal_quadratic(arena, base, var);
        }
        if n == Number::minus_half() {
            return reciprocal_root_quadratic(arena, base, var);
        }
        return None;
    }

    if arena.is_free_of(base, var) {
        // c**u / (a*log(c))
        let lin = LinearForm::from_expr(arena, exp, var)?;
        let log_c = arena.log(base);
        if arena.as_number(log_c).is_some_and(|n| n.is_zero()) {
            return None;
        }
        let h = arena.pow(base, exp);
        let denom = arena.mul(&[lin.slope, log_c]);
        return Some(arena.div(h, denom));
    }
    None
}

/// ∫(a*x + b)**n dx.
fn linear_power(arena: &mut ExprArena, u: ExprHandle, n: ExprHandle, lin: LinearForm) -> ExprHandle {
    if arena.as_number(n) == Some(Number::minus_one()) {
        let l = arena.log(u);
        return arena.div(l, lin.slope);
    }
    let one = arena.one();
    let n1 = arena.add(&[n, one]);
    let raised = arena.pow(u, n1);
    let denom = arena.mul(&[n1, lin.slope]);
    arena.div(raised, denom)
}

/// Squares of trigonometric functions of a linear argument.
fn squared_function(
    arena: &mut ExprArena,
    base: ExprHandle,
    exp: ExprHandle,
    var: ExprHandle,
) -> Option<ExprHandle> {
    if arena.as_number(exp) != Some(Number::integer(2)) {
        return None;
    }
    let ExprNode::Function { func, arg: u } = arena.get(base).clone() else {
        return None;
    };
    let lin = LinearForm::from_expr(arena, u, var)?;
    let half = arena.number(Number::half());
    let f = match func {
        Func::Sin | Func::Cos => {
            let s = arena.sin(u);
            let c = arena.cos(u);
            let sc = arena.mul(&[half, s, c]);
            let hu = arena.mul(&[half, u]);
            if func == Func::Sin {
                arena.sub(hu, sc)
            } else {
                arena.add(&[hu, sc])
            }
        }
        Func::Tan => {
            let t = arena.func(Func::Tan, u);
            arena.sub(t, u)
        }
        Func::Cot => {
            let c = arena.func(Func::Cot, u);
            let sum = arena.add(&[c, u]);
            arena.neg(sum)
        }
        Func::Sec => arena.func(Func::Tan, u),
        Func::Csc => {
            let c = arena.func(Func::Cot, u);
            arena.neg(c)
        }
        Func::Sinh | Func::Cosh => {
            let s = arena.func(Func::Sinh, u);
            let c = arena.func(Func::Cosh, u);
            let sc = arena.mul(&[half, s, c]);
            let hu = arena.mul(&[half, u]);
            if func == Func::Sinh {
                arena.sub(sc, hu)
            } else {
                arena.add(&[sc, hu])
            }
        }
        Func::Tanh => {
            let t = arena.func(Func::Tanh, u);
            arena.sub(u, t)
        }
        _ => return None,
    };
    Some(arena.div(f, lin.slope))
}

/// Largest power reduced by [`reduced_power`].
const MAX_REDUCTION_POWER: i64 = 16;

/// `f(u)**n` for `f` in `sin cos sinh cosh` and integer `n >= 3`.
fn reduced_power(
    arena: &mut ExprArena,
    base: ExprHandle,
    exp: ExprHandle,
    var: ExprHandle,
) -> Option<ExprHandle> {
    let n = arena.as_number(exp)?.to_integer()?;
    if !(3..=MAX_REDUCTION_POWER).contains(&n) {
        return None;
    }
    let ExprNode::Function { func, arg: u } = arena.get(base).clone() else {
        return None;
    };
    if !matches!(func, Func::Sin | Func::Cos | Func::Sinh | Func::Cosh) {
        return None;
    }
    let lin = LinearForm::from_expr(arena, u, var)?;
    Some(power_reduction(arena, func, u, n, lin.slope, var))
}

/// ∫f(u)**n dx by the reduction formulas
///
/// ```text
/// ∫sin**n  = -sin**(n-1)*cos/(n*a)  + (n-1)/n ∫sin**(n-2)
/// ∫cos**n  =  cos**(n-1)*sin/(n*a)  + (n-1)/n ∫cos**(n-2)
/// ∫sinh**n =  sinh**(n-1)*cosh/(n*a) - (n-1)/n ∫sinh**(n-2)
/// ∫cosh**n =  cosh**(n-1)*sinh/(n*a) + (n-1)/n ∫cosh**(n-2)
/// ```
fn power_reduction(
    arena: &mut ExprArena,
    func: Func,
    u: ExprHandle,
    n: i64,
    slope: ExprHandle,
    var: ExprHandle,
) -> ExprHandle {
    match n {
        0 => return var,
        1 => {
            let f = elementary_antiderivative(arena, func, u);
            return arena.div(f, slope);
        }
        _ => {}
    }
    let (partner, boundary_sign, rest_sign) = match func {
        Func::Sin => (Func::Cos, -1, 1),
        Func::Cos => (Func::Sin, 1, 1),
        Func::Sinh => (Func::Cosh, 1, -1),
        _ => (Func::Sinh, 1, 1),
    };
    let f = arena.func(func, u);
    let g = arena.func(partner, u);
    let f_pow = arena.powi(f, n - 1);
    let scale = arena.rational(boundary_sign, n);
    let boundary = arena.mul(&[scale, f_pow, g]);
    let boundary = arena.div(boundary, slope);

    let rest = power_reduction(arena, func, u, n - 2, slope, var);
    let ratio = arena.rational(rest_sign * (n - 1), n);
    let rest = arena.mul(&[ratio, rest]);
    arena.add(&[boundary, rest])
}

/// sin(u)*cos(u) with the same linear `u`.
fn sin_cos_product(
    arena: &mut ExprArena,
    a: ExprHandle,
    b: ExprHandle,
    var: ExprHandle,
) -> Option<ExprHandle> {
    let (ExprNode::Function { func: fa, arg: ua }, ExprNode::Function { func: fb, arg: ub }) =
        (arena.get(a).clone(), arena.get(b).clone())
    else {
        return None;
    };
    let is_pair = matches!((fa, fb), (Func::Sin, Func::Cos) | (Func::Cos, Func::Sin));
    if !is_pair || ua != ub {
        return None;
    }
    let lin = LinearForm::from_expr(arena, ua, var)?;
    let s = arena.sin(ua);
    let s2 = arena.powi(s, 2);
    let two = arena.integer(2);
    let denom = arena.mul(&[two, lin.slope]);
    Some(arena.div(s2, denom))
}

/// Numeric coefficients `(p, s, q)` of `p*x**2 + s*x + q`.
fn numeric_quadratic(
    arena: &mut ExprArena,
    h: ExprHandle,
    var: ExprHandle,
) -> Option<(Number, Number, Number)> {
    let poly = Polynomial::from_expr(arena, h, var)?;
    if poly.degree() != 2 {
        return None;
    }
    let p = arena.as_number(poly.coeff(2)?)?;
    let s = arena.as_number(poly.coeff(1)?)?;
    let q = arena.as_number(poly.coeff(0)?)?;
    Some((p, s, q))
}

/// ∫dx/(p*x**2 + s*x + q), by completing the square.
///
/// With `u = x + s/(2p)` and `d = q/p - s²/(4p²)` the integrand is
/// `1/(p*(u² + d))`.
fn reciprocal_quadratic(arena: &mut ExprArena, base: ExprHandle, var: ExprHandle) -> Option<ExprHandle> {
    let (p, s, q) = numeric_quadratic(arena, base, var)?;
    let two_p = p.checked_mul(&Number::integer(2))?;
    let shift = s.checked_div(&two_p)?;
    let d = q.checked_div(&p)?.checked_sub(&shift.checked_mul(&shift)?)?;

    let shift_h = arena.number(shift);
    let u = arena.add(&[var, shift_h]);
    let p_h = arena.number(p);

    if d.is_zero() {
        // -1/(p*u)
        let pu = arena.mul(&[p_h, u]);
        let r = arena.recip(pu);
        return Some(arena.neg(r));
    }

    if d.is_positive() {
        // atan(u/sqrt(d)) / (p*sqrt(d))
        let d_h = arena.number(d);
        let root = arena.sqrt(d_h);
        let ratio = arena.div(u, root);
        let at = arena.func(Func::Atan, ratio);
        let denom = arena.mul(&[p_h, root]);
        return Some(arena.div(at, denom));
    }

    // (log(u - k) - log(u + k)) / (2*k*p), k = sqrt(-d)
    let neg_d = arena.number(-d);
    let k = arena.sqrt(neg_d);
    let minus = arena.sub(u, k);
    let plus = arena.add(&[u, k]);
    let lm = arena.log(minus);
    let lp = arena.log(plus);
    let num = arena.sub(lm, lp);
    let two = arena.integer(2);
    let denom = arena.mul(&[two, k, p_h]);
    Some(arena.div(num, denom))
}

/// ∫dx/sqrt(p*x**2 + q).
fn reciprocal_root_quadratic(
    arena: &mut ExprArena,
    base: ExprHandle,
    var: ExprHandle,
) -> Option<ExprHandle> {
    let (p, s, q) = numeric_quadratic(arena, base, var)?;
    if !s.is_zero() || q.is_zero() {
        return None;
    }
    if p.is_negative() {
        if !q.is_positive() {
            return None;
        }
        // asin(x*sqrt(-p/q)) / sqrt(-p)
        let minus_p = -p;
        let ratio = arena.number(minus_p.checked_div(&q)?);
        let k = arena.sqrt(ratio);
        let kx = arena.mul(&[k, var]);
        let asin = arena.func(Func::Asin, kx);
        let mp = arena.number(minus_p);
        let root = arena.sqrt(mp);
        return Some(arena.div(asin, root));
    }
    // log(sqrt(p)*x + sqrt(p*x**2 + q)) / sqrt(p)
    let p_h = arena.number(p);
    let root_p = arena.sqrt(p_h);
    let rx = arena.mul(&[root_p, var]);
    let root_base = arena.sqrt(base);
    let sum = arena.add(&[rx, root_base]);
    let l = arena.log(sum);
    Some(arena.div(l, root_p))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(src: &str) -> Option<String> {
        let mut arena = ExprArena::new();
        let x = arena.symbol("x");
        let h = arena.parse(src).unwrap();
        integrate_table(&mut arena, h, x).map(|r| arena.to_text(r))
    }

    /// Differentiates the table result and compares with the integrand.
    fn check_derivative(src: &str, points: &[f64]) {
        let mut arena = ExprArena::new();
        let x = arena.symbol("x");
        let h = arena.parse(src).unwrap();
        let f = integrate_table(&mut arena, h, x).unwrap_or_else(|| panic!("no entry for {src}"));
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
    fn test_basic_entries() {
        assert_eq!(table("sin(x)").as_deref(), Some("-cos(x)"));
        assert_eq!(table("cos(x)").as_deref(), Some("sin(x)"));
        assert_eq!(table("exp(x)").as_deref(), Some("exp(x)"));
        assert_eq!(table("1/x").as_deref(), Some("log(x)"));
    }

    #[test]
    fn test_linear_argument() {
        assert_eq!(table("sin(2*x)").as_deref(), Some("-cos(2*x)/2"));
        assert_eq!(table("exp(3*x + 1)").as_deref(), Some("exp(3*x + 1)/3"));
    }

    #[test]
    fn test_arctangent_forms() {
        assert_eq!(table("1/(x**2 + 1)").as_deref(), Some("atan(x)"));
        assert_eq!(table("1/sqrt(1 - x**2)").as_deref(), Some("asin(x)"));
    }

    #[test]
    fn test_hyperbolic_squares() {
        assert!(table("sinh(x)**2").is_some());
        assert_eq!(table("tanh(x)**2").as_deref(), Some("x - tanh(x)"));
    }

    #[test]
    fn test_power_reduction() {
        // ∫cos⁴ = cos³·sin/4 + 3/4·(cos·sin/2 + x/2)
        let mut arena = ExprArena::new();
        let x = arena.symbol("x");
        let h = arena.parse("cos(x)**4").unwrap();
        let f = integrate_table(&mut arena, h, x).unwrap();
        let pi = std::f64::consts::PI;
        let value = arena.evaluate_at(f, x, pi).unwrap() - arena.evaluate_at(f, x, 0.0).unwrap();
        assert!((value - 3.0 * pi / 8.0).abs() < 1e-12);

        assert_eq!(table("sin(x)**20"), None);
        assert_eq!(table("tan(x)**3"), None);
    }

    #[test]
    fn test_no_entry() {
        assert_eq!(table("sin(x**2)"), None);
        assert_eq!(table("exp(x)*x"), None);
    }

    #[test]
    fn test_entries_differentiate_back() {
        let pts = [0.3, 0.7, 1.1];
        for src in [
            "log(x)",
            "tan(x)",
            "cot(x)",
            "sec(x)",
            "csc(x)",
            "sinh(2*x)",
            "cosh(x - 1)",
            "tanh(x)",
            "asin(x/2)",
            "acos(x/2)",
            "atan(3*x)",
            "log(2*x + 1)",
            "Abs(x - 1)",
            "(2*x + 1)**5",
            "(3*x + 1)**(-2)",
            "sqrt(x)",
            "1/(2*x + 3)",
            "2**x",
            "2**(3*x + 1)",
            "sin(x)**2",
            "cos(2*x)**2",
            "tan(x)**2",
            "sec(x)**2",
            "csc(x)**2",
            "cot(x)**2",
            "sin(3*x)*cos(3*x)",
            "sinh(x)**2",
            "cosh(2*x)**2",
            "tanh(x)**2",
            "sin(x)**3",
            "cos(x)**4",
            "sin(2*x + 1)**5",
            "sinh(x)**3",
            "cosh(x)**4",
            "1/(x**2 + 4)",
            "1/(x**2 + 2*x + 5)",
            "1/(x**2 - 4)",
            "1/(x**2 - 2*x + 1)",
            "1/(2*x**2 + 3)",
            "1/sqrt(4 - x**2)",
            "1/sqrt(x**2 + 1)",
            "1/sqrt(2*x**2 + 1)",
        ] {
            check_derivative(src, &pts);
        }
    }
}
