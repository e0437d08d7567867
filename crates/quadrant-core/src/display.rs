//! Plain-text printing.
//!
//! The output follows the usual CAS conventions: `**` for powers, `sqrt`
//! for square roots, negative powers as fractions (`x**3/3`, `1/x`), and
//! sums ordered by descending degree with numbers last.

use std::cmp::Ordering;
use std::fmt;

use dashu::integer::UBig;

use crate::arena::ExprArena;
use crate::expr::ExprNode;
use crate::handle::ExprHandle;
use crate::number::Number;

pub(crate) const PREC_ADD: u8 = 10;
pub(crate) const PREC_MUL: u8 = 20;
pub(crate) const PREC_POW: u8 = 30;
pub(crate) const PREC_ATOM: u8 = 100;

/// One factor of a product, as laid out by the printers.
pub(crate) enum Factor {
    /// A positive integer.
    Integer(UBig),
    /// `base ** exp` with a positive exponent.
    Power(ExprHandle, Number),
    /// Any other factor.
    Expr(ExprHandle),
}

/// A product split into sign, numerator and denominator.
pub(crate) struct MulParts {
    pub negative: bool,
    pub numer: Vec<Factor>,
    pub denom: Vec<Factor>,
}

impl ExprArena {
    /// Returns a value implementing [`fmt::Display`] for `h`.
    #[must_use]
    pub fn display(&self, h: ExprHandle) -> ExprDisplay<'_> {
        ExprDisplay {
            arena: self,
            handle: h,
        }
    }

    /// Formats `h` as plain text.
    #[must_use]
    pub fn to_text(&self, h: ExprHandle) -> String {
        self.print(h)
    }

    pub(crate) fn precedence(&self, h: ExprHandle) -> u8 {
        match self.get(h) {
            ExprNode::Number(n) => {
                if n.is_negative() {
                    PREC_ADD
                } else if n.is_integer() {
                    PREC_ATOM
                } else {
                    PREC_MUL
                }
            }
            ExprNode::Add(_) => PREC_ADD,
            ExprNode::Mul(args) => {
                if self.as_number(args[0]).is_some_and(|c| c.is_negative()) {
                    PREC_ADD
                } else {
                    PREC_MUL
                }
            }
            ExprNode::Pow { exp, .. } => match self.as_number(*exp) {
                Some(e) if e == Number::half() => PREC_ATOM,
                Some(e) if e.is_negative() => PREC_MUL,
                _ => PREC_POW,
            },
            ExprNode::Symbol(_)
            | ExprNode::Constant(_)
            | ExprNode::Function { .. }
            | ExprNode::Integral { .. } => PREC_ATOM,
        }
    }

    /// Polynomial degree of a term, used to order sums for printing.
    fn display_degree(&self, h: ExprHandle) -> f64 {
        match self.get(h) {
            ExprNode::Symbol(_) => 1.0,
            ExprNode::Pow { base, exp } => match self.as_number(*exp) {
                Some(e) => self.display_degree(*base) * e.to_f64(),
                None => 0.0,
            },
            ExprNode::Mul(args) => args.iter().map(|&a| self.display_degree(a)).sum(),
            _ => 0.0,
        }
    }

    /// Terms of a sum in printing order: descending degree, numbers last.
    pub(crate) fn display_order(&self, terms: &[ExprHandle]) -> Vec<ExprHandle> {
        let mut ordered = terms.to_vec();
        ordered.sort_by(|&a, &b| {
            let (na, nb) = (
                self.as_number(a).is_some(),
                self.as_number(b).is_some(),
            );
            na.cmp(&nb)
                .then_with(|| {
                    self.display_degree(b)
                        .partial_cmp(&self.display_degree(a))
                        .unwrap_or(Ordering::Equal)
                })
                .then_with(|| self.compare(a, b))
        });
        // Constant sums lead with a positive number: 2 - 1/log(2).
        let leads_negative = ordered.first().is_some_and(|&t| self.is_negative_term(t));
        if leads_negative && ordered.iter().all(|&t| self.is_constant(t)) {
            let positive = ordered
                .iter()
                .position(|&t| self.as_number(t).is_some_and(|n| n.is_positive()));
            if let Some(i) = positive {
                let n = ordered.remove(i);
                ordered.insert(0, n);
            }
        }
        ordered
    }

    fn is_negative_term(&self, h: ExprHandle) -> bool {
        match self.get(h) {
            ExprNode::Number(n) => n.is_negative(),
            ExprNode::Mul(args) => self.as_number(args[0]).is_some_and(|c| c.is_negative()),
            _ => false,
        }
    }

    pub(crate) fn mul_parts(&self, args: &[ExprHandle]) -> MulParts {
        let mut parts = MulParts {
            negative: false,
            numer: Vec::new(),
            denom: Vec::new(),
        };
        for &a in args {
            match self.get(a) {
                ExprNode::Number(c) => {
                    parts.negative ^= c.is_negative();
                    let (p, q) = c.magnitude_parts();
                    if p != UBig::ONE {
                        parts.numer.push(Factor::Integer(p));
                    }
                    if q != UBig::ONE {
                        parts.denom.push(Factor::Integer(q));
                    }
                }
                ExprNode::Pow { base, exp } => match self.as_number(*exp) {
                    Some(e) if e.is_negative() => {
                        let positive = -e;
                        if positive.is_one() {
                            parts.denom.push(Factor::Expr(*base));
                        } else {
                            parts.denom.push(Factor::Power(*base, positive));
                        }
                    }
                    _ => parts.numer.push(Factor::Expr(a)),
                },
                _ => parts.numer.push(Factor::Expr(a)),
            }
        }
        parts
    }

    fn print(&self, h: ExprHandle) -> String {
        match self.get(h) {
            ExprNode::Number(n) => n.to_string(),
            ExprNode::Symbol(id) => self.symbol_name(*id).to_owned(),
            ExprNode::Constant(c) => c.name().to_owned(),
            ExprNode::Add(args) => {
                let mut out = String::new();
                for (i, t) in self.display_order(args).into_iter().enumerate() {
                    let s = self.print(t);
                    if i == 0 {
                        out.push_str(&s);
                    } else if let Some(rest) = s.strip_prefix('-') {
                        out.push_str(" - ");
                        out.push_str(rest);
                    } else {
                        out.push_str(" + ");
                        out.push_str(&s);
                    }
                }
                out
            }
            ExprNode::Mul(args) => self.print_mul(args),
            ExprNode::Pow { base, exp } => match self.as_number(*exp) {
                Some(e) if e == Number::minus_one() => {
                    format!("1/{}", self.paren(*base, PREC_POW))
                }
                Some(e) if e == Number::minus_half() => {
                    format!("1/sqrt({})", self.print(*base))
                }
                Some(e) => self.print_pow_number(*base, &e),
                None => {
                    let b = self.paren(*base, PREC_POW + 1);
                    let e = self.paren(*exp, PREC_ATOM);
                    format!("{b}**{e}")
                }
            },
            ExprNode::Function { func, arg } => format!("{}({})", func.name(), self.print(*arg)),
            ExprNode::Integral {
                integrand,
                var,
                lower,
                upper,
            } => format!(
                "Integral({}, ({}, {}, {}))",
                self.print(*integrand),
                self.print(*var),
                self.print(*lower),
                self.print(*upper)
            ),
        }
    }

    fn print_pow_number(&self, base: ExprHandle, e: &Number) -> String {
        if *e == Number::half() {
            return format!("sqrt({})", self.print(base));
        }
        let b = self.paren(base, PREC_POW + 1);
        if e.is_integer() && !e.is_negative() {
            format!("{b}**{e}")
        } else {
            format!("{b}**({e})")
        }
    }

    fn print_factor(&self, factor: &Factor) -> String {
        match factor {
            Factor::Integer(n) => n.to_string(),
            Factor::Power(base, e) => self.print_pow_number(*base, e),
            Factor::Expr(h) => self.paren(*h, PREC_MUL),
        }
    }

    fn print_mul(&self, args: &[ExprHandle]) -> String {
        let parts = self.mul_parts(args);
        let numer: Vec<String> = parts.numer.iter().map(|f| self.print_factor(f)).collect();
        let mut out = String::new();
        if parts.negative {
            out.push('-');
        }
        if numer.is_empty() {
            out.push('1');
        } else {
            out.push_str(&numer.join("*"));
        }
        match parts.denom.as_slice() {
            [] => {}
            [single] => {
                out.push('/');
                out.push_str(&match single {
                    Factor::Expr(h) => self.paren(*h, PREC_POW),
                    other => self.print_factor(other),
                });
            }
            many => {
                let denom: Vec<String> = many.iter().map(|f| self.print_factor(f)).collect();
                out.push_str("/(");
                out.push_str(&denom.join("*"));
                out.push(')');
            }
        }
        out
    }

    /// Prints `h`, parenthesized when it binds looser than `level`.
    fn paren(&self, h: ExprHandle, level: u8) -> String {
        let s = self.print(h);
        if self.precedence(h) < level {
            format!("({s})")
        } else {
            s
        }
    }
}

/// Display adapter returned by [`ExprArena::display`].
pub struct ExprDisplay<'a> {
    arena: &'a ExprArena,
    handle: ExprHandle,
}

impl fmt::Display for ExprDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.arena.print(self.handle))
    }
}

#[cfg(test)]
mod tests {
    use crate::{ExprArena, Func, Number};

    #[test]
    fn test_polynomial_printing() {
        let mut arena = ExprArena::new();
        let x = arena.symbol("x");
        let x3 = arena.powi(x, 3);
        let three = arena.integer(3);
        let f = arena.div(x3, three);
        assert_eq!(arena.to_text(f), "x**3/3");

        let x2 = arena.powi(x, 2);
        let two = arena.integer(2);
        let two_x = arena.mul(&[two, x]);
        let one = arena.one();
        let p = arena.add(&[one, two_x, x2]);
        assert_eq!(arena.to_text(p), "x**2 + 2*x + 1");
    }

    #[test]
    fn test_signs_and_fractions() {
        let mut arena = ExprArena::new();
        let x = arena.symbol("x");
        let cos = arena.cos(x);
        let neg_cos = arena.neg(cos);
        assert_eq!(arena.to_text(neg_cos), "-cos(x)");

        let half = arena.number(Number::half());
        let minus_half = arena.neg(half);
        let x2 = arena.powi(x, 2);
        let t = arena.mul(&[minus_half, x2]);
        let f = arena.add(&[t, x]);
        assert_eq!(arena.to_text(f), "-x**2/2 + x");

        let inv = arena.recip(x);
        assert_eq!(arena.to_text(inv), "1/x");
        let inv2 = arena.powi(x, -2);
        assert_eq!(arena.to_text(inv2), "x**(-2)");

        let q = arena.rational(-8, 3);
        assert_eq!(arena.to_text(q), "-8/3");
    }

    #[test]
    fn test_constants_and_roots() {
        let mut arena = ExprArena::new();
        let pi = arena.pi();
        let three = arena.integer(3);
        let pi3 = arena.div(pi, three);
        assert_eq!(arena.to_text(pi3), "pi/3");

        let one = arena.one();
        let e = arena.exp(one);
        let e_minus_one = arena.sub(e, one);
        assert_eq!(arena.to_text(e_minus_one), "E - 1");

        let collected = arena.parse("-1/log(2) + 2").unwrap();
        assert_eq!(arena.to_text(collected), "2 - 1/log(2)");
        let with_symbol = arena.parse("1 - x").unwrap();
        assert_eq!(arena.to_text(with_symbol), "-x + 1");

        let x = arena.symbol("x");
        let root = arena.sqrt(x);
        assert_eq!(arena.to_text(root), "sqrt(x)");

        let two = arena.integer(2);
        let sqrt2 = arena.sqrt(two);
        let half = arena.number(Number::half());
        let s = arena.mul(&[half, sqrt2]);
        assert_eq!(arena.to_text(s), "sqrt(2)/2");
    }

    #[test]
    fn test_functions_and_parentheses() {
        let mut arena = ExprArena::new();
        let x = arena.symbol("x");
        let one = arena.one();
        let sum = arena.add(&[x, one]);
        let inv = arena.recip(sum);
        assert_eq!(arena.to_text(inv), "1/(x + 1)");

        let sq = arena.powi(sum, 2);
        assert_eq!(arena.to_text(sq), "(x + 1)**2");

        let abs = arena.func(Func::Abs, x);
        assert_eq!(arena.display(abs).to_string(), "Abs(x)");

        let zero = arena.zero();
        let ex = arena.exp(x);
        let i = arena.integral(ex, x, zero, one);
        assert_eq!(arena.to_text(i), "Integral(exp(x), (x, 0, 1))");
    }
}
