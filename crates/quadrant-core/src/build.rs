//! Canonicalizing constructors.
//!
//! Every compound expression is built through these methods. They flatten
//! nested sums and products, fold exact numbers, collect like terms and
//! like bases, and sort arguments with [`ExprArena::compare`], so that two
//! mathematically identical inputs that differ only in term order end up
//! with the same handle.

use smallvec::SmallVec;

use crate::arena::ExprArena;
use crate::expr::{Constant, ExprNode, Func, Parity};
use crate::handle::ExprHandle;
use crate::number::Number;

type Args = SmallVec<[ExprHandle; 4]>;

impl ExprArena {
    /// Creates a canonical sum.
    pub fn add(&mut self, args: &[ExprHandle]) -> ExprHandle {
        let mut flat: Args = SmallVec::new();
        for &a in args {
            match self.get(a) {
                ExprNode::Add(inner) => flat.extend(inner.iter().copied()),
                _ => flat.push(a),
            }
        }
        if flat.iter().any(|&a| self.is_undefined(a)) {
            return self.undefined();
        }

        let mut constant = Number::ZERO;
        let mut leftovers: Args = SmallVec::new();
        let mut rest: Args = SmallVec::new();
        for a in flat {
            match self.as_number(a) {
                Some(n) => match constant.checked_add(&n) {
                    Some(sum) => constant = sum,
                    None => leftovers.push(a),
                },
                None => rest.push(a),
            }
        }

        let pos_inf = rest.iter().any(|&a| self.is_pos_infinity(a));
        let neg_inf = rest.iter().any(|&a| self.is_neg_infinity(a));
        if pos_inf && neg_inf {
            return self.undefined();
        }
        if pos_inf || neg_inf {
            let mut kept: Args = rest.into_iter().filter(|&a| !self.is_constant(a)).collect();
            kept.push(if pos_inf {
                self.infinity()
            } else {
                self.neg_infinity()
            });
            return self.make_add(kept);
        }

        // Like terms: 2*x + 3*x -> 5*x
        let mut terms: Vec<(ExprHandle, Number)> = Vec::new();
        for a in rest {
            let (coeff, body) = self.split_coefficient(a);
            if let Some(i) = terms.iter().position(|(b, _)| *b == body) {
                if let Some(sum) = terms[i].1.checked_add(&coeff) {
                    terms[i].1 = sum;
                    continue;
                }
            }
            terms.push((body, coeff));
        }

        let mut out: Args = SmallVec::new();
        for (body, coeff) in terms {
            if !coeff.is_zero() {
                out.push(self.scale(coeff, body));
            }
        }
        if !constant.is_zero() {
            out.push(self.number(constant));
        }
        out.extend(leftovers);
        self.make_add(out)
    }

    fn make_add(&mut self, mut terms: Args) -> ExprHandle {
        match terms.len() {
            0 => self.zero(),
            1 => terms[0],
            _ => {
                self.sort_canonical(&mut terms);
                self.intern(ExprNode::Add(terms))
            }
        }
    }

    /// Splits a term into its numeric coefficient and the remaining factor.
    ///
    /// `3*x*y` gives `(3, x*y)`, `x` gives `(1, x)` and `5` gives `(5, 1)`.
    pub fn split_coefficient(&mut self, h: ExprHandle) -> (Number, ExprHandle) {
        match self.get(h).clone() {
            ExprNode::Number(n) => (n, self.one()),
            ExprNode::Mul(args) => match self.as_number(args[0]) {
                Some(c) => {
                    let rest: Args = args[1..].iter().copied().collect();
                    let body = if rest.len() == 1 {
                        rest[0]
                    } else {
                        self.intern(ExprNode::Mul(rest))
                    };
                    (c, body)
                }
                None => (Number::ONE, h),
            },
            _ => (Number::ONE, h),
        }
    }

    /// `coeff * body` for a coefficient-free `body`.
    fn scale(&mut self, coeff: Number, body: ExprHandle) -> ExprHandle {
        if coeff.is_one() {
            return body;
        }
        let c = self.number(coeff);
        if self.as_number(body) == Some(Number::ONE) {
            return c;
        }
        let mut factors: Args = SmallVec::new();
        factors.push(c);
        match self.get(body) {
            ExprNode::Mul(args) => factors.extend(args.iter().copied()),
            _ => factors.push(body),
        }
        self.intern(ExprNode::Mul(factors))
    }

    /// Creates a canonical product.
    pub fn mul(&mut self, args: &[ExprHandle]) -> ExprHandle {
        let mut flat: Args = SmallVec::new();
        for &a in args {
            match self.get(a) {
                ExprNode::Mul(inner) => flat.extend(inner.iter().copied()),
                _ => flat.push(a),
            }
        }
        if flat.iter().any(|&a| self.is_undefined(a)) {
            return self.undefined();
        }

        let mut coeff = Number::ONE;
        let mut leftovers: Args = SmallVec::new();
        let mut factors: Args = SmallVec::new();
        for a in flat {
            match self.as_number(a) {
                Some(n) => match coeff.checked_mul(&n) {
                    Some(p) => coeff = p,
                    None => leftovers.push(a),
                },
                None => factors.push(a),
            }
        }

        let has_inf = factors.iter().any(|&f| self.is_pos_infinity(f));
        if coeff.is_zero() {
            return if has_inf {
                self.undefined()
            } else {
                self.zero()
            };
        }
        if has_inf {
            return self.mul_infinite(coeff, &leftovers, factors);
        }

        // Like bases: x * x**2 -> x**3, exp(a) * exp(b) -> exp(a + b)
        let one = self.one();
        let mut groups: Vec<(ExprHandle, Args, ExprHandle)> = Vec::new();
        let mut exponentials: Args = SmallVec::new();
        for f in factors {
            let (base, exp) = match self.get(f) {
                ExprNode::Pow { base, exp } => (*base, *exp),
                ExprNode::Function {
                    func: Func::Exp,
                    arg,
                } => {
                    exponentials.push(*arg);
                    continue;
                }
                _ => (f, one),
            };
            match groups.iter_mut().find(|(b, _, _)| *b == base) {
                Some((_, exps, _)) => exps.push(exp),
                None => groups.push((base, smallvec::smallvec![exp], f)),
            }
        }

        let mut rebuilt: Args = SmallVec::new();
        for (base, exps, original) in groups {
            if exps.len() == 1 {
                rebuilt.push(original);
            } else {
                let e = self.add(&exps);
                rebuilt.push(self.pow(base, e));
            }
        }
        match exponentials.len() {
            0 => {}
            1 => {
                let e = self.exp(exponentials[0]);
                rebuilt.push(e);
            }
            _ => {
                let sum = self.add(&exponentials);
                rebuilt.push(self.exp(sum));
            }
        }

        let needs_pass = rebuilt
            .iter()
            .any(|&f| matches!(self.get(f), ExprNode::Number(_) | ExprNode::Mul(_)));
        if needs_pass {
            let mut again: Args = SmallVec::new();
            again.push(self.number(coeff));
            again.extend(leftovers);
            again.extend(rebuilt);
            return self.mul(&again);
        }

        rebuilt.extend(leftovers);
        self.make_mul(coeff, rebuilt)
    }

    fn mul_infinite(&mut self, coeff: Number, leftovers: &[ExprHandle], factors: Args) -> ExprHandle {
        let mut negative = coeff.is_negative();
        for &n in leftovers {
            if self.as_number(n).is_some_and(|n| n.is_negative()) {
                negative = !negative;
            }
        }
        let mut kept: Args = SmallVec::new();
        for f in factors {
            if self.is_pos_infinity(f) {
                continue;
            }
            if self.is_constant(f) {
                match self.evaluate(f) {
                    Ok(v) if v > 0.0 => continue,
                    Ok(v) if v < 0.0 => {
                        negative = !negative;
                        continue;
                    }
                    _ => {}
                }
            }
            kept.push(f);
        }
        kept.push(self.infinity());
        let sign = if negative { Number::minus_one() } else { Number::ONE };
        self.make_mul(sign, kept)
    }

    fn make_mul(&mut self, coeff: Number, mut factors: Args) -> ExprHandle {
        if factors.is_empty() {
            return self.number(coeff);
        }
        if !coeff.is_one() && factors.len() == 1 {
            if let ExprNode::Add(terms) = self.get(factors[0]).clone() {
                let c = self.number(coeff);
                let scaled: Args = terms.iter().map(|&t| self.mul(&[c, t])).collect();
                return self.add(&scaled);
            }
        }
        self.sort_canonical(&mut factors);
        if coeff.is_one() {
            if factors.len() == 1 {
                return factors[0];
            }
        } else {
            let c = self.number(coeff);
            factors.insert(0, c);
        }
        self.intern(ExprNode::Mul(factors))
    }

    /// Creates a canonical power `base ** exp`.
    pub fn pow(&mut self, base: ExprHandle, exp: ExprHandle) -> ExprHandle {
        if self.is_undefined(base) || self.is_undefined(exp) {
            return self.undefined();
        }
        let exp_num = self.as_number(exp);
        if let Some(e) = &exp_num {
            if e.is_zero() {
                return self.one();
            }
            if e.is_one() {
                return base;
            }
        }
        if let Some(b) = self.as_number(base) {
            if b.is_one() {
                return if self.is_infinite(exp) {
                    self.undefined()
                } else {
                    base
                };
            }
            if b.is_zero() {
                match &exp_num {
                    Some(e) if e.is_positive() => return base,
                    Some(_) => return self.undefined(),
                    None if self.is_pos_infinity(exp) => return base,
                    None => {}
                }
            }
            if let Some(e) = &exp_num {
                if let Some(v) = self.number_power(&b, e) {
                    return v;
                }
            }
        }

        let integer_exp = exp_num.as_ref().is_some_and(Number::is_integer);
        match self.get(base).clone() {
            ExprNode::Constant(Constant::E) => return self.exp(exp),
            ExprNode::Constant(Constant::Infinity) => {
                if let Some(e) = &exp_num {
                    return if e.is_positive() { base } else { self.zero() };
                }
            }
            ExprNode::Pow {
                base: inner,
                exp: e1,
            } if integer_exp => {
                let e = self.mul(&[e1, exp]);
                return self.pow(inner, e);
            }
            ExprNode::Function {
                func: Func::Exp,
                arg,
            } if integer_exp => {
                let a = self.mul(&[exp, arg]);
                return self.exp(a);
            }
            ExprNode::Mul(factors) if integer_exp => {
                let parts: Args = factors.iter().map(|&f| self.pow(f, exp)).collect();
                return self.mul(&parts);
            }
            _ => {}
        }
        self.intern(ExprNode::Pow { base, exp })
    }

    /// Exact power of two numbers, when it has a rational or simplified
    /// radical form: `4**(1/2) = 2`, `2**(3/2) = 2*sqrt(2)`,
    /// `3**(-1/2) = sqrt(3)/3`.
    fn number_power(&mut self, b: &Number, e: &Number) -> Option<ExprHandle> {
        if let Some(n) = e.to_integer() {
            return b.checked_pow(n).map(|v| self.number(v));
        }
        if b.is_negative() {
            return None;
        }
        let (p, q) = e.to_small_parts()?;
        if let Some(root) = b.exact_root(u32::try_from(q).ok()?) {
            return root.checked_pow(p).map(|v| self.number(v));
        }
        let whole = e.floor()?;
        if whole == 0 {
            return None;
        }
        let frac = e.checked_sub(&Number::integer(whole))?;
        let scale = b.checked_pow(whole)?;
        let base = self.number(b.clone());
        let frac = self.number(frac);
        let radical = self.intern(ExprNode::Pow { base, exp: frac });
        let scale = self.number(scale);
        Some(self.intern(ExprNode::Mul(smallvec::smallvec![scale, radical])))
    }

    /// Applies an elementary function, evaluating special values.
    pub fn func(&mut self, func: Func, arg: ExprHandle) -> ExprHandle {
        if self.is_undefined(arg) {
            return self.undefined();
        }
        let parity = func.parity();
        if parity != Parity::None {
            if let Some(flipped) = self.extract_minus(arg) {
                let inner = self.func(func, flipped);
                return if parity == Parity::Odd {
                    self.neg(inner)
                } else {
                    inner
                };
            }
        }
        if let Some(v) = self.special_value(func, arg) {
            return v;
        }
        self.intern(ExprNode::Function { func, arg })
    }

    /// If `h` carries a leading minus sign, returns `-h` with the sign
    /// removed.
    fn extract_minus(&mut self, h: ExprHandle) -> Option<ExprHandle> {
        let negative = match self.get(h) {
            ExprNode::Number(n) => n.is_negative(),
            ExprNode::Mul(args) => self.as_number(args[0]).is_some_and(|c| c.is_negative()),
            _ => false,
        };
        negative.then(|| self.neg(h))
    }

    /// Creates an unevaluated definite integral.
    pub fn integral(
        &mut self,
        integrand: ExprHandle,
        var: ExprHandle,
        lower: ExprHandle,
        upper: ExprHandle,
    ) -> ExprHandle {
        if lower == upper || self.as_number(integrand) == Some(Number::ZERO) {
            return self.zero();
        }
        self.intern(ExprNode::Integral {
            integrand,
            var,
            lower,
            upper,
        })
    }

    // === Derived constructors ===

    /// `-a`.
    pub fn neg(&mut self, a: ExprHandle) -> ExprHandle {
        let minus_one = self.integer(-1);
        self.mul(&[minus_one, a])
    }

    /// `a - b`.
    pub fn sub(&mut self, a: ExprHandle, b: ExprHandle) -> ExprHandle {
        let nb = self.neg(b);
        self.add(&[a, nb])
    }

    /// `a / b`.
    pub fn div(&mut self, a: ExprHandle, b: ExprHandle) -> ExprHandle {
        let inv = self.recip(b);
        self.mul(&[a, inv])
    }

    /// `1 / a`.
    pub fn recip(&mut self, a: ExprHandle) -> ExprHandle {
        let minus_one = self.integer(-1);
        self.pow(a, minus_one)
    }

    /// `a ** n` for an integer `n`.
    pub fn powi(&mut self, a: ExprHandle, n: i64) -> ExprHandle {
        let n = self.integer(n);
        self.pow(a, n)
    }

    /// `sqrt(a)`.
    pub fn sqrt(&mut self, a: ExprHandle) -> ExprHandle {
        let half = self.number(Number::half());
        self.pow(a, half)
    }

    /// `sin(a)`.
    pub fn sin(&mut self, a: ExprHandle) -> ExprHandle {
        self.func(Func::Sin, a)
    }

    /// `cos(a)`.
    pub fn cos(&mut self, a: ExprHandle) -> ExprHandle {
        self.func(Func::Cos, a)
    }

    /// `exp(a)`.
    pub fn exp(&mut self, a: ExprHandle) -> ExprHandle {
        self.func(Func::Exp, a)
    }

    /// Natural logarithm.
    pub fn log(&mut self, a: ExprHandle) -> ExprHandle {
        self.func(Func::Log, a)
    }

    // === Shape predicates ===

    /// Returns true for the undefined constant.
    #[must_use]
    pub fn is_undefined(&self, h: ExprHandle) -> bool {
        matches!(self.get(h), ExprNode::Constant(Constant::Undefined))
    }

    /// Returns true for `oo`.
    #[must_use]
    pub fn is_pos_infinity(&self, h: ExprHandle) -> bool {
        matches!(self.get(h), ExprNode::Constant(Constant::Infinity))
    }

    /// Returns true for `-oo`.
    #[must_use]
    pub fn is_neg_infinity(&self, h: ExprHandle) -> bool {
        self.is_infinite(h) && !self.is_pos_infinity(h)
    }
}

#[cfg(test)]
mod tests {
    use crate::{ExprArena, ExprNode, Number};

    #[test]
    fn test_add_is_order_independent() {
        let mut arena = ExprArena::new();
        let x = arena.symbol("x");
        let y = arena.symbol("y");
        let two = arena.integer(2);
        let a = arena.add(&[x, y, two]);
        let b = arena.add(&[two, y, x]);
        assert_eq!(a, b);
    }

    #[test]
    fn test_like_terms_collect() {
        let mut arena = ExprArena::new();
        let x = arena.symbol("x");
        let two = arena.integer(2);
        let three = arena.integer(3);
        let five = arena.integer(5);
        let two_x = arena.mul(&[two, x]);
        let three_x = arena.mul(&[three, x]);
        let sum = arena.add(&[two_x, three_x]);
        let expected = arena.mul(&[five, x]);
        assert_eq!(sum, expected);

        let diff = arena.sub(x, x);
        assert_eq!(arena.as_number(diff), Some(Number::ZERO));
    }

    #[test]
    fn test_like_bases_collect() {
        let mut arena = ExprArena::new();
        let x = arena.symbol("x");
        let x2 = arena.powi(x, 2);
        let prod = arena.mul(&[x, x2]);
        let x3 = arena.powi(x, 3);
        assert_eq!(prod, x3);

        let q = arena.div(x3, x2);
        assert_eq!(q, x);
    }

    #[test]
    fn test_exponentials_combine() {
        let mut arena = ExprArena::new();
        let x = arena.symbol("x");
        let one = arena.one();
        let ex = arena.exp(x);
        let e = arena.exp(one);
        let prod = arena.mul(&[ex, ex]);
        let two_x = arena.add(&[x, x]);
        let expected = arena.exp(two_x);
        assert_eq!(prod, expected);
        assert!(matches!(arena.get(e), ExprNode::Constant(_)));
    }

    #[test]
    fn test_coefficient_distributes_over_sum() {
        let mut arena = ExprArena::new();
        let x = arena.symbol("x");
        let one = arena.one();
        let two = arena.integer(2);
        let sum = arena.add(&[x, one]);
        let prod = arena.mul(&[two, sum]);
        let two_x = arena.mul(&[two, x]);
        let expected = arena.add(&[two_x, two]);
        assert_eq!(prod, expected);
    }

    #[test]
    fn test_number_powers() {
        let mut arena = ExprArena::new();
        let four = arena.integer(4);
        let root = arena.sqrt(four);
        assert_eq!(arena.as_number(root), Some(Number::integer(2)));

        let two = arena.integer(2);
        let sqrt2 = arena.sqrt(two);
        let squared = arena.mul(&[sqrt2, sqrt2]);
        assert_eq!(squared, two);

        let zero = arena.zero();
        let inv = arena.recip(zero);
        assert!(arena.is_undefined(inv));
    }

    #[test]
    fn test_nested_powers() {
        let mut arena = ExprArena::new();
        let x = arena.symbol("x");
        let root = arena.sqrt(x);
        let squared = arena.powi(root, 2);
        assert_eq!(squared, x);
    }

    #[test]
    fn test_infinity_arithmetic() {
        let mut arena = ExprArena::new();
        let oo = arena.infinity();
        let minus_oo = arena.neg_infinity();
        let zero = arena.zero();
        let one = arena.one();
        let pi = arena.pi();

        let undefined = arena.add(&[oo, minus_oo]);
        assert!(arena.is_undefined(undefined));
        let undefined = arena.mul(&[zero, oo]);
        assert!(arena.is_undefined(undefined));

        assert_eq!(arena.add(&[oo, one]), oo);
        assert_eq!(arena.mul(&[pi, oo]), oo);
        let neg = arena.neg(pi);
        assert_eq!(arena.mul(&[neg, oo]), minus_oo);
        let inv = arena.recip(oo);
        assert_eq!(inv, zero);
    }

    #[test]
    fn test_parity() {
        let mut arena = ExprArena::new();
        let x = arena.symbol("x");
        let minus_x = arena.neg(x);
        let sin_neg = arena.sin(minus_x);
        let sin_x = arena.sin(x);
        let expected = arena.neg(sin_x);
        assert_eq!(sin_neg, expected);

        let cos_neg = arena.cos(minus_x);
        let cos_x = arena.cos(x);
        assert_eq!(cos_neg, cos_x);
    }

    #[test]
    fn test_integral_with_equal_bounds_is_zero() {
        let mut arena = ExprArena::new();
        let x = arena.symbol("x");
        let one = arena.one();
        let f = arena.sin(x);
        let i = arena.integral(f, x, one, one);
        assert_eq!(arena.as_number(i), Some(Number::ZERO));
    }
}
