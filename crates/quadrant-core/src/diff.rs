//! Symbolic differentiation.

use smallvec::SmallVec;

use crate::arena::ExprArena;
use crate::expr::{ExprNode, Func};
use crate::handle::ExprHandle;
use crate::number::Number;

impl ExprArena {
    /// Differentiates `h` with respect to the symbol `var`.
    pub fn diff(&mut self, h: ExprHandle, var: ExprHandle) -> ExprHandle {
        if h == var {
            return self.one();
        }
        if self.is_free_of(h, var) {
            return self.zero();
        }
        match self.get(h).clone() {
            ExprNode::Number(_) | ExprNode::Symbol(_) | ExprNode::Constant(_) => self.zero(),
            ExprNode::Add(args) => {
                let terms: SmallVec<[ExprHandle; 4]> =
                    args.iter().map(|&a| self.diff(a, var)).collect();
                self.add(&terms)
            }
            ExprNode::Mul(args) => {
                // Product rule: sum over i of d(a_i) * prod(a_j, j != i)
                let mut terms: SmallVec<[ExprHandle; 4]> = SmallVec::new();
                for i in 0..args.len() {
                    let d = self.diff(args[i], var);
                    if self.as_number(d) == Some(Number::ZERO) {
                        continue;
                    }
                    let mut factors: SmallVec<[ExprHandle; 4]> = SmallVec::new();
                    factors.push(d);
                    factors.extend(
                        args.iter()
                            .enumerate()
                            .filter(|(j, _)| *j != i)
                            .map(|(_, &a)| a),
                    );
                    terms.push(self.mul(&factors));
                }
                self.add(&terms)
            }
            ExprNode::Pow { base, exp } => self.diff_pow(h, base, exp, var),
            ExprNode::Function { func, arg } => {
                let outer = self.derivative_of(func, arg);
                let inner = self.diff(arg, var);
                self.mul(&[outer, inner])
            }
            ExprNode::Integral {
                integrand,
                var: dummy,
                lower,
                upper,
            } => self.diff_integral(integrand, dummy, lower, upper, var),
        }
    }

    fn diff_pow(
        &mut self,
        h: ExprHandle,
        base: ExprHandle,
        exp: ExprHandle,
        var: ExprHandle,
    ) -> ExprHandle {
        let db = self.diff(base, var);
        if self.is_free_of(exp, var) {
            // d(u**n) = n * u**(n-1) * du
            let minus_one = self.integer(-1);
            let reduced = self.add(&[exp, minus_one]);
            let p = self.pow(base, reduced);
            return self.mul(&[exp, p, db]);
        }
        let de = self.diff(exp, var);
        let ln_b = self.log(base);
        if self.is_free_of(base, var) {
            // d(c**v) = c**v * log(c) * dv
            return self.mul(&[h, ln_b, de]);
        }
        // d(u**v) = u**v * (dv*log(u) + v*du/u)
        let left = self.mul(&[de, ln_b]);
        let ratio = self.div(db, base);
        let right = self.mul(&[exp, ratio]);
        let sum = self.add(&[left, right]);
        self.mul(&[h, sum])
    }

    /// `f'(u)` for an elementary function `f`, as an expression in `u`.
    pub fn derivative_of(&mut self, func: Func, u: ExprHandle) -> ExprHandle {
        let one = self.one();
        match func {
            Func::Sin => self.cos(u),
            Func::Cos => {
                let s = self.sin(u);
                self.neg(s)
            }
            Func::Tan => {
                let t = self.func(Func::Tan, u);
                let t2 = self.powi(t, 2);
                self.add(&[t2, one])
            }
            Func::Cot => {
                let c = self.func(Func::Cot, u);
                let c2 = self.powi(c, 2);
                let s = self.add(&[c2, one]);
                self.neg(s)
            }
            Func::Sec => {
                let s = self.func(Func::Sec, u);
                let t = self.func(Func::Tan, u);
                self.mul(&[s, t])
            }
            Func::Csc => {
                let c = self.func(Func::Csc, u);
                let t = self.func(Func::Cot, u);
                let p = self.mul(&[c, t]);
                self.neg(p)
            }
            Func::Asin | Func::Acos => {
                let u2 = self.powi(u, 2);
                let inner = self.sub(one, u2);
                let root = self.sqrt(inner);
                let d = self.recip(root);
                if func == Func::Acos {
                    self.neg(d)
                } else {
                    d
                }
            }
            Func::Atan => {
                let u2 = self.powi(u, 2);
                let s = self.add(&[u2, one]);
                self.recip(s)
            }
            Func::Sinh => self.func(Func::Cosh, u),
            Func::Cosh => self.func(Func::Sinh, u),
            Func::Tanh => {
                let t = self.func(Func::Tanh, u);
                let t2 = self.powi(t, 2);
                self.sub(one, t2)
            }
            Func::Exp => self.exp(u),
            Func::Log => self.recip(u),
            Func::Abs => {
                let a = self.func(Func::Abs, u);
                self.div(u, a)
            }
        }
    }

    /// Leibniz rule for `d/dx Integral(f(t, x), (t, a(x), b(x)))`.
    fn diff_integral(
        &mut self,
        integrand: ExprHandle,
        dummy: ExprHandle,
        lower: ExprHandle,
        upper: ExprHandle,
        var: ExprHandle,
    ) -> ExprHandle {
        let mut terms: SmallVec<[ExprHandle; 4]> = SmallVec::new();

        let du = self.diff(upper, var);
        let at_upper = self.substitute(integrand, dummy, upper);
        terms.push(self.mul(&[at_upper, du]));

        let dl = self.diff(lower, var);
        let at_lower = self.substitute(integrand, dummy, lower);
        let lower_term = self.mul(&[at_lower, dl]);
        terms.push(self.neg(lower_term));

        if dummy != var && !self.is_free_of(integrand, var) {
            let inner = self.diff(integrand, var);
            terms.push(self.integral(inner, dummy, lower, upper));
        }
        self.add(&terms)
    }
}
