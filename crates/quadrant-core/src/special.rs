//! Special values of elementary functions.
//!
//! Trigonometric functions are evaluated exactly at multiples of π/6 and
//! π/4, the inverse functions at the matching arguments, and `exp`/`log`
//! at 0, 1, ±∞ and against each other.

use crate::arena::ExprArena;
use crate::expr::{Constant, ExprNode, Func};
use crate::handle::ExprHandle;
use crate::number::Number;

/// `sin(k*pi/12)` for `k` in `0..=12`, as `coefficient * sqrt(radicand)`.
fn sin_twelfths(k: i64) -> Option<(Number, Option<i64>)> {
    let half = Number::half();
    match k {
        0 | 12 => Some((Number::ZERO, None)),
        2 | 10 => Some((half, None)),
        3 | 9 => Some((half, Some(2))),
        4 | 8 => Some((half, Some(3))),
        6 => Some((Number::ONE, None)),
        _ => None,
    }
}

impl ExprArena {
    pub(crate) fn special_value(&mut self, func: Func, arg: ExprHandle) -> Option<ExprHandle> {
        match func {
            Func::Sin => self.sin_value(arg).or_else(|| self.inverse_of(arg, Func::Asin)),
            Func::Cos => self.cos_value(arg).or_else(|| self.inverse_of(arg, Func::Acos)),
            Func::Tan => {
                if let Some(v) = self.inverse_of(arg, Func::Atan) {
                    return Some(v);
                }
                let (s, c) = (self.sin_value(arg)?, self.cos_value(arg)?);
                Some(self.checked_quotient(s, c))
            }
            Func::Cot => {
                let (s, c) = (self.sin_value(arg)?, self.cos_value(arg)?);
                Some(self.checked_quotient(c, s))
            }
            Func::Sec => {
                let c = self.cos_value(arg)?;
                let one = self.one();
                Some(self.checked_quotient(one, c))
            }
            Func::Csc => {
                let s = self.sin_value(arg)?;
                let one = self.one();
                Some(self.checked_quotient(one, s))
            }
            Func::Asin => {
                let v = self.as_number(arg)?;
                let r = if v.is_zero() {
                    Number::ZERO
                } else if v.is_one() {
                    Number::half()
                } else if v == Number::half() {
                    Number::new(1, 6)?
                } else {
                    return None;
                };
                Some(self.pi_times(r))
            }
            Func::Acos => {
                let v = self.as_number(arg)?;
                let r = match v.to_small_parts()? {
                    (1, 1) => Number::ZERO,
                    (1, 2) => Number::new(1, 3)?,
                    (0, 1) => Number::half(),
                    (-1, 2) => Number::new(2, 3)?,
                    (-1, 1) => Number::ONE,
                    _ => return None,
                };
                Some(self.pi_times(r))
            }
            Func::Atan => {
                if self.is_pos_infinity(arg) {
                    return Some(self.pi_times(Number::half()));
                }
                let v = self.as_number(arg)?;
                if v.is_zero() {
                    Some(arg)
                } else if v.is_one() {
                    Some(self.pi_times(Number::new(1, 4)?))
                } else {
                    None
                }
            }
            Func::Sinh | Func::Tanh | Func::Cosh => self.hyperbolic_value(func, arg),
            Func::Exp => self.exp_value(arg),
            Func::Log => self.log_value(arg),
            Func::Abs => self.abs_value(arg),
        }
    }

    /// `r * pi` when `arg` is a rational multiple of π.
    fn pi_multiple(&self, arg: ExprHandle) -> Option<Number> {
        match self.get(arg) {
            ExprNode::Number(n) if n.is_zero() => Some(Number::ZERO),
            ExprNode::Constant(Constant::Pi) => Some(Number::ONE),
            ExprNode::Mul(args) if args.len() == 2 => {
                let c = self.as_number(args[0])?;
                matches!(self.get(args[1]), ExprNode::Constant(Constant::Pi)).then_some(c)
            }
            _ => None,
        }
    }

    fn pi_times(&mut self, r: Number) -> ExprHandle {
        let c = self.number(r);
        let pi = self.pi();
        self.mul(&[c, pi])
    }

    fn sin_of_pi_multiple(&mut self, r: Number) -> Option<ExprHandle> {
        let k = r.rem_euclid(2)?.checked_mul(&Number::integer(12))?.to_integer()?;
        let (sign, k) = if k >= 12 { (-1, k - 12) } else { (1, k) };
        let (coeff, radicand) = sin_twelfths(k)?;
        let coeff = self.number(coeff.checked_mul(&Number::integer(sign))?);
        Some(match radicand {
            Some(n) => {
                let n = self.integer(n);
                let root = self.sqrt(n);
                self.mul(&[coeff, root])
            }
            None => coeff,
        })
    }

    fn sin_value(&mut self, arg: ExprHandle) -> Option<ExprHandle> {
        let r = self.pi_multiple(arg)?;
        self.sin_of_pi_multiple(r)
    }

    fn cos_value(&mut self, arg: ExprHandle) -> Option<ExprHandle> {
        let r = self.pi_multiple(arg)?.checked_add(&Number::half())?;
        self.sin_of_pi_multiple(r)
    }

    /// `a / b`, or the undefined value when `b` is zero.
    fn checked_quotient(&mut self, a: ExprHandle, b: ExprHandle) -> ExprHandle {
        if self.as_number(b) == Some(Number::ZERO) {
            self.undefined()
        } else {
            self.div(a, b)
        }
    }

    /// `f(g(u)) = u` when `g` is the inverse of `f`.
    fn inverse_of(&self, arg: ExprHandle, inverse: Func) -> Option<ExprHandle> {
        match self.get(arg) {
            ExprNode::Function { func, arg: inner } if *func == inverse => Some(*inner),
            _ => None,
        }
    }

    fn hyperbolic_value(&mut self, func: Func, arg: ExprHandle) -> Option<ExprHandle> {
        if self.as_number(arg) == Some(Number::ZERO) {
            return Some(if func == Func::Cosh {
                self.one()
            } else {
                arg
            });
        }
        if self.is_pos_infinity(arg) {
            return Some(if func == Func::Tanh {
                self.one()
            } else {
                arg
            });
        }
        None
    }

    fn exp_value(&mut self, arg: ExprHandle) -> Option<ExprHandle> {
        if let Some(n) = self.as_number(arg) {
            return if n.is_zero() {
                Some(self.one())
            } else if n.is_one() {
                Some(self.constant(Constant::E))
            } else {
                None
            };
        }
        if self.is_pos_infinity(arg) {
            return Some(arg);
        }
        if self.is_neg_infinity(arg) {
            return Some(self.zero());
        }
        match self.get(arg).clone() {
            ExprNode::Function {
                func: Func::Log,
                arg: inner,
            } => Some(inner),
            // exp(n*log(u)) = u**n
            ExprNode::Mul(args) if args.len() == 2 => {
                if self.as_number(args[0]).is_none() {
                    return None;
                }
                match self.get(args[1]) {
                    ExprNode::Function {
                        func: Func::Log,
                        arg: inner,
                    } => {
                        let inner = *inner;
                        Some(self.pow(inner, args[0]))
                    }
                    _ => None,
                }
            }
            _ => None,
        }
    }

    fn log_value(&mut self, arg: ExprHandle) -> Option<ExprHandle> {
        match self.get(arg).clone() {
            ExprNode::Number(n) if n.is_one() => Some(self.zero()),
            ExprNode::Number(n) if n.is_zero() => Some(self.undefined()),
            ExprNode::Constant(Constant::E) => Some(self.one()),
            ExprNode::Constant(Constant::Infinity) => Some(arg),
            ExprNode::Function {
                func: Func::Exp,
                arg: inner,
            } => Some(inner),
            _ => None,
        }
    }

    fn abs_value(&mut self, arg: ExprHandle) -> Option<ExprHandle> {
        match self.get(arg).clone() {
            ExprNode::Number(n) => {
                let v = n.abs();
                Some(self.number(v))
            }
            ExprNode::Constant(Constant::Pi | Constant::E | Constant::Infinity) => Some(arg),
            ExprNode::Function {
                func: Func::Abs | Func::Exp,
                ..
            } => Some(arg),
            ExprNode::Mul(args) => {
                let c = self.as_number(args[0])?;
                if !c.is_positive() {
                    return None;
                }
                let rest: smallvec::SmallVec<[ExprHandle; 4]> = args[1..].iter().copied().collect();
                let rest = self.mul(&rest);
                let inner = self.func(Func::Abs, rest);
                let c = self.number(c);
                Some(self.mul(&[c, inner]))
            }
            _ => None,
        }
    }
}
