//! Substitution.

use hashbrown::HashMap;
use smallvec::SmallVec;

use crate::arena::ExprArena;
use crate::expr::ExprNode;
use crate::handle::ExprHandle;

impl ExprArena {
    /// Replaces every free occurrence of `from` in `h` with `to` and
    /// re-canonicalizes the result.
    ///
    /// An integral whose dummy variable is `from` only has its bounds
    /// rewritten.
    pub fn substitute(&mut self, h: ExprHandle, from: ExprHandle, to: ExprHandle) -> ExprHandle {
        let mut memo = HashMap::new();
        self.subs_memo(h, from, to, &mut memo)
    }

    fn subs_memo(
        &mut self,
        h: ExprHandle,
        from: ExprHandle,
        to: ExprHandle,
        memo: &mut HashMap<ExprHandle, ExprHandle>,
    ) -> ExprHandle {
        if h == from {
            return to;
        }
        if let Some(&done) = memo.get(&h) {
            return done;
        }
        let out = match self.get(h).clone() {
            ExprNode::Number(_) | ExprNode::Symbol(_) | ExprNode::Constant(_) => h,
            ExprNode::Add(args) => {
                let new: SmallVec<[ExprHandle; 4]> = args
                    .iter()
                    .map(|&a| self.subs_memo(a, from, to, memo))
                    .collect();
                self.add(&new)
            }
            ExprNode::Mul(args) => {
                let new: SmallVec<[ExprHandle; 4]> = args
                    .iter()
                    .map(|&a| self.subs_memo(a, from, to, memo))
                    .collect();
                self.mul(&new)
            }
            ExprNode::Pow { base, exp } => {
                let b = self.subs_memo(base, from, to, memo);
                let e = self.subs_memo(exp, from, to, memo);
                self.pow(b, e)
            }
            ExprNode::Function { func, arg } => {
                let a = self.subs_memo(arg, from, to, memo);
                self.func(func, a)
            }
            ExprNode::Integral {
                integrand,
                var,
                lower,
                upper,
            } => {
                let lo = self.subs_memo(lower, from, to, memo);
                let hi = self.subs_memo(upper, from, to, memo);
                let body = if var == from {
                    integrand
                } else {
                    self.subs_memo(integrand, from, to, memo)
                };
                self.integral(body, var, lo, hi)
            }
        };
        memo.insert(h, out);
        out
    }
}
