//! Distribution of products over sums.

use smallvec::SmallVec;

use crate::arena::ExprArena;
use crate::expr::ExprNode;
use crate::handle::ExprHandle;

/// Largest integer power of a sum that [`ExprArena::expand`] multiplies out.
pub const MAX_EXPAND_POWER: i64 = 32;

impl ExprArena {
    /// Multiplies out products of sums and positive integer powers of sums.
    ///
    /// Function arguments are left untouched.
    pub fn expand(&mut self, h: ExprHandle) -> ExprHandle {
        match self.get(h).clone() {
            ExprNode::Add(args) => {
                let terms: SmallVec<[ExprHandle; 4]> =
                    args.iter().map(|&a| self.expand(a)).collect();
                self.add(&terms)
            }
            ExprNode::Mul(args) => {
                let mut acc = self.one();
                for a in args {
                    let e = self.expand(a);
                    acc = self.expand_product(acc, e);
                }
                acc
            }
            ExprNode::Pow { base, exp } => {
                let b = self.expand(base);
                let n = self
                    .as_number(exp)
                    .and_then(|e| e.to_integer())
                    .filter(|n| (2..=MAX_EXPAND_POWER).contains(n));
                match n {
                    Some(n) if matches!(self.get(b), ExprNode::Add(_)) => {
                        let mut acc = b;
                        for _ in 1..n {
                            acc = self.expand_product(acc, b);
                        }
                        acc
                    }
                    _ => self.pow(b, exp),
                }
            }
            _ => h,
        }
    }

    fn expand_product(&mut self, a: ExprHandle, b: ExprHandle) -> ExprHandle {
        let left = self.terms_of(a);
        let right = self.terms_of(b);
        let mut out: Vec<ExprHandle> = Vec::with_capacity(left.len() * right.len());
        for &l in &left {
            for &r in &right {
                out.push(self.mul(&[l, r]));
            }
        }
        self.add(&out)
    }

    /// The terms of a sum, or the expression itself.
    #[must_use]
    pub fn terms_of(&self, h: ExprHandle) -> SmallVec<[ExprHandle; 4]> {
        match self.get(h) {
            ExprNode::Add(args) => args.clone(),
            _ => smallvec::smallvec![h],
        }
    }

    /// The factors of a product, or the expression itself.
    #[must_use]
    pub fn factors_of(&self, h: ExprHandle) -> SmallVec<[ExprHandle; 4]> {
        match self.get(h) {
            ExprNode::Mul(args) => args.clone(),
            _ => smallvec::smallvec![h],
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::ExprArena;

    #[test]
    fn test_expand_square() {
        let mut arena = ExprArena::new();
        let f = arena.parse("(x + 1)**2").unwrap();
        let e = arena.expand(f);
        assert_eq!(arena.to_text(e), "x**2 + 2*x + 1");
    }

    #[test]
    fn test_expand_product() {
        let mut arena = ExprArena::new();
        let f = arena.parse("x*(x - 1)*(x + 1)").unwrap();
        let e = arena.expand(f);
        assert_eq!(arena.to_text(e), "x**3 - x");
    }

    #[test]
    fn test_expand_leaves_functions() {
        let mut arena = ExprArena::new();
        let f = arena.parse("sin(x)**2").unwrap();
        assert_eq!(arena.expand(f), f);
    }
}
