//! Structural total order on expressions.
//!
//! Used to sort the arguments of sums and products so that the canonical
//! form of `a + b` does not depend on the order the terms were supplied in.

use std::cmp::Ordering;

use crate::arena::ExprArena;
use crate::expr::ExprNode;
use crate::handle::ExprHandle;

fn rank(node: &ExprNode) -> u8 {
    match node {
        ExprNode::Number(_) => 0,
        ExprNode::Constant(_) => 1,
        ExprNode::Symbol(_) => 2,
        ExprNode::Pow { .. } => 3,
        ExprNode::Mul(_) => 4,
        ExprNode::Add(_) => 5,
        ExprNode::Function { .. } => 6,
        ExprNode::Integral { .. } => 7,
    }
}

impl ExprArena {
    /// Compares two expressions structurally.
    ///
    /// Numbers sort first, then constants, symbols (by name), powers,
    /// products, sums, function applications and integrals.
    #[must_use]
    pub fn compare(&self, a: ExprHandle, b: ExprHandle) -> Ordering {
        if a == b {
            return Ordering::Equal;
        }
        let (na, nb) = (self.get(a), self.get(b));
        match rank(na).cmp(&rank(nb)) {
            Ordering::Equal => {}
            other => return other,
        }
        match (na, nb) {
            (ExprNode::Number(x), ExprNode::Number(y)) => x.cmp(y),
            (ExprNode::Constant(x), ExprNode::Constant(y)) => x.cmp(y),
            (ExprNode::Symbol(x), ExprNode::Symbol(y)) => self
                .symbol_name(*x)
                .cmp(self.symbol_name(*y))
                .then(x.cmp(y)),
            (ExprNode::Pow { base: b1, exp: e1 }, ExprNode::Pow { base: b2, exp: e2 }) => {
                self.compare(*b1, *b2).then_with(|| self.compare(*e1, *e2))
            }
            (ExprNode::Add(x), ExprNode::Add(y)) | (ExprNode::Mul(x), ExprNode::Mul(y)) => {
                self.compare_slices(x, y)
            }
            (
                ExprNode::Function { func: f1, arg: a1 },
                ExprNode::Function { func: f2, arg: a2 },
            ) => f1.cmp(f2).then_with(|| self.compare(*a1, *a2)),
            (left, right) => self.compare_slices(&left.children(), &right.children()),
        }
    }

    fn compare_slices(&self, x: &[ExprHandle], y: &[ExprHandle]) -> Ordering {
        for (a, b) in x.iter().zip(y) {
            match self.compare(*a, *b) {
                Ordering::Equal => {}
                other => return other,
            }
        }
        x.len().cmp(&y.len())
    }

    /// Sorts handles into canonical order.
    pub fn sort_canonical(&self, handles: &mut [ExprHandle]) {
        handles.sort_by(|a, b| self.compare(*a, *b));
    }
}

#[cfg(test)]
mod tests {
    use crate::ExprArena;
    use std::cmp::Ordering;

    #[test]
    fn test_numbers_before_symbols() {
        let mut arena = ExprArena::new();
        let two = arena.integer(2);
        let x = arena.symbol("x");
        let pi = arena.pi();
        assert_eq!(arena.compare(two, x), Ordering::Less);
        assert_eq!(arena.compare(pi, x), Ordering::Less);
        assert_eq!(arena.compare(x, x), Ordering::Equal);
    }

    #[test]
    fn test_symbols_by_name() {
        let mut arena = ExprArena::new();
        let y = arena.symbol("y");
        let x = arena.symbol("x");
        assert_eq!(arena.compare(x, y), Ordering::Less);
        let mut v = vec![y, x];
        arena.sort_canonical(&mut v);
        assert_eq!(v, vec![x, y]);
    }
}
