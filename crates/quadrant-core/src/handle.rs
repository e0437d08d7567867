//! Expression handles.
//!
//! A handle is a 32-bit index into an [`ExprArena`](crate::ExprArena).
//! Because the arena hash-conses every node built through its canonical
//! constructors, two handles from the same arena are equal exactly when the
//! expressions are structurally equal.

use std::fmt;

/// A handle to an expression stored in an arena.
///
/// Handles are only meaningful for the arena that produced them.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExprHandle(u32);

impl ExprHandle {
    pub(crate) const fn new(index: u32) -> Self {
        Self(index)
    }

    /// Position of the node inside the arena.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for ExprHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Expr({})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_is_four_bytes() {
        assert_eq!(std::mem::size_of::<ExprHandle>(), 4);
        assert_eq!(std::mem::size_of::<Option<ExprHandle>>(), 8);
    }

    #[test]
    fn test_index_round_trips() {
        assert_eq!(ExprHandle::new(7).index(), 7);
        assert_eq!(format!("{:?}", ExprHandle::new(3)), "Expr(3)");
    }
}
