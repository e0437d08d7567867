//! Arena allocator for expression storage.
//!
//! Nodes live contiguously in a `Vec` and are hash-consed: each
//! structurally unique node is stored once, so handle equality is
//! structural equality. The canonical constructors (`add`, `mul`, `pow`,
//! `func`, ...) live in the `build` module; `intern` stores a node verbatim
//! and is only meant for nodes that are already canonical.

use hashbrown::HashMap;

use crate::expr::{Constant, ExprNode, SymbolId};
use crate::handle::ExprHandle;
use crate::intern::SymbolTable;
use crate::number::Number;

/// The main arena for storing expressions.
#[derive(Debug, Default)]
pub struct ExprArena {
    /// Storage for all expression nodes.
    nodes: Vec<ExprNode>,
    /// Interning table: maps node content to its handle.
    intern_map: HashMap<ExprNode, ExprHandle>,
    /// Symbol names.
    symbols: SymbolTable,
}

impl ExprArena {
    /// Creates a new empty arena.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an arena with pre-allocated capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            intern_map: HashMap::with_capacity(capacity),
            symbols: SymbolTable::new(),
        }
    }

    /// Interns an expression node, returning its handle.
    ///
    /// If an identical node already exists, returns the existing handle.
    pub fn intern(&mut self, node: ExprNode) -> ExprHandle {
        if let Some(&handle) = self.intern_map.get(&node) {
            return handle;
        }

        let index = self.nodes.len();
        assert!(index < u32::MAX as usize, "Arena capacity exceeded");

        let handle = ExprHandle::new(index as u32);
        self.nodes.push(node.clone());
        self.intern_map.insert(node, handle);
        handle
    }

    /// Gets the node at the given handle.
    ///
    /// # Panics
    ///
    /// Panics if the handle was produced by a different arena.
    #[must_use]
    pub fn get(&self, handle: ExprHandle) -> &ExprNode {
        &self.nodes[handle.index()]
    }

    /// Returns the number of nodes in the arena.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the arena is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Gets the name of a symbol by its ID.
    #[must_use]
    pub fn symbol_name(&self, id: SymbolId) -> &str {
        self.symbols.name(id).unwrap_or("?")
    }

    // === Atoms ===

    /// Creates a symbol expression.
    pub fn symbol(&mut self, name: &str) -> ExprHandle {
        let id = self.symbols.intern(name);
        self.intern(ExprNode::Symbol(id))
    }

    /// Creates a rational number.
    pub fn number(&mut self, value: Number) -> ExprHandle {
        self.intern(ExprNode::Number(value))
    }

    /// Creates an integer expression.
    pub fn integer(&mut self, value: i64) -> ExprHandle {
        self.number(Number::integer(value))
    }

    /// Creates `num / den`. A zero denominator gives the canonical quotient,
    /// which is undefined.
    pub fn rational(&mut self, num: i64, den: i64) -> ExprHandle {
        match Number::new(num, den) {
            Some(q) => self.number(q),
            None => {
                let n = self.integer(num);
                let d = self.integer(den);
                self.div(n, d)
            }
        }
    }

    /// Creates a named constant.
    pub fn constant(&mut self, c: Constant) -> ExprHandle {
        self.intern(ExprNode::Constant(c))
    }

    /// `0`.
    pub fn zero(&mut self) -> ExprHandle {
        self.number(Number::ZERO)
    }

    /// `1`.
    pub fn one(&mut self) -> ExprHandle {
        self.number(Number::ONE)
    }

    /// `pi`.
    pub fn pi(&mut self) -> ExprHandle {
        self.constant(Constant::Pi)
    }

    /// `oo`.
    pub fn infinity(&mut self) -> ExprHandle {
        self.constant(Constant::Infinity)
    }

    /// `-oo`.
    pub fn neg_infinity(&mut self) -> ExprHandle {
        let oo = self.infinity();
        self.neg(oo)
    }

    /// The undefined value.
    pub fn undefined(&mut self) -> ExprHandle {
        self.constant(Constant::Undefined)
    }

    // === Queries ===

    /// Returns the number if the expression is one.
    #[must_use]
    pub fn as_number(&self, h: ExprHandle) -> Option<Number> {
        self.get(h).as_number()
    }

    /// Returns the symbol name if the expression is a symbol.
    #[must_use]
    pub fn as_symbol(&self, h: ExprHandle) -> Option<&str> {
        match self.get(h) {
            ExprNode::Symbol(id) => Some(self.symbol_name(*id)),
            _ => None,
        }
    }

    /// Returns true if `needle` occurs anywhere inside `h`.
    #[must_use]
    pub fn contains(&self, h: ExprHandle, needle: ExprHandle) -> bool {
        if h == needle {
            return true;
        }
        self.get(h)
            .children()
            .into_iter()
            .any(|c| self.contains(c, needle))
    }

    /// Returns true if the symbol `var` is not free in `h`.
    ///
    /// The dummy variable of an unevaluated integral is bound and does not
    /// count.
    #[must_use]
    pub fn is_free_of(&self, h: ExprHandle, var: ExprHandle) -> bool {
        if h == var {
            return false;
        }
        match self.get(h) {
            ExprNode::Integral {
                integrand,
                var: bound,
                lower,
                upper,
            } => {
                (*bound == var || self.is_free_of(*integrand, var))
                    && self.is_free_of(*lower, var)
                    && self.is_free_of(*upper, var)
            }
            node => node.children().into_iter().all(|c| self.is_free_of(c, var)),
        }
    }

    /// Names of the free symbols in `h`, sorted and deduplicated.
    #[must_use]
    pub fn free_symbols(&self, h: ExprHandle) -> Vec<String> {
        let mut ids = Vec::new();
        self.collect_free(h, &mut Vec::new(), &mut ids);
        let mut names: Vec<String> = ids
            .into_iter()
            .map(|id| self.symbol_name(id).to_owned())
            .collect();
        names.sort();
        names.dedup();
        names
    }

    fn collect_free(&self, h: ExprHandle, bound: &mut Vec<SymbolId>, out: &mut Vec<SymbolId>) {
        match self.get(h) {
            ExprNode::Symbol(id) => {
                if !bound.contains(id) {
                    out.push(*id);
                }
            }
            ExprNode::Integral {
                integrand,
                var,
                lower,
                upper,
            } => {
                let (integrand, var, lower, upper) = (*integrand, *var, *lower, *upper);
                self.collect_free(lower, bound, out);
                self.collect_free(upper, bound, out);
                if let ExprNode::Symbol(id) = self.get(var) {
                    bound.push(*id);
                    self.collect_free(integrand, bound, out);
                    bound.pop();
                } else {
                    self.collect_free(integrand, bound, out);
                }
            }
            node => {
                for c in node.children() {
                    self.collect_free(c, bound, out);
                }
            }
        }
    }

    /// Returns true if `h` contains no free symbols.
    #[must_use]
    pub fn is_constant(&self, h: ExprHandle) -> bool {
        self.free_symbols(h).is_empty()
    }

    /// Returns true if the undefined constant occurs in `h`.
    #[must_use]
    pub fn contains_undefined(&self, h: ExprHandle) -> bool {
        match self.get(h) {
            ExprNode::Constant(Constant::Undefined) => true,
            node => node
                .children()
                .into_iter()
                .any(|c| self.contains_undefined(c)),
        }
    }

    /// Returns true if `h` contains an unevaluated integral.
    #[must_use]
    pub fn contains_integral(&self, h: ExprHandle) -> bool {
        match self.get(h) {
            ExprNode::Integral { .. } => true,
            node => node
                .children()
                .into_iter()
                .any(|c| self.contains_integral(c)),
        }
    }

    /// Returns true if `h` is `oo` or `-oo`.
    #[must_use]
    pub fn is_infinite(&self, h: ExprHandle) -> bool {
        match self.get(h) {
            ExprNode::Constant(Constant::Infinity) => true,
            ExprNode::Mul(args) => {
                args.len() == 2
                    && self.as_number(args[0]) == Some(Number::minus_one())
                    && matches!(self.get(args[1]), ExprNode::Constant(Constant::Infinity))
            }
            _ => false,
        }
    }
}
