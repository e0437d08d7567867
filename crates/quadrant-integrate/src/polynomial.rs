//! Polynomial integration using the power rule.
//!
//! For a polynomial p(x) = a₀ + a₁x + a₂x² + ... + aₙxⁿ,
//! the integral is:
//!
//! ∫p(x)dx = a₀x + (a₁/2)x² + (a₂/3)x³ + ... + (aₙ/(n+1))xⁿ⁺¹ + C
//!
//! Coefficients are arbitrary expressions free of the variable, so
//! `pi*x**2` is a polynomial with `a₂ = pi`.

use quadrant_core::{ExprArena, ExprHandle, ExprNode};

/// Degrees above this are not treated as polynomials.
pub const MAX_DEGREE: usize = 1024;

/// A dense univariate polynomial with symbolic coefficients.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Polynomial {
    /// `coeffs[k]` multiplies `x^k`; the last entry is nonzero.
    coeffs: Vec<ExprHandle>,
}

impl Polynomial {
    /// Recognizes `h` as a polynomial in `var` after expansion.
    ///
    /// Returns `None` if any term has a factor that is neither free of `var`
    /// nor a non-negative integer power of it.
    pub fn from_expr(arena: &mut ExprArena, h: ExprHandle, var: ExprHandle) -> Option<Self> {
        let expanded = arena.expand(h);
        let mut coeffs: Vec<ExprHandle> = Vec::new();
        for term in arena.terms_of(expanded) {
            let (degree, coeff) = monomial(arena, term, var)?;
            if coeffs.len() <= degree {
                let zero = arena.zero();
                coeffs.resize(degree + 1, zero);
            }
            coeffs[degree] = arena.add(&[coeffs[degree], coeff]);
        }
        let mut poly = Self { coeffs };
        poly.trim(arena);
        Some(poly)
    }

    fn trim(&mut self, arena: &ExprArena) {
        while let Some(&last) = self.coeffs.last() {
            if arena.as_number(last).is_some_and(|n| n.is_zero()) {
                self.coeffs.pop();
            } else {
                break;
            }
        }
    }

    /// True for the zero polynomial.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.coeffs.is_empty()
    }

    /// Degree, with the zero polynomial reported as degree 0.
    #[must_use]
    pub fn degree(&self) -> usize {
        self.coeffs.len().saturating_sub(1)
    }

    /// Coefficient of `x^k`, if stored.
    #[must_use]
    pub fn coeff(&self, k: usize) -> Option<ExprHandle> {
        self.coeffs.get(k).copied()
    }

    /// Leading coefficient.
    #[must_use]
    pub fn leading(&self) -> Option<ExprHandle> {
        self.coeffs.last().copied()
    }

    /// Rebuilds the polynomial as an expression in `var`.
    pub fn to_expr(&self, arena: &mut ExprArena, var: ExprHandle) -> ExprHandle {
        let mut terms = Vec::with_capacity(self.coeffs.len());
        for (k, &c) in self.coeffs.iter().enumerate() {
            let power = arena.powi(var, k as i64);
            terms.push(arena.mul(&[c, power]));
        }
        arena.add(&terms)
    }

    /// The power-rule antiderivative with zero constant term.
    pub fn integrate(&self, arena: &mut ExprArena) -> Self {
        if self.is_zero() {
            return self.clone();
        }
        let mut coeffs = Vec::with_capacity(self.coeffs.len() + 1);
        coeffs.push(arena.zero());
        for (k, &c) in self.coeffs.iter().enumerate() {
            // Each coefficient aₖ becomes aₖ/(k+1) at position k+1
            let divisor = arena.integer(k as i64 + 1);
            coeffs.push(arena.div(c, divisor));
        }
        Self { coeffs }
    }

    /// The formal derivative.
    pub fn derivative(&self, arena: &mut ExprArena) -> Self {
        let mut coeffs = Vec::with_capacity(self.coeffs.len().saturating_sub(1));
        for (k, &c) in self.coeffs.iter().enumerate().skip(1) {
            let factor = arena.integer(k as i64);
            coeffs.push(arena.mul(&[factor, c]));
        }
        let mut poly = Self { coeffs };
        poly.trim(arena);
        poly
    }
}

/// Splits one expanded term into `(degree, coefficient)`.
fn monomial(arena: &mut ExprArena, term: ExprHandle, var: ExprHandle) -> Option<(usize, ExprHandle)> {
    if arena.is_free_of(term, var) {
        return Some((0, term));
    }
    let mut degree = 0usize;
    let mut coeff_factors = Vec::new();
    for factor in arena.factors_of(term) {
        if factor == var {
            degree += 1;
        } else if arena.is_free_of(factor, var) {
            coeff_factors.push(factor);
        } else {
            match arena.get(factor) {
                ExprNode::Pow { base, exp } if *base == var => {
                    let n = arena.as_number(*exp)?.to_integer()?;
                    degree += usize::try_from(n).ok()?;
                }
                _ => return None,
            }
        }
    }
    if degree > MAX_DEGREE {
        return None;
    }
    Some((degree, arena.mul(&coeff_factors)))
}

/// `slope * var + intercept` with a nonzero slope free of the variable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LinearForm {
    /// Coefficient of the variable.
    pub slope: ExprHandle,
    /// Constant term.
    pub intercept: ExprHandle,
}

impl LinearForm {
    /// Recognizes `h` as a degree-one polynomial in `var`.
    pub fn from_expr(arena: &mut ExprArena, h: ExprHandle, var: ExprHandle) -> Option<Self> {
        if h == var {
            return Some(Self {
                slope: arena.one(),
                intercept: arena.zero(),
            });
        }
        let poly = Polynomial::from_expr(arena, h, var)?;
        if poly.degree() != 1 || poly.is_zero() {
            return None;
        }
        Some(Self {
            slope: poly.coeff(1)?,
            intercept: poly.coeff(0)?,
        })
    }

    /// True when the intercept is exactly zero.
    #[must_use]
    pub fn is_homogeneous(&self, arena: &ExprArena) -> bool {
        arena.as_number(self.intercept).is_some_and(|n| n.is_zero())
    }
}
