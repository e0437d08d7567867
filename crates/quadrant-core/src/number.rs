//! Exact rational numbers.
//!
//! Values are arbitrary precision rationals, but every operation checks the
//! size of its result: anything whose numerator or denominator exceeds
//! [`MAX_BITS`] yields `None`, and the canonical constructors keep such
//! expressions unfolded (`2**100000` stays a power).

use std::fmt;
use std::ops::Neg;

use dashu::base::{Abs, BitTest, Inverse, Signed as DashuSigned};
use dashu::integer::{IBig, UBig};
use dashu::rational::RBig;

/// Largest numerator or denominator, in bits, that arithmetic will produce.
pub const MAX_BITS: usize = 1 << 14;

/// Largest decimal exponent accepted by [`Number::from_decimal_str`].
const MAX_DECIMAL_EXPONENT: u32 = 4096;

/// Integer roots are only searched for below this size.
const MAX_ROOT_BITS: usize = 1024;

/// An exact rational, always in lowest terms with a positive denominator.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Number(RBig);

impl Number {
    /// Zero.
    pub const ZERO: Number = Number(RBig::ZERO);
    /// One.
    pub const ONE: Number = Number(RBig::ONE);

    /// Minus one.
    #[must_use]
    pub fn minus_one() -> Self {
        Self::integer(-1)
    }

    /// One half.
    #[must_use]
    pub fn half() -> Self {
        Self(RBig::from_parts(IBig::from(1), UBig::from(2u8)))
    }

    /// Minus one half.
    #[must_use]
    pub fn minus_half() -> Self {
        Self(RBig::from_parts(IBig::from(-1), UBig::from(2u8)))
    }

    /// Creates an integer.
    #[must_use]
    pub fn integer(n: i64) -> Self {
        Self(RBig::from(IBig::from(n)))
    }

    /// Creates `num / den` in lowest terms. `None` if `den` is zero.
    #[must_use]
    pub fn new(num: i64, den: i64) -> Option<Self> {
        if den == 0 {
            return None;
        }
        let value = RBig::from_parts(IBig::from(num), UBig::from(den.unsigned_abs()));
        Some(Self(if den < 0 { -value } else { value }))
    }

    fn bounded(value: RBig) -> Option<Self> {
        let fits = value.numerator().bit_len() <= MAX_BITS
            && value.denominator().bit_len() <= MAX_BITS;
        fits.then_some(Self(value))
    }

    /// Numerator (carries the sign).
    #[must_use]
    pub fn numer(&self) -> &IBig {
        self.0.numerator()
    }

    /// Denominator (always positive).
    #[must_use]
    pub fn denom(&self) -> &UBig {
        self.0.denominator()
    }

    /// Numerator and denominator as machine integers, if both fit.
    #[must_use]
    pub fn to_small_parts(&self) -> Option<(i64, u64)> {
        let num = i64::try_from(self.numer().clone()).ok()?;
        let den = u64::try_from(self.denom().clone()).ok()?;
        Some((num, den))
    }

    /// Magnitude of the numerator, and the denominator.
    #[must_use]
    pub fn magnitude_parts(&self) -> (UBig, UBig) {
        let num = UBig::try_from(self.abs().numer().clone()).unwrap_or(UBig::ZERO);
        (num, self.denom().clone())
    }

    /// Returns true if the denominator is one.
    #[must_use]
    pub fn is_integer(&self) -> bool {
        *self.denom() == UBig::ONE
    }

    /// Returns the value as an `i64` if it is an integer that fits.
    #[must_use]
    pub fn to_integer(&self) -> Option<i64> {
        if self.is_integer() {
            i64::try_from(self.numer().clone()).ok()
        } else {
            None
        }
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0 == RBig::ZERO
    }

    #[must_use]
    pub fn is_one(&self) -> bool {
        self.0 == RBig::ONE
    }

    #[must_use]
    pub fn is_negative(&self) -> bool {
        DashuSigned::is_negative(&self.0)
    }

    #[must_use]
    pub fn is_positive(&self) -> bool {
        DashuSigned::is_positive(&self.0)
    }

    /// Nearest `f64`; overflows to `±inf`.
    #[must_use]
    pub fn to_f64(&self) -> f64 {
        self.0.to_f64().value()
    }

    #[must_use]
    pub fn checked_add(&self, other: &Self) -> Option<Self> {
        Self::bounded(&self.0 + &other.0)
    }

    #[must_use]
    pub fn checked_sub(&self, other: &Self) -> Option<Self> {
        Self::bounded(&self.0 - &other.0)
    }

    #[must_use]
    pub fn checked_mul(&self, other: &Self) -> Option<Self> {
        Self::bounded(&self.0 * &other.0)
    }

    /// Division; `None` when dividing by zero or when the result is too large.
    #[must_use]
    pub fn checked_div(&self, other: &Self) -> Option<Self> {
        if other.is_zero() {
            return None;
        }
        Self::bounded(&self.0 / &other.0)
    }

    #[must_use]
    pub fn abs(&self) -> Self {
        Self(self.0.clone().abs())
    }

    /// Multiplicative inverse; `None` for zero.
    #[must_use]
    pub fn recip(&self) -> Option<Self> {
        if self.is_zero() {
            return None;
        }
        Some(Self(self.0.clone().inv()))
    }

    /// Integer power. Negative exponents invert.
    ///
    /// `None` for `0**-n` and when the result would exceed [`MAX_BITS`].
    #[must_use]
    pub fn checked_pow(&self, exp: i64) -> Option<Self> {
        let base = if exp < 0 { self.recip()? } else { self.clone() };
        let exp = usize::try_from(exp.unsigned_abs()).ok()?;
        let width = base.numer().bit_len().max(base.denom().bit_len());
        // 0 and ±1 stay small under any power.
        if width > 1 && width.checked_mul(exp).map_or(true, |bits| bits > MAX_BITS + width) {
            return None;
        }
        Self::bounded(base.0.pow(exp))
    }

    /// The exact `q`-th root, if both numerator and denominator are perfect
    /// `q`-th powers. Even roots of negative numbers have none.
    #[must_use]
    pub fn exact_root(&self, q: u32) -> Option<Self> {
        if q == 0 {
            return None;
        }
        if self.is_negative() {
            if q % 2 == 0 {
                return None;
            }
            return Some(-(-self).exact_root(q)?);
        }
        let num = UBig::try_from(self.numer().clone()).ok()?;
        let num = integer_root(&num, q)?;
        let den = integer_root(self.denom(), q)?;
        Some(Self(RBig::from_parts(IBig::from(num), den)))
    }

    /// Largest integer not greater than the value, if it fits in `i64`.
    #[must_use]
    pub fn floor(&self) -> Option<i64> {
        let den = IBig::from(self.denom().clone());
        let mut q = self.numer() / &den;
        if self.is_negative() && &q * &den != *self.numer() {
            q -= IBig::from(1);
        }
        i64::try_from(q).ok()
    }

    /// `self mod m`, in `[0, m)`.
    #[must_use]
    pub fn rem_euclid(&self, m: i64) -> Option<Self> {
        let m = Self::integer(m);
        let q = self.checked_div(&m)?.floor()?;
        self.checked_sub(&m.checked_mul(&Self::integer(q))?)
    }

    /// Parses a decimal literal such as `12`, `2.5`, `.5`, `1e-3` or `6.02E23`
    /// into an exact rational.
    #[must_use]
    pub fn from_decimal_str(text: &str) -> Option<Self> {
        let (mantissa, exponent) = match text.find(['e', 'E']) {
            Some(at) => (&text[..at], text[at + 1..].parse::<i64>().ok()?),
            None => (text, 0),
        };
        let (int_part, frac_part) = mantissa.split_once('.').unwrap_or((mantissa, ""));
        if int_part.is_empty() && frac_part.is_empty() {
            return None;
        }
        if !int_part.chars().chain(frac_part.chars()).all(|c| c.is_ascii_digit()) {
            return None;
        }
        let digits = format!("{int_part}{frac_part}");
        let value = IBig::from_str_radix(&digits, 10).ok()?;
        let scale = exponent.checked_sub(i64::try_from(frac_part.len()).ok()?)?;
        let magnitude = u32::try_from(scale.unsigned_abs()).ok()?;
        if magnitude > MAX_DECIMAL_EXPONENT {
            return None;
        }
        let power = UBig::from(10u8).pow(magnitude as usize);
        if scale >= 0 {
            Self::bounded(RBig::from(value * IBig::from(power)))
        } else {
            Self::bounded(RBig::from_parts(value, power))
        }
    }
}

/// Exact `q`-th root of `value`, found bit by bit from the top.
fn integer_root(value: &UBig, q: u32) -> Option<UBig> {
    let bits = value.bit_len();
    if bits > MAX_ROOT_BITS {
        return None;
    }
    let q = q as usize;
    let mut root = UBig::ZERO;
    for bit in (0..=bits / q).rev() {
        let candidate = &root + (UBig::ONE << bit);
        if candidate.pow(q) <= *value {
            root = candidate;
        }
    }
    (root.pow(q) == *value).then_some(root)
}

impl Neg for Number {
    type Output = Number;

    fn neg(self) -> Number {
        Number(-self.0)
    }
}

impl Neg for &Number {
    type Output = Number;

    fn neg(self) -> Number {
        Number(-self.0.clone())
    }
}

impl From<i64> for Number {
    fn from(n: i64) -> Self {
        Self::integer(n)
    }
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_integer() {
            write!(f, "{}", self.numer())
        } else {
            write!(f, "{}/{}", self.numer(), self.denom())
        }
    }
}
