//! Adaptive Numerical Integration
//!
//! Global adaptive bisection: the panel with the largest error estimate is
//! split until the summed error meets the tolerance or the subdivision
//! budget runs out. Infinite ranges are mapped onto `[0, 1)` first.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use super::gauss_kronrod::{GaussKronrodRule, PanelEstimate};
use super::Bound;

/// Tolerances and limits for adaptive quadrature.
#[derive(Clone, Copy, Debug)]
pub struct QuadratureOptions {
    /// Absolute error tolerance.
    pub abs_tol: f64,
    /// Relative error tolerance.
    pub rel_tol: f64,
    /// Maximum number of bisections.
    pub max_subdivisions: usize,
    /// Panel rule.
    pub rule: GaussKronrodRule,
}

impl Default for QuadratureOptions {
    fn default() -> Self {
        Self {
            abs_tol: 1e-10,
            rel_tol: 1e-10,
            max_subdivisions: 1000,
            rule: GaussKronrodRule::g7k15(),
        }
    }
}

impl QuadratureOptions {
    /// Options with the same absolute and relative tolerance.
    #[must_use]
    pub fn with_tolerance(tolerance: f64, max_subdivisions: usize) -> Self {
        Self {
            abs_tol: tolerance,
            rel_tol: tolerance,
            max_subdivisions,
            ..Self::default()
        }
    }

    fn target(&self, value: f64) -> f64 {
        self.abs_tol.max(self.rel_tol * value.abs())
    }
}

/// Result of adaptive integration.
#[derive(Clone, Copy, Debug)]
pub struct Quadrature {
    /// Computed integral value.
    pub value: f64,
    /// Estimated absolute error.
    pub error: f64,
    /// Total number of integrand evaluations.
    pub evaluations: usize,
    /// Number of panels in the final partition.
    pub intervals: usize,
    /// Whether the error target was met.
    pub converged: bool,
    /// False if the integrand produced a non-finite sample.
    pub finite: bool,
}

impl Quadrature {
    fn empty() -> Self {
        Self {
            value: 0.0,
            error: 0.0,
            evaluations: 0,
            intervals: 0,
            converged: true,
            finite: true,
        }
    }

    fn failed() -> Self {
        Self {
            value: f64::NAN,
            error: f64::INFINITY,
            evaluations: 0,
            intervals: 0,
            converged: false,
            finite: false,
        }
    }

    /// The value, if the run converged on finite samples.
    #[must_use]
    pub fn converged_value(&self) -> Option<f64> {
        (self.converged && self.finite && self.value.is_finite()).then_some(self.value)
    }

    fn negate(mut self) -> Self {
        self.value = -self.value;
        self
    }

    fn combine(self, other: Self) -> Self {
        Self {
            value: self.value + other.value,
            error: self.error + other.error,
            evaluations: self.evaluations + other.evaluations,
            intervals: self.intervals + other.intervals,
            converged: self.converged && other.converged,
            finite: self.finite && other.finite,
        }
    }
}

/// A panel with its contribution, ordered by error for the max-heap.
#[derive(Clone, Copy, Debug)]
struct Panel {
    a: f64,
    b: f64,
    value: f64,
    error: f64,
}

impl Panel {
    fn new(a: f64, b: f64, estimate: PanelEstimate) -> Self {
        Self {
            a,
            b,
            value: estimate.value,
            error: estimate.error,
        }
    }
}

impl PartialEq for Panel {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Panel {}

impl PartialOrd for Panel {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Panel {
    fn cmp(&self, other: &Self) -> Ordering {
        self.error.total_cmp(&other.error)
    }
}

/// Integrates `f` over the finite interval `[a, b]`.
///
/// A non-finite panel estimate (a pole at a sample point, a domain error
/// reported as NaN) stops the run with `finite == false`.
///
/// # Example
///
/// ```
/// use quadrant_integrate::numerical::{adaptive_integrate, QuadratureOptions};
///
/// let r = adaptive_integrate(&|x: f64| x.cos(), 0.0, 1.0, &QuadratureOptions::default());
/// assert!((r.value - 1f64.sin()).abs() < 1e-10);
/// ```
pub fn adaptive_integrate<F: Fn(f64) -> f64>(
    f: &F,
    a: f64,
    b: f64,
    options: &QuadratureOptions,
) -> Quadrature {
    if a == b {
        return Quadrature::empty();
    }
    if !(a.is_finite() && b.is_finite()) {
        return Quadrature::failed();
    }

    let rule = options.rule;
    let first = rule.estimate(f, a, b);
    let mut evaluations = first.evaluations;
    if !first.is_finite() {
        return Quadrature {
            evaluations,
            ..Quadrature::failed()
        };
    }

    let mut heap = BinaryHeap::new();
    heap.push(Panel::new(a, b, first));
    let mut value = first.value;
    let mut error = first.error;

    let mut subdivisions = 0;
    while error > options.target(value) && subdivisions < options.max_subdivisions {
        let Some(panel) = heap.pop() else { break };
        subdivisions += 1;

        let mid = 0.5 * (panel.a + panel.b);
        if mid <= panel.a || mid >= panel.b {
            // Panel has shrunk below f64 resolution.
            heap.push(panel);
            break;
        }

        let left = rule.estimate(f, panel.a, mid);
        let right = rule.estimate(f, mid, panel.b);
        evaluations += left.evaluations + right.evaluations;
        if !(left.is_finite() && right.is_finite()) {
            return Quadrature {
                evaluations,
                intervals: heap.len() + 2,
                ..Quadrature::failed()
            };
        }

        value += left.value + right.value - panel.value;
        error += left.error + right.error - panel.error;
        heap.push(Panel::new(panel.a, mid, left));
        heap.push(Panel::new(mid, panel.b, right));
    }

    // Re-sum to shed the cancellation drift of the running totals.
    let (value, error) = heap
        .iter()
        .fold((0.0, 0.0), |(v, e), p| (v + p.value, e + p.error));

    Quadrature {
        value,
        error,
        evaluations,
        intervals: heap.len(),
        converged: error <= options.target(value),
        finite: true,
    }
}

/// Integrates over `[a, ∞)`.
///
/// Uses the substitution x = a + t/(1-t), dx = dt/(1-t)², which maps the
/// range onto `[0, 1)`.
pub fn adaptive_integrate_to_infinity<F: Fn(f64) -> f64>(
    f: &F,
    a: f64,
    options: &QuadratureOptions,
) -> Quadrature {
    let transformed = |t: f64| {
        let s = 1.0 - t;
        f(a + t / s) / (s * s)
    };
    adaptive_integrate(&transformed, 0.0, 1.0, options)
}

/// Integrates over `(-∞, b]` by reflecting onto `[-b, ∞)`.
pub fn adaptive_integrate_from_neg_infinity<F: Fn(f64) -> f64>(
    f: &F,
    b: f64,
    options: &QuadratureOptions,
) -> Quadrature {
    adaptive_integrate_to_infinity(&|x| f(-x), -b, options)
}

/// Integrates over the whole real line, split at the origin.
pub fn adaptive_integrate_full_line<F: Fn(f64) -> f64>(
    f: &F,
    options: &QuadratureOptions,
) -> Quadrature {
    let half = QuadratureOptions {
        abs_tol: options.abs_tol / 2.0,
        max_subdivisions: options.max_subdivisions / 2,
        ..*options
    };
    let left = adaptive_integrate_from_neg_infinity(f, 0.0, &half);
    let right = adaptive_integrate_to_infinity(f, 0.0, &half);
    left.combine(right)
}

/// Integrates `f` between two bounds that may be infinite.
///
/// Reversed bounds give the negated integral, equal bounds give zero.
pub fn integrate_between<F: Fn(f64) -> f64>(
    f: &F,
    lower: Bound,
    upper: Bound,
    options: &QuadratureOptions,
) -> Quadrature {
    match lower.partial_cmp(&upper) {
        Some(Ordering::Equal) => return Quadrature::empty(),
        Some(Ordering::Greater) => return integrate_between(f, upper, lower, options).negate(),
        Some(Ordering::Less) => {}
        None => return Quadrature::failed(),
    }

    match (lower, upper) {
        (Bound::Finite(a), Bound::Finite(b)) => adaptive_integrate(f, a, b, options),
        (Bound::Finite(a), Bound::PosInfinity) => adaptive_integrate_to_infinity(f, a, options),
        (Bound::NegInfinity, Bound::Finite(b)) => {
            adaptive_integrate_from_neg_infinity(f, b, options)
        }
        (Bound::NegInfinity, Bound::PosInfinity) => adaptive_integrate_full_line(f, options),
        _ => Quadrature::failed(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn opts() -> QuadratureOptions {
        QuadratureOptions::default()
    }

    #[test]
    fn test_adaptive_polynomial() {
        // ∫₀¹ x³ dx = 1/4
        let result = adaptive_integrate(&|x: f64| x.powi(3), 0.0, 1.0, &opts());
        assert!((result.value - 0.25).abs() < 1e-12);
        assert!(result.converged);
        assert_eq!(result.intervals, 1);
    }

    #[test]
    fn test_adaptive_sine() {
        let result = adaptive_integrate(&f64::sin, 0.0, PI, &opts());
        assert!((result.value - 2.0).abs() < 1e-10);
    }

    #[test]
    fn test_adaptive_oscillatory() {
        // ∫₀^10 sin(10x) dx = (1 - cos(100))/10
        let result = adaptive_integrate(&|x: f64| (10.0 * x).sin(), 0.0, 10.0, &opts());
        let expected = (1.0 - 100f64.cos()) / 10.0;
        assert!((result.value - expected).abs() < 1e-9);
        assert!(result.intervals > 1);
    }

    #[test]
    fn test_endpoint_singularity() {
        // ∫₀¹ 1/√x dx = 2; the endpoint itself is never sampled
        let options = QuadratureOptions::with_tolerance(1e-8, 1000);
        let result = adaptive_integrate(&|x: f64| 1.0 / x.sqrt(), 0.0, 1.0, &options);
        assert!(result.finite);
        assert!((result.value - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_pole_on_sample_is_reported() {
        let result = adaptive_integrate(&|x: f64| 1.0 / x, -1.0, 1.0, &opts());
        assert!(!result.finite);
        assert_eq!(result.converged_value(), None);
    }

    #[test]
    fn test_semi_infinite() {
        // ∫₀^∞ e^(-x) dx = 1
        let result = adaptive_integrate_to_infinity(&|x: f64| (-x).exp(), 0.0, &opts());
        assert!((result.value - 1.0).abs() < 1e-8);
        assert!(result.converged);
    }

    #[test]
    fn test_from_neg_infinity() {
        // ∫_{-∞}^0 e^x dx = 1
        let result = adaptive_integrate_from_neg_infinity(&f64::exp, 0.0, &opts());
        assert!((result.value - 1.0).abs() < 1e-8);
    }

    #[test]
    fn test_full_line_gaussian() {
        // ∫_{-∞}^∞ e^(-x²) dx = √π
        let result = adaptive_integrate_full_line(&|x: f64| (-x * x).exp(), &opts());
        assert!((result.value - PI.sqrt()).abs() < 1e-8);
    }

    #[test]
    fn test_divergent_tail_does_not_converge() {
        let result = adaptive_integrate_to_infinity(&|x: f64| x * x, 0.0, &opts());
        assert_eq!(result.converged_value(), None);
    }

    #[test]
    fn test_integrate_between_orientation() {
        let forward = integrate_between(&f64::cos, Bound::Finite(0.0), Bound::Finite(1.0), &opts());
        let backward = integrate_between(&f64::cos, Bound::Finite(1.0), Bound::Finite(0.0), &opts());
        assert!((forward.value + backward.value).abs() < 1e-14);

        let same = integrate_between(&f64::cos, Bound::PosInfinity, Bound::PosInfinity, &opts());
        assert_eq!(same.value, 0.0);

        let tail = integrate_between(
            &|x: f64| 1.0 / (1.0 + x * x),
            Bound::NegInfinity,
            Bound::PosInfinity,
            &opts(),
        );
        assert!((tail.value - PI).abs() < 1e-8);
    }
}
