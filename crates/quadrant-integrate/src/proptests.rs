//! Property-based tests for integration.

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use quadrant_core::{ExprArena, ExprHandle};

    use crate::numerical::{adaptive_integrate, integrate_between, Bound, QuadratureOptions};
    use crate::{integrate, integrate_definite, verify_antiderivative, IntegrationOptions};

    /// Builds `Σ cₖ xᵏ` from small integer coefficients.
    fn polynomial(arena: &mut ExprArena, x: ExprHandle, coeffs: &[i64]) -> ExprHandle {
        let terms: Vec<ExprHandle> = coeffs
            .iter()
            .enumerate()
            .map(|(k, &c)| {
                let c = arena.integer(c);
                let p = arena.powi(x, k as i64);
                arena.mul(&[c, p])
            })
            .collect();
        arena.add(&terms)
    }

    proptest! {
        #[test]
        fn polynomial_antiderivative_differentiates_back(
            coeffs in prop::collection::vec(-20i64..=20, 1..7),
        ) {
            let mut arena = ExprArena::new();
            let x = arena.symbol("x");
            let p = polynomial(&mut arena, x, &coeffs);
            let result = integrate(&mut arena, p, x, &IntegrationOptions::default());
            let f = result.antiderivative().expect("polynomials always integrate");
            let back = arena.diff(f, x);
            let back = arena.expand(back);
            let expanded = arena.expand(p);
            prop_assert_eq!(back, expanded);
        }

        #[test]
        fn linear_argument_table_entries_verify(
            func in prop::sample::select(vec!["sin", "cos", "exp", "sinh", "cosh", "atan"]),
            a in 1i64..6,
            b in -5i64..=5,
        ) {
            let mut arena = ExprArena::new();
            let x = arena.symbol("x");
            let src = format!("{func}({a}*x + {b})");
            let f = arena.parse(&src).unwrap();
            let result = integrate(&mut arena, f, x, &IntegrationOptions::default());
            let anti = result.antiderivative().expect("table entry");
            prop_assert!(verify_antiderivative(&mut arena, f, anti, x), "{}", src);
        }

        #[test]
        fn definite_polynomial_matches_quadrature(
            coeffs in prop::collection::vec(-10i64..=10, 1..5),
            a in -5i64..5,
            width in 1i64..6,
        ) {
            let mut arena = ExprArena::new();
            let x = arena.symbol("x");
            let p = polynomial(&mut arena, x, &coeffs);
            let lower = arena.integer(a);
            let upper = arena.integer(a + width);
            let result = integrate_definite(&mut arena, p, x, lower, upper, &IntegrationOptions::default())
                .unwrap();
            prop_assert!(result.is_evaluated(&arena));

            let f = |t: f64| arena.evaluate_at(p, x, t).unwrap();
            #[allow(clippy::cast_precision_loss)]
            let q = adaptive_integrate(&f, a as f64, (a + width) as f64, &QuadratureOptions::default());
            let exact = result.numeric.unwrap();
            prop_assert!((exact - q.value).abs() <= 1e-8 * exact.abs().max(1.0));
        }

        #[test]
        fn reversing_bounds_negates(a in -3.0f64..3.0, width in 0.1f64..4.0) {
            let f = |t: f64| t.cos() * t.exp();
            let options = QuadratureOptions::default();
            let (lo, hi) = (Bound::Finite(a), Bound::Finite(a + width));
            let forward = integrate_between(&f, lo, hi, &options);
            let backward = integrate_between(&f, hi, lo, &options);
            prop_assert!((forward.value + backward.value).abs() < 1e-9);
        }
    }
}
