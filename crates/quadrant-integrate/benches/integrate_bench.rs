//! Benchmarks for symbolic and numerical integration.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use quadrant_core::ExprArena;
use quadrant_integrate::numerical::{adaptive_integrate, GaussKronrodRule, QuadratureOptions};
use quadrant_integrate::{integrate, integrate_definite, IntegrationOptions};

fn bench_antiderivatives(c: &mut Criterion) {
    let mut group = c.benchmark_group("antiderivative");
    let options = IntegrationOptions::default();

    for src in ["x**5 - 3*x + 1", "x**2*cos(x)", "x*exp(x**2)", "1/(x**2 + 2*x + 5)"] {
        group.bench_with_input(BenchmarkId::from_parameter(src), &src, |b, src| {
            b.iter(|| {
                let mut arena = ExprArena::new();
                let x = arena.symbol("x");
                let f = arena.parse(src).unwrap();
                black_box(integrate(&mut arena, f, x, &options))
            });
        });
    }

    group.finish();
}

fn bench_definite(c: &mut Criterion) {
    let options = IntegrationOptions::default();

    c.bench_function("definite x*exp(-x) on [0, oo)", |b| {
        b.iter(|| {
            let mut arena = ExprArena::new();
            let x = arena.symbol("x");
            let f = arena.parse("x*exp(-x)").unwrap();
            let zero = arena.zero();
            let oo = arena.infinity();
            black_box(integrate_definite(&mut arena, f, x, zero, oo, &options).unwrap())
        });
    });
}

fn bench_quadrature(c: &mut Criterion) {
    let mut group = c.benchmark_group("quadrature");

    for (name, rule) in [("G7K15", GaussKronrodRule::g7k15()), ("G15K31", GaussKronrodRule::g15k31())] {
        let options = QuadratureOptions {
            rule,
            ..QuadratureOptions::default()
        };
        group.bench_function(name, |b| {
            b.iter(|| black_box(adaptive_integrate(&|x: f64| x.sqrt() * x.sin(), 0.0, 10.0, &options)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_antiderivatives, bench_definite, bench_quadrature);
criterion_main!(benches);
