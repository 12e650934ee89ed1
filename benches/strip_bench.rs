//! Benchmarks for the strip pipeline.
//!
//! Run with: `cargo bench --bench strip_bench`
//!
//! Compares quadrature rules and derivative modes, and measures the edge
//! estimator and mesh construction on their own.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use mobius_engine::geom::{EdgeLengthEstimator, EdgeSampling, MobiusSurface, SurfaceIntegrator};
use mobius_engine::{DerivativeMode, IntegrationRule, MobiusStrip, StripParameters};

fn params(n_u: usize, n_v: usize) -> StripParameters {
    StripParameters::new(1.0, 0.15, n_u, n_v).expect("valid parameters")
}

/// Full pipeline at increasing resolution.
fn bench_compute(c: &mut Criterion) {
    let mut group = c.benchmark_group("compute");

    for &(n_u, n_v) in &[(200, 20), (400, 40), (1000, 100)] {
        let strip = MobiusStrip::new(params(n_u, n_v));
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{n_u}x{n_v}")),
            &strip,
            |b, strip| b.iter(|| black_box(strip.compute())),
        );
    }

    group.finish();
}

/// Area integration only, per rule and derivative mode.
fn bench_area(c: &mut Criterion) {
    let mut group = c.benchmark_group("area");
    let p = params(400, 40);
    let surface = MobiusSurface::from_params(&p);

    let variants = [
        ("midpoint_analytic", IntegrationRule::Midpoint, DerivativeMode::Analytic),
        ("simpson_analytic", IntegrationRule::Simpson, DerivativeMode::Analytic),
        (
            "midpoint_central_difference",
            IntegrationRule::Midpoint,
            DerivativeMode::central_difference(),
        ),
    ];

    for (name, rule, derivatives) in variants {
        let integrator = SurfaceIntegrator::new(&surface)
            .with_rule(rule)
            .with_derivatives(derivatives);
        group.bench_function(name, |b| b.iter(|| black_box(integrator.integrate(&p))));
    }

    group.finish();
}

fn bench_edge(c: &mut Criterion) {
    let surface = MobiusSurface::from_params(&params(200, 20));
    let estimator =
        EdgeLengthEstimator::new(&surface, EdgeSampling::ClosedLoop, 4000).expect("samples");
    c.bench_function("edge_closed_loop_4000", |b| {
        b.iter(|| black_box(estimator.estimate()))
    });
}

fn bench_mesh(c: &mut Criterion) {
    let strip = MobiusStrip::new(params(400, 40));
    c.bench_function("mesh_400x40", |b| b.iter(|| black_box(strip.mesh())));
}

criterion_group!(benches, bench_compute, bench_area, bench_edge, bench_mesh);
criterion_main!(benches);
