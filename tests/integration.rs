use approx::assert_relative_eq;
use mobius_engine::{
    ComputeOptions, DerivativeMode, EdgeSampling, IntegrationRule, MobiusStrip, StripError,
    StripParameters, compute_strip,
};

const CONVERGED_AREA: f64 = 1.886_733_25;
const CONVERGED_EDGE: f64 = 12.602_06;

#[test]
fn documented_example_matches_at_moderate_resolution() {
    let params = StripParameters::from_total_width(1.0, 0.3, 200)
        .and_then(|p| p.with_resolution(200, 20))
        .expect("valid parameters");
    let props = MobiusStrip::new(params).compute().expect("compute");

    assert_relative_eq!(props.surface_area, 1.8840, max_relative = 1e-2);
    assert_relative_eq!(props.edge_length, 12.5664, max_relative = 1e-2);
    assert_relative_eq!(props.surface_area, CONVERGED_AREA, max_relative = 1e-5);
}

#[test]
fn high_resolution_matches_converged_values() {
    let props = compute_strip(1.0, 0.15, 2000, 200, ComputeOptions::default()).expect("compute");

    assert_relative_eq!(props.surface_area, CONVERGED_AREA, max_relative = 1e-4);
    assert_relative_eq!(props.edge_length, CONVERGED_EDGE, max_relative = 1e-4);
}

#[test]
fn report_has_two_lines_with_four_decimals() {
    let props = compute_strip(1.0, 0.15, 200, 20, ComputeOptions::default()).expect("compute");
    assert_eq!(props.report(), "Surface Area: 1.8867\nEdge Length: 12.6015");
    assert_eq!(props.to_string(), props.report());
}

#[test]
fn repeated_runs_are_bit_identical() {
    let strip = MobiusStrip::new(StripParameters::new(1.3, 0.4, 120, 15).expect("valid"));
    let first = strip.compute().expect("compute");
    let second = strip.compute().expect("compute");

    assert_eq!(first.surface_area.to_bits(), second.surface_area.to_bits());
    assert_eq!(first.edge_length.to_bits(), second.edge_length.to_bits());
    assert_eq!(first.diagnostics.summary(), second.diagnostics.summary());
}

#[test]
fn invalid_configurations_are_rejected_before_computing() {
    let cases = [
        (0.0, 0.15, 200, 20),
        (-1.0, 0.15, 200, 20),
        (1.0, 0.0, 200, 20),
        (1.0, -0.2, 200, 20),
        (1.0, 0.15, 1, 20),
        (1.0, 0.15, 200, 1),
        (f64::NAN, 0.15, 200, 20),
        (1.0, f64::INFINITY, 200, 20),
    ];
    for (radius, half_width, n_u, n_v) in cases {
        let err = compute_strip(radius, half_width, n_u, n_v, ComputeOptions::default())
            .expect_err("invalid configuration");
        assert!(err.is_invalid_configuration(), "{err}");
    }

    let err = StripParameters::new(1.0, 0.15, 1, 20).expect_err("n_u = 1");
    assert_eq!(err.to_string(), "u resolution must be at least 2 samples (got 1)");
}

#[test]
fn too_few_edge_samples_fail_before_integrating() {
    let options = ComputeOptions {
        edge_samples: Some(2),
        ..ComputeOptions::default()
    };
    let err = compute_strip(1.0, 0.15, 50, 5, options).expect_err("two samples");
    assert_eq!(err, StripError::InvalidEdgeSamples { count: 2, min: 3 });
}

#[test]
fn default_parameters_follow_the_total_width_convention() {
    let params = StripParameters::default();
    assert_eq!(params, StripParameters::from_total_width(1.0, 0.3, 200).expect("valid"));
    assert_relative_eq!(params.half_width(), 0.15);
    assert_relative_eq!(params.total_width(), 0.3);
    assert_eq!(params.to_string(), "R=1 w=0.15 grid=200x200");
}

#[test]
fn diagnostics_describe_the_run() {
    let options = ComputeOptions {
        rule: IntegrationRule::Simpson,
        derivatives: DerivativeMode::central_difference(),
        mesh_check: true,
        ..ComputeOptions::default()
    };
    let params = StripParameters::new(1.0, 0.15, 101, 11).expect("valid");
    let props = MobiusStrip::with_options(params, options).compute().expect("compute");
    let diag = &props.diagnostics;

    assert_eq!(diag.area_samples, (101, 11));
    assert_eq!(diag.integration_rule, IntegrationRule::Simpson);
    assert_eq!(diag.derivative_mode, DerivativeMode::central_difference());
    assert_eq!(diag.edge_samples, 202);
    assert_eq!(diag.edge_sampling, EdgeSampling::ClosedLoop);
    assert!(diag.is_clean(), "{diag}");

    let mesh_area = diag.mesh_area.expect("mesh cross-check ran");
    assert_relative_eq!(mesh_area, props.surface_area, max_relative = 1e-2);
    assert_relative_eq!(props.surface_area, CONVERGED_AREA, max_relative = 1e-5);
}

#[test]
fn bad_finite_difference_step_only_warns() {
    let options = ComputeOptions {
        derivatives: DerivativeMode::CentralDifference {
            relative_step: f64::NAN,
        },
        ..ComputeOptions::default()
    };
    let props = compute_strip(1.0, 0.15, 200, 20, options).expect("compute");
    let analytic = compute_strip(1.0, 0.15, 200, 20, ComputeOptions::default()).expect("compute");

    assert_eq!(props.surface_area.to_bits(), analytic.surface_area.to_bits());
    assert_eq!(props.diagnostics.derivative_mode, DerivativeMode::Analytic);
    assert!(props.diagnostics.has_warnings());
}

#[test]
fn half_traversal_is_flagged_and_halves_the_edge() {
    let options = ComputeOptions {
        edge_sampling: EdgeSampling::HalfTraversal,
        ..ComputeOptions::default()
    };
    let strip = MobiusStrip::with_options(
        StripParameters::new(1.0, 0.15, 2000, 4).expect("valid"),
        options,
    );
    let props = strip.compute().expect("compute");

    assert_eq!(props.diagnostics.edge_samples, 2001);
    assert_relative_eq!(2.0 * props.edge_length, CONVERGED_EDGE, max_relative = 1e-4);
    assert!(
        props
            .diagnostics
            .warnings
            .iter()
            .any(|w| w.contains("half of the edge"))
    );
    assert_eq!(strip.edge_length().expect("edge"), props.edge_length);
}

#[test]
fn self_intersecting_strip_is_computed_with_a_warning() {
    let props = compute_strip(1.0, 1.5, 100, 20, ComputeOptions::default()).expect("compute");
    assert!(props.surface_area > 0.0);
    assert!(props.edge_length > 0.0);
    assert!(
        props
            .diagnostics
            .warnings
            .iter()
            .any(|w| w.contains("self-intersects"))
    );
}

#[test]
fn visualization_grid_and_mesh_share_the_parameter_grid() {
    let strip = MobiusStrip::new(StripParameters::new(1.0, 0.15, 40, 6).expect("valid"));
    let grid = strip.surface_grid();
    let (mesh, topology) = strip.mesh().expect("mesh");

    assert_eq!(grid.n_u, 40);
    assert_eq!(grid.n_v, 6);
    assert_eq!(grid.positions_flat(), mesh.positions_flat());
    assert_eq!(strip.parameter_grid().n_u(), 40);
    assert_eq!(topology.boundary_loop_count, 1);
}

#[test]
fn engine_handle_starts_without_results() {
    let mut engine = mobius_engine::Engine::new(1.0, 0.15, 40, 6).expect("valid engine");
    assert_eq!(engine.report(), "");
    assert!(engine.set_integration_rule("Simpson").is_ok());
    assert!(engine.set_parameters(2.0, 0.3, 80, 8).is_ok());
    assert_eq!(engine.report(), "");
}
