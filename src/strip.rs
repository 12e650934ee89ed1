//! The computation pipeline: parameters in, surface area and edge length out.
//!
//! ```
//! use mobius_engine::{MobiusStrip, StripParameters};
//!
//! let params = StripParameters::new(1.0, 0.15, 200, 20).unwrap();
//! let props = MobiusStrip::new(params).compute().unwrap();
//! assert!(props.surface_area > 0.0);
//! println!("{props}");
//! ```

use std::fmt;

use serde::Serialize;

use crate::geom::{
    DerivativeMode, EdgeLengthEstimator, EdgeSampling, GeomMesh, GeomMetrics, IntegrationRule,
    MeshTopology, MobiusSurface, ParameterGrid, StripDiagnostics, StripParameters, StripResult,
    SurfaceGrid, SurfaceIntegrator, TimingBucket, mesh_strip,
};

/// Numerical knobs of a run. Defaults: midpoint rule, analytic derivatives,
/// closed-loop edge with `2·n_u` samples, no mesh cross-check.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ComputeOptions {
    pub rule: IntegrationRule,
    pub derivatives: DerivativeMode,
    pub edge_sampling: EdgeSampling,
    /// Overrides the number of boundary samples.
    pub edge_samples: Option<usize>,
    /// Also mesh the strip and record the triangle-area sum in the diagnostics.
    pub mesh_check: bool,
}

impl ComputeOptions {
    /// Boundary sample count for a `u` resolution of `n_u`.
    ///
    /// The closed loop spans `4π`, so it gets twice the grid density; the
    /// half traversal reuses the `u` samples plus the closing `2π` node.
    #[must_use]
    pub fn edge_samples_for(&self, n_u: usize) -> usize {
        self.edge_samples.unwrap_or(match self.edge_sampling {
            EdgeSampling::ClosedLoop => 2 * n_u,
            EdgeSampling::HalfTraversal => n_u + 1,
        })
    }
}

/// Final scalar results of a run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StripProperties {
    pub surface_area: f64,
    pub edge_length: f64,
    pub diagnostics: StripDiagnostics,
}

impl StripProperties {
    /// The two-line console report.
    #[must_use]
    pub fn report(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for StripProperties {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Surface Area: {:.4}", self.surface_area)?;
        write!(f, "Edge Length: {:.4}", self.edge_length)
    }
}

/// A configured strip. Holds the validated parameters and the canonical
/// parameter grid, built once and shared read-only with the renderer side.
#[derive(Debug, Clone)]
pub struct MobiusStrip {
    params: StripParameters,
    options: ComputeOptions,
    surface: MobiusSurface,
    grid: ParameterGrid,
}

impl MobiusStrip {
    #[must_use]
    pub fn new(params: StripParameters) -> Self {
        Self::with_options(params, ComputeOptions::default())
    }

    #[must_use]
    pub fn with_options(params: StripParameters, options: ComputeOptions) -> Self {
        Self {
            params,
            options,
            surface: MobiusSurface::from_params(&params),
            grid: ParameterGrid::new(&params),
        }
    }

    #[must_use]
    pub const fn params(&self) -> &StripParameters {
        &self.params
    }

    #[must_use]
    pub const fn options(&self) -> &ComputeOptions {
        &self.options
    }

    #[must_use]
    pub const fn surface(&self) -> &MobiusSurface {
        &self.surface
    }

    #[must_use]
    pub const fn parameter_grid(&self) -> &ParameterGrid {
        &self.grid
    }

    /// The `n_u × n_v` point grid for visualization.
    #[must_use]
    pub fn surface_grid(&self) -> SurfaceGrid {
        SurfaceGrid::sample(&self.surface, &self.grid)
    }

    /// Triangle mesh of the point grid with the twisted seam stitched.
    pub fn mesh(&self) -> StripResult<(GeomMesh, MeshTopology)> {
        mesh_strip(&self.surface, &self.grid)
    }

    fn edge_estimator(&self) -> StripResult<EdgeLengthEstimator<'_>> {
        EdgeLengthEstimator::new(
            &self.surface,
            self.options.edge_sampling,
            self.options.edge_samples_for(self.params.n_u()),
        )
    }

    /// Runs both estimators. Option errors surface before any sampling.
    pub fn compute(&self) -> StripResult<StripProperties> {
        let edge = self.edge_estimator()?;
        log::debug!("computing strip properties for {}", self.params);

        let mut metrics = GeomMetrics::default();
        metrics.begin();

        let quadrature = metrics.time(TimingBucket::Grid, || {
            ParameterGrid::with_layout(&self.params, self.options.rule.layout())
        });
        let area = metrics.time(TimingBucket::AreaIntegration, || {
            SurfaceIntegrator::new(&self.surface)
                .with_rule(self.options.rule)
                .with_derivatives(self.options.derivatives)
                .integrate_on(&quadrature)
        });
        let edge = metrics.time(TimingBucket::EdgeLength, || edge.estimate());
        let mesh_area = if self.options.mesh_check {
            let (mesh, _) = metrics.time(TimingBucket::Meshing, || self.mesh())?;
            Some(mesh.surface_area())
        } else {
            None
        };

        let mut diagnostics = StripDiagnostics {
            area_samples: (self.params.n_u(), self.params.n_v()),
            integration_rule: area.rule,
            derivative_mode: area.derivatives,
            derivative_fallbacks: area.derivative_fallbacks,
            edge_samples: edge.samples,
            edge_sampling: edge.sampling,
            mesh_area,
            timing: metrics.end(),
            warnings: area.warnings,
        };
        if self.params.half_width() >= self.params.radius() {
            diagnostics.add_warning(format!(
                "half-width {} >= radius {}: the strip self-intersects",
                self.params.half_width(),
                self.params.radius()
            ));
        }
        if edge.sampling == EdgeSampling::HalfTraversal {
            diagnostics
                .add_warning("edge sampled over one 2π traversal: length covers half of the edge");
        }

        log::debug!("{}", diagnostics.summary());

        Ok(StripProperties {
            surface_area: area.area,
            edge_length: edge.length,
            diagnostics,
        })
    }

    /// Shorthand for `compute()` returning only the area.
    pub fn surface_area(&self) -> StripResult<f64> {
        self.compute().map(|props| props.surface_area)
    }

    /// Edge length alone, without integrating the area.
    pub fn edge_length(&self) -> StripResult<f64> {
        self.edge_estimator().map(|edge| edge.estimate().length)
    }
}

/// Validates the raw values and runs the full pipeline.
pub fn compute_strip(
    radius: f64,
    half_width: f64,
    n_u: usize,
    n_v: usize,
    options: ComputeOptions,
) -> StripResult<StripProperties> {
    let params = StripParameters::new(radius, half_width, n_u, n_v)?;
    MobiusStrip::with_options(params, options).compute()
}
