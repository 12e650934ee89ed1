mod core;
mod diagnostics;
mod edge;
mod grid;
mod integrate;
mod mesh;
mod metrics;
mod params;
mod surface;

pub use self::core::{BBox, Point3, Tolerance, Vec3};
pub use diagnostics::StripDiagnostics;
pub use edge::{EdgeEstimate, EdgeLengthEstimator, EdgeSampling, polyline_length};
pub use grid::{GridLayout, ParameterGrid, SurfaceGrid};
pub use integrate::{
    AreaEstimate, IntegrationRule, SurfaceIntegrator, simpson_weights, trapezoid_weights,
};
pub use mesh::{GeomMesh, MeshTopology, mesh_strip, triangulate_twisted_grid};
pub use metrics::{GeomMetrics, GeomTimingReport, TimingBucket};
pub use params::{GridAxis, MIN_RESOLUTION, StripError, StripParameters, StripResult};
pub use surface::{
    DerivativeMode, MobiusSurface, PartialDerivatives, Surface, central_difference_derivatives,
};

#[cfg(test)]
mod tests;
