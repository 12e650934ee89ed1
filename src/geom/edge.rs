//! Boundary length of the strip.
//!
//! The strip has a single edge. Following `v = +w` for `u ∈ [0, 2π)` lands
//! on `v = -w` at `u = 2π`, because `P(u + 2π, w) = P(u, -w)`. Continuing to
//! `u = 4π` closes the loop, so the full edge is `B(u) = P(u, w)` for
//! `u ∈ [0, 4π)`.

use std::f64::consts::TAU;

use serde::Serialize;

use super::core::Point3;
use super::params::{StripError, StripResult};
use super::surface::{MobiusSurface, Surface};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum EdgeSampling {
    /// `B(u)` over the full `4π` loop, closed back onto the first sample.
    #[default]
    ClosedLoop,
    /// `B(u)` over `[0, 2π]` only, as an open polyline. This measures half
    /// of the edge.
    HalfTraversal,
}

impl EdgeSampling {
    /// Fewest samples that still describe a non-degenerate polyline.
    #[must_use]
    pub const fn min_samples(self) -> usize {
        match self {
            Self::ClosedLoop => 3,
            Self::HalfTraversal => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EdgeEstimate {
    pub length: f64,
    pub samples: usize,
    pub sampling: EdgeSampling,
}

pub struct EdgeLengthEstimator<'a> {
    surface: &'a MobiusSurface,
    sampling: EdgeSampling,
    samples: usize,
}

impl<'a> EdgeLengthEstimator<'a> {
    pub fn new(
        surface: &'a MobiusSurface,
        sampling: EdgeSampling,
        samples: usize,
    ) -> StripResult<Self> {
        let min = sampling.min_samples();
        if samples < min {
            return Err(StripError::InvalidEdgeSamples {
                count: samples,
                min,
            });
        }
        Ok(Self {
            surface,
            sampling,
            samples,
        })
    }

    /// Sampled boundary points in traversal order.
    #[must_use]
    pub fn boundary_points(&self) -> Vec<Point3> {
        let w = self.surface.half_width;
        match self.sampling {
            EdgeSampling::ClosedLoop => {
                let step = 2.0 * TAU / self.samples as f64;
                (0..self.samples)
                    .map(|k| self.surface.point_at(k as f64 * step, w))
                    .collect()
            }
            EdgeSampling::HalfTraversal => {
                let step = TAU / (self.samples - 1) as f64;
                (0..self.samples)
                    .map(|k| self.surface.point_at(k as f64 * step, w))
                    .collect()
            }
        }
    }

    #[must_use]
    pub fn estimate(&self) -> EdgeEstimate {
        let points = self.boundary_points();
        let closed = self.sampling == EdgeSampling::ClosedLoop;
        let length = polyline_length(&points, closed);
        log::debug!(
            "edge length {length} ({:?}, {} samples)",
            self.sampling,
            self.samples
        );
        EdgeEstimate {
            length,
            samples: self.samples,
            sampling: self.sampling,
        }
    }
}

/// Sum of Euclidean distances between consecutive points; `closed` adds the
/// segment from the last point back to the first.
#[must_use]
pub fn polyline_length(points: &[Point3], closed: bool) -> f64 {
    let open: f64 = points.windows(2).map(|w| w[1].distance_to(w[0])).sum();
    match (closed, points.first(), points.last()) {
        (true, Some(first), Some(last)) if points.len() > 2 => open + first.distance_to(*last),
        _ => open,
    }
}
