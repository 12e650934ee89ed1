//! Parameter-domain sampling and the sampled point grid.
//!
//! A [`ParameterGrid`] holds the ordered `u` and `v` samples of one run.
//! [`SurfaceGrid`] evaluates a surface at every `(u, v)` pair and stores the
//! points row-major by `v` (all `u` samples of the first `v` row, then the
//! next row), which is the layout renderers and [`super::mesh`] consume.

use std::f64::consts::TAU;

use serde::Serialize;

use super::core::{BBox, Point3};
use super::params::StripParameters;
use super::surface::Surface;

/// How samples are placed along the two parametric axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GridLayout {
    /// `u_i = i·2π/n_u` over `[0, 2π)` and `n_v` nodes over `[-w, w]`
    /// including both edges. The seam at `u = 2π` is left to the consumer.
    Periodic,
    /// Cell midpoints: `u_i = (i + ½)·2π/n_u`, `v_j = -w + (j + ½)·2w/n_v`.
    CellCenters,
    /// Closed node sets on both axes, endpoints included.
    Nodes,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterGrid {
    pub u: Vec<f64>,
    pub v: Vec<f64>,
    /// Distance between consecutive `u` samples.
    pub du: f64,
    /// Distance between consecutive `v` samples.
    pub dv: f64,
    pub layout: GridLayout,
}

impl ParameterGrid {
    /// The canonical grid: [`GridLayout::Periodic`].
    #[must_use]
    pub fn new(params: &StripParameters) -> Self {
        Self::with_layout(params, GridLayout::Periodic)
    }

    #[must_use]
    pub fn with_layout(params: &StripParameters, layout: GridLayout) -> Self {
        let (n_u, n_v) = (params.n_u(), params.n_v());
        let w = params.half_width();
        let v_span = 2.0 * w;

        let (u, du) = match layout {
            GridLayout::Periodic => {
                let du = TAU / n_u as f64;
                ((0..n_u).map(|i| i as f64 * du).collect(), du)
            }
            GridLayout::CellCenters => {
                let du = TAU / n_u as f64;
                ((0..n_u).map(|i| (i as f64 + 0.5) * du).collect(), du)
            }
            GridLayout::Nodes => nodes(0.0, TAU, n_u),
        };

        let (v, dv) = match layout {
            GridLayout::Periodic | GridLayout::Nodes => nodes(-w, w, n_v),
            GridLayout::CellCenters => {
                let dv = v_span / n_v as f64;
                ((0..n_v).map(|j| -w + (j as f64 + 0.5) * dv).collect(), dv)
            }
        };

        Self {
            u,
            v,
            du,
            dv,
            layout,
        }
    }

    #[must_use]
    pub fn n_u(&self) -> usize {
        self.u.len()
    }

    #[must_use]
    pub fn n_v(&self) -> usize {
        self.v.len()
    }

    /// Iterates `(u, v)` pairs in row-major order by `v`.
    pub fn pairs(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.v
            .iter()
            .flat_map(move |&v| self.u.iter().map(move |&u| (u, v)))
    }
}

/// `count` evenly spaced values over `[start, end]`, endpoints included.
fn nodes(start: f64, end: f64, count: usize) -> (Vec<f64>, f64) {
    let step = (end - start) / (count - 1) as f64;
    let mut values: Vec<f64> = (0..count).map(|i| start + i as f64 * step).collect();
    // Pin the last node to the range end; `start + (count-1)*step` can drift.
    if let Some(last) = values.last_mut() {
        *last = end;
    }
    (values, step)
}

/// Points of a surface sampled on a [`ParameterGrid`], `n_u × n_v`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SurfaceGrid {
    pub points: Vec<Point3>,
    pub n_u: usize,
    pub n_v: usize,
}

impl SurfaceGrid {
    #[must_use]
    pub fn sample(surface: &impl Surface, grid: &ParameterGrid) -> Self {
        let points = grid.pairs().map(|(u, v)| surface.point_at(u, v)).collect();
        Self {
            points,
            n_u: grid.n_u(),
            n_v: grid.n_v(),
        }
    }

    /// Point at column `i_u`, row `i_v`.
    #[must_use]
    pub fn point(&self, i_u: usize, i_v: usize) -> Option<Point3> {
        if i_u >= self.n_u || i_v >= self.n_v {
            return None;
        }
        self.points.get(i_v * self.n_u + i_u).copied()
    }

    /// One slice per `v` row, each `n_u` long.
    pub fn rows(&self) -> impl Iterator<Item = &[Point3]> {
        self.points.chunks_exact(self.n_u)
    }

    #[must_use]
    pub fn bounds(&self) -> Option<BBox> {
        BBox::from_points(&self.points)
    }

    /// Flat `[x0, y0, z0, x1, ...]` buffer for renderers.
    #[must_use]
    pub fn positions_flat(&self) -> Vec<f64> {
        self.points.iter().flat_map(|p| p.to_array()).collect()
    }
}
