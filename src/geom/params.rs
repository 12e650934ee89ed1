//! Strip configuration and its validation.
//!
//! [`StripParameters`] is the single immutable input of a computation run.
//! Every constructor validates, so a value of this type always satisfies
//! `R > 0`, `w > 0`, `n_u >= 2` and `n_v >= 2` with finite reals.

use std::fmt;

use serde::Serialize;

pub type StripResult<T> = Result<T, StripError>;

/// Parametric axis named in resolution errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GridAxis {
    U,
    V,
}

impl fmt::Display for GridAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::U => f.write_str("u"),
            Self::V => f.write_str("v"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StripError {
    #[error("radius must be finite and > 0 (got {0})")]
    InvalidRadius(f64),
    #[error("half-width must be finite and > 0 (got {0})")]
    InvalidHalfWidth(f64),
    #[error("{axis} resolution must be at least {min} samples (got {count})")]
    InvalidResolution {
        axis: GridAxis,
        count: usize,
        min: usize,
    },
    #[error("edge sampling requires at least {min} samples (got {count})")]
    InvalidEdgeSamples { count: usize, min: usize },
    #[error("mesh validation failed: {0}")]
    Mesh(String),
}

impl StripError {
    /// True for every error raised while validating a configuration, before
    /// any grid is built.
    #[must_use]
    pub const fn is_invalid_configuration(&self) -> bool {
        matches!(
            self,
            Self::InvalidRadius(_)
                | Self::InvalidHalfWidth(_)
                | Self::InvalidResolution { .. }
                | Self::InvalidEdgeSamples { .. }
        )
    }
}

/// Smallest sample count accepted on either grid axis.
pub const MIN_RESOLUTION: usize = 2;

/// Radius, half-width and grid resolution of a Mobius strip.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StripParameters {
    radius: f64,
    half_width: f64,
    n_u: usize,
    n_v: usize,
}

impl StripParameters {
    pub const DEFAULT_RADIUS: f64 = 1.0;
    pub const DEFAULT_TOTAL_WIDTH: f64 = 0.3;
    pub const DEFAULT_RESOLUTION: usize = 200;

    /// Validating constructor. `half_width` is the distance from the
    /// centerline to either edge, so `v` ranges over `[-half_width, half_width]`.
    pub fn new(radius: f64, half_width: f64, n_u: usize, n_v: usize) -> StripResult<Self> {
        if !radius.is_finite() || radius <= 0.0 {
            return Err(StripError::InvalidRadius(radius));
        }
        if !half_width.is_finite() || half_width <= 0.0 {
            return Err(StripError::InvalidHalfWidth(half_width));
        }
        if n_u < MIN_RESOLUTION {
            return Err(StripError::InvalidResolution {
                axis: GridAxis::U,
                count: n_u,
                min: MIN_RESOLUTION,
            });
        }
        if n_v < MIN_RESOLUTION {
            return Err(StripError::InvalidResolution {
                axis: GridAxis::V,
                count: n_v,
                min: MIN_RESOLUTION,
            });
        }

        if half_width >= radius {
            log::warn!(
                "half-width {half_width} >= radius {radius}: the strip self-intersects near the axis"
            );
        }

        Ok(Self {
            radius,
            half_width,
            n_u,
            n_v,
        })
    }

    /// Builds parameters from the total strip width and a single resolution
    /// shared by both axes.
    pub fn from_total_width(radius: f64, width: f64, resolution: usize) -> StripResult<Self> {
        Self::new(radius, width * 0.5, resolution, resolution)
    }

    /// Returns a copy with a different half-width, re-validated.
    pub fn with_half_width(self, half_width: f64) -> StripResult<Self> {
        Self::new(self.radius, half_width, self.n_u, self.n_v)
    }

    /// Returns a copy with a different grid resolution, re-validated.
    pub fn with_resolution(self, n_u: usize, n_v: usize) -> StripResult<Self> {
        Self::new(self.radius, self.half_width, n_u, n_v)
    }

    #[must_use]
    pub const fn radius(&self) -> f64 {
        self.radius
    }

    #[must_use]
    pub const fn half_width(&self) -> f64 {
        self.half_width
    }

    #[must_use]
    pub fn total_width(&self) -> f64 {
        2.0 * self.half_width
    }

    #[must_use]
    pub const fn n_u(&self) -> usize {
        self.n_u
    }

    #[must_use]
    pub const fn n_v(&self) -> usize {
        self.n_v
    }
}

impl Default for StripParameters {
    fn default() -> Self {
        Self {
            radius: Self::DEFAULT_RADIUS,
            half_width: Self::DEFAULT_TOTAL_WIDTH * 0.5,
            n_u: Self::DEFAULT_RESOLUTION,
            n_v: Self::DEFAULT_RESOLUTION,
        }
    }
}

impl fmt::Display for StripParameters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "R={} w={} grid={}x{}",
            self.radius, self.half_width, self.n_u, self.n_v
        )
    }
}
