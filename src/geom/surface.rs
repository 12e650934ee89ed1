use std::f64::consts::TAU;

use serde::Serialize;

use super::core::{Point3, Tolerance, Vec3};
use super::params::StripParameters;

/// First partial derivatives `∂P/∂u` and `∂P/∂v` at one parameter pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PartialDerivatives {
    pub du: Vec3,
    pub dv: Vec3,
}

impl PartialDerivatives {
    #[must_use]
    pub const fn new(du: Vec3, dv: Vec3) -> Self {
        Self { du, dv }
    }

    /// Local area scaling `‖∂P/∂u × ∂P/∂v‖`.
    #[must_use]
    pub fn area_element(&self) -> f64 {
        self.du.cross(self.dv).length()
    }

    #[must_use]
    pub fn normal(&self) -> Option<Vec3> {
        self.du.cross(self.dv).normalized()
    }

    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.du.is_finite() && self.dv.is_finite()
    }
}

/// How partial derivatives are obtained while integrating.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub enum DerivativeMode {
    /// Closed-form derivatives supplied by the surface.
    #[default]
    Analytic,
    /// Central differences with step `relative_step * domain_span` per axis.
    /// Truncation error is `O(h²)`.
    CentralDifference { relative_step: f64 },
}

impl DerivativeMode {
    /// Central differences at the default relative step.
    #[must_use]
    pub const fn central_difference() -> Self {
        Self::CentralDifference {
            relative_step: Tolerance::DERIVATIVE.eps,
        }
    }

    /// Returns false for a central-difference step that cannot produce a
    /// usable quotient (non-finite, zero or negative).
    #[must_use]
    pub fn is_usable(&self) -> bool {
        match *self {
            Self::Analytic => true,
            Self::CentralDifference { relative_step } => {
                relative_step.is_finite() && relative_step > 0.0
            }
        }
    }
}

pub trait Surface {
    fn point_at(&self, u: f64, v: f64) -> Point3;

    #[must_use]
    fn domain_u(&self) -> (f64, f64) {
        (0.0, 1.0)
    }

    #[must_use]
    fn domain_v(&self) -> (f64, f64) {
        (0.0, 1.0)
    }

    /// Partial derivatives at `(u, v)`.
    ///
    /// The default uses central differences at [`Tolerance::DERIVATIVE`]
    /// relative to each domain span and falls back to zero vectors when the
    /// quotient is not finite. Surfaces with closed-form derivatives should
    /// override this.
    #[must_use]
    fn partial_derivatives_at(&self, u: f64, v: f64) -> PartialDerivatives {
        central_difference_derivatives(self, u, v, Tolerance::DERIVATIVE.eps)
            .unwrap_or(PartialDerivatives::new(Vec3::ZERO, Vec3::ZERO))
    }

    #[must_use]
    fn normal_at(&self, u: f64, v: f64) -> Option<Vec3> {
        self.partial_derivatives_at(u, v).normal()
    }

    #[must_use]
    fn area_element_at(&self, u: f64, v: f64) -> f64 {
        self.partial_derivatives_at(u, v).area_element()
    }
}

/// Central-difference partial derivatives with steps
/// `h = relative_step * domain_span` on each axis.
///
/// The surface is evaluated at `u ± h` and `v ± h`, so it must be defined a
/// little outside its nominal domain. Returns `None` when the step is not
/// usable or any quotient is not finite.
pub fn central_difference_derivatives<S: Surface + ?Sized>(
    surface: &S,
    u: f64,
    v: f64,
    relative_step: f64,
) -> Option<PartialDerivatives> {
    if !relative_step.is_finite() || relative_step <= 0.0 {
        return None;
    }

    let (u0, u1) = surface.domain_u();
    let (v0, v1) = surface.domain_v();
    let step = Tolerance::new(relative_step);
    let h_u = step.relative_to(u1 - u0);
    let h_v = step.relative_to(v1 - v0);
    if !(h_u.is_finite() && h_u > 0.0 && h_v.is_finite() && h_v > 0.0) {
        return None;
    }

    let du = surface
        .point_at(u + h_u, v)
        .sub_point(surface.point_at(u - h_u, v))
        .mul_scalar(0.5 / h_u);
    let dv = surface
        .point_at(u, v + h_v)
        .sub_point(surface.point_at(u, v - h_v))
        .mul_scalar(0.5 / h_v);

    let derivatives = PartialDerivatives::new(du, dv);
    derivatives.is_finite().then_some(derivatives)
}

/// Half-twist Mobius strip:
///
/// ```text
/// x(u, v) = (R + v cos(u/2)) cos(u)
/// y(u, v) = (R + v cos(u/2)) sin(u)
/// z(u, v) = v sin(u/2)
/// ```
///
/// with `u ∈ [0, 2π)` and `v ∈ [-w, w]`. Evaluation is defined for every
/// real `u` (period `4π`) and `v`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MobiusSurface {
    pub radius: f64,
    pub half_width: f64,
}

impl MobiusSurface {
    #[must_use]
    pub fn from_params(params: &StripParameters) -> Self {
        Self {
            radius: params.radius(),
            half_width: params.half_width(),
        }
    }

    /// Point on the centerline circle (`v = 0`).
    #[must_use]
    pub fn centerline_point_at(&self, u: f64) -> Point3 {
        self.point_at(u, 0.0)
    }

    /// Closed-form area element `sqrt((R + v cos(u/2))² + v²/4)`.
    #[must_use]
    pub fn exact_area_element(&self, u: f64, v: f64) -> f64 {
        let ring = self.radius + v * (0.5 * u).cos();
        (ring * ring + 0.25 * v * v).sqrt()
    }
}

impl Surface for MobiusSurface {
    fn point_at(&self, u: f64, v: f64) -> Point3 {
        let (sin_half, cos_half) = (0.5 * u).sin_cos();
        let (sin_u, cos_u) = u.sin_cos();
        let ring = self.radius + v * cos_half;
        Point3::new(ring * cos_u, ring * sin_u, v * sin_half)
    }

    fn domain_u(&self) -> (f64, f64) {
        (0.0, TAU)
    }

    fn domain_v(&self) -> (f64, f64) {
        (-self.half_width, self.half_width)
    }

    fn partial_derivatives_at(&self, u: f64, v: f64) -> PartialDerivatives {
        let (sin_half, cos_half) = (0.5 * u).sin_cos();
        let (sin_u, cos_u) = u.sin_cos();
        let ring = self.radius + v * cos_half;
        let twist = 0.5 * v * sin_half;

        let du = Vec3::new(
            -twist * cos_u - ring * sin_u,
            -twist * sin_u + ring * cos_u,
            0.5 * v * cos_half,
        );
        let dv = Vec3::new(cos_half * cos_u, cos_half * sin_u, sin_half);
        PartialDerivatives::new(du, dv)
    }
}
