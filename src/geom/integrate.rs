//! Surface-area integration over the parameter domain.
//!
//! The area is the double integral of the area element
//! `‖∂P/∂u × ∂P/∂v‖` over `[0, 2π] × [-w, w]`, evaluated as a weighted sum
//! over a grid whose layout depends on the [`IntegrationRule`].
//!
//! Rows of constant `u` are independent. With the `parallel` feature they
//! are evaluated on the rayon pool; row sums are still combined in index
//! order, so both paths return bit-identical results.

use serde::Serialize;

use super::grid::{GridLayout, ParameterGrid};
use super::params::StripParameters;
use super::surface::{DerivativeMode, PartialDerivatives, Surface, central_difference_derivatives};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum IntegrationRule {
    /// Midpoint rule on cell centers, `Δu = 2π/n_u`, `Δv = 2w/n_v`.
    #[default]
    Midpoint,
    /// Composite Simpson on closed node sets. An odd interval count closes
    /// with a 3/8 panel; a single interval degrades to the trapezoid rule.
    Simpson,
}

impl IntegrationRule {
    #[must_use]
    pub const fn layout(self) -> GridLayout {
        match self {
            Self::Midpoint => GridLayout::CellCenters,
            Self::Simpson => GridLayout::Nodes,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AreaEstimate {
    pub area: f64,
    pub rule: IntegrationRule,
    /// Derivative mode that was actually in effect.
    pub derivatives: DerivativeMode,
    /// Grid points where a finite difference was unusable and the analytic
    /// derivative was used instead.
    pub derivative_fallbacks: usize,
    pub warnings: Vec<String>,
}

pub struct SurfaceIntegrator<'a, S: Surface + Sync + ?Sized> {
    surface: &'a S,
    rule: IntegrationRule,
    derivatives: DerivativeMode,
}

impl<'a, S: Surface + Sync + ?Sized> SurfaceIntegrator<'a, S> {
    #[must_use]
    pub fn new(surface: &'a S) -> Self {
        Self {
            surface,
            rule: IntegrationRule::default(),
            derivatives: DerivativeMode::default(),
        }
    }

    #[must_use]
    pub fn with_rule(mut self, rule: IntegrationRule) -> Self {
        self.rule = rule;
        self
    }

    #[must_use]
    pub fn with_derivatives(mut self, derivatives: DerivativeMode) -> Self {
        self.derivatives = derivatives;
        self
    }

    /// Integrates on the grid the rule calls for at the resolution of `params`.
    #[must_use]
    pub fn integrate(&self, params: &StripParameters) -> AreaEstimate {
        let grid = ParameterGrid::with_layout(params, self.rule.layout());
        self.integrate_on(&grid)
    }

    /// Integrates on a prebuilt grid. Node weights follow the grid layout:
    /// uniform `du·dv` for cell centers, Simpson weights for closed node
    /// sets. A periodic grid is closed only in `v`, so it takes the trapezoid
    /// rule there and the rectangle rule around the `u` period.
    #[must_use]
    pub fn integrate_on(&self, grid: &ParameterGrid) -> AreaEstimate {
        let mut warnings = Vec::new();

        let derivatives = if self.derivatives.is_usable() {
            self.derivatives
        } else {
            let message = format!(
                "unusable finite-difference step in {:?}; using analytic derivatives",
                self.derivatives
            );
            log::warn!("{message}");
            warnings.push(message);
            DerivativeMode::Analytic
        };

        let (u_weights, v_weights) = match grid.layout {
            GridLayout::Nodes => (
                simpson_weights(grid.n_u(), grid.du),
                simpson_weights(grid.n_v(), grid.dv),
            ),
            GridLayout::Periodic => (
                vec![grid.du; grid.n_u()],
                trapezoid_weights(grid.n_v(), grid.dv),
            ),
            GridLayout::CellCenters => (vec![grid.du; grid.n_u()], vec![grid.dv; grid.n_v()]),
        };

        let row = |i: usize| -> (f64, usize) {
            let u = grid.u[i];
            let mut sum = 0.0;
            let mut fallbacks = 0;
            for (&v, &weight) in grid.v.iter().zip(&v_weights) {
                let (partials, fell_back) = self.derivatives_at(derivatives, u, v);
                fallbacks += usize::from(fell_back);
                sum += weight * partials.area_element();
            }
            (sum, fallbacks)
        };

        #[cfg(feature = "parallel")]
        let rows: Vec<(f64, usize)> = (0..grid.n_u()).into_par_iter().map(row).collect();
        #[cfg(not(feature = "parallel"))]
        let rows: Vec<(f64, usize)> = (0..grid.n_u()).map(row).collect();

        let mut area = 0.0;
        let mut derivative_fallbacks = 0;
        for ((row_sum, fallbacks), weight) in rows.into_iter().zip(&u_weights) {
            area += weight * row_sum;
            derivative_fallbacks += fallbacks;
        }

        if derivative_fallbacks > 0 {
            let message = format!(
                "finite differences were not finite at {derivative_fallbacks} grid points; analytic derivatives used there"
            );
            log::warn!("{message}");
            warnings.push(message);
        }

        log::debug!(
            "area {area} ({:?}, {}x{} samples)",
            self.rule,
            grid.n_u(),
            grid.n_v()
        );

        AreaEstimate {
            area,
            rule: self.rule,
            derivatives,
            derivative_fallbacks,
            warnings,
        }
    }

    fn derivatives_at(&self, mode: DerivativeMode, u: f64, v: f64) -> (PartialDerivatives, bool) {
        match mode {
            DerivativeMode::Analytic => (self.surface.partial_derivatives_at(u, v), false),
            DerivativeMode::CentralDifference { relative_step } => {
                match central_difference_derivatives(self.surface, u, v, relative_step) {
                    Some(partials) => (partials, false),
                    None => (self.surface.partial_derivatives_at(u, v), true),
                }
            }
        }
    }
}

/// Trapezoid weights for `count` equally spaced nodes `step` apart: the two
/// end nodes carry half a step.
#[must_use]
pub fn trapezoid_weights(count: usize, step: f64) -> Vec<f64> {
    let mut weights = vec![step; count];
    if count < 2 {
        weights.fill(0.0);
        return weights;
    }
    weights[0] = 0.5 * step;
    weights[count - 1] = 0.5 * step;
    weights
}

/// Composite quadrature weights for `count` equally spaced nodes `step` apart.
///
/// Simpson 1/3 over an even number of intervals; with an odd count of at
/// least three the last three intervals use Simpson 3/8. One interval falls
/// back to the trapezoid rule.
#[must_use]
pub fn simpson_weights(count: usize, step: f64) -> Vec<f64> {
    let mut weights = vec![0.0; count];
    let intervals = count.saturating_sub(1);
    if intervals == 0 {
        return weights;
    }
    if intervals == 1 {
        weights[0] = 0.5 * step;
        weights[1] = 0.5 * step;
        return weights;
    }

    let simpson_intervals = if intervals % 2 == 0 {
        intervals
    } else {
        intervals - 3
    };

    let third = step / 3.0;
    for k in (0..simpson_intervals).step_by(2) {
        weights[k] += third;
        weights[k + 1] += 4.0 * third;
        weights[k + 2] += third;
    }

    if intervals % 2 == 1 {
        let eighth = 3.0 * step / 8.0;
        let start = simpson_intervals;
        weights[start] += eighth;
        weights[start + 1] += 3.0 * eighth;
        weights[start + 2] += 3.0 * eighth;
        weights[start + 3] += eighth;
    }

    weights
}
