//! Diagnostics collected during one strip computation.
//!
//! The two scalar results never depend on anything recorded here; this is
//! for logging, the CLI `--diagnostics` flag, and the wasm renderer.
//!
//! ```ignore
//! let props = MobiusStrip::new(params).compute()?;
//! if props.diagnostics.has_warnings() {
//!     for warning in &props.diagnostics.warnings {
//!         eprintln!("warning: {warning}");
//!     }
//! }
//! ```

use std::fmt;

use serde::Serialize;

use super::edge::EdgeSampling;
use super::integrate::IntegrationRule;
use super::metrics::GeomTimingReport;
use super::surface::DerivativeMode;

#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct StripDiagnostics {
    /// Quadrature samples along `u` and `v`.
    pub area_samples: (usize, usize),

    pub integration_rule: IntegrationRule,

    /// Derivative mode in effect after any run-wide fallback.
    pub derivative_mode: DerivativeMode,

    /// Grid points where a finite difference was replaced by the analytic
    /// derivative.
    pub derivative_fallbacks: usize,

    pub edge_samples: usize,

    pub edge_sampling: EdgeSampling,

    /// Sum of triangle areas of the strip mesh, when the mesh cross-check ran.
    pub mesh_area: Option<f64>,

    /// Only populated with the `metrics` feature on native targets.
    pub timing: Option<GeomTimingReport>,

    /// Human-readable notes about numerical fallbacks and unusual inputs.
    pub warnings: Vec<String>,
}

impl StripDiagnostics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// True when no fallback happened and nothing was worth warning about.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.derivative_fallbacks == 0 && self.warnings.is_empty()
    }

    #[must_use]
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    pub fn add_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    /// One-line summary for logs: `"area:{rule} {n_u}x{n_v} edge:{samples} [issues...]"`.
    #[must_use]
    pub fn summary(&self) -> String {
        let mut parts = vec![format!(
            "area:{:?} {}x{} edge:{}",
            self.integration_rule, self.area_samples.0, self.area_samples.1, self.edge_samples
        )];
        if let DerivativeMode::CentralDifference { relative_step } = self.derivative_mode {
            parts.push(format!("fd:{relative_step:e}"));
        }
        if self.derivative_fallbacks > 0 {
            parts.push(format!("fallbacks:{}", self.derivative_fallbacks));
        }
        if self.edge_sampling == EdgeSampling::HalfTraversal {
            parts.push("half-edge".to_string());
        }
        if !self.warnings.is_empty() {
            parts.push(format!("warnings:{}", self.warnings.len()));
        }
        parts.join(" ")
    }
}

impl fmt::Display for StripDiagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Strip Diagnostics:")?;
        writeln!(
            f,
            "  Area: {:?} rule on {}x{} samples",
            self.integration_rule, self.area_samples.0, self.area_samples.1
        )?;
        match self.derivative_mode {
            DerivativeMode::Analytic => writeln!(f, "  Derivatives: analytic")?,
            DerivativeMode::CentralDifference { relative_step } => writeln!(
                f,
                "  Derivatives: central difference (relative step {relative_step:e})"
            )?,
        }
        if self.derivative_fallbacks > 0 {
            writeln!(f, "    - Analytic fallbacks: {}", self.derivative_fallbacks)?;
        }
        let edge = match self.edge_sampling {
            EdgeSampling::ClosedLoop => "closed 4π loop",
            EdgeSampling::HalfTraversal => "half traversal (half of the edge)",
        };
        writeln!(f, "  Edge: {} samples, {edge}", self.edge_samples)?;
        if let Some(mesh_area) = self.mesh_area {
            writeln!(f, "  Mesh area: {mesh_area:.6}")?;
        }

        if !self.warnings.is_empty() {
            writeln!(f, "  Warnings:")?;
            for warning in &self.warnings {
                writeln!(f, "    - {warning}")?;
            }
        }

        if let Some(ref timing) = self.timing {
            writeln!(f, "  Timing: {} ms total", timing.total_ms())?;
        }

        let status = if self.is_clean() { "CLEAN" } else { "FALLBACKS USED" };
        writeln!(f, "  Status: {status}")
    }
}
