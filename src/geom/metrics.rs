//! Opt-in timing hooks for the strip pipeline.
//!
//! Timing is only collected when the `metrics` feature is enabled and the
//! target is not WASM (`std::time::Instant` is unavailable there). Otherwise
//! every call compiles down to running the closure.
//!
//! ```ignore
//! let mut metrics = GeomMetrics::default();
//! metrics.begin();
//! let area = metrics.time(TimingBucket::AreaIntegration, || integrator.integrate(&params));
//! if let Some(report) = metrics.end() {
//!     println!("area: {} ns", report.area_integration_ns);
//! }
//! ```

use serde::Serialize;

/// Pipeline stages that accumulate time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimingBucket {
    /// Parameter grid construction and point sampling.
    Grid,
    /// Surface-area quadrature.
    AreaIntegration,
    /// Boundary sampling and arc-length summation.
    EdgeLength,
    /// Triangulation of the point grid and mesh topology checks.
    Meshing,
}

/// Cumulative nanoseconds per bucket.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct GeomTimingReport {
    pub grid_ns: u64,
    pub area_integration_ns: u64,
    pub edge_length_ns: u64,
    pub meshing_ns: u64,
}

impl GeomTimingReport {
    #[must_use]
    pub fn total_ns(&self) -> u64 {
        self.grid_ns
            .saturating_add(self.area_integration_ns)
            .saturating_add(self.edge_length_ns)
            .saturating_add(self.meshing_ns)
    }

    #[must_use]
    pub fn total_ms(&self) -> f64 {
        self.total_ns() as f64 / 1_000_000.0
    }
}

/// Accumulator for timing pipeline stages.
///
/// When the `metrics` feature is disabled (or on WASM), all methods are
/// no-ops and [`end`](Self::end) returns `None`.
#[derive(Debug, Default)]
pub struct GeomMetrics {
    #[cfg(all(feature = "metrics", not(target_arch = "wasm32")))]
    report: GeomTimingReport,
}

impl GeomMetrics {
    /// Resets all counters.
    pub fn begin(&mut self) {
        #[cfg(all(feature = "metrics", not(target_arch = "wasm32")))]
        {
            self.report = GeomTimingReport::default();
        }
    }

    #[must_use]
    pub fn end(&self) -> Option<GeomTimingReport> {
        #[cfg(all(feature = "metrics", not(target_arch = "wasm32")))]
        {
            Some(self.report.clone())
        }
        #[cfg(not(all(feature = "metrics", not(target_arch = "wasm32"))))]
        {
            None
        }
    }

    /// Runs `f` and adds its elapsed time to `bucket`.
    pub fn time<R>(&mut self, bucket: TimingBucket, f: impl FnOnce() -> R) -> R {
        #[cfg(all(feature = "metrics", not(target_arch = "wasm32")))]
        {
            let start = std::time::Instant::now();
            let result = f();
            let nanos = start.elapsed().as_nanos().min(u128::from(u64::MAX)) as u64;
            let slot = match bucket {
                TimingBucket::Grid => &mut self.report.grid_ns,
                TimingBucket::AreaIntegration => &mut self.report.area_integration_ns,
                TimingBucket::EdgeLength => &mut self.report.edge_length_ns,
                TimingBucket::Meshing => &mut self.report.meshing_ns,
            };
            *slot = slot.saturating_add(nanos);
            result
        }

        #[cfg(not(all(feature = "metrics", not(target_arch = "wasm32"))))]
        {
            let _ = bucket;
            f()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timing_report_total() {
        let report = GeomTimingReport {
            grid_ns: 1000,
            area_integration_ns: 2000,
            edge_length_ns: 500,
            meshing_ns: 0,
        };
        assert_eq!(report.total_ns(), 3500);
        assert!((report.total_ms() - 0.0035).abs() < 1e-12);
    }

    #[test]
    fn test_time_returns_closure_value() {
        let mut metrics = GeomMetrics::default();
        metrics.begin();
        let value = metrics.time(TimingBucket::EdgeLength, || 42);
        assert_eq!(value, 42);

        #[cfg(all(feature = "metrics", not(target_arch = "wasm32")))]
        assert!(metrics.end().is_some());
        #[cfg(not(all(feature = "metrics", not(target_arch = "wasm32"))))]
        assert!(metrics.end().is_none());
    }

    #[test]
    fn test_saturating_total() {
        let report = GeomTimingReport {
            grid_ns: u64::MAX,
            area_integration_ns: 1,
            ..GeomTimingReport::default()
        };
        assert_eq!(report.total_ns(), u64::MAX);
    }
}
