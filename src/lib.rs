#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod geom;
pub mod strip;

use std::fmt;

use serde::Serialize;
#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsError;
use wasm_bindgen::prelude::*;

pub use geom::{
    DerivativeMode, EdgeSampling, GeomMesh, IntegrationRule, MeshTopology, StripDiagnostics,
    StripError, StripParameters, StripResult, SurfaceGrid,
};
pub use strip::{ComputeOptions, MobiusStrip, StripProperties, compute_strip};

cfg_if::cfg_if! {
    if #[cfg(all(feature = "console_error_panic_hook", target_arch = "wasm32"))] {
        #[wasm_bindgen(start)]
        pub fn initialize() {
            console_error_panic_hook::set_once();
            init_logger();
        }
    } else {
        #[wasm_bindgen(start)]
        pub fn initialize() {
            init_logger();
        }
    }
}

#[cfg(feature = "debug_logs")]
fn init_logger() {
    use log::LevelFilter;
    use wasm_bindgen_console_logger::DEFAULT_LOGGER;
    // A host that already installed a logger keeps it.
    if log::set_logger(&DEFAULT_LOGGER).is_ok() {
        log::set_max_level(LevelFilter::Debug);
    }
}

#[cfg(not(feature = "debug_logs"))]
fn init_logger() {}

#[cfg(all(feature = "parallel", target_arch = "wasm32"))]
#[wasm_bindgen]
pub async fn initialize_parallel(worker_count: Option<u32>) -> Result<(), JsError> {
    let threads = worker_count
        .map(|count| count.max(1) as usize)
        .or_else(|| {
            std::thread::available_parallelism()
                .map(|value| value.get())
                .ok()
        })
        .unwrap_or(1);

    wasm_bindgen_rayon::init_thread_pool(threads)
        .await
        .map_err(|err| JsError::new(&format!("could not start the rayon thread pool: {err}")))
}

#[derive(Debug, Serialize)]
struct GridExport<'a> {
    n_u: usize,
    n_v: usize,
    positions: &'a [f64],
}

#[derive(Debug, Serialize)]
struct MeshExport<'a> {
    positions: &'a [f64],
    indices: &'a [u32],
    #[serde(skip_serializing_if = "Option::is_none")]
    normals: Option<&'a [f64]>,
    topology: MeshTopology,
}

/// Handle for a JS renderer: holds the strip configuration and the last
/// computed properties.
#[wasm_bindgen]
pub struct Engine {
    strip: MobiusStrip,
    last_result: Option<StripProperties>,
}

#[wasm_bindgen]
impl Engine {
    /// Creates an engine for a strip of `radius` and half-width `half_width`
    /// sampled on an `n_u × n_v` grid.
    #[wasm_bindgen(constructor)]
    pub fn new(radius: f64, half_width: f64, n_u: usize, n_v: usize) -> Result<Engine, JsValue> {
        let params = StripParameters::new(radius, half_width, n_u, n_v).map_err(to_js_error)?;
        Ok(Engine {
            strip: MobiusStrip::new(params),
            last_result: None,
        })
    }

    /// Replaces the strip parameters. The engine is unchanged on error.
    #[wasm_bindgen]
    pub fn set_parameters(
        &mut self,
        radius: f64,
        half_width: f64,
        n_u: usize,
        n_v: usize,
    ) -> Result<(), JsValue> {
        let params = StripParameters::new(radius, half_width, n_u, n_v).map_err(to_js_error)?;
        self.strip = MobiusStrip::with_options(params, *self.strip.options());
        self.last_result = None;
        Ok(())
    }

    /// Selects the quadrature rule: `"midpoint"` or `"simpson"`.
    #[wasm_bindgen]
    pub fn set_integration_rule(&mut self, rule: &str) -> Result<(), JsValue> {
        let rule = match rule.trim().to_lowercase().as_str() {
            "midpoint" => IntegrationRule::Midpoint,
            "simpson" => IntegrationRule::Simpson,
            other => return Err(js_error(&format!("unknown integration rule `{other}`"))),
        };
        let options = ComputeOptions {
            rule,
            ..*self.strip.options()
        };
        self.strip = MobiusStrip::with_options(*self.strip.params(), options);
        self.last_result = None;
        Ok(())
    }

    /// Computes surface area and edge length, returning the properties with
    /// their diagnostics.
    #[wasm_bindgen]
    pub fn compute(&mut self) -> Result<JsValue, JsValue> {
        let properties = match self.last_result.take() {
            Some(properties) => properties,
            None => self.strip.compute().map_err(to_js_error)?,
        };
        let value = serde_wasm_bindgen::to_value(&properties).map_err(to_js_error);
        self.last_result = Some(properties);
        value
    }

    /// Two-line report of the last computation, or an empty string before
    /// the first call to `compute`.
    #[wasm_bindgen]
    pub fn report(&self) -> String {
        self.last_result
            .as_ref()
            .map(StripProperties::report)
            .unwrap_or_default()
    }

    /// Point grid as `{ n_u, n_v, positions }`, positions flattened `xyz`.
    #[wasm_bindgen]
    pub fn get_surface_grid(&self) -> Result<JsValue, JsValue> {
        let grid = self.strip.surface_grid();
        let positions = grid.positions_flat();
        serde_wasm_bindgen::to_value(&GridExport {
            n_u: grid.n_u,
            n_v: grid.n_v,
            positions: &positions,
        })
        .map_err(to_js_error)
    }

    /// Triangle mesh as flat `positions`, `indices` and `normals` buffers.
    #[wasm_bindgen]
    pub fn get_mesh(&self) -> Result<JsValue, JsValue> {
        let (mesh, topology) = self.strip.mesh().map_err(to_js_error)?;
        serde_wasm_bindgen::to_value(&MeshExport {
            positions: mesh.positions_flat(),
            indices: &mesh.indices,
            normals: mesh.normals_flat(),
            topology,
        })
        .map_err(to_js_error)
    }
}

fn to_js_error<E: fmt::Display>(error: E) -> JsValue {
    js_error(&error.to_string())
}

fn js_error(message: &str) -> JsValue {
    #[cfg(target_arch = "wasm32")]
    {
        JsError::new(message).into()
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = message;
        JsValue::NULL
    }
}
