//! mobius_cli: surface area and edge length of a Mobius strip.
//!
//! Prints the two-line report on stdout. Logs go to stderr and are
//! controlled with `RUST_LOG`, e.g. `RUST_LOG=mobius_engine=debug`.
//!
//! ```bash
//! mobius_cli --radius 1 --width 0.3 --nu 200 --nv 20
//! mobius_cli --half-width 0.15 --rule simpson --diagnostics --obj strip.obj
//! ```

#[cfg(target_arch = "wasm32")]
fn main() {}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    if let Err(err) = native::run() {
        eprintln!("mobius_cli error: {err}");
        for cause in err.chain().skip(1) {
            eprintln!("  caused by: {cause}");
        }
        std::process::exit(1);
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::fs::{self, File};
    use std::io::BufWriter;
    use std::path::{Path, PathBuf};

    use anyhow::{Context, Result, bail};
    use clap::{Parser, ValueEnum};
    use tracing_subscriber::EnvFilter;

    use mobius_engine::geom::Tolerance;
    use mobius_engine::{
        ComputeOptions, DerivativeMode, EdgeSampling, GeomMesh, IntegrationRule, MobiusStrip,
        StripParameters,
    };

    /// Surface area and edge length of a Mobius strip.
    #[derive(Parser, Debug)]
    #[command(name = "mobius_cli")]
    #[command(version, about, long_about = None)]
    struct Cli {
        /// Centerline radius R
        #[arg(long, default_value_t = StripParameters::DEFAULT_RADIUS)]
        radius: f64,

        /// Half-width w of the strip (v ranges over [-w, w])
        #[arg(long, conflicts_with = "width")]
        half_width: Option<f64>,

        /// Total width of the strip, 2w [default: 0.3]
        #[arg(long)]
        width: Option<f64>,

        /// Samples along u
        #[arg(long, default_value_t = StripParameters::DEFAULT_RESOLUTION)]
        nu: usize,

        /// Samples along v
        #[arg(long, default_value_t = StripParameters::DEFAULT_RESOLUTION)]
        nv: usize,

        /// Area quadrature rule
        #[arg(long, value_enum, default_value = "midpoint")]
        rule: Rule,

        /// Which part of the edge to measure
        #[arg(long, value_enum, default_value = "closed-loop")]
        edge_sampling: Sampling,

        /// Boundary samples [default: 2·nu for the closed loop]
        #[arg(long)]
        edge_samples: Option<usize>,

        /// Use central differences with this step, relative to the domain span
        #[arg(long, value_name = "STEP", num_args = 0..=1,
              default_missing_value = "1e-5")]
        finite_difference: Option<f64>,

        /// Write the strip mesh as Wavefront OBJ
        #[arg(long, value_name = "PATH")]
        obj: Option<PathBuf>,

        /// Overwrite an existing OBJ file
        #[arg(long)]
        overwrite: bool,

        /// Print diagnostics on stderr, including the mesh area cross-check
        #[arg(long)]
        diagnostics: bool,
    }

    #[derive(Clone, Copy, Debug, ValueEnum)]
    enum Rule {
        /// Midpoint rule on cell centers
        Midpoint,
        /// Composite Simpson on grid nodes
        Simpson,
    }

    impl From<Rule> for IntegrationRule {
        fn from(rule: Rule) -> Self {
            match rule {
                Rule::Midpoint => Self::Midpoint,
                Rule::Simpson => Self::Simpson,
            }
        }
    }

    #[derive(Clone, Copy, Debug, ValueEnum)]
    enum Sampling {
        /// The full edge, u in [0, 4π)
        ClosedLoop,
        /// One traversal, u in [0, 2π]: half of the edge
        HalfTraversal,
    }

    impl From<Sampling> for EdgeSampling {
        fn from(sampling: Sampling) -> Self {
            match sampling {
                Sampling::ClosedLoop => Self::ClosedLoop,
                Sampling::HalfTraversal => Self::HalfTraversal,
            }
        }
    }

    impl Cli {
        fn parameters(&self) -> Result<StripParameters> {
            let half_width = match (self.half_width, self.width) {
                (Some(half_width), _) => half_width,
                (None, Some(width)) => 0.5 * width,
                (None, None) => StripParameters::default().half_width(),
            };
            StripParameters::new(self.radius, half_width, self.nu, self.nv)
                .context("invalid strip configuration")
        }

        fn options(&self) -> ComputeOptions {
            let derivatives = self.finite_difference.map_or(DerivativeMode::Analytic, |step| {
                DerivativeMode::CentralDifference {
                    relative_step: step,
                }
            });
            ComputeOptions {
                rule: self.rule.into(),
                derivatives,
                edge_sampling: self.edge_sampling.into(),
                edge_samples: self.edge_samples,
                mesh_check: self.diagnostics,
            }
        }
    }

    fn init_tracing() {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
        // `init` also installs the `log` bridge, so library records reach stderr.
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .compact()
            .init();
    }

    pub fn run() -> Result<()> {
        let cli = Cli::parse();
        init_tracing();

        let params = cli.parameters()?;
        let strip = MobiusStrip::with_options(params, cli.options());
        let properties = strip.compute().context("strip computation failed")?;

        println!("{properties}");

        if cli.diagnostics {
            eprint!("{}", properties.diagnostics);
            if let Some(mesh_area) = properties.diagnostics.mesh_area {
                let gap = (mesh_area - properties.surface_area).abs();
                if !Tolerance::new(1e-2).approx_eq_relative(mesh_area, properties.surface_area) {
                    eprintln!("  mesh area differs from the integral by {gap:.3e}; refine the grid");
                }
            }
        }

        if let Some(path) = cli.obj.as_deref() {
            let (mesh, topology) = strip.mesh()?;
            write_obj_file(path, &mesh, cli.overwrite)?;
            eprintln!(
                "wrote {} (V:{} T:{} boundary loops:{})",
                path.display(),
                mesh.vertex_count(),
                mesh.triangle_count(),
                topology.boundary_loop_count
            );
        }

        Ok(())
    }

    fn write_obj_file(path: &Path, mesh: &GeomMesh, overwrite: bool) -> Result<()> {
        if path.exists() && !overwrite {
            bail!(
                "refusing to overwrite existing file {} (use --overwrite)",
                path.display()
            );
        }
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("create dir {}", parent.display()))?;
        }

        let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
        let mut w = BufWriter::new(file);
        mesh.write_obj(&mut w, "mobius_strip")
            .with_context(|| format!("write {}", path.display()))
    }
}
