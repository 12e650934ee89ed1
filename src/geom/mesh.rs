use std::collections::HashMap;
use std::io::{self, Write};

use serde::Serialize;

use super::core::{Point3, Vec3};
use super::grid::{GridLayout, ParameterGrid, SurfaceGrid};
use super::params::{StripError, StripResult};
use super::surface::{MobiusSurface, Surface};

/// Triangle mesh of the sampled strip, handed to renderers and exporters.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct GeomMesh {
    pub positions: Vec<[f64; 3]>,
    pub indices: Vec<u32>,
    pub normals: Option<Vec<[f64; 3]>>,
}

/// Edge-incidence summary of a triangle mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct MeshTopology {
    /// Edges used by exactly one triangle.
    pub open_edge_count: usize,
    /// Edges used by more than two triangles.
    pub non_manifold_edge_count: usize,
    /// Connected chains formed by the open edges.
    pub boundary_loop_count: usize,
}

impl GeomMesh {
    #[must_use]
    pub fn new(positions: Vec<[f64; 3]>, indices: Vec<u32>) -> Self {
        Self {
            positions,
            indices,
            normals: None,
        }
    }

    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    #[must_use]
    pub fn has_invalid_vertices(&self) -> bool {
        self.positions
            .iter()
            .any(|p| !p[0].is_finite() || !p[1].is_finite() || !p[2].is_finite())
    }

    #[must_use]
    pub fn has_valid_indices(&self) -> bool {
        let n = self.positions.len();
        self.indices.iter().all(|&i| (i as usize) < n)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.indices.len() % 3 != 0 {
            return Err("mesh indices are not a triangle list (len % 3 != 0)".to_string());
        }
        if self.has_invalid_vertices() {
            return Err("mesh has invalid vertex coordinates (NaN/Inf)".to_string());
        }
        if !self.has_valid_indices() {
            return Err("mesh has out-of-bounds vertex indices".to_string());
        }
        if let Some(normals) = self.normals.as_ref() {
            if normals.len() != self.positions.len() {
                return Err("mesh normal buffer does not match vertex count".to_string());
            }
        }
        Ok(())
    }

    /// Position buffer as `[x0, y0, z0, x1, ...]`, without copying.
    #[must_use]
    pub fn positions_flat(&self) -> &[f64] {
        self.positions.as_flattened()
    }

    #[must_use]
    pub fn normals_flat(&self) -> Option<&[f64]> {
        self.normals.as_deref().map(<[[f64; 3]]>::as_flattened)
    }

    fn triangle(&self, tri: &[u32]) -> [Point3; 3] {
        let at = |i: u32| {
            let p = self.positions[i as usize];
            Point3::new(p[0], p[1], p[2])
        };
        [at(tri[0]), at(tri[1]), at(tri[2])]
    }

    /// Sum of triangle areas. Converges to the strip area as the grid is
    /// refined, from below.
    #[must_use]
    pub fn surface_area(&self) -> f64 {
        self.indices
            .chunks_exact(3)
            .map(|tri| {
                let [a, b, c] = self.triangle(tri);
                0.5 * b.sub_point(a).cross(c.sub_point(a)).length()
            })
            .sum()
    }

    #[must_use]
    pub fn topology(&self) -> MeshTopology {
        let mut edge_uses: HashMap<(u32, u32), usize> = HashMap::new();
        for tri in self.indices.chunks_exact(3) {
            for (a, b) in [(tri[0], tri[1]), (tri[1], tri[2]), (tri[2], tri[0])] {
                *edge_uses.entry((a.min(b), a.max(b))).or_insert(0) += 1;
            }
        }

        let mut open_edges = Vec::new();
        let mut non_manifold_edge_count = 0;
        for (&edge, &uses) in &edge_uses {
            match uses {
                1 => open_edges.push(edge),
                2 => {}
                _ => non_manifold_edge_count += 1,
            }
        }

        MeshTopology {
            open_edge_count: open_edges.len(),
            non_manifold_edge_count,
            boundary_loop_count: count_edge_components(&open_edges),
        }
    }

    /// Writes the mesh as a Wavefront OBJ object called `name`.
    pub fn write_obj<W: Write>(&self, w: &mut W, name: &str) -> io::Result<()> {
        writeln!(w, "# mobius-engine")?;
        writeln!(w, "o {name}")?;

        for p in &self.positions {
            writeln!(w, "v {} {} {}", p[0], p[1], p[2])?;
        }

        let has_normals = self.normals.is_some();
        if let Some(normals) = self.normals.as_ref() {
            for n in normals {
                writeln!(w, "vn {} {} {}", n[0], n[1], n[2])?;
            }
        }

        for tri in self.indices.chunks_exact(3) {
            let a = tri[0] + 1;
            let b = tri[1] + 1;
            let c = tri[2] + 1;
            if has_normals {
                writeln!(w, "f {a}//{a} {b}//{b} {c}//{c}")?;
            } else {
                writeln!(w, "f {a} {b} {c}")?;
            }
        }

        w.flush()
    }
}

fn count_edge_components(edges: &[(u32, u32)]) -> usize {
    fn find(parent: &mut HashMap<u32, u32>, x: u32) -> u32 {
        let mut root = x;
        while let Some(&p) = parent.get(&root) {
            if p == root {
                break;
            }
            root = p;
        }
        let mut node = x;
        while node != root {
            let next = parent[&node];
            parent.insert(node, root);
            node = next;
        }
        root
    }

    let mut parent: HashMap<u32, u32> = HashMap::new();
    for &(a, b) in edges {
        parent.entry(a).or_insert(a);
        parent.entry(b).or_insert(b);
        let ra = find(&mut parent, a);
        let rb = find(&mut parent, b);
        if ra != rb {
            parent.insert(ra, rb);
        }
    }

    let vertices: Vec<u32> = parent.keys().copied().collect();
    let mut roots: Vec<u32> = vertices.into_iter().map(|v| find(&mut parent, v)).collect();
    roots.sort_unstable();
    roots.dedup();
    roots.len()
}

/// Triangle indices for an `n_u × n_v` grid stored row-major by `v`, where
/// column `n_u - 1` is joined to column 0 across the half-twist: row `j` on
/// one side of the seam meets row `n_v - 1 - j` on the other.
///
/// Fails when the vertex count does not fit `u32` indices.
pub fn triangulate_twisted_grid(n_u: usize, n_v: usize) -> StripResult<Vec<u32>> {
    let n_u = n_u.max(2);
    let n_v = n_v.max(2);
    let (cols, rows) = u32::try_from(n_u)
        .ok()
        .zip(u32::try_from(n_v).ok())
        .filter(|(cols, rows)| cols.checked_mul(*rows).is_some())
        .ok_or_else(|| {
            StripError::Mesh(format!(
                "{n_u}x{n_v} grid has more vertices than u32 indices can address"
            ))
        })?;
    let index = |i_u: u32, i_v: u32| i_v * cols + i_u;

    let mut indices = Vec::with_capacity(n_u * (n_v - 1) * 6);
    for j in 0..rows - 1 {
        for i in 0..cols {
            let i0 = index(i, j);
            let i2 = index(i, j + 1);
            let (i1, i3) = if i + 1 < cols {
                (index(i + 1, j), index(i + 1, j + 1))
            } else {
                (index(0, rows - 1 - j), index(0, rows - 2 - j))
            };

            indices.extend_from_slice(&[i0, i1, i2]);
            indices.extend_from_slice(&[i2, i1, i3]);
        }
    }
    Ok(indices)
}

/// Meshes the strip on a [`GridLayout::Periodic`] grid, stitching the seam
/// with the half-twist. Vertex normals come from the analytic derivatives.
pub fn mesh_strip(
    surface: &MobiusSurface,
    grid: &ParameterGrid,
) -> StripResult<(GeomMesh, MeshTopology)> {
    if grid.layout != GridLayout::Periodic {
        return Err(StripError::Mesh(format!(
            "strip meshing needs a periodic grid, got {:?}",
            grid.layout
        )));
    }

    let indices = triangulate_twisted_grid(grid.n_u(), grid.n_v())?;
    let points = SurfaceGrid::sample(surface, grid);
    let normals = grid
        .pairs()
        .map(|(u, v)| {
            surface
                .normal_at(u, v)
                .unwrap_or(Vec3::new(0.0, 0.0, 1.0))
                .to_array()
        })
        .collect();

    let mesh = GeomMesh {
        positions: points.points.iter().map(|p| p.to_array()).collect(),
        indices,
        normals: Some(normals),
    };
    mesh.validate().map_err(StripError::Mesh)?;

    let topology = mesh.topology();
    log::debug!(
        "strip mesh: V:{} T:{} open:{} loops:{}",
        mesh.vertex_count(),
        mesh.triangle_count(),
        topology.open_edge_count,
        topology.boundary_loop_count
    );
    Ok((mesh, topology))
}
